//! Default parameter rules for the game's telemetry events.

use std::sync::Arc;

use crate::clock::Clock;
use crate::error::Result;

use super::domain::{
    AndroidOsVersionValidator, CountryCodeValidator, CurrencyIdValidator, FractionValidator,
    HexadecimalValidator, NumericIdValidator, RealmPathValidator, StickersStateValidator,
    TransactionIdValidator, UuidValidator, VersionHashValidator,
};
use super::registry::RuleSet;
use super::structured::{
    ActiveSegmentsValidator, ClickOnScreenValidator, OFFER_CURRENCIES,
    PackRaritiesWeightsValidator, PresentedOffersStringValidator, ReceivedStickersListValidator,
    RewardCenterValidator,
};
use super::temporal::{
    ClientTimestampValidator, DecimalTimestampValidator, IsoTimestampValidator, TimeValidator,
    UnixMillisValidator, UnixSecondsValidator,
};
use super::validators::{
    BooleanValidator, FixedSetValidator, FormatValidator, InterruptedValidator, ListValidator,
    RangeValidator,
};

const SEMVER: &str = r"^\d+\.\d+(\.\d+){0,2}$";
const SNAKE_ID: &str = r"^[a-z0-9]+(_[a-z0-9]+)*$";
const SKU: &str = r"^[A-Za-z0-9]+([._][A-Za-z0-9]+)*$";

const SCREENS: &[&str] = &[
    "board",
    "album",
    "store",
    "events",
    "friends",
    "settings",
    "loading",
    "tournament",
    "inbox",
    "profile",
];

const REWARD_SOURCES: &[&str] = &[
    "board",
    "quick_win",
    "event",
    "tournament",
    "store",
    "gift",
    "daily_reward",
    "album",
    "partner_event",
    "reward_center",
    "ad",
];

const REWARD_TYPES: &[&str] = &[
    "dice",
    "cash",
    "sticker_pack",
    "shields",
    "tokens",
    "stars",
    "frame",
];

const QUEST_TYPES: &[&str] = &["daily", "weekly", "event", "season", "story"];

const MINIGAMES: &[&str] = &[
    "treasure_dig",
    "prize_drop",
    "wheel",
    "golden_blast",
    "heist",
    "shutdown",
];

const UI_ACTIONS: &[&str] = &["tap", "long_press", "swipe", "close", "back", "open"];

const THERMAL_STATES: &[&str] = &["nominal", "fair", "serious", "critical"];

/// Build the default rule table.
///
/// Time-window rules read `clock`, so tests can pin "now".
pub fn default_rules(clock: Arc<dyn Clock>) -> Result<RuleSet> {
    let mut rules = RuleSet::new();

    // Session & identity
    rules
        .add("user_id", NumericIdValidator)
        .add("device_id", UuidValidator)
        .add("install_id", UuidValidator)
        .add("session_id", UuidValidator)
        .add("advertising_id", UuidValidator)
        .add("session_number", RangeValidator::at_least(1.0))
        .add("session_length_sec", RangeValidator::between(0.0, 86_400.0))
        .add("interrupted", InterruptedValidator::new())
        .add("is_first_session", BooleanValidator::new())
        .add("is_payer", BooleanValidator::new())
        .add("is_tutorial", BooleanValidator::new())
        .add("tutorial_step", RangeValidator::between(0.0, 50.0))
        .add("player_level", RangeValidator::between(1.0, 10_000.0));

    // Device & client
    rules
        .add(
            "platform",
            FixedSetValidator::new(["Android", "iOS", "WebGL", "Editor"]),
        )
        .add("os_version", AndroidOsVersionValidator)
        .add(
            "device_model",
            FormatValidator::new(r"^[\w\-\s.(),+/]{1,100}$", "Device Model")?,
        )
        .add("device_memory_mb", RangeValidator::between(256.0, 65_536.0))
        .add("screen_width", RangeValidator::between(240.0, 8_000.0))
        .add("screen_height", RangeValidator::between(240.0, 8_000.0))
        .add(
            "network_type",
            FixedSetValidator::new(["wifi", "cellular", "offline", "unknown"]),
        )
        .add("battery_level", RangeValidator::between(0.0, 1.0).allow_null())
        .add("low_power_mode", BooleanValidator::new().allow_null())
        .add("app_version", FormatValidator::new(SEMVER, "Version")?)
        .add("bundle_version", FormatValidator::new(SEMVER, "Version")?)
        .add("build_number", NumericIdValidator)
        .add("client_version_hash", VersionHashValidator)
        .add("asset_bundle_hash", VersionHashValidator)
        .add("config_version", VersionHashValidator)
        .add("country", CountryCodeValidator)
        .add(
            "language",
            FormatValidator::new(r"^[a-z]{2}(-[A-Z]{2})?$", "Language Tag")?,
        )
        .add("timezone_offset_min", RangeValidator::between(-720.0, 840.0))
        .add(
            "store",
            FixedSetValidator::new(["google_play", "app_store", "amazon", "samsung"]),
        )
        .add(
            "graphics_quality",
            FixedSetValidator::new(["low", "medium", "high", "auto"]),
        )
        .add("sound_enabled", BooleanValidator::new())
        .add("music_enabled", BooleanValidator::new())
        .add("vibration_enabled", BooleanValidator::new())
        .add("push_enabled", BooleanValidator::new().allow_null());

    // Timestamps
    rules
        .add("event_timestamp", TimeValidator::new(clock.clone()))
        .add("received_at", TimeValidator::new(clock))
        .add("client_timestamp", ClientTimestampValidator)
        .add("client_ts", DecimalTimestampValidator)
        .add("last_login_ts", DecimalTimestampValidator)
        .add("server_timestamp", UnixMillisValidator)
        .add("install_timestamp", UnixSecondsValidator)
        .add("offer_expiry_ts", UnixSecondsValidator)
        .add("session_start_time", IsoTimestampValidator::new())
        .add("event_start_time", IsoTimestampValidator::new())
        .add("event_end_time", IsoTimestampValidator::new())
        .add("last_purchase_time", IsoTimestampValidator::new().allow_null());

    // Economy
    rules
        .add("dice_balance", RangeValidator::at_least(0.0))
        .add("dice_before", RangeValidator::at_least(0.0))
        .add("dice_after", RangeValidator::at_least(0.0))
        .add("dice_spent", RangeValidator::at_least(0.0))
        .add(
            "dice_multiplier",
            FixedSetValidator::new([
                "1", "2", "3", "5", "10", "20", "50", "100", "200", "500", "1000",
            ]),
        )
        .add("cash_balance", RangeValidator::at_least(0.0))
        .add("cash_delta", RangeValidator::new(None, None))
        .add("net_worth", RangeValidator::at_least(0.0))
        .add("stars_balance", RangeValidator::at_least(0.0))
        .add("tokens_balance", RangeValidator::at_least(0.0))
        .add("shields_count", RangeValidator::between(0.0, 3.0))
        .add("currency", CurrencyIdValidator)
        .add("currency_spent", CurrencyIdValidator)
        .add("currency_received", CurrencyIdValidator)
        .add("amount", RangeValidator::at_least(0.0))
        .add("source", FixedSetValidator::new(REWARD_SOURCES.iter().copied()))
        .add(
            "sink",
            FixedSetValidator::new([
                "board_roll",
                "landmark_build",
                "store",
                "minigame",
                "sticker_trade",
                "event_entry",
            ]),
        );

    // Board & gameplay
    rules
        .add("board_id", NumericIdValidator)
        .add("board_level", RangeValidator::between(1.0, 500.0))
        .add("realm_path", RealmPathValidator)
        .add("tile_index", RangeValidator::between(0.0, 39.0))
        .add("roll_result", RangeValidator::between(2.0, 12.0))
        .add("dice_face_1", RangeValidator::between(1.0, 6.0))
        .add("dice_face_2", RangeValidator::between(1.0, 6.0))
        .add("is_doubles", BooleanValidator::new())
        .add("auto_roll_enabled", BooleanValidator::new())
        .add("rolls_remaining", RangeValidator::at_least(0.0))
        .add("landmark_id", NumericIdValidator)
        .add("landmark_level", RangeValidator::between(0.0, 5.0))
        .add("building_cost", RangeValidator::at_least(0.0))
        .add("jail_turns", RangeValidator::between(0.0, 3.0))
        .add("chance_card_id", NumericIdValidator)
        .add("community_chest_id", NumericIdValidator)
        .add("railroad_target_id", NumericIdValidator)
        .add(
            "heist_result",
            FixedSetValidator::new(["small", "large", "bankrupt"]),
        )
        .add(
            "shutdown_result",
            FixedSetValidator::new(["blocked", "success", "miss"]),
        )
        .add("click_on_screen", ClickOnScreenValidator);

    // Stickers & album
    rules
        .add("album_id", NumericIdValidator)
        .add("sticker_id", NumericIdValidator)
        .add("sticker_set_id", NumericIdValidator)
        .add("sticker_stars", RangeValidator::between(1.0, 5.0))
        .add("sticker_is_gold", BooleanValidator::new())
        .add("stickers_state", StickersStateValidator)
        .add("set_progress", FractionValidator::new().proper())
        .add("album_progress", FractionValidator::new())
        .add("pack_id", NumericIdValidator)
        .add(
            "pack_type",
            FixedSetValidator::new(["green", "yellow", "pink", "blue", "purple"]),
        )
        .add("pack_rarities_weights", PackRaritiesWeightsValidator)
        .add("received_stickers_list", ReceivedStickersListValidator)
        .add("duplicate_stickers", RangeValidator::at_least(0.0))
        .add("trade_partner_id", NumericIdValidator)
        .add("sticker_trade_ids", ListValidator::of(NumericIdValidator))
        .add("stickers_collected", RangeValidator::at_least(0.0))
        .add("sets_completed", RangeValidator::between(0.0, 50.0))
        .add("album_season_id", NumericIdValidator)
        .add("album_completed", BooleanValidator::new())
        .add("sticker_swap_pack_stars", RangeValidator::between(0.0, 10_000.0))
        .add("gold_trade_used", BooleanValidator::new())
        .add("sticker_request_id", UuidValidator)
        .add("sticker_vault_level", RangeValidator::between(0.0, 10.0));

    // Events & live ops
    rules
        .add("event_id", NumericIdValidator)
        .add(
            "event_type",
            FixedSetValidator::new([
                "tournament",
                "banner",
                "partner",
                "quick_win",
                "flash",
                "album_season",
                "minigame",
            ]),
        )
        .add("event_name", FormatValidator::new(r"^\S.{0,99}$", "Event Name")?)
        .add("event_points", RangeValidator::at_least(0.0))
        .add("milestone_index", RangeValidator::between(0.0, 100.0))
        .add("milestone_progress", FractionValidator::new())
        .add("tournament_rank", RangeValidator::between(1.0, 10_000.0))
        .add("tournament_score", RangeValidator::at_least(0.0))
        .add("leaderboard_id", HexadecimalValidator)
        .add("partner_id", NumericIdValidator)
        .add("partner_progress", RangeValidator::between(0.0, 100.0))
        .add("active_segments", ActiveSegmentsValidator)
        .add(
            "ab_test_group",
            FixedSetValidator::new(["control", "variant_a", "variant_b", "variant_c"])
                .allow_null(),
        )
        .add(
            "ab_test_ids",
            ListValidator::of(FormatValidator::new(SNAKE_ID, "Test Id")?),
        )
        .add("reward_center", RewardCenterValidator)
        .add("reward_type", FixedSetValidator::new(REWARD_TYPES.iter().copied()))
        .add("reward_amount", RangeValidator::at_least(0.0))
        .add("reward_sources", ListValidator::of_values(REWARD_SOURCES.iter().copied()))
        .add("is_claimed", BooleanValidator::new())
        .add("daily_streak", RangeValidator::between(0.0, 365.0));

    // Store & monetization
    rules
        .add("presented_offers", PresentedOffersStringValidator)
        .add("offer_id", FormatValidator::new(SKU, "SKU")?)
        .add("sku", FormatValidator::new(SKU, "SKU")?)
        .add("offer_slot", RangeValidator::between(0.0, 10.0))
        .add("offer_position", RangeValidator::between(0.0, 20.0))
        .add("price_usd", RangeValidator::between(0.0, 1_000.0))
        .add("price_local", RangeValidator::at_least(0.0))
        .add(
            "local_currency",
            FixedSetValidator::new(OFFER_CURRENCIES.iter().copied()),
        )
        .add("transaction_id", TransactionIdValidator)
        .add(
            "purchase_status",
            FixedSetValidator::new(["success", "failed", "cancelled", "pending", "refunded"]),
        )
        .add("is_sandbox", BooleanValidator::new())
        .add(
            "payment_provider",
            FixedSetValidator::new(["google_play", "app_store", "xsolla", "amazon"]),
        )
        .add(
            "store_tab",
            FixedSetValidator::new(["featured", "dice", "cash", "packs", "bundles"]),
        )
        .add(
            "ad_network",
            FixedSetValidator::new(["admob", "applovin", "ironsource", "unity", "meta"]),
        )
        .add(
            "ad_placement",
            FixedSetValidator::new(["rewarded_dice", "rewarded_cash", "interstitial", "banner"]),
        )
        .add("ad_watched_sec", RangeValidator::between(0.0, 300.0))
        .add("ad_revenue_usd", RangeValidator::between(0.0, 10.0))
        .add("bundle_id", NumericIdValidator)
        .add("bundle_contents", ListValidator::of_values(REWARD_TYPES.iter().copied()))
        .add("discount_pct", RangeValidator::between(0.0, 100.0))
        .add("is_first_purchase", BooleanValidator::new())
        .add("purchase_count", RangeValidator::at_least(0.0))
        .add("receipt_validated", BooleanValidator::new().allow_null())
        .add("store_visit_source", FixedSetValidator::new(SCREENS.iter().copied()))
        .add("offer_impressions", RangeValidator::at_least(0.0))
        .add("offer_shown_ts", UnixMillisValidator)
        .add("subscription_active", BooleanValidator::new())
        .add("subscription_tier", FixedSetValidator::new(["none", "monthly", "annual"]));

    // Social
    rules
        .add("friend_count", RangeValidator::between(0.0, 5_000.0))
        .add("friend_ids", ListValidator::of(NumericIdValidator))
        .add("gift_sender_id", NumericIdValidator)
        .add(
            "gift_type",
            FixedSetValidator::new(["dice", "sticker", "cash", "shield"]),
        )
        .add(
            "invite_channel",
            FixedSetValidator::new(["facebook", "sms", "link", "contacts", "whatsapp"]),
        )
        .add("is_facebook_connected", BooleanValidator::new());

    // UI & technical
    rules
        .add("screen_name", FixedSetValidator::new(SCREENS.iter().copied()))
        .add(
            "previous_screen",
            FixedSetValidator::new(SCREENS.iter().copied()).allow_null(),
        )
        .add("button_id", FormatValidator::new(SNAKE_ID, "Snake Case Id")?)
        .add("popup_id", FormatValidator::new(SNAKE_ID, "Snake Case Id")?)
        .add("notification_id", UuidValidator)
        .add(
            "notification_type",
            FixedSetValidator::new(["push", "local", "inbox"]),
        )
        .add("fps_avg", RangeValidator::between(0.0, 240.0))
        .add("memory_usage_mb", RangeValidator::between(0.0, 65_536.0))
        .add("load_time_ms", RangeValidator::between(0.0, 600_000.0))
        .add("ping_ms", RangeValidator::between(0.0, 60_000.0))
        .add("download_progress", FractionValidator::new())
        .add("error_code", HexadecimalValidator)
        .add("error_message", FormatValidator::new(r"^.{1,1000}$", "Message")?)
        .add("crash_flag", BooleanValidator::new())
        .add("crash_id", UuidValidator)
        .add("anr_flag", BooleanValidator::new())
        .add("fps_min", RangeValidator::between(0.0, 240.0))
        .add("frame_drops", RangeValidator::at_least(0.0))
        .add("cpu_usage_pct", RangeValidator::between(0.0, 100.0))
        .add("gpu_usage_pct", RangeValidator::between(0.0, 100.0).allow_null())
        .add("thermal_state", FixedSetValidator::new(THERMAL_STATES.iter().copied()))
        .add("disk_free_mb", RangeValidator::at_least(0.0))
        .add("download_size_mb", RangeValidator::between(0.0, 10_000.0))
        .add("asset_load_ms", RangeValidator::between(0.0, 600_000.0))
        .add("api_endpoint", FormatValidator::new(r"^/[A-Za-z0-9_\-/.]{0,200}$", "API Path")?)
        .add("http_status", RangeValidator::between(100.0, 599.0))
        .add("request_duration_ms", RangeValidator::between(0.0, 600_000.0))
        .add("retry_count", RangeValidator::between(0.0, 20.0))
        .add("is_offline_event", BooleanValidator::new())
        .add("queue_size", RangeValidator::at_least(0.0))
        .add("ui_element", FormatValidator::new(SNAKE_ID, "Snake Case Id")?)
        .add("ui_action", FixedSetValidator::new(UI_ACTIONS.iter().copied()))
        .add("scroll_depth", FractionValidator::new().proper())
        .add("time_on_screen_sec", RangeValidator::between(0.0, 86_400.0))
        .add("settings_changed", ListValidator::of(FormatValidator::new(SNAKE_ID, "Setting")?))
        .add("orientation", FixedSetValidator::new(["portrait", "landscape"]))
        .add("is_tablet", BooleanValidator::new())
        .add("safe_area_top", RangeValidator::between(0.0, 500.0))
        .add("safe_area_bottom", RangeValidator::between(0.0, 500.0));

    // Tutorial & onboarding
    rules
        .add("tutorial_id", NumericIdValidator)
        .add("tutorial_name", FormatValidator::new(SNAKE_ID, "Snake Case Id")?)
        .add("tutorial_completed", BooleanValidator::new())
        .add("tutorial_skipped", BooleanValidator::new())
        .add("tutorial_duration_sec", RangeValidator::between(0.0, 7_200.0))
        .add("onboarding_variant", FixedSetValidator::new(["classic", "short", "guided"]))
        .add("onboarding_step_name", FormatValidator::new(SNAKE_ID, "Snake Case Id")?)
        .add("ftue_funnel_step", RangeValidator::between(0.0, 100.0))
        .add("first_roll_done", BooleanValidator::new())
        .add("name_entered", BooleanValidator::new().allow_null())
        .add("avatar_selected", NumericIdValidator);

    // Quests & missions
    rules
        .add("quest_id", NumericIdValidator)
        .add("quest_type", FixedSetValidator::new(QUEST_TYPES.iter().copied()))
        .add("quest_step", RangeValidator::between(0.0, 100.0))
        .add("quest_progress", FractionValidator::new())
        .add("quest_goal", RangeValidator::at_least(1.0))
        .add("quest_completed", BooleanValidator::new())
        .add("quest_reward_type", FixedSetValidator::new(REWARD_TYPES.iter().copied()))
        .add("quest_reward_amount", RangeValidator::at_least(0.0))
        .add("quest_expiry_ts", UnixSecondsValidator)
        .add("mission_id", NumericIdValidator)
        .add("mission_slot", RangeValidator::between(0.0, 10.0))
        .add("missions_completed", RangeValidator::at_least(0.0))
        .add("mission_refresh_count", RangeValidator::between(0.0, 50.0))
        .add("season_pass_level", RangeValidator::between(0.0, 200.0))
        .add("season_pass_xp", RangeValidator::at_least(0.0))
        .add("season_pass_premium", BooleanValidator::new())
        .add("season_id", NumericIdValidator);

    // Minigames
    rules
        .add("minigame_id", NumericIdValidator)
        .add("minigame_type", FixedSetValidator::new(MINIGAMES.iter().copied()))
        .add("minigame_round", RangeValidator::between(0.0, 100.0))
        .add("minigame_score", RangeValidator::at_least(0.0))
        .add("minigame_result", FixedSetValidator::new(["win", "lose", "draw", "abandoned"]))
        .add("minigame_duration_sec", RangeValidator::between(0.0, 3_600.0))
        .add("minigame_currency", CurrencyIdValidator)
        .add("minigame_entry_cost", RangeValidator::at_least(0.0))
        .add("pickaxes_balance", RangeValidator::at_least(0.0))
        .add("pickaxes_spent", RangeValidator::at_least(0.0))
        .add("dig_tile_index", RangeValidator::between(0.0, 63.0))
        .add("prize_drop_slot", RangeValidator::between(0.0, 8.0))
        .add("prize_drop_multiplier", FixedSetValidator::new(["1", "2", "3", "5", "10"]))
        .add("wheel_segment", RangeValidator::between(0.0, 23.0))
        .add("wheel_spins_left", RangeValidator::at_least(0.0))
        .add("golden_blast_active", BooleanValidator::new());

    // Teams & clans
    rules
        .add("team_id", NumericIdValidator)
        .add("team_size", RangeValidator::between(1.0, 50.0))
        .add("team_role", FixedSetValidator::new(["leader", "officer", "member"]))
        .add("team_rank", RangeValidator::between(1.0, 100_000.0))
        .add("team_points", RangeValidator::at_least(0.0))
        .add("team_join_method", FixedSetValidator::new(["invite", "search", "auto", "link"]))
        .add("team_event_id", NumericIdValidator)
        .add("team_contribution", RangeValidator::at_least(0.0))
        .add("team_chat_messages", RangeValidator::at_least(0.0))
        .add("co_op_partner_ids", ListValidator::of(NumericIdValidator))
        .add("co_op_partner_count", RangeValidator::between(0.0, 4.0))
        .add("co_op_landmark_progress", FractionValidator::new())
        .add("is_team_leader", BooleanValidator::new());

    // Inbox & notifications
    rules
        .add("inbox_message_id", UuidValidator)
        .add(
            "inbox_message_type",
            FixedSetValidator::new(["gift", "news", "compensation", "reward", "system"]),
        )
        .add("inbox_unread_count", RangeValidator::between(0.0, 1_000.0))
        .add("inbox_claimed", BooleanValidator::new())
        .add("push_campaign_id", NumericIdValidator)
        .add("push_opened", BooleanValidator::new())
        .add("push_sent_ts", UnixMillisValidator)
        .add(
            "push_permission",
            FixedSetValidator::new(["granted", "denied", "not_determined", "provisional"]),
        )
        .add("deep_link", FormatValidator::new(r"^[a-z][a-z0-9+.\-]*://\S+$", "Deep Link")?)
        .add(
            "deep_link_source",
            FixedSetValidator::new(["push", "email", "social", "ad", "web"]).allow_null(),
        );

    // Profile & cosmetics
    rules
        .add("profile_frame_id", NumericIdValidator)
        .add("token_skin_id", NumericIdValidator)
        .add("board_skin_id", NumericIdValidator)
        .add("dice_skin_id", NumericIdValidator)
        .add("emoji_id", NumericIdValidator)
        .add(
            "cosmetic_type",
            FixedSetValidator::new(["frame", "token", "board", "dice", "emoji", "shield"]),
        )
        .add("cosmetic_equipped", BooleanValidator::new())
        .add("cosmetics_owned", RangeValidator::at_least(0.0))
        .add("display_name_length", RangeValidator::between(0.0, 32.0))
        .add("profile_completed", FractionValidator::new().proper())
        .add("vip_tier", RangeValidator::between(0.0, 15.0))
        .add("vip_points", RangeValidator::at_least(0.0))
        .add("lifetime_spend_usd", RangeValidator::at_least(0.0))
        .add("days_since_install", RangeValidator::at_least(0.0))
        .add("days_since_last_session", RangeValidator::at_least(0.0).allow_null())
        .add(
            "account_linked",
            FixedSetValidator::new(["none", "facebook", "apple", "google", "email"]),
        )
        .add("account_created_time", IsoTimestampValidator::new())
        .add("cohort_week", FormatValidator::new(r"^\d{4}-W\d{2}$", "ISO Week")?);

    // Attribution & consent
    rules
        .add(
            "attribution_network",
            FormatValidator::new(r"^[A-Za-z0-9 _\-.()]{1,64}$", "Network Name")?,
        )
        .add("attribution_campaign", FormatValidator::new(r"^.{1,200}$", "Campaign")?)
        .add("attribution_adgroup", FormatValidator::new(r"^.{1,200}$", "Ad Group")?)
        .add("attribution_creative", FormatValidator::new(r"^.{1,200}$", "Creative")?)
        .add("is_organic", BooleanValidator::new())
        .add("idfa_available", BooleanValidator::new())
        .add(
            "att_status",
            FixedSetValidator::new(["authorized", "denied", "restricted", "not_determined"]),
        )
        .add("gdpr_consent", BooleanValidator::new().allow_null())
        .add("ccpa_opt_out", BooleanValidator::new().allow_null())
        .add("age_gate_passed", BooleanValidator::new())
        .add("consent_version", FormatValidator::new(SEMVER, "Version")?)
        .add("referrer_user_id", NumericIdValidator);

    // Ads
    rules
        .add("ad_unit_id", FormatValidator::new(r"^[A-Za-z0-9_\-/~.]{4,128}$", "Ad Unit")?)
        .add(
            "ad_format",
            FixedSetValidator::new(["rewarded", "interstitial", "banner", "offerwall"]),
        )
        .add("ad_load_ms", RangeValidator::between(0.0, 120_000.0))
        .add("ad_completed", BooleanValidator::new())
        .add("ad_clicked", BooleanValidator::new())
        .add("ad_skipped", BooleanValidator::new())
        .add("ad_reward_amount", RangeValidator::at_least(0.0))
        .add("ad_reward_type", FixedSetValidator::new(REWARD_TYPES.iter().copied()))
        .add("ads_watched_today", RangeValidator::between(0.0, 500.0))
        .add("ad_cooldown_sec", RangeValidator::between(0.0, 86_400.0))
        .add(
            "ad_fill_status",
            FixedSetValidator::new(["filled", "no_fill", "timeout", "error"]),
        )
        .add("ad_ecpm_usd", RangeValidator::between(0.0, 1_000.0));

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use std::collections::HashSet;

    #[test]
    fn test_default_rules_build() {
        let rules = default_rules(Arc::new(SystemClock)).unwrap();
        assert!(rules.len() >= 300);
    }

    #[test]
    fn test_default_rule_names_unique() {
        let rules = default_rules(Arc::new(SystemClock)).unwrap();
        let mut seen = HashSet::new();
        for (name, _) in rules {
            assert!(seen.insert(name.clone()), "duplicate rule for {name}");
        }
    }
}
