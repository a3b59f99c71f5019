//! Validators for JSON-encoded event payloads.
//!
//! These parameters are serialized objects or arrays, usually shipped as a
//! JSON string inside a single telemetry column. Anything that fails to
//! parse is invalid.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value as Json};

use crate::value::Value;

use super::validators::Validator;

static SKU: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._]+$").expect("valid sku pattern"));

static SEGMENT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_\-.:]+$").expect("valid segment pattern"));

/// ISO-4217 currencies the storefront prices offers in.
pub const OFFER_CURRENCIES: &[&str] = &[
    "USD", "EUR", "GBP", "CAD", "AUD", "NZD", "JPY", "KRW", "CNY", "HKD", "TWD", "SGD", "INR",
    "IDR", "THB", "PHP", "MYR", "VND", "BRL", "MXN", "ARS", "CLP", "COP", "PEN", "CHF", "SEK",
    "NOK", "DKK", "PLN", "CZK", "HUF", "RON", "TRY", "RUB", "UAH", "ILS", "SAR", "AED", "QAR",
    "ZAR", "EGP", "NGN", "KZT", "PKR",
];

/// Sticker star tiers used as keys in pack weight tables.
const RARITY_TIERS: &[&str] = &["1", "2", "3", "4", "5"];

fn parse(value: &Value) -> Option<Json> {
    if value.is_null() {
        return None;
    }
    value.to_json()
}

/// Number, or a string holding one.
fn json_number(json: &Json) -> Option<f64> {
    match json {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn non_negative(json: &Json) -> bool {
    json_number(json).is_some_and(|n| n.is_finite() && n >= 0.0)
}

fn non_empty_str(json: &Json) -> bool {
    json.as_str().is_some_and(|s| !s.trim().is_empty())
}

/// Positive integer, as a number or a digit string.
fn positive_id(json: &Json) -> bool {
    match json {
        Json::Number(n) => n.as_u64().is_some_and(|id| id > 0),
        Json::String(s) => {
            let s = s.trim();
            !s.is_empty()
                && s.bytes().all(|b| b.is_ascii_digit())
                && !s.trim_start_matches('0').is_empty()
        }
        _ => false,
    }
}

fn optional<F: Fn(&Json) -> bool>(obj: &Map<String, Json>, key: &str, check: F) -> bool {
    match obj.get(key) {
        None | Some(Json::Null) => true,
        Some(v) => check(v),
    }
}

/// A tap position: `{"x": .., "y": ..}` with non-negative coordinates and
/// an optional screen name.
#[derive(Debug, Clone, Default)]
pub struct ClickOnScreenValidator;

impl Validator for ClickOnScreenValidator {
    fn validate(&self, value: &Value) -> bool {
        let Some(Json::Object(obj)) = parse(value) else {
            return false;
        };
        obj.get("x").is_some_and(non_negative)
            && obj.get("y").is_some_and(non_negative)
            && optional(&obj, "screen", non_empty_str)
    }

    fn label(&self) -> String {
        "Click Position (JSON)".to_string()
    }
}

/// Array of live-ops segment names.
#[derive(Debug, Clone, Default)]
pub struct ActiveSegmentsValidator;

impl Validator for ActiveSegmentsValidator {
    fn validate(&self, value: &Value) -> bool {
        let Some(Json::Array(items)) = parse(value) else {
            return false;
        };
        items
            .iter()
            .all(|item| item.as_str().is_some_and(|s| SEGMENT_NAME.is_match(s)))
    }

    fn label(&self) -> String {
        "Segment List (JSON)".to_string()
    }
}

/// Rewards waiting in the reward center: an array of
/// `{"reward_type": str, "amount": n >= 0, "source"?: str}`.
#[derive(Debug, Clone, Default)]
pub struct RewardCenterValidator;

impl Validator for RewardCenterValidator {
    fn validate(&self, value: &Value) -> bool {
        let Some(Json::Array(items)) = parse(value) else {
            return false;
        };
        items.iter().all(|item| match item {
            Json::Object(obj) => {
                obj.get("reward_type").is_some_and(non_empty_str)
                    && obj.get("amount").is_some_and(non_negative)
                    && optional(obj, "source", non_empty_str)
            }
            _ => false,
        })
    }

    fn label(&self) -> String {
        "Reward Center (JSON)".to_string()
    }
}

/// Store offers shown to the player.
///
/// Each element carries `sku`, `original_price` (number, numeric string,
/// or null), `currency` (known ISO-4217 code or null), and `type`
/// (`Paid` or `Free`).
#[derive(Debug, Clone, Default)]
pub struct PresentedOffersStringValidator;

impl PresentedOffersStringValidator {
    fn valid_offer(offer: &Map<String, Json>) -> bool {
        let sku_ok = offer
            .get("sku")
            .and_then(Json::as_str)
            .is_some_and(|s| SKU.is_match(s));

        let price_ok = match offer.get("original_price") {
            Some(Json::Null) => true,
            Some(price) => json_number(price).is_some_and(f64::is_finite),
            None => false,
        };

        let currency_ok = match offer.get("currency") {
            Some(Json::Null) => true,
            Some(Json::String(code)) => OFFER_CURRENCIES.contains(&code.as_str()),
            _ => false,
        };

        let type_ok = matches!(
            offer.get("type").and_then(Json::as_str),
            Some("Paid") | Some("Free")
        );

        sku_ok && price_ok && currency_ok && type_ok
    }
}

impl Validator for PresentedOffersStringValidator {
    fn validate(&self, value: &Value) -> bool {
        let Some(Json::Array(offers)) = parse(value) else {
            return false;
        };
        offers.iter().all(|offer| match offer {
            Json::Object(obj) => Self::valid_offer(obj),
            _ => false,
        })
    }

    fn label(&self) -> String {
        "Presented Offers (JSON)".to_string()
    }
}

/// Drop weights per sticker star tier: `{"1": 60, "2": 25, ...}`.
///
/// Keys must be known tiers, weights non-negative, and at least one weight
/// positive.
#[derive(Debug, Clone, Default)]
pub struct PackRaritiesWeightsValidator;

impl Validator for PackRaritiesWeightsValidator {
    fn validate(&self, value: &Value) -> bool {
        let Some(Json::Object(weights)) = parse(value) else {
            return false;
        };
        if weights.is_empty() {
            return false;
        }
        let mut total = 0.0;
        for (tier, weight) in &weights {
            if !RARITY_TIERS.contains(&tier.as_str()) {
                return false;
            }
            match json_number(weight) {
                Some(w) if w.is_finite() && w >= 0.0 => total += w,
                _ => return false,
            }
        }
        total > 0.0
    }

    fn label(&self) -> String {
        "Pack Rarity Weights (JSON)".to_string()
    }
}

/// Stickers received from a pack: an array of sticker ids, or of
/// `{"sticker_id": id, "stars"?: 1..=5, "is_new"?: bool}` objects.
#[derive(Debug, Clone, Default)]
pub struct ReceivedStickersListValidator;

impl ReceivedStickersListValidator {
    fn valid_entry(entry: &Json) -> bool {
        match entry {
            Json::Object(obj) => {
                obj.get("sticker_id").is_some_and(positive_id)
                    && optional(obj, "stars", |s| {
                        json_number(s).is_some_and(|n| n.fract() == 0.0 && (1.0..=5.0).contains(&n))
                    })
                    && optional(obj, "is_new", |b| {
                        crate::value::normalize_boolean_like(&Value::Json(b.clone())).is_some()
                    })
            }
            other => positive_id(other),
        }
    }
}

impl Validator for ReceivedStickersListValidator {
    fn validate(&self, value: &Value) -> bool {
        let Some(Json::Array(entries)) = parse(value) else {
            return false;
        };
        !entries.is_empty() && entries.iter().all(Self::valid_entry)
    }

    fn label(&self) -> String {
        "Received Stickers (JSON)".to_string()
    }
}
