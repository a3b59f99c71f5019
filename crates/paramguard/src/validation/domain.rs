//! Game- and platform-specific formats.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::Value;

use super::validators::Validator;

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

static REALM_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_\-]+(/[A-Za-z0-9_\-]+)*$").expect("valid realm pattern")
});
static MD5: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{32}$").expect("valid md5 pattern"));
static RATIO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)/(\d+)$").expect("valid ratio pattern"));
static GOOGLE_ORDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^GPA\.\d{4}-\d{4}-\d{4}-\d{5}(\.\.\d+)?$").expect("valid order pattern")
});
static APPLE_TRANSACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{15,20}$").expect("valid apple transaction pattern"));
static COUNTRY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2}$").expect("valid country pattern"));
static OS_MAJOR_MINOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+$").expect("valid os version pattern"));
static OS_PATCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid os patch pattern"));
static HEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{4,10}$").expect("valid hex pattern"));
static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("valid uuid pattern")
});
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,20}$").expect("valid digits pattern"));

/// Major releases reported as a bare number.
const ANDROID_MAJOR_VERSIONS: &[&str] = &[
    "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16",
];

/// In-game currencies, by key.
pub const GAME_CURRENCIES: &[&str] = &[
    "cash", "dice", "stars", "tokens", "shields", "gems", "sticker_pack", "event_points",
    "peg_e_tokens", "partner_points",
];

/// Trimmed text of a string-ish value; numbers keep their exporter form.
fn text(value: &Value) -> Option<String> {
    match value {
        v if v.is_null() => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Json(serde_json::Value::String(s)) => Some(s.trim().to_string()),
        Value::List(_) | Value::Json(_) | Value::Bool(_) => None,
        other => Some(other.to_text()),
    }
}

/// Digits of an integer id, tolerating a `.0` suffix from float columns.
fn integer_text(value: &Value) -> Option<String> {
    match value {
        Value::Int(i) => Some(i.to_string()),
        Value::Float(f) if f.is_finite() && f.fract() == 0.0 && *f >= 0.0 && *f < 1e16 => {
            Some(format!("{}", *f as i64))
        }
        Value::Float(_) => None,
        _ => text(value).map(|t| t.strip_suffix(".0").map(str::to_string).unwrap_or(t)),
    }
}

fn ratio(text: &str) -> Option<(u64, u64)> {
    let caps = RATIO.captures(text)?;
    let numerator = caps.get(1)?.as_str().parse().ok()?;
    let denominator = caps.get(2)?.as_str().parse().ok()?;
    Some((numerator, denominator))
}

/// Board location inside the realm tree, e.g. `season_12/city_04/tile_7`.
#[derive(Debug, Clone, Default)]
pub struct RealmPathValidator;

impl Validator for RealmPathValidator {
    fn validate(&self, value: &Value) -> bool {
        text(value).is_some_and(|t| REALM_PATH.is_match(&t))
    }

    fn label(&self) -> String {
        "Realm Path".to_string()
    }
}

/// MD5 content hash of a downloaded bundle.
#[derive(Debug, Clone, Default)]
pub struct VersionHashValidator;

impl Validator for VersionHashValidator {
    fn validate(&self, value: &Value) -> bool {
        text(value).is_some_and(|t| MD5.is_match(&t))
    }

    fn label(&self) -> String {
        "Version Hash (MD5)".to_string()
    }
}

/// Album progress as `current/total`, with `current <= total` and a
/// non-zero total.
#[derive(Debug, Clone, Default)]
pub struct StickersStateValidator;

impl Validator for StickersStateValidator {
    fn validate(&self, value: &Value) -> bool {
        text(value)
            .and_then(|t| ratio(&t))
            .is_some_and(|(current, total)| total > 0 && current <= total)
    }

    fn label(&self) -> String {
        "Stickers State (current/total)".to_string()
    }
}

/// Store transaction id: a Google Play order id, an App Store numeric
/// transaction id, or an internal UUID.
#[derive(Debug, Clone, Default)]
pub struct TransactionIdValidator;

impl Validator for TransactionIdValidator {
    fn validate(&self, value: &Value) -> bool {
        if let Value::Int(_) | Value::Float(_) = value {
            return integer_text(value).is_some_and(|t| APPLE_TRANSACTION.is_match(&t));
        }
        text(value).is_some_and(|t| {
            GOOGLE_ORDER.is_match(&t) || APPLE_TRANSACTION.is_match(&t) || UUID.is_match(&t)
        })
    }

    fn label(&self) -> String {
        "Store Transaction ID".to_string()
    }
}

/// ISO-3166 alpha-2 country code, upper case.
#[derive(Debug, Clone, Default)]
pub struct CountryCodeValidator;

impl Validator for CountryCodeValidator {
    fn validate(&self, value: &Value) -> bool {
        text(value).is_some_and(|t| COUNTRY.is_match(&t))
    }

    fn label(&self) -> String {
        "Country Code (ISO-3166)".to_string()
    }
}

/// Device OS version string.
///
/// Android reports bare majors (`14`), dotted versions (`13.0`, `8.1.0`),
/// or the Unity-style `Android OS 14 / API-34 (...)`. Editor and desktop
/// test builds report `Mac OS X ...`.
#[derive(Debug, Clone, Default)]
pub struct AndroidOsVersionValidator;

impl Validator for AndroidOsVersionValidator {
    fn validate(&self, value: &Value) -> bool {
        let Some(t) = text(value) else {
            return false;
        };
        ANDROID_MAJOR_VERSIONS.contains(&t.as_str())
            || OS_MAJOR_MINOR.is_match(&t)
            || OS_PATCH.is_match(&t)
            || t.starts_with("Android OS ")
            || t.starts_with("Mac OS X ")
    }

    fn label(&self) -> String {
        "Android OS Version".to_string()
    }
}

/// `N/D` with a non-zero denominator.
#[derive(Debug, Clone, Default)]
pub struct FractionValidator {
    proper: bool,
}

impl FractionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also require `N <= D`.
    pub fn proper(mut self) -> Self {
        self.proper = true;
        self
    }
}

impl Validator for FractionValidator {
    fn validate(&self, value: &Value) -> bool {
        text(value)
            .and_then(|t| ratio(&t))
            .is_some_and(|(n, d)| d > 0 && (!self.proper || n <= d))
    }

    fn label(&self) -> String {
        "Fraction (N/D)".to_string()
    }
}

/// Hexadecimal string of 4 to 10 digits.
#[derive(Debug, Clone, Default)]
pub struct HexadecimalValidator;

impl Validator for HexadecimalValidator {
    fn validate(&self, value: &Value) -> bool {
        match value {
            Value::String(_) | Value::Json(serde_json::Value::String(_)) => {
                text(value).is_some_and(|t| HEX.is_match(&t))
            }
            // Purely numeric hex ids lose their leading zeros in INT columns
            Value::Int(i) => *i >= 0 && HEX.is_match(&i.to_string()),
            _ => false,
        }
    }

    fn label(&self) -> String {
        "Hexadecimal (4-10)".to_string()
    }
}

/// Canonical 8-4-4-4-12 UUID.
#[derive(Debug, Clone, Default)]
pub struct UuidValidator;

impl Validator for UuidValidator {
    fn validate(&self, value: &Value) -> bool {
        text(value).is_some_and(|t| UUID.is_match(&t))
    }

    fn label(&self) -> String {
        "UUID".to_string()
    }
}

/// In-game currency key, or a positive numeric currency id.
#[derive(Debug, Clone, Default)]
pub struct CurrencyIdValidator;

impl Validator for CurrencyIdValidator {
    fn validate(&self, value: &Value) -> bool {
        if let Some(t) = text(value) {
            if GAME_CURRENCIES.contains(&t.to_ascii_lowercase().as_str()) {
                return true;
            }
        }
        NumericIdValidator.validate(value)
    }

    fn label(&self) -> String {
        "Currency ID".to_string()
    }
}

/// Positive integer id, as a number or a digit string (`.0` tolerated).
#[derive(Debug, Clone, Default)]
pub struct NumericIdValidator;

impl Validator for NumericIdValidator {
    fn validate(&self, value: &Value) -> bool {
        integer_text(value).is_some_and(|t| {
            DIGITS.is_match(&t) && !t.trim_start_matches('0').is_empty()
        })
    }

    fn label(&self) -> String {
        "Numeric ID".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realm_path() {
        let v = RealmPathValidator;
        assert!(v.validate(&Value::from("season_12/city_04/tile_7")));
        assert!(v.validate(&Value::from("lobby")));
        assert!(!v.validate(&Value::from("season_12//tile")));
        assert!(!v.validate(&Value::from("/root")));
        assert!(!v.validate(&Value::Null));
    }

    #[test]
    fn test_version_hash() {
        let v = VersionHashValidator;
        assert!(v.validate(&Value::from("9e107d9d372bb6826bd81d3542a419d6")));
        assert!(v.validate(&Value::from("9E107D9D372BB6826BD81D3542A419D6")));
        assert!(!v.validate(&Value::from("9e107d9d372bb6826bd81d3542a419d")));
        assert!(!v.validate(&Value::from("zz107d9d372bb6826bd81d3542a419d6")));
    }

    #[test]
    fn test_stickers_state() {
        let v = StickersStateValidator;
        assert!(v.validate(&Value::from("12/180")));
        assert!(v.validate(&Value::from("180/180")));
        assert!(!v.validate(&Value::from("181/180")));
        assert!(!v.validate(&Value::from("0/0")));
        assert!(!v.validate(&Value::from("12 of 180")));
    }

    #[test]
    fn test_transaction_id() {
        let v = TransactionIdValidator;
        assert!(v.validate(&Value::from("GPA.3312-5521-0981-44271")));
        assert!(v.validate(&Value::from("GPA.3312-5521-0981-44271..2")));
        assert!(v.validate(&Value::from("200000123456789")));
        assert!(v.validate(&Value::Int(200_000_123_456_789)));
        assert!(v.validate(&Value::from("3f1c2a9e-0b7d-4c55-9a61-2f0e7b8c1d44")));
        assert!(!v.validate(&Value::from("GPA.1-2-3")));
        assert!(!v.validate(&Value::Int(12345)));
    }

    #[test]
    fn test_country_code() {
        let v = CountryCodeValidator;
        assert!(v.validate(&Value::from("US")));
        assert!(!v.validate(&Value::from("us")));
        assert!(!v.validate(&Value::from("USA")));
    }

    #[test]
    fn test_android_os_version() {
        let v = AndroidOsVersionValidator;
        assert!(v.validate(&Value::from("14")));
        assert!(v.validate(&Value::from("13.0")));
        assert!(v.validate(&Value::from("8.1.0")));
        assert!(v.validate(&Value::from("Android OS 14 / API-34 (UP1A.231005.007)")));
        assert!(v.validate(&Value::from("Mac OS X 14.4.1")));
        assert!(v.validate(&Value::Float(13.0)));
        assert!(!v.validate(&Value::from("4")));
        assert!(!v.validate(&Value::from("iOS 17.2")));
        assert!(!v.validate(&Value::from("")));
    }

    #[test]
    fn test_fraction() {
        assert!(FractionValidator::new().validate(&Value::from("7/3")));
        assert!(!FractionValidator::new().proper().validate(&Value::from("7/3")));
        assert!(FractionValidator::new().proper().validate(&Value::from("3/7")));
        assert!(!FractionValidator::new().validate(&Value::from("3/0")));
        assert!(!FractionValidator::new().validate(&Value::from("-3/4")));
    }

    #[test]
    fn test_hexadecimal() {
        let v = HexadecimalValidator;
        assert!(v.validate(&Value::from("0a1F")));
        assert!(v.validate(&Value::from("deadbeef00")));
        assert!(!v.validate(&Value::from("abc")));
        assert!(!v.validate(&Value::from("deadbeef001")));
        assert!(!v.validate(&Value::from("xyz1")));
        assert!(v.validate(&Value::Int(1234)));
    }

    #[test]
    fn test_uuid() {
        let v = UuidValidator;
        assert!(v.validate(&Value::from("3f1c2a9e-0b7d-4c55-9a61-2f0e7b8c1d44")));
        assert!(!v.validate(&Value::from("3f1c2a9e0b7d4c559a612f0e7b8c1d44")));
    }

    #[test]
    fn test_currency_id() {
        let v = CurrencyIdValidator;
        assert!(v.validate(&Value::from("dice")));
        assert!(v.validate(&Value::from("Cash")));
        assert!(v.validate(&Value::Int(17)));
        assert!(!v.validate(&Value::from("bitcoin")));
        assert!(!v.validate(&Value::Int(0)));
    }

    #[test]
    fn test_numeric_id() {
        let v = NumericIdValidator;
        assert!(v.validate(&Value::Int(98_765)));
        assert!(v.validate(&Value::from("98765")));
        assert!(v.validate(&Value::from("98765.0")));
        assert!(v.validate(&Value::Float(98_765.0)));
        assert!(!v.validate(&Value::Float(98_765.5)));
        assert!(!v.validate(&Value::Int(-4)));
        assert!(!v.validate(&Value::from("12a")));
        assert!(!v.validate(&Value::from("000")));
        assert!(!v.validate(&Value::Null));
    }
}
