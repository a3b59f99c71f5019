//! Timestamp validators.
//!
//! Clients report time as ISO-8601 strings, Unix seconds, Unix
//! milliseconds, or seconds with a fractional part. [`parse_timestamp`]
//! understands all of them and yields a naive UTC datetime.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::clock::Clock;
use crate::value::Value;

use super::validators::Validator;

/// Numbers above this are milliseconds, at or below it seconds.
const MILLIS_THRESHOLD: f64 = 1e12;

/// 2000-01-01T00:00:00Z.
const EARLIEST_PLAUSIBLE_SECS: f64 = 946_684_800.0;

/// 2100-01-01T00:00:00Z.
const LATEST_PLAUSIBLE_SECS: f64 = 4_102_444_800.0;

static CLIENT_TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{10}\.\d{1,6}$").expect("valid client timestamp pattern"));

static NUMERIC_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d+)?$").expect("valid numeric pattern"));

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%z"];

/// Parse any supported timestamp encoding.
pub fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Int(i) => from_unix(*i as f64),
        Value::Float(f) => from_unix(*f),
        Value::String(s) => {
            let trimmed = s.trim();
            if NUMERIC_TEXT.is_match(trimmed) {
                trimmed.parse::<f64>().ok().and_then(from_unix)
            } else {
                parse_iso(trimmed)
            }
        }
        Value::Json(serde_json::Value::String(s)) => parse_timestamp(&Value::String(s.clone())),
        _ => None,
    }
}

/// Interpret a Unix timestamp, seconds or milliseconds by magnitude.
pub fn from_unix(raw: f64) -> Option<NaiveDateTime> {
    if !raw.is_finite() || raw < 0.0 {
        return None;
    }
    let secs = if raw > MILLIS_THRESHOLD { raw / 1000.0 } else { raw };
    let whole = secs.trunc();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos).map(|dt| dt.naive_utc())
}

/// Parse an ISO-8601 string, with or without offset, `T` or space
/// separated, or a bare date.
pub fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    let mut text = s.trim().to_string();
    if let Some(stripped) = text.strip_suffix(" UTC") {
        text = stripped.to_string();
    }
    if text.len() > 10 && text.as_bytes()[10] == b' ' {
        text.replace_range(10..11, "T");
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
        return Some(dt.naive_utc());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&text, format) {
            return Some(dt.naive_utc());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn plausible_secs(secs: f64) -> bool {
    (EARLIEST_PLAUSIBLE_SECS..=LATEST_PLAUSIBLE_SECS).contains(&secs)
}

/// Whole-number view of a value, for integer epoch encodings.
fn whole_number(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) if f.fract() == 0.0 => Some(*f),
        Value::String(s) => {
            let t = s.trim();
            let digits = t.strip_suffix(".0").unwrap_or(t);
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                digits.parse::<f64>().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// ISO-8601 text.
#[derive(Debug, Clone, Default)]
pub struct IsoTimestampValidator {
    allow_null: bool,
}

impl IsoTimestampValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept missing values.
    pub fn allow_null(mut self) -> Self {
        self.allow_null = true;
        self
    }
}

impl Validator for IsoTimestampValidator {
    fn validate(&self, value: &Value) -> bool {
        match value {
            v if v.is_null() => self.allow_null,
            Value::String(s) => parse_iso(s).is_some(),
            _ => false,
        }
    }

    fn label(&self) -> String {
        "ISO Timestamp".to_string()
    }
}

/// Integer Unix seconds between 2000 and 2100.
#[derive(Debug, Clone, Default)]
pub struct UnixSecondsValidator;

impl Validator for UnixSecondsValidator {
    fn validate(&self, value: &Value) -> bool {
        whole_number(value).is_some_and(plausible_secs)
    }

    fn label(&self) -> String {
        "Unix Timestamp (s)".to_string()
    }
}

/// Integer Unix milliseconds between 2000 and 2100.
#[derive(Debug, Clone, Default)]
pub struct UnixMillisValidator;

impl Validator for UnixMillisValidator {
    fn validate(&self, value: &Value) -> bool {
        whole_number(value).is_some_and(|ms| plausible_secs(ms / 1000.0))
    }

    fn label(&self) -> String {
        "Unix Timestamp (ms)".to_string()
    }
}

/// Client-side clock reading: ten-digit seconds with a fractional part,
/// e.g. `1718035200.125`.
#[derive(Debug, Clone, Default)]
pub struct ClientTimestampValidator;

impl Validator for ClientTimestampValidator {
    fn validate(&self, value: &Value) -> bool {
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Float(f) if f.is_finite() => value.to_text(),
            _ => return false,
        };
        CLIENT_TIMESTAMP.is_match(&text)
            && text.parse::<f64>().is_ok_and(plausible_secs)
    }

    fn label(&self) -> String {
        "Client Timestamp (s.fff)".to_string()
    }
}

/// Epoch seconds or milliseconds, with or without a fractional part.
#[derive(Debug, Clone, Default)]
pub struct DecimalTimestampValidator;

impl Validator for DecimalTimestampValidator {
    fn validate(&self, value: &Value) -> bool {
        let raw = match value {
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
            Value::String(s) if NUMERIC_TEXT.is_match(s.trim()) => {
                match s.trim().parse::<f64>() {
                    Ok(f) => f,
                    Err(_) => return false,
                }
            }
            _ => return false,
        };
        if !raw.is_finite() {
            return false;
        }
        let secs = if raw > MILLIS_THRESHOLD { raw / 1000.0 } else { raw };
        plausible_secs(secs)
    }

    fn label(&self) -> String {
        "Decimal Timestamp".to_string()
    }
}

/// Freshness check: the timestamp, in any supported encoding, falls within
/// `[now - max_age, now + max_ahead]`.
pub struct TimeValidator {
    clock: Arc<dyn Clock>,
    max_age: Duration,
    max_ahead: Duration,
}

impl TimeValidator {
    /// Default window: five days back, one day ahead.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            max_age: Duration::days(5),
            max_ahead: Duration::days(1),
        }
    }

    /// Override the window.
    pub fn with_window(mut self, max_age: Duration, max_ahead: Duration) -> Self {
        self.max_age = max_age;
        self.max_ahead = max_ahead;
        self
    }
}

impl Validator for TimeValidator {
    fn validate(&self, value: &Value) -> bool {
        let Some(ts) = parse_timestamp(value) else {
            return false;
        };
        let now = self.clock.now();
        ts >= now - self.max_age && ts <= now + self.max_ahead
    }

    fn label(&self) -> String {
        format!(
            "Timestamp within -{}d/+{}d of now",
            self.max_age.num_days(),
            self.max_ahead.num_days()
        )
    }
}
