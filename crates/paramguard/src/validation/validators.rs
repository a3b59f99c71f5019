//! General-purpose value validators.
//!
//! Every validator is a total predicate: malformed input is invalid, never
//! an error. Bounds and allowed sets are fixed at construction.

use std::collections::BTreeSet;
use std::fmt;

use regex::Regex;

use crate::error::Result;
use crate::value::{Value, format_float, normalize_boolean_like};

/// A stateless rule for one telemetry parameter.
pub trait Validator: Send + Sync {
    /// Whether `value` satisfies the rule.
    fn validate(&self, value: &Value) -> bool;

    /// Human-readable name of the rule.
    fn label(&self) -> String;
}

impl fmt::Debug for dyn Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validator({})", self.label())
    }
}

/// Null, blank, or a literal `null`/`none` string.
pub(crate) fn is_null_like(value: &Value) -> bool {
    if value.is_null() {
        return true;
    }
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.is_empty()
                || trimmed.eq_ignore_ascii_case("null")
                || trimmed.eq_ignore_ascii_case("none")
        }
        _ => false,
    }
}

/// Format a numeric bound without a trailing `.0` on whole numbers.
fn format_bound(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

// =============================================================================
// RANGE
// =============================================================================

/// Numeric value within optional inclusive bounds.
#[derive(Debug, Clone)]
pub struct RangeValidator {
    min: Option<f64>,
    max: Option<f64>,
    allow_null: bool,
}

impl RangeValidator {
    /// Create a range check; either bound may be open.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min,
            max,
            allow_null: false,
        }
    }

    /// Closed interval `[min, max]`.
    pub fn between(min: f64, max: f64) -> Self {
        Self::new(Some(min), Some(max))
    }

    /// `value >= min`.
    pub fn at_least(min: f64) -> Self {
        Self::new(Some(min), None)
    }

    /// `value <= max`.
    pub fn at_most(max: f64) -> Self {
        Self::new(None, Some(max))
    }

    /// Accept missing values.
    pub fn allow_null(mut self) -> Self {
        self.allow_null = true;
        self
    }
}

impl Validator for RangeValidator {
    fn validate(&self, value: &Value) -> bool {
        if value.is_null() {
            return self.allow_null;
        }
        match value.as_f64() {
            Some(v) if !v.is_nan() => {
                self.min.is_none_or(|m| v >= m) && self.max.is_none_or(|m| v <= m)
            }
            _ => false,
        }
    }

    fn label(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("Range [{}, {}]", format_bound(min), format_bound(max)),
            (Some(min), None) => format!("Range >= {}", format_bound(min)),
            (None, Some(max)) => format!("Range <= {}", format_bound(max)),
            (None, None) => "Numeric".to_string(),
        }
    }
}

// =============================================================================
// FIXED SET
// =============================================================================

/// Value drawn from a fixed set of allowed spellings.
///
/// Comparison tolerates the encoding drift seen between exporters:
/// booleans match either `True` or `true`, and whole numbers match either
/// `399` or `399.0`.
#[derive(Debug, Clone)]
pub struct FixedSetValidator {
    allowed: BTreeSet<String>,
    allow_null: bool,
}

impl FixedSetValidator {
    /// Create a set check from the allowed spellings.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: values.into_iter().map(Into::into).collect(),
            allow_null: false,
        }
    }

    /// Accept missing values (null, blank, `"null"`, `"none"`).
    pub fn allow_null(mut self) -> Self {
        self.allow_null = true;
        self
    }

    /// Allowed spellings, sorted.
    pub fn allowed(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }

    /// Every spelling under which `value` may appear in the set.
    fn spellings(value: &Value) -> Vec<String> {
        match value {
            Value::Bool(_) | Value::Json(serde_json::Value::Bool(_)) => {
                normalize_boolean_like(value).map(boolean_spellings).unwrap_or_default()
            }
            Value::Int(i) => vec![i.to_string(), format!("{}.0", i)],
            Value::Float(f) => whole_number_spellings(*f).unwrap_or_else(|| vec![format_float(*f)]),
            Value::String(s) => {
                let trimmed = s.trim().to_string();
                match trimmed.parse::<f64>().ok().and_then(whole_number_spellings) {
                    Some(mut forms) => {
                        forms.insert(0, trimmed);
                        forms
                    }
                    None => vec![trimmed],
                }
            }
            other => vec![other.to_text().trim().to_string()],
        }
    }
}

/// `True` and `true` for a decoded flag.
fn boolean_spellings(flag: bool) -> Vec<String> {
    let capitalized = if flag { "True" } else { "False" };
    vec![capitalized.to_string(), flag.to_string()]
}

/// `399.0` and `399` for a whole, finite float.
fn whole_number_spellings(f: f64) -> Option<Vec<String>> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        Some(vec![format!("{:.1}", f), format!("{}", f as i64)])
    } else {
        None
    }
}

impl Validator for FixedSetValidator {
    fn validate(&self, value: &Value) -> bool {
        if is_null_like(value) {
            return self.allow_null;
        }
        Self::spellings(value)
            .iter()
            .any(|form| self.allowed.contains(form))
    }

    fn label(&self) -> String {
        let shown: Vec<&str> = self.allowed.iter().take(5).map(String::as_str).collect();
        if self.allowed.len() > 5 {
            format!("One of: {}, ... ({} values)", shown.join(", "), self.allowed.len())
        } else {
            format!("One of: {}", shown.join(", "))
        }
    }
}

// =============================================================================
// FORMAT
// =============================================================================

/// Text form of the value matches a regex, anchored at the start.
///
/// Null is matched as its text form `None`, like any other value.
#[derive(Debug, Clone)]
pub struct FormatValidator {
    regex: Regex,
    name: String,
}

impl FormatValidator {
    /// Compile a format check. The pattern must match from the first
    /// character; anchor the end explicitly with `$` when needed.
    pub fn new(pattern: &str, name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            name: name.into(),
        })
    }
}

impl Validator for FormatValidator {
    fn validate(&self, value: &Value) -> bool {
        let text = value.to_text();
        self.regex.find(&text).is_some_and(|m| m.start() == 0)
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

// =============================================================================
// BOOLEAN
// =============================================================================

/// Any of the boolean encodings understood by [`normalize_boolean_like`].
#[derive(Debug, Clone, Default)]
pub struct BooleanValidator {
    allow_null: bool,
}

impl BooleanValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept missing values.
    pub fn allow_null(mut self) -> Self {
        self.allow_null = true;
        self
    }
}

impl Validator for BooleanValidator {
    fn validate(&self, value: &Value) -> bool {
        if value.is_null() {
            return self.allow_null;
        }
        normalize_boolean_like(value).is_some()
    }

    fn label(&self) -> String {
        "Boolean".to_string()
    }
}

// =============================================================================
// LIST
// =============================================================================

/// What each element of a list must satisfy.
pub enum ListRule {
    /// Each element passes the inner validator.
    Items(Box<dyn Validator>),
    /// No constraint on elements.
    Any,
}

/// A comma-joined string, JSON array string, or native list whose every
/// element satisfies the configured rule.
pub struct ListValidator {
    rule: ListRule,
    separator: char,
    allow_empty: bool,
}

impl ListValidator {
    /// Elements must pass `item`.
    pub fn of(item: impl Validator + 'static) -> Self {
        Self {
            rule: ListRule::Items(Box::new(item)),
            separator: ',',
            allow_empty: true,
        }
    }

    /// Elements must be drawn from `values`.
    pub fn of_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::of(FixedSetValidator::new(values))
    }

    /// Any list is accepted.
    pub fn any() -> Self {
        Self {
            rule: ListRule::Any,
            separator: ',',
            allow_empty: true,
        }
    }

    /// Use a different separator for joined strings.
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Reject null and empty lists.
    pub fn non_empty(mut self) -> Self {
        self.allow_empty = false;
        self
    }

    fn elements(&self, value: &Value) -> Option<Vec<Value>> {
        match value {
            Value::List(items) => Some(items.clone()),
            Value::Json(serde_json::Value::Array(items)) => {
                Some(items.iter().cloned().map(Value::from).collect())
            }
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Some(Vec::new());
                }
                if trimmed.starts_with('[') {
                    return match serde_json::from_str::<serde_json::Value>(trimmed) {
                        Ok(serde_json::Value::Array(items)) => {
                            Some(items.into_iter().map(Value::from).collect())
                        }
                        _ => None,
                    };
                }
                Some(
                    trimmed
                        .split(self.separator)
                        .map(|part| Value::String(part.trim().to_string()))
                        .collect(),
                )
            }
            // A single scalar is a one-element list
            Value::Int(_) | Value::Float(_) | Value::Bool(_) => Some(vec![value.clone()]),
            _ => None,
        }
    }
}

impl Validator for ListValidator {
    fn validate(&self, value: &Value) -> bool {
        if value.is_null() {
            return self.allow_empty;
        }
        let Some(elements) = self.elements(value) else {
            return false;
        };
        if elements.is_empty() {
            return self.allow_empty;
        }
        match &self.rule {
            ListRule::Any => true,
            ListRule::Items(item) => elements.iter().all(|e| item.validate(e)),
        }
    }

    fn label(&self) -> String {
        match &self.rule {
            ListRule::Any => "List".to_string(),
            ListRule::Items(item) => format!("List of {}", item.label()),
        }
    }
}

// =============================================================================
// INTERRUPTED
// =============================================================================

/// The `interrupted` flag of session events.
///
/// Older clients emit `1.0` for sessions that were *not* interrupted, so a
/// float `1.0` is read as `0.0` before the check. The column is FLOAT-typed
/// upstream: a literal integer is not a valid encoding and is rejected.
#[derive(Debug, Clone, Default)]
pub struct InterruptedValidator;

impl InterruptedValidator {
    pub fn new() -> Self {
        Self
    }
}

fn is_integer_encoding(value: &Value) -> bool {
    match value {
        Value::Int(_) => true,
        Value::String(s) => s.trim().parse::<i64>().is_ok(),
        Value::Json(serde_json::Value::Number(n)) => n.is_i64() || n.is_u64(),
        _ => false,
    }
}

impl Validator for InterruptedValidator {
    fn validate(&self, value: &Value) -> bool {
        if is_integer_encoding(value) {
            return false;
        }
        let value = match value {
            Value::Float(f) if *f == 1.0 => Value::Float(0.0),
            other => other.clone(),
        };
        normalize_boolean_like(&value).is_some()
    }

    fn label(&self) -> String {
        "Interrupted Flag".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_inclusive() {
        let v = RangeValidator::between(1.0, 5.0);
        assert!(v.validate(&Value::Int(1)));
        assert!(v.validate(&Value::Int(5)));
        assert!(v.validate(&Value::from("3.5")));
        assert!(!v.validate(&Value::Float(5.0001)));
        assert!(!v.validate(&Value::Float(0.999)));
    }

    #[test]
    fn test_range_rejects_non_numeric_and_null() {
        let v = RangeValidator::at_least(0.0);
        assert!(!v.validate(&Value::from("lots")));
        assert!(!v.validate(&Value::Null));
        assert!(!v.validate(&Value::Float(f64::NAN)));
        assert!(RangeValidator::at_least(0.0).allow_null().validate(&Value::Null));
    }

    #[test]
    fn test_range_open_bounds() {
        assert!(RangeValidator::at_most(10.0).validate(&Value::Int(-1_000)));
        assert!(RangeValidator::new(None, None).validate(&Value::Float(1e300)));
    }

    #[test]
    fn test_range_label() {
        assert_eq!(RangeValidator::between(0.0, 100.0).label(), "Range [0, 100]");
        assert_eq!(RangeValidator::at_least(0.5).label(), "Range >= 0.5");
    }

    #[test]
    fn test_fixed_set_float_int_drift() {
        let v = FixedSetValidator::new(["0", "1"]);
        assert!(v.validate(&Value::Float(0.0)));
        assert!(v.validate(&Value::from("1.0")));
        assert!(v.validate(&Value::Int(1)));
        assert!(!v.validate(&Value::Int(2)));
        assert!(!v.validate(&Value::Float(0.5)));

        let prices = FixedSetValidator::new(["399.0"]);
        assert!(prices.validate(&Value::Int(399)));
        assert!(prices.validate(&Value::from("399")));
    }

    #[test]
    fn test_fixed_set_booleans() {
        let upper = FixedSetValidator::new(["True", "False"]);
        assert!(upper.validate(&Value::Bool(true)));
        let lower = FixedSetValidator::new(["true", "false"]);
        assert!(lower.validate(&Value::Bool(false)));
    }

    #[test]
    fn test_fixed_set_null_handling() {
        let strict = FixedSetValidator::new(["a"]);
        assert!(!strict.validate(&Value::Null));
        assert!(!strict.validate(&Value::from("  ")));

        let lenient = FixedSetValidator::new(["a"]).allow_null();
        assert!(lenient.validate(&Value::from("None")));
        assert!(lenient.validate(&Value::from("null")));
        assert!(lenient.validate(&Value::from("")));
    }

    #[test]
    fn test_fixed_set_strips_strings() {
        let v = FixedSetValidator::new(["Paid", "Free"]);
        assert!(v.validate(&Value::from(" Paid ")));
        assert!(!v.validate(&Value::from("paid")));
    }

    #[test]
    fn test_format_anchored_at_start() {
        let v = FormatValidator::new(r"\d{3}", "Three digits").unwrap();
        assert!(v.validate(&Value::from("123abc")));
        assert!(!v.validate(&Value::from("abc123")));
        assert!(v.validate(&Value::Int(12345)));
        assert!(!v.validate(&Value::Null));
    }

    #[test]
    fn test_format_matches_null_as_text() {
        let letters = FormatValidator::new(r"^[A-Za-z]+$", "Letters").unwrap();
        assert!(letters.validate(&Value::Null));
        assert!(letters.validate(&Value::from("None")));

        let lower = FormatValidator::new(r"^[a-z]+$", "Lowercase").unwrap();
        assert!(!lower.validate(&Value::Null));
    }

    #[test]
    fn test_list_joined_string() {
        let v = ListValidator::of_values(["a", "b", "c"]);
        assert!(v.validate(&Value::from("a, b,c")));
        assert!(!v.validate(&Value::from("a,d")));
        assert!(v.validate(&Value::from("")));
        assert!(v.validate(&Value::List(vec![Value::from("b")])));
    }

    #[test]
    fn test_list_json_array_string() {
        let v = ListValidator::of(RangeValidator::between(1.0, 5.0));
        assert!(v.validate(&Value::from("[1, 2, 5]")));
        assert!(!v.validate(&Value::from("[1, 9]")));
        assert!(!v.validate(&Value::from("[1, 2")));
    }

    #[test]
    fn test_list_non_empty_and_any() {
        let v = ListValidator::any().non_empty();
        assert!(!v.validate(&Value::Null));
        assert!(!v.validate(&Value::from("")));
        assert!(v.validate(&Value::from("x;y")));
        assert!(ListValidator::of_values(["x", "y"]).separator(';').validate(&Value::from("x;y")));
    }

    #[test]
    fn test_interrupted_quirk() {
        let v = InterruptedValidator::new();
        assert!(v.validate(&Value::Float(1.0)));
        assert!(v.validate(&Value::Float(0.0)));
        assert!(!v.validate(&Value::Int(1)));
        assert!(!v.validate(&Value::Int(0)));
        assert!(!v.validate(&Value::Float(2.0)));
        assert!(v.validate(&Value::Bool(true)));
        assert!(!v.validate(&Value::Null));
    }

    #[test]
    fn test_interrupted_shares_boolean_decoding() {
        let v = InterruptedValidator::new();
        assert!(v.validate(&Value::from("1.0")));
        assert!(v.validate(&Value::from(" FALSE ")));
        assert!(v.validate(&Value::Json(serde_json::json!(true))));
        assert!(v.validate(&Value::Json(serde_json::json!(1.0))));
        assert!(!v.validate(&Value::from("1")));
        assert!(!v.validate(&Value::Json(serde_json::json!(0))));
        assert!(!v.validate(&Value::from("yes")));
    }

    #[test]
    fn test_fixed_set_json_booleans() {
        let v = FixedSetValidator::new(["True"]);
        assert!(v.validate(&Value::Json(serde_json::json!(true))));
        assert!(!v.validate(&Value::Json(serde_json::json!(false))));
    }

    #[test]
    fn test_boolean() {
        let v = BooleanValidator::new();
        assert!(v.validate(&Value::from("True")));
        assert!(v.validate(&Value::Float(0.0)));
        assert!(!v.validate(&Value::from("maybe")));
        assert!(!v.validate(&Value::Null));
    }
}
