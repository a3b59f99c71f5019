//! Dynamically-typed telemetry values.
//!
//! Event parameters arrive through several serialization layers (CSV
//! exports, JSON payloads, warehouse FLOAT columns), so the same logical
//! value shows up as `"True"`, `1`, `1.0` or `"1"`. [`Value`] keeps the
//! shape it arrived in; validators decide what each shape means.

use serde::{Deserialize, Serialize};

/// A single telemetry value in whatever encoding it was captured.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    /// Structured payload (objects, nested arrays).
    Json(serde_json::Value),
}

/// Cell contents treated as missing when loading delimited files.
const NULL_TOKENS: &[&str] = &["na", "n/a", "null", "none", "nan", "nil", "<na>"];

impl Value {
    /// Convert a raw CSV cell into a value.
    ///
    /// Null tokens become [`Value::Null`]; everything else stays a string,
    /// exactly as captured.
    pub fn from_cell(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() || NULL_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t)) {
            Value::Null
        } else {
            Value::String(cell.to_string())
        }
    }

    /// Returns true for `Null` and NaN floats.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            Value::Json(serde_json::Value::Null) => true,
            _ => false,
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Json(serde_json::Value::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    /// Canonical text form used for set membership and pattern checks.
    ///
    /// Whole floats keep one decimal place (`399.0`), booleans are
    /// capitalised (`True`), and null renders as `None`.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => "None".to_string(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::String(s) => s.clone(),
            Value::List(items) => {
                serde_json::to_string(items).unwrap_or_default()
            }
            Value::Json(serde_json::Value::String(s)) => s.clone(),
            Value::Json(json) => json.to_string(),
        }
    }

    /// Structured view of the value.
    ///
    /// Strings are parsed as JSON documents; anything that does not parse
    /// yields `None`.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        match self {
            Value::String(s) => serde_json::from_str(s.trim()).ok(),
            Value::Json(json) => Some(json.clone()),
            Value::List(items) => serde_json::to_value(items).ok(),
            Value::Null => None,
            Value::Bool(b) => Some(serde_json::Value::Bool(*b)),
            Value::Int(i) => Some(serde_json::Value::from(*i)),
            Value::Float(f) => serde_json::Number::from_f64(*f).map(serde_json::Value::Number),
        }
    }
}

/// Render a float the way the upstream exporters do: whole numbers keep a
/// trailing `.0`, everything else uses the shortest round-trip form.
pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else if f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

/// Decode the many encodings of a boolean flag.
///
/// Accepts native booleans, `0`/`1` integers, `0.0`/`1.0` floats and the
/// strings `true`, `false`, `1`, `0`, `1.0`, `0.0` in any case.
pub fn normalize_boolean_like(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Int(0) => Some(false),
        Value::Int(1) => Some(true),
        Value::Float(f) if *f == 0.0 => Some(false),
        Value::Float(f) if *f == 1.0 => Some(true),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "1.0" => Some(true),
            "false" | "0" | "0.0" => Some(false),
            _ => None,
        },
        Value::Json(json) => match json {
            serde_json::Value::Bool(b) => Some(*b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) if f == 0.0 => Some(false),
                Some(f) if f == 1.0 => Some(true),
                _ => None,
            },
            serde_json::Value::String(s) => normalize_boolean_like(&Value::String(s.clone())),
            _ => None,
        },
        _ => None,
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            obj @ serde_json::Value::Object(_) => Value::Json(obj),
        }
    }
}
