//! Rule inference from observed column values.
//!
//! Used to label drift candidates with the kind of validation they would
//! need. Inference only looks at the column itself.

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::parse_iso;
use crate::value::{Value, normalize_boolean_like};

use super::nullness::{ALL_EMPTY_OR_ZERO, ALL_NULL, sample_values};

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("valid regex"));

static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("valid regex")
});

static MD5: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{32}$").expect("valid regex"));

static VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d+){1,3}$").expect("valid regex"));

const MIN_IDENTIFIER_LENGTH: usize = 8;
const MAX_CATEGORIES: usize = 10;
const LONG_TEXT: usize = 50;
const SHORT_TEXT: usize = 20;

// =============================================================================
// INFERRED RULES
// =============================================================================

/// Well-known string shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Uuid,
    Md5,
    Version,
}

/// Rule a column's values appear to follow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InferredRule {
    Boolean,
    Timestamp,
    Json,
    /// Long digit strings, every value unique.
    Identifier,
    NumericRange { min: f64, max: f64 },
    Categorical { values: Vec<String> },
    Pattern { pattern: PatternKind },
}

impl InferredRule {
    /// Human-readable name, as shown in drift reports.
    pub fn label(&self) -> String {
        match self {
            InferredRule::Boolean => "Boolean".to_string(),
            InferredRule::Timestamp => "Timestamp".to_string(),
            InferredRule::Json => "JSON".to_string(),
            InferredRule::Identifier => "Identifier".to_string(),
            InferredRule::NumericRange { min, max } => {
                format!("Range [{}, {}]", number(*min), number(*max))
            }
            InferredRule::Categorical { values } => {
                format!("Categorical ({} values)", values.len())
            }
            InferredRule::Pattern { pattern } => match pattern {
                PatternKind::Uuid => "UUID".to_string(),
                PatternKind::Md5 => "MD5 Hash".to_string(),
                PatternKind::Version => "Version".to_string(),
            },
        }
    }
}

impl fmt::Display for InferredRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Infer a rule from a column's non-blank values.
///
/// Returns `None` when the column has no meaningful values or looks like
/// free text.
pub fn infer_rule(column: &[Value]) -> Option<InferredRule> {
    let texts: Vec<String> = column
        .iter()
        .filter(|v| !v.is_null())
        .map(|v| v.to_text().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if texts.is_empty() {
        return None;
    }

    if texts
        .iter()
        .all(|t| normalize_boolean_like(&Value::String(t.clone())).is_some())
    {
        return Some(InferredRule::Boolean);
    }

    if texts
        .iter()
        .all(|t| t.parse::<f64>().is_err() && parse_iso(t).is_some())
    {
        return Some(InferredRule::Timestamp);
    }

    if texts.iter().all(|t| looks_like_json(t)) {
        return Some(InferredRule::Json);
    }

    let distinct: BTreeSet<&str> = texts.iter().map(String::as_str).collect();

    if distinct.len() == texts.len()
        && texts
            .iter()
            .all(|t| t.len() >= MIN_IDENTIFIER_LENGTH && DIGITS.is_match(t))
    {
        return Some(InferredRule::Identifier);
    }

    let numbers: Option<Vec<f64>> = texts.iter().map(|t| t.parse::<f64>().ok()).collect();
    if let Some(numbers) = numbers.filter(|n| n.iter().all(|x| x.is_finite())) {
        let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
        let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        return Some(InferredRule::NumericRange { min, max });
    }

    if distinct.len() <= MAX_CATEGORIES {
        return Some(InferredRule::Categorical {
            values: distinct.into_iter().map(str::to_string).collect(),
        });
    }

    [
        (PatternKind::Uuid, &*UUID),
        (PatternKind::Md5, &*MD5),
        (PatternKind::Version, &*VERSION),
    ]
    .into_iter()
    .find(|(_, regex)| texts.iter().all(|t| regex.is_match(t)))
    .map(|(pattern, _)| InferredRule::Pattern { pattern })
}

fn looks_like_json(text: &str) -> bool {
    (text.starts_with('{') || text.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(text).is_ok()
}

/// Label describing what kind of validation a column needs.
///
/// Falls back to a shape guess over the sampled values when no rule can be
/// inferred.
pub fn validation_type_label(column: &[Value]) -> String {
    if let Some(rule) = infer_rule(column) {
        return rule.label();
    }

    let samples = sample_values(column, 3);
    if samples
        .iter()
        .all(|s| s == ALL_NULL || s == ALL_EMPTY_OR_ZERO)
    {
        return "Unknown".to_string();
    }
    fallback_label(&samples)
}

fn fallback_label(samples: &[String]) -> String {
    if samples.iter().all(|s| DIGITS.is_match(s)) {
        "Numeric".to_string()
    } else if samples.iter().any(|s| s.chars().count() > LONG_TEXT) {
        "Long Text".to_string()
    } else if samples.iter().all(|s| s.chars().count() <= SHORT_TEXT) {
        "Short Text".to_string()
    } else {
        "Text".to_string()
    }
}
