//! Signal checks over whole columns.

use indexmap::IndexSet;

use crate::value::Value;

/// Sample placeholder for a column with no non-null values.
pub const ALL_NULL: &str = "(all null)";

/// Sample placeholder for a column holding only blanks or zero literals.
pub const ALL_EMPTY_OR_ZERO: &str = "(all empty/zero)";

const ZERO_LITERALS: &[&str] = &["0", "0.0", "0.00"];

fn present_texts(column: &[Value]) -> impl Iterator<Item = String> + '_ {
    column
        .iter()
        .filter(|v| !v.is_null())
        .map(|v| v.to_text().trim().to_string())
}

fn is_zero_literal(text: &str) -> bool {
    ZERO_LITERALS.contains(&text)
}

/// Whether a column carries no meaningful signal.
///
/// True when the column is entirely null, when every non-null value is
/// blank, or when every non-null value is one of `"0"`, `"0.0"`, `"0.00"`.
/// A column that mixes blanks with zero literals carries signal.
pub fn is_effectively_null(column: &[Value]) -> bool {
    let texts: Vec<String> = present_texts(column).collect();
    if texts.is_empty() {
        return true;
    }
    if texts.iter().all(|t| t.is_empty()) {
        return true;
    }
    texts.iter().all(|t| is_zero_literal(t))
}

/// Up to `limit` distinct meaningful values, in first-seen order.
///
/// Blank and zero-literal values are skipped. When nothing remains, the
/// result is a single placeholder: [`ALL_NULL`] if the column had no
/// non-null values, otherwise [`ALL_EMPTY_OR_ZERO`]. A zero `limit`
/// yields no samples.
pub fn sample_values(column: &[Value], limit: usize) -> Vec<String> {
    if limit == 0 {
        return Vec::new();
    }
    let mut saw_present = false;
    let mut samples: IndexSet<String> = IndexSet::new();

    for text in present_texts(column) {
        saw_present = true;
        if text.is_empty() || is_zero_literal(&text) {
            continue;
        }
        samples.insert(text);
        if samples.len() >= limit {
            break;
        }
    }

    if samples.is_empty() {
        let sentinel = if saw_present { ALL_EMPTY_OR_ZERO } else { ALL_NULL };
        return vec![sentinel.to_string()];
    }
    samples.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<Value> {
        values.iter().map(|s| Value::from(*s)).collect()
    }

    #[test]
    fn test_all_null_column() {
        assert!(is_effectively_null(&[Value::Null, Value::Null]));
        assert!(is_effectively_null(&[]));
        assert!(is_effectively_null(&[Value::Float(f64::NAN)]));
    }

    #[test]
    fn test_zero_literals_with_nulls() {
        let column = vec![Value::from("0"), Value::from("0.0"), Value::Null];
        assert!(is_effectively_null(&column));
        assert!(is_effectively_null(&[Value::Int(0), Value::Float(0.0)]));
    }

    #[test]
    fn test_blank_strings() {
        assert!(is_effectively_null(&strings(&["", "   ", "\t"])));
    }

    #[test]
    fn test_signal_present() {
        assert!(!is_effectively_null(&strings(&["0", "1"])));
        assert!(!is_effectively_null(&[Value::Int(5), Value::from("5")]));
        assert!(!is_effectively_null(&[Value::Bool(false)]));
    }

    #[test]
    fn test_blank_and_zero_mix_is_signal() {
        assert!(!is_effectively_null(&strings(&["", "0"])));
    }

    #[test]
    fn test_sample_values_skip_noise() {
        let column = vec![
            Value::Null,
            Value::from(" 0 "),
            Value::from("x"),
            Value::from(""),
            Value::from("y"),
            Value::from("x"),
            Value::from("z"),
            Value::from("w"),
        ];
        assert_eq!(sample_values(&column, 3), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_sample_values_trim() {
        let column = strings(&["  alpha ", "alpha"]);
        assert_eq!(sample_values(&column, 3), vec!["alpha"]);
    }

    #[test]
    fn test_sample_sentinels() {
        assert_eq!(sample_values(&[Value::Null], 3), vec![ALL_NULL]);
        assert_eq!(sample_values(&strings(&["0", ""]), 3), vec![ALL_EMPTY_OR_ZERO]);
    }

    #[test]
    fn test_sample_values_zero_limit() {
        assert!(sample_values(&strings(&["x", "y"]), 0).is_empty());
        assert!(sample_values(&[Value::Null], 0).is_empty());
        assert_eq!(sample_values(&strings(&["x", "y"]), 1), vec!["x"]);
    }
}
