//! Check command - validate one parameter value.

use colored::Colorize;
use paramguard::{Value, ValidatorRegistry};

/// Interpret the raw argument. With `typed`, JSON scalars become numbers,
/// booleans or null; everything else stays text.
fn parse_value(raw: &str, typed: bool) -> Value {
    if !typed {
        return Value::from(raw);
    }
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json @ (serde_json::Value::Null
        | serde_json::Value::Bool(_)
        | serde_json::Value::Number(_))) => Value::from(json),
        _ => Value::from(raw),
    }
}

pub fn run(parameter: String, raw: String, typed: bool) -> Result<(), Box<dyn std::error::Error>> {
    let registry = ValidatorRegistry::global();
    let value = parse_value(&raw, typed);

    let Some(validator) = registry.get(&parameter) else {
        println!(
            "{} {} (no rule registered)",
            "valid".green().bold(),
            parameter.white()
        );
        return Ok(());
    };

    if validator.validate(&value) {
        println!("{} {}", "valid".green().bold(), parameter.white());
    } else {
        println!("{} {}", "invalid".red().bold(), parameter.white());
    }
    println!("  rule:  {}", validator.label());
    println!("  value: {:?}", value);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("1.0", false), Value::from("1.0"));
        assert_eq!(parse_value("1.0", true), Value::Float(1.0));
        assert_eq!(parse_value("1", true), Value::Int(1));
        assert_eq!(parse_value("true", true), Value::Bool(true));
        assert_eq!(parse_value("null", true), Value::Null);
        assert_eq!(parse_value("[1, 2]", true), Value::from("[1, 2]"));
        assert_eq!(parse_value("hello", true), Value::from("hello"));
    }
}
