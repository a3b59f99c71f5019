//! Parameter name → validator lookup.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::clock::{Clock, SystemClock};
use crate::error::{ParamguardError, Result};
use crate::value::Value;

use super::rules::default_rules;
use super::validators::Validator;

/// One registered rule.
pub type Rule = (String, Box<dyn Validator>);

/// Ordered collection of rules, before uniqueness is checked.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `validator` for `parameter`.
    pub fn add(&mut self, parameter: impl Into<String>, validator: impl Validator + 'static) -> &mut Self {
        self.rules.push((parameter.into(), Box::new(validator)));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl IntoIterator for RuleSet {
    type Item = Rule;
    type IntoIter = std::vec::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

static GLOBAL: Lazy<ValidatorRegistry> = Lazy::new(|| {
    ValidatorRegistry::with_clock(Arc::new(SystemClock))
        .expect("default validator table has unique, well-formed rules")
});

/// Immutable mapping from parameter name to its validator.
///
/// Parameters without a rule are unconstrained: looking one up validates
/// every value.
pub struct ValidatorRegistry {
    validators: HashMap<String, Box<dyn Validator>>,
}

impl ValidatorRegistry {
    /// Build a registry; fails if a parameter name repeats.
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Result<Self> {
        let mut validators = HashMap::new();
        for (name, validator) in rules {
            if validators.contains_key(&name) {
                return Err(ParamguardError::DuplicateParameter(name));
            }
            validators.insert(name, validator);
        }
        Ok(Self { validators })
    }

    /// The default rule table, with freshness checks reading `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Result<Self> {
        Self::from_rules(default_rules(clock)?)
    }

    /// Process-wide default registry on the system clock.
    pub fn global() -> &'static ValidatorRegistry {
        &GLOBAL
    }

    /// Validator registered for `parameter`.
    pub fn get(&self, parameter: &str) -> Option<&dyn Validator> {
        self.validators.get(parameter).map(|v| v.as_ref())
    }

    pub fn contains(&self, parameter: &str) -> bool {
        self.validators.contains_key(parameter)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Registered parameter names, sorted.
    pub fn parameters(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Check one value. Unknown parameters always pass.
    pub fn validate(&self, parameter: &str, value: &Value) -> bool {
        match self.get(parameter) {
            Some(validator) => validator.validate(value),
            None => true,
        }
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("parameters", &self.validators.len())
            .finish()
    }
}

/// Validate one parameter value against the global registry.
///
/// Parameters the registry does not know are always valid.
pub fn validate_parameter(parameter: &str, value: &Value) -> bool {
    ValidatorRegistry::global().validate(parameter, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FixedSetValidator, RangeValidator};

    #[test]
    fn test_unknown_parameter_passes() {
        assert!(validate_parameter("definitely_not_registered", &Value::from("anything")));
        assert!(validate_parameter("definitely_not_registered", &Value::Null));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut rules = RuleSet::new();
        rules
            .add("coins", RangeValidator::at_least(0.0))
            .add("coins", RangeValidator::at_most(10.0));

        let result = ValidatorRegistry::from_rules(rules);
        assert!(matches!(result, Err(ParamguardError::DuplicateParameter(name)) if name == "coins"));
    }

    #[test]
    fn test_custom_registry_dispatch() {
        let mut rules = RuleSet::new();
        rules
            .add("coins", RangeValidator::at_least(0.0))
            .add("platform", FixedSetValidator::new(["iOS", "Android"]));
        let registry = ValidatorRegistry::from_rules(rules).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.parameters(), vec!["coins", "platform"]);
        assert!(registry.validate("coins", &Value::Int(3)));
        assert!(!registry.validate("coins", &Value::Int(-3)));
        assert!(!registry.validate("platform", &Value::from("Symbian")));
        assert!(registry.validate("other", &Value::from("Symbian")));
    }

    #[test]
    fn test_global_registry_builds() {
        let registry = ValidatorRegistry::global();
        assert!(!registry.is_empty());
        assert!(registry.contains("interrupted"));
        assert!(registry.contains("presented_offers"));
    }

    #[test]
    fn test_validate_parameter_is_pure() {
        let value = Value::from("GPA.3312-5521-0981-44271");
        let first = validate_parameter("transaction_id", &value);
        for _ in 0..10 {
            assert_eq!(validate_parameter("transaction_id", &value), first);
        }
        assert!(first);
    }
}
