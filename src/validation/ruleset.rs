//! Ordered rule execution against one input object
//!
//! A [`RuleSet`] runs every rule in declaration order and reports every
//! violation at once — there is no short-circuit on first failure, so
//! form-style clients see the complete picture in one round trip.

use serde_json::Value;

use super::rule::{FieldError, Rule};

/// Aggregate outcome of running a rule set
///
/// Created fresh per validation call and immutable once returned. Error
/// ordering follows rule declaration order.
#[derive(Debug, Clone)]
pub struct Verdict {
    errors: Vec<FieldError>,
}

impl Verdict {
    /// True iff no rule reported a violation
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The ordered violations, possibly empty
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Consume the verdict, keeping the ordered violations
    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

/// An ordered set of rules evaluated together
///
/// The set holds no per-call state: one instance can validate arbitrarily
/// many inputs concurrently.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Empty rule set
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append one rule, builder style
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Number of rules in the set
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set holds no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule against `input` in declaration order
    ///
    /// A null or non-object input is treated as an object with every field
    /// absent: required rules fail normally, nothing panics.
    pub fn validate(&self, input: &Value) -> Verdict {
        let errors = self
            .rules
            .iter()
            .filter_map(|rule| rule.apply(input))
            .collect();
        Verdict { errors }
    }

    /// Merge another set after this one (AND semantics)
    ///
    /// On an input failing both, the combined verdict lists this set's
    /// violations first, then `other`'s, each in their original order.
    pub fn combine(mut self, other: RuleSet) -> RuleSet {
        self.rules.extend(other.rules);
        self
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::rules::{email, numeric_range, required};
    use serde_json::json;

    fn listing_rules() -> RuleSet {
        RuleSet::new()
            .rule(required("email"))
            .rule(email("email"))
            .rule(numeric_range("age", 18.0, 120.0))
    }

    #[test]
    fn test_valid_input_yields_empty_verdict() {
        let verdict = listing_rules().validate(&json!({"email": "ana@example.com", "age": 30}));
        assert!(verdict.is_valid());
        assert!(verdict.errors().is_empty());
    }

    #[test]
    fn test_errors_follow_declaration_order() {
        let verdict = listing_rules().validate(&json!({"email": "not-an-email", "age": 15}));
        assert!(!verdict.is_valid());
        let errors = verdict.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "email");
        assert_eq!(errors[0].code.as_deref(), Some("INVALID_EMAIL"));
        assert_eq!(errors[1].field, "age");
        assert_eq!(errors[1].code.as_deref(), Some("OUT_OF_RANGE"));
    }

    #[test]
    fn test_no_short_circuit_on_first_failure() {
        let verdict = listing_rules().validate(&json!({"age": 15}));
        // required("email") fails, email("email") skips the absent value,
        // and the age rule still runs.
        assert_eq!(verdict.errors().len(), 2);
        assert_eq!(verdict.errors()[0].field, "email");
        assert_eq!(verdict.errors()[1].field, "age");
    }

    #[test]
    fn test_null_input_fails_required_without_panicking() {
        let verdict = listing_rules().validate(&serde_json::Value::Null);
        assert!(!verdict.is_valid());
        assert_eq!(verdict.errors()[0].field, "email");
        assert_eq!(verdict.errors()[0].code.as_deref(), Some("REQUIRED"));
    }

    #[test]
    fn test_validate_is_deterministic() {
        let rules = listing_rules();
        let input = json!({"email": "bad", "age": 500});
        let first = rules.validate(&input);
        let second = rules.validate(&input);
        assert_eq!(first.errors(), second.errors());
    }

    #[test]
    fn test_combine_preserves_cross_set_order() {
        let identity = RuleSet::new().rule(required("email")).rule(email("email"));
        let pricing = RuleSet::new().rule(required("price"));
        let combined = identity.combine(pricing);

        let verdict = combined.validate(&json!({"email": "nope"}));
        let fields: Vec<&str> = verdict.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "price"]);
    }

    #[test]
    fn test_combined_set_passes_only_when_both_pass() {
        let a = RuleSet::new().rule(required("title"));
        let b = RuleSet::new().rule(required("price"));
        let combined = a.combine(b);

        assert!(combined.validate(&json!({"title": "lamp", "price": 5})).is_valid());
        assert!(!combined.validate(&json!({"title": "lamp"})).is_valid());
        assert!(!combined.validate(&json!({"price": 5})).is_valid());
    }

    #[test]
    fn test_multiple_rules_per_field_all_report() {
        let rules = RuleSet::new()
            .rule(crate::validation::rules::min_length("title", 10))
            .rule(crate::validation::rules::pattern(
                "title",
                regex::Regex::new(r"^[a-z ]+$").unwrap(),
            ));
        let verdict = rules.validate(&json!({"title": "BAD"}));
        assert_eq!(verdict.errors().len(), 2);
        assert_eq!(verdict.errors()[0].code.as_deref(), Some("TOO_SHORT"));
        assert_eq!(verdict.errors()[1].code.as_deref(), Some("INVALID_FORMAT"));
    }

    #[test]
    fn test_shared_rule_set_across_threads() {
        let rules = std::sync::Arc::new(listing_rules());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let rules = rules.clone();
                std::thread::spawn(move || {
                    let verdict = rules.validate(&json!({"email": "ana@example.com", "age": 20 + i}));
                    verdict.is_valid()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
