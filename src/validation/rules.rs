//! The common rule library
//!
//! Parameterized constructors returning [`Rule`] values closed over their
//! parameters. Every constructor is pure; the returned rule can be shared
//! across requests and concurrent invocations.
//!
//! Absence is [`required`]'s concern (and [`array_not_empty`]'s, for
//! sequences): the other rules treat a missing, null, or empty value as a
//! pass, so `[required(f), email(f)]` reports a missing field once. Values
//! that are present with the wrong JSON type fail closed with code
//! `INVALID_TYPE` — numeric-looking strings are never coerced; normalize
//! input with a filter chain first if the transport is stringly typed.

use chrono::{Datelike, Utc};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use uuid::Uuid;

use super::rule::{Rule, Violation, is_absent};

// Local-part@domain, domain with at least one dot.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~.-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$")
        .expect("email pattern compiles")
});

fn finite_number(value: &Value) -> Result<f64, Violation> {
    value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| Violation::coded("INVALID_TYPE", "must be a number"))
}

fn string_value(value: &Value) -> Result<&str, Violation> {
    value
        .as_str()
        .ok_or_else(|| Violation::coded("INVALID_TYPE", "must be a string"))
}

/// Rule: value must be present (not missing, null, empty string, or empty
/// sequence)
pub fn required(field: &str) -> Rule {
    Rule::new(field, |value, _| {
        if is_absent(value) {
            Err(Violation::coded("REQUIRED", "is required"))
        } else {
            Ok(())
        }
    })
}

/// Rule: value, when present, must be a plausible email address
///
/// Grammar is local-part@domain with at least one dot in the domain.
pub fn email(field: &str) -> Rule {
    Rule::new(field, |value, _| {
        if is_absent(value) {
            return Ok(());
        }
        let s = string_value(value)?;
        if EMAIL_RE.is_match(s) {
            Ok(())
        } else {
            Err(Violation::coded(
                "INVALID_EMAIL",
                "must be a valid email address",
            ))
        }
    })
}

/// Rule: string must have at least `min` characters
pub fn min_length(field: &str, min: usize) -> Rule {
    Rule::new(field, move |value, _| {
        if is_absent(value) {
            return Ok(());
        }
        let s = string_value(value)?;
        if s.chars().count() < min {
            Err(Violation::coded(
                "TOO_SHORT",
                format!("must be at least {} characters", min),
            ))
        } else {
            Ok(())
        }
    })
}

/// Rule: string must have at most `max` characters
pub fn max_length(field: &str, max: usize) -> Rule {
    Rule::new(field, move |value, _| {
        if is_absent(value) {
            return Ok(());
        }
        let s = string_value(value)?;
        if s.chars().count() > max {
            Err(Violation::coded(
                "TOO_LONG",
                format!("must be at most {} characters", max),
            ))
        } else {
            Ok(())
        }
    })
}

/// Rule: string length must be within `[min, max]`
pub fn length_range(field: &str, min: usize, max: usize) -> Rule {
    Rule::new(field, move |value, _| {
        if is_absent(value) {
            return Ok(());
        }
        let len = string_value(value)?.chars().count();
        if len < min {
            Err(Violation::coded(
                "TOO_SHORT",
                format!("must be at least {} characters", min),
            ))
        } else if len > max {
            Err(Violation::coded(
                "TOO_LONG",
                format!("must be at most {} characters", max),
            ))
        } else {
            Ok(())
        }
    })
}

/// Rule: value must be a finite number within `[min, max]` inclusive
///
/// Numeric-looking strings fail closed; see the module docs.
pub fn numeric_range(field: &str, min: f64, max: f64) -> Rule {
    Rule::new(field, move |value, _| {
        if is_absent(value) {
            return Ok(());
        }
        let n = finite_number(value)?;
        if n < min || n > max {
            Err(Violation::coded(
                "OUT_OF_RANGE",
                format!("must be between {} and {}", min, max),
            ))
        } else {
            Ok(())
        }
    })
}

/// Rule: marketplace price, between 1 and 10,000,000 inclusive
pub fn price_range(field: &str) -> Rule {
    numeric_range(field, 1.0, 10_000_000.0)
}

/// Rule: calendar year between 1900 and next year inclusive
///
/// The upper bound is read from the wall clock at check time, not captured
/// at construction, so a long-lived rule set keeps tracking the current
/// year.
pub fn year_range(field: &str) -> Rule {
    Rule::new(field, |value, _| {
        if is_absent(value) {
            return Ok(());
        }
        let n = finite_number(value)?;
        let max = f64::from(Utc::now().year() + 1);
        if n < 1900.0 || n > max {
            Err(Violation::coded(
                "OUT_OF_RANGE",
                format!("must be between 1900 and {}", max),
            ))
        } else {
            Ok(())
        }
    })
}

/// Rule: value must be a member of `allowed` (exact match, no coercion)
pub fn one_of<V: Into<Value>>(field: &str, allowed: impl IntoIterator<Item = V>) -> Rule {
    let allowed: Vec<Value> = allowed.into_iter().map(Into::into).collect();
    let shown = allowed
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ");
    Rule::new(field, move |value, _| {
        if is_absent(value) {
            return Ok(());
        }
        if allowed.contains(value) {
            Ok(())
        } else {
            Err(Violation::coded(
                "NOT_ALLOWED",
                format!("must be one of: {}", shown),
            ))
        }
    })
}

/// Rule: value must be a UUID in canonical hyphenated form
pub fn uuid(field: &str) -> Rule {
    Rule::new(field, |value, _| {
        if is_absent(value) {
            return Ok(());
        }
        let s = string_value(value)?;
        // try_parse also accepts simple/braced/urn forms; the length pins
        // the canonical 8-4-4-4-12 rendering.
        if Uuid::try_parse(s).is_ok() && s.len() == 36 {
            Ok(())
        } else {
            Err(Violation::coded("INVALID_UUID", "must be a valid UUID"))
        }
    })
}

/// Rule: value must be exactly `true` or `false` (no truthy coercion)
pub fn boolean(field: &str) -> Rule {
    Rule::new(field, |value, _| {
        if value.is_null() {
            return Ok(());
        }
        if value.is_boolean() {
            Ok(())
        } else {
            Err(Violation::coded("NOT_BOOLEAN", "must be true or false"))
        }
    })
}

/// Rule: password meets the fixed strength policy
///
/// Policy: at least 8 characters, containing at least one uppercase letter,
/// one lowercase letter, one digit, and one symbol. Not configurable per
/// call.
pub fn password_strength(field: &str) -> Rule {
    Rule::new(field, |value, _| {
        if is_absent(value) {
            return Ok(());
        }
        let s = string_value(value)?;
        let long_enough = s.chars().count() >= 8;
        let upper = s.chars().any(|c| c.is_uppercase());
        let lower = s.chars().any(|c| c.is_lowercase());
        let digit = s.chars().any(|c| c.is_ascii_digit());
        let symbol = s.chars().any(|c| !c.is_alphanumeric());
        if long_enough && upper && lower && digit && symbol {
            Ok(())
        } else {
            Err(Violation::coded(
                "WEAK_PASSWORD",
                "must be at least 8 characters with an uppercase letter, \
                 a lowercase letter, a digit and a symbol",
            ))
        }
    })
}

/// Rule: value must be a sequence with at least one element
pub fn array_not_empty(field: &str) -> Rule {
    Rule::new(field, |value, _| match value {
        Value::Array(items) if !items.is_empty() => Ok(()),
        Value::Array(_) | Value::Null => Err(Violation::coded(
            "EMPTY_ARRAY",
            "must contain at least one item",
        )),
        _ => Err(Violation::coded("INVALID_TYPE", "must be an array")),
    })
}

/// Rule: sequence length must be within `[min, max]`
pub fn array_length(field: &str, min: usize, max: usize) -> Rule {
    Rule::new(field, move |value, _| {
        if value.is_null() {
            return Ok(());
        }
        let items = value
            .as_array()
            .ok_or_else(|| Violation::coded("INVALID_TYPE", "must be an array"))?;
        if items.len() < min {
            Err(Violation::coded(
                "TOO_FEW",
                format!("must contain at least {} items", min),
            ))
        } else if items.len() > max {
            Err(Violation::coded(
                "TOO_MANY",
                format!("must contain at most {} items", max),
            ))
        } else {
            Ok(())
        }
    })
}

/// Rule: string must match a caller-compiled pattern
pub fn pattern(field: &str, regex: Regex) -> Rule {
    Rule::new(field, move |value, _| {
        if is_absent(value) {
            return Ok(());
        }
        let s = string_value(value)?;
        if regex.is_match(s) {
            Ok(())
        } else {
            Err(Violation::coded(
                "INVALID_FORMAT",
                "does not match the expected format",
            ))
        }
    })
}

/// Rule: a one-off check matching the library rule contract
///
/// The closure receives the resolved field value and the whole input
/// object, for checks that depend on sibling fields.
pub fn custom(
    field: &str,
    check: impl Fn(&Value, &Value) -> Result<(), Violation> + Send + Sync + 'static,
) -> Rule {
    Rule::new(field, check)
}

/// Wrap any rule so an absent or empty value passes without invoking it
pub fn optional(rule: Rule) -> Rule {
    rule.optional()
}
