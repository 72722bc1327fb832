//! Declarative rule schemas
//!
//! Rule sets can be declared in a YAML (or JSON) document and compiled once
//! at startup into a [`RuleSet`] shared across requests:
//!
//! ```yaml
//! fields:
//!   title: [required, {length: {min: 3, max: 120}}]
//!   email: [required, email]
//!   price: [required, price]
//!   status: [{one_of: [draft, active, sold]}]
//!   note:
//!     optional: true
//!     rules: [{length: {max: 500}}]
//! ```
//!
//! Field order in the document defines rule order, so error payloads stay
//! deterministic across process restarts.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::rule::Rule;
use super::rules;
use super::ruleset::RuleSet;

/// Failure while parsing or compiling a schema document
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Rule name not in the library vocabulary
    #[error("unknown rule '{name}' for field '{field}'")]
    UnknownRule { field: String, name: String },

    /// Rule name recognized, parameters unusable
    #[error("invalid parameters for rule '{name}' on field '{field}': {reason}")]
    BadParams {
        field: String,
        name: String,
        reason: String,
    },

    /// Document is not valid YAML
    #[error("failed to parse schema document: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Document is not valid JSON
    #[error("failed to parse schema document: {0}")]
    ParseJson(#[from] serde_json::Error),

    /// Schema file could not be read
    #[error("failed to read schema file: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed schema document, not yet compiled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSchema {
    /// Field name → rule specs, in document order
    pub fields: IndexMap<String, FieldSchema>,
}

/// Rules declared for one field
///
/// The short form is a bare list of specs; the long form adds the
/// `optional` marker applied to every compiled rule of the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSchema {
    /// `field: [required, email]`
    Rules(Vec<RuleSpec>),

    /// `field: {optional: true, rules: [...]}`
    Detailed {
        #[serde(default)]
        optional: bool,
        rules: Vec<RuleSpec>,
    },
}

/// One rule spec: a bare name or a single-key parameter map
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    /// `required`, `email`, `uuid`, `boolean`, `price`, `year`,
    /// `not_empty`, `password`
    Name(String),

    /// `{length: {min, max}}`, `{range: {min, max}}`, `{one_of: [..]}`,
    /// `{array: {min, max}}`, `{pattern: "..."}`
    Parameterized(IndexMap<String, Value>),
}

impl ValidationSchema {
    /// Parse a schema from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a schema from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load and parse a schema from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, SchemaError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Compile the document into an executable rule set
    ///
    /// Compilation is the fallible step; the resulting set is shared and
    /// reused like any hand-built one.
    pub fn compile(&self) -> Result<RuleSet, SchemaError> {
        let mut compiled = Vec::new();
        for (field, schema) in &self.fields {
            let (optional, specs) = match schema {
                FieldSchema::Rules(specs) => (false, specs),
                FieldSchema::Detailed { optional, rules } => (*optional, rules),
            };
            for spec in specs {
                let rule = compile_spec(field, spec)?;
                compiled.push(if optional { rule.optional() } else { rule });
            }
        }
        Ok(RuleSet::from(compiled))
    }
}

fn bad_params(field: &str, name: &str, reason: impl Into<String>) -> SchemaError {
    SchemaError::BadParams {
        field: field.to_string(),
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn compile_spec(field: &str, spec: &RuleSpec) -> Result<Rule, SchemaError> {
    match spec {
        RuleSpec::Name(name) => compile_named(field, name),
        RuleSpec::Parameterized(map) => {
            let mut entries = map.iter();
            let (name, params) = entries
                .next()
                .ok_or_else(|| bad_params(field, "?", "empty rule map"))?;
            if entries.next().is_some() {
                return Err(bad_params(
                    field,
                    name,
                    "a rule map must hold exactly one rule name",
                ));
            }
            compile_parameterized(field, name, params)
        }
    }
}

fn compile_named(field: &str, name: &str) -> Result<Rule, SchemaError> {
    match name {
        "required" => Ok(rules::required(field)),
        "email" => Ok(rules::email(field)),
        "uuid" => Ok(rules::uuid(field)),
        "boolean" => Ok(rules::boolean(field)),
        "price" => Ok(rules::price_range(field)),
        "year" => Ok(rules::year_range(field)),
        "not_empty" => Ok(rules::array_not_empty(field)),
        "password" => Ok(rules::password_strength(field)),
        other => Err(SchemaError::UnknownRule {
            field: field.to_string(),
            name: other.to_string(),
        }),
    }
}

fn compile_parameterized(field: &str, name: &str, params: &Value) -> Result<Rule, SchemaError> {
    match name {
        "length" => {
            let min = params.get("min").and_then(Value::as_u64);
            let max = params.get("max").and_then(Value::as_u64);
            match (min, max) {
                (Some(min), Some(max)) => {
                    Ok(rules::length_range(field, min as usize, max as usize))
                }
                (Some(min), None) => Ok(rules::min_length(field, min as usize)),
                (None, Some(max)) => Ok(rules::max_length(field, max as usize)),
                (None, None) => Err(bad_params(field, name, "needs 'min' and/or 'max'")),
            }
        }
        "range" => {
            let min = params.get("min").and_then(Value::as_f64);
            let max = params.get("max").and_then(Value::as_f64);
            match (min, max) {
                (Some(min), Some(max)) => Ok(rules::numeric_range(field, min, max)),
                _ => Err(bad_params(field, name, "needs numeric 'min' and 'max'")),
            }
        }
        "one_of" => {
            let allowed = params
                .as_array()
                .ok_or_else(|| bad_params(field, name, "needs a list of allowed values"))?;
            Ok(rules::one_of(field, allowed.clone()))
        }
        "array" => {
            let min = params.get("min").and_then(Value::as_u64);
            let max = params.get("max").and_then(Value::as_u64);
            if min.is_none() && max.is_none() {
                return Err(bad_params(field, name, "needs 'min' and/or 'max'"));
            }
            Ok(rules::array_length(
                field,
                min.unwrap_or(0) as usize,
                max.map_or(usize::MAX, |m| m as usize),
            ))
        }
        "pattern" => {
            let source = params
                .as_str()
                .ok_or_else(|| bad_params(field, name, "needs a pattern string"))?;
            let regex =
                Regex::new(source).map_err(|e| bad_params(field, name, e.to_string()))?;
            Ok(rules::pattern(field, regex))
        }
        other => Err(SchemaError::UnknownRule {
            field: field.to_string(),
            name: other.to_string(),
        }),
    }
}
