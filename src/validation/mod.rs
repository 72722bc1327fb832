//! Validation framework: rules, ordered execution, filters, schemas
//!
//! The pieces compose bottom-up: [`rule::Rule`] is one named check,
//! [`rules`] is the library of parameterized constructors,
//! [`ruleset::RuleSet`] runs an ordered set and aggregates every violation,
//! [`filters`] normalizes input beforehand, [`schema`] compiles declarative
//! documents into rule sets, and [`extractor`] plugs the whole thing into
//! axum handlers.

pub mod extractor;
pub mod filters;
pub mod rule;
pub mod rules;
pub mod ruleset;
pub mod schema;

pub use extractor::{Validated, ValidatedRequest};
pub use filters::{Filter, FilterChain};
pub use rule::{FieldError, Rule, Violation};
pub use ruleset::{RuleSet, Verdict};
pub use schema::{SchemaError, ValidationSchema};
