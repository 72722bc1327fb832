//! # Souk
//!
//! The uniform request-handling pipeline for marketplace service handlers:
//! validate the input, execute the business logic, translate the outcome,
//! respond — the same shape at every entry point.
//!
//! ## Features
//!
//! - **One Result Contract**: business logic returns a `ServiceResult`; the
//!   pipeline owns the translation to transport responses
//! - **Closed Error Taxonomy**: six failure categories, each mapped to
//!   exactly one status code through an exhaustive match
//! - **Composable Rules**: a library of pure, parameterized field rules
//!   shared freely across concurrent requests
//! - **Full Verdicts**: validation never stops at the first violation —
//!   clients see every problem in one round trip
//! - **Declarative Schemas**: rule sets compiled from YAML/JSON documents,
//!   field order preserved
//! - **Sealed Boundary**: panics and stray errors become 500s with a generic
//!   message; full detail stays in the server log
//! - **Request Correlation**: every response carries a request id and
//!   elapsed time matching the per-invocation log entry
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use souk::prelude::*;
//!
//! let rules = RuleSet::new()
//!     .rule(required("title"))
//!     .rule(length_range("title", 3, 120))
//!     .rule(required("price"))
//!     .rule(price_range("price"));
//!
//! let create = wrap_handler_created("listings.create", move |input: Value| {
//!     let rules = rules.clone();
//!     let store = store.clone();
//!     async move {
//!         let verdict = rules.validate(&input);
//!         if !verdict.is_valid() {
//!             return Err(ServiceError::validation(verdict.into_errors()));
//!         }
//!         try_async(store.put(&key, input.clone())).await?;
//!         Ok(input)
//!     }
//! });
//! ```

pub mod core;
pub mod handler;
pub mod storage;
pub mod validation;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Contracts ===
    pub use crate::core::{
        ErrorKind, ServiceError, ServiceResult, Store, failure, success,
    };

    // === Validation ===
    pub use crate::validation::{
        FieldError, Filter, FilterChain, Rule, RuleSet, SchemaError, Validated,
        ValidatedRequest, ValidationSchema, Verdict, Violation,
        filters::{empty_to_null, lowercase, round_decimals, trim},
        rules::{
            array_length, array_not_empty, boolean, custom, email, length_range, max_length,
            min_length, numeric_range, one_of, optional, pattern, password_strength,
            price_range, required, uuid, year_range,
        },
    };

    // === Handler Boundary ===
    pub use crate::handler::{
        HandlerFn, RequestContext, respond, respond_created, run, run_created, try_async,
        validate_required, wrap_handler, wrap_handler_created,
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
    pub use uuid::Uuid;

    // === Axum ===
    pub use axum::{
        Json, Router,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
}
