//! Axum extractor for validated request payloads
//!
//! [`Validated<T>`] deserializes the JSON body, runs the type's filter chain
//! and rule set, and hands the handler an already-validated, typed payload.
//! Rejections answer with the standard error envelope and the 400 mapping,
//! identical to an in-handler validation failure.

use axum::{
    extract::{FromRequest, Request},
    Json,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::{ErrorKind, ServiceError};
use super::filters::FilterChain;
use super::ruleset::RuleSet;

/// Request types that know their own validation
///
/// # Usage
///
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct CreateListing {
///     title: String,
///     price: f64,
/// }
///
/// impl ValidatedRequest for CreateListing {
///     fn rules() -> RuleSet {
///         RuleSet::new()
///             .rule(required("title"))
///             .rule(price_range("price"))
///     }
/// }
///
/// async fn create_listing(Validated(req): Validated<CreateListing>) -> Response {
///     // req passed every rule
/// }
/// ```
pub trait ValidatedRequest: DeserializeOwned {
    /// The rule set run against the raw payload
    fn rules() -> RuleSet;

    /// Normalization applied before the rules; empty by default
    fn filters() -> FilterChain {
        FilterChain::new()
    }
}

/// Extractor wrapping a payload that passed its type's rule set
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    /// Unwrap the validated payload
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: ValidatedRequest + Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw): Json<Value> = Json::from_request(req, state).await.map_err(|e| {
            ServiceError::new(ErrorKind::Validation, format!("invalid JSON body: {}", e))
                .into_response()
        })?;

        let normalized = T::filters().apply(raw);

        let verdict = T::rules().validate(&normalized);
        if !verdict.is_valid() {
            return Err(ServiceError::validation(verdict.into_errors()).into_response());
        }

        let typed: T = serde_json::from_value(normalized)
            .map_err(|e| ServiceError::from(e).into_response())?;

        Ok(Validated(typed))
    }
}
