//! Typed failure handling for the souk pipeline
//!
//! Every business operation resolves to a [`ServiceResult`]: either a payload
//! or a [`ServiceError`] carrying one of the closed [`ErrorKind`] categories.
//! The kind decides the transport status code through an exhaustive mapping,
//! so a new category cannot be added without the compiler pointing at every
//! place that must handle it.
//!
//! # Example
//!
//! ```rust,ignore
//! use souk::prelude::*;
//!
//! async fn get_listing(store: &dyn Store, id: &str) -> ServiceResult<Value> {
//!     store
//!         .get(id)
//!         .await?
//!         .ok_or_else(|| ServiceError::not_found("listing", id))
//! }
//! ```

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::FieldError;

/// Closed set of failure categories
///
/// Each category maps to exactly one HTTP status code. `Internal` is the only
/// category treated as a system fault; the rest describe expected
/// client-facing conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Client sent malformed or out-of-range input
    Validation,

    /// Referenced entity does not exist
    NotFound,

    /// Missing or invalid credentials
    Unauthorized,

    /// Valid credentials, insufficient permission
    Forbidden,

    /// State precondition violated (e.g. duplicate)
    Conflict,

    /// Unexpected fault: a bug or a dependency failure
    Internal,
}

impl ErrorKind {
    /// HTTP status code for this category
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wire name of this category
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Internal => "INTERNAL",
        }
    }

    /// Whether this category is an expected client-facing condition
    ///
    /// Expected failures are logged at info severity; only `Internal` is
    /// logged as an error.
    pub fn is_expected(&self) -> bool {
        !matches!(self, ErrorKind::Internal)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The failure side of a [`ServiceResult`]
///
/// Constructed once by business logic (or by the pipeline boundary when a
/// fault is caught) and consumed exactly once by the response translation
/// layer. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct ServiceError {
    /// Failure category, drives the status-code mapping
    pub kind: ErrorKind,

    /// Human-readable description
    pub message: String,

    /// Optional structured context (e.g. field-level validation errors)
    pub details: Option<serde_json::Value>,
}

impl ServiceError {
    /// Create an error of the given category
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured context to the error
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Validation failure carrying the full ordered list of field errors
    pub fn validation(errors: Vec<FieldError>) -> Self {
        let count = errors.len();
        Self {
            kind: ErrorKind::Validation,
            message: format!(
                "request validation failed with {} error{}",
                count,
                if count == 1 { "" } else { "s" }
            ),
            details: Some(serde_json::json!({ "fields": errors })),
        }
    }

    /// Entity lookup failure
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("{} '{}' not found", resource, id),
        )
    }

    /// Missing or invalid credentials
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Authenticated but not permitted
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// State precondition violated
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Unexpected fault
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }

    /// Copy safe to hand to the caller
    ///
    /// Internal faults keep their full detail server-side only: the outgoing
    /// copy carries a generic message and no details. Expected failures pass
    /// through unchanged.
    pub fn sanitized(&self) -> Self {
        if self.kind == ErrorKind::Internal {
            Self::new(ErrorKind::Internal, "internal server error")
        } else {
            self.clone()
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ServiceError {}

impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        // A collaborator may already speak the pipeline's language; keep the
        // category when it does, fold everything else into Internal.
        match err.downcast::<ServiceError>() {
            Ok(service_err) => service_err,
            Err(other) => ServiceError::internal(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::new(ErrorKind::Validation, format!("invalid JSON: {}", err))
    }
}

/// A specialized Result type for pipeline operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Convenience constructor for a successful outcome
pub fn success<T>(data: T) -> ServiceResult<T> {
    Ok(data)
}

/// Convenience constructor for a failed outcome
pub fn failure<T>(kind: ErrorKind, message: impl Into<String>) -> ServiceResult<T> {
    Err(ServiceError::new(kind, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_status_mapping_is_exhaustive() {
        assert_eq!(ErrorKind::Validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorKind::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorKind::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorKind::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorKind::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(ErrorKind::Validation.as_str(), "VALIDATION");
        assert_eq!(ErrorKind::NotFound.as_str(), "NOT_FOUND");
        assert_eq!(ErrorKind::Internal.as_str(), "INTERNAL");
    }

    #[test]
    fn test_kind_serializes_to_wire_name() {
        let json = serde_json::to_string(&ErrorKind::NotFound).unwrap();
        assert_eq!(json, "\"NOT_FOUND\"");
    }

    #[test]
    fn test_not_found_display() {
        let err = ServiceError::not_found("listing", "lst-42");
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.to_string().contains("listing"));
        assert!(err.to_string().contains("lst-42"));
    }

    #[test]
    fn test_validation_error_carries_field_details() {
        let err = ServiceError::validation(vec![
            FieldError::new("email", "must be a valid email address"),
            FieldError::new("price", "must be at least 1"),
        ]);
        assert_eq!(err.kind, ErrorKind::Validation);
        let details = err.details.expect("details should be set");
        let fields = details["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0]["field"], "email");
        assert_eq!(fields[1]["field"], "price");
    }

    #[test]
    fn test_sanitized_scrubs_internal_detail() {
        let err = ServiceError::internal("pool timeout talking to the document store")
            .with_details(serde_json::json!({ "table": "listings" }));
        let out = err.sanitized();
        assert_eq!(out.kind, ErrorKind::Internal);
        assert_eq!(out.message, "internal server error");
        assert!(out.details.is_none());
    }

    #[test]
    fn test_sanitized_keeps_expected_failures() {
        let err = ServiceError::conflict("listing already published");
        let out = err.sanitized();
        assert_eq!(out.message, "listing already published");
    }

    #[test]
    fn test_from_anyhow_is_internal() {
        let err: ServiceError = anyhow::anyhow!("socket closed").into();
        assert_eq!(err.kind, ErrorKind::Internal);
        assert!(err.message.contains("socket closed"));
    }

    #[test]
    fn test_from_anyhow_preserves_service_error() {
        let original = ServiceError::forbidden("not the listing owner");
        let err: ServiceError = anyhow::Error::new(original).into();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[test]
    fn test_from_serde_json_is_validation() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: ServiceError = json_err.into();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_result_constructors() {
        let ok: ServiceResult<i32> = success(7);
        assert_eq!(ok.unwrap(), 7);

        let err: ServiceResult<i32> = failure(ErrorKind::Conflict, "duplicate sku");
        assert_eq!(err.unwrap_err().kind, ErrorKind::Conflict);
    }
}
