//! The single translation point between a service outcome and a transport
//! response
//!
//! Every response, success or failure, carries the same envelope: the
//! payload or error object plus the request identifier and elapsed time, so
//! clients can correlate with server logs without seeing server internals.
//!
//! Success bodies: `{"data": ..., "requestId": ..., "elapsedMs": ...}`.
//! Error bodies:
//! `{"error": {"kind", "message", "details"?}, "requestId", "elapsedMs"}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::wrap::RequestContext;
use crate::core::{ErrorKind, ServiceError, ServiceResult};

/// Envelope for a successful outcome
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessBody<T: Serialize> {
    /// Operation-specific payload
    pub data: T,

    /// Correlates the response with the server-side log entry
    pub request_id: Uuid,

    /// Wall-clock handling time in milliseconds
    pub elapsed_ms: u64,
}

/// Envelope for a failed outcome
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// What went wrong
    pub error: ErrorDetail,

    /// Correlates the response with the server-side log entry
    pub request_id: Uuid,

    /// Wall-clock handling time in milliseconds
    pub elapsed_ms: u64,
}

/// The error object inside an [`ErrorBody`]
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Failure category, serialized as its wire name
    pub kind: ErrorKind,

    /// Human-readable description (generic for internal faults)
    pub message: String,

    /// Structured context, e.g. field-level validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Translate a service outcome into a 200-based response
pub fn respond<T: Serialize>(result: ServiceResult<T>, ctx: &RequestContext) -> Response {
    respond_with_status(result, ctx, StatusCode::OK)
}

/// Translate a service outcome into a 201-based response
///
/// Creation endpoints pick this variant; everything else is identical to
/// [`respond`].
pub fn respond_created<T: Serialize>(result: ServiceResult<T>, ctx: &RequestContext) -> Response {
    respond_with_status(result, ctx, StatusCode::CREATED)
}

/// Translate a service outcome, using `success_status` on the success path
///
/// The failure path always maps through the kind → status table.
pub fn respond_with_status<T: Serialize>(
    result: ServiceResult<T>,
    ctx: &RequestContext,
    success_status: StatusCode,
) -> Response {
    match result {
        Ok(data) => (
            success_status,
            Json(SuccessBody {
                data,
                request_id: ctx.request_id(),
                elapsed_ms: ctx.elapsed_ms(),
            }),
        )
            .into_response(),
        Err(err) => error_response(&err, ctx),
    }
}

fn error_response(err: &ServiceError, ctx: &RequestContext) -> Response {
    // Internal detail stays server-side; the caller gets the scrubbed copy.
    let visible = err.sanitized();
    (
        visible.kind.status_code(),
        Json(ErrorBody {
            error: ErrorDetail {
                kind: visible.kind,
                message: visible.message,
                details: visible.details,
            },
            request_id: ctx.request_id(),
            elapsed_ms: ctx.elapsed_ms(),
        }),
    )
        .into_response()
}

impl IntoResponse for ServiceError {
    /// Rejections raised outside a wrapped handler (extractors, middleware)
    /// still answer in the standard envelope, under a fresh request id, and
    /// still produce a correlatable log entry.
    fn into_response(self) -> Response {
        let ctx = RequestContext::new();
        if self.kind.is_expected() {
            tracing::info!(
                request_id = %ctx.request_id(),
                kind = self.kind.as_str(),
                error = %self.message,
                "request rejected before handler"
            );
        } else {
            tracing::error!(
                request_id = %ctx.request_id(),
                error = %self.message,
                details = ?self.details,
                "request failed before handler"
            );
        }
        error_response(&self, &ctx)
    }
}
