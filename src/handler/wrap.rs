//! The execution boundary around one entry point
//!
//! [`wrap_handler`] composes the whole pipeline: it stamps a request id,
//! starts the clock, runs the business future with panic isolation,
//! translates the outcome through the response layer, and logs the request
//! id and elapsed time on every exit path. No failure — returned, raised,
//! or panicked — ever escapes to the transport layer.
//!
//! Expected client-facing failures log at info; only `Internal` logs at
//! error, with the full detail that the outgoing response scrubs.

use axum::http::StatusCode;
use axum::response::Response;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use uuid::Uuid;

use super::response;
use crate::core::{ServiceError, ServiceResult};
use crate::validation::rules;

/// Identity and timing of one handler invocation
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    started: Instant,
}

impl RequestContext {
    /// Fresh context: new request id, clock starts now
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            started: Instant::now(),
        }
    }

    /// Identifier correlating response and log entry
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Milliseconds since the context was created
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one business future inside the pipeline boundary, answering 200 on
/// success
///
/// This is the awaitable form of [`wrap_handler`], for axum handlers that
/// already hold their input:
///
/// ```rust,ignore
/// async fn get_listing(Path(id): Path<String>, State(store): State<S>) -> Response {
///     run("listings.get", async move {
///         store.get(&id).await?.ok_or_else(|| ServiceError::not_found("listing", &id))
///     })
///     .await
/// }
/// ```
pub async fn run<T, Fut>(operation: &str, fut: Fut) -> Response
where
    T: Serialize,
    Fut: Future<Output = ServiceResult<T>>,
{
    execute(operation, StatusCode::OK, fut).await
}

/// Like [`run`], answering 201 on success (creation endpoints)
pub async fn run_created<T, Fut>(operation: &str, fut: Fut) -> Response
where
    T: Serialize,
    Fut: Future<Output = ServiceResult<T>>,
{
    execute(operation, StatusCode::CREATED, fut).await
}

/// Boxed handler produced by [`wrap_handler`]
pub type HandlerFn = std::sync::Arc<dyn Fn(Value) -> BoxFuture<'static, Response> + Send + Sync>;

/// Wrap a business function into a uniform handler
///
/// The returned handler validates nothing by itself — the composition point
/// is the business closure, which runs its rule set first and returns a
/// validation failure before touching any collaborator:
///
/// ```rust,ignore
/// let create = wrap_handler("listings.create", move |input: Value| {
///     let rules = rules.clone();
///     let store = store.clone();
///     async move {
///         let verdict = rules.validate(&input);
///         if !verdict.is_valid() {
///             return Err(ServiceError::validation(verdict.into_errors()));
///         }
///         create_listing(&store, input).await
///     }
/// });
/// ```
pub fn wrap_handler<F, Fut, T>(operation: &'static str, f: F) -> HandlerFn
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ServiceResult<T>> + Send + 'static,
    T: Serialize + Send + 'static,
{
    wrap_handler_with_status(operation, StatusCode::OK, f)
}

/// Like [`wrap_handler`], answering 201 on success
pub fn wrap_handler_created<F, Fut, T>(operation: &'static str, f: F) -> HandlerFn
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ServiceResult<T>> + Send + 'static,
    T: Serialize + Send + 'static,
{
    wrap_handler_with_status(operation, StatusCode::CREATED, f)
}

fn wrap_handler_with_status<F, Fut, T>(
    operation: &'static str,
    success_status: StatusCode,
    f: F,
) -> HandlerFn
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ServiceResult<T>> + Send + 'static,
    T: Serialize + Send + 'static,
{
    std::sync::Arc::new(move |input: Value| {
        execute(operation, success_status, f(input)).boxed()
    })
}

async fn execute<T, Fut>(operation: &str, success_status: StatusCode, fut: Fut) -> Response
where
    T: Serialize,
    Fut: Future<Output = ServiceResult<T>>,
{
    let ctx = RequestContext::new();

    let result = match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(ServiceError::internal(format!(
            "handler panicked: {}",
            panic_message(payload.as_ref())
        ))),
    };

    // The one structured-logging guarantee: request id and elapsed time on
    // every invocation, whatever the outcome.
    match &result {
        Ok(_) => tracing::info!(
            request_id = %ctx.request_id(),
            operation,
            elapsed_ms = ctx.elapsed_ms(),
            "request completed"
        ),
        Err(err) if err.kind.is_expected() => tracing::info!(
            request_id = %ctx.request_id(),
            operation,
            elapsed_ms = ctx.elapsed_ms(),
            kind = err.kind.as_str(),
            error = %err.message,
            "request rejected"
        ),
        Err(err) => tracing::error!(
            request_id = %ctx.request_id(),
            operation,
            elapsed_ms = ctx.elapsed_ms(),
            error = %err.message,
            details = ?err.details,
            "request failed"
        ),
    }

    response::respond_with_status(result, &ctx, success_status)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic payload"
    }
}

/// Run an operation that fails with raised errors and fold the failure into
/// a service outcome
///
/// Collaborator errors that already carry a [`ServiceError`] keep their
/// category; anything else becomes `Internal`.
pub async fn try_async<T, Fut>(fut: Fut) -> ServiceResult<T>
where
    Fut: Future<Output = anyhow::Result<T>>,
{
    fut.await.map_err(ServiceError::from)
}

/// Fast-path presence check over a fixed field list
///
/// Equivalent to running `required` over each field, for call sites that do
/// not need a full rule set.
pub fn validate_required(input: &Value, fields: &[&str]) -> ServiceResult<()> {
    let errors: Vec<_> = fields
        .iter()
        .filter_map(|field| rules::required(field).apply(input))
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::validation(errors))
    }
}
