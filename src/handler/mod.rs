//! Handler boundary: response translation and wrapped execution
//!
//! [`response`] is the single translation point from a service outcome to a
//! transport response; [`wrap`] is the execution boundary that adds request
//! identity, timing, panic isolation, and the per-invocation log entry.

pub mod response;
pub mod wrap;

pub use response::{ErrorBody, ErrorDetail, SuccessBody, respond, respond_created};
pub use wrap::{
    HandlerFn, RequestContext, run, run_created, try_async, validate_required, wrap_handler,
    wrap_handler_created,
};
