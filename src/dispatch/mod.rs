//! Dispatch module
//!
//! Matches incoming requests against a frozen route table, invokes the
//! selected handler with an explicit per-request context, and normalizes the
//! handler's outcome into the canonical response triple. Unmatched requests
//! produce a descriptive 404, never an error.

mod context;
mod dispatcher;
mod outcome;

pub use context::{ParamValue, RequestContext};
pub use dispatcher::Dispatcher;
pub use outcome::{HandlerOutcome, ResponseParts};
