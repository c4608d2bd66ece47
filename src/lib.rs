//! skiff: a minimal HTTP routing and dispatch engine.
//!
//! The engine is three small pieces: a [`RouteTable`] mapping (verb, exact
//! path) pairs to handlers, a [`Dispatcher`] that matches incoming requests
//! against a frozen table and normalizes handler results into a response
//! triple, and an [`App`] value used to declare routes during the
//! configuration phase. The `server` module wraps the engine in a
//! tokio + hyper host layer that parses requests and serializes responses.

pub mod app;
pub mod config;
pub mod dispatch;
pub mod logger;
pub mod routing;
pub mod server;

pub use app::App;
pub use dispatch::{Dispatcher, HandlerOutcome, ParamValue, RequestContext, ResponseParts};
pub use routing::{Handler, RouteEntry, RouteTable};
