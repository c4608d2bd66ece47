//! Application value for the configuration phase.
//!
//! An `App` is constructed explicitly, routes are declared against it, and
//! `into_dispatcher` freezes the table for the serving phase. There is no
//! ambient global application; multiple independent apps may coexist.

use std::sync::Arc;

use crate::dispatch::{Dispatcher, HandlerOutcome, RequestContext};
use crate::routing::{RouteEntry, RouteTable};

#[derive(Default)]
pub struct App {
    table: RouteTable,
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `(verb, path)`. Last registration for a key
    /// wins; verbs are not validated.
    pub fn route<H>(&mut self, verb: impl Into<String>, path: impl Into<String>, handler: H)
    where
        H: Fn(&RequestContext) -> HandlerOutcome + Send + Sync + 'static,
    {
        self.table.register(verb, path, Arc::new(handler));
    }

    pub fn get<H>(&mut self, path: impl Into<String>, handler: H)
    where
        H: Fn(&RequestContext) -> HandlerOutcome + Send + Sync + 'static,
    {
        self.route("GET", path, handler);
    }

    pub fn post<H>(&mut self, path: impl Into<String>, handler: H)
    where
        H: Fn(&RequestContext) -> HandlerOutcome + Send + Sync + 'static,
    {
        self.route("POST", path, handler);
    }

    pub fn put<H>(&mut self, path: impl Into<String>, handler: H)
    where
        H: Fn(&RequestContext) -> HandlerOutcome + Send + Sync + 'static,
    {
        self.route("PUT", path, handler);
    }

    pub fn patch<H>(&mut self, path: impl Into<String>, handler: H)
    where
        H: Fn(&RequestContext) -> HandlerOutcome + Send + Sync + 'static,
    {
        self.route("PATCH", path, handler);
    }

    pub fn delete<H>(&mut self, path: impl Into<String>, handler: H)
    where
        H: Fn(&RequestContext) -> HandlerOutcome + Send + Sync + 'static,
    {
        self.route("DELETE", path, handler);
    }

    pub fn head<H>(&mut self, path: impl Into<String>, handler: H)
    where
        H: Fn(&RequestContext) -> HandlerOutcome + Send + Sync + 'static,
    {
        self.route("HEAD", path, handler);
    }

    /// Listing of the declared routes at call time, for diagnostics.
    #[must_use]
    pub fn snapshot(&self) -> Vec<RouteEntry> {
        self.table.snapshot()
    }

    /// Freeze the table and hand it to a dispatcher. No further
    /// registration is possible afterwards.
    #[must_use]
    pub fn into_dispatcher(self) -> Dispatcher {
        Dispatcher::new(Arc::new(self.table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::body::Bytes;
    use hyper::HeaderMap;

    fn test_ctx(verb: &str, path: &str) -> RequestContext {
        RequestContext::new(verb, path, None, HeaderMap::new(), Bytes::new())
    }

    #[test]
    fn test_verb_helpers_register_under_their_verb() {
        let mut app = App::new();
        app.get("/r", |_ctx| "get".into());
        app.post("/r", |_ctx| "post".into());
        app.put("/r", |_ctx| "put".into());
        app.patch("/r", |_ctx| "patch".into());
        app.delete("/r", |_ctx| "delete".into());
        app.head("/r", |_ctx| "head".into());

        let verbs: Vec<String> = app.snapshot().into_iter().map(|e| e.verb).collect();
        assert_eq!(verbs, vec!["DELETE", "GET", "HEAD", "PATCH", "POST", "PUT"]);
    }

    #[test]
    fn test_into_dispatcher_serves_declared_routes() {
        let mut app = App::new();
        app.get("/hello", |_ctx| "hi".into());

        let dispatcher = app.into_dispatcher();
        let parts = dispatcher.dispatch(&test_ctx("GET", "/hello"));
        assert_eq!(parts.status, 200);
        assert_eq!(parts.body_bytes(), Bytes::from("hi"));
    }

    #[test]
    fn test_independent_apps_do_not_interfere() {
        let mut first = App::new();
        first.get("/only-first", |_ctx| "first".into());
        let mut second = App::new();
        second.get("/only-second", |_ctx| "second".into());

        let first = first.into_dispatcher();
        let second = second.into_dispatcher();

        assert_eq!(first.dispatch(&test_ctx("GET", "/only-first")).status, 200);
        assert_eq!(first.dispatch(&test_ctx("GET", "/only-second")).status, 404);
        assert_eq!(second.dispatch(&test_ctx("GET", "/only-second")).status, 200);
    }
}
