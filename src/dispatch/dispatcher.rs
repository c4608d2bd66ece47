//! Dispatcher
//!
//! Match-or-404 over a frozen route table. The only branch point is
//! hit/miss, and both sides produce a well-formed response triple, so every
//! request receives exactly one response.

use std::sync::Arc;

use crate::routing::RouteTable;

use super::context::RequestContext;
use super::outcome::{HandlerOutcome, ResponseParts};

/// Matches requests against a frozen route table and produces the canonical
/// response triple for each one.
///
/// The table is frozen behind `Arc` before serving begins and no
/// registration operation exists afterwards, so concurrent dispatch from
/// multiple workers needs no synchronization.
#[derive(Clone)]
pub struct Dispatcher {
    table: Arc<RouteTable>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self { table }
    }

    /// Read access to the frozen table, for diagnostics.
    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Look up `(verb, path)`, invoke the handler exactly once on a hit and
    /// normalize its outcome; on a miss build the descriptive 404 naming the
    /// unmatched verb and path.
    ///
    /// A panic inside a handler is not caught here; it propagates to the
    /// host layer's task boundary.
    #[must_use]
    pub fn dispatch(&self, ctx: &RequestContext) -> ResponseParts {
        match self.table.lookup(ctx.verb(), ctx.path()) {
            Some(handler) => match handler(ctx) {
                // A bare text return is sugar for 200 OK with that body.
                HandlerOutcome::Text(text) => ResponseParts::with_body(200, text),
                // Structured responses pass through untouched.
                HandlerOutcome::Response(parts) => parts,
            },
            None => ResponseParts::with_body(
                404,
                format!("Oops! No routes for {} {}", ctx.verb(), ctx.path()),
            ),
        }
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

    fn dispatcher_with<F>(build: F) -> Dispatcher
    where
        F: FnOnce(&mut RouteTable),
    {
        let mut table = RouteTable::new();
        build(&mut table);
        Dispatcher::new(Arc::new(table))
    }

    fn body_string(parts: &ResponseParts) -> String {
        String::from_utf8(parts.body_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_text_outcome_normalizes_to_200() {
        let dispatcher = dispatcher_with(|table| {
            table.register("GET", "/ok", Arc::new(|_ctx| HandlerOutcome::Text("ok".to_string())));
        });

        let parts = dispatcher.dispatch(&test_ctx("GET", "/ok"));
        assert_eq!(parts.status, 200);
        assert!(parts.headers.is_empty());
        assert_eq!(parts.body, vec![Bytes::from("ok")]);
    }

    #[test]
    fn test_structured_outcome_passes_through_unchanged() {
        let returned = ResponseParts {
            status: 201,
            headers: vec![("X".to_string(), "1".to_string())],
            body: vec![Bytes::from("body")],
        };
        let expected = returned.clone();

        let dispatcher = dispatcher_with(move |table| {
            table.register(
                "POST",
                "/create",
                Arc::new(move |_ctx| HandlerOutcome::Response(returned.clone())),
            );
        });

        let parts = dispatcher.dispatch(&test_ctx("POST", "/create"));
        assert_eq!(parts, expected);
    }

    #[test]
    fn test_unmatched_route_names_verb_and_path() {
        let dispatcher = dispatcher_with(|_table| {});

        let parts = dispatcher.dispatch(&test_ctx("PUT", "/missing"));
        assert_eq!(parts.status, 404);
        assert_eq!(body_string(&parts), "Oops! No routes for PUT /missing");
    }

    #[test]
    fn test_registered_path_with_wrong_verb_is_a_miss() {
        let dispatcher = dispatcher_with(|table| {
            table.register("GET", "/x", Arc::new(|_ctx| "got".into()));
        });

        let parts = dispatcher.dispatch(&test_ctx("DELETE", "/x"));
        assert_eq!(parts.status, 404);
        assert!(body_string(&parts).contains("DELETE /x"));
    }

    #[test]
    fn test_last_registration_wins_at_dispatch() {
        let dispatcher = dispatcher_with(|table| {
            table.register("GET", "/a", Arc::new(|_ctx| "first".into()));
            table.register("GET", "/a", Arc::new(|_ctx| "second".into()));
        });

        let parts = dispatcher.dispatch(&test_ctx("GET", "/a"));
        assert_eq!(body_string(&parts), "second");
    }

    #[test]
    fn test_same_path_different_verbs_dispatch_independently() {
        let dispatcher = dispatcher_with(|table| {
            table.register("GET", "/x", Arc::new(|_ctx| "got".into()));
            table.register("POST", "/x", Arc::new(|_ctx| "posted".into()));
        });

        assert_eq!(body_string(&dispatcher.dispatch(&test_ctx("GET", "/x"))), "got");
        assert_eq!(
            body_string(&dispatcher.dispatch(&test_ctx("POST", "/x"))),
            "posted"
        );
    }

    #[test]
    fn test_handler_reads_current_request_context() {
        let dispatcher = dispatcher_with(|table| {
            table.register(
                "GET",
                "/echo",
                Arc::new(|ctx| {
                    HandlerOutcome::Text(ctx.param("name").map_or_else(
                        || "nobody".to_string(),
                        |value| value.first().to_string(),
                    ))
                }),
            );
        });

        let ctx = RequestContext::new(
            "GET",
            "/echo",
            Some("name=alice"),
            HeaderMap::new(),
            Bytes::new(),
        );
        assert_eq!(body_string(&dispatcher.dispatch(&ctx)), "alice");

        // A fresh context with no params resolves independently
        let parts = dispatcher.dispatch(&test_ctx("GET", "/echo"));
        assert_eq!(body_string(&parts), "nobody");
    }

    #[test]
    fn test_concurrent_dispatch_is_consistent() {
        let dispatcher = dispatcher_with(|table| {
            table.register("GET", "/a", Arc::new(|_ctx| "a".into()));
            table.register("GET", "/b", Arc::new(|_ctx| "b".into()));
        });
        let dispatcher = Arc::new(dispatcher);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let dispatcher = Arc::clone(&dispatcher);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    let a = dispatcher.dispatch(&test_ctx("GET", "/a"));
                    let b = dispatcher.dispatch(&test_ctx("GET", "/b"));
                    let miss = dispatcher.dispatch(&test_ctx("GET", "/c"));
                    assert_eq!(body_string(&a), "a");
                    assert_eq!(body_string(&b), "b");
                    assert_eq!(miss.status, 404);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(dispatcher.table().len(), 2);
    }
}
