//! Route table
//!
//! Two-level mapping from verb to (exact path -> handler). Populated during
//! the configuration phase and frozen before serving begins; lookups never
//! mutate, so a frozen table is safe to share across workers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::dispatch::{HandlerOutcome, RequestContext};

/// A route handler: invoked once per matching request, always against a
/// context freshly bound to that request. Shared behind `Arc` so the frozen
/// table can be cloned cheaply.
pub type Handler = Arc<dyn Fn(&RequestContext) -> HandlerOutcome + Send + Sync>;

/// One (verb, path) entry from a table snapshot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RouteEntry {
    pub verb: String,
    pub path: String,
}

/// The route table: verb -> (exact path -> handler).
///
/// Registration is last-write-wins per (verb, path) key and never fails.
/// Verbs are not validated; an unknown verb is a legal key that simply never
/// matches standard traffic.
#[derive(Default, Clone)]
pub struct RouteTable {
    routes: HashMap<String, HashMap<String, Handler>>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `handler` under `(verb, path)`, silently overwriting any prior
    /// entry for that key.
    pub fn register(
        &mut self,
        verb: impl Into<String>,
        path: impl Into<String>,
        handler: Handler,
    ) {
        self.routes
            .entry(verb.into())
            .or_default()
            .insert(path.into(), handler);
    }

    /// Exact-match lookup. No normalization, no prefix or pattern logic;
    /// `None` means no route.
    #[must_use]
    pub fn lookup(&self, verb: &str, path: &str) -> Option<&Handler> {
        self.routes.get(verb)?.get(path)
    }

    /// Owned, sorted listing of the registered (verb, path) pairs at call
    /// time. Registrations made after the call do not affect the returned
    /// listing.
    #[must_use]
    pub fn snapshot(&self) -> Vec<RouteEntry> {
        let mut entries: Vec<RouteEntry> = self
            .routes
            .iter()
            .flat_map(|(verb, paths)| {
                paths.keys().map(move |path| RouteEntry {
                    verb: verb.clone(),
                    path: path.clone(),
                })
            })
            .collect();
        entries.sort();
        entries
    }

    /// Number of registered routes across all verbs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.values().all(HashMap::is_empty)
    }
}
