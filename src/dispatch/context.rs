//! Request context
//!
//! Everything a handler may read about the current request: verb, path,
//! query string, headers, raw body bytes, and a params map merging
//! percent-decoded query-string and urlencoded form-body pairs.
//!
//! A context is built fresh for each request by the host layer and passed to
//! the handler by reference, so handler closures shared across requests
//! never observe another request's state.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::HeaderMap;
use url::form_urlencoded;

/// A request parameter value: a single occurrence, or the accumulated
/// values of a repeated key in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    Many(Vec<String>),
}

impl ParamValue {
    fn push(&mut self, value: String) {
        match self {
            Self::Single(first) => {
                *self = Self::Many(vec![std::mem::take(first), value]);
            }
            Self::Many(values) => values.push(value),
        }
    }

    /// First value, regardless of arity.
    #[must_use]
    pub fn first(&self) -> &str {
        match self {
            Self::Single(value) => value,
            Self::Many(values) => values.first().map_or("", String::as_str),
        }
    }
}

/// The execution context a handler resolves against for one request.
pub struct RequestContext {
    verb: String,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, ParamValue>,
}

impl RequestContext {
    /// Bind a context to one request. The params map is decoded here, from
    /// the query string and, for urlencoded form posts, the body.
    pub fn new(
        verb: impl Into<String>,
        path: impl Into<String>,
        query: Option<&str>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Self {
        let mut params = HashMap::new();
        if let Some(query) = query {
            merge_urlencoded(&mut params, query.as_bytes());
        }
        if is_form_urlencoded(&headers) {
            merge_urlencoded(&mut params, &body);
        }

        Self {
            verb: verb.into(),
            path: path.into(),
            query: query.map(ToString::to_string),
            headers,
            body,
            params,
        }
    }

    #[must_use]
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// Request path component only, without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string, without the leading `?`.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw request body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Merged query-string and form-body parameters.
    #[must_use]
    pub fn params(&self) -> &HashMap<String, ParamValue> {
        &self.params
    }

    #[must_use]
    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }
}

/// True when the request declares an urlencoded form body.
fn is_form_urlencoded(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|content_type| content_type.split(';').next())
        .is_some_and(|media_type| {
            media_type
                .trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

/// Decode `key=value&...` pairs into the params map. Repeated keys
/// accumulate into `Many` in arrival order.
fn merge_urlencoded(params: &mut HashMap<String, ParamValue>, input: &[u8]) {
    for (key, value) in form_urlencoded::parse(input) {
        match params.entry(key.into_owned()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(value.into_owned()),
            Entry::Vacant(entry) => {
                entry.insert(ParamValue::Single(value.into_owned()));
            }
        }
    }
}
