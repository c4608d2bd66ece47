//! Handler outcome and response types
//!
//! A handler returns either a bare text body or a structured response, so
//! normalization in the dispatcher is an exhaustive match instead of a
//! runtime type check.

use hyper::body::Bytes;

/// What a handler returns.
pub enum HandlerOutcome {
    /// Sugar for "200 OK with this body".
    Text(String),
    /// A full response triple, passed through dispatch unchanged.
    Response(ResponseParts),
}

impl From<String> for HandlerOutcome {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for HandlerOutcome {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<ResponseParts> for HandlerOutcome {
    fn from(parts: ResponseParts) -> Self {
        Self::Response(parts)
    }
}

/// The canonical response triple: status code, header pairs, body chunks.
///
/// The host layer concatenates the chunks when serializing onto a
/// fixed-length body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseParts {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<Bytes>,
}

impl ResponseParts {
    /// Response with the given status, no headers, and one body chunk.
    pub fn with_body(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: vec![body.into()],
        }
    }

    /// Total body size in bytes across all chunks.
    #[must_use]
    pub fn body_len(&self) -> usize {
        self.body.iter().map(Bytes::len).sum()
    }

    /// Concatenated body chunks. Single-chunk bodies are returned without
    /// copying.
    #[must_use]
    pub fn body_bytes(&self) -> Bytes {
        match self.body.as_slice() {
            [] => Bytes::new(),
            [single] => single.clone(),
            chunks => {
                let mut buf = Vec::with_capacity(self.body_len());
                for chunk in chunks {
                    buf.extend_from_slice(chunk);
                }
                Bytes::from(buf)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_body() {
        let parts = ResponseParts::with_body(200, "ok");
        assert_eq!(parts.status, 200);
        assert!(parts.headers.is_empty());
        assert_eq!(parts.body, vec![Bytes::from("ok")]);
    }

    #[test]
    fn test_body_bytes_concatenates_chunks() {
        let parts = ResponseParts {
            status: 200,
            headers: Vec::new(),
            body: vec![Bytes::from("hello "), Bytes::from("world")],
        };
        assert_eq!(parts.body_len(), 11);
        assert_eq!(parts.body_bytes(), Bytes::from("hello world"));
    }

    #[test]
    fn test_body_bytes_empty() {
        let parts = ResponseParts {
            status: 204,
            headers: Vec::new(),
            body: Vec::new(),
        };
        assert_eq!(parts.body_len(), 0);
        assert!(parts.body_bytes().is_empty());
    }

    #[test]
    fn test_text_from_str() {
        match HandlerOutcome::from("ok") {
            HandlerOutcome::Text(text) => assert_eq!(text, "ok"),
            HandlerOutcome::Response(_) => panic!("expected text outcome"),
        }
    }
}
