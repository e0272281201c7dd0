//! HTTP response type returned by transports.

use std::collections::HashMap;

/// A fully drained HTTP response.
///
/// Transports read the whole body before returning, so no connection handle
/// outlives the call that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub code: u16,
    /// Status line text, e.g. `200 OK`.
    pub status: String,
    /// Response headers, keys lowercased, values in arrival order.
    pub headers: HashMap<String, Vec<String>>,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response with no headers.
    #[must_use]
    pub fn new(code: u16, status: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            code,
            status: status.into(),
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Returns `true` for `200 OK`, the only status the protocol engine decodes.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code == 200
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}
