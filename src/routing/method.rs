//! Handler methods.
//!
//! Comparison against the transport's method token is exact and
//! case-sensitive. A method token outside the enumerated set maps to
//! [`Method::Unset`], which never matches anything.

use std::fmt;

/// Method a handler answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    Get,
    Post,
    Head,
    Options,
    Put,
    Delete,
    Patch,
    Connect,
    Trace,
    /// Sentinel for handlers with no method; never matches.
    #[default]
    Unset,
}

impl Method {
    /// Exact, case-sensitive parse. `"get"` is not `GET`.
    pub fn parse(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "HEAD" => Method::Head,
            "OPTIONS" => Method::Options,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "PATCH" => Method::Patch,
            "CONNECT" => Method::Connect,
            "TRACE" => Method::Trace,
            _ => Method::Unset,
        }
    }

    /// Wire token, `None` for [`Method::Unset`].
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Method::Get => Some("GET"),
            Method::Post => Some("POST"),
            Method::Head => Some("HEAD"),
            Method::Options => Some("OPTIONS"),
            Method::Put => Some("PUT"),
            Method::Delete => Some("DELETE"),
            Method::Patch => Some("PATCH"),
            Method::Connect => Some("CONNECT"),
            Method::Trace => Some("TRACE"),
            Method::Unset => None,
        }
    }

    /// Whether a transport-reported method token selects this method.
    pub fn matches(&self, token: &str) -> bool {
        self.as_str().is_some_and(|m| m == token)
    }
}

impl From<&str> for Method {
    fn from(token: &str) -> Self {
        Method::parse(token)
    }
}

impl From<&http::Method> for Method {
    fn from(method: &http::Method) -> Self {
        Method::parse(method.as_str())
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("NONE"))
    }
}
