//! Request normalization.
//!
//! # Responsibilities
//! - Keep the transport's method token verbatim (no case folding)
//! - Resolve the request target against the `Host` header into an absolute URL
//! - Expose headers, query parameters and the decoded body to handlers
//!
//! # Design Decisions
//! - A missing `Host` resolves against `localhost`
//! - A missing request target resolves as the empty path (the base URL)
//! - The body starts empty and is attached once fully accumulated and decoded

use std::collections::HashMap;

use http::header::{CONTENT_TYPE, HOST};
use http::request::Parts;
use http::{HeaderMap, Method};
use url::Url;

use crate::error::Error;
use crate::http::content::Body;

/// Request correlation header, set by the request-id layer.
pub const X_REQUEST_ID: &str = "x-request-id";

const FALLBACK_HOST: &str = "localhost";

/// A normalized incoming request.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Body,
}

impl Request {
    /// Normalize the head of a transport request.
    pub fn from_parts(parts: &Parts) -> Result<Self, Error> {
        let host = parts
            .headers
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| parts.uri.authority().map(|a| a.as_str()))
            .unwrap_or(FALLBACK_HOST);
        let target = parts.uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("");

        Ok(Self {
            method: parts.method.clone(),
            url: resolve_url(host, target)?,
            headers: parts.headers.clone(),
            body: Body::default(),
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Path of the resolved URL, with dot segments removed.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    /// Query string decoded into a map; a repeated key keeps its last value.
    pub fn query_params(&self) -> HashMap<String, String> {
        self.url.query_pairs().into_owned().collect()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of `name`, if present and valid text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    pub fn request_id(&self) -> Option<&str> {
        self.header(X_REQUEST_ID)
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn set_body(&mut self, body: Body) {
        self.body = body;
    }

    pub fn into_body(self) -> Body {
        self.body
    }
}

fn resolve_url(host: &str, target: &str) -> Result<Url, Error> {
    let base = Url::parse(&format!("http://{}/", host))?;
    Ok(base.join(target)?)
}
