//! Handler responses and their serialization onto the wire.
//!
//! # Responsibilities
//! - Model what a handler returns: status, headers, body
//! - Write headers (scalar or sequence), status and body into a hyper response
//!
//! # Design Decisions
//! - A header set twice (any case) keeps only the last value, like `setHeader`
//! - Text bodies are written unmodified; structured bodies are JSON-encoded
//! - No headers are added on the handler's behalf
//! - A status or header that cannot be represented is an error, not a panic

use std::collections::BTreeMap;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue as WireValue};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;
use serde_json::{json, Number, Value};

use crate::error::Error;

/// Value of a response header.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Text(String),
    Number(Number),
    List(Vec<String>),
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Text(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Text(value)
    }
}

impl From<i64> for HeaderValue {
    fn from(value: i64) -> Self {
        HeaderValue::Number(value.into())
    }
}

impl From<u64> for HeaderValue {
    fn from(value: u64) -> Self {
        HeaderValue::Number(value.into())
    }
}

impl From<Vec<String>> for HeaderValue {
    fn from(values: Vec<String>) -> Self {
        HeaderValue::List(values)
    }
}

impl From<Vec<&str>> for HeaderValue {
    fn from(values: Vec<&str>) -> Self {
        HeaderValue::List(values.into_iter().map(str::to_string).collect())
    }
}

impl HeaderValue {
    fn wire_values(&self) -> Vec<String> {
        match self {
            HeaderValue::Text(text) => vec![text.clone()],
            HeaderValue::Number(number) => vec![number.to_string()],
            HeaderValue::List(values) => values.clone(),
        }
    }
}

/// Response body as produced by a handler.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Text(String),
    Json(Value),
}

impl ResponseBody {
    fn into_bytes(self) -> Bytes {
        match self {
            ResponseBody::Text(text) => Bytes::from(text),
            ResponseBody::Json(value) => Bytes::from(value.to_string()),
        }
    }
}

impl From<&str> for ResponseBody {
    fn from(text: &str) -> Self {
        ResponseBody::Text(text.to_string())
    }
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        ResponseBody::Text(text)
    }
}

impl From<Value> for ResponseBody {
    fn from(value: Value) -> Self {
        ResponseBody::Json(value)
    }
}

/// Outgoing response, consumed once by [`Response::into_http`].
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    /// Lowercase names when set through [`Response::header`].
    pub headers: BTreeMap<String, HeaderValue>,
    pub body: ResponseBody,
}

impl Default for Response {
    /// `404 {"error": "RESOURCE_NOT_FOUND"}` with no headers.
    fn default() -> Self {
        Self::not_found()
    }
}

impl Response {
    pub fn new(status: u16, body: impl Into<ResponseBody>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Response whose body is `value` serialized as JSON.
    pub fn json<T: Serialize>(status: u16, value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(status, serde_json::to_value(value)?))
    }

    /// The response given when no handler matches.
    pub fn not_found() -> Self {
        Self::new(404, json!({ "error": "RESOURCE_NOT_FOUND" }))
    }

    /// Set a header, replacing any earlier value under the same name in any case.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.headers.insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Serialize into a hyper response.
    pub fn into_http(self) -> Result<http::Response<Full<Bytes>>, Error> {
        let status = StatusCode::from_u16(self.status)
            .map_err(|_| Error::InvalidResponse(format!("status code {}", self.status)))?;

        let mut response = http::Response::new(Full::new(self.body.into_bytes()));
        *response.status_mut() = status;

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::InvalidResponse(format!("header name {:?}", name)))?;
            headers.remove(&name);
            for v in value.wire_values() {
                let v = WireValue::from_str(&v)
                    .map_err(|_| Error::InvalidResponse(format!("value of header {}", name)))?;
                headers.append(name.clone(), v);
            }
        }

        Ok(response)
    }
}
