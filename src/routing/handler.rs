//! Route handlers.
//!
//! A handler is a `(method, route pattern, respond)` triple. Implement
//! [`Handler`] directly for stateful handlers, or wrap an async closure in a
//! [`Route`].

use std::future::Future;

use futures_util::future::BoxFuture;

use crate::error::BoxError;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::routing::matcher::Params;
use crate::routing::method::Method;

/// Outcome of a handler's response computation.
pub type HandlerResult = Result<Response, BoxError>;

/// What a handler receives for one request.
#[derive(Debug, Clone)]
pub struct Context {
    /// Normalized request with its decoded body attached.
    pub req: Request,
    /// Parameters bound from the route pattern.
    pub params: Params,
}

impl Context {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// A registered route handler.
///
/// `method` and `route` are read once, at registration.
pub trait Handler: Send + Sync + 'static {
    /// Method this handler answers. Defaults to the never-matching sentinel.
    fn method(&self) -> Method {
        Method::Unset
    }

    /// Route pattern, e.g. `/users/:id`.
    fn route(&self) -> &str {
        ""
    }

    /// Produce the response for a matched request.
    fn respond(&self, _ctx: Context) -> BoxFuture<'static, HandlerResult> {
        Box::pin(async { Ok(Response::not_found()) })
    }
}

/// Handler backed by an async function.
pub struct Route<F> {
    method: Method,
    pattern: String,
    respond: F,
}

impl<F, Fut> Route<F>
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    pub fn new(method: impl Into<Method>, pattern: impl Into<String>, respond: F) -> Self {
        Self {
            method: method.into(),
            pattern: pattern.into(),
            respond,
        }
    }

    pub fn get(pattern: impl Into<String>, respond: F) -> Self {
        Self::new(Method::Get, pattern, respond)
    }

    pub fn post(pattern: impl Into<String>, respond: F) -> Self {
        Self::new(Method::Post, pattern, respond)
    }

    pub fn put(pattern: impl Into<String>, respond: F) -> Self {
        Self::new(Method::Put, pattern, respond)
    }

    pub fn delete(pattern: impl Into<String>, respond: F) -> Self {
        Self::new(Method::Delete, pattern, respond)
    }
}

impl<F, Fut> Handler for Route<F>
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn method(&self) -> Method {
        self.method
    }

    fn route(&self) -> &str {
        &self.pattern
    }

    fn respond(&self, ctx: Context) -> BoxFuture<'static, HandlerResult> {
        Box::pin((self.respond)(ctx))
    }
}

impl<F> std::fmt::Debug for Route<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}
