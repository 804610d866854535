//! Minimal HTTP request router.
//!
//! Handlers declare a method and a route pattern such as `/users/:id`.
//! Each request is matched against the registered handlers in order, its
//! body decoded by content type, and the first matching handler's
//! [`Response`] written back. Unmatched requests get a JSON 404.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use crate::config::RouterConfig;
pub use crate::error::{BoxError, Error};
pub use crate::http::{Body, Request, Response, Server};
pub use crate::lifecycle::Shutdown;
pub use crate::routing::{Context, Handler, HandlerResult, MatchPolicy, Method, Route};
