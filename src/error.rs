//! Crate-wide error taxonomy.
//!
//! # Propagation
//! ```text
//! decode / handler / response failure
//!     → Error returned from the dispatcher
//!     → logged at the per-request boundary
//!     → hyper closes the connection without a response
//! ```
//!
//! Startup failures (config, bind, logging) surface to the caller of `listen`.

use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::net::listener::ListenerError;

/// Boxed error produced by handlers and request bodies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used throughout the router.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A route pattern is structurally malformed.
    #[error("the route you provided to handle was incorrectly formatted: {route:?} ({reason})")]
    InvalidRouteProvided { route: String, reason: &'static str },

    /// A body declared as JSON failed to parse.
    #[error("failed to decode JSON body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request target could not be resolved against the Host header.
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request body could not be accumulated.
    #[error("failed to read request body: {0}")]
    Body(#[source] BoxError),

    /// The handler's response computation failed.
    #[error("handler failed: {0}")]
    Handler(#[source] BoxError),

    /// The handler produced a status or header that cannot go on the wire.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

impl Error {
    /// Short stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidRouteProvided { .. } => "invalid_route",
            Error::Decode(_) => "decode",
            Error::InvalidUrl(_) => "invalid_url",
            Error::Body(_) => "body",
            Error::Handler(_) => "handler",
            Error::InvalidResponse(_) => "invalid_response",
            Error::Io(_) => "io",
            Error::Listener(_) => "listener",
            Error::Config(_) => "config",
            Error::Logging(_) => "logging",
        }
    }
}
