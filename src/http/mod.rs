//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (hyper http1, request ID + trace layers)
//!     → request.rs (absolute URL, headers)
//!     → dispatch.rs (route lookup, 404 default)
//!     → content.rs (JSON / form / raw body decoding)
//!     → [handler produces Response]
//!     → response.rs (status, headers, body → wire)
//!     → Send to client, or drop the request on failure
//! ```

pub mod content;
pub mod dispatch;
pub mod request;
pub mod response;
pub mod server;

pub use content::Body;
pub use dispatch::Dispatcher;
pub use request::{Request, X_REQUEST_ID};
pub use response::{HeaderValue, Response, ResponseBody};
pub use server::Server;
