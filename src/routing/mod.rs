//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (ordered handler scan)
//!     → method.rs (exact method comparison)
//!     → matcher.rs (segment shape + parameter extraction)
//!     → Return: matched handler with params, or NoMatch
//!
//! Registration (before listen):
//!     Handler
//!     → read method + route once
//!     → parse RoutePattern
//!     → append to Router (insertion order)
//! ```
//!
//! # Design Decisions
//! - Routes fixed before serving, immutable at runtime
//! - Deterministic: same input always matches same handler
//! - First match wins (ordered by registration)

pub mod handler;
pub mod matcher;
pub mod method;
pub mod router;

pub use handler::{Context, Handler, HandlerResult, Route};
pub use matcher::{MatchPolicy, Params, RoutePattern};
pub use method::Method;
pub use router::{RouteMatch, Router};
