//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (Server::listen):
//!     Config → Metrics (optional) → Bind listener → Accept loop
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Routes are registered before startup and frozen when serving begins
//! - Shutdown has timeout: open connections are abandoned after the grace period

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
