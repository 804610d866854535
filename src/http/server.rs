//! HTTP server setup.
//!
//! # Responsibilities
//! - Hold the handler registry while routes are registered
//! - Freeze the registry and bind the listener on `listen`
//! - Serve each accepted connection with hyper on its own task
//! - Wire up middleware: request IDs and HTTP tracing
//! - Drain open connections on shutdown

use std::sync::Arc;
use std::time::Duration;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::RouterConfig;
use crate::error::Error;
use crate::http::dispatch::Dispatcher;
use crate::lifecycle::{signals, Shutdown};
use crate::net::{ConnectionGuard, ConnectionPermit, ConnectionTracker, Listener};
use crate::observability::metrics;
use crate::routing::handler::Handler;
use crate::routing::router::Router;

/// HTTP router server.
///
/// Register handlers first, then call [`Server::listen`]. Serving consumes
/// the server, so the registry cannot change afterwards.
pub struct Server {
    router: Router,
    config: RouterConfig,
}

impl Server {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            router: Router::new(config.routing.match_policy),
            config,
        }
    }

    /// Default configuration on `port`.
    pub fn with_port(port: u16) -> Self {
        Self::new(RouterConfig::with_port(port))
    }

    /// Add a handler. Chainable.
    pub fn register<H: Handler>(&mut self, handler: H) -> &mut Self {
        self.router.register(handler);
        self
    }

    /// Add an already shared handler. Chainable.
    pub fn register_shared(&mut self, handler: Arc<dyn Handler>) -> &mut Self {
        self.router.register_shared(handler);
        self
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Bind the configured port and serve until SIGINT/SIGTERM.
    pub async fn listen(self) -> Result<(), Error> {
        if self.config.observability.metrics_enabled {
            match self.config.observability.metrics_address.parse() {
                Ok(addr) => {
                    if let Err(e) = metrics::init_metrics(addr) {
                        tracing::error!(error = %e, "Failed to start metrics endpoint");
                    }
                }
                Err(_) => tracing::error!(
                    metrics_address = %self.config.observability.metrics_address,
                    "Failed to parse metrics address"
                ),
            }
        }

        let listener = Listener::bind(&self.config.listener).await?;
        tracing::info!(port = self.config.listener.port, "Beginning service on ::{}", self.config.listener.port);

        let shutdown = Shutdown::new();
        let shutdown_rx = shutdown.subscribe();
        signals::spawn_signal_listener(shutdown);

        self.run(listener, shutdown_rx).await
    }

    /// Serve connections from `listener` until `shutdown` fires.
    pub async fn run(self, listener: Listener, mut shutdown: broadcast::Receiver<()>) -> Result<(), Error> {
        let addr = listener.local_addr()?;
        let drain_timeout = Duration::from_secs(self.config.listener.drain_timeout_secs);
        let dispatcher = Dispatcher::new(Arc::new(self.router));
        let tracker = ConnectionTracker::new();

        tracing::info!(
            address = %addr,
            routes = dispatcher.router().len(),
            match_policy = ?dispatcher.router().policy(),
            "HTTP server starting"
        );

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer, permit)) => {
                        let guard = tracker.track();
                        tracing::debug!(connection_id = %guard.id(), peer_addr = %peer, "Serving connection");
                        tokio::spawn(serve_connection(
                            stream,
                            dispatcher.clone(),
                            shutdown.resubscribe(),
                            guard,
                            permit,
                        ));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                    }
                },
                _ = shutdown.recv() => break,
            }
        }

        tracing::info!(open_connections = tracker.active_count(), "Stopped accepting connections");
        if !tracker.drain(drain_timeout).await {
            tracing::warn!(
                open_connections = tracker.active_count(),
                "Drain timeout elapsed, abandoning open connections"
            );
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

/// Serve one connection. Dropping the guard and permit frees its slot.
async fn serve_connection(
    stream: TcpStream,
    dispatcher: Dispatcher,
    mut shutdown: broadcast::Receiver<()>,
    guard: ConnectionGuard,
    _permit: ConnectionPermit,
) {
    let service = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http().on_failure(()))
        .service(tower::service_fn(move |req: hyper::Request<Incoming>| {
            let dispatcher = dispatcher.clone();
            async move { dispatcher.dispatch(req).await }
        }));

    let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), TowerToHyperService::new(service));
    tokio::pin!(conn);

    let result = tokio::select! {
        res = conn.as_mut() => res,
        _ = shutdown.recv() => {
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    };

    // A dropped request surfaces here as a user-service error.
    if let Err(e) = result {
        tracing::debug!(connection_id = %guard.id(), error = %e, "Connection ended with error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::matcher::MatchPolicy;

    #[test]
    fn router_follows_configured_policy() {
        let mut config = RouterConfig::default();
        config.routing.match_policy = MatchPolicy::Strict;
        let server = Server::new(config);
        assert_eq!(server.router().policy(), MatchPolicy::Strict);

        let server = Server::with_port(8080);
        assert_eq!(server.config().listener.port, 8080);
        assert_eq!(server.router().policy(), MatchPolicy::SegmentCount);
    }
}
