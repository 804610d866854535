//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use path_router::net::Listener;
use path_router::{RouterConfig, Server, Shutdown};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A router serving on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), path_router::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a server with the handlers added by `setup`.
pub async fn start_server<F>(setup: F) -> TestServer
where
    F: FnOnce(&mut Server),
{
    let mut config = RouterConfig::default();
    config.listener.drain_timeout_secs = 1;

    let mut server = Server::new(config);
    setup(&mut server);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let listener = Listener::from_tokio(listener, 64).unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let handle = tokio::spawn(server.run(listener, rx));

    // Let the accept loop start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer { addr, shutdown, handle }
}

/// Client without pooling so every request opens a fresh connection.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
