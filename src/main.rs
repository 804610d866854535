//! path-router demo server.
//!
//! Registers a few handlers and serves them:
//!
//! | Method | Route | Response |
//! |---|---|---|
//! | GET | `/health` | `{"status": "ok"}` |
//! | GET | `/users/:id` | `{"id": <id>}` |
//! | POST | `/echo` | the decoded request body |
//!
//! Anything else gets the default 404.

use std::path::PathBuf;

use clap::Parser;
use serde_json::json;

use path_router::config::{check_config, read_config, RouterConfig};
use path_router::http::content::Body;
use path_router::observability::logging;
use path_router::{Context, Response, Route, Server};

#[derive(Parser)]
#[command(name = "path-router")]
#[command(about = "Minimal HTTP request router", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => RouterConfig::default(),
    };
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    let config = check_config(config)?;

    logging::init(&config.observability)?;

    tracing::info!("path-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        host = %config.listener.host,
        port = config.listener.port,
        max_connections = config.listener.max_connections,
        match_policy = ?config.routing.match_policy,
        "Configuration loaded"
    );

    let mut server = Server::new(config);
    server
        .register(Route::get("/health", |_ctx: Context| async {
            Ok(Response::new(200, json!({ "status": "ok" })))
        }))
        .register(Route::get("/users/:id", |ctx: Context| async move {
            Ok(Response::new(200, json!({ "id": ctx.param("id") })).header("Content-Type", "application/json"))
        }))
        .register(Route::post("/echo", |ctx: Context| async move {
            let echoed = match ctx.req.into_body() {
                Body::Json(value) => value,
                Body::Form(form) => json!(form),
                Body::Text(text) => json!(text),
            };
            Ok(Response::new(200, echoed).header("Content-Type", "application/json"))
        }));

    server.listen().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
