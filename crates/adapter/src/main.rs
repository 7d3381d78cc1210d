//! Petstore MCP adapter entrypoint.
//!
//! Default transport is stdio (the protocol owns stdout, logs go to
//! stderr). `--http` switches to the rmcp streamable HTTP server with
//! `GET /health` and the MCP endpoint nested at `/mcp`.

mod server;

use anyhow::Context as _;
use clap::Parser;
use rmcp::ServiceExt as _;
use rmcp::transport::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use server::PetstoreServer;
use std::net::SocketAddr;
use unrelated_petstore_tools::client::TransportConfig;
use unrelated_petstore_tools::dispatch::Dispatcher;

#[derive(Debug, Parser)]
#[command(
    name = "unrelated-petstore-adapter",
    about = "Expose the Swagger Petstore API as MCP tools",
    version
)]
struct Cli {
    /// Serve MCP over streamable HTTP instead of stdio.
    #[arg(long)]
    http: bool,

    /// Bind address for HTTP mode.
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Log level filter (RUST_LOG takes precedence when set).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON.
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = TransportConfig::from_env();
    tracing::info!(
        base_url = %config.base_url,
        auth_configured = config.bearer_token.is_some(),
        "starting petstore adapter"
    );

    let dispatcher = Dispatcher::new(config).context("build dispatcher")?;

    if cli.http {
        serve_http(dispatcher, cli.bind).await
    } else {
        serve_stdio(dispatcher).await
    }
}

fn init_tracing(cli: &Cli) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn serve_stdio(dispatcher: Dispatcher) -> anyhow::Result<()> {
    let service = PetstoreServer::new(dispatcher)
        .serve(stdio())
        .await
        .context("serve MCP over stdio")?;
    let _quit = service.waiting().await.context("stdio session ended")?;
    Ok(())
}

async fn serve_http(dispatcher: Dispatcher, bind: SocketAddr) -> anyhow::Result<()> {
    let mcp_service = StreamableHttpService::new(
        move || -> Result<PetstoreServer, std::io::Error> {
            Ok(PetstoreServer::new(dispatcher.clone()))
        },
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    let app = axum::Router::new()
        .route("/health", axum::routing::get(health))
        .nest_service("/mcp", mcp_service);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("bind {bind}"))?;
    tracing::info!(%bind, "serving MCP over streamable HTTP at /mcp");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP")?;
    Ok(())
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({"status": "ok"}))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
