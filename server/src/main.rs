//! `alttext-server` entry point.
//!
//! Loads `.env`, then the layered configuration, and serves the relay until
//! Ctrl-C.

use std::path::PathBuf;

use alttext_core::ConfigLoader;
use alttext_server::AppState;
use alttext_server::build_router;
use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

#[derive(Debug, Parser)]
#[command(version, about = "Alt-text relay HTTP server")]
struct Args {
    /// Path to a TOML config file. Defaults to `alttext.toml` if present.
    #[arg(long, env = "ALTTEXT_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on. Overrides config and `PORT`.
    #[arg(long)]
    port: Option<u16>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json = std::env::var("ALTTEXT_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("signal received, shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal outside development.
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();
    let mut loader = ConfigLoader::new();
    if let Some(path) = args.config {
        loader = loader.with_config_path(path);
    }
    let mut config = loader.load().context("loading configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }

    if config.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; generation requests will fail");
    }
    tracing::info!(
        model = %config.model,
        allowed_origins = ?config.allowed_origins,
        max_upload_bytes = config.max_upload_bytes,
        "alttext-server v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let bind_address = config.bind_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("binding {bind_address}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    let app = build_router(AppState::new(config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("server stopped");
    Ok(())
}
