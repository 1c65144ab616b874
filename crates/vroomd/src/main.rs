//! vroomd - VROOM Server Daemon
//!
//! REST backend for the VROOM vehicle diagnostics app.
//!
//! Usage:
//!   vroomd [--config <config.toml>] [--host <ip>] [--port <port>]
//!
//! Without a config file the server listens on 0.0.0.0:8000 with an
//! in-memory store.

mod config;

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vroom_api::{create_router, AppState, SessionManager};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "vroomd")]
#[command(version, about = "VROOM backend server")]
struct Args {
    /// Server config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides the config file)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "vroomd=info,vroom_api=info,vroom_core=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting vroomd (VROOM Backend API)");

    let args = Args::parse();

    let config = match args.config {
        Some(ref path) => {
            tracing::info!("Loading config from: {}", path.display());
            Config::load(path)?
        }
        None => {
            tracing::info!("No config file provided, using defaults");
            Config::default()
        }
    }
    .merge_with_args(args.host, args.port);

    let state = AppState::in_memory(config.api_config());
    if let Some(interval) = config.purge_interval() {
        tokio::spawn(purge_sessions(state.sessions_arc(), interval));
    }

    let app = create_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Periodically drop expired sessions
async fn purge_sessions(sessions: Arc<SessionManager>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let purged = sessions.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired sessions");
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
