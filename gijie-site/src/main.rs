//! gijie-site - character showcase web server
//!
//! Loads the site data once at startup, then serves the listing, detail,
//! pickup and reference pages plus the JSON and SSE endpoints.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gijie_common::config::SiteConfig;
use gijie_site::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for gijie-site
#[derive(Parser, Debug)]
#[command(name = "gijie-site")]
#[command(about = "Character showcase site server")]
#[command(version)]
struct Args {
    /// Config file (TOML)
    #[arg(long, env = "GIJIE_CONFIG")]
    config: Option<PathBuf>,

    /// Site root folder (data/ and images/ live under it by default)
    #[arg(long, env = "GIJIE_ROOT")]
    root: Option<PathBuf>,

    /// Listen address, overrides the config file
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config decides the log level, so its own diagnostics are logged after init
    let (mut config, origin) = SiteConfig::load(args.config.as_deref(), args.root.as_deref())
        .context("Failed to load configuration")?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting gijie-site v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    origin.log();
    info!("Root folder: {}", config.root_folder.display());
    info!("Data source: {}", config.data_source);
    info!("Assets: {}", config.assets_dir.display());

    let bind_addr = config.bind_addr.clone();
    let state = AppState::initialize(config)
        .await
        .context("Failed to initialize site state")?;

    if let Some(failure) = state.snapshot().await.outcome.required_failure() {
        warn!("Serving degraded pages: {}", failure);
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("gijie-site listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
