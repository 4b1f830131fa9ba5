//! # Sphinx - Personal Site Backend
//!
//! Gates the main site behind a trivia riddle and collects visitor
//! feedback with paginated listing and streaming CSV export.
//!
//! ## Architecture
//! ```text
//! Browser ──cookie(signed riddle state)──▶ Sphinx ──▶ SQLite (feedback)
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod error;
mod feedback;
mod gate;
mod pages;
mod riddle;
mod routes;
mod session_token;
mod state;

use crate::config::AppConfig;
use crate::state::AppState;

/// Sphinx - riddle-gated personal site backend
#[derive(Parser, Debug)]
#[command(name = "sphinx")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/sphinx.toml")]
    config: String,

    /// Listen address (overrides config)
    #[arg(short, long, env = "LISTEN_ADDR")]
    listen: Option<String>,

    /// Listen port (overrides the port of the listen address)
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// SQLite database path (overrides config)
    #[arg(long, env = "DATABASE_PATH")]
    database: Option<PathBuf>,

    /// Directory with index.html and riddle.html (overrides config)
    #[arg(long, env = "PUBLIC_DIR")]
    public_dir: Option<PathBuf>,

    /// Secret for signing session cookies
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    session_secret: Option<String>,

    /// Expose the current answer at /_debug_answer (local use only)
    #[arg(long, env = "DEBUG_SHOW_ANSWER", value_parser = clap::builder::FalseyValueParser::new())]
    debug_show_answer: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    init_logging(&args.log_level, args.json_logs)?;

    info!("Starting Sphinx v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(&args.config, &args)?;
    info!("Configuration loaded from {}", args.config);

    if config.debug_show_answer {
        tracing::warn!("Debug answer endpoint is ENABLED; do not run this in production");
    }

    let state = AppState::new(config.clone()).await?;
    info!(path = %state.store.path().display(), "Feedback database ready");
    info!(
        riddles = state.bank.len(),
        categories = state.bank.categories().len(),
        "Riddle bank loaded"
    );

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("Sphinx listening on http://{}", config.listen_addr);

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("Server error")?;

    info!("Sphinx shutdown complete");
    Ok(())
}

/// Initialize structured logging with tracing
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .init();
    }

    Ok(())
}
