//! Configuration management for Sphinx.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use sphinx_common::constants::{
    DEFAULT_COOKIE_NAME, DEFAULT_DATABASE_PATH, DEFAULT_LISTEN_ADDR, DEFAULT_PUBLIC_DIR,
    DEFAULT_SESSION_MAX_AGE_SECS,
};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// SQLite file holding feedback
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Directory with `index.html` and `riddle.html`
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    /// Expose `/_debug_answer` (local tooling only)
    #[serde(default)]
    pub debug_show_answer: bool,

    /// Session cookie configuration
    #[serde(default)]
    pub session: SessionConfig,
}

/// Session cookie configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Secret the signing key is derived from
    #[serde(default)]
    pub secret: Option<String>,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Token and cookie lifetime in seconds
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,

    /// Mark the cookie `Secure` (HTTPS only)
    #[serde(default)]
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: None,
            cookie_name: default_cookie_name(),
            max_age_secs: default_max_age(),
            secure_cookie: false,
        }
    }
}

// Default value functions
fn default_listen_addr() -> String { DEFAULT_LISTEN_ADDR.to_string() }
fn default_database_path() -> PathBuf { PathBuf::from(DEFAULT_DATABASE_PATH) }
fn default_public_dir() -> PathBuf { PathBuf::from(DEFAULT_PUBLIC_DIR) }
fn default_cookie_name() -> String { DEFAULT_COOKIE_NAME.to_string() }
fn default_max_age() -> u64 { DEFAULT_SESSION_MAX_AGE_SECS } // 1 hour

impl AppConfig {
    /// Load configuration from file, with CLI/env overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            tracing::warn!("Config file not found, using defaults");
            Self::default()
        };

        if let Some(ref listen) = args.listen {
            config.listen_addr = listen.clone();
        }
        if let Some(port) = args.port {
            config.listen_addr = with_port(&config.listen_addr, port);
        }
        if let Some(ref database) = args.database {
            config.database_path = database.clone();
        }
        if let Some(ref public_dir) = args.public_dir {
            config.public_dir = public_dir.clone();
        }
        if let Some(ref secret) = args.session_secret {
            config.session.secret = Some(secret.clone());
        }
        if args.debug_show_answer {
            config.debug_show_answer = true;
        }

        Ok(config)
    }
}

/// Replace the port of a `host:port` address
fn with_port(addr: &str, port: u16) -> String {
    let host = addr.rsplit_once(':').map(|(host, _)| host).unwrap_or("0.0.0.0");
    format!("{}:{}", host, port)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            database_path: default_database_path(),
            public_dir: default_public_dir(),
            debug_show_answer: false,
            session: SessionConfig::default(),
        }
    }
}
