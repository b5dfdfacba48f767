use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use tracing::info;

use crate::catalog::{DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL};

const DEFAULT_BIND: &str = "0.0.0.0:3146";

/// Runtime settings, read from the environment (`.env` is loaded by the
/// binaries before this runs).
#[derive(Debug, Clone)]
pub struct Settings {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub tmdb_image_base_url: String,
    /// Bearer token for batch export. Only the server requires it.
    pub api_key: Option<String>,
    pub bind: SocketAddr,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let tmdb_api_key = required("TMDB_API_KEY")?;
        let bind = optional("REELFETCH_BIND")
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
            .parse()
            .context("REELFETCH_BIND is not a valid socket address")?;
        Ok(Self {
            tmdb_api_key,
            tmdb_base_url: optional("TMDB_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            tmdb_image_base_url: optional("TMDB_IMAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string()),
            api_key: optional("REELFETCH_API_KEY"),
            bind,
        })
    }

    /// Settings for the HTTP server, which additionally needs the batch token.
    pub fn for_server() -> Result<Self> {
        let settings = Self::from_env()?;
        if settings.api_key.is_none() {
            anyhow::bail!("Missing required environment variable: REELFETCH_API_KEY");
        }
        info!("All required environment variables are set");
        Ok(settings)
    }
}

fn required(key: &str) -> Result<String> {
    optional(key).ok_or_else(|| anyhow::anyhow!("Missing required environment variable: {}", key))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
