use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::tmdb::TMDB_BASE;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3146";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FAVORITES_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub tmdb_timeout: Duration,
    pub bind_addr: SocketAddr,
    pub favorites_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let tmdb_api_key = get("TMDB_API_KEY")
            .ok_or_else(|| anyhow::anyhow!("Missing required environment variable: TMDB_API_KEY"))?;
        let tmdb_base_url = get("TMDB_BASE_URL").unwrap_or_else(|| TMDB_BASE.to_string());
        let timeout_secs = match get("TMDB_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("TMDB_TIMEOUT_SECS must be a number of seconds, got '{v}'"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be host:port")?;
        let favorites_dir = PathBuf::from(
            get("FAVORITES_DIR").unwrap_or_else(|| DEFAULT_FAVORITES_DIR.to_string()),
        );

        Ok(Self {
            tmdb_api_key,
            tmdb_base_url,
            tmdb_timeout: Duration::from_secs(timeout_secs.max(1)),
            bind_addr,
            favorites_dir,
        })
    }
}
