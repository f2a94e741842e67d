//! Runtime settings loaded from the environment (and an optional `.env` file).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::breeds;

/// Server and breed-lookup configuration.
///
/// | Env Var                        | Default                     |
/// |--------------------------------|-----------------------------|
/// | `SCA_HOST`                     | `127.0.0.1`                 |
/// | `SCA_PORT`                     | `8000`                      |
/// | `DATABASE_PATH`                | platform data dir           |
/// | `THECATAPI_URL`                | `https://api.thecatapi.com` |
/// | `THECATAPI_KEY`                | unset                       |
/// | `BREED_CACHE_TTL_SECONDS`      | `3600`                      |
/// | `BREED_LOOKUP_TIMEOUT_SECONDS` | `10`                        |
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// `None` means the platform default location.
    pub database_path: Option<PathBuf>,
    pub thecatapi_url: String,
    pub thecatapi_key: Option<String>,
    pub breed_cache_ttl: Duration,
    pub breed_lookup_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            database_path: None,
            thecatapi_url: breeds::THECATAPI_URL.to_string(),
            thecatapi_key: None,
            breed_cache_ttl: Duration::from_secs(3600),
            breed_lookup_timeout: Duration::from_secs(10),
        }
    }
}

impl Settings {
    /// Load `.env` (if present) and read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("SCA_PORT") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("SCA_PORT must be a valid port, got {v:?}"))?,
            None => defaults.port,
        };

        let breed_cache_ttl = match non_empty("BREED_CACHE_TTL_SECONDS") {
            Some(v) => Duration::from_secs(v.trim().parse().with_context(|| {
                format!("BREED_CACHE_TTL_SECONDS must be a non-negative integer, got {v:?}")
            })?),
            None => defaults.breed_cache_ttl,
        };

        let breed_lookup_timeout = match non_empty("BREED_LOOKUP_TIMEOUT_SECONDS") {
            Some(v) => {
                let secs: u64 = v.trim().parse().with_context(|| {
                    format!("BREED_LOOKUP_TIMEOUT_SECONDS must be a positive integer, got {v:?}")
                })?;
                anyhow::ensure!(secs > 0, "BREED_LOOKUP_TIMEOUT_SECONDS must be positive");
                Duration::from_secs(secs)
            }
            None => defaults.breed_lookup_timeout,
        };

        Ok(Self {
            host: non_empty("SCA_HOST").unwrap_or(defaults.host),
            port,
            database_path: non_empty("DATABASE_PATH").map(PathBuf::from),
            thecatapi_url: non_empty("THECATAPI_URL").unwrap_or(defaults.thecatapi_url),
            thecatapi_key: non_empty("THECATAPI_KEY"),
            breed_cache_ttl,
            breed_lookup_timeout,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
