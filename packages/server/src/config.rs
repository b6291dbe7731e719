use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string; the in-memory store is used when unset
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub port: u16,
    /// Bound on every individual store call
    pub store_timeout: Duration,
    /// Bound on a whole publish request
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            database_max_connections: 10,
            port: 8000,
            store_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

fn millis(var: &str, default: Duration) -> Result<Duration> {
    match env::var(var) {
        Ok(raw) => {
            let ms: u64 = raw
                .parse()
                .with_context(|| format!("{} must be a number of milliseconds", var))?;
            Ok(Duration::from_millis(ms))
        }
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| defaults.database_max_connections.to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()
                .context("PORT must be a valid number")?,
            store_timeout: millis("STORE_TIMEOUT_MS", defaults.store_timeout)?,
            request_timeout: millis("REQUEST_TIMEOUT_MS", defaults.request_timeout)?,
        })
    }
}
