use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::autofill::AutofillTimings;

/// Application configuration loaded from environment variables.
/// Every variable has a default, so a bare `cargo run` talks to a local backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub backend_timeout_secs: u64,
    pub initial_delay_ms: u64,
    pub verify_delay_ms: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            backend_url: std::env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string()),
            backend_timeout_secs: parse_env("BACKEND_TIMEOUT_SECS", 30)?,
            initial_delay_ms: parse_env("AUTOFILL_INITIAL_DELAY_MS", 500)?,
            verify_delay_ms: parse_env("AUTOFILL_VERIFY_DELAY_MS", 1000)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn timings(&self) -> AutofillTimings {
        AutofillTimings {
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            verify_delay: Duration::from_millis(self.verify_delay_ms),
        }
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
