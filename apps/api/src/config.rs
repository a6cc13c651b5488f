use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::revision::DEFAULT_MAX_ATTEMPTS;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Clone)]
pub struct Config {
    pub secret: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Optional JSON logging config; falls back to `rust_log` when unset.
    pub log_config: Option<PathBuf>,
    pub llm_timeout: Duration,
    pub max_revision_attempts: u32,
}

// Keeps the secret and API key out of startup logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("openai_base_url", &self.openai_base_url)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .field("log_config", &self.log_config)
            .field("llm_timeout", &self.llm_timeout)
            .field("max_revision_attempts", &self.max_revision_attempts)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let max_revision_attempts = match lookup("MAX_REVISION_ATTEMPTS") {
            Some(v) => v
                .parse::<u32>()
                .context("MAX_REVISION_ATTEMPTS must be a positive integer")?,
            None => DEFAULT_MAX_ATTEMPTS,
        };
        if max_revision_attempts == 0 {
            bail!("MAX_REVISION_ATTEMPTS must be at least 1");
        }

        Ok(Config {
            secret: require("SECRET")?,
            openai_api_key: require("OPENAI_API_KEY")?,
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_config: lookup("LOG_CONFIG")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            llm_timeout: Duration::from_secs(
                lookup("LLM_TIMEOUT_SECS")
                    .unwrap_or_else(|| "120".to_string())
                    .parse::<u64>()
                    .context("LLM_TIMEOUT_SECS must be a number of seconds")?,
            ),
            max_revision_attempts,
        })
    }
}
