//! Logging bootstrap: an optional JSON config file, otherwise `RUST_LOG`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::{filter::Directive, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Contents of the `LOG_CONFIG` file.
///
/// ```json
/// { "level": "info", "directives": ["tower_http=debug"], "format": "json", "ansi": false }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter, same syntax as `RUST_LOG`.
    pub level: String,
    pub directives: Vec<String>,
    pub format: LogFormat,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directives: Vec::new(),
            format: LogFormat::Pretty,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read logging config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid logging config {}", path.display()))
    }

    /// Console logging at the given `RUST_LOG` level.
    pub fn from_level(level: &str) -> Self {
        Self {
            level: level.to_string(),
            ..Self::default()
        }
    }

    pub fn filter(&self) -> Result<EnvFilter> {
        let mut filter = EnvFilter::try_new(&self.level)
            .with_context(|| format!("Invalid log level {:?}", self.level))?;
        for directive in &self.directives {
            let directive: Directive = directive
                .parse()
                .with_context(|| format!("Invalid log directive {directive:?}"))?;
            filter = filter.add_directive(directive);
        }
        Ok(filter)
    }
}

/// Installs the global subscriber.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = config.filter()?;
    let registry = tracing_subscriber::registry().with(filter);
    let fmt = tracing_subscriber::fmt::layer().with_ansi(config.ansi);

    match config.format {
        LogFormat::Pretty => registry.with(fmt.pretty()).try_init(),
        LogFormat::Compact => registry.with(fmt.compact()).try_init(),
        LogFormat::Json => registry.with(fmt.json()).try_init(),
    }
    .context("Failed to install the tracing subscriber")
}
