//! Logging setup for the `couture` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job. Output always goes to stderr so stdout stays clean for
//! command results and `--json` payloads.

use crate::error::{Result, VaultError};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub const LOG_ENV: &str = "COUTURE_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(VaultError::Config(format!(
                "invalid log format '{}' (must be 'text' or 'json')",
                other
            ))),
        }
    }
}

/// `COUTURE_LOG` wins over the configured level.
fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .map_err(|e| VaultError::Config(format!("invalid log level '{}': {}", level, e)))
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = build_env_filter(level)?;
    let base = Registry::default().with(filter);

    let installed = match format {
        LogFormat::Json => base
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => base
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    installed.map_err(|e| VaultError::Config(format!("failed to install logger: {}", e)))
}
