//! Logging setup
//!
//! The library only emits `tracing` events. Embedders that want output call
//! [`init`] once; later calls are ignored.

use crate::config::{ConfigError, LogConfig, LogFormat};
use std::io;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Install a global subscriber configured from `config`
///
/// Returns `Ok(false)` if another subscriber was already installed.
pub fn init(config: &LogConfig) -> Result<bool, ConfigError> {
    let targets = Targets::new()
        .with_default(config.global()?)
        .with_target("abckit::file", config.level_for("file")?)
        .with_target("abckit::inspect", config.level_for("inspect")?)
        .with_target("abckit::modify", config.level_for("modify")?)
        .with_target("abckit::ir", config.level_for("ir")?);

    let layer = format_layer(config.format).with_filter(targets);
    Ok(tracing_subscriber::registry().with(layer).try_init().is_ok())
}

fn format_layer(format: LogFormat) -> Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync> {
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .without_time()
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
    }
}

/// Simple logger for tests
#[cfg(test)]
pub(crate) fn init_test_logger() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_rejects_bad_level() {
        let config = LogConfig {
            ir: Some("chatty".to_string()),
            ..LogConfig::default()
        };
        assert!(init(&config).is_err());
    }

    #[test]
    fn test_init_is_idempotent() {
        init_test_logger();
        // A subscriber is already installed, so this reports false
        assert!(!init(&LogConfig::default()).unwrap());
    }
}
