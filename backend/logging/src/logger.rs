//! Structured Logger
//!
//! Wraps `tracing` with an `EnvFilter`, a console layer on stderr, and an
//! optional daily-rotated JSON file layer.

use std::path::Path;

use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global logger.
///
/// `RUST_LOG` takes precedence over `level`. Console output goes to stderr so
/// stdout carries only the conversation's final answer. When `log_dir` is set,
/// NDJSON is also written to `funcloop.log.YYYY-MM-DD` inside it.
///
/// Fails without installing anything when `log_dir` cannot be created.
pub fn init_logger(level: &str, log_dir: Option<&Path>) -> Result<(), InitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let file_layer = match log_dir {
        Some(dir) => {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("funcloop.log")
                .build(dir)?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file_appender)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}
