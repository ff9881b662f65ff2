//! Structured logging setup using tracing
//!
//! Console output is always on; an optional JSON file layer with rotation
//! can be enabled through the `[logging]` configuration section. The dated
//! exception log the recorder writes is a separate, format-stable file and
//! is not a tracing sink.

use crate::config::LoggingConfig;
use crate::domain::{CastorError, Result};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Keeps the non-blocking file writer alive; dropping it flushes and stops
/// the background worker, so hold it until process exit.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global tracing subscriber.
///
/// `level` is the castor-wide default; `RUST_LOG` still wins when set.
/// Returns the guard for the optional file layer.
///
/// # Example
///
/// ```no_run
/// use castor::logging::init_logging;
/// use castor::config::LoggingConfig;
///
/// let config = LoggingConfig::default();
/// let _guard = init_logging("info", &config).expect("Failed to initialize logging");
/// // Keep _guard alive for the duration of the program
/// ```
pub fn init_logging(level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(level)?;
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("castor={level}")))
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(filter())
        .boxed();
    let mut layers = vec![console];

    let file_guard = match config.local_enabled {
        false => None,
        true => {
            let (writer, guard) = file_writer(config)?;
            layers.push(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(writer)
                    .with_filter(filter())
                    .boxed(),
            );
            Some(guard)
        }
    };

    tracing_subscriber::registry().with(layers).init();

    tracing::debug!(
        local_enabled = config.local_enabled,
        local_path = %config.local_path,
        "Logging initialized"
    );

    Ok(LoggingGuard { _file_guard: file_guard })
}

/// Rolling JSON log file under `logging.local_path`.
fn file_writer(
    config: &LoggingConfig,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let rotation = match config.local_rotation.as_str() {
        "hourly" => Rotation::HOURLY,
        _ => Rotation::DAILY,
    };

    std::fs::create_dir_all(&config.local_path).map_err(|e| {
        CastorError::Configuration(format!(
            "Failed to create log directory {}: {}",
            config.local_path, e
        ))
    })?;

    let appender = RollingFileAppender::new(rotation, &config.local_path, "castor.log");
    Ok(tracing_appender::non_blocking(appender))
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(CastorError::Configuration(format!(
            "Invalid log level: {other}. Must be one of: trace, debug, info, warn, error"
        ))),
    }
}
