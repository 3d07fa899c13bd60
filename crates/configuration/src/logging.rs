use crate::error::ConfigError;
use crate::settings::LoggingSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "knbs-open-data.log";

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `logging.level` when it is set. If a log directory is
/// configured the returned guard must be held until shutdown, otherwise
/// buffered lines are lost.
pub fn init_tracing(settings: &LoggingSettings) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.level.trim()))
        .map_err(|e| ConfigError::ValidationError(format!("invalid logging.level: {e}")))?;

    match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| ConfigError::ValidationError(format!("tracing init failed: {e}")))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .try_init()
                .map_err(|e| ConfigError::ValidationError(format!("tracing init failed: {e}")))?;
            Ok(None)
        }
    }
}
