//! Three-sink logging showcase used by the `log-demo` binary.
//!
//! - console (stderr): warn and up, `name - LEVEL - message`
//! - `app.log`: error and up, rolled over at 1 MiB, 5 backups
//! - `time_app.<date>.log`: info and up, new file daily, 7 files kept

use crate::core::log_format::LineFormat;
use crate::core::rolling::SizeRotatingWriter;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info, warn, Subscriber};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, Layer};

pub const LOGGER_NAME: &str = "my_logger";
pub const SIZE_LOG_FILE: &str = "app.log";
pub const SIZE_LOG_MAX_BYTES: u64 = 1024 * 1024;
pub const SIZE_LOG_BACKUPS: usize = 5;
pub const DAILY_LOG_PREFIX: &str = "time_app";
pub const DAILY_LOG_RETAINED: usize = 7;

/// Build the three-sink subscriber writing its files into `dir`
pub fn demo_subscriber(dir: &Path) -> Result<impl Subscriber + Send + Sync + 'static> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(LineFormat::new(LOGGER_NAME))
        .with_writer(std::io::stderr)
        .with_filter(LevelFilter::WARN);

    let size_path = dir.join(SIZE_LOG_FILE);
    let size_writer = SizeRotatingWriter::open(&size_path, SIZE_LOG_MAX_BYTES, SIZE_LOG_BACKUPS)
        .context(format!("Failed to open log file {}", size_path.display()))?;
    let size_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(LineFormat::new(LOGGER_NAME).with_time())
        .with_writer(size_writer)
        .with_filter(LevelFilter::ERROR);

    let daily_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(DAILY_LOG_RETAINED)
        .filename_prefix(DAILY_LOG_PREFIX)
        .filename_suffix("log")
        .build(dir)
        .context(format!("Failed to create daily log appender in {}", dir.display()))?;
    let daily_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(LineFormat::new(LOGGER_NAME).with_time())
        .with_writer(daily_appender)
        .with_filter(LevelFilter::INFO);

    Ok(tracing_subscriber::registry()
        .with(console_layer)
        .with(size_layer)
        .with(daily_layer))
}

/// One event per severity; tracing has no critical level, so the last one
/// is an error flagged `critical`
pub fn emit_samples() {
    debug!("This is a debug message");
    info!("This is an info message");
    warn!("This is a warning message");
    error!("This is an error message");
    error!(critical = true, "This is a critical message");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn daily_log_contents(dir: &Path) -> String {
        let entry = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .find(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| name.starts_with(DAILY_LOG_PREFIX))
                    .unwrap_or(false)
            })
            .expect("daily log file");
        fs::read_to_string(entry).unwrap()
    }

    #[test]
    fn test_sinks_apply_their_thresholds() {
        let temp_dir = TempDir::new().unwrap();
        let subscriber = demo_subscriber(temp_dir.path()).unwrap();

        tracing::subscriber::with_default(subscriber, emit_samples);

        let size_log = fs::read_to_string(temp_dir.path().join(SIZE_LOG_FILE)).unwrap();
        assert_eq!(size_log.lines().count(), 2);
        assert!(size_log.contains(" - my_logger - ERROR - This is an error message"));
        assert!(size_log.contains("This is a critical message critical=true"));
        assert!(!size_log.contains("warning"));

        let daily_log = daily_log_contents(temp_dir.path());
        assert_eq!(daily_log.lines().count(), 4);
        assert!(daily_log.contains(" - my_logger - INFO - This is an info message"));
        assert!(daily_log.contains(" - my_logger - WARN - This is a warning message"));
        assert!(!daily_log.contains("debug"));
    }
}
