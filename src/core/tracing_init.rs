use crate::core::config::LoggingConfig;
use crate::core::log_format::LineFormat;
use crate::core::rolling::SizeRotatingWriter;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Handle describing the logging pipeline installed for this process
#[derive(Debug, Clone)]
pub struct Logging {
    logger_name: String,
    file: Option<PathBuf>,
    fresh: bool,
}

impl Logging {
    fn already_installed(config: &LoggingConfig) -> Self {
        Self {
            logger_name: config.logger_name.clone(),
            file: None,
            fresh: false,
        }
    }

    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    /// Log file receiving events, `None` when logging to the console only
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Whether this call installed the pipeline (false if one was already in place)
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }
}

/// Install the console and size-rotating file sinks
///
/// Console gets `console_level` and up on stderr, the file gets
/// `file_level` and up. If the log file cannot be opened, the console
/// threshold drops to error and the failure is reported there.
///
/// Only the first call installs anything; later calls return a handle
/// with `is_fresh() == false`.
pub fn init_tracing(config: &LoggingConfig) -> Result<Logging> {
    let console_filter = config.console_filter()?;
    let file_filter = config.file_filter()?;

    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Ok(Logging::already_installed(config));
    }

    let format = LineFormat::new(&config.logger_name).with_time().with_location();

    let opened = config.file.as_ref().map(|path| {
        SizeRotatingWriter::open(path, config.max_file_size, config.backup_count)
            .map_err(|e| (path.clone(), e))
    });

    let (file_layer, file, open_error) = match opened {
        Some(Ok(writer)) => {
            let path = writer.path();
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .event_format(format.clone())
                .with_writer(writer)
                .with_filter(file_filter);
            (Some(layer), Some(path), None)
        }
        Some(Err(open_error)) => (None, None, Some(open_error)),
        None => (None, None, None),
    };

    let console_level = if open_error.is_some() {
        LevelFilter::ERROR
    } else {
        console_filter
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(format)
        .with_writer(std::io::stderr)
        .with_filter(console_level);

    if tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        return Ok(Logging::already_installed(config));
    }

    match (&file, open_error) {
        (Some(path), _) => {
            info!(path = %path.display(), "Log file handler initialized");
        }
        (None, Some((path, e))) => {
            error!(path = %path.display(), error = %e, "Cannot create log file, logging to console only");
        }
        (None, None) => {}
    }

    Ok(Logging {
        logger_name: config.logger_name.clone(),
        file,
        fresh: true,
    })
}
