use crate::config::LogConfig;
use crate::error::{AppError, ConfigError, Result};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, Layer, Registry};

/// Where and how verbosely a run is logged.
#[derive(Debug)]
pub struct LoggerConfig {
    pub directory: String,
    pub file_name: String,
    pub rotation: Rotation,
    pub level: Level,
}

impl LoggerConfig {
    /// One file per day under `[logging].directory`.
    pub fn from_config(config: &LogConfig) -> Result<Self> {
        Ok(Self {
            directory: config.directory.clone(),
            file_name: config.filename.clone(),
            rotation: Rotation::DAILY,
            level: parse_log_level(&config.level)?,
        })
    }
}

/// Installs the global subscriber: a plain-text rolling file plus colored stdout.
pub fn init_logging(config: LoggerConfig) -> Result<()> {
    std::fs::create_dir_all(&config.directory).map_err(|e| {
        ConfigError::InvalidValue(format!(
            "log directory {} cannot be created: {}",
            config.directory, e
        ))
    })?;

    let level = LevelFilter::from_level(config.level);
    let file_appender =
        RollingFileAppender::new(config.rotation, &config.directory, &config.file_name);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(level);

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_ansi(true)
        .with_filter(level);

    let subscriber = Registry::default().with(file_layer).with(stdout_layer);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ConfigError::InvalidValue(format!("logging already initialised: {}", e)))?;

    Ok(())
}

pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(AppError::Config(ConfigError::InvalidValue(format!(
            "Invalid log level: {}",
            level
        )))),
    }
}

/// `log_error!(err => "...")` records an `AppError` with a `kind` field naming
/// the stage that failed. Without `=>` it forwards to `tracing::error!`.
#[macro_export]
macro_rules! log_error {
    ($err:expr => $($arg:tt)*) => {{
        use tracing::error;
        use $crate::error::AppError;

        match $err {
            err @ AppError::Config(_) => error!(error = %err, kind = "config", $($arg)*),
            err @ AppError::Client(_) => error!(error = %err, kind = "client", $($arg)*),
            err @ AppError::Scraper(_) => error!(error = %err, kind = "scraper", $($arg)*),
            err @ AppError::Document(_) => error!(error = %err, kind = "document", $($arg)*),
            err @ AppError::Upload(_) => error!(error = %err, kind = "upload", $($arg)*),
            err @ AppError::Io(_) => error!(error = %err, kind = "io", $($arg)*),
            err @ AppError::Serde(_) => error!(error = %err, kind = "serde", $($arg)*),
        }
    }};
    ($($arg:tt)*) => {
        tracing::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*);
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        tracing::info!($($arg)*);
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*);
    };
}
