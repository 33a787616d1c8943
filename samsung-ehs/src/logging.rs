//! Logging setup for hosts embedding the integration
//!
//! Library code only emits `tracing` events. A host picks how they are
//! rendered, or leaves them dropped.

use tracing_subscriber::{fmt, EnvFilter, Registry};

const MODE_VAR: &str = "EHS_LOG_MODE";
const LEVEL_VAR: &str = "EHS_LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber; events are dropped
    Silent,
    /// Compact stderr output at `info`
    Development,
    /// Pretty output at `debug` with thread ids and source locations
    Debug,
    /// One JSON object per line at `info`
    Json,
}

impl LoggingMode {
    /// `development`, `debug` or `json`; anything else is silent
    pub fn from_name(name: &str) -> Self {
        match name {
            "development" => LoggingMode::Development,
            "debug" => LoggingMode::Debug,
            "json" => LoggingMode::Json,
            _ => LoggingMode::Silent,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Invalid environment variable: {0}")]
    InvalidEnv(String),
}

/// Install a global subscriber for `mode`
///
/// # Environment Variables
///
/// - `EHS_LOG_LEVEL`: filter directives, e.g. `ehs_coordinator=debug`
/// - `RUST_LOG`: used when `EHS_LOG_LEVEL` is unset
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let filter = create_env_filter("info")?;
            Registry::default()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .compact(),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let filter = create_env_filter("debug")?;
            Registry::default()
                .with(
                    fmt::layer()
                        .pretty()
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Json => {
            let filter = create_env_filter("info")?;
            Registry::default()
                .with(fmt::layer().json().with_current_span(false))
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Mode from `EHS_LOG_MODE`, silent when unset
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = match std::env::var(MODE_VAR) {
        Ok(name) => LoggingMode::from_name(&name),
        Err(std::env::VarError::NotPresent) => LoggingMode::Silent,
        Err(e) => return Err(LoggingError::InvalidEnv(format!("{}: {}", MODE_VAR, e))),
    };

    init_logging(mode)
}

fn create_env_filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    let directives = std::env::var(LEVEL_VAR)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_level.to_string());

    EnvFilter::try_new(&directives)
        .map_err(|e| LoggingError::InvalidEnv(format!("{}: {}", directives, e)))
}

pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}

pub fn init_silent() -> Result<(), LoggingError> {
    init_logging(LoggingMode::Silent)
}
