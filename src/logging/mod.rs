use crate::config::LoggingConfig;
use log::{debug, error, info, trace, warn, LevelFilter};
use std::sync::{Once, OnceLock};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, FmtSubscriber};

static INIT: Once = Once::new();

/// Keeps the file writer flushing for the lifetime of the process
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Bridge `log` records into tracing. The subscriber may already have
/// installed the bridge, in which case this is a no-op.
fn bridge_log_records(level: LevelFilter) {
    let _ = LogTracer::init();
    log::set_max_level(level);
}

fn level_filter(level: Level) -> LevelFilter {
    match level {
        Level::ERROR => LevelFilter::Error,
        Level::WARN => LevelFilter::Warn,
        Level::INFO => LevelFilter::Info,
        Level::DEBUG => LevelFilter::Debug,
        Level::TRACE => LevelFilter::Trace,
    }
}

/// Initialize the global logger, filtered by `RUST_LOG`.
/// This should be called once at the start of the application
pub fn init_logger() {
    INIT.call_once(|| {
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(false)
            .with_thread_names(true)
            .with_level(true)
            .init();

        bridge_log_records(LevelFilter::Debug);
    });
}

/// Initialize logger with a fixed maximum level
pub fn init_logger_with_level(level: Level) {
    INIT.call_once(|| {
        FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(false)
            .with_thread_names(true)
            .with_level(true)
            .init();

        bridge_log_records(level_filter(level));
    });
}

/// Initialize logger with environment variable support.
/// Uses RUST_LOG, defaulting to `info`
pub fn init_logger_with_env() {
    INIT.call_once(|| {
        let level = std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string())
            .parse::<LevelFilter>()
            .unwrap_or(LevelFilter::Info);

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_names(true)
            .with_level(true)
            .init();

        bridge_log_records(level);
    });
}

/// Initialize logger from settings: console output filtered by `log_level`,
/// plus a daily rolling file when file logging is enabled
pub fn init_logger_with_config(log_level: &str, logging: &LoggingConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_new(log_level).unwrap_or_else(|e| {
            eprintln!("Warning: invalid log level '{}' ({}), using info", log_level, e);
            EnvFilter::new("info")
        });

        let file_layer = if logging.enable_file_logging {
            let appender = tracing_appender::rolling::daily(&logging.log_dir, "searchbox.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().with_writer(writer).with_ansi(false))
        } else {
            None
        };

        let result = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_thread_names(true))
            .with(file_layer)
            .try_init();

        if let Err(e) = result {
            eprintln!("Warning: Failed to initialize logger: {}", e);
        }

        let level = log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);
        bridge_log_records(level);
    });
}

/// Log an error message
pub fn log_error(message: &str) {
    error!("{}", message);
}

/// Log an info message
pub fn log_info(message: &str) {
    info!("{}", message);
}

/// Log a warning message
pub fn log_warning(message: &str) {
    warn!("{}", message);
}

/// Log a debug message
pub fn log_debug(message: &str) {
    debug!("{}", message);
}

/// Log a trace message
pub fn log_trace(message: &str) {
    trace!("{}", message);
}

/// Convenience macro for logging errors
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logging::log_error(&format!($($arg)*));
    };
}

/// Convenience macro for logging info messages
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logging::log_info(&format!($($arg)*));
    };
}

/// Convenience macro for logging warning messages
#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)*) => {
        $crate::logging::log_warning(&format!($($arg)*));
    };
}

/// Convenience macro for logging debug messages
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logging::log_debug(&format!($($arg)*));
    };
}

/// Convenience macro for logging trace messages
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        $crate::logging::log_trace(&format!($($arg)*));
    };
}
