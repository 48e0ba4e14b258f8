//! Logger module for squeeze
//!
//! Go-style simple logging: `[LEVEL] message`
//!
//! # Usage
//!
//! ```rust
//! use squeeze::util::logger;
//!
//! logger::init();
//! tracing::info!("Hello, {}", "world");
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl LogLevel {
    /// Level for a `-v` count on the command line
    pub fn from_verbosity(count: u8) -> Self {
        match count {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Initialize logger with default configuration (WARN level)
pub fn init() {
    init_with_level(LogLevel::Warn);
}

/// Initialize logger with custom level (Go style: `[LEVEL] message`)
///
/// Output goes to stderr so that minified code on stdout stays clean.
/// Calling this twice is a no-op.
pub fn init_with_level(level: LogLevel) {
    let filter = tracing_subscriber::filter::LevelFilter::from_level(level.into());

    let layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_level(true)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_filter(filter);

    let _ = Registry::default().with(layer).try_init();
}

/// Initialize logger for debug use (DEBUG level)
pub fn init_debug() {
    init_with_level(LogLevel::Debug);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(LogLevel::from_verbosity(0), LogLevel::Warn);
        assert_eq!(LogLevel::from_verbosity(2), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(9), LogLevel::Trace);
        assert_eq!(tracing::Level::from(LogLevel::Info), tracing::Level::INFO);
    }

    #[test]
    fn test_double_init_is_harmless() {
        init_with_level(LogLevel::Error);
        init_with_level(LogLevel::Error);
    }
}
