//! Logging macros for ergonomic log message formatting.
//!
//! The message is only formatted when the module logger's level lets the
//! record through.
//!
//! # Examples
//!
//! ```
//! use rust_logspec::prelude::*;
//! use rust_logspec::info;
//!
//! let logging = Logging::new(Config::new().with_sink(MemorySink::new())).unwrap();
//! let logger = logging.logger("server");
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_logspec::prelude::*;
/// # let logging = Logging::new(Config::new().with_sink(MemorySink::new())).unwrap();
/// # let logger = logging.logger("doc");
/// use rust_logspec::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled_for(level) {
            logger.log(level, format!($($arg)+));
        }
    }};
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_logspec::prelude::*;
/// # let logging = Logging::new(Config::new().with_sink(MemorySink::new())).unwrap();
/// # let logger = logging.logger("doc");
/// use rust_logspec::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_logspec::prelude::*;
/// # let logging = Logging::new(Config::new().with_sink(MemorySink::new())).unwrap();
/// # let logger = logging.logger("doc");
/// use rust_logspec::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message, flush the sink and exit the process.
///
/// Unlike the other macros this always diverges, even when the level
/// gate rejects the record.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(format!($($arg)+))
    };
}
