//! Core types: levels, spec parser, registry and the logging core

pub mod config;
pub mod error;
pub mod format;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logging;
pub mod metrics;
pub mod module_logger;
pub mod registry;
pub mod sink;
pub mod spec;
pub mod timestamp;

pub use config::{Config, LevelMode};
pub use error::{LoggerError, Result};
pub use format::{OutputFormat, Template, DEFAULT_FORMAT};
pub use log_context::{FieldValue, LogContext};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logging::Logging;
pub use metrics::LoggerMetrics;
pub use module_logger::ModuleLogger;
pub use registry::LevelRegistry;
pub use sink::{shared, SharedSink, Sink};
pub use spec::{LevelRule, LevelSpec};
pub use timestamp::TimestampFormat;
