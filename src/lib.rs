//! # Rust Logspec
//!
//! Per-module log levels driven by a compact specification string, applied
//! atomically to a shared logging core.
//!
//! ## Features
//!
//! - **Level specs**: `gossip,ledger=debug:warn` sets two modules to
//!   `debug` and everything else to `warn`
//! - **Live reconfiguration**: module loggers look their level up on every
//!   call, so `apply` takes effect for loggers created earlier
//! - **All-or-nothing apply**: a bad spec or format changes nothing
//! - **Sink control**: swap the writer, write raw bytes, sync
//!
//! ```
//! use rust_logspec::prelude::*;
//!
//! let sink = MemorySink::new();
//! let logging = Logging::new(
//!     Config::new().with_format("%{message}").with_sink(sink.clone()),
//! )
//! .unwrap();
//!
//! let logger = logging.logger("ledger");
//! logger.debug("hidden at the default level");
//! logging.activate_spec("ledger=debug").unwrap();
//! logger.debug("visible now");
//!
//! assert_eq!(sink.contents_string(), "visible now\n");
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        shared, Config, FieldValue, LevelMode, LevelSpec, LogContext, LogLevel, LoggerError,
        Logging, ModuleLogger, OutputFormat, Result, SharedSink, Sink,
    };
    pub use crate::sinks::{ConsoleSink, FileSink, MemorySink, WriterSink};
}

pub use crate::core::{
    shared, Config, FieldValue, LevelMode, LevelRegistry, LevelRule, LevelSpec, LogContext,
    LogEntry, LogLevel, LoggerError, LoggerMetrics, Logging, ModuleLogger, OutputFormat, Result,
    SharedSink, Sink, Template, TimestampFormat, DEFAULT_FORMAT,
};
pub use sinks::{ConsoleSink, ConsoleTarget, FileSink, MemorySink, WriterSink};
