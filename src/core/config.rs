//! Configuration consumed by `Logging::new` and `Logging::apply`

use super::sink::{self, SharedSink, Sink};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

/// How a new level spec combines with per-module levels already installed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelMode {
    /// Modules the new spec does not mention keep their current level
    #[default]
    Merge,
    /// The new spec is the only source of per-module levels
    Replace,
}

/// A configuration for the logging core.
///
/// Empty `log_spec` leaves levels alone, empty `format` keeps the active
/// format and `writer: None` keeps the active sink.
///
/// # Example
///
/// ```
/// use rust_logspec::{Config, LevelMode, MemorySink};
///
/// let config = Config::new()
///     .with_spec("ledger=debug:warn")
///     .with_format("%{level} %{message}")
///     .with_sink(MemorySink::new())
///     .with_level_mode(LevelMode::Replace);
/// assert_eq!(config.log_spec, "ledger=debug:warn");
/// ```
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_spec: String,
    pub format: String,
    #[serde(skip)]
    pub writer: Option<SharedSink>,
    pub level_mode: LevelMode,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `<PREFIX>_LOGGING_SPEC` and `<PREFIX>_LOGGING_FORMAT`.
    ///
    /// Missing variables leave the corresponding field empty.
    pub fn from_env(prefix: &str) -> Self {
        let read = |suffix: &str| env::var(format!("{}_{}", prefix, suffix)).unwrap_or_default();
        Self {
            log_spec: read("LOGGING_SPEC"),
            format: read("LOGGING_FORMAT"),
            ..Self::default()
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_spec(mut self, spec: impl Into<String>) -> Self {
        self.log_spec = spec.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Use an already shared sink
    #[must_use = "builder methods return a new value"]
    pub fn with_writer(mut self, writer: SharedSink) -> Self {
        self.writer = Some(writer);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_sink<S: Sink + 'static>(self, sink: S) -> Self {
        self.with_writer(sink::shared(sink))
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_level_mode(mut self, mode: LevelMode) -> Self {
        self.level_mode = mode;
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("log_spec", &self.log_spec)
            .field("format", &self.format)
            .field("writer", &self.writer.as_ref().map(|w| w.lock().name().to_string()))
            .field("level_mode", &self.level_mode)
            .finish()
    }
}
