//! Loggers bound to a module name

use super::{
    log_context::{FieldValue, LogContext},
    log_level::LogLevel,
    logging::Shared,
};
use std::panic::Location;
use std::sync::{Arc, Weak};

/// Handle that logs on behalf of one module.
///
/// A module logger holds its name and a weak reference to the core. The
/// module's level is looked up on every call, so a logger created before
/// `Logging::apply` follows the new levels afterwards. Once the core is
/// dropped, logging through the handle does nothing.
#[derive(Debug, Clone)]
pub struct ModuleLogger {
    name: Arc<str>,
    core: Weak<Shared>,
    fields: LogContext,
}

impl ModuleLogger {
    pub(crate) fn new(name: impl Into<String>, core: Weak<Shared>) -> Self {
        Self {
            name: Arc::from(name.into()),
            core,
            fields: LogContext::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a record at `level` would currently be emitted
    pub fn is_enabled_for(&self, level: LogLevel) -> bool {
        self.core
            .upgrade()
            .is_some_and(|core| core.enabled(&self.name, level))
    }

    /// Child logger that adds `key=value` to every record
    #[must_use]
    pub fn with_field<K, V>(&self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut child = self.clone();
        child.fields.add_field(key, value);
        child
    }

    /// Child logger that adds every field of `context` to every record
    #[must_use]
    pub fn with_context(&self, context: &LogContext) -> Self {
        let mut child = self.clone();
        for (key, value) in context.fields() {
            child.fields.add_field(key, value.clone());
        }
        child
    }

    /// Fields this logger adds to every record
    pub fn fields(&self) -> &LogContext {
        &self.fields
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        self.emit(level, message.as_ref(), LogContext::new(), Location::caller());
    }

    /// Log with per-record fields. Record fields override logger fields.
    #[track_caller]
    pub fn log_with_context(&self, level: LogLevel, message: impl AsRef<str>, context: LogContext) {
        self.emit(level, message.as_ref(), context, Location::caller());
    }

    fn emit(
        &self,
        level: LogLevel,
        message: &str,
        mut context: LogContext,
        location: &Location<'_>,
    ) -> bool {
        let Some(core) = self.core.upgrade() else {
            return false;
        };
        context.inherit(&self.fields);
        core.emit(level, &self.name, message, context, location)
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    #[track_caller]
    pub fn debug_with_context(&self, message: impl AsRef<str>, context: LogContext) {
        self.log_with_context(LogLevel::Debug, message, context);
    }

    #[track_caller]
    pub fn info_with_context(&self, message: impl AsRef<str>, context: LogContext) {
        self.log_with_context(LogLevel::Info, message, context);
    }

    #[track_caller]
    pub fn warn_with_context(&self, message: impl AsRef<str>, context: LogContext) {
        self.log_with_context(LogLevel::Warn, message, context);
    }

    #[track_caller]
    pub fn error_with_context(&self, message: impl AsRef<str>, context: LogContext) {
        self.log_with_context(LogLevel::Error, message, context);
    }

    /// Log at `DPanic`, then panic if this is a debug build
    #[track_caller]
    pub fn dpanic(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        self.emit(LogLevel::DPanic, message, LogContext::new(), Location::caller());
        if cfg!(debug_assertions) {
            panic!("{}", message);
        }
    }

    /// Log at `Panic`, then panic
    #[track_caller]
    pub fn panic(&self, message: impl AsRef<str>) -> ! {
        let message = message.as_ref();
        self.emit(LogLevel::Panic, message, LogContext::new(), Location::caller());
        panic!("{}", message);
    }

    /// Log at `Fatal`, flush the sink and exit the process with status 1
    #[track_caller]
    pub fn fatal(&self, message: impl AsRef<str>) -> ! {
        self.emit(LogLevel::Fatal, message.as_ref(), LogContext::new(), Location::caller());
        if let Some(core) = self.core.upgrade() {
            let _ = core.sync();
        }
        std::process::exit(1);
    }
}
