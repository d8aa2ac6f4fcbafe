//! Log entry structure

use super::log_context::LogContext;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::panic::Location;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub module: String,
    pub timestamp: DateTime<Utc>,
    /// Per-core sequence number, rendered by `%{id}`
    pub sequence: u64,
    pub file: Option<String>,
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "LogContext::is_empty", default)]
    pub context: LogContext,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, module: impl Into<String>, message: &str) -> Self {
        Self {
            level,
            message: Self::sanitize_message(message),
            module: module.into(),
            timestamp: Utc::now(),
            sequence: 0,
            file: None,
            line: None,
            context: LogContext::new(),
        }
    }

    pub fn with_location(mut self, location: &Location<'_>) -> Self {
        self.file = Some(location.file().to_string());
        self.line = Some(location.line());
        self
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = context;
        self
    }

    /// `file:line` of the call site, if known
    pub fn caller(&self) -> Option<String> {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("{}:{}", file, line)),
            _ => None,
        }
    }
}
