//! Level specification parser
//!
//! A level specification is a `:`-separated list of segments. Each segment
//! is either a bare level name, which sets the default level, or
//! `module=level`, which sets the level for one module. Several modules can
//! share a segment: `gossip,ledger=debug`.
//!
//! ```
//! use rust_logspec::{LevelSpec, LogLevel};
//!
//! let spec: LevelSpec = "ledger=debug:warn".parse().unwrap();
//! assert_eq!(spec.default_level(), Some(LogLevel::Warn));
//! assert_eq!(spec.rules()[0].module, "ledger");
//! ```

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Separates segments of a specification
pub const SEGMENT_DELIMITER: char = ':';
/// Separates module names from their level inside a segment
pub const LEVEL_DELIMITER: char = '=';
/// Separates module names sharing one level
pub const MODULE_DELIMITER: char = ',';

/// One `module=level` assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRule {
    pub module: String,
    pub level: LogLevel,
}

/// Parsed level specification: ordered module rules plus an optional default
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelSpec {
    default: Option<LogLevel>,
    rules: Vec<LevelRule>,
}

impl LevelSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a specification string.
    ///
    /// The empty string yields an empty spec. Empty segments are skipped.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut parsed = LevelSpec::new();

        for segment in spec.split(SEGMENT_DELIMITER) {
            if segment.is_empty() {
                continue;
            }
            let bad_segment = || LoggerError::invalid_spec(spec, segment);

            let mut parts = segment.split(LEVEL_DELIMITER);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(level), None, _) => {
                    parsed.default = Some(level.parse().map_err(|_| bad_segment())?);
                }
                (Some(modules), Some(level), None) => {
                    let level: LogLevel = level.parse().map_err(|_| bad_segment())?;
                    for module in modules.split(MODULE_DELIMITER) {
                        if module.is_empty() {
                            return Err(bad_segment());
                        }
                        parsed.push_rule(module.to_string(), level);
                    }
                }
                _ => return Err(bad_segment()),
            }
        }

        Ok(parsed)
    }

    /// Set the default level
    #[must_use]
    pub fn with_default(mut self, level: LogLevel) -> Self {
        self.default = Some(level);
        self
    }

    /// Append a module rule.
    ///
    /// Fails for names the parser could not read back: empty names and
    /// names containing `:`, `=` or `,`.
    pub fn with_module(mut self, module: impl Into<String>, level: LogLevel) -> Result<Self> {
        let module = module.into();
        if !is_module_name(&module) {
            let segment = format!("{}{}{}", module, LEVEL_DELIMITER, level.as_lowercase());
            return Err(LoggerError::invalid_spec(segment.clone(), segment));
        }
        self.push_rule(module, level);
        Ok(self)
    }

    /// Append a rule whose module name is already known to be valid
    pub(crate) fn push_rule(&mut self, module: String, level: LogLevel) {
        self.rules.push(LevelRule { module, level });
    }

    /// Default level override, if the spec named one
    pub fn default_level(&self) -> Option<LogLevel> {
        self.default
    }

    /// Module rules in specification order
    pub fn rules(&self) -> &[LevelRule] {
        &self.rules
    }

    /// Effective level this spec assigns to `module`, last rule winning
    pub fn module_level(&self, module: &str) -> Option<LogLevel> {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.module == module)
            .map(|rule| rule.level)
    }

    /// True when the spec changes nothing
    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.rules.is_empty()
    }
}

/// Whether `name` can appear as a module in a specification string
pub fn is_module_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(&[SEGMENT_DELIMITER, LEVEL_DELIMITER, MODULE_DELIMITER][..])
}

impl FromStr for LevelSpec {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        LevelSpec::parse(s)
    }
}

impl fmt::Display for LevelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments: Vec<String> = self
            .rules
            .iter()
            .map(|rule| {
                format!(
                    "{}{}{}",
                    rule.module,
                    LEVEL_DELIMITER,
                    rule.level.as_lowercase()
                )
            })
            .collect();
        if let Some(level) = self.default {
            segments.push(level.as_lowercase().to_string());
        }
        write!(f, "{}", segments.join(&SEGMENT_DELIMITER.to_string()))
    }
}

impl Serialize for LevelSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LevelSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
