//! Module name to level mapping

use super::log_level::LogLevel;
use super::spec::LevelSpec;
use std::collections::HashMap;

/// Resolved levels for named modules plus a default.
///
/// Module names are compared for exact equality. A module with no entry
/// resolves to the default level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelRegistry {
    default: LogLevel,
    modules: HashMap<String, LogLevel>,
}

impl LevelRegistry {
    /// Create an empty registry with the default level `Info`
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all per-module entries. The default level is kept.
    pub fn reset(&mut self) {
        self.modules.clear();
    }

    pub fn set_default(&mut self, level: LogLevel) {
        self.default = level;
    }

    pub fn set_module(&mut self, name: impl Into<String>, level: LogLevel) {
        self.modules.insert(name.into(), level);
    }

    pub fn default_level(&self) -> LogLevel {
        self.default
    }

    /// Level in effect for `name`
    #[inline]
    pub fn level_for(&self, name: &str) -> LogLevel {
        self.modules.get(name).copied().unwrap_or(self.default)
    }

    /// Whether a record at `level` from module `name` passes the gate
    #[inline]
    pub fn enabled(&self, name: &str, level: LogLevel) -> bool {
        level >= self.level_for(name)
    }

    /// Apply a parsed spec on top of the current contents.
    ///
    /// Rules overwrite entries module by module; modules the spec does not
    /// mention keep their current level.
    pub fn merge_spec(&mut self, spec: &LevelSpec) {
        if let Some(level) = spec.default_level() {
            self.default = level;
        }
        for rule in spec.rules() {
            self.modules.insert(rule.module.clone(), rule.level);
        }
    }

    /// Copy of the per-module entries
    pub fn levels(&self) -> HashMap<String, LogLevel> {
        self.modules.clone()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Render the registry as a specification string, modules sorted by name.
    ///
    /// Names given to [`set_module`](Self::set_module) are rendered as is;
    /// only names accepted by [`is_module_name`](super::spec::is_module_name)
    /// parse back.
    pub fn to_spec(&self) -> LevelSpec {
        let mut names: Vec<&String> = self.modules.keys().collect();
        names.sort();
        let mut spec = LevelSpec::new().with_default(self.default);
        for name in names {
            spec.push_rule(name.clone(), self.modules[name]);
        }
        spec
    }
}
