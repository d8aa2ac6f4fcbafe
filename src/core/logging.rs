//! The logging core: levels, format and sink behind one lock

use super::{
    config::{Config, LevelMode},
    error::Result,
    format::OutputFormat,
    log_context::LogContext,
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    module_logger::ModuleLogger,
    registry::LevelRegistry,
    sink::{self, SharedSink},
    spec::LevelSpec,
};
use crate::sinks::ConsoleSink;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::collections::HashMap;
use std::io;
use std::panic::Location;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Everything a log call reads. Each field is replaced whole, never
/// mutated in place, so a reader holding a clone sees one consistent
/// configuration.
#[derive(Clone)]
struct State {
    levels: Arc<LevelRegistry>,
    format: Arc<OutputFormat>,
    sink: SharedSink,
}

pub(crate) struct Shared {
    state: RwLock<State>,
    sequence: AtomicU64,
    metrics: LoggerMetrics,
}

impl Shared {
    #[inline]
    pub(crate) fn enabled(&self, module: &str, level: LogLevel) -> bool {
        self.state.read().levels.enabled(module, level)
    }

    /// Gate, render and write one record. Returns whether it was emitted.
    pub(crate) fn emit(
        &self,
        level: LogLevel,
        module: &str,
        message: &str,
        context: LogContext,
        location: &Location<'_>,
    ) -> bool {
        let (format, sink) = {
            let state = self.state.read();
            if !state.levels.enabled(module, level) {
                drop(state);
                self.metrics.record_filtered();
                return false;
            }
            (Arc::clone(&state.format), Arc::clone(&state.sink))
        };

        let entry = LogEntry::new(level, module, message)
            .with_location(location)
            .with_sequence(self.sequence.fetch_add(1, Ordering::Relaxed) + 1)
            .with_context(context);
        let line = format.format(&entry);

        match sink.lock().write_all(line.as_bytes()) {
            Ok(()) => {
                self.metrics.record_written();
            }
            Err(_) => {
                self.metrics.record_write_failure();
            }
        }
        true
    }

    pub(crate) fn sync(&self) -> io::Result<()> {
        let sink = Arc::clone(&self.state.read().sink);
        let mut sink = sink.lock();
        sink.sync()
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        // Best effort; nobody is left to report to
        let _ = self.state.get_mut().sink.lock().sync();
    }
}

/// Logging core.
///
/// Holds the level registry, the active output format and the sink.
/// Module loggers minted by [`Logging::logger`] read this state on every
/// call, so reconfiguration is visible to loggers created earlier.
///
/// Cloning a `Logging` yields another handle to the same core.
///
/// # Example
///
/// ```
/// use rust_logspec::{Config, Logging, MemorySink};
///
/// let sink = MemorySink::new();
/// let logging = Logging::new(
///     Config::new()
///         .with_spec("noisy=error:debug")
///         .with_format("%{module}: %{message}")
///         .with_sink(sink.clone()),
/// )
/// .unwrap();
///
/// logging.logger("noisy").warn("hidden");
/// logging.logger("app").debug("shown");
/// assert_eq!(sink.contents_string(), "app: shown\n");
/// ```
#[derive(Clone)]
pub struct Logging {
    shared: Arc<Shared>,
}

impl Logging {
    /// Build a core with default level `Info`, no module levels, the
    /// default format and a stderr sink, then apply `config`.
    ///
    /// Fails without producing a core if `config` does not validate.
    pub fn new(config: Config) -> Result<Self> {
        let logging = Self {
            shared: Arc::new(Shared {
                state: RwLock::new(State {
                    levels: Arc::new(LevelRegistry::new()),
                    format: Arc::new(OutputFormat::default()),
                    sink: sink::shared(ConsoleSink::stderr()),
                }),
                sequence: AtomicU64::new(0),
                metrics: LoggerMetrics::new(),
            }),
        };

        logging.apply(config)?;
        Ok(logging)
    }

    /// Validate and install a configuration.
    ///
    /// The level spec and the format are both validated before anything
    /// changes; on error the previous configuration stays in effect.
    pub fn apply(&self, config: Config) -> Result<()> {
        let validated = LevelSpec::parse(&config.log_spec).and_then(|spec| {
            let format = match config.format.as_str() {
                "" => None,
                descriptor => Some(Arc::new(OutputFormat::parse(descriptor)?)),
            };
            Ok((spec, format))
        });
        let (spec, format) = match validated {
            Ok(parts) => parts,
            Err(e) => {
                self.shared.metrics.record_rejected_apply();
                return Err(e);
            }
        };

        let state = self.shared.state.upgradable_read();
        let levels = Self::next_levels(&state.levels, &spec, config.level_mode);
        let mut state = RwLockUpgradableReadGuard::upgrade(state);
        if let Some(levels) = levels {
            state.levels = levels;
        }
        if let Some(format) = format {
            state.format = format;
        }
        if let Some(writer) = config.writer {
            state.sink = writer;
        }
        drop(state);

        self.shared.metrics.record_apply();
        Ok(())
    }

    /// Registry that results from applying `spec`, or `None` when unchanged
    fn next_levels(
        current: &LevelRegistry,
        spec: &LevelSpec,
        mode: LevelMode,
    ) -> Option<Arc<LevelRegistry>> {
        if spec.is_empty() {
            return None;
        }
        let mut levels = match mode {
            LevelMode::Merge => current.clone(),
            LevelMode::Replace => {
                let mut fresh = LevelRegistry::new();
                fresh.set_default(current.default_level());
                fresh
            }
        };
        levels.merge_spec(spec);
        Some(Arc::new(levels))
    }

    /// Install only the levels of `spec`, replacing all module levels.
    ///
    /// An empty `spec` changes nothing; use [`reset_levels`](Self::reset_levels)
    /// to clear the module levels.
    pub fn activate_spec(&self, spec: &str) -> Result<()> {
        self.apply(
            Config::new()
                .with_spec(spec)
                .with_level_mode(LevelMode::Replace),
        )
    }

    /// Drop every per-module level. The default level is kept.
    pub fn reset_levels(&self) {
        let mut state = self.shared.state.write();
        let mut fresh = LevelRegistry::new();
        fresh.set_default(state.levels.default_level());
        state.levels = Arc::new(fresh);
    }

    pub fn default_level(&self) -> LogLevel {
        self.shared.state.read().levels.default_level()
    }

    /// Snapshot of the per-module levels
    pub fn levels(&self) -> HashMap<String, LogLevel> {
        self.registry().levels()
    }

    /// Level in effect for `module`
    pub fn level_for(&self, module: &str) -> LogLevel {
        self.shared.state.read().levels.level_for(module)
    }

    pub fn is_enabled(&self, module: &str, level: LogLevel) -> bool {
        self.shared.enabled(module, level)
    }

    /// Active levels as a specification string, e.g. `gossip=debug:warn`
    pub fn spec(&self) -> String {
        self.registry().to_spec().to_string()
    }

    fn registry(&self) -> Arc<LevelRegistry> {
        Arc::clone(&self.shared.state.read().levels)
    }

    /// Logger bound to `name`. Nothing is registered.
    pub fn logger(&self, name: impl Into<String>) -> ModuleLogger {
        ModuleLogger::new(name, Arc::downgrade(&self.shared))
    }

    /// Replace the sink for all later writes
    pub fn set_writer(&self, writer: SharedSink) {
        self.shared.state.write().sink = writer;
    }

    /// Pass bytes straight to the sink, bypassing formatting
    pub fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let sink = Arc::clone(&self.shared.state.read().sink);
        let mut sink = sink.lock();
        sink.write(buf)
    }

    /// Flush the sink. Its error is returned as is.
    pub fn sync(&self) -> io::Result<()> {
        self.shared.sync()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }
}

impl std::fmt::Debug for Logging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sink = Arc::clone(&self.shared.state.read().sink);
        let sink = sink.lock();
        f.debug_struct("Logging")
            .field("spec", &self.spec())
            .field("sink", &sink.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;

    fn capture(logging: &Logging) -> MemorySink {
        let sink = MemorySink::new();
        logging.set_writer(sink::shared(sink.clone()));
        sink
    }

    #[test]
    fn test_new_defaults() {
        let logging = Logging::new(Config::default()).unwrap();
        assert_eq!(logging.default_level(), LogLevel::Info);
        assert!(logging.levels().is_empty());
        assert_eq!(logging.spec(), "info");
    }

    #[test]
    fn test_new_rejects_bad_spec() {
        let err = Logging::new(Config::new().with_spec("::=borken=::"))
            .err()
            .expect("construction fails");
        assert_eq!(
            err.to_string(),
            "invalid logging specification '::=borken=::': bad segment '=borken='"
        );
    }

    #[test]
    fn test_apply_merges_by_default() {
        let logging = Logging::new(Config::new().with_spec("a=debug")).unwrap();
        logging.apply(Config::new().with_spec("b=error")).unwrap();

        assert_eq!(logging.level_for("a"), LogLevel::Debug);
        assert_eq!(logging.level_for("b"), LogLevel::Error);
    }

    #[test]
    fn test_apply_replace_mode() {
        let logging = Logging::new(Config::new().with_spec("a=debug:warn")).unwrap();
        logging
            .apply(
                Config::new()
                    .with_spec("b=error")
                    .with_level_mode(LevelMode::Replace),
            )
            .unwrap();

        assert_eq!(logging.levels().len(), 1);
        assert_eq!(logging.level_for("a"), LogLevel::Warn);
        assert_eq!(logging.default_level(), LogLevel::Warn);
    }

    #[test]
    fn test_failed_apply_changes_nothing() {
        let logging = Logging::new(
            Config::new()
                .with_spec("a=debug:error")
                .with_format("%{message}"),
        )
        .unwrap();
        let sink = capture(&logging);

        let other = MemorySink::new();
        let err = logging
            .apply(
                Config::new()
                    .with_spec("b=warn:debug")
                    .with_format("%{color:bad}")
                    .with_sink(other.clone()),
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid color option: bad");

        assert_eq!(logging.default_level(), LogLevel::Error);
        assert_eq!(logging.levels().len(), 1);
        assert_eq!(logging.metrics().rejected_applies(), 1);

        logging.logger("a").debug("still here");
        assert_eq!(sink.contents_string(), "still here\n");
        assert!(other.contents().is_empty());
    }

    #[test]
    fn test_replace_with_empty_spec_keeps_levels() {
        let logging = Logging::new(Config::new().with_spec("a=debug:warn")).unwrap();
        logging
            .apply(
                Config::new()
                    .with_format("json")
                    .with_level_mode(LevelMode::Replace),
            )
            .unwrap();
        assert_eq!(logging.levels().len(), 1);
        assert_eq!(logging.level_for("a"), LogLevel::Debug);

        let _sink = capture(&logging);
        logging
            .apply(Config::new().with_level_mode(LevelMode::Replace))
            .unwrap();
        logging.activate_spec("").unwrap();
        assert_eq!(logging.spec(), "a=debug:warn");
    }

    #[test]
    fn test_debug_does_not_hold_core_lock_on_sink() {
        let logging = Logging::new(Config::new().with_spec("a=debug")).unwrap();
        let _sink = capture(&logging);

        // The sink's mutex is held while the core is formatted
        let sink = Arc::clone(&logging.shared.state.read().sink);
        let guard = sink.lock();
        let reader = {
            let logging = logging.clone();
            std::thread::spawn(move || format!("{:?}", logging))
        };
        std::thread::sleep(std::time::Duration::from_millis(50));
        // A writer can still take the core lock while Debug waits on the sink
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        let mut applied = false;
        while std::time::Instant::now() < deadline {
            if let Some(mut state) = logging
                .shared
                .state
                .try_write_for(std::time::Duration::from_millis(10))
            {
                state.format = Arc::new(OutputFormat::Logfmt);
                applied = true;
                break;
            }
        }
        drop(guard);
        assert!(applied);
        assert!(reader.join().unwrap().contains("memory"));
    }

    #[test]
    fn test_activate_spec() {
        let logging = Logging::new(Config::new().with_spec("a=debug")).unwrap();
        logging.activate_spec("b=warn:error").unwrap();

        assert_eq!(logging.spec(), "b=warn:error");
        assert!(logging.activate_spec("b==warn").is_err());
        assert_eq!(logging.spec(), "b=warn:error");
    }

    #[test]
    fn test_reset_levels() {
        let logging = Logging::new(Config::new().with_spec("a=debug:b=warn:error")).unwrap();
        logging.reset_levels();
        assert!(logging.levels().is_empty());
        assert_eq!(logging.default_level(), LogLevel::Error);
    }

    #[test]
    fn test_sequence_ids() {
        let logging = Logging::new(Config::new().with_format("%{id}")).unwrap();
        let sink = capture(&logging);
        let logger = logging.logger("seq");
        logger.info("1");
        logger.debug("filtered");
        logger.info("2");
        assert_eq!(sink.contents_string(), "1\n2\n");
    }

    #[test]
    fn test_write_bypasses_format() {
        let logging = Logging::new(Config::new().with_format("json")).unwrap();
        let sink = capture(&logging);
        assert_eq!(logging.write(b"raw").unwrap(), 3);
        assert_eq!(sink.contents(), b"raw");
    }

    #[test]
    fn test_clone_shares_core() {
        let logging = Logging::new(Config::default()).unwrap();
        let other = logging.clone();
        other.activate_spec("debug").unwrap();
        assert_eq!(logging.default_level(), LogLevel::Debug);
    }

    #[test]
    fn test_metrics_count_gate() {
        let logging = Logging::new(Config::new().with_format("%{message}")).unwrap();
        let _sink = capture(&logging);
        let logger = logging.logger("m");
        logger.debug("no");
        logger.info("yes");

        assert_eq!(logging.metrics().records_filtered(), 1);
        assert_eq!(logging.metrics().records_written(), 1);
        assert_eq!(logging.metrics().applies(), 1);
    }
}
