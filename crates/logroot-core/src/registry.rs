//! The process-wide registry of log sinks.
//!
//! The registry is the single shared mutable resource in this crate. It is
//! only reachable as a cloned [`RegistryHandle`] and carries its own lock,
//! so concurrent writers and reinitializers serialize on the handle rather
//! than on ambient global state.

use crate::error::{LogrootError, LogrootResult};
use crate::severity::Severity;
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Shared, cloneable handle to a registry.
pub type RegistryHandle = Arc<Registry>;

/// How a file sink opens its target on installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkMode {
    Append,
    Truncate,
}

/// A destination for formatted records.
#[derive(Debug)]
pub(crate) enum Sink {
    File {
        path: PathBuf,
        mode: SinkMode,
        file: File,
    },
    Console,
}

/// Observable description of an installed sink, without the file handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkInfo {
    File { path: PathBuf, mode: SinkMode },
    Console,
}

impl Sink {
    /// Open a file sink at `path`. The file is created if missing and
    /// truncated only in [`SinkMode::Truncate`].
    pub(crate) fn file(path: PathBuf, mode: SinkMode) -> LogrootResult<Sink> {
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            SinkMode::Append => options.append(true),
            SinkMode::Truncate => options.write(true).truncate(true),
        };
        let file = options.open(&path).map_err(|err| LogrootError::FileOpen {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        Ok(Sink::File { path, mode, file })
    }

    pub(crate) fn console() -> Sink {
        Sink::Console
    }

    fn info(&self) -> SinkInfo {
        match self {
            Sink::File { path, mode, .. } => SinkInfo::File {
                path: path.clone(),
                mode: *mode,
            },
            Sink::Console => SinkInfo::Console,
        }
    }

    fn write_line(&mut self, line: &str) {
        match self {
            Sink::File { path, file, .. } => {
                if let Err(err) = writeln!(file, "{line}") {
                    // Cannot route through the registry from inside a sink.
                    eprintln!(
                        "[ERROR] [{}]: failed to write record to {}: {err}",
                        crate::diag::MODULE_NAME,
                        path.display()
                    );
                }
            }
            Sink::Console => {
                let _ = writeln!(std::io::stderr(), "{line}");
            }
        }
    }

    fn flush(&mut self) {
        if let Sink::File { file, .. } = self {
            let _ = file.flush();
        }
    }
}

#[derive(Debug)]
struct RegistryState {
    sinks: Vec<Sink>,
    minimum_severity: Severity,
}

/// Holds the active sink set and the minimum severity filter.
#[derive(Debug)]
pub struct Registry {
    state: Mutex<RegistryState>,
}

impl Registry {
    pub(crate) fn new() -> Registry {
        Registry {
            state: Mutex::new(RegistryState {
                sinks: Vec::new(),
                minimum_severity: Severity::Debug,
            }),
        }
    }

    /// A poisoned lock only means another writer panicked mid-record; the
    /// sink set itself is still coherent, so keep logging.
    fn lock_state(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of installed sinks. Zero means uninitialized.
    pub fn handler_count(&self) -> usize {
        self.lock_state().sinks.len()
    }

    /// Snapshot of the installed sinks, in dispatch order.
    pub fn sinks(&self) -> Vec<SinkInfo> {
        self.lock_state().sinks.iter().map(Sink::info).collect()
    }

    /// The lowest severity that reaches the sinks.
    pub fn minimum_severity(&self) -> Severity {
        self.lock_state().minimum_severity
    }

    /// Replace the sink set and threshold in one step.
    pub(crate) fn install(&self, sinks: Vec<Sink>, minimum_severity: Severity) {
        let mut state = self.lock_state();
        state.sinks = sinks;
        state.minimum_severity = minimum_severity;
    }

    /// Remove every sink, returning how many were removed. File handles are
    /// closed as they drop.
    pub(crate) fn clear_sinks(&self) -> usize {
        let mut state = self.lock_state();
        let removed = state.sinks.len();
        state.sinks.clear();
        removed
    }

    /// Obtain a named child logger backed by this registry.
    pub fn logger(self: &Arc<Self>, name: impl Into<String>) -> ChildLogger {
        ChildLogger {
            name: name.into(),
            registry: self.clone(),
        }
    }

    /// Format and write one record to every sink, honoring the threshold.
    pub(crate) fn dispatch(&self, name: &str, severity: Severity, message: &str) {
        let mut state = self.lock_state();
        if severity < state.minimum_severity {
            return;
        }
        let line = format_record(Local::now(), severity, name, message);
        for sink in state.sinks.iter_mut() {
            sink.write_line(&line);
        }
    }

    pub(crate) fn flush(&self) {
        let mut state = self.lock_state();
        for sink in state.sinks.iter_mut() {
            sink.flush();
        }
    }
}

/// A named logger bound to one registry. Cheap to clone and to hand out per
/// subsystem.
#[derive(Clone)]
pub struct ChildLogger {
    name: String,
    registry: RegistryHandle,
}

impl ChildLogger {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn log(&self, severity: Severity, message: &str) {
        self.registry.dispatch(&self.name, severity, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(Severity::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(Severity::Info, message);
    }

    pub fn warning(&self, message: &str) {
        self.log(Severity::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Severity::Error, message);
    }

    pub fn critical(&self, message: &str) {
        self.log(Severity::Critical, message);
    }
}

/// Fixed record format: `MM/DD/YYYY hh:mm:ss AM/PM [LEVEL] [name]: message`.
pub(crate) fn format_record(
    timestamp: DateTime<Local>,
    severity: Severity,
    name: &str,
    message: &str,
) -> String {
    format!(
        "{} [{severity}] [{name}]: {message}",
        timestamp.format("%m/%d/%Y %I:%M:%S %p")
    )
}

static ROOT: OnceLock<RegistryHandle> = OnceLock::new();

/// The process-wide root registry. Starts with zero sinks; configured by
/// [`crate::init::create_root`].
pub fn root_registry() -> RegistryHandle {
    ROOT.get_or_init(|| Arc::new(Registry::new())).clone()
}

/// Bridges the `log` facade into a registry, so `log::info!` and friends
/// land in the same sinks as child loggers. The record target becomes the
/// logger name.
struct FacadeBridge {
    registry: RegistryHandle,
}

impl log::Log for FacadeBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        Severity::from(metadata.level()) >= self.registry.minimum_severity()
    }

    fn log(&self, record: &log::Record<'_>) {
        self.registry.dispatch(
            record.target(),
            Severity::from(record.level()),
            &record.args().to_string(),
        );
    }

    fn flush(&self) {
        self.registry.flush();
    }
}

static FACADE: OnceLock<()> = OnceLock::new();

/// Claim the global `log` facade for `registry` (first call only; the
/// bridge reads through the shared handle, so a forced reinitialization
/// does not need to re-claim it) and advertise the configured threshold.
pub(crate) fn install_facade(registry: &RegistryHandle) {
    let handle = registry.clone();
    FACADE.get_or_init(move || {
        if let Err(err) = log::set_boxed_logger(Box::new(FacadeBridge { registry: handle })) {
            crate::diag::emit(
                Severity::Warning,
                format!("global log facade already claimed elsewhere: {err}"),
            );
        }
    });
    log::set_max_level(registry.minimum_severity().to_level_filter());
}
