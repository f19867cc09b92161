//! Root initialization: the one piece of real policy in this crate.
//!
//! `create_root` configures the process-wide registry exactly once. A second
//! call is a warned no-op unless `overwrite_root` asks for a teardown, and a
//! forced reinitialization always appends to the log file so history written
//! earlier in the same run is not lost.

use crate::config::{self, LogConfig, DEFAULT_CONFIG_PATH};
use crate::diag;
use crate::error::{LogrootError, LogrootResult};
use crate::registry::{self, RegistryHandle, Sink, SinkMode};
use crate::resolve::resolve;
use crate::severity::Severity;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Options accepted by [`create_root`].
#[derive(Debug, Clone, Default)]
pub struct RootOptions {
    /// Configuration file to read. Defaults to [`DEFAULT_CONFIG_PATH`].
    pub config_file_path: Option<PathBuf>,

    /// When set, anchor the configured output directory at the config
    /// file's parent joined with this relative path, instead of at the
    /// process working directory.
    pub relative_to_config: Option<PathBuf>,

    /// Tear down existing sinks and rebuild them. Without this, a second
    /// call is an idempotent no-op.
    pub overwrite_root: bool,
}

// Serializes whole create_root calls so two threads cannot both observe an
// uninitialized registry and install duplicate sinks.
static INIT_GUARD: Mutex<()> = Mutex::new(());

/// Configure the root registry from the INI configuration and return a
/// handle to it.
///
/// When the effective config path is exactly [`DEFAULT_CONFIG_PATH`] and no
/// file exists there, the documented default file is created and loaded; a
/// custom path that cannot be loaded is terminal and leaves the registry
/// unconfigured. No failure here panics: every outcome is a typed `Err`.
pub fn create_root(options: RootOptions) -> LogrootResult<RegistryHandle> {
    let _guard = INIT_GUARD.lock().unwrap_or_else(PoisonError::into_inner);
    let root = registry::root_registry();

    let mut removed_handlers = false;
    let handler_count = root.handler_count();
    if handler_count > 0 {
        if options.overwrite_root {
            diag::emit(
                Severity::Warning,
                format!(
                    "create_root(overwrite_root = true) was called with {handler_count} handlers already installed."
                ),
            );
            diag::emit(
                Severity::Warning,
                "This is the last message before removing handlers. Messages may be lost until new sinks are installed.",
            );
            root.clear_sinks();
            removed_handlers = true;
        } else {
            diag::emit(
                Severity::Warning,
                format!(
                    "{handler_count} handlers already exist on the root registry, ignoring this create_root() call. Pass overwrite_root = true to re-define them."
                ),
            );
            return Ok(root);
        }
    }

    let effective_path = options
        .config_file_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = load_config(&effective_path)?;

    let resolved = resolve(
        &config,
        &effective_path,
        options.relative_to_config.as_deref(),
        Local::now(),
    );
    config::ensure_directory(&resolved.directory);

    // A forced reinit within the same run always appends, regardless of the
    // Overwrite setting, so earlier records from this execution survive.
    let mode = if config.overwrite_existing && !removed_handlers {
        SinkMode::Truncate
    } else {
        SinkMode::Append
    };
    let file_sink = Sink::file(resolved.full_path(), mode).map_err(|err| {
        diag::emit(
            Severity::Error,
            format!("failed to set up the log file sink: {err}"),
        );
        err
    })?;

    let mut sinks = vec![file_sink];
    if config.console_output {
        sinks.push(Sink::console());
    }
    root.install(sinks, config.minimum_severity);
    registry::install_facade(&root);

    diag::emit(
        Severity::Debug,
        "logger successfully created and writing records",
    );
    Ok(root)
}

/// Load the config, auto-creating the default file when the default path is
/// the one that missed. The writer's own failure is diagnosed and swallowed;
/// the retry load decides the outcome.
fn load_config(effective_path: &Path) -> LogrootResult<LogConfig> {
    match LogConfig::load(effective_path) {
        Ok(config) => Ok(config),
        Err(LogrootError::ConfigNotFound { .. })
            if effective_path == Path::new(DEFAULT_CONFIG_PATH) =>
        {
            diag::emit(
                Severity::Info,
                "default logger config was not found, attempting to create it",
            );
            if let Err(err) = LogConfig::write_default(effective_path) {
                diag::emit(
                    Severity::Error,
                    format!("failed to create the default logger config: {err}"),
                );
            }
            LogConfig::load(effective_path).map_err(|err| {
                diag::emit(
                    Severity::Error,
                    "logger config is still unavailable after creating the default; leaving logging unconfigured",
                );
                err
            })
        }
        Err(err) => {
            diag::emit(
                Severity::Error,
                format!("failed to load logger config: {err}"),
            );
            Err(err)
        }
    }
}

/// Deprecated alias kept for callers of the original entry point name.
#[deprecated(since = "0.1.0", note = "use create_root() for clarity")]
pub fn create_logger(options: RootOptions) -> LogrootResult<RegistryHandle> {
    diag::emit(
        Severity::Warning,
        "create_logger() is deprecated, use create_root() for clarity",
    );
    create_root(options)
}
