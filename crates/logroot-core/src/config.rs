//! Logger configuration: the INI-backed store and the default-file writer.
//!
//! INI syntax itself is delegated to the `configparser` crate; this module
//! owns the typed view of the `[Logger Settings]` section and the documented
//! default file that gets materialized when none exists.

use crate::diag;
use crate::error::{LogrootError, LogrootResult};
use crate::severity::Severity;
use configparser::ini::Ini;
use std::fs;
use std::path::{Path, PathBuf};

/// Where `create_root` looks when no config path is supplied, and the only
/// path it will ever auto-create.
pub const DEFAULT_CONFIG_PATH: &str = "./Configs/Logger.ini";

pub(crate) const SETTINGS_SECTION: &str = "Logger Settings";

/// Contents written by [`LogConfig::write_default`]. The comment lines are
/// ignored on read but document every option for hand editing.
const DEFAULT_CONFIG_CONTENTS: &str = "\
[Logger Settings]
# Save path for the log file, the log file name, and the log file extension
FilePath = ./Logs/
FileName = Log File
Extension = .log
# Whether or not to include a timestamp in the log file name. Value of TRUE includes, FALSE excludes.
IncludeTimestamp = FALSE
# If not using timestamps, log files will go to a single file. This option controls if want the file to be overwritten each run. Appends data if not.
Overwrite = TRUE
# Sets whether logfile should be sent to console as well as log file
ConsoleOutput = TRUE
# Log level defines behavior of logging file and which messages are included.
# DEBUG - Detailed information, typically of interest only when diagnosing problems.
# INFO - Confirmation that things are working as expected.
# WARNING - An indication that something unexpected happened, or indicative of some problem in the near future (e.g. 'disk space low'). The software is still working as expected.
# ERROR - Due to a more serious problem, the software has not been able to perform some function.
# CRITICAL - A serious error, indicating that the program itself may be unable to continue running.
LogLevel = DEBUG
";

/// Typed view of the `[Logger Settings]` section.
///
/// Every field is required on load; a hand-edited file missing a key or
/// holding an unparsable value is an [`LogrootError::InvalidConfig`], not a
/// silent default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub output_directory: PathBuf,
    pub base_file_name: String,
    pub extension: String,
    pub include_timestamp: bool,
    pub overwrite_existing: bool,
    pub console_output: bool,
    pub minimum_severity: Severity,
}

impl Default for LogConfig {
    /// The documented defaults, matching [`LogConfig::write_default`].
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("./Logs/"),
            base_file_name: "Log File".to_string(),
            extension: ".log".to_string(),
            include_timestamp: false,
            overwrite_existing: true,
            console_output: true,
            minimum_severity: Severity::Debug,
        }
    }
}

impl LogConfig {
    /// Load the configuration from `path`.
    ///
    /// A missing file, unreadable INI text, or a file without a
    /// `[Logger Settings]` section all return [`LogrootError::ConfigNotFound`]
    /// after emitting one diagnostic; the caller recovers from all of them
    /// identically. Field-level problems are `InvalidConfig`.
    pub fn load<P: AsRef<Path>>(path: P) -> LogrootResult<Self> {
        let path = path.as_ref();
        diag::emit(
            Severity::Info,
            format!("attempting to read config file {}", path.display()),
        );

        let mut ini = Ini::new();
        let sections = match ini.load(path) {
            Ok(sections) => sections,
            Err(reason) => {
                diag::emit(
                    Severity::Error,
                    format!("failed to read config file {}: {reason}", path.display()),
                );
                return Err(LogrootError::ConfigNotFound {
                    path: path.to_path_buf(),
                });
            }
        };

        let has_settings = sections
            .keys()
            .any(|section| section.eq_ignore_ascii_case(SETTINGS_SECTION));
        if !has_settings {
            diag::emit(
                Severity::Error,
                format!(
                    "config file {} has no [{SETTINGS_SECTION}] section",
                    path.display()
                ),
            );
            return Err(LogrootError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            output_directory: PathBuf::from(required(&ini, path, "FilePath")?),
            base_file_name: required(&ini, path, "FileName")?,
            extension: required(&ini, path, "Extension")?,
            include_timestamp: parse_flag("IncludeTimestamp", &required(&ini, path, "IncludeTimestamp")?)?,
            overwrite_existing: parse_flag("Overwrite", &required(&ini, path, "Overwrite")?)?,
            console_output: parse_flag("ConsoleOutput", &required(&ini, path, "ConsoleOutput")?)?,
            minimum_severity: required(&ini, path, "LogLevel")?.parse().map_err(|_| {
                LogrootError::InvalidConfig(format!(
                    "`LogLevel` in {} must be one of DEBUG, INFO, WARNING, ERROR, CRITICAL",
                    path.display()
                ))
            })?,
        })
    }

    /// Write the documented default configuration to `path`, creating parent
    /// directories first.
    pub fn write_default<P: AsRef<Path>>(path: P) -> LogrootResult<()> {
        let path = path.as_ref();
        diag::emit(
            Severity::Info,
            format!("attempting to create logger config file {}", path.display()),
        );

        if let Some(parent) = path.parent() {
            ensure_directory(parent);
        }
        fs::write(path, DEFAULT_CONFIG_CONTENTS)?;

        diag::emit(
            Severity::Info,
            format!("config file {} created", path.display()),
        );
        Ok(())
    }
}

fn required(ini: &Ini, path: &Path, key: &str) -> LogrootResult<String> {
    ini.get(SETTINGS_SECTION, key).ok_or_else(|| {
        LogrootError::InvalidConfig(format!(
            "{} is missing required key `{key}`",
            path.display()
        ))
    })
}

fn parse_flag(key: &str, value: &str) -> LogrootResult<bool> {
    match value.trim() {
        v if v.eq_ignore_ascii_case("TRUE") => Ok(true),
        v if v.eq_ignore_ascii_case("FALSE") => Ok(false),
        other => Err(LogrootError::InvalidConfig(format!(
            "`{key}` must be TRUE or FALSE, got `{other}`"
        ))),
    }
}

/// Idempotent "make sure this directory exists". Failure is diagnosed and
/// reported via the return value; the dependent file operation surfaces the
/// real error to the caller.
pub(crate) fn ensure_directory(path: &Path) -> bool {
    if path.as_os_str().is_empty() || path.exists() {
        return true;
    }
    diag::emit(
        Severity::Info,
        format!("directory {} does not exist, creating it", path.display()),
    );
    match fs::create_dir_all(path) {
        Ok(()) => true,
        Err(err) => {
            diag::emit(
                Severity::Error,
                format!("failed to create directory {}: {err}", path.display()),
            );
            false
        }
    }
}
