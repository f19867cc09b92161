//! Resolution of the final log file location.
//!
//! The configured output directory is normally interpreted against the
//! process working directory. The `relative_to_config` override re-anchors
//! it at the configuration file's own parent directory instead, which keeps
//! log output next to an application tree regardless of where the process
//! was launched from. Every override validation failure is a warning plus a
//! fallback to the base case, never a hard error.

use crate::config::LogConfig;
use crate::diag;
use crate::severity::Severity;
use chrono::{DateTime, Local};
use std::env;
use std::path::{Component, Path, PathBuf};

/// Absolute output directory plus the file name to create inside it.
/// Derived once per initialization call; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLogPath {
    pub directory: PathBuf,
    pub file_name: String,
}

impl ResolvedLogPath {
    pub fn full_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Compute the log file location for `config`.
///
/// `now` is the clock reading used for the optional filename timestamp;
/// callers pass `Local::now()` outside of tests.
pub fn resolve(
    config: &LogConfig,
    config_file_path: &Path,
    relative_to_config: Option<&Path>,
    now: DateTime<Local>,
) -> ResolvedLogPath {
    let directory = relative_to_config
        .and_then(|rel| override_directory(config, config_file_path, rel))
        .unwrap_or_else(|| absolutize(&config.output_directory));

    ResolvedLogPath {
        directory,
        file_name: file_name(config, now),
    }
}

/// Apply the relative-to-config override, or return `None` (with a warning)
/// when any validation fails.
fn override_directory(config: &LogConfig, config_file_path: &Path, rel: &Path) -> Option<PathBuf> {
    if config.output_directory.is_absolute() {
        diag::emit(
            Severity::Warning,
            format!(
                "configured FilePath {} is already absolute; ignoring relative_to_config",
                config.output_directory.display()
            ),
        );
        return None;
    }

    let config_location = absolutize(config_file_path);
    let Some(anchor) = config_location.parent() else {
        diag::emit(
            Severity::Warning,
            format!(
                "config path {} has no parent directory; ignoring relative_to_config",
                config_location.display()
            ),
        );
        return None;
    };

    let candidate = anchor.join(rel);
    if !candidate.exists() {
        diag::emit(
            Severity::Warning,
            format!(
                "relative_to_config target {} does not exist; falling back to the working directory",
                candidate.display()
            ),
        );
        return None;
    }

    if rel.is_absolute() || !starts_with_relative_marker(rel) {
        diag::emit(
            Severity::Warning,
            format!(
                "relative_to_config {} must be a relative path starting with '.'; falling back to the working directory",
                rel.display()
            ),
        );
        return None;
    }

    Some(absolutize(&candidate.join(&config.output_directory)))
}

fn starts_with_relative_marker(path: &Path) -> bool {
    matches!(
        path.components().next(),
        Some(Component::CurDir | Component::ParentDir)
    )
}

fn file_name(config: &LogConfig, now: DateTime<Local>) -> String {
    if config.include_timestamp {
        format!(
            "{}{}{}",
            config.base_file_name,
            now.format(" %m.%d.%Y %H.%M.%S"),
            config.extension
        )
    } else {
        format!("{}{}", config.base_file_name, config.extension)
    }
}

/// Anchor `path` at the working directory when relative, then fold out `.`
/// and `..` components lexically (the target may not exist yet, so no
/// filesystem canonicalization).
pub(crate) fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize(path);
    }
    match env::current_dir() {
        Ok(cwd) => normalize(&cwd.join(path)),
        Err(err) => {
            diag::emit(
                Severity::Warning,
                format!(
                    "could not determine the working directory ({err}); leaving {} relative",
                    path.display()
                ),
            );
            normalize(path)
        }
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) => {}
                _ => out.push(Component::ParentDir.as_os_str()),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::tempdir;

    fn config_with(output_directory: &str, include_timestamp: bool) -> LogConfig {
        LogConfig {
            output_directory: PathBuf::from(output_directory),
            include_timestamp,
            ..LogConfig::default()
        }
    }

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 5, 13, 4, 5).unwrap()
    }

    #[test]
    fn timestamped_file_name_uses_dotted_format() {
        let resolved = resolve(
            &config_with("./Logs/", true),
            Path::new("./Configs/Logger.ini"),
            None,
            fixed_now(),
        );
        assert_eq!(resolved.file_name, "Log File 01.05.2024 13.04.05.log");
    }

    #[test]
    fn plain_file_name_is_base_plus_extension() {
        let resolved = resolve(
            &config_with("./Logs/", false),
            Path::new("./Configs/Logger.ini"),
            None,
            fixed_now(),
        );
        assert_eq!(resolved.file_name, "Log File.log");
    }

    #[test]
    fn base_case_anchors_at_working_directory() {
        let resolved = resolve(
            &config_with("./Logs/", false),
            Path::new("./Configs/Logger.ini"),
            None,
            fixed_now(),
        );
        let expected = env::current_dir().unwrap().join("Logs");
        assert_eq!(resolved.directory, expected);
        assert_eq!(resolved.full_path(), expected.join("Log File.log"));
    }

    #[test]
    fn override_anchors_at_config_parent() {
        let dir = tempdir().unwrap();
        let configs = dir.path().join("app").join("Configs");
        fs::create_dir_all(&configs).unwrap();
        let config_path = configs.join("Logger.ini");
        fs::write(&config_path, "").unwrap();

        let resolved = resolve(
            &config_with("./Logs/", false),
            &config_path,
            Some(Path::new("../")),
            fixed_now(),
        );
        assert_eq!(resolved.directory, dir.path().join("app").join("Logs"));
    }

    #[test]
    fn absolute_output_directory_ignores_override() {
        let dir = tempdir().unwrap();
        let absolute_logs = dir.path().join("abs-logs");
        let resolved = resolve(
            &config_with(absolute_logs.to_str().unwrap(), false),
            Path::new("./Configs/Logger.ini"),
            Some(Path::new("../")),
            fixed_now(),
        );
        assert_eq!(resolved.directory, absolute_logs);
    }

    #[test]
    fn absolute_override_falls_back_to_base_case() {
        let resolved = resolve(
            &config_with("./Logs/", false),
            Path::new("./Configs/Logger.ini"),
            Some(Path::new("/definitely/not/here")),
            fixed_now(),
        );
        assert_eq!(resolved.directory, env::current_dir().unwrap().join("Logs"));
    }

    #[test]
    fn existing_absolute_override_still_falls_back() {
        // Exists, but is not a relative path starting with '.', so the third
        // validation rejects it.
        let dir = tempdir().unwrap();
        let configs = dir.path().join("Configs");
        fs::create_dir_all(&configs).unwrap();
        let config_path = configs.join("Logger.ini");
        fs::write(&config_path, "").unwrap();

        let resolved = resolve(
            &config_with("./Logs/", false),
            &config_path,
            Some(dir.path()),
            fixed_now(),
        );
        assert_eq!(resolved.directory, env::current_dir().unwrap().join("Logs"));
    }

    #[test]
    fn unmarked_relative_override_falls_back() {
        let dir = tempdir().unwrap();
        let configs = dir.path().join("Configs");
        let sibling = configs.join("sibling");
        fs::create_dir_all(&sibling).unwrap();
        let config_path = configs.join("Logger.ini");
        fs::write(&config_path, "").unwrap();

        // `sibling` exists next to the config but lacks the './' marker.
        let resolved = resolve(
            &config_with("./Logs/", false),
            &config_path,
            Some(Path::new("sibling")),
            fixed_now(),
        );
        assert_eq!(resolved.directory, env::current_dir().unwrap().join("Logs"));
    }

    #[test]
    fn normalize_folds_dot_components() {
        assert_eq!(
            normalize(Path::new("/tmp/app/Configs/.././Logs/")),
            PathBuf::from("/tmp/app/Logs")
        );
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize(Path::new("../x")), PathBuf::from("../x"));
    }
}
