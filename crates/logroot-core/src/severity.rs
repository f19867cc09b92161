use crate::error::LogrootError;
use std::fmt;
use std::str::FromStr;

/// Record severity, ordered from least to most serious.
///
/// The ordering drives threshold filtering: a registry configured at
/// `Warning` drops `Debug` and `Info` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Every severity, least serious first.
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// Upper-case name as it appears in config files and formatted records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Lenient constructor for free-form level names: unrecognized names
    /// fall back to `Info`. Config parsing uses the strict `FromStr`
    /// implementation instead.
    pub fn from_name_lossy(name: &str) -> Severity {
        name.parse().unwrap_or(Severity::Info)
    }

    /// Filter value advertised to the `log` facade. `log` has no critical
    /// level, so `Critical` maps to the error filter and the registry's own
    /// threshold does the final cut.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Severity::Debug => log::LevelFilter::Debug,
            Severity::Info => log::LevelFilter::Info,
            Severity::Warning => log::LevelFilter::Warn,
            Severity::Error | Severity::Critical => log::LevelFilter::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LogrootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARNING" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" => Ok(Severity::Critical),
            other => Err(LogrootError::InvalidConfig(format!(
                "unrecognized log level `{other}`"
            ))),
        }
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace | log::Level::Debug => Severity::Debug,
            log::Level::Info => Severity::Info,
            log::Level::Warn => Severity::Warning,
            log::Level::Error => Severity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_seriousness() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!(" CRITICAL ".parse::<Severity>().unwrap(), Severity::Critical);
    }

    #[test]
    fn parse_rejects_unknown_names() {
        let err = "VERBOSE".parse::<Severity>().unwrap_err();
        assert_eq!(err.code(), "LB1101");
    }

    #[test]
    fn lossy_parse_falls_back_to_info() {
        assert_eq!(Severity::from_name_lossy("VERBOSE"), Severity::Info);
        assert_eq!(Severity::from_name_lossy("error"), Severity::Error);
    }

    #[test]
    fn trace_records_map_to_debug() {
        assert_eq!(Severity::from(log::Level::Trace), Severity::Debug);
    }
}
