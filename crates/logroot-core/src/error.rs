use std::path::PathBuf;
use thiserror::Error;

/// Result alias for core operations.
pub type LogrootResult<T> = Result<T, LogrootError>;

#[derive(Error, Debug)]
pub enum LogrootError {
    #[error("[LB1000] io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[LB1100] config file not found or unreadable: {}", .path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("[LB1101] configuration error: {0}")]
    InvalidConfig(String),

    #[error("[LB1200] could not open log file {}: {reason}", .path.display())]
    FileOpen { path: PathBuf, reason: String },
}

impl LogrootError {
    pub fn code(&self) -> &'static str {
        match self {
            LogrootError::Io(_) => "LB1000",
            LogrootError::ConfigNotFound { .. } => "LB1100",
            LogrootError::InvalidConfig(_) => "LB1101",
            LogrootError::FileOpen { .. } => "LB1200",
        }
    }
}
