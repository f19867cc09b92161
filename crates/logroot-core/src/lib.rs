//! INI-driven bootstrap for a process-wide logging registry.
//!
//! `create_root` reads (or creates) an INI configuration describing where
//! log output goes, then installs a file sink and an optional console sink
//! on the shared registry exactly once per process. Repeated calls are
//! warned no-ops unless explicitly overridden, and the registry doubles as
//! the global `log` facade backend so `log::info!` lands in the same sinks
//! as named child loggers.

pub mod config;
mod diag;
pub mod error;
pub mod init;
pub mod registry;
pub mod resolve;
pub mod severity;

pub use config::{LogConfig, DEFAULT_CONFIG_PATH};
pub use error::{LogrootError, LogrootResult};
pub use init::{create_root, RootOptions};
pub use registry::{root_registry, ChildLogger, Registry, RegistryHandle, SinkInfo, SinkMode};
pub use resolve::{resolve, ResolvedLogPath};
pub use severity::Severity;

#[allow(deprecated)]
pub use init::create_logger;
