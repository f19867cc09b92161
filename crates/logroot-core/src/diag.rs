//! Self-diagnostics for the bootstrap path itself.
//!
//! Messages produced while the registry is still being configured must not
//! be silently lost, so they fall back to stderr until at least one sink
//! exists. Once configured, they route through the registry like any other
//! record.

use crate::registry;
use crate::severity::Severity;

/// Logger name used for the module's own diagnostics.
pub(crate) const MODULE_NAME: &str = "logroot";

pub(crate) fn emit(severity: Severity, message: impl AsRef<str>) {
    let message = message.as_ref();
    let registry = registry::root_registry();
    if registry.handler_count() > 0 {
        registry.dispatch(MODULE_NAME, severity, message);
    } else {
        eprintln!("[{severity}] [{MODULE_NAME}]: {message}");
    }
}
