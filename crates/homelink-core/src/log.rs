// ── Platform log capability ──
//
// User-facing notices (adding, removing, hidden) are routed through a
// capability handed to the platform at construction. Diagnostics that
// are only interesting to developers use `tracing` directly.

use std::sync::Arc;

use crate::config::PlatformConfig;

pub trait PlatformLog: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards notices to `tracing` under the `homelink` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl PlatformLog for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!(target: "homelink", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "homelink", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "homelink", "{message}");
    }
}

/// Drops informational notices. Warnings and errors still reach `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentLog;

impl PlatformLog for SilentLog {
    fn info(&self, _message: &str) {}

    fn warn(&self, message: &str) {
        TracingLog.warn(message);
    }

    fn error(&self, message: &str) {
        TracingLog.error(message);
    }
}

/// The capability matching `disable_logs`.
pub fn log_for(config: &PlatformConfig) -> Arc<dyn PlatformLog> {
    if config.disable_logs {
        Arc::new(SilentLog)
    } else {
        Arc::new(TracingLog)
    }
}
