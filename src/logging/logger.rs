//! Console/file logger backed by `tracing`.
use std::path::PathBuf;

use super::types::Log;
use super::utils::log_file_path;

/// Implement the methods of [`Log`] by delegating to inherent methods of the
/// same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger emitting `tracing` events.
///
/// Console rendering and the persistent log file at
/// `$XDG_CACHE_HOME/modlink/<command>.log` are both handled by the
/// subscriber installed with [`init_subscriber`](super::init_subscriber);
/// without a subscriber every event is discarded.
#[derive(Debug)]
pub struct Logger {
    log_file: PathBuf,
}

impl Logger {
    /// Create a new logger for `command`.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            log_file: log_file_path(command),
        }
    }

    /// Path of the persistent log file for this command.
    #[must_use]
    pub const fn log_path(&self) -> &PathBuf {
        &self.log_file
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "modlink::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error);
}
