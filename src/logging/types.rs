//! The [`Log`] trait shared by the engine and its test doubles.

/// Abstraction over logging backends.
///
/// Engine code logs through `&dyn Log` so tests can capture messages without
/// installing a global subscriber.
pub trait Log: std::fmt::Debug {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
}

/// A [`Log`] that keeps every message in memory, prefixed with its level.
///
/// Used by unit and integration tests to assert on diagnostics.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: std::sync::Mutex<Vec<String>>,
}

impl MemoryLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return all recorded lines in order, e.g. `"warn: …"`.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map_or_else(|_| Vec::new(), |guard| guard.clone())
    }

    /// Return `true` if any line at `level` contains `needle`.
    #[must_use]
    pub fn contains(&self, level: &str, needle: &str) -> bool {
        let prefix = format!("{level}: ");
        self.lines()
            .iter()
            .any(|l| l.starts_with(&prefix) && l.contains(needle))
    }

    fn push(&self, level: &str, msg: &str) {
        if let Ok(mut guard) = self.lines.lock() {
            guard.push(format!("{level}: {msg}"));
        }
    }
}

impl Log for MemoryLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }

    fn info(&self, msg: &str) {
        self.push("info", msg);
    }

    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }

    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }

    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
}
