use std::sync::Arc;

use crate::config::Project;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::Log;
use crate::platform::Platform;

/// Everything an engine operation needs besides its arguments.
pub struct Context {
    /// The project being operated on.
    pub project: Project,
    /// Detected platform information.
    pub platform: Platform,
    /// Logger for progress and diagnostics.
    pub log: Arc<dyn Log>,
    /// Command executor used for hooks (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("project", &self.project)
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("executor", &"<dyn Executor>")
            .finish()
    }
}

impl Context {
    /// Create a context for `project` on the detected platform, running
    /// hooks through the system shell.
    #[must_use]
    pub fn new(project: Project, log: Arc<dyn Log>) -> Self {
        Self {
            project,
            platform: Platform::detect(),
            log,
            executor: Arc::new(SystemExecutor),
        }
    }

    /// Replace the command executor.
    #[must_use]
    pub fn with_executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = executor;
        self
    }
}
