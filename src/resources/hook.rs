//! Post-deploy shell hook resource.
use anyhow::Result;
use std::path::{Path, PathBuf};

use super::{Applicable, ResourceChange};
use crate::exec::Executor;
use crate::manifest::ShellHook;
use crate::platform::Platform;

/// A rendered hook ready to run through a shell.
#[derive(Debug)]
pub struct HookResource<'a> {
    /// Command text with placeholders already substituted.
    pub command: String,
    /// Shell program, e.g. `sh`.
    pub shell: String,
    /// Flag that makes the shell run a command string, e.g. `-c`.
    pub flag: &'static str,
    /// Working directory of the hook process.
    pub cwd: PathBuf,
    executor: &'a dyn Executor,
}

impl<'a> HookResource<'a> {
    /// Render `hook` for a module deployed into a project.
    ///
    /// POSIX-only fragments are rewritten for `platform` first, then
    /// `$MODULE` becomes `module_root` and `$PROJECT` becomes `project_cwd`
    /// by plain text replacement.
    #[must_use]
    pub fn new(
        hook: &ShellHook,
        module_root: &Path,
        project_cwd: &Path,
        platform: Platform,
        shell: (String, &'static str),
        executor: &'a dyn Executor,
    ) -> Self {
        let command = platform
            .rewrite_hook(&hook.command)
            .replace("$MODULE", &module_root.to_string_lossy())
            .replace("$PROJECT", &project_cwd.to_string_lossy());
        Self {
            command,
            shell: shell.0,
            flag: shell.1,
            cwd: project_cwd.to_path_buf(),
            executor,
        }
    }
}

impl Applicable for HookResource<'_> {
    fn description(&self) -> String {
        self.command.clone()
    }

    /// Run the hook. A non-zero exit is reported as
    /// [`ResourceChange::Skipped`] rather than an error.
    fn apply(&self) -> Result<ResourceChange> {
        let result = self.executor.run_unchecked_in(
            &self.cwd,
            &self.shell,
            &[self.flag, self.command.as_str()],
        )?;
        if result.success {
            return Ok(ResourceChange::Applied);
        }
        let code = result
            .code
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        let stderr = result.stderr.trim();
        let reason = if stderr.is_empty() {
            format!("exited with {code}")
        } else {
            format!("exited with {code}: {stderr}")
        };
        Ok(ResourceChange::Skipped { reason })
    }
}
