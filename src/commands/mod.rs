//! Top-level subcommand orchestration.
pub mod clean;
pub mod completions;
pub mod deploy;
pub mod init;
pub mod link;
pub mod remove;
pub mod version;

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::config::Project;
use crate::deploy::Context;
use crate::logging::Logger;

/// Shared state produced by the common command setup sequence.
///
/// Resolves the project directory and wraps it in an engine [`Context`] so
/// that each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Engine context for the resolved project.
    pub ctx: Context,
}

impl CommandSetup {
    /// Resolve the project directory from `--project` or the current
    /// directory, load its settings, and build the engine context.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory does not exist or `settings.toml`
    /// fails to parse.
    pub fn init(global: &GlobalOpts, log: &Arc<Logger>) -> Result<Self> {
        let cwd = project_dir(global)?;
        let project = Project::open(&cwd)?;
        log.debug(&format!("project: {}", project.cwd.display()));
        if project.root != project.cwd {
            log.debug(&format!("target root: {}", project.root.display()));
        }
        let shared = Arc::clone(log);
        let ctx = Context::new(project, shared);
        log.debug(&format!("platform: {}", ctx.platform.os));
        Ok(Self { ctx })
    }
}

/// Directory the command operates in.
fn project_dir(global: &GlobalOpts) -> Result<PathBuf> {
    match &global.project {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().context("determine current directory"),
    }
}
