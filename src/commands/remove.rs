//! Remove command implementation.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::{DeployOpts, GlobalOpts};
use crate::deploy;
use crate::logging::Logger;

/// Run the remove command.
///
/// # Errors
///
/// Returns an error if the module is not linked, its manifest cannot be
/// parsed, or a path cannot be removed.
pub fn run(global: &GlobalOpts, opts: &DeployOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    let removed = deploy::remove_module(&setup.ctx, &opts.module, opts.force.force)?;
    log.info(&format!(
        "{} has been removed ({removed} path(s) deleted)",
        opts.module
    ));
    Ok(())
}
