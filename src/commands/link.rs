//! Link command implementation.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::{GlobalOpts, LinkOpts};
use crate::deploy;
use crate::logging::Logger;

/// Run the link command: register a checkout, then deploy it.
///
/// # Errors
///
/// Returns an error if the path is not a directory, a module of the same
/// name is already linked, or the deploy fails.
pub fn run(global: &GlobalOpts, opts: &LinkOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    let report = deploy::link_module(&setup.ctx, &opts.path, opts.force.force)?;
    log.info(&format!(
        "Successfully linked new module '{}'",
        report.module
    ));
    Ok(())
}
