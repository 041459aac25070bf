//! Clean command implementation.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::deploy;
use crate::logging::Logger;

/// Run the clean command.
///
/// # Errors
///
/// Returns an error if the project tree cannot be walked or a dead link
/// cannot be removed.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    let removed = deploy::clean_dead_links(&setup.ctx)?;
    log.info(&format!("{} dead link(s) removed", removed.len()));
    Ok(())
}
