//! Init command implementation.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::{GlobalOpts, InitOpts};
use crate::logging::Logger;
use crate::registry::ModuleRegistry;

/// Run the init command.
///
/// # Errors
///
/// Returns an error if the project directory cannot be resolved or the
/// registry cannot be written.
pub fn run(global: &GlobalOpts, opts: &InitOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    let registry = ModuleRegistry::new(&setup.ctx.project);
    log.stage("Initializing registry");
    if registry.init(opts.basedir.as_deref())? {
        log.info(&format!("Created {}", registry.dir().display()));
    } else {
        log.info(&format!("{} already exists", registry.dir().display()));
    }
    if let Some(basedir) = &opts.basedir {
        log.info(&format!("Links will be deployed under {basedir}"));
    }
    Ok(())
}
