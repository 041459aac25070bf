//! Deploy, deploy-all and repair command implementations.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::{DeployOpts, ForceOpts, GlobalOpts};
use crate::deploy::{self, DeployReport};
use crate::logging::Logger;

/// Run the deploy command for a single module.
///
/// # Errors
///
/// Returns an error if the module is not linked or its deploy fails.
pub fn run(global: &GlobalOpts, opts: &DeployOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    deploy::deploy_module(&setup.ctx, &opts.module, opts.force.force)?;
    Ok(())
}

/// Run the deploy-all command.
///
/// # Errors
///
/// Returns the first failing module's error. Modules deployed before it
/// stay deployed.
pub fn run_all(global: &GlobalOpts, opts: &ForceOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    let reports = deploy::deploy_all(&setup.ctx, opts.force)?;
    print_summary(&reports, log);
    Ok(())
}

/// Run the repair command, which is `deploy-all --force`.
///
/// # Errors
///
/// See [`run_all`].
pub fn repair(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    run_all(global, &ForceOpts { force: true }, log)
}

fn print_summary(reports: &[DeployReport], log: &Logger) {
    log.stage("Summary");
    if reports.is_empty() {
        log.info("no modules registered");
        return;
    }
    for report in reports {
        let mut parts = vec![
            format!("{} linked", report.linked.len()),
            format!("{} unchanged", report.unchanged),
        ];
        if !report.cleared.is_empty() {
            parts.push(format!("{} cleared", report.cleared.len()));
        }
        if !report.superseded.is_empty() {
            parts.push(format!("{} superseded", report.superseded.len()));
        }
        if report.hooks_failed > 0 {
            parts.push(format!("{} hook(s) failed", report.hooks_failed));
        }
        log.info(&format!("{}: {}", report.module, parts.join(", ")));
    }
}
