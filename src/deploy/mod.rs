//! Module deployment: parse, check, apply, then run hooks.
//!
//! Every phase runs over all rules before the next one starts, so a refused
//! deploy (conflicts without `--force`, or a stale manifest entry) leaves the
//! project untouched.
mod clean;
pub mod conflicts;
mod context;
mod remove;

use anyhow::Result;
use std::path::PathBuf;

pub use clean::clean_dead_links;
pub use conflicts::{ConflictDetector, ConflictKind, ConflictRecord};
pub use context::Context;
pub use remove::remove_module;

use crate::error::DeployError;
use crate::manifest::{Manifest, ManifestParser};
use crate::registry::{Module, ModuleRegistry};
use crate::resources::hook::HookResource;
use crate::resources::link::LinkResource;
use crate::resources::{Applicable, ResourceChange};

/// Outcome of deploying one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployReport {
    /// Module name.
    pub module: String,
    /// Links created by this run.
    pub linked: Vec<PathBuf>,
    /// Rules whose target was already a link.
    pub unchanged: usize,
    /// Conflicting paths removed because of `--force`.
    pub cleared: Vec<PathBuf>,
    /// Targets of rules skipped because an earlier rule claims the same
    /// path, or one inside or above it.
    pub superseded: Vec<PathBuf>,
    /// Parent directories created for new links.
    pub created_dirs: Vec<PathBuf>,
    /// Hooks that ran successfully.
    pub hooks_run: usize,
    /// Hooks that failed or could not be started.
    pub hooks_failed: usize,
}

/// Deploy the registered module `name` into the project.
///
/// # Errors
///
/// Returns an error if the module is not registered, its manifest cannot be
/// parsed, a rule's source is missing, conflicts exist without `force`, or
/// a link cannot be created. Hook failures are only logged.
pub fn deploy_module(ctx: &Context, name: &str, force: bool) -> Result<DeployReport> {
    let module = ModuleRegistry::new(&ctx.project).resolve(name)?;
    deploy(ctx, &module, force)
}

/// Deploy every registered module in name order, stopping at the first
/// failure. Modules deployed before the failure stay deployed.
///
/// # Errors
///
/// Returns the first module's error, or an error if the registry cannot be
/// listed.
pub fn deploy_all(ctx: &Context, force: bool) -> Result<Vec<DeployReport>> {
    let registry = ModuleRegistry::new(&ctx.project);
    let mut reports = Vec::new();
    for module in registry.modules()? {
        reports.push(deploy(ctx, &module, force)?);
    }
    Ok(reports)
}

/// Register the directory at `path` as a module and deploy it.
///
/// A relative `path` is taken relative to the project directory, not the
/// process working directory.
///
/// # Errors
///
/// Returns an error if the module is already linked or the deploy fails.
/// The registry entry is kept when the deploy fails so it can be retried
/// with `deploy --force`.
pub fn link_module(ctx: &Context, path: &std::path::Path, force: bool) -> Result<DeployReport> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        ctx.project.cwd.join(path)
    };
    let module = ModuleRegistry::new(&ctx.project).link(&path)?;
    ctx.log
        .info(&format!("Registered {} -> {}", module.name, module.root.display()));
    deploy(ctx, &module, force)
}

/// Deploy an already-resolved module.
///
/// # Errors
///
/// See [`deploy_module`].
pub fn deploy(ctx: &Context, module: &Module, force: bool) -> Result<DeployReport> {
    let log = &*ctx.log;
    log.stage(&format!("Deploying {}", module.name));
    let mut report = DeployReport {
        module: module.name.clone(),
        ..DeployReport::default()
    };

    // PARSE
    let manifest = ManifestParser::new(&ctx.project.root, log).parse(&module.root)?;
    let links = plan_links(ctx, &manifest);
    log.debug(&format!(
        "{} rule(s), {} hook(s)",
        links.len(),
        manifest.hooks.len()
    ));

    // CHECK
    if let Some(missing) = links.iter().find(|l| !l.source.exists()) {
        return Err(DeployError::MissingSource(missing.source.clone()).into());
    }
    let mut detector = ConflictDetector::new();
    for link in &links {
        detector.inspect(&link.target, &link.source);
    }
    report.cleared = detector.resolve(force, log)?;

    // APPLY
    for link in &links {
        if detector.is_superseded(&link.target, &link.source) {
            log.warn(&format!(
                "skipped {}: an earlier rule claims this path",
                link.description()
            ));
            report.superseded.push(link.target.clone());
            continue;
        }
        if let Some(parent) = link.target.parent()
            && !parent.is_dir()
        {
            log.info(&format!("Create directory {}", parent.display()));
            report.created_dirs.push(parent.to_path_buf());
        }
        match link.apply()? {
            ResourceChange::Applied => {
                log.info(&format!("Applied: {}", link.description()));
                report.linked.push(link.target.clone());
            }
            ResourceChange::AlreadyCorrect => {
                log.debug(&format!("already linked: {}", link.target.display()));
                report.unchanged += 1;
            }
            ResourceChange::Skipped { reason } => {
                log.warn(&format!("skipped {}: {reason}", link.target.display()));
            }
        }
    }

    // HOOKS
    run_hooks(ctx, module, &manifest, &mut report);

    log.info(&format!(
        "{} has been deployed under {} ({} linked, {} unchanged)",
        module.name,
        ctx.project.root.display(),
        report.linked.len(),
        report.unchanged
    ));
    Ok(report)
}

/// Turn manifest rules into link resources with absolute paths.
fn plan_links(ctx: &Context, manifest: &Manifest) -> Vec<LinkResource> {
    manifest
        .rules
        .iter()
        .map(|rule| {
            LinkResource::new(
                manifest.source_path(rule),
                ctx.project.target_path(&rule.target),
            )
        })
        .collect()
}

/// Run the manifest's hooks in order. Failures never abort the deploy.
fn run_hooks(ctx: &Context, module: &Module, manifest: &Manifest, report: &mut DeployReport) {
    let log = &*ctx.log;
    let settings = &ctx.project.settings.hooks;
    if manifest.hooks.is_empty() {
        return;
    }
    if !settings.enabled {
        log.info(&format!(
            "hooks disabled, skipping {} hook(s)",
            manifest.hooks.len()
        ));
        return;
    }

    for hook in &manifest.hooks {
        let resource = HookResource::new(
            hook,
            &module.root,
            &ctx.project.cwd,
            ctx.platform,
            settings.shell_command(ctx.platform),
            &*ctx.executor,
        );
        match resource.apply() {
            Ok(ResourceChange::Skipped { reason }) => {
                log.warn(&format!("hook {reason}: {}", resource.description()));
                report.hooks_failed += 1;
            }
            Ok(_) => {
                log.info(&format!("Ran hook: {}", resource.description()));
                report.hooks_run += 1;
            }
            Err(e) => {
                log.warn(&format!(
                    "hook could not be started: {}: {e:#}",
                    resource.description()
                ));
                report.hooks_failed += 1;
            }
        }
    }
}
