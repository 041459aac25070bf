use anyhow::Result;

use super::Context;
use crate::manifest::ManifestParser;
use crate::registry::ModuleRegistry;
use crate::resources::helpers::fs::is_symlink;
use crate::resources::link::LinkResource;
use crate::resources::remove::remove_path;
use crate::resources::{Resource, ResourceChange};

/// Remove the links of module `name` from the project, then its registry
/// entry.
///
/// Only rules whose source still exists are considered. A link is removed
/// when it resolves into the module; links pointing elsewhere are left
/// alone. A real file or directory at a target is left in place unless
/// `force` is set.
///
/// Returns the number of project paths removed.
///
/// # Errors
///
/// Returns an error if the module is not registered, its manifest cannot be
/// parsed, or a path cannot be removed.
pub fn remove_module(ctx: &Context, name: &str, force: bool) -> Result<usize> {
    let log = &*ctx.log;
    let registry = ModuleRegistry::new(&ctx.project);
    let module = registry.resolve(name)?;
    log.stage(&format!("Removing {}", module.name));

    let manifest = ManifestParser::new(&ctx.project.root, log).parse(&module.root)?;
    let mut removed = 0;
    for rule in &manifest.rules {
        let link = LinkResource::new(
            manifest.source_path(rule),
            ctx.project.target_path(&rule.target),
        );
        if !link.source.exists() {
            log.debug(&format!("source gone, skipping {}", link.target.display()));
            continue;
        }
        match link.remove()? {
            ResourceChange::Applied => {
                log.info(&format!("Removed {}", link.target.display()));
                removed += 1;
            }
            ResourceChange::AlreadyCorrect => {}
            ResourceChange::Skipped { reason } => {
                let is_link = is_symlink(&link.target);
                if force && !is_link {
                    remove_path(&link.target)?;
                    log.info(&format!("Removed {}", link.target.display()));
                    removed += 1;
                } else if is_link {
                    log.debug(&format!("left {} in place: {reason}", link.target.display()));
                } else {
                    log.warn(&format!(
                        "left {} in place: {reason} (use --force to delete it)",
                        link.target.display()
                    ));
                }
            }
        }
    }

    if registry.unlink(&module.name)? {
        log.info(&format!("Unregistered {}", module.name));
    } else {
        log.warn(&format!(
            "registry entry {} is a directory, left in place",
            module.name
        ));
    }
    Ok(removed)
}
