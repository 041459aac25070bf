use anyhow::Result;
use std::path::PathBuf;

use super::Context;
use crate::resources::remove::remove_path;

/// Remove every symlink below the project working directory whose target no
/// longer exists. Links are never followed, and directories named in the
/// `[clean] exclude` setting are not descended into.
///
/// Returns the removed links in walk order.
///
/// # Errors
///
/// Returns an error if a dead link cannot be removed. Unreadable directories
/// are logged and skipped.
pub fn clean_dead_links(ctx: &Context) -> Result<Vec<PathBuf>> {
    let log = &*ctx.log;
    let exclude = &ctx.project.settings.clean.exclude;
    log.stage(&format!(
        "Cleaning dead links under {}",
        ctx.project.cwd.display()
    ));

    let walker = walkdir::WalkDir::new(&ctx.project.cwd)
        .follow_links(false)
        .sort_by_file_name();

    let mut removed = Vec::new();
    for entry in walker.into_iter().filter_entry(|e| {
        !(e.depth() > 0
            && e.file_type().is_dir()
            && exclude
                .iter()
                .any(|name| e.file_name().to_string_lossy() == name.as_str()))
    }) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log.warn(&format!("skipping unreadable entry: {e}"));
                continue;
            }
        };
        if entry.path_is_symlink() && !entry.path().exists() {
            remove_path(entry.path())?;
            log.info(&format!("Remove {}.", entry.path().display()));
            removed.push(entry.path().to_path_buf());
        }
    }

    if removed.is_empty() {
        log.info("no dead links found");
    }
    Ok(removed)
}
