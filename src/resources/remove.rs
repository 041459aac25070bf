//! Recursive removal resource.
use anyhow::{Context as _, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::link::remove_symlink;
use super::{Applicable, ResourceChange};

/// Deletes whatever occupies `path`: symlinks are unlinked without being
/// followed, directories are emptied depth-first, read-only files are made
/// writable first.
#[derive(Debug, Clone)]
pub struct RemoveResource {
    /// Path to clear.
    pub path: PathBuf,
}

impl RemoveResource {
    /// Create a new remove resource.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Applicable for RemoveResource {
    fn description(&self) -> String {
        format!("remove {}", self.path.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        remove_path(&self.path)
    }
}

/// Remove `path` and everything below it.
///
/// An absent path is not an error and reports
/// [`ResourceChange::AlreadyCorrect`].
///
/// # Errors
///
/// Returns an error if an entry exists but cannot be removed.
pub fn remove_path(path: &Path) -> Result<ResourceChange> {
    let meta = match std::fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ResourceChange::AlreadyCorrect),
        Err(e) => {
            return Err(e).with_context(|| format!("reading metadata: {}", path.display()));
        }
    };

    if meta.file_type().is_symlink() {
        remove_symlink(path)?;
    } else if meta.is_dir() {
        remove_dir_recursive(path)?;
    } else {
        make_writable(path, &meta)?;
        std::fs::remove_file(path).with_context(|| format!("removing file: {}", path.display()))?;
    }
    Ok(ResourceChange::Applied)
}

/// Remove the children of `dir` (children first), then `dir` itself.
fn remove_dir_recursive(dir: &Path) -> Result<()> {
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
        remove_path(&entry.path())?;
    }
    std::fs::remove_dir(dir).with_context(|| format!("removing directory: {}", dir.display()))
}

/// Clear the read-only flag so the file can be deleted on Windows.
fn make_writable(path: &Path, meta: &std::fs::Metadata) -> Result<()> {
    let mut perms = meta.permissions();
    if !perms.readonly() {
        return Ok(());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        perms.set_mode(perms.mode() | 0o200);
    }
    #[cfg(not(unix))]
    {
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
    }
    std::fs::set_permissions(path, perms)
        .with_context(|| format!("clearing read-only flag: {}", path.display()))
}
