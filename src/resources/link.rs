//! Symlink resource.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::helpers::fs::{ensure_parent_dir, is_symlink};
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// A symlink from a project target to a module source.
#[derive(Debug, Clone)]
pub struct LinkResource {
    /// The module file/directory (what the symlink points to).
    pub source: PathBuf,
    /// The project path (where the symlink will be created).
    pub target: PathBuf,
}

impl LinkResource {
    /// Create a new link resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Applicable for LinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    /// Create the link unless something already occupies the target as a
    /// link. Conflicting entries are cleared before this runs.
    fn apply(&self) -> Result<ResourceChange> {
        if is_symlink(&self.target) {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        ensure_parent_dir(&self.target)?;
        create_symlink(&self.source, &self.target)
            .with_context(|| format!("create link: {}", self.target.display()))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for LinkResource {
    fn current_state(&self) -> Result<ResourceState> {
        let Ok(meta) = self.target.symlink_metadata() else {
            return Ok(ResourceState::Missing);
        };

        if !meta.file_type().is_symlink() {
            let kind = if meta.is_dir() { "directory" } else { "file" };
            return Ok(ResourceState::Invalid {
                reason: format!("target is a real {kind}"),
            });
        }

        if points_to(&self.target, &self.source) {
            Ok(ResourceState::Correct)
        } else {
            let current = std::fs::read_link(&self.target)
                .map_or_else(|_| "unreadable link".to_string(), |p| p.display().to_string());
            Ok(ResourceState::Incorrect {
                current: format!("points to {current}"),
            })
        }
    }

    /// Remove the link if it points at this resource's source. Anything
    /// else at the target is left alone.
    fn remove(&self) -> Result<ResourceChange> {
        match self.current_state()? {
            ResourceState::Correct => {
                remove_symlink(&self.target)
                    .with_context(|| format!("remove link: {}", self.target.display()))?;
                Ok(ResourceChange::Applied)
            }
            ResourceState::Missing => Ok(ResourceChange::AlreadyCorrect),
            ResourceState::Incorrect { current } | ResourceState::Invalid { reason: current } => {
                Ok(ResourceChange::Skipped { reason: current })
            }
        }
    }
}

/// Return `true` if the symlink at `link` resolves to `source`.
///
/// Both sides are canonicalized when they exist so relative links and
/// symlinked parent directories compare equal; a dangling link falls back
/// to comparing its raw target.
#[must_use]
pub fn points_to(link: &Path, source: &Path) -> bool {
    match (dunce::canonicalize(link), dunce::canonicalize(source)) {
        (Ok(a), Ok(b)) => paths_equal(&a, &b),
        _ => std::fs::read_link(link).is_ok_and(|raw| paths_equal(&raw, source)),
    }
}

/// Compare two paths for equality, handling UNC prefix normalization on Windows.
fn paths_equal(a: &Path, b: &Path) -> bool {
    let normalize = |p: &Path| -> PathBuf {
        #[cfg(windows)]
        {
            let s = p.to_string_lossy();
            if let Some(stripped) = s.strip_prefix(r"\\?\") {
                return PathBuf::from(stripped);
            }
        }
        p.to_path_buf()
    };

    normalize(a) == normalize(b)
}

/// Create a symlink at `link` pointing to `target`.
pub(crate) fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link).with_context(|| {
            format!(
                "creating symlink {} -> {}",
                link.display(),
                target.display()
            )
        })?;
    }

    #[cfg(windows)]
    {
        // Try native symlink API first
        let is_dir = target.is_dir();
        let result = if is_dir {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        };

        if result.is_err() {
            // Fall back to mklink via cmd.exe; /J (junction) for directories
            // needs no privilege.
            let link_str = link.to_string_lossy();
            let target_str = target.to_string_lossy();
            let mut args: Vec<&str> = vec!["/c", "mklink"];
            if is_dir {
                args.push("/J");
            }
            args.push(&link_str);
            args.push(&target_str);
            let dir = link.parent().unwrap_or_else(|| Path::new("."));
            let result = crate::exec::run_unchecked_in(dir, "cmd", &args)?;
            if !result.success {
                anyhow::bail!(
                    "mklink {} -> {}: {}",
                    link.display(),
                    target.display(),
                    result.stderr.trim()
                );
            }
        }
    }

    Ok(())
}

/// Remove a symlink, handling platform differences.
///
/// On Windows, directory symlinks must be removed with `remove_dir` (not `remove_file`).
/// Rust's `symlink_metadata().is_dir()` returns `false` for symlinks, so we check
/// the raw `FILE_ATTRIBUTE_DIRECTORY` flag to detect directory symlinks.
/// If `remove_dir` still fails with OS error 5 (access denied), we fall back
/// to `cmd /c rmdir` which runs in a separate process.
pub(crate) fn remove_symlink(path: &Path) -> Result<()> {
    let meta = std::fs::symlink_metadata(path)
        .with_context(|| format!("reading metadata: {}", path.display()))?;
    if is_dir_like(&meta) {
        match std::fs::remove_dir(path) {
            Ok(()) => {}
            #[cfg(windows)]
            Err(e) if e.raw_os_error() == Some(5) => {
                remove_dir_fallback(path)?;
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        std::fs::remove_file(path).with_context(|| format!("removing file: {}", path.display()))?;
    }
    Ok(())
}

/// Check if metadata represents a directory-like entry.
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory symlinks,
/// so we check the raw `FILE_ATTRIBUTE_DIRECTORY` bit instead.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}

/// Fallback directory removal on Windows using `cmd /c rmdir`.
/// This spawns a separate process that doesn't hold any handles from the
/// current process, which can resolve "Access is denied" errors.
#[cfg(windows)]
fn remove_dir_fallback(path: &Path) -> Result<()> {
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    use std::os::windows::process::CommandExt;
    let output = std::process::Command::new("cmd")
        .arg("/c")
        .arg("rmdir")
        .arg("/q")
        .arg(path)
        .creation_flags(CREATE_NO_WINDOW)
        .output()
        .context("failed to run rmdir")?;
    if !output.status.success() {
        anyhow::bail!(
            "remove directory/symlink '{}': {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn paths_equal_works() {
        let path1 = PathBuf::from("/tmp/test");
        let path2 = PathBuf::from("/tmp/test");
        assert!(paths_equal(&path1, &path2));

        let path3 = PathBuf::from("/tmp/other");
        assert!(!paths_equal(&path1, &path3));
    }

    #[test]
    fn description_mentions_both_ends() {
        let resource = LinkResource::new(PathBuf::from("/source"), PathBuf::from("/target"));
        assert!(resource.description().contains("/source"));
        assert!(resource.description().contains("/target"));
    }

    #[test]
    fn missing_when_target_absent() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        std::fs::write(&source, "test").unwrap();

        let resource = LinkResource::new(source, dir.path().join("target"));
        assert_eq!(resource.current_state().unwrap(), ResourceState::Missing);
    }

    #[test]
    fn invalid_when_target_is_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        std::fs::write(&source, "content").unwrap();
        std::fs::write(&target, "other content").unwrap();

        let resource = LinkResource::new(source, target);
        assert!(matches!(
            resource.current_state().unwrap(),
            ResourceState::Invalid { .. }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn apply_creates_parents_and_link() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("a/b/target");
        std::fs::write(&source, "x").unwrap();

        let resource = LinkResource::new(source.clone(), target.clone());
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(std::fs::read_link(&target).unwrap(), source);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }

    #[cfg(unix)]
    #[test]
    fn apply_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        std::fs::write(&source, "x").unwrap();

        let resource = LinkResource::new(source, target);
        resource.apply().unwrap();
        assert_eq!(resource.apply().unwrap(), ResourceChange::AlreadyCorrect);
    }

    #[cfg(unix)]
    #[test]
    fn incorrect_when_link_points_elsewhere() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let other = dir.path().join("other");
        let target = dir.path().join("target");
        std::fs::write(&source, "test").unwrap();
        std::fs::write(&other, "other").unwrap();
        std::os::unix::fs::symlink(&other, &target).unwrap();

        let resource = LinkResource::new(source, target);
        assert!(matches!(
            resource.current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn relative_link_to_source_is_correct() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        std::fs::write(&source, "test").unwrap();
        std::os::unix::fs::symlink("source", &target).unwrap();

        assert!(points_to(&target, &source));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_link_compares_raw_target() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("gone");
        let target = dir.path().join("target");
        std::os::unix::fs::symlink(&source, &target).unwrap();

        assert!(points_to(&target, &source));
        assert!(!points_to(&target, &dir.path().join("other")));
    }

    #[cfg(unix)]
    #[test]
    fn remove_only_deletes_own_links() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let other = dir.path().join("other");
        let target = dir.path().join("target");
        std::fs::write(&source, "test").unwrap();
        std::fs::write(&other, "other").unwrap();
        std::os::unix::fs::symlink(&other, &target).unwrap();

        let resource = LinkResource::new(source.clone(), target.clone());
        assert!(matches!(
            resource.remove().unwrap(),
            ResourceChange::Skipped { .. }
        ));
        assert!(is_symlink(&target));

        std::fs::remove_file(&target).unwrap();
        std::os::unix::fs::symlink(&source, &target).unwrap();
        assert_eq!(resource.remove().unwrap(), ResourceChange::Applied);
        assert!(!target.exists());
        assert!(source.exists(), "source must survive link removal");
    }

    #[cfg(unix)]
    #[test]
    fn remove_symlink_to_directory_keeps_directory() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("src_dir");
        let target = dir.path().join("link_dir");
        std::fs::create_dir(&source).unwrap();
        std::fs::write(source.join("a.txt"), "aaa").unwrap();
        std::os::unix::fs::symlink(&source, &target).unwrap();

        remove_symlink(&target).unwrap();
        assert!(target.symlink_metadata().is_err());
        assert!(source.join("a.txt").exists());
    }
}
