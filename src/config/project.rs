//! The host project every command operates on.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::settings::Settings;

/// Name of the registry directory inside the project working directory.
pub const REGISTRY_DIR: &str = ".modman";

/// Marker file inside the registry naming an alternate target root.
pub const BASEDIR_FILE: &str = ".basedir";

/// Resolved project context, threaded explicitly through every operation.
#[derive(Debug, Clone)]
pub struct Project {
    /// Working directory the command was started in (or `--project`).
    pub cwd: PathBuf,
    /// Directory link targets are resolved against.
    pub root: PathBuf,
    /// The `.modman` registry directory.
    pub registry: PathBuf,
    /// Settings loaded from the registry.
    pub settings: Settings,
}

impl Project {
    /// Resolve the project rooted at `cwd`.
    ///
    /// The registry does not have to exist yet (`init` creates it). When the
    /// `.basedir` marker is present its trimmed contents replace `cwd` as the
    /// target root, resolved against `cwd` when relative.
    ///
    /// # Errors
    ///
    /// Returns an error if `cwd` does not exist, the marker cannot be read,
    /// or `settings.toml` is invalid.
    pub fn open(cwd: &Path) -> Result<Self> {
        let cwd = dunce::canonicalize(cwd)
            .with_context(|| format!("resolve project directory: {}", cwd.display()))?;
        let registry = cwd.join(REGISTRY_DIR);
        let root = read_basedir(&registry, &cwd)?.unwrap_or_else(|| cwd.clone());
        let settings = Settings::load(&registry)?;
        Ok(Self {
            cwd,
            root,
            registry,
            settings,
        })
    }

    /// Absolute path of a manifest target inside the project.
    #[must_use]
    pub fn target_path(&self, target: &str) -> PathBuf {
        self.root.join(target)
    }
}

/// Read the `.basedir` marker, if any.
fn read_basedir(registry: &Path, cwd: &Path) -> Result<Option<PathBuf>> {
    let marker = registry.join(BASEDIR_FILE);
    if !marker.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&marker)
        .with_context(|| format!("read base directory marker: {}", marker.display()))?;
    let value = content.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let base = cwd.join(value);
    Ok(Some(dunce::canonicalize(&base).unwrap_or(base)))
}
