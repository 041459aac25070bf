//! The `.modman` module registry.
//!
//! Each registered module is an entry `.modman/<name>`, normally a symlink
//! to the module's checkout (a real directory also counts). Dot-files in the
//! registry (`.basedir`) and `settings.toml` are bookkeeping, not modules.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::config::{BASEDIR_FILE, Project, SETTINGS_FILE};
use crate::error::RegistryError;
use crate::resources::helpers::fs::{entry_exists, is_symlink};
use crate::resources::link::{create_symlink, remove_symlink};

/// A registered module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Registry entry name (the linked directory's basename).
    pub name: String,
    /// Canonical absolute path of the module checkout.
    pub root: PathBuf,
}

/// Read/write access to a project's registry directory.
#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    dir: PathBuf,
}

impl ModuleRegistry {
    /// Registry of `project`.
    #[must_use]
    pub fn new(project: &Project) -> Self {
        Self::at(&project.registry)
    }

    /// Registry stored in `dir`.
    #[must_use]
    pub fn at(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Path of the registry directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the registry directory and, when `base_dir` is given, write the
    /// `.basedir` marker. Returns `true` if the directory was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or marker cannot be written.
    pub fn init(&self, base_dir: Option<&str>) -> Result<bool> {
        let created = !self.dir.is_dir();
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create registry: {}", self.dir.display()))?;
        if let Some(base_dir) = base_dir {
            let marker = self.dir.join(BASEDIR_FILE);
            std::fs::write(&marker, base_dir)
                .with_context(|| format!("write base directory marker: {}", marker.display()))?;
        }
        Ok(created)
    }

    /// Resolve a module by registry name.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotInitialized`] if the registry does not exist
    /// - [`RegistryError::NotLinked`] if there is no entry named `name`
    /// - [`RegistryError::InvalidModulePath`] if the entry is a dangling link
    pub fn resolve(&self, name: &str) -> Result<Module> {
        self.require_initialized()?;
        if !is_module_name(name) {
            return Err(RegistryError::NotLinked(name.to_string()).into());
        }
        let entry = self.dir.join(name);
        if !(is_symlink(&entry) || entry.is_dir()) {
            return Err(RegistryError::NotLinked(name.to_string()).into());
        }
        let root =
            dunce::canonicalize(&entry).map_err(|_| RegistryError::InvalidModulePath(entry))?;
        Ok(Module {
            name: name.to_string(),
            root,
        })
    }

    /// Register the directory at `path` under its basename.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotInitialized`] if the registry does not exist
    /// - [`RegistryError::InvalidModulePath`] if `path` is not a directory
    /// - [`RegistryError::AlreadyLinked`] if the name is taken
    pub fn link(&self, path: &Path) -> Result<Module> {
        self.require_initialized()?;
        let root = dunce::canonicalize(path)
            .ok()
            .filter(|p| p.is_dir())
            .ok_or_else(|| RegistryError::InvalidModulePath(path.to_path_buf()))?;
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| is_module_name(n))
            .ok_or_else(|| RegistryError::InvalidModulePath(path.to_path_buf()))?;

        let entry = self.dir.join(&name);
        if entry_exists(&entry) {
            return Err(RegistryError::AlreadyLinked(name).into());
        }
        create_symlink(&root, &entry)?;
        Ok(Module { name, root })
    }

    /// Names of all registered modules, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotInitialized`] if the registry does not
    /// exist, or an I/O error if it cannot be listed.
    pub fn module_names(&self) -> Result<Vec<String>> {
        self.require_initialized()?;
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)
            .with_context(|| format!("reading registry {}", self.dir.display()))?
        {
            let entry = entry.with_context(|| format!("reading entry in {}", self.dir.display()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();
            if is_module_name(&name) && (is_symlink(&path) || path.is_dir()) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// All registered modules, sorted by name.
    ///
    /// # Errors
    ///
    /// Fails on the first entry that cannot be resolved.
    pub fn modules(&self) -> Result<Vec<Module>> {
        self.module_names()?
            .iter()
            .map(|name| self.resolve(name))
            .collect()
    }

    /// Drop the registry entry for `name`.
    ///
    /// Symlink entries are removed. A real directory is a checkout owned by
    /// the user and is left in place; `Ok(false)` reports that.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be removed.
    pub fn unlink(&self, name: &str) -> Result<bool> {
        let entry = self.dir.join(name);
        if is_symlink(&entry) {
            remove_symlink(&entry)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn require_initialized(&self) -> Result<(), RegistryError> {
        if self.dir.is_dir() {
            Ok(())
        } else {
            Err(RegistryError::NotInitialized {
                path: self.dir.clone(),
            })
        }
    }
}

/// Registry names are single path segments that are not bookkeeping files.
fn is_module_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name != SETTINGS_FILE
        && !name.contains(std::path::is_separator)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn registry() -> (tempfile::TempDir, ModuleRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let registry = ModuleRegistry::at(&dir.path().join(".modman"));
        (dir, registry)
    }

    fn downcast(err: &anyhow::Error) -> &RegistryError {
        err.downcast_ref::<RegistryError>().expect("registry error")
    }

    #[test]
    fn init_creates_directory_once() {
        let (_dir, registry) = registry();
        assert!(registry.init(None).unwrap());
        assert!(!registry.init(None).unwrap());
        assert!(registry.dir().is_dir());
    }

    #[test]
    fn init_writes_basedir_marker() {
        let (_dir, registry) = registry();
        registry.init(Some("htdocs")).unwrap();
        assert_eq!(
            std::fs::read_to_string(registry.dir().join(BASEDIR_FILE)).unwrap(),
            "htdocs"
        );
    }

    #[test]
    fn uninitialized_registry_is_reported() {
        let (_dir, registry) = registry();
        let err = registry.resolve("shop").unwrap_err();
        assert!(matches!(
            downcast(&err),
            RegistryError::NotInitialized { .. }
        ));
        assert!(registry.module_names().is_err());
    }

    #[test]
    fn unknown_module_is_not_linked() {
        let (_dir, registry) = registry();
        registry.init(None).unwrap();
        let err = registry.resolve("shop").unwrap_err();
        assert!(matches!(downcast(&err), RegistryError::NotLinked(n) if n == "shop"));
        assert_eq!(err.to_string(), "shop is not linked, please link it first");
    }

    #[test]
    fn bookkeeping_names_are_not_modules() {
        let (_dir, registry) = registry();
        registry.init(Some("x")).unwrap();
        assert!(registry.resolve(BASEDIR_FILE).is_err());
        assert!(registry.resolve("../escape").is_err());
    }

    #[test]
    fn directory_entries_are_modules() {
        let (_dir, registry) = registry();
        registry.init(None).unwrap();
        std::fs::create_dir(registry.dir().join("cloned")).unwrap();
        let module = registry.resolve("cloned").unwrap();
        assert_eq!(module.name, "cloned");
        assert!(module.root.ends_with("cloned"));
    }

    #[cfg(unix)]
    #[test]
    fn link_then_resolve() {
        let (dir, registry) = registry();
        registry.init(None).unwrap();
        let checkout = dir.path().join("vendor").join("shop");
        std::fs::create_dir_all(&checkout).unwrap();

        let linked = registry.link(&checkout).unwrap();
        assert_eq!(linked.name, "shop");
        assert_eq!(registry.resolve("shop").unwrap(), linked);
        assert_eq!(linked.root, dunce::canonicalize(&checkout).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn link_twice_is_already_linked() {
        let (dir, registry) = registry();
        registry.init(None).unwrap();
        let checkout = dir.path().join("shop");
        std::fs::create_dir_all(&checkout).unwrap();

        registry.link(&checkout).unwrap();
        let err = registry.link(&checkout).unwrap_err();
        assert!(matches!(downcast(&err), RegistryError::AlreadyLinked(n) if n == "shop"));
        assert_eq!(err.to_string(), "shop is already linked");
    }

    #[test]
    fn link_rejects_missing_directory() {
        let (dir, registry) = registry();
        registry.init(None).unwrap();
        let err = registry.link(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(
            downcast(&err),
            RegistryError::InvalidModulePath(_)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn module_names_are_sorted_and_filtered() {
        let (dir, registry) = registry();
        registry.init(Some("base")).unwrap();
        std::fs::write(registry.dir().join(SETTINGS_FILE), "").unwrap();
        std::fs::write(registry.dir().join("stray-file"), "").unwrap();
        for name in ["zeta", "alpha"] {
            let checkout = dir.path().join(name);
            std::fs::create_dir_all(&checkout).unwrap();
            registry.link(&checkout).unwrap();
        }
        assert_eq!(registry.module_names().unwrap(), vec!["alpha", "zeta"]);
        let modules = registry.modules().unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].name, "alpha");
    }

    #[cfg(unix)]
    #[test]
    fn dangling_entry_is_invalid() {
        let (dir, registry) = registry();
        registry.init(None).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), registry.dir().join("gone")).unwrap();
        let err = registry.resolve("gone").unwrap_err();
        assert!(matches!(
            downcast(&err),
            RegistryError::InvalidModulePath(_)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn unlink_removes_link_but_not_checkout() {
        let (dir, registry) = registry();
        registry.init(None).unwrap();
        let checkout = dir.path().join("shop");
        std::fs::create_dir_all(&checkout).unwrap();
        registry.link(&checkout).unwrap();

        assert!(registry.unlink("shop").unwrap());
        assert!(checkout.is_dir());
        assert!(registry.resolve("shop").is_err());
    }

    #[test]
    fn unlink_leaves_directory_entries() {
        let (_dir, registry) = registry();
        registry.init(None).unwrap();
        std::fs::create_dir(registry.dir().join("cloned")).unwrap();
        assert!(!registry.unlink("cloned").unwrap());
        assert!(registry.dir().join("cloned").is_dir());
    }
}
