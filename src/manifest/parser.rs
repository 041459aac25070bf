//! Manifest parsing with wildcard expansion and recursive imports.
use std::path::{Path, PathBuf};

use super::line::Line;
use super::paths::{normalize, normalize_lexical, relative_to};
use super::{LinkRule, MANIFEST_FILE, Manifest, ShellHook, wildcard};
use crate::error::ManifestError;
use crate::logging::Log;

/// Reads a module's manifest into a [`Manifest`].
///
/// Targets of imported rules are re-expressed against `project_root`, so the
/// parser must know the project it is parsing for.
#[derive(Debug)]
pub struct ManifestParser<'a> {
    project_root: PathBuf,
    log: &'a dyn Log,
}

impl<'a> ManifestParser<'a> {
    /// Create a parser for modules deployed into `project_root`.
    #[must_use]
    pub fn new(project_root: &Path, log: &'a dyn Log) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            log,
        }
    }

    /// Parse the manifest at `module_root`.
    ///
    /// # Errors
    ///
    /// - [`ManifestError::NotFound`] if `module_root` has no manifest file
    /// - [`ManifestError::Import`] if an `@import` cannot be resolved or forms
    ///   a cycle
    /// - [`ManifestError::Io`] if a manifest cannot be read
    pub fn parse(&self, module_root: &Path) -> Result<Manifest, ManifestError> {
        let root = dunce::canonicalize(module_root).map_err(|_| ManifestError::NotFound {
            path: module_root.join(MANIFEST_FILE),
        })?;
        let mut stack = Vec::new();
        self.parse_dir(&root, &mut stack)
    }

    fn parse_dir(
        &self,
        root: &Path,
        stack: &mut Vec<PathBuf>,
    ) -> Result<Manifest, ManifestError> {
        let file = root.join(MANIFEST_FILE);
        if !file.is_file() {
            return Err(ManifestError::NotFound { path: file });
        }
        let content = std::fs::read_to_string(&file).map_err(|source| ManifestError::Io {
            path: file.clone(),
            source,
        })?;

        stack.push(root.to_path_buf());
        let mut manifest = Manifest::new(root);
        let mut imported = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            match Line::parse(raw) {
                Line::Blank | Line::Comment => {}
                Line::Unknown(text) => {
                    self.log.warn(&format!(
                        "Do not understand: {text} ({}:{})",
                        file.display(),
                        idx + 1
                    ));
                }
                Line::Shell(command) => manifest.hooks.push(ShellHook::new(command)),
                Line::Import(dir) => imported.push(self.import(root, &dir, stack)?),
                Line::Rule { source, target } => {
                    if source.contains('*') {
                        for (source, target) in
                            wildcard::expand(root, &source, target.as_deref(), self.log)
                        {
                            self.push_rule(&mut manifest, LinkRule::new(&source, &target));
                        }
                    } else {
                        let target = target.as_deref().unwrap_or(&source);
                        self.push_rule(&mut manifest, LinkRule::new(&source, target));
                    }
                }
            }
        }
        stack.pop();

        for nested in imported {
            manifest.rules.extend(nested.rules);
            manifest.hooks.extend(nested.hooks);
        }
        Ok(manifest)
    }

    /// Parse the manifest of `dir` (relative to `root`) and rewrite its rules
    /// so they are relative to `root` and the project root.
    fn import(
        &self,
        root: &Path,
        dir: &str,
        stack: &mut Vec<PathBuf>,
    ) -> Result<Manifest, ManifestError> {
        let joined = root.join(dir);
        let import_dir = dunce::canonicalize(&joined).map_err(|e| ManifestError::Import {
            path: joined.clone(),
            reason: e.to_string(),
        })?;
        if !import_dir.is_dir() {
            return Err(ManifestError::Import {
                path: joined,
                reason: "not a directory".to_string(),
            });
        }
        if stack.contains(&import_dir) {
            return Err(ManifestError::Import {
                path: joined,
                reason: "import cycle".to_string(),
            });
        }

        self.log
            .debug(&format!("importing manifest from {}", import_dir.display()));
        let nested = self.parse_dir(&import_dir, stack)?;

        let mut manifest = Manifest::new(root);
        manifest.hooks = nested.hooks;
        for rule in nested.rules {
            let rewritten = LinkRule {
                source: rewrite_source(root, &import_dir, &rule.source),
                target: self.rewrite_target(&rule.target),
            };
            self.push_rule(&mut manifest, rewritten);
        }
        Ok(manifest)
    }

    /// Re-express an imported target against the project root.
    fn rewrite_target(&self, target: &str) -> String {
        let resolved = normalize_lexical(&self.project_root.join(target));
        relative_to(&resolved, &self.project_root)
            .unwrap_or_else(|| resolved.to_string_lossy().into_owned())
    }

    fn push_rule(&self, manifest: &mut Manifest, rule: LinkRule) {
        if rule.source.is_empty() || rule.target.is_empty() {
            self.log.debug(&format!(
                "skipping rule with empty path: '{}' -> '{}'",
                rule.source, rule.target
            ));
            return;
        }
        manifest.rules.push(rule);
    }
}

/// Re-express a source from an imported manifest relative to the importing
/// module's root.
///
/// Existing paths are canonicalized so `..` and symlinked directories
/// resolve the way the OS sees them. Missing paths are normalized lexically
/// so deploy can still report them. A path outside `root` stays absolute.
fn rewrite_source(root: &Path, import_dir: &Path, source: &str) -> String {
    let joined = import_dir.join(source);
    let resolved = dunce::canonicalize(&joined).unwrap_or_else(|_| normalize_lexical(&joined));
    relative_to(&resolved, root).unwrap_or_else(|| resolved.to_string_lossy().into_owned())
}
