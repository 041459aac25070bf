//! Manifest model and parser.
//!
//! A manifest is a plain-text file named `modman` at a module's root. Each
//! line is a comment, a directive (`@import`, `@shell`) or a link rule
//! `<source> [target]`.
pub mod line;
mod parser;
pub mod paths;
mod wildcard;

use std::path::{Path, PathBuf};

pub use parser::ManifestParser;

/// File name of a module manifest.
pub const MANIFEST_FILE: &str = "modman";

/// A single source-to-target mapping.
///
/// Both paths are normalized and wildcard-free: `source` is relative to the
/// module root (or absolute when an import reached outside it), `target` is
/// relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkRule {
    /// Path of the file or directory inside the module.
    pub source: String,
    /// Path of the symlink inside the project.
    pub target: String,
}

impl LinkRule {
    /// Create a rule, normalizing both paths.
    #[must_use]
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: paths::normalize(source),
            target: paths::normalize(target),
        }
    }
}

/// A post-deploy shell command.
///
/// `$MODULE` and `$PROJECT` are kept literally until the hook runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellHook {
    /// Raw command text.
    pub command: String,
}

impl ShellHook {
    /// Wrap a raw command.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// Parsed manifest of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Canonical root the rules' sources are relative to.
    pub root: PathBuf,
    /// Link rules in deploy order.
    pub rules: Vec<LinkRule>,
    /// Hooks in execution order.
    pub hooks: Vec<ShellHook>,
}

impl Manifest {
    /// Create an empty manifest for `root`.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            rules: Vec::new(),
            hooks: Vec::new(),
        }
    }

    /// Absolute path of a rule's source.
    #[must_use]
    pub fn source_path(&self, rule: &LinkRule) -> PathBuf {
        self.root.join(&rule.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_rule_normalizes() {
        let rule = LinkRule::new("./lib/x/", "/js//x");
        assert_eq!(rule.source, "lib/x");
        assert_eq!(rule.target, "js/x");
    }

    #[cfg(unix)]
    #[test]
    fn source_path_joins_root() {
        let manifest = Manifest::new(Path::new("/mods/shop"));
        let rule = LinkRule::new("lib/x", "x");
        assert_eq!(manifest.source_path(&rule), PathBuf::from("/mods/shop/lib/x"));
    }

    #[cfg(unix)]
    #[test]
    fn absolute_source_is_kept() {
        let manifest = Manifest::new(Path::new("/mods/shop"));
        let rule = LinkRule {
            source: "/elsewhere/x".into(),
            target: "x".into(),
        };
        assert_eq!(manifest.source_path(&rule), PathBuf::from("/elsewhere/x"));
    }
}
