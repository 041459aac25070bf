//! Classification of existing filesystem state against desired links.
use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::DeployError;
use crate::logging::Log;
use crate::resources::helpers::fs::entry_exists;
use crate::resources::link::points_to;
use crate::resources::remove::RemoveResource;
use crate::resources::{Applicable, ResourceChange};

/// What occupies a conflicting path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKind {
    /// A real directory.
    Directory,
    /// A regular file.
    File,
    /// A symlink that does not resolve to the rule's source. Holds where it
    /// points, if readable.
    MismatchedLink(Option<PathBuf>),
    /// Two rules with different sources want the same target.
    DuplicateTarget,
    /// The target lies inside or above the target of an earlier rule, which
    /// is held here.
    NestedTarget(PathBuf),
}

impl ConflictKind {
    /// `true` if the conflict is an entry on disk that `--force` deletes,
    /// `false` if it is a clash between the manifest's own rules.
    #[must_use]
    pub const fn is_on_disk(&self) -> bool {
        !matches!(self, Self::DuplicateTarget | Self::NestedTarget(_))
    }
}

/// One conflicting path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictRecord {
    /// Absolute path of the blocking entry.
    pub path: PathBuf,
    /// What was found there.
    pub kind: ConflictKind,
}

impl fmt::Display for ConflictRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        match &self.kind {
            ConflictKind::Directory => write!(f, "{path} is an existing directory."),
            ConflictKind::File => write!(f, "{path} is an existing file."),
            ConflictKind::MismatchedLink(Some(dest)) => {
                write!(f, "{path} is an existing link pointing to {}.", dest.display())
            }
            ConflictKind::MismatchedLink(None) => {
                write!(f, "{path} is an existing link pointing nowhere.")
            }
            ConflictKind::DuplicateTarget => {
                write!(f, "{path} is the target of more than one source.")
            }
            ConflictKind::NestedTarget(other) => {
                write!(f, "{path} overlaps the target {} of an earlier rule.", other.display())
            }
        }
    }
}

/// Collects conflicts for one deploy, in detection order.
///
/// The first classification recorded for a path wins. When rules clash with
/// each other the earliest rule keeps its target and later ones are
/// superseded.
#[derive(Debug, Default)]
pub struct ConflictDetector {
    records: Vec<ConflictRecord>,
    claimed: Vec<(PathBuf, PathBuf)>,
    superseded: Vec<(PathBuf, PathBuf)>,
}

impl ConflictDetector {
    /// Create an empty detector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify whatever currently sits at `target`, which should become a
    /// link to `source`.
    pub fn inspect(&mut self, target: &Path, source: &Path) {
        if let Some((_, previous)) = self.claimed.iter().find(|(t, _)| t == target) {
            if previous != source {
                self.supersede(target, source, ConflictKind::DuplicateTarget);
            }
            return;
        }
        if let Some(other) = self.overlapping_claim(target) {
            self.supersede(target, source, ConflictKind::NestedTarget(other));
            return;
        }
        self.claimed.push((target.to_path_buf(), source.to_path_buf()));

        if let Ok(meta) = target.symlink_metadata() {
            if meta.file_type().is_symlink() {
                if !points_to(target, source) {
                    self.record(target, ConflictKind::MismatchedLink(link_destination(target)));
                }
            } else if meta.is_dir() {
                self.record(target, ConflictKind::Directory);
            } else {
                self.record(target, ConflictKind::File);
            }
            return;
        }

        if let Some(parent) = target.parent()
            && !parent.is_dir()
            && let Some((blocker, kind)) = blocking_ancestor(parent)
        {
            self.record(&blocker, kind);
        }
    }

    /// `true` if the rule linking `target` to `source` lost to an earlier
    /// rule and must not be applied.
    #[must_use]
    pub fn is_superseded(&self, target: &Path, source: &Path) -> bool {
        self.superseded
            .iter()
            .any(|(t, s)| t == target && s == source)
    }

    /// `true` if anything was recorded.
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        !self.records.is_empty()
    }

    /// Recorded conflicts in detection order.
    #[must_use]
    pub fn records(&self) -> &[ConflictRecord] {
        &self.records
    }

    /// Human-readable report, one line per conflict.
    #[must_use]
    pub fn describe(&self) -> String {
        self.records
            .iter()
            .map(|r| format!("{r}\n"))
            .collect()
    }

    /// Clear every conflicting entry on disk when `force` is set; otherwise
    /// refuse. Clashes between rules are only reported here, the superseded
    /// rules are skipped by the caller.
    ///
    /// Returns the paths that were removed.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::Conflict`] without touching the filesystem
    /// when conflicts exist and `force` is `false`, or an I/O error if a
    /// path cannot be removed.
    pub fn resolve(&self, force: bool, log: &dyn Log) -> Result<Vec<PathBuf>> {
        if !self.has_conflicts() {
            return Ok(Vec::new());
        }
        if !force {
            return Err(DeployError::Conflict {
                report: self.describe(),
            }
            .into());
        }

        log.warn(&format!("conflicts detected:\n{}", self.describe().trim_end()));
        let on_disk: Vec<&ConflictRecord> =
            self.records.iter().filter(|r| r.kind.is_on_disk()).collect();
        if !on_disk.is_empty() {
            log.info("Doing cleanup ...");
        }
        let mut cleared = Vec::new();
        for record in on_disk {
            let resource = RemoveResource::new(record.path.clone());
            if resource.apply()? == ResourceChange::Applied {
                log.debug(&resource.description());
                cleared.push(record.path.clone());
            }
        }
        Ok(cleared)
    }

    fn supersede(&mut self, target: &Path, source: &Path, kind: ConflictKind) {
        self.superseded
            .push((target.to_path_buf(), source.to_path_buf()));
        self.record(target, kind);
    }

    /// An earlier claimed target that contains `target` or lies below it.
    fn overlapping_claim(&self, target: &Path) -> Option<PathBuf> {
        self.claimed
            .iter()
            .map(|(claimed, _)| claimed)
            .find(|claimed| target.starts_with(claimed) || claimed.starts_with(target))
            .cloned()
    }

    fn record(&mut self, path: &Path, kind: ConflictKind) {
        if self.records.iter().any(|r| r.path == path) {
            return;
        }
        self.records.push(ConflictRecord {
            path: path.to_path_buf(),
            kind,
        });
    }
}

/// Where the link at `path` points: the resolved path when it resolves,
/// otherwise its raw target.
fn link_destination(path: &Path) -> Option<PathBuf> {
    dunce::canonicalize(path)
        .or_else(|_| std::fs::read_link(path))
        .ok()
}

/// Walk up from a missing `dir` to the nearest existing ancestor and report
/// it if it is not a directory.
fn blocking_ancestor(dir: &Path) -> Option<(PathBuf, ConflictKind)> {
    let existing = dir.ancestors().find(|p| entry_exists(p))?;
    if existing.is_dir() {
        return None;
    }
    let meta = existing.symlink_metadata().ok()?;
    let kind = if meta.file_type().is_symlink() {
        ConflictKind::MismatchedLink(link_destination(existing))
    } else {
        ConflictKind::File
    };
    Some((existing.to_path_buf(), kind))
}
