//! Idempotent filesystem primitives (check + apply pattern).
pub mod helpers;
pub mod hook;
pub mod link;
pub mod remove;

use anyhow::Result;

/// Something a deploy can describe and bring about.
///
/// Hooks and removals only implement this trait. Resources that can inspect
/// what is on disk also implement [`Resource`].
pub trait Applicable {
    /// Human-readable description used in log lines.
    fn description(&self) -> String;

    /// Apply the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the filesystem or a spawned process fails.
    fn apply(&self) -> Result<ResourceChange>;
}

/// What currently occupies a resource's path.
///
/// # Examples
///
/// ```
/// use modlink_cli::resources::ResourceState;
///
/// let wrong = ResourceState::Incorrect { current: "points to /other".into() };
/// assert_ne!(wrong, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing is there.
    Missing,
    /// The desired entry is there.
    Correct,
    /// A link is there but points elsewhere.
    Incorrect {
        /// Where it points.
        current: String,
    },
    /// A real file or directory is there.
    Invalid {
        /// What was found.
        reason: String,
    },
}

/// Outcome of applying or removing a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// The filesystem was changed.
    Applied,
    /// Nothing had to change.
    AlreadyCorrect,
    /// Nothing was changed for the given reason (e.g. a hook exited non-zero).
    Skipped {
        /// Why.
        reason: String,
    },
}

/// A resource that can report its on-disk state and undo itself.
pub trait Resource: Applicable {
    /// Inspect the resource's path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be inspected.
    fn current_state(&self) -> Result<ResourceState>;

    /// Undo a previous [`Applicable::apply`].
    ///
    /// # Errors
    ///
    /// Returns an error if the entry exists but cannot be removed.
    fn remove(&self) -> Result<ResourceChange>;
}
