//! Domain-specific error types for the module linker.
//!
//! Internal modules return typed errors (e.g., [`ManifestError`],
//! [`RegistryError`]) while command handlers at the CLI boundary convert them
//! to [`anyhow::Error`] via the standard `?` operator.  Callers that need to
//! branch on a failure kind can `downcast_ref` the `anyhow::Error`.
//!
//! # Error hierarchy
//!
//! ```text
//! ModlinkError
//! ├── Manifest(ManifestError)   manifest lookup, imports, I/O
//! ├── Registry(RegistryError)   .modman bookkeeping, module resolution
//! ├── Deploy(DeployError)       conflicts, stale manifest entries
//! └── Config(ConfigError)       settings.toml loading
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the module linker.
#[derive(Error, Debug)]
pub enum ModlinkError {
    /// Manifest could not be read or resolved.
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Module registry lookup or update failed.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Deployment was refused or could not complete.
    #[error("Deploy error: {0}")]
    Deploy(#[from] DeployError),

    /// Settings file could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that arise while reading and resolving a manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The module directory has no manifest file.
    #[error("no manifest file found at {}", .path.display())]
    NotFound {
        /// Path where the manifest was expected.
        path: PathBuf,
    },

    /// An `@import` directive points at a directory that cannot be resolved.
    #[error("import path could not be resolved: {} ({reason})", .path.display())]
    Import {
        /// The unresolved import path (module root joined with the argument).
        path: PathBuf,
        /// Why resolution failed.
        reason: String,
    },

    /// The manifest file exists but could not be read.
    #[error("IO error reading manifest {}: {source}", .path.display())]
    Io {
        /// Path to the manifest file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from the `.modman` registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registry directory does not exist.
    #[error("no registry found at {}; run `modlink init` first", .path.display())]
    NotInitialized {
        /// Expected registry directory.
        path: PathBuf,
    },

    /// No registry entry exists for the requested module.
    #[error("{0} is not linked, please link it first")]
    NotLinked(String),

    /// A registry entry for the module already exists.
    #[error("{0} is already linked")]
    AlreadyLinked(String),

    /// The path given to `link` is not a usable module directory.
    #[error("invalid module path: {}", .0.display())]
    InvalidModulePath(PathBuf),
}

/// Errors that abort a deployment.
#[derive(Error, Debug)]
pub enum DeployError {
    /// Existing filesystem state blocks the deployment and `--force` was not given.
    #[error("conflicts detected:\n{report}use --force to remove them")]
    Conflict {
        /// One line per conflicting path, in detection order.
        report: String,
    },

    /// A rule refers to a source that does not exist under the module root.
    #[error("can not link to non-existing file {}", .0.display())]
    MissingSource(PathBuf),
}

/// Errors that arise from loading `settings.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file contains invalid TOML or unknown keys.
    #[error("invalid settings in {file}: {message}")]
    InvalidSyntax {
        /// Settings file path.
        file: String,
        /// Parser message.
        message: String,
    },

    /// An I/O error occurred while reading the settings file.
    #[error("IO error reading settings file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
