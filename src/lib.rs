//! Manifest-driven module linker.
//!
//! Deploys external module checkouts into a host project as symlinks. Each
//! module carries a `modman` manifest of `source target` rules, optional
//! `@import` directives pulling in nested manifests, and `@shell` hooks run
//! after linking. Modules are registered in the project's `.modman/`
//! directory.
//!
//! The public API is organised into four layers:
//!
//! - **[`manifest`]** parses `modman` files into link rules and hooks
//! - **[`resources`]** holds idempotent `check + apply` primitives (links, removals, hooks)
//! - **[`deploy`]** runs the parse, check, apply and hook phases per module
//! - **[`commands`]** orchestrates the top-level subcommands
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod deploy;
pub mod error;
pub mod exec;
pub mod logging;
pub mod manifest;
pub mod platform;
pub mod registry;
pub mod resources;
