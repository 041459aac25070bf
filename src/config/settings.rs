//! Optional per-project settings read from `.modman/settings.toml`.
//!
//! ```toml
//! [hooks]
//! enabled = true
//! shell = "bash"
//!
//! [clean]
//! exclude = [".git", "node_modules"]
//! ```
use serde::Deserialize;
use std::path::Path;

use super::toml_loader::load_config;
use crate::error::ConfigError;
use crate::platform::Platform;

/// File name of the settings file inside the registry directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// All project settings. Every field has a default, so an absent file is
/// equivalent to an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// `[hooks]` table.
    pub hooks: HookSettings,
    /// `[clean]` table.
    pub clean: CleanSettings,
}

/// Controls how `@shell` hooks run after a deploy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HookSettings {
    /// Run hooks at all.
    pub enabled: bool,
    /// Shell program invoked as `<shell> -c <command>`. Falls back to the
    /// platform shell when unset.
    pub shell: Option<String>,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            shell: None,
        }
    }
}

impl HookSettings {
    /// Program and flag used to run a hook command string on `platform`.
    #[must_use]
    pub fn shell_command(&self, platform: Platform) -> (String, &'static str) {
        match &self.shell {
            Some(shell) => (shell.clone(), "-c"),
            None => {
                let (program, flag) = platform.default_shell();
                (program.to_string(), flag)
            }
        }
    }
}

/// Controls the dead-link sweep.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanSettings {
    /// Directory names never descended into.
    pub exclude: Vec<String>,
}

impl Default for CleanSettings {
    fn default() -> Self {
        Self {
            exclude: vec![".git".to_string()],
        }
    }
}

impl Settings {
    /// Load `settings.toml` from `registry_dir`, falling back to defaults when
    /// the file (or the registry itself) does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or contains
    /// invalid TOML or unknown keys.
    pub fn load(registry_dir: &Path) -> Result<Self, ConfigError> {
        load_config(&registry_dir.join(SETTINGS_FILE))
    }
}
