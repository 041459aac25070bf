//! Project context and settings.
pub mod project;
pub mod settings;
mod toml_loader;

pub use project::{BASEDIR_FILE, Project, REGISTRY_DIR};
pub use settings::{CleanSettings, HookSettings, SETTINGS_FILE, Settings};
