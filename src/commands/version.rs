//! Command: print version information.
use anyhow::Result;
use std::io::Write;

/// Version string baked in at build time, falling back to the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("MODLINK_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the modlink version to `out`.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn run(out: &mut impl Write) -> Result<()> {
    writeln!(out, "modlink {}", version())?;
    Ok(())
}
