//! Command: print a shell completion script.
use anyhow::Result;
use clap::CommandFactory;
use std::io::Write;

use crate::cli::{Cli, CompletionsOpts};

/// Write the completion script for the requested shell to `out`.
///
/// # Errors
///
/// Returns an error if `out` cannot be flushed.
pub fn run(opts: &CompletionsOpts, out: &mut impl Write) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(opts.shell, &mut cmd, name, out);
    out.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap_complete::Shell;

    #[test]
    fn bash_script_mentions_subcommands() {
        let mut out = Vec::new();
        run(&CompletionsOpts { shell: Shell::Bash }, &mut out).unwrap();
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("modlink"));
        assert!(script.contains("deploy-all"));
        assert!(script.contains("--project"));
    }
}
