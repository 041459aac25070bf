use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point for the module linker.
#[derive(Parser, Debug)]
#[command(
    name = "modlink",
    about = "Deploy module checkouts into a project tree through symlinks",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Run as if started in this project directory
    #[arg(short = 'C', long, global = true)]
    pub project: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the `.modman` registry in the project directory
    Init(InitOpts),
    /// Register a module checkout and deploy it
    Link(LinkOpts),
    /// Deploy one registered module
    Deploy(DeployOpts),
    /// Deploy every registered module in name order
    DeployAll(ForceOpts),
    /// Redeploy every module, clearing conflicts
    Repair,
    /// Remove a module's links and its registry entry
    Remove(DeployOpts),
    /// Remove dead symlinks below the project directory
    Clean,
    /// Print a shell completion script
    Completions(CompletionsOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Short name used for the log file of this command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::Link(_) => "link",
            Self::Deploy(_) => "deploy",
            Self::DeployAll(_) => "deploy-all",
            Self::Repair => "repair",
            Self::Remove(_) => "remove",
            Self::Clean => "clean",
            Self::Completions(_) => "completions",
            Self::Version => "version",
        }
    }
}

/// Options for the `init` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InitOpts {
    /// Deploy targets below this directory instead of the project root
    pub basedir: Option<String>,
}

/// Options carrying only the `--force` switch.
#[derive(Parser, Debug, Clone)]
pub struct ForceOpts {
    /// Delete whatever blocks a link target
    #[arg(short, long)]
    pub force: bool,
}

/// Options for the `link` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct LinkOpts {
    /// Module checkout directory, relative to the project directory
    pub path: PathBuf,

    #[command(flatten)]
    pub force: ForceOpts,
}

/// Options for the `deploy` and `remove` subcommands.
#[derive(Parser, Debug, Clone)]
pub struct DeployOpts {
    /// Registered module name
    pub module: String,

    #[command(flatten)]
    pub force: ForceOpts,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Target shell
    pub shell: clap_complete::Shell,
}
