//! Command-line interface definitions.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the dotfile link manager.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiler",
    about = "Move dotfiles into a tracked directory and link them back",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Home directory holding the dotfiles (defaults to $HOME)
    #[arg(long, env = "HOME", global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a dotfiles directory and point ~/.dotfiles at it
    Init(InitOpts),
    /// Move dotfiles into the dotfiles directory and link them back
    #[command(visible_alias = "add")]
    Manage(ManageOpts),
    /// Move managed dotfiles back into the home directory
    #[command(visible_alias = "restore")]
    Unmanage(UnmanageOpts),
    /// Link every entry of the dotfiles directory into the home directory
    Update(UpdateOpts),
    /// Show where the dotfiles directory is and what it manages
    Status,
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file of this command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::Manage(_) => "manage",
            Self::Unmanage(_) => "unmanage",
            Self::Update(_) => "update",
            Self::Status => "status",
            Self::Version => "version",
        }
    }
}

/// Options for the `init` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InitOpts {
    /// Directory to create for the dotfiles
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,
}

/// Options for the `manage` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ManageOpts {
    /// Dotfiles to manage
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

/// Options for the `unmanage` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct UnmanageOpts {
    /// Managed dotfiles (or directories containing them) to restore
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

/// Options for the `update` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct UpdateOpts {
    /// Replace existing regular files in the home directory
    #[arg(long)]
    pub overwrite: bool,
}
