use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI surface definition. The interactive grid is the default entry point;
/// the image editor runs as a one-shot subcommand.
#[derive(Parser, Debug)]
#[command(
    name = "checklist",
    about = "Habit checklist grid for your terminal",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Optional subcommand; defaults to launching the TUI when absent.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Launch the interactive checklist grid (press q or Esc to exit).
    Tui,
    /// Print version and exit.
    Version,
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Edit an image with the configured AI provider.
    Edit {
        /// Path to the source image (png or jpeg, max 5 MiB).
        image: PathBuf,
        /// Instruction describing the edit.
        prompt: Vec<String>,
        /// Where to write the edited image; defaults next to the source.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create a default config file if one does not exist.
    Init,
}
