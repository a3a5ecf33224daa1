//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `build`: Write one translated copy of every script and page per catalog
//! - `extract`: Collect messages into the `.pot` template
//! - `merge`: Refresh every `.po` catalog from the template
//! - `init`: Initialize poglot configuration file
//! - `serve`: Start MCP server for AI integration

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::Overrides;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Build(cmd)) => cmd.args.common.verbose,
            Some(Command::Extract(cmd)) => cmd.args.common.verbose,
            Some(Command::Merge(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | Some(Command::Serve) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root; the config file is searched from here upwards
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Source root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Catalog directory (overrides config file)
    #[arg(long)]
    pub po_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            source_root: self.source_root.clone(),
            po_root: self.po_root.clone(),
            out_dir: None,
        }
    }
}

#[derive(Debug, Parser)]
pub struct BuildArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output directory (overrides config file)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct BuildCommand {
    #[command(flatten)]
    pub args: BuildArgs,
}

#[derive(Debug, Parser)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub args: ExtractArgs,
}

#[derive(Debug, Parser)]
pub struct MergeArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct MergeCommand {
    #[command(flatten)]
    pub args: MergeArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Translate scripts and pages into one copy per catalog
    Build(BuildCommand),
    /// Extract translatable strings into the .pot template
    Extract(ExtractCommand),
    /// Merge the .pot template into every .po catalog
    Merge(MergeCommand),
    /// Initialize a new .poglotrc.json configuration file
    Init,
    /// Start MCP server for AI coding agents
    Serve,
}
