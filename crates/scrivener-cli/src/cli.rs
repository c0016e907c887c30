//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use scrivener_scorer::AcceptanceMode;
use std::path::PathBuf;

/// Scrivener - quality-gated proofreading for plain-text documents.
#[derive(Debug, Parser)]
#[command(name = "scrivener")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SCRIVENER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable text (default)
    Text,
    /// JSON
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Proofread a plain-text document
    Proofread(ProofreadArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the proofread command.
#[derive(Debug, Parser)]
pub struct ProofreadArgs {
    /// Document to proofread (paragraphs separated by blank lines)
    pub file: PathBuf,

    /// Acceptance mode, overriding the configured one
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Decide corrections without writing them back
    #[arg(long)]
    pub dry_run: bool,

    /// Write the JSON run report to this path
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Extra dictionary file with a [replacements] table
    #[arg(short, long)]
    pub dictionary: Option<PathBuf>,

    /// Skip the LLM source
    #[arg(long)]
    pub no_llm: bool,

    /// Skip the grammar checker source
    #[arg(long)]
    pub no_grammar: bool,

    /// Do not keep a .bak copy of the original file
    #[arg(long)]
    pub no_backup: bool,
}

/// Acceptance mode options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    /// Threshold plus confidence and safety requirements
    Conservative,
    /// Threshold only
    Permissive,
}

impl From<ModeArg> for AcceptanceMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Conservative => AcceptanceMode::Conservative,
            ModeArg::Permissive => AcceptanceMode::Permissive,
        }
    }
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,
}
