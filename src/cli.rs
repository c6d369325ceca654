//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folio markdown corpus indexer CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: folio.toml)
    #[arg(short = 'C', long, default_value = "folio.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared corpus arguments for Build and Check commands
#[derive(clap::Args, Debug, Clone)]
pub struct CorpusArgs {
    /// Input directory of markdown posts (overrides [content.dir])
    pub dir: Option<PathBuf>,

    /// Treat recorded per-file failures as fatal
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub strict: Option<bool>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the corpus index and write it as JSON
    Build {
        #[command(flatten)]
        corpus_args: CorpusArgs,

        /// Output path for the JSON index (overrides [index.output])
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Pretty-print the JSON index
        #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        pretty: Option<bool>,
    },

    /// Parse-only validation pass; reports failures, writes nothing
    Check {
        #[command(flatten)]
        corpus_args: CorpusArgs,
    },
}

impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }

    pub const fn is_check(&self) -> bool {
        matches!(self.command, Commands::Check { .. })
    }

    /// The corpus arguments shared by every subcommand.
    pub const fn corpus_args(&self) -> &CorpusArgs {
        match &self.command {
            Commands::Build { corpus_args, .. } | Commands::Check { corpus_args } => corpus_args,
        }
    }
}
