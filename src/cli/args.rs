//! Command-line arguments and subcommands for the blockconf CLI.
//!
//! Uses `clap` with its "derive" feature; every subcommand takes one input,
//! a file path or `-` for standard input.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "blockconf",
    version,
    about = "Inspect, validate and convert blockconf configuration files."
)]
pub struct BlockconfArgs {
    /// Emit debug logs on stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Maximum nesting depth of blocks and lists.
    #[arg(long, global = true, default_value_t = crate::options::DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the token stream, one token per line.
    Tokens {
        /// Input file, or `-` for stdin.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Print the AST, canonically formatted or as JSON.
    Ast {
        /// Input file, or `-` for stdin.
        #[arg(required = true)]
        file: PathBuf,
        /// Print the tree as JSON instead of canonical source.
        #[arg(long)]
        json: bool,
    },
    /// Decode into an open value and print it as JSON or YAML.
    Decode {
        /// Input file, or `-` for stdin.
        #[arg(required = true)]
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Parse and decode, reporting only errors.
    Check {
        /// Input file, or `-` for stdin.
        #[arg(required = true)]
        file: PathBuf,
    },
}

/// Output formats for `decode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Yaml,
}
