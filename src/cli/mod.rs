//! The blockconf command-line interface.
//!
//! Each subcommand reads one document, runs part of the pipeline on it, and
//! prints the result. Failures are rendered as `miette` reports with the
//! offending source excerpt, and the process exits with status 1.

use std::io::{IsTerminal, Read};
use std::path::Path;
use std::{fs, io, process};

use clap::Parser;
use miette::{IntoDiagnostic, WrapErr};
use tracing_subscriber::EnvFilter;

use crate::cli::args::{BlockconfArgs, Command, Format};
use crate::errors::Error;
use crate::options::Options;
use crate::value::Dynamic;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = BlockconfArgs::parse();
    init_tracing(args.verbose);
    let options = Options::default().with_max_depth(args.max_depth);

    let result = match &args.command {
        Command::Tokens { file } => handle_tokens(file),
        Command::Ast { file, json } => handle_ast(file, *json, &options),
        Command::Decode { file, format } => handle_decode(file, *format, &options),
        Command::Check { file } => handle_check(file, &options),
    };

    if let Err(report) = result {
        eprintln!("{:?}", report);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "blockconf=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init();
}

// ============================================================================
// INPUT
// ============================================================================

/// A loaded document: its display name and raw bytes.
struct Input {
    name: String,
    bytes: Vec<u8>,
}

impl Input {
    fn load(path: &Path) -> miette::Result<Self> {
        if path == Path::new("-") {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .into_diagnostic()
                .wrap_err("failed to read standard input")?;
            return Ok(Self {
                name: "<stdin>".to_string(),
                bytes,
            });
        }
        let bytes = fs::read(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        Ok(Self {
            name: path.display().to_string(),
            bytes,
        })
    }

    fn text(&self) -> miette::Result<&str> {
        std::str::from_utf8(&self.bytes).map_err(|e| {
            Error::InvalidUtf8 {
                valid_up_to: e.valid_up_to(),
            }
            .into()
        })
    }

    /// Turn a library error into a report annotated with this input.
    fn report(&self, error: impl Into<Error>) -> miette::Report {
        let error: Error = error.into();
        error.report(&self.name, String::from_utf8_lossy(&self.bytes).into_owned())
    }
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn handle_tokens(path: &Path) -> miette::Result<()> {
    let input = Input::load(path)?;
    let tokens = crate::syntax::tokenize(input.text()?);
    output::print_tokens(&tokens).into_diagnostic()
}

fn handle_ast(path: &Path, json: bool, options: &Options) -> miette::Result<()> {
    let input = Input::load(path)?;
    let root = crate::syntax::parse_with(input.text()?, options).map_err(|e| input.report(e))?;
    if json {
        output::print_serialized(&root, Format::Json).map_err(|e| miette::miette!("{e}"))
    } else {
        output::print_text(&root.to_string()).into_diagnostic()
    }
}

fn handle_decode(path: &Path, format: Format, options: &Options) -> miette::Result<()> {
    let input = Input::load(path)?;
    let value = decode_dynamic(&input, options)?;
    output::print_serialized(&value, format).map_err(|e| miette::miette!("{e}"))
}

fn handle_check(path: &Path, options: &Options) -> miette::Result<()> {
    let input = Input::load(path)?;
    decode_dynamic(&input, options)?;
    tracing::info!(file = %input.name, "document is valid");
    Ok(())
}

fn decode_dynamic(input: &Input, options: &Options) -> miette::Result<Dynamic> {
    let mut value = Dynamic::map();
    crate::unmarshal_with(&input.bytes, &mut value, options).map_err(|e| input.report(e))?;
    Ok(value)
}
