//! User-facing output for the CLI.
//!
//! Everything printed to stdout goes through here so the commands share one
//! format: colored token listings, canonical source, and serialized values.

use std::io::{self, IsTerminal, Write};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::cli::args::Format;
use crate::syntax::{Token, TokenKind};

// ============================================================================
// TOKENS
// ============================================================================

/// One line per token: position, kind, then the token text.
pub fn print_tokens(tokens: &[Token]) -> io::Result<()> {
    let choice = if io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    for token in tokens {
        write!(stdout, "{:<8}", token.start.to_string())?;
        stdout.set_color(&kind_color(token.kind))?;
        write!(stdout, "{:<10}", format!("{:?}", token.kind))?;
        stdout.reset()?;
        writeln!(stdout, "{:?}", token.text)?;
    }
    Ok(())
}

fn kind_color(kind: TokenKind) -> ColorSpec {
    let mut color = ColorSpec::new();
    match kind {
        TokenKind::Invalid => color.set_fg(Some(Color::Red)).set_bold(true),
        TokenKind::Comment => color.set_fg(Some(Color::Black)).set_intense(true),
        TokenKind::Ident => color.set_fg(Some(Color::Cyan)),
        TokenKind::Number | TokenKind::String => color.set_fg(Some(Color::Green)),
        _ => color.set_fg(Some(Color::Yellow)),
    };
    color
}

// ============================================================================
// VALUES
// ============================================================================

/// Serialize `value` to stdout in the requested format.
pub fn print_serialized<T: Serialize>(value: &T, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let rendered = match format {
        Format::Json => {
            let mut json = serde_json::to_string_pretty(value)?;
            json.push('\n');
            json
        }
        Format::Yaml => serde_yaml::to_string(value)?,
    };
    io::stdout().write_all(rendered.as_bytes())?;
    Ok(())
}

/// Write already-rendered text verbatim.
pub fn print_text(text: &str) -> io::Result<()> {
    io::stdout().write_all(text.as_bytes())
}
