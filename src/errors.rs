//! blockconf error handling
//!
//! Two phases can fail: the parser reports a [`SyntaxError`] for the first
//! unexpected token, and the decoder reports a [`DecodeError`] when the tree
//! does not fit the destination. [`Error`] is what the top-level entry points
//! return. All of them are `miette` diagnostics; attach the source text with
//! [`Error::report`] to render an annotated excerpt.

use miette::{Diagnostic, LabeledSpan, NamedSource};
use std::fmt;
use thiserror::Error;

use crate::ast::ValueKind;
use crate::position::Position;
use crate::syntax::token::{Token, TokenKind};

// ============================================================================
// SYNTAX ERRORS
// ============================================================================

/// What the parser tripped over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    UnexpectedToken { expected: &'static str },
    InvalidToken,
    UnterminatedString,
    InvalidNumber,
    NestingTooDeep { limit: usize },
}

/// The first syntax error in a document. Parsing stops here; no partial tree
/// is returned.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    /// The offending token, with its position.
    pub found: Token,
}

impl SyntaxErrorKind {
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UnexpectedToken { .. } => "unexpected_token",
            Self::InvalidToken => "invalid_token",
            Self::UnterminatedString => "unterminated_string",
            Self::InvalidNumber => "invalid_number",
            Self::NestingTooDeep { .. } => "nesting_too_deep",
        }
    }
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, found: Token) -> Self {
        Self { kind, found }
    }

    pub fn position(&self) -> Position {
        self.found.start
    }

    fn primary_label(&self) -> String {
        match &self.kind {
            SyntaxErrorKind::UnexpectedToken { expected } => format!("expected {expected}"),
            SyntaxErrorKind::InvalidToken => "not valid here".into(),
            SyntaxErrorKind::UnterminatedString => "string starts here".into(),
            SyntaxErrorKind::InvalidNumber => "invalid number".into(),
            SyntaxErrorKind::NestingTooDeep { .. } => "too deeply nested".into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syntax error at {}: ", self.found.start)?;
        match &self.kind {
            SyntaxErrorKind::UnexpectedToken { expected } => {
                write!(f, "expected {}, found {}", expected, self.found)
            }
            SyntaxErrorKind::InvalidToken => write!(f, "invalid token '{}'", self.found.text),
            SyntaxErrorKind::UnterminatedString => write!(f, "unterminated string"),
            SyntaxErrorKind::InvalidNumber => write!(f, "invalid number '{}'", self.found.text),
            SyntaxErrorKind::NestingTooDeep { limit } => {
                write!(f, "nesting exceeds the limit of {limit} levels")
            }
        }
    }
}

impl std::error::Error for SyntaxError {}

impl Diagnostic for SyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!(
            "blockconf::syntax::{}",
            self.kind.code_suffix()
        )))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.kind {
            SyntaxErrorKind::UnterminatedString => "add a closing '\"'",
            SyntaxErrorKind::UnexpectedToken { .. } if self.found.is(TokenKind::Ident) => {
                "only 'true' and 'false' may appear unquoted as values"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_with_span(Some(self.primary_label()), self.found.span());
        Some(Box::new(std::iter::once(label)))
    }
}

// ============================================================================
// DECODE ERRORS
// ============================================================================

/// Why a value could not be bound to its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The record has no field with this name.
    UnknownField {
        name: String,
        known: Vec<&'static str>,
    },
    /// The field exists but is embedded in the record.
    UnsupportedField { name: String },
    /// The value's structure does not fit the destination. `repeated` is set
    /// when the cause is several entries sharing one name.
    ShapeMismatch { repeated: bool },
    /// A scalar could not be converted to the destination type.
    TypeMismatch { reason: Option<String> },
    /// A value variant with no decode rule.
    UnsupportedValueKind,
}

/// A failure to bind the AST onto the destination.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    /// Description of the destination type.
    pub destination: String,
    /// Kind of the offending AST node.
    pub found: ValueKind,
    /// Where the offending node starts.
    pub at: Position,
    /// Key path from the root, e.g. `server[1].port`.
    pub path: String,
}

impl DecodeErrorKind {
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UnknownField { .. } => "unknown_field",
            Self::UnsupportedField { .. } => "unsupported_field",
            Self::ShapeMismatch { .. } => "shape_mismatch",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::UnsupportedValueKind => "unsupported_value_kind",
        }
    }
}

impl DecodeError {
    pub fn position(&self) -> Position {
        self.at
    }

    fn primary_label(&self) -> String {
        match &self.kind {
            DecodeErrorKind::UnknownField { .. } => "unknown field".into(),
            DecodeErrorKind::UnsupportedField { .. } => "embedded field".into(),
            DecodeErrorKind::ShapeMismatch { repeated: true } => "repeated here".into(),
            DecodeErrorKind::ShapeMismatch { repeated: false } => {
                format!("{} does not fit {}", self.found, self.destination)
            }
            DecodeErrorKind::TypeMismatch { .. } => format!("expected {}", self.destination),
            DecodeErrorKind::UnsupportedValueKind => format!("{} cannot be decoded", self.found),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decode error at {}", self.at)?;
        if !self.path.is_empty() {
            write!(f, " ({})", self.path)?;
        }
        f.write_str(": ")?;
        match &self.kind {
            DecodeErrorKind::UnknownField { name, .. } => {
                write!(f, "{} has no field named '{}'", self.destination, name)
            }
            DecodeErrorKind::UnsupportedField { name } => write!(
                f,
                "field '{}' of {} is embedded and cannot be decoded directly",
                name, self.destination
            ),
            DecodeErrorKind::ShapeMismatch { repeated: true } => write!(
                f,
                "entry is repeated but {} holds a single value",
                self.destination
            ),
            DecodeErrorKind::ShapeMismatch { repeated: false } => {
                write!(f, "cannot decode {} into {}", self.found, self.destination)
            }
            DecodeErrorKind::TypeMismatch { reason } => {
                write!(f, "cannot assign {} to {}", self.found, self.destination)?;
                if let Some(reason) = reason {
                    write!(f, ": {reason}")?;
                }
                Ok(())
            }
            DecodeErrorKind::UnsupportedValueKind => {
                write!(f, "{} values have no decode rule", self.found)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl Diagnostic for DecodeError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!(
            "blockconf::decode::{}",
            self.kind.code_suffix()
        )))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.kind {
            DecodeErrorKind::UnknownField { known, .. } if !known.is_empty() => {
                Some(Box::new(format!("known fields: {}", known.join(", "))))
            }
            DecodeErrorKind::ShapeMismatch { repeated: true } => Some(Box::new(
                "declare the destination as a list to collect repeated entries",
            )),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new(Some(self.primary_label()), self.at.offset, 0);
        Some(Box::new(std::iter::once(label)))
    }
}

// ============================================================================
// TOP-LEVEL ERROR
// ============================================================================

/// Everything [`crate::unmarshal`] can fail with.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("input is not valid UTF-8 (first invalid byte at offset {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
}

/// Coarse classification, handy in tests and for exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Encoding,
    Syntax,
    Decode,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Syntax(_) => ErrorCategory::Syntax,
            Error::Decode(_) => ErrorCategory::Decode,
            Error::InvalidUtf8 { .. } => ErrorCategory::Encoding,
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Syntax(e) => Some(e.position()),
            Error::Decode(e) => Some(e.position()),
            Error::InvalidUtf8 { .. } => None,
        }
    }

    /// Attach the source text so the diagnostic renders an annotated excerpt
    /// with line numbers and a marker under the offending column.
    pub fn report(self, name: impl AsRef<str>, source: impl Into<String>) -> miette::Report {
        miette::Report::new(self).with_source_code(NamedSource::new(name, source.into()))
    }

    fn inner(&self) -> Option<&dyn Diagnostic> {
        match self {
            Error::Syntax(e) => Some(e),
            Error::Decode(e) => Some(e),
            Error::InvalidUtf8 { .. } => None,
        }
    }
}

impl Diagnostic for Error {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self.inner() {
            Some(inner) => inner.code(),
            None => Some(Box::new("blockconf::encoding::invalid_utf8")),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.inner().and_then(|inner| inner.help())
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.inner().and_then(|inner| inner.labels())
    }
}
