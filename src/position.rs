//! Source positions.
//!
//! Every token, AST node and error carries a [`Position`] describing where the
//! construct started. Positions are diagnostic metadata only: AST equality
//! ignores them.

use serde::Serialize;
use std::fmt;

/// A point in the source text.
///
/// `line` and `column` are 1-based and count characters (not bytes);
/// `offset` is the 0-based byte offset into the input.
///
/// # Examples
///
/// ```rust
/// use blockconf::Position;
/// let pos = Position::new(3, 7, 42);
/// assert_eq!(pos.to_string(), "3:7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// The position of the first character of any input.
    pub const fn start() -> Self {
        Self::new(1, 1, 0)
    }

    /// Byte span from this position up to `end`, for diagnostics.
    pub fn span_to(&self, end: Position) -> miette::SourceSpan {
        let len = end.offset.saturating_sub(self.offset);
        miette::SourceSpan::new(self.offset.into(), len)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
