//! Text to AST: the lexer, the token model and the parser.

pub mod lexer;
pub mod parser;
pub mod token;

use crate::ast::Block;
use crate::errors::SyntaxError;
use crate::options::Options;

pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Token, TokenKind};

/// Parse a document with default [`Options`].
///
/// # Examples
///
/// ```rust
/// let root = blockconf::parse("name = \"hello\"\ncount = 42").unwrap();
/// assert_eq!(root.entries.len(), 2);
/// assert_eq!(root.entries[1].value.as_number(), Some(42.0));
/// ```
pub fn parse(text: &str) -> Result<Block, SyntaxError> {
    parse_with(text, &Options::default())
}

pub fn parse_with(text: &str, options: &Options) -> Result<Block, SyntaxError> {
    let block = Parser::new(text, *options).parse_document()?;
    tracing::debug!(entries = block.entries.len(), bytes = text.len(), "parsed document");
    Ok(block)
}

/// Every token of `text`, comments and newlines included, ending with EOF.
pub fn tokenize(text: &str) -> Vec<Token> {
    Lexer::new(text).collect()
}
