//! A small block-structured configuration language.
//!
//! Documents are lists of `name = value` assignments and `name { ... }`
//! blocks. Values are numbers, strings, booleans, lists, or blocks:
//!
//! ```text
//! // comments run to the end of the line
//! name = "api"
//! server {
//!   port = 8080
//!   tags = ["a", "b",]
//! }
//! server { port = 8081 }
//! ```
//!
//! The pipeline is [`tokenize`] (lexer) then [`parse`] (recursive descent
//! into [`ast::Block`]) then [`decode`] (shape-driven writes into any
//! [`Decode`] destination). [`unmarshal`] runs all three and only touches
//! the destination if every step succeeds.
//!
//! # Examples
//!
//! ```rust
//! use blockconf::{record, Dynamic};
//!
//! #[derive(Debug, Clone, Default)]
//! struct Config {
//!     name: String,
//!     server: Vec<Dynamic>,
//! }
//! record!(Config { name, server });
//!
//! let mut config = Config::default();
//! blockconf::unmarshal(
//!     b"name = \"api\"\nserver { port = 8080 }\nserver { port = 8081 }",
//!     &mut config,
//! )
//! .unwrap();
//! assert_eq!(config.name, "api");
//! assert_eq!(config.server.len(), 2);
//! ```

pub mod ast;
pub mod cli;
pub mod decode;
pub mod errors;
pub mod options;
pub mod position;
pub mod syntax;
pub mod value;

pub use crate::decode::{decode, Decode};
pub use crate::errors::{DecodeError, Error, SyntaxError};
pub use crate::options::Options;
pub use crate::position::Position;
pub use crate::syntax::{parse, parse_with, tokenize};
pub use crate::value::Dynamic;

/// Parse `source` and decode it into `dst`.
///
/// `dst` is written only if the whole document parses and decodes; on error
/// it is left exactly as it was.
pub fn unmarshal<T: Decode + Clone>(source: &[u8], dst: &mut T) -> Result<(), Error> {
    unmarshal_with(source, dst, &Options::default())
}

/// [`unmarshal`] with explicit [`Options`].
pub fn unmarshal_with<T: Decode + Clone>(
    source: &[u8],
    dst: &mut T,
    options: &Options,
) -> Result<(), Error> {
    let text = std::str::from_utf8(source).map_err(|e| Error::InvalidUtf8 {
        valid_up_to: e.valid_up_to(),
    })?;
    let root = parse_with(text, options)?;

    let mut staged = dst.clone();
    decode(&root, &mut staged)?;
    *dst = staged;
    Ok(())
}

/// Decode `text` into a fresh `T::default()`.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// let ports: BTreeMap<String, u16> = blockconf::from_str("http = 80\nhttps = 443").unwrap();
/// assert_eq!(ports["https"], 443);
/// ```
pub fn from_str<T: Decode + Default>(text: &str) -> Result<T, Error> {
    let root = parse(text)?;
    let mut value = T::default();
    decode(&root, &mut value)?;
    Ok(value)
}
