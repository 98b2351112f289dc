use im::OrdMap;
use serde::Serialize;
use std::fmt;

use crate::ast::{self, Block, Entry, Ident, Number, Str};
use crate::position::Position;

/// A dynamically typed configuration value: the destination for data whose
/// shape is not known ahead of time.
///
/// An empty slot is [`Dynamic::Nil`]; the decoder turns it into a map, a list
/// or a scalar depending on what it finds in the document.
///
/// # Examples
///
/// ```rust
/// use blockconf::Dynamic;
/// let v: Dynamic = blockconf::from_str("port = 8080").unwrap();
/// assert_eq!(v.get("port").and_then(Dynamic::as_number), Some(8080.0));
/// assert_eq!(v.type_name(), "Map");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Dynamic {
    #[default]
    Nil,
    Number(f64),
    String(String),
    Bool(bool),
    List(Vec<Dynamic>),
    Map(OrdMap<String, Dynamic>),
}

impl Dynamic {
    pub fn map() -> Self {
        Dynamic::Map(OrdMap::new())
    }

    pub fn list() -> Self {
        Dynamic::List(Vec::new())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Dynamic::Nil => "Nil",
            Dynamic::Number(_) => "Number",
            Dynamic::String(_) => "String",
            Dynamic::Bool(_) => "Bool",
            Dynamic::List(_) => "List",
            Dynamic::Map(_) => "Map",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Dynamic::Nil)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Dynamic::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Dynamic::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Dynamic::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Dynamic]> {
        match self {
            Dynamic::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&OrdMap<String, Dynamic>> {
        match self {
            Dynamic::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up `key` if this is a map.
    pub fn get(&self, key: &str) -> Option<&Dynamic> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Rebuild a document from a decoded map.
    ///
    /// Lists of two or more maps become repeated blocks, so decoding the
    /// rendered block into a `Dynamic` reproduces `self`. Returns `None` for
    /// anything the syntax cannot express: non-map roots, `Nil`, maps inside
    /// mixed lists, and single-element lists of maps (which would read back
    /// as a plain map).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use blockconf::Dynamic;
    /// let v: Dynamic = blockconf::from_str("a = 1\nb { c = \"x\" }").unwrap();
    /// let block = v.to_block().unwrap();
    /// assert_eq!(block.to_string(), "a = 1\nb {\n  c = \"x\"\n}\n");
    /// ```
    pub fn to_block(&self) -> Option<Block> {
        let map = self.as_map()?;
        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            match value {
                Dynamic::Map(_) => entries.push(entry(key, ast::Value::Block(value.to_block()?))),
                Dynamic::List(items) if is_repeated_block(items) => {
                    for item in items {
                        entries.push(entry(key, ast::Value::Block(item.to_block()?)));
                    }
                }
                other => entries.push(entry(key, other.to_ast_value()?)),
            }
        }
        Some(Block::new(Position::start(), entries))
    }

    fn to_ast_value(&self) -> Option<ast::Value> {
        let start = Position::start();
        let value = match self {
            Dynamic::Nil | Dynamic::Map(_) => return None,
            Dynamic::Number(n) => ast::Value::Number(Number { start, value: *n }),
            Dynamic::String(s) => ast::Value::String(Str {
                start,
                value: s.clone(),
            }),
            Dynamic::Bool(b) => ast::Value::Bool(ast::Bool { start, value: *b }),
            Dynamic::List(items) => ast::Value::List(ast::List {
                start,
                values: items
                    .iter()
                    .map(Dynamic::to_ast_value)
                    .collect::<Option<Vec<_>>>()?,
            }),
        };
        Some(value)
    }

    // ------------------------------------------------------------------------
    // Display formatting helpers
    // ------------------------------------------------------------------------

    fn fmt_list(f: &mut fmt::Formatter<'_>, items: &[Dynamic]) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "]")
    }

    fn fmt_map(f: &mut fmt::Formatter<'_>, map: &OrdMap<String, Dynamic>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in map.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {} = {}", key, value)?;
        }
        if !map.is_empty() {
            write!(f, " ")?;
        }
        write!(f, "}}")
    }
}

fn entry(key: &str, value: ast::Value) -> Entry {
    Entry {
        start: Position::start(),
        name: Ident {
            start: Position::start(),
            text: key.to_string(),
        },
        value,
    }
}

fn is_repeated_block(items: &[Dynamic]) -> bool {
    items.len() > 1 && items.iter().all(|item| matches!(item, Dynamic::Map(_)))
}

impl fmt::Display for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dynamic::Nil => write!(f, "nil"),
            Dynamic::Number(n) => write!(f, "{}", n),
            Dynamic::String(s) => write!(f, "{:?}", s),
            Dynamic::Bool(b) => write!(f, "{}", b),
            Dynamic::List(items) => Self::fmt_list(f, items),
            Dynamic::Map(map) => Self::fmt_map(f, map),
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<f64> for Dynamic {
    fn from(n: f64) -> Self {
        Dynamic::Number(n)
    }
}

impl From<bool> for Dynamic {
    fn from(b: bool) -> Self {
        Dynamic::Bool(b)
    }
}

impl From<String> for Dynamic {
    fn from(s: String) -> Self {
        Dynamic::String(s)
    }
}

impl From<&str> for Dynamic {
    fn from(s: &str) -> Self {
        Dynamic::String(s.to_string())
    }
}

impl<T: Into<Dynamic>> From<Vec<T>> for Dynamic {
    fn from(items: Vec<T>) -> Self {
        Dynamic::List(items.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Dynamic>> FromIterator<(K, V)> for Dynamic {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Dynamic::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
