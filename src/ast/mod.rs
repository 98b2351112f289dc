//! AST module for blockconf
//!
//! This module provides the immutable syntax tree handed from the parser to
//! the decoder. Every node records the [`Position`] of its first character.
//! Equality between nodes is structural and ignores positions.

// ============================================================================
// IMPORTS
// ============================================================================

use serde::Serialize;
use std::fmt;

use crate::position::Position;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// A sequence of entries: the implicit root of a document, or the body of a
/// `name { ... }` construct.
///
/// Entry names are not unique. Repeated names are kept in source order and
/// interpreted by the decoder.
///
/// # Examples
///
/// ```rust
/// let block = blockconf::parse("server { port = 1 }\nserver { port = 2 }").unwrap();
/// assert_eq!(block.entries_named("server").count(), 2);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct Block {
    pub start: Position,
    pub entries: Vec<Entry>,
}

/// One `name = value` or `name { ... }` pair.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub start: Position,
    pub name: Ident,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ident {
    pub start: Position,
    pub text: String,
}

/// Every numeric literal, integral or not.
#[derive(Debug, Clone, Serialize)]
pub struct Number {
    pub start: Position,
    pub value: f64,
}

/// A string literal with escapes already resolved.
#[derive(Debug, Clone, Serialize)]
pub struct Str {
    pub start: Position,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Bool {
    pub start: Position,
    pub value: bool,
}

/// A heterogeneous, ordered list of values.
#[derive(Debug, Clone, Serialize)]
pub struct List {
    pub start: Position,
    pub values: Vec<Value>,
}

/// The closed set of value nodes.
///
/// The parser never produces [`Value::Ident`] in value position; it exists so
/// the union mirrors the full node set and the decoder can reject it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Value {
    Block(Block),
    Ident(Ident),
    Number(Number),
    String(Str),
    Bool(Bool),
    List(List),
}

/// The kind of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueKind {
    Block,
    Ident,
    Number,
    String,
    Bool,
    List,
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl Block {
    pub fn new(start: Position, entries: Vec<Entry>) -> Self {
        Self { start, entries }
    }

    /// All entries called `name`, in source order.
    pub fn entries_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Entry> + 'a {
        self.entries.iter().filter(move |e| e.name.text == name)
    }

    /// The first entry called `name`, if any.
    pub fn first(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name.text == name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Entry {
    pub fn name(&self) -> &str {
        &self.name.text
    }
}

impl Value {
    /// Position of the first character of this value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use blockconf::ast::Value;
    /// let root = blockconf::parse("answer = 42").unwrap();
    /// let Value::Number(n) = &root.entries[0].value else { panic!() };
    /// assert_eq!(n.start.column, 10);
    /// assert_eq!(root.entries[0].value.start(), n.start);
    /// ```
    pub fn start(&self) -> Position {
        match self {
            Value::Block(b) => b.start,
            Value::Ident(i) => i.start,
            Value::Number(n) => n.start,
            Value::String(s) => s.start,
            Value::Bool(b) => b.start,
            Value::List(l) => l.start,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Block(_) => ValueKind::Block,
            Value::Ident(_) => ValueKind::Ident,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Bool(_) => ValueKind::Bool,
            Value::List(_) => ValueKind::List,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(&s.value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(b.value),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Value::Block(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(&l.values),
            _ => None,
        }
    }
}

impl ValueKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Block => "block",
            ValueKind::Ident => "identifier",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Bool => "bool",
            ValueKind::List => "list",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// POSITION-INSENSITIVE EQUALITY
// ============================================================================

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq for Str {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq for Bool {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

// ============================================================================
// MODULE EXPORTS
// ============================================================================

pub mod printer;
