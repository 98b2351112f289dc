//! Canonical source rendering for the AST.
//!
//! The output re-parses to an AST equal to the input (positions aside): one
//! entry per line, blocks indented by two spaces, lists on a single line.

use std::fmt::{self, Write};

use super::{Block, Entry, Value};

const INDENT: &str = "  ";

impl fmt::Display for Block {
    /// Renders the block as a document body (no surrounding braces).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_entries(f, &self.entries, 0)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_entry(f, self, 0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, 0)
    }
}

fn write_entries(f: &mut fmt::Formatter<'_>, entries: &[Entry], depth: usize) -> fmt::Result {
    for entry in entries {
        write_entry(f, entry, depth)?;
        f.write_char('\n')?;
    }
    Ok(())
}

fn write_entry(f: &mut fmt::Formatter<'_>, entry: &Entry, depth: usize) -> fmt::Result {
    write_indent(f, depth)?;
    f.write_str(&entry.name.text)?;
    match &entry.value {
        Value::Block(block) => {
            f.write_char(' ')?;
            write_block(f, block, depth)
        }
        value => {
            f.write_str(" = ")?;
            write_value(f, value, depth)
        }
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, block: &Block, depth: usize) -> fmt::Result {
    if block.entries.is_empty() {
        return f.write_str("{}");
    }
    f.write_str("{\n")?;
    write_entries(f, &block.entries, depth + 1)?;
    write_indent(f, depth)?;
    f.write_char('}')
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value, depth: usize) -> fmt::Result {
    match value {
        Value::Block(block) => write_block(f, block, depth),
        Value::Ident(ident) => f.write_str(&ident.text),
        Value::Number(n) => write!(f, "{}", n.value),
        Value::String(s) => write_quoted(f, &s.value),
        Value::Bool(b) => write!(f, "{}", b.value),
        Value::List(list) => {
            f.write_char('[')?;
            for (i, item) in list.values.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item, depth)?;
            }
            f.write_char(']')
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

fn write_indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}
