//! Shape-driven decoding of an AST onto caller-owned destinations.
//!
//! The decoder walks the tree and, at every step, asks the destination for
//! its [`Shape`]. Entries are grouped by name; a name that occurs more than
//! once is decoded in *multi* context, where only list-shaped destinations
//! and open [`Dynamic`] slots are accepted and each occurrence appends one
//! element. Everything else in multi context is a `ShapeMismatch`, so
//! repeated entries are never silently collapsed.
//!
//! Writes merge into what the destination already holds: existing map
//! elements and record fields are the starting point, lists are appended to.

pub mod impls;
pub mod record;
pub mod shape;

use indexmap::IndexMap;

use crate::ast::{Block, Entry, List, Value, ValueKind};
use crate::errors::{DecodeError, DecodeErrorKind};
use crate::position::Position;
use crate::value::Dynamic;

pub use shape::{
    Decode, Field, Fill, ListTarget, MapTarget, PointerTarget, RecordTarget, Scalar, Shape,
};

type DecodeResult = Result<(), DecodeError>;

/// Decode `root` into `dst`.
///
/// On failure `dst` may be partially written; [`crate::unmarshal`] decodes
/// into a copy to avoid exposing that.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// let root = blockconf::parse("foo = 123").unwrap();
/// let mut dst: HashMap<String, f64> = HashMap::new();
/// blockconf::decode(&root, &mut dst).unwrap();
/// assert_eq!(dst["foo"], 123.0);
/// ```
pub fn decode(root: &Block, dst: &mut dyn Decode) -> DecodeResult {
    let destination = dst.type_description();
    Decoder::default().block(root, dst, false)?;
    tracing::debug!(
        entries = root.entries.len(),
        destination = %short_type_name(destination),
        "decoded document"
    );
    Ok(())
}

// ============================================================================
// DECODER STATE
// ============================================================================

#[derive(Debug)]
enum Segment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, Copy)]
enum Primitive<'n> {
    Number(f64),
    String(&'n str),
    Bool(bool),
}

#[derive(Debug, Default)]
struct Decoder {
    path: Vec<Segment>,
}

impl Decoder {
    // ------------------------------------------------------------------------
    // Dispatch on the AST node
    // ------------------------------------------------------------------------

    fn value(&mut self, node: &Value, dst: &mut dyn Decode, multi: bool) -> DecodeResult {
        match node {
            Value::Block(block) => self.block(block, dst, multi),
            Value::List(list) => self.list(list, dst, multi),
            Value::Number(n) => self.scalar(node, Primitive::Number(n.value), dst, multi),
            Value::String(s) => self.scalar(node, Primitive::String(&s.value), dst, multi),
            Value::Bool(b) => self.scalar(node, Primitive::Bool(b.value), dst, multi),
            Value::Ident(ident) => Err(self.error(
                DecodeErrorKind::UnsupportedValueKind,
                dst.type_description(),
                ValueKind::Ident,
                ident.start,
            )),
        }
    }

    fn block(&mut self, block: &Block, dst: &mut dyn Decode, multi: bool) -> DecodeResult {
        let destination = dst.type_description();
        match dst.shape() {
            Shape::Pointer(pointer) => self.block(block, pointer.realize(), multi),
            Shape::Dynamic(slot) => self.block_into_dynamic(block, slot, multi),
            Shape::Map(map) if !multi => self.entries_into_map(block, map, destination),
            Shape::Record(record) if !multi => self.entries_into_record(block, record, destination),
            Shape::List(list) => self.push(list, |d, element| d.block(block, element, false)),
            Shape::Map(_) | Shape::Record(_) | Shape::Scalar(_) => {
                Err(self.shape_mismatch(destination, ValueKind::Block, block.start, multi))
            }
        }
    }

    fn list(&mut self, list: &List, dst: &mut dyn Decode, multi: bool) -> DecodeResult {
        let destination = dst.type_description();
        match dst.shape() {
            Shape::Pointer(pointer) => self.list(list, pointer.realize(), multi),
            Shape::Dynamic(slot) => {
                if slot.is_nil() {
                    *slot = Dynamic::list();
                }
                match slot {
                    Dynamic::List(items) if multi => {
                        self.push(items, |d, element| d.list(list, element, false))
                    }
                    Dynamic::List(items) => self.elements(list, items),
                    other => Err(self.shape_mismatch(
                        dynamic_description(other),
                        ValueKind::List,
                        list.start,
                        multi,
                    )),
                }
            }
            Shape::List(target) if multi => {
                self.push(target, |d, element| d.list(list, element, false))
            }
            Shape::List(target) => self.elements(list, target),
            Shape::Map(_) | Shape::Record(_) | Shape::Scalar(_) => {
                Err(self.shape_mismatch(destination, ValueKind::List, list.start, multi))
            }
        }
    }

    fn scalar(
        &mut self,
        node: &Value,
        primitive: Primitive<'_>,
        dst: &mut dyn Decode,
        multi: bool,
    ) -> DecodeResult {
        let destination = dst.type_description();
        match dst.shape() {
            Shape::Pointer(pointer) => self.scalar(node, primitive, pointer.realize(), multi),
            Shape::Dynamic(slot) if multi => {
                if slot.is_nil() {
                    *slot = Dynamic::list();
                }
                match slot {
                    Dynamic::List(items) => {
                        self.push(items, |d, element| d.scalar(node, primitive, element, false))
                    }
                    other => Err(self.shape_mismatch(
                        dynamic_description(other),
                        node.kind(),
                        node.start(),
                        true,
                    )),
                }
            }
            Shape::Dynamic(slot) => {
                assign_dynamic(slot, primitive).map_err(|(holding, reason)| {
                    self.error(
                        DecodeErrorKind::TypeMismatch {
                            reason: Some(reason),
                        },
                        holding,
                        node.kind(),
                        node.start(),
                    )
                })
            }
            Shape::List(target) if multi => {
                self.push(target, |d, element| d.scalar(node, primitive, element, false))
            }
            Shape::Scalar(target) if !multi => assign_scalar(target, primitive).map_err(|reason| {
                self.error(
                    DecodeErrorKind::TypeMismatch { reason },
                    destination,
                    node.kind(),
                    node.start(),
                )
            }),
            Shape::Scalar(_) | Shape::List(_) | Shape::Map(_) | Shape::Record(_) => {
                Err(self.shape_mismatch(destination, node.kind(), node.start(), multi))
            }
        }
    }

    // ------------------------------------------------------------------------
    // Containers
    // ------------------------------------------------------------------------

    fn block_into_dynamic(&mut self, block: &Block, slot: &mut Dynamic, multi: bool) -> DecodeResult {
        if slot.is_nil() {
            *slot = if multi { Dynamic::list() } else { Dynamic::map() };
        }
        match slot {
            Dynamic::Map(map) if !multi => self.entries_into_map(block, map, "Dynamic"),
            Dynamic::List(items) => self.push(items, |d, element| d.block(block, element, false)),
            other => Err(self.shape_mismatch(
                dynamic_description(other),
                ValueKind::Block,
                block.start,
                multi,
            )),
        }
    }

    fn entries_into_map(
        &mut self,
        block: &Block,
        map: &mut dyn MapTarget,
        destination: &str,
    ) -> DecodeResult {
        for (name, entries) in group_by_name(&block.entries) {
            let multi = entries.len() > 1;
            tracing::trace!(
                name,
                count = entries.len(),
                destination = %short_type_name(destination),
                "decoding map entry"
            );
            self.path.push(Segment::Key(name.to_owned()));
            map.fill_entry(name, &mut |slot: &mut dyn Decode| {
                for entry in &entries {
                    self.value(&entry.value, &mut *slot, multi)?;
                }
                Ok(())
            })?;
            self.path.pop();
        }
        Ok(())
    }

    fn entries_into_record(
        &mut self,
        block: &Block,
        record: &mut dyn RecordTarget,
        destination: &'static str,
    ) -> DecodeResult {
        for (name, entries) in group_by_name(&block.entries) {
            let first = entries[0];
            match record.find_field(name) {
                None => {
                    let known = record
                        .fields()
                        .iter()
                        .filter(|f| !f.embedded)
                        .map(|f| f.name)
                        .collect();
                    return Err(self.error(
                        DecodeErrorKind::UnknownField {
                            name: name.to_owned(),
                            known,
                        },
                        destination,
                        first.value.kind(),
                        first.start,
                    ));
                }
                Some(field) if field.embedded => {
                    return Err(self.error(
                        DecodeErrorKind::UnsupportedField {
                            name: name.to_owned(),
                        },
                        destination,
                        first.value.kind(),
                        first.start,
                    ));
                }
                Some(_) => {}
            }

            let multi = entries.len() > 1;
            tracing::trace!(
                name,
                count = entries.len(),
                destination = %short_type_name(destination),
                "decoding record field"
            );
            self.path.push(Segment::Key(name.to_owned()));
            let Some(slot) = record.field_mut(name) else {
                return Err(self.error(
                    DecodeErrorKind::UnknownField {
                        name: name.to_owned(),
                        known: Vec::new(),
                    },
                    destination,
                    first.value.kind(),
                    first.start,
                ));
            };
            for entry in &entries {
                self.value(&entry.value, &mut *slot, multi)?;
            }
            self.path.pop();
        }
        Ok(())
    }

    fn elements(&mut self, list: &List, target: &mut dyn ListTarget) -> DecodeResult {
        for value in &list.values {
            self.push(target, |d, element| d.value(value, element, false))?;
        }
        Ok(())
    }

    /// Append one element to `target`, filled in by `fill`.
    fn push(
        &mut self,
        target: &mut dyn ListTarget,
        mut fill: impl FnMut(&mut Self, &mut dyn Decode) -> DecodeResult,
    ) -> DecodeResult {
        self.path.push(Segment::Index(target.len()));
        target.push_with(&mut |element: &mut dyn Decode| fill(self, element))?;
        self.path.pop();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------------

    fn error(
        &self,
        kind: DecodeErrorKind,
        destination: impl AsRef<str>,
        found: ValueKind,
        at: Position,
    ) -> DecodeError {
        DecodeError {
            kind,
            destination: short_type_name(destination.as_ref()),
            found,
            at,
            path: self.render_path(),
        }
    }

    fn shape_mismatch(
        &self,
        destination: impl AsRef<str>,
        found: ValueKind,
        at: Position,
        repeated: bool,
    ) -> DecodeError {
        self.error(
            DecodeErrorKind::ShapeMismatch { repeated },
            destination,
            found,
            at,
        )
    }

    fn render_path(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                Segment::Key(key) if out.is_empty() => out.push_str(key),
                Segment::Key(key) => {
                    out.push('.');
                    out.push_str(key);
                }
                Segment::Index(index) => out.push_str(&format!("[{index}]")),
            }
        }
        out
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Entries grouped by name, in order of first occurrence.
fn group_by_name(entries: &[Entry]) -> IndexMap<&str, Vec<&Entry>> {
    let mut groups: IndexMap<&str, Vec<&Entry>> = IndexMap::new();
    for entry in entries {
        groups.entry(entry.name()).or_default().push(entry);
    }
    groups
}

fn dynamic_description(slot: &Dynamic) -> String {
    format!("Dynamic holding {}", slot.type_name())
}

/// An empty slot takes any primitive; a filled one only its own kind.
fn assign_dynamic(slot: &mut Dynamic, primitive: Primitive<'_>) -> Result<(), (String, String)> {
    if slot.is_nil() {
        *slot = match primitive {
            Primitive::Number(v) => Dynamic::Number(v),
            Primitive::String(v) => Dynamic::String(v.to_owned()),
            Primitive::Bool(v) => Dynamic::Bool(v),
        };
        return Ok(());
    }
    match (slot, primitive) {
        (Dynamic::Number(n), Primitive::Number(v)) => *n = v,
        (Dynamic::String(s), Primitive::String(v)) => v.clone_into(s),
        (Dynamic::Bool(b), Primitive::Bool(v)) => *b = v,
        (other, _) => {
            return Err((
                dynamic_description(other),
                format!("the slot already holds a {}", other.type_name()),
            ))
        }
    }
    Ok(())
}

macro_rules! integral {
    ($value:expr, $ty:ty) => {{
        let value: f64 = $value;
        if value.fract() != 0.0 {
            return Err(Some(format!("{value} is not an integer")));
        }
        if value < <$ty>::MIN as f64 || value >= <$ty>::MAX as f64 + 1.0 {
            return Err(Some(format!(
                "{value} is out of range for {}",
                stringify!($ty)
            )));
        }
        value as $ty
    }};
}

/// Write a primitive into a typed scalar. `Err(None)` means the kinds are
/// incompatible; `Err(Some(_))` names a lossy numeric conversion.
fn assign_scalar(target: Scalar<'_>, primitive: Primitive<'_>) -> Result<(), Option<String>> {
    match (target, primitive) {
        (Scalar::Bool(dst), Primitive::Bool(v)) => *dst = v,
        (Scalar::String(dst), Primitive::String(v)) => v.clone_into(dst),
        (Scalar::F64(dst), Primitive::Number(v)) => *dst = v,
        (Scalar::F32(dst), Primitive::Number(v)) => {
            let narrowed = v as f32;
            if !narrowed.is_finite() || (narrowed == 0.0 && v != 0.0) {
                return Err(Some(format!("{v} is out of range for f32")));
            }
            *dst = narrowed;
        }
        (Scalar::I8(dst), Primitive::Number(v)) => *dst = integral!(v, i8),
        (Scalar::I16(dst), Primitive::Number(v)) => *dst = integral!(v, i16),
        (Scalar::I32(dst), Primitive::Number(v)) => *dst = integral!(v, i32),
        (Scalar::I64(dst), Primitive::Number(v)) => *dst = integral!(v, i64),
        (Scalar::Isize(dst), Primitive::Number(v)) => *dst = integral!(v, isize),
        (Scalar::U8(dst), Primitive::Number(v)) => *dst = integral!(v, u8),
        (Scalar::U16(dst), Primitive::Number(v)) => *dst = integral!(v, u16),
        (Scalar::U32(dst), Primitive::Number(v)) => *dst = integral!(v, u32),
        (Scalar::U64(dst), Primitive::Number(v)) => *dst = integral!(v, u64),
        (Scalar::Usize(dst), Primitive::Number(v)) => *dst = integral!(v, usize),
        _ => return Err(None),
    }
    Ok(())
}

/// `alloc::vec::Vec<my_crate::Server>` becomes `Vec<Server>`.
pub(crate) fn short_type_name(full: &str) -> String {
    fn last_segment(path: &str) -> &str {
        path.rsplit("::").next().unwrap_or(path)
    }

    let mut out = String::with_capacity(full.len());
    let mut path = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            path.push(c);
        } else {
            out.push_str(last_segment(&path));
            path.clear();
            out.push(c);
        }
    }
    out.push_str(last_segment(&path));
    out
}
