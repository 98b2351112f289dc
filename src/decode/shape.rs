//! Destination shapes.
//!
//! A destination describes itself to the decoder through [`Decode::shape`],
//! which hands out a mutable view of one of a closed set of shapes. The
//! decoder matches on that set instead of probing types at runtime.

use crate::errors::DecodeError;
use crate::value::Dynamic;

/// Callback used by containers to let the decoder fill one slot.
pub type Fill<'f> = dyn FnMut(&mut dyn Decode) -> Result<(), DecodeError> + 'f;

/// Anything the decoder can write into.
pub trait Decode {
    /// A mutable view of this destination's shape.
    fn shape(&mut self) -> Shape<'_>;

    /// Human-readable name of the destination type, used in errors.
    fn type_description(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// The shape of a destination at the moment it is written.
pub enum Shape<'a> {
    /// A string-keyed map.
    Map(&'a mut dyn MapTarget),
    /// A record with a fixed table of named fields.
    Record(&'a mut dyn RecordTarget),
    /// An ordered, growable list.
    List(&'a mut dyn ListTarget),
    /// A primitive.
    Scalar(Scalar<'a>),
    /// An open slot that takes whatever the document holds.
    Dynamic(&'a mut Dynamic),
    /// An optional value, realized on first write.
    Pointer(&'a mut dyn PointerTarget),
}

/// String-keyed maps.
pub trait MapTarget {
    /// Decode into the element stored under `key`. An existing element is the
    /// starting point; otherwise a default element is created. The element is
    /// stored back once `fill` succeeds.
    fn fill_entry(&mut self, key: &str, fill: &mut Fill<'_>) -> Result<(), DecodeError>;
}

/// Ordered lists.
pub trait ListTarget {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode one fresh default element and append it.
    fn push_with(&mut self, fill: &mut Fill<'_>) -> Result<(), DecodeError>;
}

/// Optional indirection.
pub trait PointerTarget {
    /// Allocate the pointee if absent and return it.
    fn realize(&mut self) -> &mut dyn Decode;
}

/// One entry in a record's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Name matched (case-sensitively) against entry names.
    pub name: &'static str,
    /// Embedded fields are listed so that naming them is reported as
    /// unsupported rather than unknown.
    pub embedded: bool,
}

impl Field {
    pub const fn named(name: &'static str) -> Self {
        Self {
            name,
            embedded: false,
        }
    }

    pub const fn embedded(name: &'static str) -> Self {
        Self {
            name,
            embedded: true,
        }
    }
}

/// Records with a static field table. Usually implemented with
/// [`record!`](crate::record).
pub trait RecordTarget {
    fn fields(&self) -> &'static [Field];

    /// The non-embedded field called `name`.
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Decode>;

    fn find_field(&self, name: &str) -> Option<Field> {
        self.fields().iter().find(|f| f.name == name).copied()
    }
}

/// Mutable views of the supported primitive kinds.
pub enum Scalar<'a> {
    Bool(&'a mut bool),
    String(&'a mut String),
    F64(&'a mut f64),
    F32(&'a mut f32),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
}
