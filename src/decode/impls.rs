//! [`Decode`] implementations for standard library and `im` types.

use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap, VecDeque};

use super::shape::{Decode, Fill, ListTarget, MapTarget, PointerTarget, Scalar, Shape};
use crate::errors::DecodeError;
use crate::value::Dynamic;

// ============================================================================
// SCALARS
// ============================================================================

macro_rules! scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Decode for $ty {
                fn shape(&mut self) -> Shape<'_> {
                    Shape::Scalar(Scalar::$variant(self))
                }
            }
        )*
    };
}

scalar! {
    bool => Bool,
    String => String,
    f64 => F64,
    f32 => F32,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
}

// ============================================================================
// LISTS
// ============================================================================

impl<T: Decode + Default> Decode for Vec<T> {
    fn shape(&mut self) -> Shape<'_> {
        Shape::List(self)
    }
}

impl<T: Decode + Default> ListTarget for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn push_with(&mut self, fill: &mut Fill<'_>) -> Result<(), DecodeError> {
        let mut element = T::default();
        fill(&mut element)?;
        self.push(element);
        Ok(())
    }
}

impl<T: Decode + Default> Decode for VecDeque<T> {
    fn shape(&mut self) -> Shape<'_> {
        Shape::List(self)
    }
}

impl<T: Decode + Default> ListTarget for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn push_with(&mut self, fill: &mut Fill<'_>) -> Result<(), DecodeError> {
        let mut element = T::default();
        fill(&mut element)?;
        self.push_back(element);
        Ok(())
    }
}

// ============================================================================
// MAPS
// ============================================================================

macro_rules! entry_map {
    ($($map:ident),* $(,)?) => {
        $(
            impl<V: Decode + Default> Decode for $map<String, V> {
                fn shape(&mut self) -> Shape<'_> {
                    Shape::Map(self)
                }
            }

            impl<V: Decode + Default> MapTarget for $map<String, V> {
                fn fill_entry(&mut self, key: &str, fill: &mut Fill<'_>) -> Result<(), DecodeError> {
                    fill(self.entry(key.to_owned()).or_default())
                }
            }
        )*
    };
}

entry_map!(HashMap, BTreeMap, IndexMap);

// Persistent maps have no in-place entry API; take the element out and put
// it back once decoded.
macro_rules! persistent_map {
    ($($map:ty),* $(,)?) => {
        $(
            impl<V: Decode + Default + Clone> Decode for $map {
                fn shape(&mut self) -> Shape<'_> {
                    Shape::Map(self)
                }
            }

            impl<V: Decode + Default + Clone> MapTarget for $map {
                fn fill_entry(&mut self, key: &str, fill: &mut Fill<'_>) -> Result<(), DecodeError> {
                    let mut element = self.remove(key).unwrap_or_default();
                    fill(&mut element)?;
                    self.insert(key.to_owned(), element);
                    Ok(())
                }
            }
        )*
    };
}

persistent_map!(im::HashMap<String, V>, im::OrdMap<String, V>);

// ============================================================================
// INDIRECTION
// ============================================================================

impl<T: Decode + Default> Decode for Option<T> {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Pointer(self)
    }
}

impl<T: Decode + Default> PointerTarget for Option<T> {
    fn realize(&mut self) -> &mut dyn Decode {
        self.get_or_insert_with(T::default)
    }
}

impl<T: Decode + ?Sized> Decode for Box<T> {
    fn shape(&mut self) -> Shape<'_> {
        (**self).shape()
    }

    fn type_description(&self) -> &'static str {
        (**self).type_description()
    }
}

// ============================================================================
// OPEN SLOTS
// ============================================================================

impl Decode for Dynamic {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Dynamic(self)
    }

    fn type_description(&self) -> &'static str {
        "Dynamic"
    }
}
