//! The `record!` macro: field tables for plain structs.

/// Implement [`Decode`](crate::decode::Decode) and
/// [`RecordTarget`](crate::decode::RecordTarget) for a struct.
///
/// Each listed field is matched by its identifier, or by the string given
/// after `=`. Fields listed under `embedded` are not decodable; naming one in
/// a document is an `UnsupportedField` error. Fields not listed at all are
/// invisible to the decoder.
///
/// # Examples
///
/// ```rust
/// use blockconf::record;
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Server {
///     host: String,
///     port: u16,
/// }
/// record!(Server { host, port = "Port" });
///
/// let server: Server = blockconf::from_str("host = \"localhost\"\nPort = 8080").unwrap();
/// assert_eq!(server, Server { host: "localhost".into(), port: 8080 });
/// ```
#[macro_export]
macro_rules! record {
    (
        $ty:ty {
            $($field:ident $(= $name:literal)?),* $(,)?
        }
        $(embedded { $($embedded:ident),* $(,)? })?
    ) => {
        impl $crate::decode::RecordTarget for $ty {
            fn fields(&self) -> &'static [$crate::decode::Field] {
                const FIELDS: &[$crate::decode::Field] = &[
                    $($crate::decode::Field::named($crate::__record_field_name!($field $(, $name)?)),)*
                    $($($crate::decode::Field::embedded(stringify!($embedded)),)*)?
                ];
                FIELDS
            }

            fn field_mut(&mut self, name: &str) -> ::std::option::Option<&mut dyn $crate::decode::Decode> {
                $(
                    if name == $crate::__record_field_name!($field $(, $name)?) {
                        return ::std::option::Option::Some(&mut self.$field);
                    }
                )*
                let _ = name;
                ::std::option::Option::None
            }
        }

        impl $crate::decode::Decode for $ty {
            fn shape(&mut self) -> $crate::decode::Shape<'_> {
                $crate::decode::Shape::Record(self)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_field_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident, $name:literal) => {
        $name
    };
}
