//! Value classification: what category a node belongs to and how record
//! fields describe themselves.
//!
//! Everything here is plain data. [`Kind`] is what the engine dispatches on,
//! [`Scalar`] carries leaf values to consumers that need the bytes (hashing),
//! and [`Field`]/[`Tag`] are the static descriptors the derive emits for each
//! record field.

use std::fmt;

/// Tag key marking a field as secret. Its value, if any, is ignored.
pub const SECRET_TAG: &str = "secret";

/// Bit width of a numeric scalar.
///
/// `Size` covers `isize`/`usize`, which are hashed as 64-bit values so stable
/// digests do not depend on the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
    W128,
    Size,
}

/// Categories of values that cannot be walked into or hashed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opaque {
    /// Function pointers.
    Function,
    /// Channel endpoints.
    Channel,
    /// Raw pointers.
    RawPointer,
}

/// The category of a node, as reported by [`crate::Object::kind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int(Width),
    Uint(Width),
    Float(Width),
    Char,
    String,
    /// Fixed-size array: `[T; N]`.
    Array,
    /// Dynamically-sized sequence: `Vec<T>`, `VecDeque<T>`.
    Sequence,
    /// Associative container. Sets are maps whose values are `()`.
    Map,
    /// Struct or tuple with named or positional fields.
    Record,
    /// Sum type: `Option`, `Result`, `Box<dyn Object>`, derived enums.
    Any,
    /// Pointer-like owner of a single referent.
    Reference,
    Opaque(Opaque),
}

impl Kind {
    /// Returns `true` for categories that carry a [`Scalar`] value.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Int(_) | Self::Uint(_) | Self::Float(_) | Self::Char | Self::String
        )
    }

    /// Returns `true` for categories the engine never looks inside.
    pub fn is_opaque(self) -> bool {
        matches!(self, Self::Opaque(_))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = |w: &Width| match w {
            Width::W8 => "8",
            Width::W16 => "16",
            Width::W32 => "32",
            Width::W64 => "64",
            Width::W128 => "128",
            Width::Size => "size",
        };
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int(w) => write!(f, "int{}", width(w)),
            Self::Uint(w) => write!(f, "uint{}", width(w)),
            Self::Float(w) => write!(f, "float{}", width(w)),
            Self::Char => f.write_str("char"),
            Self::String => f.write_str("string"),
            Self::Array => f.write_str("array"),
            Self::Sequence => f.write_str("sequence"),
            Self::Map => f.write_str("map"),
            Self::Record => f.write_str("record"),
            Self::Any => f.write_str("any"),
            Self::Reference => f.write_str("reference"),
            Self::Opaque(Opaque::Function) => f.write_str("function"),
            Self::Opaque(Opaque::Channel) => f.write_str("channel"),
            Self::Opaque(Opaque::RawPointer) => f.write_str("raw pointer"),
        }
    }
}

/// A borrowed view of a leaf value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Usize(usize),
    F32(f32),
    F64(f64),
    Char(char),
    Str(&'a str),
}

impl Scalar<'_> {
    /// The category this scalar belongs to.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Bool(_) => Kind::Bool,
            Self::I8(_) => Kind::Int(Width::W8),
            Self::I16(_) => Kind::Int(Width::W16),
            Self::I32(_) => Kind::Int(Width::W32),
            Self::I64(_) => Kind::Int(Width::W64),
            Self::I128(_) => Kind::Int(Width::W128),
            Self::Isize(_) => Kind::Int(Width::Size),
            Self::U8(_) => Kind::Uint(Width::W8),
            Self::U16(_) => Kind::Uint(Width::W16),
            Self::U32(_) => Kind::Uint(Width::W32),
            Self::U64(_) => Kind::Uint(Width::W64),
            Self::U128(_) => Kind::Uint(Width::W128),
            Self::Usize(_) => Kind::Uint(Width::Size),
            Self::F32(_) => Kind::Float(Width::W32),
            Self::F64(_) => Kind::Float(Width::W64),
            Self::Char(_) => Kind::Char,
            Self::Str(_) => Kind::String,
        }
    }
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => v.fmt(f),
            Self::I8(v) => v.fmt(f),
            Self::I16(v) => v.fmt(f),
            Self::I32(v) => v.fmt(f),
            Self::I64(v) => v.fmt(f),
            Self::I128(v) => v.fmt(f),
            Self::Isize(v) => v.fmt(f),
            Self::U8(v) => v.fmt(f),
            Self::U16(v) => v.fmt(f),
            Self::U32(v) => v.fmt(f),
            Self::U64(v) => v.fmt(f),
            Self::U128(v) => v.fmt(f),
            Self::Usize(v) => v.fmt(f),
            Self::F32(v) => v.fmt(f),
            Self::F64(v) => v.fmt(f),
            Self::Char(v) => v.fmt(f),
            Self::Str(v) => f.write_str(v),
        }
    }
}

/// One entry of a field's tag set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
    key: &'static str,
    value: &'static str,
}

impl Tag {
    #[doc(hidden)]
    pub const fn new(key: &'static str, value: &'static str) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// The tag's value; empty for presence-only tags like `#[object(secret)]`.
    pub fn value(&self) -> &'static str {
        self.value
    }
}

/// Static descriptor of a record field.
///
/// Generated by `#[derive(Object)]`. `type_name` is the type as declared in
/// source (generic parameters are not substituted).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    name: &'static str,
    type_name: &'static str,
    public: bool,
    tags: &'static [Tag],
}

impl Field {
    #[doc(hidden)]
    pub const fn new(
        name: &'static str,
        type_name: &'static str,
        public: bool,
        tags: &'static [Tag],
    ) -> Self {
        Self {
            name,
            type_name,
            public,
            tags,
        }
    }

    /// Field name; positional fields are named by index (`"0"`, `"1"`, ...).
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the field is declared `pub`. Restricted visibility such as
    /// `pub(crate)` counts as private.
    pub fn is_public(&self) -> bool {
        self.public
    }

    pub fn tags(&self) -> &'static [Tag] {
        self.tags
    }

    /// Looks up a tag by key.
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.value)
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.tag(key).is_some()
    }

    /// Whether the field carries the [`SECRET_TAG`] marker.
    pub fn is_secret(&self) -> bool {
        self.has_tag(SECRET_TAG)
    }
}
