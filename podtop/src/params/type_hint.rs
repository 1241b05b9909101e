//! Semantic classification of variable types.
//!
//! Maps a [`TypeDescriptor`] onto the closed set of parameter types users can
//! set from the command line. Aliases are stripped first; the rules are
//! checked in order and the first match wins:
//!
//! | Resolved type                          | Hint                  |
//! |----------------------------------------|-----------------------|
//! | signed int, 1/2/4/8 bytes              | `int8` .. `int64`     |
//! | unsigned int, 1/2/4/8 bytes            | `uint8` .. `uint64`   |
//! | bool encoding                          | `bool`                |
//! | char encoding                          | `uint8` (raw byte)    |
//! | float, 4/8 bytes                       | `float32` / `float64` |
//! | `struct gadget_l3endpoint_t`           | `ip`                  |
//! | `char[N]`, N > 0                       | `string`              |
//! | anything else                          | `unknown`             |

use podtop_common::{CHAR_TYPE_NAME, L3_ENDPOINT_TYPE_NAME};
use std::fmt;

use crate::btf::{IntEncoding, TypeDescriptor};

/// Semantic type of a parameter.
///
/// `Unknown` is a real classification, not a failure: the parameter is still
/// registered, but any attempt to assign it a value is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeHint {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Bool,
    Float32,
    Float64,
    Ip,
    String,
    Unknown,
}

impl TypeHint {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TypeHint::Int8 => "int8",
            TypeHint::Int16 => "int16",
            TypeHint::Int32 => "int32",
            TypeHint::Int64 => "int64",
            TypeHint::Uint8 => "uint8",
            TypeHint::Uint16 => "uint16",
            TypeHint::Uint32 => "uint32",
            TypeHint::Uint64 => "uint64",
            TypeHint::Bool => "bool",
            TypeHint::Float32 => "float32",
            TypeHint::Float64 => "float64",
            TypeHint::Ip => "ip",
            TypeHint::String => "string",
            TypeHint::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a variable type.
#[must_use]
pub fn type_hint(ty: &TypeDescriptor) -> TypeHint {
    match ty.resolve() {
        TypeDescriptor::Int { encoding, size, .. } => int_hint(*encoding, *size),
        TypeDescriptor::Float { size: 4, .. } => TypeHint::Float32,
        TypeDescriptor::Float { size: 8, .. } => TypeHint::Float64,
        TypeDescriptor::Struct { name } if name == L3_ENDPOINT_TYPE_NAME => TypeHint::Ip,
        TypeDescriptor::Array { element, len } if *len > 0 && is_char(element.resolve()) => {
            TypeHint::String
        }
        _ => TypeHint::Unknown,
    }
}

/// Declared length of a fixed-length string variable.
///
/// `Some` only when [`type_hint`] classifies `ty` as [`TypeHint::String`].
#[must_use]
pub fn string_len(ty: &TypeDescriptor) -> Option<usize> {
    if type_hint(ty) != TypeHint::String {
        return None;
    }
    match ty.resolve() {
        TypeDescriptor::Array { len, .. } => Some(*len as usize),
        _ => None,
    }
}

fn int_hint(encoding: IntEncoding, size: u32) -> TypeHint {
    match (encoding, size) {
        (IntEncoding::Signed, 1) => TypeHint::Int8,
        (IntEncoding::Signed, 2) => TypeHint::Int16,
        (IntEncoding::Signed, 4) => TypeHint::Int32,
        (IntEncoding::Signed, 8) => TypeHint::Int64,
        (IntEncoding::Unsigned, 1) => TypeHint::Uint8,
        (IntEncoding::Unsigned, 2) => TypeHint::Uint16,
        (IntEncoding::Unsigned, 4) => TypeHint::Uint32,
        (IntEncoding::Unsigned, 8) => TypeHint::Uint64,
        (IntEncoding::Bool, _) => TypeHint::Bool,
        (IntEncoding::Char, _) => TypeHint::Uint8,
        _ => TypeHint::Unknown,
    }
}

fn is_char(ty: &TypeDescriptor) -> bool {
    match ty {
        TypeDescriptor::Int { encoding: IntEncoding::Char, .. } => true,
        TypeDescriptor::Int { name, .. } => name == CHAR_TYPE_NAME,
        _ => false,
    }
}
