//! Type descriptors handed out by a [`TypeCatalogue`](super::TypeCatalogue).

use std::fmt;

/// Integer encoding from the BTF int flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntEncoding {
    Unsigned,
    Signed,
    Char,
    Bool,
}

impl IntEncoding {
    /// Bool beats char beats signed when several flags are set.
    #[must_use]
    pub fn from_flags(signed: bool, char: bool, bool: bool) -> Self {
        if bool {
            IntEncoding::Bool
        } else if char {
            IntEncoding::Char
        } else if signed {
            IntEncoding::Signed
        } else {
            IntEncoding::Unsigned
        }
    }
}

/// Qualifier or typedef layer wrapping another type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasKind {
    Typedef,
    Const,
    Volatile,
    Restrict,
    TypeTag,
}

/// One node of a type description.
///
/// `Alias` and `Array` own their inner descriptor so callers can walk the
/// tree without going back to the catalogue.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Void,
    Int { name: String, encoding: IntEncoding, size: u32 },
    Float { name: String, size: u32 },
    Struct { name: String },
    Union { name: String },
    Enum { name: String },
    Array { element: Box<TypeDescriptor>, len: u32 },
    Alias { name: String, kind: AliasKind, target: Box<TypeDescriptor> },
    Pointer,
    /// Reference that could not be followed (dangling id or too deep)
    Unresolved,
    /// Any BTF kind that never describes a parameter (func, fwd, datasec, ...)
    Other { kind: &'static str },
}

impl TypeDescriptor {
    /// Strip every alias layer and return the underlying type.
    #[must_use]
    pub fn resolve(&self) -> &TypeDescriptor {
        let mut current = self;
        while let TypeDescriptor::Alias { target, .. } = current {
            current = target;
        }
        current
    }

    /// Type name as written in C, empty for anonymous or unnamed kinds.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            TypeDescriptor::Int { name, .. }
            | TypeDescriptor::Float { name, .. }
            | TypeDescriptor::Struct { name }
            | TypeDescriptor::Union { name }
            | TypeDescriptor::Enum { name }
            | TypeDescriptor::Alias { name, .. } => name,
            _ => "",
        }
    }

    /// Shorthand for an integer descriptor.
    pub fn int(name: impl Into<String>, encoding: IntEncoding, size: u32) -> Self {
        TypeDescriptor::Int { name: name.into(), encoding, size }
    }

    /// Shorthand for a typedef wrapping `target`.
    pub fn typedef(name: impl Into<String>, target: TypeDescriptor) -> Self {
        TypeDescriptor::Alias { name: name.into(), kind: AliasKind::Typedef, target: Box::new(target) }
    }

    /// Shorthand for a fixed-length array.
    #[must_use]
    pub fn array(element: TypeDescriptor, len: u32) -> Self {
        TypeDescriptor::Array { element: Box::new(element), len }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Void => write!(f, "void"),
            TypeDescriptor::Int { name, .. } | TypeDescriptor::Float { name, .. } => {
                write!(f, "{name}")
            }
            TypeDescriptor::Struct { name } => write!(f, "struct {name}"),
            TypeDescriptor::Union { name } => write!(f, "union {name}"),
            TypeDescriptor::Enum { name } => write!(f, "enum {name}"),
            TypeDescriptor::Array { element, len } => write!(f, "{element}[{len}]"),
            TypeDescriptor::Alias { name, kind: AliasKind::Typedef, .. } => write!(f, "{name}"),
            TypeDescriptor::Alias { kind, target, .. } => {
                let qualifier = match kind {
                    AliasKind::Const => "const",
                    AliasKind::Volatile => "volatile",
                    AliasKind::Restrict => "restrict",
                    AliasKind::TypeTag | AliasKind::Typedef => "tag",
                };
                write!(f, "{qualifier} {target}")
            }
            TypeDescriptor::Pointer => write!(f, "pointer"),
            TypeDescriptor::Unresolved => write!(f, "<unresolved>"),
            TypeDescriptor::Other { kind } => write!(f, "<{kind}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_precedence() {
        assert_eq!(IntEncoding::from_flags(false, false, false), IntEncoding::Unsigned);
        assert_eq!(IntEncoding::from_flags(true, false, false), IntEncoding::Signed);
        assert_eq!(IntEncoding::from_flags(false, true, false), IntEncoding::Char);
        assert_eq!(IntEncoding::from_flags(true, true, false), IntEncoding::Char);
        assert_eq!(IntEncoding::from_flags(false, true, true), IntEncoding::Bool);
    }

    #[test]
    fn test_resolve_strips_nested_aliases() {
        let u32_ty = TypeDescriptor::int("unsigned int", IntEncoding::Unsigned, 4);
        let wrapped = TypeDescriptor::Alias {
            name: String::new(),
            kind: AliasKind::Const,
            target: Box::new(TypeDescriptor::typedef("__u32", u32_ty.clone())),
        };
        assert_eq!(wrapped.resolve(), &u32_ty);
    }

    #[test]
    fn test_display() {
        let ty = TypeDescriptor::array(TypeDescriptor::int("char", IntEncoding::Signed, 1), 16);
        assert_eq!(ty.to_string(), "char[16]");
    }
}
