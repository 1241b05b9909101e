//! Domain types providing compile-time safety and self-documentation
//!
//! These newtype wrappers keep node identifiers and BTF type ids from being
//! mixed up with the plain strings and integers that surround them.

use std::fmt;

/// Name of a reporting node
///
/// Identifies which per-node stream a batch arrived on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeName(pub String);

impl NodeName {
    /// Get the node name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeName {
    fn from(s: &str) -> Self {
        NodeName(s.to_string())
    }
}

impl From<String> for NodeName {
    fn from(s: String) -> Self {
        NodeName(s)
    }
}

/// BTF type ID
///
/// Index into the type section. ID 0 is always `void`; real types start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// The implicit `void` type
    pub const VOID: TypeId = TypeId(0);

    /// Returns true if this ID refers to `void`
    pub fn is_void(self) -> bool {
        self == Self::VOID
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_name_display() {
        assert_eq!(NodeName::from("worker-1").to_string(), "worker-1");
    }

    #[test]
    fn test_type_id_void() {
        assert!(TypeId(0).is_void());
        assert!(!TypeId(3).is_void());
        assert_eq!(TypeId(3).to_string(), "type#3");
    }
}
