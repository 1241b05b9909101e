//! # Shared Layouts (Instrumentation ↔ Userspace)
//!
//! Names and memory layouts that instrumentation programs declare in their
//! BTF and that userspace must agree on byte for byte. Everything here is
//! `#[repr(C)]` or a plain constant so the crate stays `no_std`.
//!
//! ## Key Items
//!
//! - [`L3_ENDPOINT_TYPE_NAME`] - struct name that marks an IP-address parameter
//! - [`L3Endpoint`] - the 20-byte image written into such a parameter's global
//! - [`PARAM_MARKER_PREFIX`] - prefix of the marker variables declaring parameters

#![no_std]

// ============================================================================
// BTF Names
// ============================================================================

/// Name of the struct instrumentation programs use for a network endpoint.
///
/// A global whose (alias-resolved) type is this struct is exposed to users as
/// an IP address parameter.
pub const L3_ENDPOINT_TYPE_NAME: &str = "gadget_l3endpoint_t";

/// Prefix of marker variables that declare a tunable global.
///
/// `GADGET_PARAM(targ_pid)` in a program emits a VAR named
/// `gadget_param_targ_pid` pointing at the real `targ_pid` global.
pub const PARAM_MARKER_PREFIX: &str = "gadget_param_";

/// Name C uses for the plain character type.
pub const CHAR_TYPE_NAME: &str = "char";

// ============================================================================
// Address Families
// ============================================================================

/// IPv4 address family as reported in `family` fields.
pub const AF_INET: u16 = 2;

/// IPv6 address family as reported in `family` fields.
pub const AF_INET6: u16 = 10;

// ============================================================================
// Endpoint Layout
// ============================================================================

/// Size in bytes of the address union (`__u32 v4` / `__u8 v6[16]`).
pub const L3_ADDR_LEN: usize = 16;

/// Userspace mirror of `struct gadget_l3endpoint_t`.
///
/// **Memory Layout**: 16-byte address union, 1-byte version, 3 bytes padding
/// (the union is 4-byte aligned). IPv4 addresses occupy the first 4 bytes in
/// network order.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct L3Endpoint {
    /// Raw address bytes, network order
    pub addr_raw: [u8; L3_ADDR_LEN],
    /// IP version: 4 or 6
    pub version: u8,
    pub _padding: [u8; 3],
}

impl L3Endpoint {
    /// Size of the C struct, padding included.
    pub const SIZE: usize = 20;

    /// Endpoint holding an IPv4 address.
    #[must_use]
    pub fn v4(octets: [u8; 4]) -> Self {
        let mut addr_raw = [0u8; L3_ADDR_LEN];
        addr_raw[..4].copy_from_slice(&octets);
        Self { addr_raw, version: 4, _padding: [0u8; 3] }
    }

    /// Endpoint holding an IPv6 address.
    #[must_use]
    pub fn v6(octets: [u8; 16]) -> Self {
        Self { addr_raw: octets, version: 6, _padding: [0u8; 3] }
    }

    /// Byte image of the struct as the program expects it in its global.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[..L3_ADDR_LEN].copy_from_slice(&self.addr_raw);
        out[L3_ADDR_LEN] = self.version;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_size_matches_c() {
        assert_eq!(core::mem::size_of::<L3Endpoint>(), L3Endpoint::SIZE);
    }

    #[test]
    fn test_v4_bytes() {
        let bytes = L3Endpoint::v4([10, 0, 0, 1]).to_bytes();
        assert_eq!(&bytes[..4], &[10, 0, 0, 1]);
        assert!(bytes[4..16].iter().all(|b| *b == 0));
        assert_eq!(bytes[16], 4);
    }
}
