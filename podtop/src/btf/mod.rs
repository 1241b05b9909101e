//! # BTF Type Catalogue
//!
//! Instrumentation objects carry a `.BTF` section: the BPF Type Format
//! encoding of every type and global variable the program declares. This
//! module reads that section and answers one question for the rest of the
//! crate: *what is the type of the variable called `X`?*
//!
//! ## Data Flow
//!
//! ```text
//! program.bpf.o ──object──▶ .BTF bytes ──btf_rs──▶ btf_rs::Btf
//!                                                      │
//!                             variable_type("targ_pid")│
//!                                                      ▼
//!                                              TypeDescriptor tree
//!                                          (aliases + array elements)
//! ```
//!
//! ## Module Structure
//!
//! - **`descriptor`**: the closed set of descriptor kinds handed to callers
//! - **`catalogue`**: [`TypeCatalogue`] trait and the `btf_rs`-backed implementation
//!
//! Descriptors only follow the links needed for classification (alias
//! targets and array elements). Struct members and pointer targets are not
//! expanded, so self-referential types cannot loop.

pub mod catalogue;
pub mod descriptor;

pub use catalogue::{BtfCatalogue, TypeCatalogue};
pub use descriptor::{AliasKind, IntEncoding, TypeDescriptor};
