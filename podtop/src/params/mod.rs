//! Parameters derived from instrumentation program variables
//!
//! - `type_hint`: classify a BTF type into a parameter type
//! - `metadata`: gadget metadata lookups (primary and deprecated paths)
//! - `registry`: build and query parameter definitions
//! - `value`: validate user input and encode it for program globals
//! - `loader`: load a program with parameter values applied
//! - `display`: text tables for the CLI

pub mod display;
pub mod loader;
pub mod metadata;
pub mod registry;
pub mod type_hint;
pub mod value;

pub use display::{param_table, value_lines};
pub use loader::{init_ebpf_logger, load_with_params};
pub use metadata::{GadgetMetadata, MetadataView, DEPRECATED_PARAMS_PATH, PRIMARY_PARAMS_PATH};
pub use registry::{ParamDef, ParamRegistry, ResolvedParam};
pub use type_hint::{string_len, type_hint, TypeHint};
pub use value::ParamValue;
