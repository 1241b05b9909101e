//! Gadget metadata: the YAML document shipped next to an instrumentation program.
//!
//! Queried by dotted path. Keys match case-insensitively, since the metadata
//! format has always been read through a case-folding config layer.
//!
//! ```yaml
//! params:
//!   ebpf:
//!     targ_pid:
//!       key: pid
//!       defaultValue: "0"
//!       description: Only trace this PID
//! ```

use serde_yaml::{Mapping, Value};
use std::path::Path;

use crate::domain::ParamError;

/// Where per-variable parameter metadata lives.
pub const PRIMARY_PARAMS_PATH: &str = "params.ebpf";

/// Older location of the same information, read only when the primary one
/// is absent for a variable.
pub const DEPRECATED_PARAMS_PATH: &str = "ebpfParams";

/// Parsed gadget metadata document.
#[derive(Debug, Clone, Default)]
pub struct GadgetMetadata {
    root: Value,
}

impl GadgetMetadata {
    /// Parse metadata from YAML text. Empty text yields empty metadata.
    ///
    /// # Errors
    /// Returns an error if the text is not valid YAML
    pub fn from_yaml_str(text: &str) -> Result<Self, ParamError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let root: Value = serde_yaml::from_str(text)?;
        Ok(Self { root })
    }

    /// Read and parse a metadata file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ParamError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    /// View of the mapping at `path`, or `None` when the path is absent or
    /// does not hold a mapping.
    #[must_use]
    pub fn sub(&self, path: &str) -> Option<MetadataView<'_>> {
        let mut current = &self.root;
        for segment in path.split('.') {
            current = lookup(current.as_mapping()?, segment)?;
        }
        current.as_mapping().map(|map| MetadataView { map })
    }

    /// Metadata for one variable: primary path if present, otherwise the
    /// deprecated one. Never a merge of both.
    #[must_use]
    pub fn param_info(&self, var_name: &str) -> Option<MetadataView<'_>> {
        self.sub(&format!("{PRIMARY_PARAMS_PATH}.{var_name}"))
            .or_else(|| self.sub(&format!("{DEPRECATED_PARAMS_PATH}.{var_name}")))
    }
}

/// Borrowed mapping inside a [`GadgetMetadata`] document.
#[derive(Debug, Clone, Copy)]
pub struct MetadataView<'a> {
    map: &'a Mapping,
}

impl MetadataView<'_> {
    /// Scalar at `key` as a string; empty when absent or not a scalar.
    #[must_use]
    pub fn get_string(&self, key: &str) -> String {
        match lookup(self.map, key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Like [`get_string`](Self::get_string), `None` for empty values.
    #[must_use]
    pub fn non_empty(&self, key: &str) -> Option<String> {
        Some(self.get_string(key)).filter(|s| !s.is_empty())
    }
}

fn lookup<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| k.as_str().is_some_and(|k| k.eq_ignore_ascii_case(key)))
        .map(|(_, v)| v)
}
