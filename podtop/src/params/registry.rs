//! Parameter registry: one definition per tunable variable of a program.
//!
//! Definitions are built once, when the program is opened. Each one starts
//! from the variable's BTF type and name, then picks up `key`,
//! `defaultValue` and `description` from the gadget metadata.

use log::debug;
use podtop_common::PARAM_MARKER_PREFIX;
use std::collections::{BTreeMap, HashMap};

use super::metadata::GadgetMetadata;
use super::type_hint::{string_len, type_hint, TypeHint};
use super::value::ParamValue;
use crate::btf::TypeCatalogue;
use crate::domain::ParamError;

/// A user-tunable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDef {
    /// Name users refer to the parameter by
    pub key: String,
    pub type_hint: TypeHint,
    /// Declared array length, only for [`TypeHint::String`]
    pub string_len: Option<usize>,
    pub default_value: Option<String>,
    pub description: Option<String>,
    /// True when discovered from the program's BTF
    pub from_instrumentation: bool,
}

impl ParamDef {
    /// Definition for a parameter owned by something other than the program.
    pub fn external(key: impl Into<String>, type_hint: TypeHint) -> Self {
        Self {
            key: key.into(),
            type_hint,
            string_len: None,
            default_value: None,
            description: None,
            from_instrumentation: false,
        }
    }
}

/// A value ready to be written into a program global.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParam {
    pub var_name: String,
    pub key: String,
    pub value: ParamValue,
}

/// Registry of parameter definitions keyed by variable name.
pub struct ParamRegistry<C> {
    catalogue: C,
    metadata: GadgetMetadata,
    params: BTreeMap<String, ParamDef>,
}

impl<C: TypeCatalogue> ParamRegistry<C> {
    pub fn new(catalogue: C, metadata: GadgetMetadata) -> Self {
        Self { catalogue, metadata, params: BTreeMap::new() }
    }

    /// Register the program variable `var_name` as a parameter.
    ///
    /// Registering a name twice is a no-op; the first definition stays.
    ///
    /// # Errors
    /// Returns `MetadataNotFound` if the program does not declare `var_name`
    pub fn register_parameter(&mut self, var_name: &str) -> Result<(), ParamError> {
        if self.params.contains_key(var_name) {
            debug!("param {var_name:?} already defined, skipping");
            return Ok(());
        }

        let ty = self
            .catalogue
            .variable_type(var_name)
            .ok_or_else(|| ParamError::MetadataNotFound(var_name.to_string()))?;

        let hint = type_hint(&ty);
        let mut def = ParamDef {
            key: var_name.to_string(),
            type_hint: hint,
            string_len: string_len(&ty),
            default_value: None,
            description: None,
            from_instrumentation: true,
        };
        debug!("adding param {var_name:?} ({hint}, declared as {ty})");

        if let Some(info) = self.metadata.param_info(var_name) {
            debug!(" filling additional information from metadata");
            if let Some(key) = info.non_empty("key") {
                def.key = key;
            }
            def.default_value = info.non_empty("defaultValue");
            def.description = info.non_empty("description");
        }

        self.params.insert(var_name.to_string(), def);
        Ok(())
    }

    /// Register every variable the program marks with a `gadget_param_` VAR.
    ///
    /// Returns the number of marker variables found.
    ///
    /// # Errors
    /// Returns `MetadataNotFound` if a marker names a variable that does not exist
    pub fn discover(&mut self) -> Result<usize, ParamError> {
        let targets: Vec<String> = self
            .catalogue
            .variable_names()
            .into_iter()
            .filter_map(|name| name.strip_prefix(PARAM_MARKER_PREFIX).map(str::to_string))
            .collect();

        for target in &targets {
            self.register_parameter(target)?;
        }
        Ok(targets.len())
    }

    /// Add a parameter that does not come from the program.
    ///
    /// Returns false (and changes nothing) if `name` is already registered.
    pub fn declare(&mut self, name: &str, def: ParamDef) -> bool {
        if self.params.contains_key(name) {
            debug!("param {name:?} already defined, skipping");
            return false;
        }
        self.params.insert(name.to_string(), def);
        true
    }

    /// Definition registered under variable name `var_name`.
    #[must_use]
    pub fn get(&self, var_name: &str) -> Option<&ParamDef> {
        self.params.get(var_name)
    }

    /// Definition whose user-facing key is `key`, with its variable name.
    #[must_use]
    pub fn by_key(&self, key: &str) -> Option<(&str, &ParamDef)> {
        self.params.iter().find(|(_, def)| def.key == key).map(|(name, def)| (name.as_str(), def))
    }

    /// All definitions in variable-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamDef)> {
        self.params.iter().map(|(name, def)| (name.as_str(), def))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Work out the value of every program parameter.
    ///
    /// A user override (by key) beats the metadata default; parameters with
    /// neither are left untouched and do not appear in the result.
    ///
    /// # Errors
    /// Returns `UnknownParam` for override keys no parameter uses, or the
    /// value parse error of the first bad value
    pub fn resolve_values(
        &self,
        overrides: &HashMap<String, String>,
    ) -> Result<Vec<ResolvedParam>, ParamError> {
        let mut unknown: Vec<&String> =
            overrides.keys().filter(|key| self.by_key(key).is_none()).collect();
        if !unknown.is_empty() {
            unknown.sort();
            let names: Vec<&str> = unknown.into_iter().map(String::as_str).collect();
            return Err(ParamError::UnknownParam(names.join(", ")));
        }

        let mut resolved = Vec::new();
        for (var_name, def) in self.iter().filter(|(_, def)| def.from_instrumentation) {
            let Some(raw) = overrides.get(&def.key).or(def.default_value.as_ref()) else {
                continue;
            };
            resolved.push(ResolvedParam {
                var_name: var_name.to_string(),
                key: def.key.clone(),
                value: ParamValue::parse(def, raw)?,
            });
        }
        Ok(resolved)
    }
}
