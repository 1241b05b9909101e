//! Structured error types for podtop
//!
//! Using thiserror for automatic Display implementation and error chaining.

use super::types::NodeName;
use thiserror::Error;

/// Failures while reading BTF out of an instrumentation object.
#[derive(Error, Debug)]
pub enum BtfError {
    #[error("Invalid BTF: {0}")]
    Decode(String),

    #[error("Object file has no .BTF section")]
    MissingSection,

    #[error(transparent)]
    Object(#[from] object::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures building or using the parameter registry.
#[derive(Error, Debug)]
pub enum ParamError {
    #[error("No BTF type found for variable: {0}")]
    MetadataNotFound(String),

    #[error("Unknown parameter: {0}")]
    UnknownParam(String),

    #[error("Parameter {key} has no supported type; cannot assign a value")]
    UnsupportedType { key: String },

    #[error("Invalid value {value:?} for parameter {key} ({type_hint}): {reason}")]
    InvalidValue { key: String, type_hint: String, value: String, reason: String },

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Per-line problems on a node stream. Reported, never fatal.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Failed to decode output of node {node}: {source}: {line:?}")]
    Decode {
        node: NodeName,
        line: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed on node \"{node}\": {message}")]
    Node { node: NodeName, message: String },
}

/// Invalid report configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid sort-by column {0:?}")]
    UnknownSortColumn(String),

    #[error("Invalid column {0:?}")]
    UnknownColumn(String),

    #[error("Invalid column width {0:?}")]
    BadWidth(String),

    #[error("Invalid node source {0:?}, expected NODE=PATH")]
    BadSource(String),

    #[error("Invalid output mode {0:?}, expected columns or json")]
    BadOutputMode(String),
}

/// Failures loading an instrumentation program with its parameters.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Aya(#[from] aya::EbpfError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_not_found_display() {
        let err = ParamError::MetadataNotFound("targ_pid".to_string());
        assert_eq!(err.to_string(), "No BTF type found for variable: targ_pid");
    }

    #[test]
    fn test_node_error_mentions_node() {
        let err = StreamError::Node {
            node: NodeName::from("minikube"),
            message: "tracer crashed".to_string(),
        };
        assert!(err.to_string().contains("\"minikube\""));
        assert!(err.to_string().contains("tracer crashed"));
    }

    #[test]
    fn test_invalid_value_display() {
        let err = ParamError::InvalidValue {
            key: "pid".to_string(),
            type_hint: "uint32".to_string(),
            value: "-1".to_string(),
            reason: "out of range".to_string(),
        };
        assert!(err.to_string().contains("uint32"));
        assert!(err.to_string().contains("\"-1\""));
    }
}
