use podtop::btf::{BtfCatalogue, IntEncoding, TypeCatalogue, TypeDescriptor};
use podtop::domain::ParamError;
use podtop::params::{param_table, GadgetMetadata, ParamRegistry, ParamValue, TypeHint};
use std::collections::HashMap;
use std::io::Write;

mod common;

use common::tcptop_btf;

const METADATA: &str = r#"
name: tcptop
params:
  ebpf:
    targ_pid:
      key: pid
      defaultValue: "0"
      description: Show only connections of this PID
ebpfParams:
  targ_pid:
    key: legacy_pid
    defaultValue: "99"
  targ_comm:
    key: comm
    description: Show only this command
"#;

fn metadata_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(METADATA.as_bytes()).unwrap();
    file
}

#[test]
fn test_registry_from_btf_and_metadata() {
    let catalogue = BtfCatalogue::parse(&tcptop_btf()).expect("valid BTF");
    assert_eq!(
        catalogue.variable_names(),
        vec!["targ_pid", "gadget_param_targ_pid", "targ_comm", "gadget_param_targ_comm"]
    );

    let file = metadata_file();
    let metadata = GadgetMetadata::from_file(file.path()).unwrap();
    let mut registry = ParamRegistry::new(catalogue, metadata);
    assert_eq!(registry.discover().unwrap(), 2);

    // Primary path wins over the deprecated one
    let pid = registry.get("targ_pid").unwrap();
    assert_eq!(pid.key, "pid");
    assert_eq!(pid.type_hint, TypeHint::Int32);
    assert_eq!(pid.default_value.as_deref(), Some("0"));

    // Deprecated path used when the primary is absent
    let comm = registry.get("targ_comm").unwrap();
    assert_eq!(comm.key, "comm");
    assert_eq!(comm.type_hint, TypeHint::String);
    assert_eq!(comm.string_len, Some(16));
    assert_eq!(comm.default_value, None);

    let overrides = HashMap::from([("comm".to_string(), "curl".to_string())]);
    let values = registry.resolve_values(&overrides).unwrap();
    assert_eq!(values.len(), 2);
    let comm = values.iter().find(|v| v.key == "comm").unwrap();
    assert_eq!(comm.value.to_bytes().len(), 16);
    let pid = values.iter().find(|v| v.key == "pid").unwrap();
    assert_eq!(pid.value, ParamValue::Int32(0));

    let table = param_table(&registry);
    assert_eq!(table.len(), 3);
    assert!(table[0].starts_with("KEY"));
}

#[test]
fn test_registration_is_idempotent() {
    let mut types = HashMap::new();
    types.insert("targ_port".to_string(), TypeDescriptor::int("u16", IntEncoding::Unsigned, 2));
    let metadata =
        GadgetMetadata::from_yaml_str("params:\n  ebpf:\n    targ_port:\n      key: port\n").unwrap();
    let mut registry = ParamRegistry::new(types, metadata);

    registry.register_parameter("targ_port").unwrap();
    let first = registry.get("targ_port").unwrap().clone();
    registry.register_parameter("targ_port").unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("targ_port"), Some(&first));
    assert_eq!(first.type_hint, TypeHint::Uint16);
}

#[test]
fn test_absent_variable_is_schema_error() {
    let catalogue = BtfCatalogue::parse(&tcptop_btf()).unwrap();
    let mut registry = ParamRegistry::new(catalogue, GadgetMetadata::default());
    let err = registry.register_parameter("targ_family").unwrap_err();
    assert!(matches!(err, ParamError::MetadataNotFound(_)));
    assert_eq!(err.to_string(), "No BTF type found for variable: targ_family");
}

#[test]
fn test_invalid_override_value() {
    let catalogue = BtfCatalogue::parse(&tcptop_btf()).unwrap();
    let metadata = GadgetMetadata::from_file(metadata_file().path()).unwrap();
    let mut registry = ParamRegistry::new(catalogue, metadata);
    registry.discover().unwrap();

    let overrides = HashMap::from([("pid".to_string(), "not-a-pid".to_string())]);
    assert!(matches!(
        registry.resolve_values(&overrides),
        Err(ParamError::InvalidValue { ref key, .. }) if key == "pid"
    ));

    let too_long = HashMap::from([("comm".to_string(), "x".repeat(16))]);
    assert!(registry.resolve_values(&too_long).is_err());
}
