//! Text rendering of a parameter registry for the `params` command.

use super::registry::{ParamRegistry, ResolvedParam};
use crate::btf::TypeCatalogue;

const HEADER: [&str; 5] = ["KEY", "VARIABLE", "TYPE", "DEFAULT", "DESCRIPTION"];

/// One line per parameter, columns padded to the widest cell.
pub fn param_table<C: TypeCatalogue>(registry: &ParamRegistry<C>) -> Vec<String> {
    let rows: Vec<[String; 5]> = registry
        .iter()
        .map(|(var_name, def)| {
            let type_name = match def.string_len {
                Some(len) => format!("{}[{len}]", def.type_hint),
                None => def.type_hint.to_string(),
            };
            [
                def.key.clone(),
                var_name.to_string(),
                type_name,
                def.default_value.clone().unwrap_or_default(),
                def.description.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths = HEADER.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let render = |cells: [&str; 5]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        padded.join(" ").trim_end().to_string()
    };

    let mut lines = vec![render(HEADER)];
    for row in &rows {
        lines.push(render([&row[0], &row[1], &row[2], &row[3], &row[4]]));
    }
    lines
}

/// `key = value` lines for the values a load would apply.
pub fn value_lines(values: &[ResolvedParam]) -> Vec<String> {
    values.iter().map(|p| format!("{} = {} ({})", p.key, p.value, p.var_name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::btf::{IntEncoding, TypeDescriptor};
    use crate::params::GadgetMetadata;
    use std::collections::HashMap;

    #[test]
    fn test_table_layout() {
        let types = HashMap::from([(
            "targ_pid".to_string(),
            TypeDescriptor::int("int", IntEncoding::Signed, 4),
        )]);
        let md = GadgetMetadata::from_yaml_str(
            "params:\n  ebpf:\n    targ_pid:\n      key: pid\n      description: PID filter\n",
        )
        .unwrap();
        let mut registry = ParamRegistry::new(types, md);
        registry.register_parameter("targ_pid").unwrap();

        let lines = param_table(&registry);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "KEY VARIABLE TYPE  DEFAULT DESCRIPTION");
        assert_eq!(lines[1], "pid targ_pid int32         PID filter");
    }
}
