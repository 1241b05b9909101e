//! Report columns: how each cell is pulled out of a record and laid out.
//!
//! A column has a fixed width and alignment and an [`Extract`] rule. The
//! rule yields a raw [`CellValue`] (used for sorting) and a display string
//! (used for rendering); the two differ for derived columns such as `ip`
//! (family number shown as 4/6) or `sent` (bytes shown as KiB).
//!
//! Missing fields render as an empty cell padded to the column width, for
//! every column kind.

use podtop_common::AF_INET6;

use super::record::{CellValue, StatRecord};
use crate::domain::ConfigError;

/// Horizontal placement of a cell within its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// How a column derives its value from a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extract {
    /// The field as-is
    Field(String),
    /// Address family field shown as IP version 4 or 6
    Family(String),
    /// `addr:port` from two fields
    Endpoint { addr: String, port: String },
    /// Byte counter shown in KiB
    Kib(String),
}

impl Extract {
    /// Raw value used for sorting.
    #[must_use]
    pub fn value(&self, record: &StatRecord) -> CellValue {
        match self {
            Extract::Field(field) | Extract::Family(field) | Extract::Kib(field) => {
                record.cell(field)
            }
            Extract::Endpoint { addr, port } => match (record.cell(addr), record.cell(port)) {
                (CellValue::Missing, _) => CellValue::Missing,
                (addr, CellValue::Missing) => CellValue::Text(addr.to_string()),
                (addr, port) => CellValue::Text(format!("{addr}:{port}")),
            },
        }
    }

    /// Display text for a raw value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn display(&self, value: &CellValue) -> String {
        match (self, value) {
            (_, CellValue::Missing) => String::new(),
            (Extract::Family(_), CellValue::Int(family)) => {
                let version = if *family == i128::from(AF_INET6) { "6" } else { "4" };
                version.to_string()
            }
            (Extract::Kib(_), CellValue::Int(bytes)) => (bytes / 1024).to_string(),
            (Extract::Kib(_), CellValue::Float(bytes)) => ((bytes / 1024.0).trunc() as i64).to_string(),
            (_, value) => value.to_string(),
        }
    }
}

/// One column of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub width: usize,
    pub align: Alignment,
    pub extract: Extract,
}

impl ColumnDef {
    pub fn new(name: &str, width: usize, extract: Extract) -> Self {
        Self { name: name.to_string(), width, align: Alignment::Right, extract }
    }

    /// Cell text padded to the column width. Longer text is not cut.
    #[must_use]
    pub fn render(&self, record: &StatRecord) -> String {
        let text = self.extract.display(&self.extract.value(record));
        self.pad(&text)
    }

    /// Upper-cased column name padded like a cell.
    #[must_use]
    pub fn header(&self) -> String {
        self.pad(&self.name.to_uppercase())
    }

    fn pad(&self, text: &str) -> String {
        let width = self.width;
        match self.align {
            Alignment::Right => format!("{text:>width$}"),
            Alignment::Left => format!("{text:<width$}"),
        }
    }
}

/// Every column a report may show or sort by.
#[derive(Debug, Clone)]
pub struct ColumnSet {
    columns: Vec<ColumnDef>,
    defaults: Vec<&'static str>,
}

/// Columns shown by the TCP report when none are requested.
pub const TCP_DEFAULT_COLUMNS: [&str; 11] = [
    "node",
    "namespace",
    "pod",
    "container",
    "pid",
    "comm",
    "ip",
    "saddr",
    "daddr",
    "sent",
    "received",
];

/// Default sort of the TCP report.
pub const TCP_DEFAULT_SORT: &str = "-sent,-received";

impl ColumnSet {
    /// Columns of the per-connection TCP traffic report.
    #[must_use]
    pub fn tcp() -> Self {
        let field = |name: &str| Extract::Field(name.to_string());
        let endpoint = |addr: &str, port: &str| Extract::Endpoint {
            addr: addr.to_string(),
            port: port.to_string(),
        };
        let columns = vec![
            ColumnDef::new("node", 16, field("node")),
            ColumnDef::new("namespace", 16, field("namespace")),
            ColumnDef::new("pod", 30, field("pod")),
            ColumnDef::new("container", 16, field("container")),
            ColumnDef::new("pid", 7, field("pid")),
            ColumnDef::new("comm", 16, field("comm")),
            ColumnDef::new("ip", 3, Extract::Family("family".to_string())),
            ColumnDef::new("saddr", 51, endpoint("saddr", "sport")),
            ColumnDef::new("daddr", 51, endpoint("daddr", "dport")),
            ColumnDef::new("sent", 7, Extract::Kib("sent".to_string())),
            ColumnDef::new("received", 7, Extract::Kib("received".to_string())),
            ColumnDef::new("mountnsid", 12, field("mountnsid")),
        ];
        Self { columns, defaults: TCP_DEFAULT_COLUMNS.to_vec() }
    }

    /// Column named `name`, case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Columns shown when the user does not choose any.
    #[must_use]
    pub fn default_columns(&self) -> Vec<ColumnDef> {
        self.defaults.iter().filter_map(|name| self.get(name).cloned()).collect()
    }

    /// Parse a comma-separated column list.
    ///
    /// Each entry is `name` or `name:width`; a negative width left-aligns.
    ///
    /// # Errors
    /// Returns an error for unknown names or unparsable widths
    pub fn parse_columns(&self, text: &str) -> Result<Vec<ColumnDef>, ConfigError> {
        text.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (name, width) = match entry.split_once(':') {
                    Some((name, width)) => (name, Some(width)),
                    None => (entry, None),
                };
                let mut column = self
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownColumn(name.to_string()))?;
                if let Some(width) = width {
                    let width: i64 =
                        width.parse().map_err(|_| ConfigError::BadWidth(entry.to_string()))?;
                    column.align = if width < 0 { Alignment::Left } else { Alignment::Right };
                    column.width = usize::try_from(width.unsigned_abs())
                        .map_err(|_| ConfigError::BadWidth(entry.to_string()))?;
                }
                Ok(column)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> StatRecord {
        StatRecord::from_json(value).unwrap()
    }

    #[test]
    fn test_right_justified_text_and_numbers() {
        let r = record(json!({"iface": "eth0", "pid": 42}));
        let text = ColumnDef::new("iface", 10, Extract::Field("iface".to_string()));
        let num = ColumnDef::new("pid", 5, Extract::Field("pid".to_string()));
        assert_eq!(text.render(&r), "      eth0");
        assert_eq!(num.render(&r), "   42");
    }

    #[test]
    fn test_missing_field_placeholder() {
        let r = record(json!({}));
        let set = ColumnSet::tcp();
        for name in ["comm", "pid", "ip", "saddr", "sent"] {
            let column = set.get(name).unwrap();
            assert_eq!(column.render(&r), " ".repeat(column.width), "{name}");
        }
    }

    #[test]
    fn test_derived_columns() {
        let r = record(json!({
            "family": 10, "saddr": "::1", "sport": 443, "sent": 4096, "received": 1023
        }));
        let set = ColumnSet::tcp();
        assert_eq!(set.get("ip").unwrap().render(&r).trim(), "6");
        assert_eq!(set.get("saddr").unwrap().render(&r).trim(), "::1:443");
        assert_eq!(set.get("sent").unwrap().render(&r).trim(), "4");
        assert_eq!(set.get("received").unwrap().render(&r).trim(), "0");

        let v4 = record(json!({"family": 2}));
        assert_eq!(set.get("ip").unwrap().render(&v4).trim(), "4");
    }

    #[test]
    fn test_overlong_value_not_truncated() {
        let r = record(json!({"comm": "a-very-long-command-name"}));
        let column = ColumnDef::new("comm", 4, Extract::Field("comm".to_string()));
        assert_eq!(column.render(&r), "a-very-long-command-name");
    }

    #[test]
    fn test_parse_columns_with_widths() {
        let set = ColumnSet::tcp();
        let columns = set.parse_columns("pid, comm:-20,sent:9").unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[1].width, 20);
        assert_eq!(columns[1].align, Alignment::Left);
        assert_eq!(columns[2].width, 9);
        assert_eq!(columns[2].align, Alignment::Right);

        assert_eq!(set.parse_columns("bogus"), Err(ConfigError::UnknownColumn("bogus".into())));
        assert_eq!(set.parse_columns("pid:x"), Err(ConfigError::BadWidth("pid:x".into())));
    }

    #[test]
    fn test_default_columns_hide_mountnsid() {
        let set = ColumnSet::tcp();
        let names: Vec<String> = set.default_columns().into_iter().map(|c| c.name).collect();
        assert_eq!(names, TCP_DEFAULT_COLUMNS.to_vec());
        assert!(set.get("mountnsid").is_some());
    }
}
