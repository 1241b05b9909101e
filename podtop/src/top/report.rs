//! The flush cycle: drain, flatten, sort, truncate, render.

use log::debug;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Arc;

use super::collector::StatsCollector;
use super::columns::{ColumnDef, ColumnSet, TCP_DEFAULT_SORT};
use super::record::StatRecord;
use super::sort::{parse_sort_keys, sort_records, SortKey};
use crate::domain::ConfigError;

/// Default row cap per cycle.
pub const DEFAULT_MAX_ROWS: usize = 20;

/// How surviving records are written to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Fixed-width, space-joined text
    #[default]
    Columns,
    /// One JSON object per line
    Json,
}

impl FromStr for OutputMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "columns" => Ok(OutputMode::Columns),
            "json" => Ok(OutputMode::Json),
            _ => Err(ConfigError::BadOutputMode(s.to_string())),
        }
    }
}

/// Sort and format settings, fixed for the whole run.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub sort_by: Vec<SortKey>,
    pub max_rows: usize,
    pub columns: Vec<ColumnDef>,
    /// Print a header line before each non-empty cycle
    pub header: bool,
    pub output: OutputMode,
}

impl ReportConfig {
    /// Default TCP report: default columns, `-sent,-received`, 20 rows.
    ///
    /// # Errors
    /// Only if the built-in sort names a column the catalogue lacks
    pub fn tcp_defaults() -> Result<Self, ConfigError> {
        Self::from_specs(&ColumnSet::tcp(), TCP_DEFAULT_SORT, DEFAULT_MAX_ROWS, None)
    }

    /// Build from textual sort and column specs against `set`.
    ///
    /// `columns == None` selects the set's default columns.
    ///
    /// # Errors
    /// Returns the first unknown column or bad width found
    pub fn from_specs(
        set: &ColumnSet,
        sort_by: &str,
        max_rows: usize,
        columns: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let columns = match columns {
            Some(text) => set.parse_columns(text)?,
            None => set.default_columns(),
        };
        Ok(Self {
            sort_by: parse_sort_keys(set, sort_by)?,
            max_rows,
            columns,
            header: false,
            output: OutputMode::Columns,
        })
    }

    #[must_use]
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }
}

/// Consumer side of the collector: renders one report per flush.
pub struct Reporter<W: Write> {
    collector: Arc<StatsCollector>,
    config: ReportConfig,
    sink: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(collector: Arc<StatsCollector>, config: ReportConfig, sink: W) -> Self {
        Self { collector, config, sink }
    }

    #[must_use]
    pub fn collector(&self) -> &Arc<StatsCollector> {
        &self.collector
    }

    #[must_use]
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Run one flush cycle. Returns the number of records written.
    ///
    /// # Errors
    /// Only sink write failures
    pub fn flush(&mut self) -> io::Result<usize> {
        let snapshot = self.collector.take_all();
        let nodes = snapshot.len();

        let mut records: Vec<StatRecord> = snapshot.into_values().flatten().collect();
        let total = records.len();
        sort_records(&mut records, &self.config.sort_by);
        records.truncate(self.config.max_rows);
        debug!("flush: {nodes} nodes, {total} records, {} shown", records.len());

        if records.is_empty() {
            return Ok(0);
        }

        if self.config.header && self.config.output == OutputMode::Columns {
            let header = self.header_line();
            writeln!(self.sink, "{header}")?;
        }
        for record in &records {
            match self.config.output {
                OutputMode::Columns => {
                    let line = self.render_line(record);
                    writeln!(self.sink, "{line}")?;
                }
                OutputMode::Json => {
                    serde_json::to_writer(&mut self.sink, record)?;
                    writeln!(self.sink)?;
                }
            }
        }
        self.sink.flush()?;
        Ok(records.len())
    }

    /// One record as fixed-width cells joined by single spaces.
    #[must_use]
    pub fn render_line(&self, record: &StatRecord) -> String {
        let cells: Vec<String> = self.config.columns.iter().map(|c| c.render(record)).collect();
        cells.join(" ")
    }

    #[must_use]
    pub fn header_line(&self) -> String {
        let cells: Vec<String> = self.config.columns.iter().map(ColumnDef::header).collect();
        cells.join(" ")
    }

    /// Give back the sink, e.g. to inspect a buffer in tests.
    pub fn into_sink(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeName;

    fn reporter(sort: &str, max_rows: usize, columns: &str) -> Reporter<Vec<u8>> {
        let config = ReportConfig::from_specs(&ColumnSet::tcp(), sort, max_rows, Some(columns))
            .unwrap()
            .with_header(true);
        Reporter::new(Arc::new(StatsCollector::new()), config, Vec::new())
    }

    fn output(reporter: Reporter<Vec<u8>>) -> Vec<String> {
        String::from_utf8(reporter.into_sink()).unwrap().lines().map(str::to_string).collect()
    }

    #[test]
    fn test_zero_nodes_zero_lines() {
        let mut r = reporter("-sent", 10, "pid");
        assert_eq!(r.flush().unwrap(), 0);
        assert!(output(r).is_empty());
    }

    #[test]
    fn test_max_rows_zero() {
        let mut r = reporter("-sent", 0, "pid");
        r.collector().ingest(r#"{"stats":[{"pid":1}]}"#, &NodeName::from("n")).unwrap();
        assert_eq!(r.flush().unwrap(), 0);
        assert!(output(r).is_empty());
    }

    #[test]
    fn test_header_precedes_rows() {
        let mut r = reporter("pid", 10, "pid:-5,comm:6");
        r.collector().ingest(r#"{"stats":[{"pid":7,"comm":"nginx"}]}"#, &NodeName::from("n")).unwrap();
        r.flush().unwrap();
        assert_eq!(output(r), vec!["PID     COMM".to_string(), "7      nginx".to_string()]);
    }

    #[test]
    fn test_json_output() {
        let config = ReportConfig::from_specs(&ColumnSet::tcp(), "pid", 10, Some("pid"))
            .unwrap()
            .with_output(OutputMode::Json);
        let mut r = Reporter::new(Arc::new(StatsCollector::new()), config, Vec::new());
        r.collector().ingest(r#"{"stats":[{"pid":2},{"pid":1}]}"#, &NodeName::from("n")).unwrap();
        assert_eq!(r.flush().unwrap(), 2);
        assert_eq!(output(r), vec![r#"{"pid":1}"#.to_string(), r#"{"pid":2}"#.to_string()]);
    }

    #[test]
    fn test_output_mode_parse() {
        assert_eq!("JSON".parse::<OutputMode>().unwrap(), OutputMode::Json);
        assert!("xml".parse::<OutputMode>().is_err());
    }

    #[test]
    fn test_tcp_defaults() {
        let config = ReportConfig::tcp_defaults().unwrap();
        assert_eq!(config.max_rows, 20);
        assert_eq!(config.columns.len(), 11);
        let widths: Vec<usize> = config.columns.iter().map(|c| c.width).collect();
        assert_eq!(widths, vec![16, 16, 30, 16, 7, 16, 3, 51, 51, 7, 7]);
    }
}
