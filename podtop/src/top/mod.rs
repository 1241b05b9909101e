//! Stats pipeline: per-node batches in, one sorted fixed-width report out.
//!
//! - [`collector`]: shared per-node accumulation state
//! - [`columns`] / [`sort`]: what a report shows and in which order
//! - [`report`]: the flush cycle
//! - [`runner`]: tokio tasks that feed the collector and drive flushes

pub mod collector;
pub mod columns;
pub mod record;
pub mod report;
pub mod runner;
pub mod sort;

pub use collector::{CounterSnapshot, StatsCollector};
pub use columns::{Alignment, ColumnDef, ColumnSet, Extract, TCP_DEFAULT_COLUMNS, TCP_DEFAULT_SORT};
pub use record::{CellValue, Envelope, StatRecord};
pub use report::{OutputMode, ReportConfig, Reporter, DEFAULT_MAX_ROWS};
pub use runner::{run, ExitReason, NodeSource, RunSummary};
pub use sort::{parse_sort_keys, sort_records, Direction, SortKey};
