//! Drives a report: one reader task per node plus the flush timer.
//!
//! ```text
//!   node-a stream ──► reader task ──┐
//!   node-b stream ──► reader task ──┼──► StatsCollector ◄── flush every interval
//!   node-c stream ──► reader task ──┘                          │
//!                                                               ▼
//!                                                           Reporter sink
//! ```
//!
//! The run ends when the shutdown future completes or every stream reaches
//! EOF. Remaining readers are aborted and one last flush runs if data is
//! still pending.

use log::{debug, info, warn};
use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinSet;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::collector::StatsCollector;
use super::report::Reporter;
use crate::domain::NodeName;

/// A named line-delimited JSON stream.
pub struct NodeSource {
    pub node: NodeName,
    reader: Box<dyn AsyncRead + Send + Unpin>,
}

impl NodeSource {
    /// Open `path` for `node`; `-` reads standard input.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened
    pub async fn open(node: NodeName, path: &Path) -> std::io::Result<Self> {
        if path == Path::new("-") {
            return Ok(Self::from_reader(node, tokio::io::stdin()));
        }
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::from_reader(node, file))
    }

    pub fn from_reader(node: NodeName, reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self { node, reader: Box::new(reader) }
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Interrupted,
    DurationElapsed,
    StreamsClosed,
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ExitReason::Interrupted => "interrupted",
            ExitReason::DurationElapsed => "duration limit reached",
            ExitReason::StreamsClosed => "all streams closed",
        })
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Flush cycles that wrote at least one record
    pub cycles: u64,
    pub lines: u64,
    pub decode_errors: u64,
    pub node_errors: u64,
    pub exit_reason: ExitReason,
}

/// Read every source into the reporter's collector and flush on `interval`
/// until `shutdown` resolves or all sources end.
///
/// # Errors
/// Only report sink write failures; stream problems are logged and skipped
pub async fn run<W, F>(
    reporter: &mut Reporter<W>,
    sources: Vec<NodeSource>,
    interval: Duration,
    shutdown: F,
) -> std::io::Result<RunSummary>
where
    W: Write,
    F: Future<Output = ExitReason>,
{
    let collector = reporter.collector().clone();
    let mut readers = JoinSet::new();
    for source in sources {
        info!("reading stats from node {}", source.node);
        readers.spawn(read_node(source, collector.clone()));
    }

    let mut ticker = interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut cycles = 0u64;
    let exit_reason = loop {
        tokio::select! {
            _ = ticker.tick() => {
                if reporter.flush()? > 0 {
                    cycles += 1;
                }
            }
            reason = &mut shutdown => break reason,
            joined = readers.join_next() => match joined {
                Some(Err(e)) if e.is_panic() => warn!("stream reader panicked: {e}"),
                Some(_) => {}
                None => break ExitReason::StreamsClosed,
            },
        }
    };

    readers.abort_all();
    while readers.join_next().await.is_some() {}

    if collector.has_pending() {
        debug!("final flush");
        if reporter.flush()? > 0 {
            cycles += 1;
        }
    }

    let counts = collector.counters().snapshot();
    Ok(RunSummary {
        cycles,
        lines: counts.lines,
        decode_errors: counts.decode_errors,
        node_errors: counts.node_errors,
        exit_reason,
    })
}

async fn read_node(source: NodeSource, collector: Arc<StatsCollector>) {
    let NodeSource { node, reader } = source;
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                if let Err(e) = collector.ingest(&line, &node) {
                    warn!("{e}");
                }
            }
            Ok(None) => {
                debug!("stream for node {node} closed");
                return;
            }
            Err(e) => {
                warn!("reading node {node}: {e}");
                return;
            }
        }
    }
}
