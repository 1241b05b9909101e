//! Per-node accumulation of stat batches.
//!
//! Many stream readers call [`StatsCollector::ingest`]; one flush cycle calls
//! [`StatsCollector::take_all`]. Both go through the same mutex, and both
//! critical sections are a single map operation. Parsing happens before the
//! lock is taken, sorting and rendering after the map has been swapped out.
//!
//! At most one batch is held per node: a newer batch replaces the older one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::record::{Envelope, StatRecord};
use crate::domain::{NodeName, StreamError};

/// Shared accumulation state.
#[derive(Debug, Default)]
pub struct StatsCollector {
    nodes: Mutex<HashMap<NodeName, Vec<StatRecord>>>,
    counters: StreamCounters,
}

impl StatsCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one envelope line from `node` and store its batch.
    ///
    /// Returns the number of records stored. On error nothing is stored and
    /// the node's previous batch, if any, is kept.
    ///
    /// # Errors
    /// `Decode` for malformed JSON, `Node` when the envelope carries an error
    pub fn ingest(&self, line: &str, node: &NodeName) -> Result<usize, StreamError> {
        self.counters.lines.fetch_add(1, Ordering::Relaxed);

        let envelope: Envelope = serde_json::from_str(line).map_err(|source| {
            self.counters.decode_errors.fetch_add(1, Ordering::Relaxed);
            StreamError::Decode { node: node.clone(), line: line.to_string(), source }
        })?;

        if let Some(message) = envelope.error.filter(|e| !e.is_empty()) {
            self.counters.node_errors.fetch_add(1, Ordering::Relaxed);
            return Err(StreamError::Node { node: node.clone(), message });
        }

        let batch = envelope.stats.unwrap_or_default();
        let count = batch.len();
        self.lock().insert(node.clone(), batch);
        Ok(count)
    }

    /// Take every stored batch and leave the state empty.
    pub fn take_all(&self) -> HashMap<NodeName, Vec<StatRecord>> {
        std::mem::take(&mut *self.lock())
    }

    /// True if any node has a batch waiting for the next flush.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.lock().is_empty()
    }

    /// Number of nodes with a stored batch.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn counters(&self) -> &StreamCounters {
        &self.counters
    }

    // A panic elsewhere cannot leave the map half-updated
    fn lock(&self) -> MutexGuard<'_, HashMap<NodeName, Vec<StatRecord>>> {
        self.nodes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lock-free totals of what the collector has seen.
#[derive(Debug, Default)]
pub struct StreamCounters {
    lines: AtomicU64,
    decode_errors: AtomicU64,
    node_errors: AtomicU64,
}

/// Point-in-time copy of [`StreamCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub lines: u64,
    pub decode_errors: u64,
    pub node_errors: u64,
}

impl StreamCounters {
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            lines: self.lines.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            node_errors: self.node_errors.load(Ordering::Relaxed),
        }
    }
}
