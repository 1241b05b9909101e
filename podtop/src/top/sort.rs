//! Multi-key record sorting.
//!
//! Keys apply lexicographically: the first key decides, later keys only
//! break ties. Each key carries its own direction. Records equal under every
//! key end up in no particular order.

use std::cmp::Ordering;

use super::columns::{ColumnSet, Extract};
use super::record::{CellValue, StatRecord};
use crate::domain::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// One sort key: a column's raw value plus a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub extract: Extract,
    pub direction: Direction,
}

impl SortKey {
    fn compare(&self, a: &CellValue, b: &CellValue) -> Ordering {
        let ord = a.total_cmp(b);
        match self.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

/// Parse `-sent,+pid,comm` into sort keys.
///
/// `-` sorts descending, `+` or no prefix ascending.
///
/// # Errors
/// Returns `UnknownSortColumn` for a name not in `set`
pub fn parse_sort_keys(set: &ColumnSet, text: &str) -> Result<Vec<SortKey>, ConfigError> {
    text.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (direction, name) = if let Some(name) = entry.strip_prefix('-') {
                (Direction::Descending, name)
            } else {
                (Direction::Ascending, entry.strip_prefix('+').unwrap_or(entry))
            };
            let column =
                set.get(name).ok_or_else(|| ConfigError::UnknownSortColumn(name.to_string()))?;
            Ok(SortKey { column: column.name.clone(), extract: column.extract.clone(), direction })
        })
        .collect()
}

/// Sort `records` in place by `keys`.
pub fn sort_records(records: &mut Vec<StatRecord>, keys: &[SortKey]) {
    if keys.is_empty() || records.len() < 2 {
        return;
    }

    // Extract every key once per record rather than once per comparison
    let mut decorated: Vec<(Vec<CellValue>, StatRecord)> = records
        .drain(..)
        .map(|record| (keys.iter().map(|k| k.extract.value(&record)).collect(), record))
        .collect();

    decorated.sort_unstable_by(|(a, _), (b, _)| {
        keys.iter()
            .zip(a.iter().zip(b))
            .map(|(key, (a, b))| key.compare(a, b))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    records.extend(decorated.into_iter().map(|(_, record)| record));
}
