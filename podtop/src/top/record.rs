//! Stat records and the envelopes that carry them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

/// One observed entity for one interval (a flow, a file, a process).
///
/// Kept as the flat JSON object it arrived as; columns pick fields by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatRecord(Map<String, Value>);

impl StatRecord {
    /// Wrap a JSON value; `None` unless it is an object.
    #[must_use]
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Field as a comparable cell value.
    #[must_use]
    pub fn cell(&self, name: &str) -> CellValue {
        self.field(name).map_or(CellValue::Missing, CellValue::from_json)
    }
}

/// `{"error": "...", "stats": [...]}` as written once per interval per node.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub stats: Option<Vec<StatRecord>>,
}

/// A single field value, ordered for sorting.
///
/// Order across variants: `Missing` < numbers < `Text`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Missing,
    Int(i128),
    Float(f64),
    Text(String),
}

impl CellValue {
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Missing,
            Value::Bool(b) => CellValue::Int(i128::from(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CellValue::Int(i128::from(i))
                } else if let Some(u) = n.as_u64() {
                    CellValue::Int(i128::from(u))
                } else {
                    CellValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Missing => 0,
            CellValue::Int(_) | CellValue::Float(_) => 1,
            CellValue::Text(_) => 2,
        }
    }

    /// Total order used by the report sort.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (CellValue::Float(a), CellValue::Float(b)) => a.total_cmp(b),
            (CellValue::Int(a), CellValue::Float(b)) => cmp_int_float(*a, *b),
            (CellValue::Float(a), CellValue::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Exact comparison of an integer with a float, consistent with
/// `f64::total_cmp` so mixed columns still sort transitively.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn cmp_int_float(a: i128, b: f64) -> Ordering {
    const EXACT: i128 = 1 << f64::MANTISSA_DIGITS;
    if (-EXACT..=EXACT).contains(&a) {
        return (a as f64).total_cmp(&b);
    }
    if b.is_nan() {
        return if b.is_sign_negative() { Ordering::Greater } else { Ordering::Less };
    }
    // Both bounds are exactly ±2^127
    if b >= i128::MAX as f64 {
        return Ordering::Less;
    }
    if b < i128::MIN as f64 {
        return Ordering::Greater;
    }
    let whole = b.trunc() as i128;
    a.cmp(&whole).then_with(|| 0.0_f64.partial_cmp(&b.fract()).unwrap_or(Ordering::Equal))
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Missing => Ok(()),
            CellValue::Int(v) => write!(f, "{v}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Text(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_variants() {
        let ok: Envelope = serde_json::from_str(r#"{"stats":[{"pid":1}]}"#).unwrap();
        assert_eq!(ok.stats.unwrap().len(), 1);

        let failed: Envelope = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert_eq!(failed.error.as_deref(), Some("boom"));
        assert!(failed.stats.is_none());

        let empty: Envelope = serde_json::from_str("{}").unwrap();
        assert!(empty.error.is_none() && empty.stats.is_none());
    }

    #[test]
    fn test_cell_conversion() {
        let record = StatRecord::from_json(json!({
            "pid": 12, "sent": 18_446_744_073_709_551_615u64, "ratio": 0.5, "comm": "curl"
        }))
        .unwrap();
        assert_eq!(record.cell("pid"), CellValue::Int(12));
        assert_eq!(record.cell("sent"), CellValue::Int(i128::from(u64::MAX)));
        assert_eq!(record.cell("ratio"), CellValue::Float(0.5));
        assert_eq!(record.cell("comm"), CellValue::Text("curl".to_string()));
        assert_eq!(record.cell("absent"), CellValue::Missing);
    }

    #[test]
    fn test_ordering_across_kinds() {
        let missing = CellValue::Missing;
        let two = CellValue::Int(2);
        let half = CellValue::Float(2.5);
        let text = CellValue::Text("a".to_string());
        assert_eq!(missing.total_cmp(&two), Ordering::Less);
        assert_eq!(two.total_cmp(&half), Ordering::Less);
        assert_eq!(half.total_cmp(&text), Ordering::Less);
        assert_eq!(text.total_cmp(&missing), Ordering::Greater);
    }

    #[test]
    fn test_mixed_ordering_is_exact_above_float_precision() {
        let big = 1_i128 << 53;
        let int_low = CellValue::Int(big);
        let int_high = CellValue::Int(big + 1);
        let float = CellValue::Float(9_007_199_254_740_992.0);

        assert_eq!(int_low.total_cmp(&float), Ordering::Equal);
        assert_eq!(float.total_cmp(&int_high), Ordering::Less);
        assert_eq!(int_high.total_cmp(&float), Ordering::Greater);
        assert_eq!(int_low.total_cmp(&int_high), Ordering::Less);

        let next_float = CellValue::Float(9_007_199_254_740_994.0);
        assert_eq!(int_high.total_cmp(&next_float), Ordering::Less);
        assert_eq!(CellValue::Int(big + 3).total_cmp(&next_float), Ordering::Greater);
    }

    #[test]
    fn test_mixed_ordering_extremes() {
        let max = CellValue::Int(i128::MAX);
        let min = CellValue::Int(i128::MIN);
        assert_eq!(max.total_cmp(&CellValue::Float(f64::INFINITY)), Ordering::Less);
        assert_eq!(max.total_cmp(&CellValue::Float(f64::NAN)), Ordering::Less);
        assert_eq!(max.total_cmp(&CellValue::Float(1e300)), Ordering::Less);
        assert_eq!(min.total_cmp(&CellValue::Float(f64::NEG_INFINITY)), Ordering::Greater);
        assert_eq!(CellValue::Float(-1e300).total_cmp(&min), Ordering::Less);
        let sent = CellValue::Int(i128::from(u64::MAX));
        assert_eq!(sent.total_cmp(&CellValue::Float(0.5)), Ordering::Greater);
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_mixed_sort_is_consistent() {
        let base = 1_i128 << 60;
        let mut cells: Vec<CellValue> = (0..200)
            .map(|i| {
                if i % 2 == 0 {
                    CellValue::Int(base + (i * 37) % 101)
                } else {
                    CellValue::Float((base + (i * 53) % 97) as f64)
                }
            })
            .collect();
        cells.sort_unstable_by(CellValue::total_cmp);
        for (i, a) in cells.iter().enumerate() {
            for b in &cells[i..] {
                assert_ne!(a.total_cmp(b), Ordering::Greater, "{a} > {b}");
            }
        }
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(StatRecord::from_json(json!([1, 2])).is_none());
    }
}
