//! Aggregation output tables

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What the value column of an [`AggregationTable`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultKind {
    /// Distance- or population-weighted mean of the measure
    WeightedMeasure,
    /// Distance in meters to the closest reference point
    MinDistance,
}

impl ResultKind {
    /// Column name used when the table is written out
    pub fn column_name(self) -> &'static str {
        match self {
            ResultKind::WeightedMeasure => "wmeasure",
            ResultKind::MinDistance => "mindist",
        }
    }
}

/// One output row: query id and its scalar result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationRecord {
    pub id: String,
    pub value: f64,
}

/// Result of an aggregation call, one record per query point in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationTable {
    kind: ResultKind,
    records: Vec<AggregationRecord>,
}

impl AggregationTable {
    /// Pair ids with values. Both must have the same length.
    pub(crate) fn from_parts(kind: ResultKind, ids: &[String], values: Vec<f64>) -> Result<Self> {
        Error::check_len("result values", ids.len(), values.len())?;
        let records = ids
            .iter()
            .zip(values)
            .map(|(id, value)| AggregationRecord {
                id: id.clone(),
                value,
            })
            .collect();
        Ok(Self { kind, records })
    }

    pub fn kind(&self) -> ResultKind {
        self.kind
    }

    pub fn records(&self) -> &[AggregationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AggregationRecord> {
        self.records.iter()
    }

    /// Value column
    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.value).collect()
    }

    /// Look up the value for an id (first match).
    pub fn get(&self, id: &str) -> Option<f64> {
        self.records.iter().find(|r| r.id == id).map(|r| r.value)
    }
}

impl IntoIterator for AggregationTable {
    type Item = AggregationRecord;
    type IntoIter = std::vec::IntoIter<AggregationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Coordinate, CoordinateSet};
    use crate::points::QueryPoints;

    #[test]
    fn test_table_keeps_order() {
        let coords: CoordinateSet = (0..3).map(|i| Coordinate::new(i as f64, 0.0)).collect();
        let q = QueryPoints::new(vec!["c".into(), "a".into(), "b".into()], coords).unwrap();
        let table = q.to_table(ResultKind::MinDistance, vec![3.0, 1.0, 2.0]).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.kind().column_name(), "mindist");
        let ids: Vec<_> = table.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
        assert_eq!(table.get("a"), Some(1.0));
        assert_eq!(table.values(), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_from_parts_rejects_short_values() {
        let ids = vec!["a".to_string(), "b".to_string()];
        let err = AggregationTable::from_parts(ResultKind::WeightedMeasure, &ids, vec![1.0]).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { expected: 2, actual: 1, .. }));
    }
}
