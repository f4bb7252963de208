//! Expense bucketizer: continuous dollars to ordered brackets
//!
//! N+1 boundary edges produce N intervals. Interior boundaries are
//! right-inclusive (a value equal to an interior edge falls into the
//! lower bracket); the first and last edges are open, so values at or
//! outside them are out of range and map to no bracket at all.

use crate::{Bracket, BucketedRecord, ExpenseError, Record, Result};

/// Maps a continuous expense value to its ordinal bracket
#[derive(Debug, Clone)]
pub struct Bucketizer {
    edges: Vec<f64>,
}

impl Bucketizer {
    /// Build from boundary edges; requires at least two strictly
    /// increasing finite values.
    pub fn new(edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(ExpenseError::Config(format!(
                "bracket edges need at least 2 values, got {}",
                edges.len()
            )));
        }
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(ExpenseError::Config(
                "bracket edges must be finite".to_string(),
            ));
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ExpenseError::Config(
                "bracket edges must be strictly increasing".to_string(),
            ));
        }
        Ok(Bucketizer { edges })
    }

    /// Number of brackets
    pub fn len(&self) -> usize {
        self.edges.len() - 1
    }

    /// The ordered bracket list
    pub fn brackets(&self) -> Vec<Bracket> {
        (0..self.len()).map(|i| self.bracket(i)).collect()
    }

    /// Bracket at a given index; panics if out of bounds
    pub fn bracket(&self, index: usize) -> Bracket {
        Bracket {
            index,
            lower: self.edges[index],
            upper: self.edges[index + 1],
        }
    }

    /// Map a value to its bracket, or `None` when out of range.
    ///
    /// Out-of-range values are not an error; callers drop them from
    /// training.
    pub fn bucketize(&self, value: f64) -> Option<Bracket> {
        let first = self.edges[0];
        let last = *self.edges.last().unwrap_or(&first);
        if !value.is_finite() || value <= first || value >= last {
            return None;
        }
        // edges[i] < value <= edges[i + 1]
        let index = self.edges.partition_point(|e| *e < value) - 1;
        Some(self.bracket(index))
    }

    /// Bucketize a record, dropping it when the expense is out of range
    pub fn bucketize_record(&self, record: &Record) -> Option<BucketedRecord> {
        self.bucketize(record.expense).map(|bracket| BucketedRecord {
            profile: record.profile.clone(),
            bracket,
        })
    }

    /// Bucketize a dataset, silently dropping out-of-range records
    pub fn bucketize_all(&self, records: &[Record]) -> Vec<BucketedRecord> {
        let bucketed: Vec<BucketedRecord> = records
            .iter()
            .filter_map(|r| self.bucketize_record(r))
            .collect();
        let dropped = records.len() - bucketed.len();
        if dropped > 0 {
            log::debug!("Dropped {} records with out-of-range expenses", dropped);
        }
        bucketed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Bucketizer {
        Bucketizer::new(vec![
            120.0, 150.0, 180.0, 210.0, 240.0, 270.0, 300.0, 330.0, 360.0,
        ])
        .unwrap()
    }

    #[test]
    fn test_reference_examples() {
        let b = reference();
        assert_eq!(b.bucketize(165.0).unwrap().lower, 150.0);
        assert_eq!(b.bucketize(119.0), None);
        assert_eq!(b.bucketize(360.0), None);
    }

    #[test]
    fn test_interior_boundary_falls_low() {
        let b = reference();
        // 150 sits on an interior edge: lower bracket
        assert_eq!(b.bucketize(150.0).unwrap().lower, 120.0);
        assert_eq!(b.bucketize(330.0).unwrap().lower, 300.0);
    }

    #[test]
    fn test_outer_edges_are_open() {
        let b = reference();
        assert_eq!(b.bucketize(120.0), None);
        assert_eq!(b.bucketize(120.01).unwrap().lower, 120.0);
        assert_eq!(b.bucketize(359.99).unwrap().lower, 330.0);
        assert_eq!(b.bucketize(400.0), None);
    }

    #[test]
    fn test_non_finite_is_missing() {
        let b = reference();
        assert_eq!(b.bucketize(f64::NAN), None);
        assert_eq!(b.bucketize(f64::INFINITY), None);
    }

    #[test]
    fn test_monotonic_in_value() {
        let b = reference();
        let mut last_index = None;
        let mut v = 100.0;
        while v < 400.0 {
            if let Some(bracket) = b.bucketize(v) {
                if let Some(prev) = last_index {
                    assert!(bracket.index >= prev, "bracket index dropped at {}", v);
                }
                last_index = Some(bracket.index);
            }
            v += 0.7;
        }
    }

    #[test]
    fn test_bracket_list() {
        let b = reference();
        let brackets = b.brackets();
        assert_eq!(brackets.len(), 8);
        assert_eq!(brackets[0].lower, 120.0);
        assert_eq!(brackets[7].upper, 360.0);
    }

    #[test]
    fn test_rejects_bad_edges() {
        assert!(Bucketizer::new(vec![120.0]).is_err());
        assert!(Bucketizer::new(vec![120.0, 120.0]).is_err());
        assert!(Bucketizer::new(vec![150.0, 120.0]).is_err());
        assert!(Bucketizer::new(vec![120.0, f64::NAN]).is_err());
    }
}
