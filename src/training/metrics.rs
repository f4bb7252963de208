//! Holdout evaluation metrics for the bracket classifier

use std::collections::BTreeMap;
use std::fmt;

/// Per-bracket prediction tally
#[derive(Debug, Clone, Copy, Default)]
pub struct BracketTally {
    pub correct: usize,
    pub total: usize,
}

/// Metrics accumulated over a set of predictions.
///
/// Brackets are ordinal, so besides exact accuracy we track how often
/// the prediction lands within one bracket of the truth.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    /// Exact bracket matches
    pub correct: usize,
    /// Predictions within one bracket of the actual label
    pub adjacent: usize,
    /// Total predictions
    pub total: usize,
    /// Tally per actual bracket index
    pub per_bracket: BTreeMap<usize, BracketTally>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one prediction against its actual bracket index
    pub fn update(&mut self, predicted: usize, actual: usize) {
        self.total += 1;
        let tally = self.per_bracket.entry(actual).or_default();
        tally.total += 1;
        if predicted == actual {
            self.correct += 1;
            tally.correct += 1;
        }
        if predicted.abs_diff(actual) <= 1 {
            self.adjacent += 1;
        }
    }

    /// Exact-bracket accuracy
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    /// Within-one-bracket accuracy
    pub fn adjacent_accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.adjacent as f64 / self.total as f64
        }
    }

    /// Reset all counts
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Merge another metrics instance
    pub fn merge(&mut self, other: &Metrics) {
        self.correct += other.correct;
        self.adjacent += other.adjacent;
        self.total += other.total;
        for (index, tally) in &other.per_bracket {
            let entry = self.per_bracket.entry(*index).or_default();
            entry.correct += tally.correct;
            entry.total += tally.total;
        }
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Acc: {:.1}% | Within one bracket: {:.1}% | {} predictions",
            self.accuracy() * 100.0,
            self.adjacent_accuracy() * 100.0,
            self.total
        )
    }
}
