//! One-shot trainer: bucketize, split, fit, evaluate
//!
//! Training is a single synchronous batch pass over the in-memory
//! table. The split is in dataset order, without shuffling, matching
//! the survey's original training setup.

use crate::features::encoding::FeatureMatrix;
use crate::features::Bucketizer;
use crate::model::ExpenseTree;
use crate::training::importance::{permutation_importance, FeatureImportance};
use crate::training::metrics::Metrics;
use crate::{Bracket, BucketedRecord, Config, ExpenseError, Record, Result};

/// Result of one training session
#[derive(Debug)]
pub struct TrainReport {
    /// Rows used to fit the tree
    pub n_train: usize,
    /// Rows held out for evaluation
    pub n_holdout: usize,
    /// Records dropped for out-of-range expenses
    pub n_dropped: usize,
    /// Record count per bracket over the whole bucketized set
    pub label_counts: Vec<(Bracket, usize)>,
    /// Holdout metrics (training-set metrics when no holdout rows)
    pub metrics: Metrics,
    /// Permutation importance ranking over the training table
    pub importance: Vec<FeatureImportance>,
}

/// Fits one bracket classifier per session
pub struct Trainer {
    bucketizer: Bucketizer,
    config: Config,
}

impl Trainer {
    pub fn new(config: &Config) -> Result<Self> {
        let fraction = config.training.holdout_fraction;
        if !(0.0..1.0).contains(&fraction) {
            return Err(ExpenseError::Config(format!(
                "holdout_fraction must be in [0, 1), got {}",
                fraction
            )));
        }
        Ok(Trainer {
            bucketizer: Bucketizer::new(config.brackets.edges.clone())?,
            config: config.clone(),
        })
    }

    pub fn bucketizer(&self) -> &Bucketizer {
        &self.bucketizer
    }

    /// Train once on a cleaned dataset.
    ///
    /// Returns the fitted tree together with the session report.
    pub fn train(&self, records: &[Record]) -> Result<(ExpenseTree, TrainReport)> {
        let bucketed = self.bucketizer.bucketize_all(records);
        if bucketed.is_empty() {
            return Err(ExpenseError::EmptyDataset(
                "bucketized training set".to_string(),
            ));
        }
        let n_dropped = records.len() - bucketed.len();

        // Ordered split, no shuffle
        let n_holdout =
            ((bucketed.len() as f64) * self.config.training.holdout_fraction).round() as usize;
        let n_holdout = n_holdout.min(bucketed.len() - 1);
        let (train_rows, holdout_rows) = bucketed.split_at(bucketed.len() - n_holdout);

        let train_matrix = FeatureMatrix::from_records(train_rows);
        let tree = ExpenseTree::fit(&train_matrix, &self.config.model)?;

        let eval_rows = if holdout_rows.is_empty() {
            train_rows
        } else {
            holdout_rows
        };
        let mut metrics = Metrics::new();
        let eval_matrix = FeatureMatrix::from_records(eval_rows);
        let predictions = tree.predict_batch(&eval_matrix.x)?;
        for (predicted, actual) in predictions.iter().zip(eval_matrix.y.iter()) {
            metrics.update(*predicted, *actual as usize);
        }

        let importance = permutation_importance(
            &tree,
            &train_matrix,
            self.config.training.importance_rounds,
            self.config.training.seed,
        )?;

        let report = TrainReport {
            n_train: train_rows.len(),
            n_holdout: holdout_rows.len(),
            n_dropped,
            label_counts: self.count_labels(&bucketed),
            metrics,
            importance,
        };
        log::info!(
            "Trained on {} rows, {} held out, {} dropped: {}",
            report.n_train,
            report.n_holdout,
            report.n_dropped,
            report.metrics
        );
        Ok((tree, report))
    }

    fn count_labels(&self, bucketed: &[BucketedRecord]) -> Vec<(Bracket, usize)> {
        self.bucketizer
            .brackets()
            .into_iter()
            .map(|bracket| {
                let count = bucketed
                    .iter()
                    .filter(|r| r.bracket.index == bracket.index)
                    .count();
                (bracket, count)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Gender, Living, Profile, Transport};

    fn profile(smoking: bool, age: u8) -> Profile {
        Profile {
            gender: Gender::Male,
            age,
            study_year: 2,
            living: Living::Home,
            scholarship: false,
            part_time_job: false,
            transport: Transport::None,
            smoking,
            drinks: false,
            games_hobbies: true,
            cosmetics: false,
            subscription: true,
        }
    }

    /// Smokers land in the 300 bracket, non-smokers in the 150 bracket
    fn dataset(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| {
                let smoking = i % 2 == 0;
                Record {
                    profile: profile(smoking, 19 + (i % 5) as u8),
                    expense: if smoking { 310.0 } else { 160.0 },
                }
            })
            .collect()
    }

    #[test]
    fn test_train_produces_report() {
        let config = Config::default();
        let trainer = Trainer::new(&config).unwrap();
        let records = dataset(40);
        let (_tree, report) = trainer.train(&records).unwrap();
        assert_eq!(report.n_train + report.n_holdout, 40);
        assert_eq!(report.n_holdout, 12);
        assert_eq!(report.n_dropped, 0);
        assert_eq!(report.importance.len(), 12);
        // Perfectly separable by smoking
        assert_eq!(report.metrics.accuracy(), 1.0);
    }

    #[test]
    fn test_out_of_range_rows_are_dropped() {
        let config = Config::default();
        let trainer = Trainer::new(&config).unwrap();
        let mut records = dataset(20);
        records.push(Record {
            profile: profile(false, 22),
            expense: 1000.0,
        });
        let (_tree, report) = trainer.train(&records).unwrap();
        assert_eq!(report.n_dropped, 1);
    }

    #[test]
    fn test_single_bracket_fails() {
        let config = Config::default();
        let trainer = Trainer::new(&config).unwrap();
        let records: Vec<Record> = (0..10)
            .map(|i| Record {
                profile: profile(i % 2 == 0, 20),
                expense: 160.0,
            })
            .collect();
        let err = trainer.train(&records).unwrap_err();
        assert!(matches!(err, ExpenseError::LabelDiversity { found: 1 }));
    }

    #[test]
    fn test_label_counts_cover_all_brackets() {
        let config = Config::default();
        let trainer = Trainer::new(&config).unwrap();
        let (_tree, report) = trainer.train(&dataset(20)).unwrap();
        assert_eq!(report.label_counts.len(), 8);
        let total: usize = report.label_counts.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn test_rejects_bad_holdout_fraction() {
        let mut config = Config::default();
        config.training.holdout_fraction = 1.5;
        assert!(Trainer::new(&config).is_err());
    }

    #[test]
    fn test_all_rows_out_of_range() {
        let config = Config::default();
        let trainer = Trainer::new(&config).unwrap();
        let records = vec![Record {
            profile: profile(true, 20),
            expense: 50.0,
        }];
        let err = trainer.train(&records).unwrap_err();
        assert!(matches!(err, ExpenseError::EmptyDataset(_)));
    }
}
