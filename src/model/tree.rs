//! Decision-tree classifier over the encoded survey table
//!
//! A single tree (Gini criterion) keeps the model interpretable. It is
//! fitted once per session and held in memory; there is no persisted
//! model format.

use smartcore::linalg::naive::dense_matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters, SplitCriterion,
};

use crate::features::encoding::FeatureMatrix;
use crate::{ExpenseError, ModelConfig, Result};

/// A fitted expense-bracket classifier.
///
/// Labels are bracket indices; the caller maps them back to brackets.
#[derive(Debug)]
pub struct ExpenseTree {
    tree: DecisionTreeClassifier<f64>,
}

impl ExpenseTree {
    /// Fit on an encoded training table.
    ///
    /// Fails with a configuration error when fewer than two distinct
    /// bracket labels are present; there is no fallback.
    pub fn fit(matrix: &FeatureMatrix, config: &ModelConfig) -> Result<Self> {
        let found = matrix.distinct_labels();
        if found < 2 {
            return Err(ExpenseError::LabelDiversity { found });
        }
        let x = DenseMatrix::from_2d_vec(&matrix.x);
        let params = DecisionTreeClassifierParameters::default()
            .with_criterion(SplitCriterion::Gini)
            .with_max_depth(config.max_depth)
            .with_min_samples_leaf(config.min_samples_leaf)
            .with_min_samples_split(config.min_samples_split);
        let tree = DecisionTreeClassifier::fit(&x, &matrix.y, params)
            .map_err(|e| ExpenseError::Model(e.to_string()))?;
        log::debug!(
            "Fitted decision tree on {} rows, {} labels",
            matrix.len(),
            found
        );
        Ok(ExpenseTree { tree })
    }

    /// Predict the bracket index for one encoded query row
    pub fn predict_row(&self, row: &[f64]) -> Result<usize> {
        let predictions = self.predict_batch(&[row.to_vec()])?;
        predictions
            .into_iter()
            .next()
            .ok_or_else(|| ExpenseError::Model("empty prediction".to_string()))
    }

    /// Predict bracket indices for a batch of encoded rows
    pub fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<usize>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let x = DenseMatrix::from_2d_vec(&rows.to_vec());
        let labels = self
            .tree
            .predict(&x)
            .map_err(|e| ExpenseError::Model(e.to_string()))?;
        Ok(labels.into_iter().map(|l| l as usize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ModelConfig {
        ModelConfig {
            max_depth: 8,
            min_samples_leaf: 1,
            min_samples_split: 2,
        }
    }

    /// First column decides the label, second is noise
    fn separable_matrix() -> FeatureMatrix {
        let x = vec![
            vec![0.0, 3.0],
            vec![0.0, 7.0],
            vec![0.0, 1.0],
            vec![1.0, 4.0],
            vec![1.0, 2.0],
            vec![1.0, 9.0],
        ];
        let y = vec![0.0, 0.0, 0.0, 2.0, 2.0, 2.0];
        FeatureMatrix { x, y }
    }

    #[test]
    fn test_fit_rejects_single_label() {
        let matrix = FeatureMatrix {
            x: vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            y: vec![3.0, 3.0],
        };
        let err = ExpenseTree::fit(&matrix, &params()).unwrap_err();
        assert!(matches!(err, ExpenseError::LabelDiversity { found: 1 }));
    }

    #[test]
    fn test_fit_rejects_empty() {
        let matrix = FeatureMatrix {
            x: Vec::new(),
            y: Vec::new(),
        };
        let err = ExpenseTree::fit(&matrix, &params()).unwrap_err();
        assert!(matches!(err, ExpenseError::LabelDiversity { found: 0 }));
    }

    #[test]
    fn test_fit_and_predict_separable() {
        let matrix = separable_matrix();
        let tree = ExpenseTree::fit(&matrix, &params()).unwrap();
        let predictions = tree.predict_batch(&matrix.x).unwrap();
        let expected: Vec<usize> = matrix.y.iter().map(|l| *l as usize).collect();
        assert_eq!(predictions, expected);
    }

    #[test]
    fn test_predict_single_row() {
        let tree = ExpenseTree::fit(&separable_matrix(), &params()).unwrap();
        assert_eq!(tree.predict_row(&[0.0, 5.0]).unwrap(), 0);
        assert_eq!(tree.predict_row(&[1.0, 5.0]).unwrap(), 2);
    }

    #[test]
    fn test_tree_is_debug_formattable() {
        let tree = ExpenseTree::fit(&separable_matrix(), &params()).unwrap();
        assert!(!format!("{:?}", tree).is_empty());
        let err: Result<ExpenseTree> = ExpenseTree::fit(
            &FeatureMatrix {
                x: vec![vec![0.0]],
                y: vec![1.0],
            },
            &params(),
        );
        assert!(matches!(
            err.unwrap_err(),
            ExpenseError::LabelDiversity { found: 1 }
        ));
    }

    #[test]
    fn test_predict_empty_batch() {
        let tree = ExpenseTree::fit(&separable_matrix(), &params()).unwrap();
        assert!(tree.predict_batch(&[]).unwrap().is_empty());
    }
}
