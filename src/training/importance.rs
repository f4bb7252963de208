//! Permutation feature importance
//!
//! Model-agnostic: per feature, shuffle that column of the training
//! table and measure the accuracy drop against the unshuffled
//! baseline, averaged over several seeded rounds. A read-only artifact
//! for display; it does not feed back into the model.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::features::encoding::{FeatureMatrix, FEATURE_NAMES};
use crate::model::ExpenseTree;
use crate::Result;

/// One feature's importance score (baseline accuracy minus shuffled)
#[derive(Debug, Clone)]
pub struct FeatureImportance {
    pub name: String,
    pub score: f64,
}

fn batch_accuracy(predictions: &[usize], labels: &[f64]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(labels.iter())
        .filter(|(p, l)| **p == **l as usize)
        .count();
    correct as f64 / labels.len() as f64
}

/// Display name for a feature column
fn feature_name(width: usize, index: usize) -> String {
    if width == FEATURE_NAMES.len() {
        FEATURE_NAMES[index].to_string()
    } else {
        format!("feature_{}", index)
    }
}

/// Rank features by accuracy drop when their column is shuffled.
///
/// Deterministic for a given seed. Returns the ranking sorted by
/// descending score.
pub fn permutation_importance(
    tree: &ExpenseTree,
    matrix: &FeatureMatrix,
    rounds: usize,
    seed: u64,
) -> Result<Vec<FeatureImportance>> {
    let width = matrix.x.first().map_or(0, |row| row.len());
    let baseline = batch_accuracy(&tree.predict_batch(&matrix.x)?, &matrix.y);
    let mut rng = StdRng::seed_from_u64(seed);
    let rounds = rounds.max(1);

    let mut ranking = Vec::with_capacity(width);
    for feature in 0..width {
        let mut drop_sum = 0.0;
        for _ in 0..rounds {
            let mut column: Vec<f64> = matrix.x.iter().map(|row| row[feature]).collect();
            column.shuffle(&mut rng);
            let shuffled: Vec<Vec<f64>> = matrix
                .x
                .iter()
                .zip(column.into_iter())
                .map(|(row, value)| {
                    let mut row = row.clone();
                    row[feature] = value;
                    row
                })
                .collect();
            let accuracy = batch_accuracy(&tree.predict_batch(&shuffled)?, &matrix.y);
            drop_sum += baseline - accuracy;
        }
        ranking.push(FeatureImportance {
            name: feature_name(width, feature),
            score: drop_sum / rounds as f64,
        });
    }

    ranking.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(ranking)
}

/// Render the ranking as a text bar chart
pub fn render_bars(ranking: &[FeatureImportance]) -> String {
    let max = ranking
        .iter()
        .map(|f| f.score)
        .fold(0.0f64, f64::max)
        .max(f64::EPSILON);
    let width = ranking.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for feature in ranking {
        let bar_len = ((feature.score / max) * 40.0).round().max(0.0) as usize;
        out.push_str(&format!(
            "  {:<width$}  {:>6.3}  {}\n",
            feature.name,
            feature.score,
            "#".repeat(bar_len),
            width = width
        ));
    }
    out
}

/// Write the ranking as a CSV artifact
pub fn write_csv(path: &str, ranking: &[FeatureImportance]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["feature", "importance"])?;
    for feature in ranking {
        writer.write_record([feature.name.as_str(), &format!("{:.6}", feature.score)])?;
    }
    writer.flush()?;
    Ok(())
}
