//! One-shot model training, evaluation metrics, and feature importance

pub mod importance;
pub mod metrics;
pub mod trainer;

pub use importance::{permutation_importance, FeatureImportance};
pub use metrics::Metrics;
pub use trainer::{TrainReport, Trainer};
