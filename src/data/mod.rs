//! Survey data loading and cleaning

pub mod cleaning;
pub mod loader;

pub use cleaning::{clean, summarize, Imputation, SurveySummary};
pub use loader::{load_clean, load_raw, write_clean, RawRecord};
