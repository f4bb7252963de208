//! Expense estimation for a single query

pub mod inference;

pub use inference::{estimate_json, format_estimate, Predictor};
