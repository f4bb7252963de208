//! Feature construction: expense bucketizing and query encoding

pub mod bucket;
pub mod encoding;

pub use bucket::Bucketizer;
pub use encoding::{encode, FeatureMatrix, FEATURE_NAMES};
