//! Fixed numeric encoding of survey answers for the classifier
//!
//! Categorical answers become small integer codes, Yes/No answers 0/1,
//! and age / study year pass through as-is. The column order is fixed
//! and shared between training and queries.

use crate::{BucketedRecord, Gender, Living, Profile, Transport};

/// Feature display names, in encoding order
pub const FEATURE_NAMES: [&str; 12] = [
    "Gender",
    "Age",
    "Study_year",
    "Living",
    "Scholarship",
    "Part_time_job",
    "Transporting",
    "Smoking",
    "Drinks",
    "Games_&_Hobbies",
    "Cosmetics_&_Self-care",
    "Monthly_Subscription",
];

/// Number of encoded features
pub const DIM: usize = FEATURE_NAMES.len();

fn gender_code(g: Gender) -> f64 {
    match g {
        Gender::Male => 0.0,
        Gender::Female => 1.0,
    }
}

fn living_code(l: Living) -> f64 {
    match l {
        Living::Home => 0.0,
        Living::Hostel => 1.0,
    }
}

fn transport_code(t: Transport) -> f64 {
    match t {
        Transport::None => 0.0,
        Transport::Car => 1.0,
        Transport::Motorcycle => 2.0,
    }
}

fn bool_code(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Encode one profile as a classifier input row
pub fn encode(profile: &Profile) -> Vec<f64> {
    vec![
        gender_code(profile.gender),
        profile.age as f64,
        profile.study_year as f64,
        living_code(profile.living),
        bool_code(profile.scholarship),
        bool_code(profile.part_time_job),
        transport_code(profile.transport),
        bool_code(profile.smoking),
        bool_code(profile.drinks),
        bool_code(profile.games_hobbies),
        bool_code(profile.cosmetics),
        bool_code(profile.subscription),
    ]
}

/// Encoded training table: feature rows plus bracket-index labels
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<f64>,
}

impl FeatureMatrix {
    pub fn from_records(records: &[BucketedRecord]) -> Self {
        let x = records.iter().map(|r| encode(&r.profile)).collect();
        let y = records.iter().map(|r| r.bracket.index as f64).collect();
        FeatureMatrix { x, y }
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Number of distinct labels present
    pub fn distinct_labels(&self) -> usize {
        let mut labels: Vec<i64> = self.y.iter().map(|v| *v as i64).collect();
        labels.sort_unstable();
        labels.dedup();
        labels.len()
    }
}
