//! Student expense bracket estimation
//!
//! Loads a university student expense survey, discretizes the monthly
//! expense target into ordered brackets, and fits a decision tree to
//! estimate a student's bracket from their survey answers.

pub mod data;
pub mod features;
pub mod model;
pub mod predict;
pub mod report;
pub mod training;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Respondent gender as recorded in the survey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Living arrangement during the study period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Living {
    Home,
    Hostel,
}

impl Living {
    pub fn code(&self) -> &'static str {
        match self {
            Living::Home => "Home",
            Living::Hostel => "Hostel",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "home" => Some(Living::Home),
            "hostel" => Some(Living::Hostel),
            _ => None,
        }
    }
}

impl fmt::Display for Living {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Preferred mode of transport ("No" in the survey means none)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transport {
    Car,
    Motorcycle,
    None,
}

impl Transport {
    pub fn code(&self) -> &'static str {
        match self {
            Transport::Car => "Car",
            Transport::Motorcycle => "Motorcycle",
            Transport::None => "No",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "car" => Some(Transport::Car),
            "motorcycle" | "bike" => Some(Transport::Motorcycle),
            "no" | "none" => Some(Transport::None),
            _ => None,
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Gender::from_code(s).ok_or_else(|| format!("Unknown gender: {}. Use Male or Female.", s))
    }
}

impl std::str::FromStr for Living {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Living::from_code(s).ok_or_else(|| format!("Unknown living: {}. Use Home or Hostel.", s))
    }
}

impl std::str::FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Transport::from_code(s)
            .ok_or_else(|| format!("Unknown transport: {}. Use Car, Motorcycle, or No.", s))
    }
}

/// Parse a Yes/No survey answer
pub fn parse_yes_no(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "y" => Some(true),
        "no" | "n" => Some(false),
        _ => None,
    }
}

/// Render a boolean back to the survey's Yes/No vocabulary
pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// One respondent's survey answers, minus the expense target.
///
/// Also serves as the query type for expense estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub gender: Gender,
    pub age: u8,
    pub study_year: u8,
    pub living: Living,
    pub scholarship: bool,
    pub part_time_job: bool,
    pub transport: Transport,
    pub smoking: bool,
    pub drinks: bool,
    pub games_hobbies: bool,
    pub cosmetics: bool,
    pub subscription: bool,
}

/// A full survey response: answers plus the monthly expense in dollars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub profile: Profile,
    pub expense: f64,
}

/// An ordinal expense bracket produced by the bucketizer.
///
/// Labelled by its lower bound, matching the survey's bracket naming.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Position in the ordered bracket list
    pub index: usize,
    /// Lower bound in dollars (the display label)
    pub lower: f64,
    /// Upper bound in dollars
    pub upper: f64,
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} $", self.lower as i64)
    }
}

/// A survey response with the expense replaced by its bracket
#[derive(Debug, Clone, PartialEq)]
pub struct BucketedRecord {
    pub profile: Profile,
    pub bracket: Bracket,
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown value '{value}' in column {column}")]
    UnknownValue {
        column: &'static str,
        value: String,
    },

    #[error("No usable records loaded from {0}")]
    EmptyDataset(String),

    #[error("Training requires at least two distinct expense brackets, found {found}")]
    LabelDiversity { found: usize },

    #[error("Model error: {0}")]
    Model(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ExpenseError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub brackets: BracketConfig,
    pub model: ModelConfig,
    pub training: TrainingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Raw survey export, missing values allowed
    pub raw_path: String,
    /// Cleaned export produced by `data clean`
    pub clean_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketConfig {
    /// Bracket boundary edges in dollars, strictly increasing
    pub edges: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub max_depth: u16,
    pub min_samples_leaf: usize,
    pub min_samples_split: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Fraction of records held out for evaluation
    pub holdout_fraction: f64,
    /// Shuffle rounds per feature for permutation importance
    pub importance_rounds: usize,
    /// Seed for the importance shuffles
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: DataConfig {
                raw_path: "data/survey_raw.csv".to_string(),
                clean_path: "data/survey_clean.csv".to_string(),
            },
            brackets: BracketConfig {
                edges: vec![120.0, 150.0, 180.0, 210.0, 240.0, 270.0, 300.0, 330.0, 360.0],
            },
            model: ModelConfig {
                max_depth: 8,
                min_samples_leaf: 1,
                min_samples_split: 2,
            },
            training: TrainingConfig {
                holdout_fraction: 0.3,
                importance_rounds: 5,
                seed: 42,
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExpenseError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| ExpenseError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ExpenseError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_round_trip() {
        assert_eq!(Gender::from_code("Male"), Some(Gender::Male));
        assert_eq!(Gender::from_code("female"), Some(Gender::Female));
        assert_eq!(Gender::from_code("other"), None);
        assert_eq!(Gender::Male.code(), "Male");
    }

    #[test]
    fn test_transport_codes() {
        assert_eq!(Transport::from_code("No"), Some(Transport::None));
        assert_eq!(Transport::from_code("car"), Some(Transport::Car));
        assert_eq!(Transport::None.code(), "No");
    }

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no("Yes"), Some(true));
        assert_eq!(parse_yes_no(" no "), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
    }

    #[test]
    fn test_bracket_display() {
        let b = Bracket {
            index: 1,
            lower: 150.0,
            upper: 180.0,
        };
        assert_eq!(format!("{}", b), "150 $");
    }

    #[test]
    fn test_default_config_edges() {
        let config = Config::default();
        assert_eq!(config.brackets.edges.len(), 9);
        assert_eq!(config.brackets.edges[0], 120.0);
        assert_eq!(*config.brackets.edges.last().unwrap(), 360.0);
    }
}
