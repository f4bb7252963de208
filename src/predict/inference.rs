//! Serving estimates from a session-trained model
//!
//! The model is trained once per session and reused for every query;
//! nothing is persisted between sessions.

use crate::features::{encode, Bucketizer};
use crate::model::ExpenseTree;
use crate::training::{TrainReport, Trainer};
use crate::{yes_no, Bracket, Config, ExpenseError, Profile, Record, Result};

/// Answers single-row bracket queries against a fitted tree
pub struct Predictor {
    tree: ExpenseTree,
    bucketizer: Bucketizer,
}

impl Predictor {
    pub fn new(tree: ExpenseTree, bucketizer: Bucketizer) -> Self {
        Predictor { tree, bucketizer }
    }

    /// Train once on the cleaned dataset and keep the model for the
    /// session. Also returns the training report for display.
    pub fn from_dataset(records: &[Record], config: &Config) -> Result<(Self, TrainReport)> {
        let trainer = Trainer::new(config)?;
        let bucketizer = trainer.bucketizer().clone();
        let (tree, report) = trainer.train(records)?;
        Ok((Predictor::new(tree, bucketizer), report))
    }

    /// Estimate the expense bracket for one set of survey answers
    pub fn predict(&self, profile: &Profile) -> Result<Bracket> {
        let row = encode(profile);
        let index = self.tree.predict_row(&row)?;
        if index >= self.bucketizer.len() {
            return Err(ExpenseError::Model(format!(
                "predicted label {} outside bracket range",
                index
            )));
        }
        Ok(self.bucketizer.bracket(index))
    }
}

/// Render an estimate as a JSON document
pub fn estimate_json(profile: &Profile, bracket: &Bracket) -> Result<String> {
    let json = serde_json::json!({
        "estimated_expenses": format!("{}", bracket),
        "bracket_lower": bracket.lower,
        "bracket_upper": bracket.upper,
        "answers": {
            "gender": profile.gender.code(),
            "age": profile.age,
            "study_year": profile.study_year,
            "living": profile.living.code(),
            "scholarship": yes_no(profile.scholarship),
            "part_time_job": yes_no(profile.part_time_job),
            "transport": profile.transport.code(),
            "smoking": yes_no(profile.smoking),
            "drinks": yes_no(profile.drinks),
            "games_hobbies": yes_no(profile.games_hobbies),
            "cosmetics": yes_no(profile.cosmetics),
            "subscription": yes_no(profile.subscription),
        },
    });
    serde_json::to_string_pretty(&json).map_err(|e| ExpenseError::Parse(e.to_string()))
}

/// Format an estimate for display
pub fn format_estimate(profile: &Profile, bracket: &Bracket) -> String {
    format!(
        r#"
┌─────────────────────────────────────────────────┐
│  Estimated monthly expenses: {}
├─────────────────────────────────────────────────┤
│  Bracket:    {} - {} $
│  Answers:    {}, age {}, year {}, {}
│  Lifestyle:  smoking {}, drinks {}, job {}
└─────────────────────────────────────────────────┘
"#,
        bracket,
        bracket.lower as i64,
        bracket.upper as i64,
        profile.gender,
        profile.age,
        profile.study_year,
        profile.living,
        yes_no(profile.smoking),
        yes_no(profile.drinks),
        yes_no(profile.part_time_job),
    )
}
