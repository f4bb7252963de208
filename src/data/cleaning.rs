//! Missing-value imputation and per-column survey summaries
//!
//! Categorical columns are filled with their most frequent value. The
//! monthly expense column is positively skewed, so it is filled with
//! the median rather than the mean.

use std::collections::HashSet;

use crate::data::loader::RawRecord;
use crate::{ExpenseError, Record, Result};

/// Most frequent value of a string column; ties break to the smaller value
fn mode_string(values: &[&Option<String>]) -> Option<String> {
    let mut present: Vec<&str> = values.iter().filter_map(|v| v.as_deref()).collect();
    if present.is_empty() {
        return None;
    }
    present.sort_unstable();
    longest_run(&present).map(|s| s.to_string())
}

/// Most frequent value of a numeric column; ties break to the smaller value
fn mode_numeric(values: &[Option<f64>]) -> Option<f64> {
    let mut present: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    if present.is_empty() {
        return None;
    }
    present.sort_unstable_by(|a, b| a.total_cmp(b));
    longest_run(&present).copied()
}

/// Longest run of equal values in a sorted slice
fn longest_run<'a, T: PartialEq>(sorted: &'a [T]) -> Option<&'a T> {
    let mut best: Option<(&T, usize)> = None;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        if best.map_or(true, |(_, n)| j - i > n) {
            best = Some((&sorted[i], j - i));
        }
        i = j;
    }
    best.map(|(v, _)| v)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// The string-valued survey columns, in schema order
fn str_columns(r: &RawRecord) -> [(&'static str, &Option<String>); 10] {
    [
        ("Gender", &r.gender),
        ("Living", &r.living),
        ("Scholarship", &r.scholarship),
        ("Part_time_job", &r.part_time_job),
        ("Transporting", &r.transport),
        ("Smoking", &r.smoking),
        ("Drinks", &r.drinks),
        ("Games_&_Hobbies", &r.games_hobbies),
        ("Cosmetics_&_Self-care", &r.cosmetics),
        ("Monthly_Subscription", &r.subscription),
    ]
}

fn column_values<'a>(raw: &'a [RawRecord], index: usize) -> Vec<&'a Option<String>> {
    raw.iter().map(|r| str_columns(r)[index].1).collect()
}

/// Fill values computed once from the raw dataset
#[derive(Debug, Clone)]
pub struct Imputation {
    modes: [String; 10],
    age: f64,
    study_year: f64,
    expense_median: f64,
}

impl Imputation {
    pub fn from_raw(raw: &[RawRecord]) -> Result<Self> {
        if raw.is_empty() {
            return Err(ExpenseError::EmptyDataset("raw survey".to_string()));
        }
        let mut modes: Vec<String> = Vec::with_capacity(10);
        for (index, (name, _)) in str_columns(&raw[0]).into_iter().enumerate() {
            let mode = mode_string(&column_values(raw, index))
                .ok_or_else(|| ExpenseError::Parse(format!("column {} has no values", name)))?;
            modes.push(mode);
        }
        let ages: Vec<Option<f64>> = raw.iter().map(|r| r.age).collect();
        let years: Vec<Option<f64>> = raw.iter().map(|r| r.study_year).collect();
        let expenses: Vec<f64> = raw.iter().filter_map(|r| r.expense).collect();
        Ok(Imputation {
            modes: modes
                .try_into()
                .map_err(|_| ExpenseError::Parse("column count mismatch".to_string()))?,
            age: mode_numeric(&ages)
                .ok_or_else(|| ExpenseError::Parse("column Age has no values".to_string()))?,
            study_year: mode_numeric(&years).ok_or_else(|| {
                ExpenseError::Parse("column Study_year has no values".to_string())
            })?,
            expense_median: median(&expenses).ok_or_else(|| {
                ExpenseError::Parse("column Monthly_expenses_$ has no values".to_string())
            })?,
        })
    }

    /// Fill every missing cell of a raw row
    pub fn fill(&self, r: &RawRecord) -> RawRecord {
        let mut filled = r.clone();
        let fills: [&mut Option<String>; 10] = [
            &mut filled.gender,
            &mut filled.living,
            &mut filled.scholarship,
            &mut filled.part_time_job,
            &mut filled.transport,
            &mut filled.smoking,
            &mut filled.drinks,
            &mut filled.games_hobbies,
            &mut filled.cosmetics,
            &mut filled.subscription,
        ];
        for (slot, mode) in fills.into_iter().zip(self.modes.iter()) {
            if slot.is_none() {
                *slot = Some(mode.clone());
            }
        }
        filled.age = filled.age.or(Some(self.age));
        filled.study_year = filled.study_year.or(Some(self.study_year));
        filled.expense = filled.expense.or(Some(self.expense_median));
        filled
    }
}

/// Impute missing values across the raw dataset and parse typed records.
///
/// Present values that fail to parse are treated as a malformed input
/// file and abort the operation.
pub fn clean(raw: &[RawRecord]) -> Result<Vec<Record>> {
    let imputation = Imputation::from_raw(raw)?;
    let records = raw
        .iter()
        .map(|r| imputation.fill(r).to_record())
        .collect::<Result<Vec<Record>>>()?;
    log::info!("Cleaned {} survey records", records.len());
    Ok(records)
}

/// Summary of one categorical column for the cleaning report
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub name: &'static str,
    pub missing: usize,
    /// Distinct present values, in first-seen order
    pub unique: Vec<String>,
    pub most_frequent: Option<String>,
}

/// Summary of the continuous expense column
#[derive(Debug, Clone)]
pub struct ExpenseSummary {
    pub missing: usize,
    pub mean: f64,
    pub median: f64,
}

impl ExpenseSummary {
    /// Mean above median indicates a positively skewed distribution
    pub fn positively_skewed(&self) -> bool {
        self.mean > self.median
    }
}

/// Per-column cleaning report over the raw dataset
#[derive(Debug, Clone)]
pub struct SurveySummary {
    pub total: usize,
    pub columns: Vec<ColumnSummary>,
    pub expense: ExpenseSummary,
}

pub fn summarize(raw: &[RawRecord]) -> SurveySummary {
    let mut columns = Vec::new();
    if let Some(first) = raw.first() {
        for (index, (name, _)) in str_columns(first).into_iter().enumerate() {
            let values = column_values(raw, index);
            columns.push(summarize_strings(name, &values));
        }
        // Keep schema order: Gender, Age, Study_year, Living, ...
        columns.insert(
            1,
            summarize_numbers("Age", &raw.iter().map(|r| r.age).collect::<Vec<_>>()),
        );
        columns.insert(
            2,
            summarize_numbers(
                "Study_year",
                &raw.iter().map(|r| r.study_year).collect::<Vec<_>>(),
            ),
        );
    }

    let expenses: Vec<f64> = raw.iter().filter_map(|r| r.expense).collect();
    let expense = ExpenseSummary {
        missing: raw.len() - expenses.len(),
        mean: mean(&expenses).unwrap_or(0.0),
        median: median(&expenses).unwrap_or(0.0),
    };
    SurveySummary {
        total: raw.len(),
        columns,
        expense,
    }
}

fn summarize_strings(name: &'static str, values: &[&Option<String>]) -> ColumnSummary {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    let mut missing = 0;
    for value in values {
        match value {
            Some(v) => {
                if seen.insert(v.clone()) {
                    unique.push(v.clone());
                }
            }
            None => missing += 1,
        }
    }
    ColumnSummary {
        name,
        missing,
        unique,
        most_frequent: mode_string(values),
    }
}

fn summarize_numbers(name: &'static str, values: &[Option<f64>]) -> ColumnSummary {
    let mut seen = Vec::new();
    let mut missing = 0;
    for value in values {
        match value {
            Some(v) => {
                if !seen.contains(v) {
                    seen.push(*v);
                }
            }
            None => missing += 1,
        }
    }
    ColumnSummary {
        name,
        missing,
        unique: seen.iter().map(|v| format_number(*v)).collect(),
        most_frequent: mode_numeric(values).map(format_number),
    }
}

/// Format survey numbers without a trailing `.0`
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Gender, Transport};

    fn raw_row(gender: Option<&str>, age: Option<f64>, expense: Option<f64>) -> RawRecord {
        RawRecord {
            gender: gender.map(|s| s.to_string()),
            age,
            study_year: Some(2.0),
            living: Some("Home".to_string()),
            scholarship: Some("No".to_string()),
            part_time_job: Some("Yes".to_string()),
            transport: Some("Car".to_string()),
            smoking: Some("No".to_string()),
            drinks: Some("No".to_string()),
            games_hobbies: Some("Yes".to_string()),
            cosmetics: Some("No".to_string()),
            subscription: Some("Yes".to_string()),
            expense,
        }
    }

    #[test]
    fn test_mode_picks_most_frequent() {
        let a = Some("Male".to_string());
        let b = Some("Female".to_string());
        let values = vec![&a, &a, &b, &None];
        assert_eq!(mode_string(&values), Some("Male".to_string()));
    }

    #[test]
    fn test_mode_tie_breaks_low() {
        let a = Some("Hostel".to_string());
        let b = Some("Home".to_string());
        let values = vec![&a, &b];
        assert_eq!(mode_string(&values), Some("Home".to_string()));
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[180.0, 120.0, 150.0]), Some(150.0));
        assert_eq!(median(&[120.0, 150.0, 180.0, 300.0]), Some(165.0));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_clean_fills_categorical_mode() {
        let raw = vec![
            raw_row(Some("Female"), Some(20.0), Some(150.0)),
            raw_row(Some("Female"), Some(21.0), Some(180.0)),
            raw_row(None, Some(22.0), Some(210.0)),
        ];
        let records = clean(&raw).unwrap();
        assert_eq!(records[2].profile.gender, Gender::Female);
    }

    #[test]
    fn test_clean_fills_expense_median() {
        let raw = vec![
            raw_row(Some("Male"), Some(20.0), Some(120.5)),
            raw_row(Some("Male"), Some(20.0), Some(200.5)),
            raw_row(Some("Male"), Some(20.0), Some(300.5)),
            raw_row(Some("Male"), Some(20.0), None),
        ];
        let records = clean(&raw).unwrap();
        assert_eq!(records[3].expense, 200.5);
    }

    #[test]
    fn test_clean_rejects_malformed_value() {
        let mut bad = raw_row(Some("Male"), Some(20.0), Some(150.0));
        bad.transport = Some("Teleport".to_string());
        let err = clean(&[bad]).unwrap_err();
        assert!(matches!(
            err,
            crate::ExpenseError::UnknownValue {
                column: "Transporting",
                ..
            }
        ));
    }

    #[test]
    fn test_clean_keeps_present_values() {
        let raw = vec![
            raw_row(Some("Male"), Some(20.0), Some(150.0)),
            raw_row(Some("Female"), Some(23.0), Some(300.0)),
        ];
        let records = clean(&raw).unwrap();
        assert_eq!(records[1].profile.age, 23);
        assert_eq!(records[1].profile.transport, Transport::Car);
        assert_eq!(records[1].expense, 300.0);
    }

    #[test]
    fn test_summary_counts_missing_and_unique() {
        let raw = vec![
            raw_row(Some("Male"), Some(20.0), Some(150.0)),
            raw_row(None, None, Some(180.0)),
            raw_row(Some("Female"), Some(20.0), None),
        ];
        let summary = summarize(&raw);
        assert_eq!(summary.total, 3);
        let gender = summary.columns.iter().find(|c| c.name == "Gender").unwrap();
        assert_eq!(gender.missing, 1);
        assert_eq!(gender.unique, vec!["Male", "Female"]);
        let age = summary.columns.iter().find(|c| c.name == "Age").unwrap();
        assert_eq!(age.missing, 1);
        assert_eq!(summary.expense.missing, 1);
    }

    #[test]
    fn test_skew_flag() {
        let s = ExpenseSummary {
            missing: 0,
            mean: 200.0,
            median: 180.0,
        };
        assert!(s.positively_skewed());
        let s = ExpenseSummary {
            missing: 0,
            mean: 170.0,
            median: 180.0,
        };
        assert!(!s.positively_skewed());
    }
}
