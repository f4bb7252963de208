//! Population and expense aggregations over the cleaned dataset
//!
//! Backs the `report` subcommands: record counts per category value
//! plus average expense per group.

use crate::{yes_no, Record};

/// Record count for one category value
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Average expense for one category value
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAverage {
    pub value: String,
    pub count: usize,
    pub mean_expense: f64,
}

/// Sort keys numerically when both parse, else lexicographically
fn value_order(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        _ => a.cmp(b),
    }
}

/// Count records per value of one categorical attribute
pub fn population_by<F>(records: &[Record], key: F) -> Vec<CategoryCount>
where
    F: Fn(&Record) -> String,
{
    let mut counts: Vec<CategoryCount> = Vec::new();
    for record in records {
        let value = key(record);
        match counts.iter_mut().find(|c| c.value == value) {
            Some(entry) => entry.count += 1,
            None => counts.push(CategoryCount { value, count: 1 }),
        }
    }
    counts.sort_by(|a, b| value_order(&a.value, &b.value));
    counts
}

/// Average expense per value of one categorical attribute
pub fn average_expense_by<F>(records: &[Record], key: F) -> Vec<GroupAverage>
where
    F: Fn(&Record) -> String,
{
    let mut groups: Vec<(String, usize, f64)> = Vec::new();
    for record in records {
        let value = key(record);
        match groups.iter_mut().find(|(v, _, _)| *v == value) {
            Some((_, count, sum)) => {
                *count += 1;
                *sum += record.expense;
            }
            None => groups.push((value, 1, record.expense)),
        }
    }
    let mut averages: Vec<GroupAverage> = groups
        .into_iter()
        .map(|(value, count, sum)| GroupAverage {
            value,
            count,
            mean_expense: sum / count as f64,
        })
        .collect();
    averages.sort_by(|a, b| value_order(&a.value, &b.value));
    averages
}

/// Population counts for the attributes the survey report displays
pub fn population_report(records: &[Record]) -> Vec<(&'static str, Vec<CategoryCount>)> {
    vec![
        (
            "Gender",
            population_by(records, |r| r.profile.gender.to_string()),
        ),
        ("Age", population_by(records, |r| r.profile.age.to_string())),
        (
            "Study_year",
            population_by(records, |r| r.profile.study_year.to_string()),
        ),
        (
            "Living",
            population_by(records, |r| r.profile.living.to_string()),
        ),
    ]
}

/// Average expense per group for the attributes the survey compares
pub fn expense_report(records: &[Record]) -> Vec<(&'static str, Vec<GroupAverage>)> {
    vec![
        (
            "Age",
            average_expense_by(records, |r| r.profile.age.to_string()),
        ),
        (
            "Study_year",
            average_expense_by(records, |r| r.profile.study_year.to_string()),
        ),
        (
            "Living",
            average_expense_by(records, |r| r.profile.living.to_string()),
        ),
        (
            "Gender",
            average_expense_by(records, |r| r.profile.gender.to_string()),
        ),
        (
            "Smoking",
            average_expense_by(records, |r| yes_no(r.profile.smoking).to_string()),
        ),
        (
            "Drinks",
            average_expense_by(records, |r| yes_no(r.profile.drinks).to_string()),
        ),
    ]
}
