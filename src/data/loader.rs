//! CSV loading for the survey exports
//!
//! The raw export allows missing values in any column; the cleaned
//! export is strict and fails on any missing or unknown value.

use serde::{Deserialize, Serialize};

use crate::{parse_yes_no, yes_no, ExpenseError, Gender, Living, Profile, Record, Result, Transport};

/// One row of the survey CSV, before cleaning.
///
/// Every field is optional: the raw export has holes, and the csv
/// crate maps empty cells to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Gender")]
    pub gender: Option<String>,
    #[serde(rename = "Age")]
    pub age: Option<f64>,
    #[serde(rename = "Study_year")]
    pub study_year: Option<f64>,
    #[serde(rename = "Living")]
    pub living: Option<String>,
    #[serde(rename = "Scholarship")]
    pub scholarship: Option<String>,
    #[serde(rename = "Part_time_job")]
    pub part_time_job: Option<String>,
    #[serde(rename = "Transporting")]
    pub transport: Option<String>,
    #[serde(rename = "Smoking")]
    pub smoking: Option<String>,
    #[serde(rename = "Drinks")]
    pub drinks: Option<String>,
    #[serde(rename = "Games_&_Hobbies")]
    pub games_hobbies: Option<String>,
    #[serde(rename = "Cosmetics_&_Self-care")]
    pub cosmetics: Option<String>,
    #[serde(rename = "Monthly_Subscription")]
    pub subscription: Option<String>,
    #[serde(rename = "Monthly_expenses_$")]
    pub expense: Option<f64>,
}

impl RawRecord {
    /// Strict conversion: every field must be present and parseable
    pub fn to_record(&self) -> Result<Record> {
        let gender = parse_with(&self.gender, "Gender", Gender::from_code)?;
        let living = parse_with(&self.living, "Living", Living::from_code)?;
        let transport = parse_with(&self.transport, "Transporting", Transport::from_code)?;
        Ok(Record {
            profile: Profile {
                gender,
                age: parse_year(self.age, "Age", 130)?,
                study_year: parse_year(self.study_year, "Study_year", 10)?,
                living,
                scholarship: parse_with(&self.scholarship, "Scholarship", parse_yes_no)?,
                part_time_job: parse_with(&self.part_time_job, "Part_time_job", parse_yes_no)?,
                transport,
                smoking: parse_with(&self.smoking, "Smoking", parse_yes_no)?,
                drinks: parse_with(&self.drinks, "Drinks", parse_yes_no)?,
                games_hobbies: parse_with(&self.games_hobbies, "Games_&_Hobbies", parse_yes_no)?,
                cosmetics: parse_with(&self.cosmetics, "Cosmetics_&_Self-care", parse_yes_no)?,
                subscription: parse_with(&self.subscription, "Monthly_Subscription", parse_yes_no)?,
            },
            expense: self.expense.ok_or(ExpenseError::UnknownValue {
                column: "Monthly_expenses_$",
                value: String::new(),
            })?,
        })
    }

    pub fn from_record(record: &Record) -> Self {
        let p = &record.profile;
        RawRecord {
            gender: Some(p.gender.code().to_string()),
            age: Some(p.age as f64),
            study_year: Some(p.study_year as f64),
            living: Some(p.living.code().to_string()),
            scholarship: Some(yes_no(p.scholarship).to_string()),
            part_time_job: Some(yes_no(p.part_time_job).to_string()),
            transport: Some(p.transport.code().to_string()),
            smoking: Some(yes_no(p.smoking).to_string()),
            drinks: Some(yes_no(p.drinks).to_string()),
            games_hobbies: Some(yes_no(p.games_hobbies).to_string()),
            cosmetics: Some(yes_no(p.cosmetics).to_string()),
            subscription: Some(yes_no(p.subscription).to_string()),
            expense: Some(record.expense),
        }
    }
}

fn parse_with<T>(
    value: &Option<String>,
    column: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T> {
    let raw = value.as_deref().ok_or(ExpenseError::UnknownValue {
        column,
        value: String::new(),
    })?;
    parse(raw).ok_or_else(|| ExpenseError::UnknownValue {
        column,
        value: raw.to_string(),
    })
}

fn parse_year(value: Option<f64>, column: &'static str, max: u8) -> Result<u8> {
    let v = value.ok_or(ExpenseError::UnknownValue {
        column,
        value: String::new(),
    })?;
    if v < 0.0 || v > max as f64 {
        return Err(ExpenseError::UnknownValue {
            column,
            value: v.to_string(),
        });
    }
    Ok(v as u8)
}

/// Load the raw survey export; missing values pass through as `None`
pub fn load_raw(path: &str) -> Result<Vec<RawRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: RawRecord = row?;
        records.push(record);
    }
    if records.is_empty() {
        return Err(ExpenseError::EmptyDataset(path.to_string()));
    }
    log::debug!("Loaded {} raw records from {}", records.len(), path);
    Ok(records)
}

/// Load the cleaned export; any missing or unknown value is an error
pub fn load_clean(path: &str) -> Result<Vec<Record>> {
    let raw = load_raw(path)?;
    raw.iter().map(RawRecord::to_record).collect()
}

/// Write cleaned records back out in the survey's column schema
pub fn write_clean(path: &str, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(RawRecord::from_record(record))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Gender,Age,Study_year,Living,Scholarship,Part_time_job,Transporting,\
Smoking,Drinks,Games_&_Hobbies,Cosmetics_&_Self-care,Monthly_Subscription,Monthly_expenses_$";

    fn parse_rows(rows: &str) -> Vec<RawRecord> {
        let data = format!("{}\n{}", HEADER, rows);
        csv::Reader::from_reader(data.as_bytes())
            .deserialize()
            .collect::<std::result::Result<Vec<RawRecord>, _>>()
            .unwrap()
    }

    #[test]
    fn test_parse_complete_row() {
        let rows = parse_rows("Male,21,2,Home,No,Yes,Car,No,No,Yes,No,Yes,180");
        assert_eq!(rows.len(), 1);
        let record = rows[0].to_record().unwrap();
        assert_eq!(record.profile.gender, Gender::Male);
        assert_eq!(record.profile.age, 21);
        assert_eq!(record.profile.study_year, 2);
        assert_eq!(record.profile.transport, Transport::Car);
        assert!(record.profile.part_time_job);
        assert!(!record.profile.smoking);
        assert_eq!(record.expense, 180.0);
    }

    #[test]
    fn test_missing_cells_become_none() {
        let rows = parse_rows("Female,,1,Hostel,Yes,No,,Yes,No,No,Yes,No,150");
        assert_eq!(rows[0].age, None);
        assert_eq!(rows[0].transport, None);
        assert_eq!(rows[0].living.as_deref(), Some("Hostel"));
    }

    #[test]
    fn test_strict_conversion_rejects_missing() {
        let rows = parse_rows("Female,,1,Hostel,Yes,No,No,Yes,No,No,Yes,No,150");
        let err = rows[0].to_record().unwrap_err();
        assert!(matches!(
            err,
            ExpenseError::UnknownValue { column: "Age", .. }
        ));
    }

    #[test]
    fn test_strict_conversion_rejects_unknown_value() {
        let rows = parse_rows("Alien,20,1,Hostel,Yes,No,No,Yes,No,No,Yes,No,150");
        let err = rows[0].to_record().unwrap_err();
        assert!(matches!(
            err,
            ExpenseError::UnknownValue {
                column: "Gender",
                ..
            }
        ));
    }

    #[test]
    fn test_record_round_trip() {
        let rows = parse_rows("Male,22,3,Hostel,No,No,Motorcycle,Yes,Yes,No,No,No,240");
        let record = rows[0].to_record().unwrap();
        let back = RawRecord::from_record(&record);
        assert_eq!(back.to_record().unwrap(), record);
    }
}
