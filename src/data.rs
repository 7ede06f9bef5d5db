use std::path::Path;

use csv::Reader;
use serde::Deserialize;
use thiserror::Error;

use crate::model::PredictRequest;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read plan: {0}")]
    Csv(#[from] csv::Error),

    #[error("plan file has no semesters")]
    Empty,

    #[error("semester {0} appears more than once")]
    DuplicateSemester(u32),

    #[error("semester {0} is missing from the plan")]
    MissingSemester(u32),

    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}

/// One CSV row: `semester,gpa,credits`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PlanRow {
    pub semester: u32,
    pub gpa: f64,
    pub credits: f64,
}

/// Every semester of a degree in order, earned and expected alike.
#[derive(Debug, Clone, PartialEq)]
pub struct SemesterPlan {
    rows: Vec<PlanRow>,
}

impl SemesterPlan {
    /// Sorts rows by semester and requires exactly `1..=n`.
    pub fn from_rows(mut rows: Vec<PlanRow>) -> Result<Self, DataError> {
        if rows.is_empty() {
            return Err(DataError::Empty);
        }
        rows.sort_by_key(|row| row.semester);

        for (i, row) in rows.iter().enumerate() {
            let expected = i as u32 + 1;
            if row.semester == expected {
                continue;
            }
            if i > 0 && rows[i - 1].semester == row.semester {
                return Err(DataError::DuplicateSemester(row.semester));
            }
            return Err(DataError::MissingSemester(expected));
        }

        Ok(Self { rows })
    }

    pub fn total_semesters(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn rows(&self) -> &[PlanRow] {
        &self.rows
    }

    /// Grades before `current` become historical, the rest projected. An
    /// out-of-range `current` is passed through for the predictor to reject.
    pub fn into_request(self, current: u32) -> PredictRequest {
        let split = (current.saturating_sub(1) as usize).min(self.rows.len());
        let grades: Vec<f64> = self.rows.iter().map(|row| row.gpa).collect();
        let (historical, projected) = grades.split_at(split);

        PredictRequest {
            total_semesters: self.total_semesters(),
            current_semester: current,
            historical_grades: historical.to_vec(),
            projected_grades: projected.to_vec(),
            credits: self.rows.iter().map(|row| row.credits).collect(),
        }
    }
}

pub fn load_plan(path: impl AsRef<Path>) -> Result<SemesterPlan, DataError> {
    let mut rdr = Reader::from_path(path)?;
    let rows = rdr
        .deserialize()
        .collect::<Result<Vec<PlanRow>, csv::Error>>()?;
    SemesterPlan::from_rows(rows)
}

/// Parses a comma separated list such as `"3.0, 3.5"`. An empty string is an
/// empty list.
pub fn parse_list(input: &str) -> Result<Vec<f64>, DataError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().map_err(|_| DataError::InvalidNumber(s.to_string())))
        .collect()
}
