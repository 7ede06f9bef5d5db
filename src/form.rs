//! Binding between the HTML form and the typed prediction model.
//!
//! The layout decides which inputs exist for a given total/current semester
//! pair, and each generated input carries the [`Field`] and semester it feeds,
//! so the page never has to look values up by id at validation time.

use serde::{Deserialize, Serialize};

use crate::error::{Field, PredictError, Result};
use crate::model::{check_semesters, Bounds, PredictRequest};

/// One rendered input box.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FieldSpec {
    pub id: String,
    pub label: String,
    pub field: Field,
    pub semester: u32,
    pub step: f64,
    pub min: f64,
    pub max: f64,
}

impl FieldSpec {
    fn new(field: Field, semester: u32, step: f64, min: f64, max: f64) -> Self {
        Self {
            id: format!("{}{}", field.id_prefix(), semester),
            label: format!("Semester {} {}", semester, field.label()),
            field,
            semester,
            step,
            min,
            max,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SemesterLayout {
    pub total_semesters: u32,
    pub current_semester: u32,
    /// False for a first-semester student, who has no earned grades yet.
    pub show_historical: bool,
    pub historical: Vec<FieldSpec>,
    pub projected: Vec<FieldSpec>,
    pub credits: Vec<FieldSpec>,
}

impl SemesterLayout {
    pub fn new(total: u32, current: u32, bounds: &Bounds) -> Result<Self> {
        check_semesters(total, current, bounds.max_semesters)?;

        let grade = |field, semester| {
            FieldSpec::new(field, semester, bounds.grade_step, bounds.min_grade, bounds.max_grade)
        };
        let historical = (1..current)
            .map(|i| grade(Field::HistoricalGrade, i))
            .collect();
        let projected = (current..=total)
            .map(|i| grade(Field::ProjectedGrade, i))
            .collect();
        // Credit inputs keep a zero floor in the browser; the configured
        // minimum is enforced server side.
        let credits = (1..=total)
            .map(|i| FieldSpec::new(Field::Credits, i, bounds.credit_step, 0.0, bounds.max_credit))
            .collect();

        Ok(Self {
            total_semesters: total,
            current_semester: current,
            show_historical: current > 1,
            historical,
            projected,
            credits,
        })
    }

    pub fn field_count(&self) -> usize {
        self.historical.len() + self.projected.len() + self.credits.len()
    }
}

/// Form values exactly as typed, before any parsing.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RawForm {
    pub total_semesters: u32,
    pub current_semester: u32,
    #[serde(default)]
    pub historical: Vec<String>,
    #[serde(default)]
    pub projected: Vec<String>,
    #[serde(default)]
    pub credits: Vec<String>,
}

impl RawForm {
    /// True once every required input holds a number. The page uses this to
    /// decide whether to recalculate on each keystroke.
    pub fn is_complete(&self, bounds: &Bounds) -> bool {
        if self.check_semesters(bounds).is_err() {
            return false;
        }
        let total = self.total_semesters as usize;
        let current = self.current_semester as usize;

        self.historical.len() == current - 1
            && self.projected.len() == total - current + 1
            && self.credits.len() == total
            && self
                .historical
                .iter()
                .chain(&self.projected)
                .chain(&self.credits)
                .all(|v| parse_number(v).is_some())
    }

    /// Parses every value. Range checks are left to the predictor.
    pub fn parse(&self, bounds: &Bounds) -> Result<PredictRequest> {
        self.check_semesters(bounds)?;

        Ok(PredictRequest {
            total_semesters: self.total_semesters,
            current_semester: self.current_semester,
            historical_grades: parse_values(Field::HistoricalGrade, 1, &self.historical)?,
            projected_grades: parse_values(
                Field::ProjectedGrade,
                self.current_semester,
                &self.projected,
            )?,
            credits: parse_values(Field::Credits, 1, &self.credits)?,
        })
    }

    fn check_semesters(&self, bounds: &Bounds) -> Result<()> {
        check_semesters(self.total_semesters, self.current_semester, bounds.max_semesters)
    }
}

fn parse_number(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn parse_values(field: Field, first_semester: u32, inputs: &[String]) -> Result<Vec<f64>> {
    inputs
        .iter()
        .zip(first_semester..)
        .map(|(input, semester)| {
            parse_number(input).ok_or_else(|| PredictError::InvalidNumber {
                field,
                semester,
                input: input.clone(),
            })
        })
        .collect()
}

pub fn format_cgpa(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}
