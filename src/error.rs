use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PredictError>;

/// Which kind of form value a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// CGPA already earned in a completed semester.
    HistoricalGrade,
    /// Target CGPA for a semester not yet completed.
    ProjectedGrade,
    Credits,
}

impl Field {
    /// Prefix of the form input ids generated for this field.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Field::HistoricalGrade => "prevCGPA",
            Field::ProjectedGrade => "expectedCGPA",
            Field::Credits => "credits",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::HistoricalGrade => "CGPA",
            Field::ProjectedGrade => "Expected CGPA",
            Field::Credits => "Credits",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::HistoricalGrade => "historical grade",
            Field::ProjectedGrade => "projected grade",
            Field::Credits => "credits",
        };
        f.write_str(name)
    }
}

/// The bound a value failed to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    Minimum(f64),
    Maximum(f64),
    /// NaN or infinite input.
    Finite,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Minimum(min) => write!(f, "below minimum {min}"),
            Bound::Maximum(max) => write!(f, "above maximum {max}"),
            Bound::Finite => f.write_str("not a finite number"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error(
        "Invalid input for semester {semester} {field}: {value} is {bound}, must be between {min} and {max}"
    )]
    OutOfRange {
        field: Field,
        semester: u32,
        value: f64,
        bound: Bound,
        min: f64,
        max: f64,
    },

    #[error("Expected {expected} {field} values, got {actual}")]
    ShapeMismatch {
        field: Field,
        expected: usize,
        actual: usize,
    },

    #[error("Total credits cannot be zero")]
    DivisionByZero,

    #[error("{reason} (current semester {current}, total semesters {total})")]
    InvalidConfiguration {
        total: u32,
        current: u32,
        reason: &'static str,
    },

    /// Form text that is empty or not a number.
    #[error("Invalid input for semester {semester} {field}: {input:?} is not a number")]
    InvalidNumber {
        field: Field,
        semester: u32,
        input: String,
    },
}

impl PredictError {
    /// Stable machine-readable name, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::OutOfRange { .. } => "out_of_range",
            PredictError::ShapeMismatch { .. } => "shape_mismatch",
            PredictError::DivisionByZero => "division_by_zero",
            PredictError::InvalidConfiguration { .. } => "invalid_configuration",
            PredictError::InvalidNumber { .. } => "invalid_number",
        }
    }
}
