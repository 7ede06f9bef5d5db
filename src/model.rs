use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{Bound, Field, PredictError, Result};
use crate::form::format_cgpa;

/// One prediction request, as collected from the form.
///
/// Grades for semesters `1..current_semester` come from `historical_grades`,
/// the rest from `projected_grades`. `credits` covers every semester.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictRequest {
    pub total_semesters: u32,
    pub current_semester: u32,
    #[serde(default)]
    pub historical_grades: Vec<f64>,
    pub projected_grades: Vec<f64>,
    pub credits: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Prediction {
    pub cgpa: f64,
    /// `cgpa` rounded for display.
    pub display: String,
    pub total_credits: f64,
    pub earned_credits: f64,
    pub projected_credits: f64,
}

/// Validation bounds for grades and credits, plus the input step hints
/// handed to the form.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Bounds {
    pub min_grade: f64,
    pub max_grade: f64,
    pub min_credit: f64,
    pub max_credit: f64,
    pub grade_step: f64,
    pub credit_step: f64,
    /// Upper limit on `total_semesters` for layouts and predictions.
    pub max_semesters: u32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_grade: 0.0,
            max_grade: 4.0,
            min_credit: 0.01,
            max_credit: 30.0,
            grade_step: 0.01,
            credit_step: 0.5,
            max_semesters: 20,
        }
    }
}

// Scenario batch structures
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScenarioOutcome {
    pub scenario: usize,
    pub prediction: Option<Prediction>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScenarioSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub best_cgpa: Option<f64>,
    pub worst_cgpa: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScenarioBatch {
    pub total_scenarios: usize,
    pub outcomes: Vec<ScenarioOutcome>,
    pub summary: ScenarioSummary,
}

#[derive(Debug, Clone)]
pub struct Predictor {
    bounds: Bounds,
    precision: usize,
}

impl Default for Predictor {
    fn default() -> Self {
        Self::new(Bounds::default())
    }
}

impl Predictor {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            precision: 2,
        }
    }

    /// Number of decimals used for `Prediction::display`.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Credit-weighted CGPA across all semesters.
    pub fn cgpa(&self, request: &PredictRequest) -> Result<f64> {
        self.predict(request).map(|prediction| prediction.cgpa)
    }

    pub fn predict(&self, request: &PredictRequest) -> Result<Prediction> {
        let (grades, credits) = self.validated(request)?;
        let total_credits = credits.sum();
        let cgpa = (grades.dot(&credits) / total_credits)
            .clamp(self.bounds.min_grade, self.bounds.max_grade);

        let earned = request.current_semester as usize - 1;
        let earned_credits: f64 = credits.iter().take(earned).sum();

        Ok(Prediction {
            cgpa,
            display: format_cgpa(cgpa, self.precision),
            total_credits,
            earned_credits,
            projected_credits: total_credits - earned_credits,
        })
    }

    /// Evaluate independent what-if scenarios. A failing scenario does not
    /// stop the others.
    pub fn predict_many(&self, requests: &[PredictRequest]) -> ScenarioBatch {
        let mut outcomes = Vec::with_capacity(requests.len());
        let mut succeeded = 0;
        let mut best: Option<f64> = None;
        let mut worst: Option<f64> = None;

        for (i, request) in requests.iter().enumerate() {
            match self.predict(request) {
                Ok(prediction) => {
                    succeeded += 1;
                    best = Some(best.map_or(prediction.cgpa, |b| b.max(prediction.cgpa)));
                    worst = Some(worst.map_or(prediction.cgpa, |w| w.min(prediction.cgpa)));
                    outcomes.push(ScenarioOutcome {
                        scenario: i + 1,
                        prediction: Some(prediction),
                        error: None,
                    });
                }
                Err(err) => outcomes.push(ScenarioOutcome {
                    scenario: i + 1,
                    prediction: None,
                    error: Some(err.to_string()),
                }),
            }
        }

        let total_scenarios = outcomes.len();
        ScenarioBatch {
            total_scenarios,
            outcomes,
            summary: ScenarioSummary {
                succeeded,
                failed: total_scenarios - succeeded,
                best_cgpa: best,
                worst_cgpa: worst,
            },
        }
    }

    /// Runs every check in order and returns the per-semester grade and
    /// credit vectors, aligned by semester.
    fn validated(&self, request: &PredictRequest) -> Result<(Array1<f64>, Array1<f64>)> {
        check_semesters(
            request.total_semesters,
            request.current_semester,
            self.bounds.max_semesters,
        )?;

        let total = request.total_semesters as usize;
        let current = request.current_semester as usize;
        check_len(Field::HistoricalGrade, current - 1, &request.historical_grades)?;
        check_len(Field::ProjectedGrade, total - current + 1, &request.projected_grades)?;
        check_len(Field::Credits, total, &request.credits)?;

        // A negative credit is reported by its own range check below.
        let non_negative = request.credits.iter().all(|&c| c >= 0.0);
        if non_negative && request.credits.iter().sum::<f64>() == 0.0 {
            return Err(PredictError::DivisionByZero);
        }

        let b = &self.bounds;
        for (i, &grade) in request.historical_grades.iter().enumerate() {
            check_range(Field::HistoricalGrade, i + 1, grade, b.min_grade, b.max_grade)?;
        }
        for (i, &grade) in request.projected_grades.iter().enumerate() {
            check_range(Field::ProjectedGrade, current + i, grade, b.min_grade, b.max_grade)?;
        }
        for (i, &credit) in request.credits.iter().enumerate() {
            check_range(Field::Credits, i + 1, credit, b.min_credit, b.max_credit)?;
        }

        let grades: Array1<f64> = request
            .historical_grades
            .iter()
            .chain(request.projected_grades.iter())
            .copied()
            .collect();
        Ok((grades, Array1::from_vec(request.credits.clone())))
    }
}

/// Total and current semester must both be positive with
/// `current <= total <= max_semesters`.
pub fn check_semesters(total: u32, current: u32, max_semesters: u32) -> Result<()> {
    let reason = if total == 0 {
        "Total semesters must be at least 1"
    } else if total > max_semesters {
        "Total semesters exceeds the configured maximum"
    } else if current == 0 {
        "Current semester must be at least 1"
    } else if current > total {
        "Current semester cannot exceed total semesters"
    } else {
        return Ok(());
    };
    Err(PredictError::InvalidConfiguration {
        total,
        current,
        reason,
    })
}

fn check_len(field: Field, expected: usize, values: &[f64]) -> Result<()> {
    if values.len() != expected {
        return Err(PredictError::ShapeMismatch {
            field,
            expected,
            actual: values.len(),
        });
    }
    Ok(())
}

fn check_range(field: Field, semester: usize, value: f64, min: f64, max: f64) -> Result<()> {
    let bound = if !value.is_finite() {
        Bound::Finite
    } else if value < min {
        Bound::Minimum(min)
    } else if value > max {
        Bound::Maximum(max)
    } else {
        return Ok(());
    };
    Err(PredictError::OutOfRange {
        field,
        semester: semester as u32,
        value,
        bound,
        min,
        max,
    })
}
