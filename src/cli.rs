use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::data::{load_plan, parse_list};
use crate::model::{PredictRequest, Predictor};

#[derive(Parser, Debug)]
#[command(name = "cgpa-predictor")]
#[command(about = "Predict a final CGPA from earned and expected semester grades")]
#[command(version)]
pub struct Cli {
    /// Config file path
    #[arg(long, default_value = "cgpa-predictor.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the prediction form and JSON API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long, short)]
        port: Option<u16>,
    },
    /// Run a single prediction and print the result
    Predict(PredictArgs),
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Current semester (semesters before it count as earned)
    #[arg(long, short)]
    pub current: u32,

    /// CSV plan with `semester,gpa,credits` rows
    #[arg(long, conflicts_with_all = ["total", "grades", "targets", "credits"])]
    pub plan: Option<PathBuf>,

    #[arg(long, required_unless_present = "plan")]
    pub total: Option<u32>,

    /// Earned CGPA per completed semester, comma separated
    #[arg(long)]
    pub grades: Option<String>,

    /// Expected CGPA for the current and later semesters, comma separated
    #[arg(long, required_unless_present = "plan")]
    pub targets: Option<String>,

    /// Credits for every semester, comma separated
    #[arg(long, required_unless_present = "plan")]
    pub credits: Option<String>,
}

impl PredictArgs {
    /// Builds the request from either the plan file or the list arguments.
    pub fn request(&self) -> Result<PredictRequest> {
        if let Some(path) = &self.plan {
            let plan = load_plan(path)
                .with_context(|| format!("Failed to load plan {}", path.display()))?;
            return Ok(plan.into_request(self.current));
        }

        let list = |value: &Option<String>, flag: &'static str| {
            parse_list(value.as_deref().unwrap_or_default()).context(flag)
        };
        Ok(PredictRequest {
            total_semesters: self.total.unwrap_or_default(),
            current_semester: self.current,
            historical_grades: list(&self.grades, "--grades")?,
            projected_grades: list(&self.targets, "--targets")?,
            credits: list(&self.credits, "--credits")?,
        })
    }
}

/// Prints the prediction to `out`, or the error to `err`. Returns whether
/// the prediction succeeded.
pub fn report(
    predictor: &Predictor,
    request: &PredictRequest,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<bool> {
    match predictor.predict(request) {
        Ok(prediction) => {
            writeln!(out, "Predicted CGPA: {}", prediction.display)?;
            writeln!(
                out,
                "Credits: {} earned, {} projected, {} total",
                prediction.earned_credits, prediction.projected_credits, prediction.total_credits
            )?;
            Ok(true)
        }
        Err(e) => {
            tracing::debug!(kind = e.kind(), "prediction failed");
            writeln!(err, "Error: {e}")?;
            Ok(false)
        }
    }
}
