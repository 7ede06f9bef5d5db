use std::io::Write;

use clap::Parser;

use cgpa_predictor::cli::{report, Cli, Command, PredictArgs};
use cgpa_predictor::Predictor;

fn predict_args(args: &[&str]) -> PredictArgs {
    let argv: Vec<&str> = ["cgpa-predictor", "predict"]
        .into_iter()
        .chain(args.iter().copied())
        .collect();
    match Cli::try_parse_from(argv).unwrap().command {
        Command::Predict(args) => args,
        other => panic!("unexpected command: {other:?}"),
    }
}

fn run(args: &PredictArgs) -> (bool, String, String) {
    let request = args.request().unwrap();
    let mut out = Vec::new();
    let mut err = Vec::new();
    let ok = report(&Predictor::default(), &request, &mut out, &mut err).unwrap();
    (
        ok,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn test_predict_from_lists() {
    let args = predict_args(&[
        "--total", "4", "--current", "3", "--grades", "3.0,3.5", "--targets", "4,4",
        "--credits", "3,3,3,3",
    ]);
    let (ok, out, err) = run(&args);
    assert!(ok);
    assert!(out.contains("Predicted CGPA: 3.6"));
    assert!(out.contains("6 earned"));
    assert!(err.is_empty());
}

#[test]
fn test_first_semester_needs_no_grades() {
    let args = predict_args(&["--total", "2", "-c", "1", "--targets", "3,4", "--credits", "3,3"]);
    let (ok, out, _) = run(&args);
    assert!(ok);
    assert!(out.contains("Predicted CGPA: 3.50"));
}

#[test]
fn test_predict_from_plan() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "semester,gpa,credits").unwrap();
    writeln!(file, "1,2.0,1").unwrap();
    writeln!(file, "2,4.0,3").unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap();
    let args = predict_args(&["--plan", path, "--current", "2"]);
    let (ok, out, _) = run(&args);
    assert!(ok);
    assert!(out.contains("Predicted CGPA: 3.50"));
}

#[test]
fn test_invalid_prediction_reports_failure() {
    let args = predict_args(&[
        "--total", "3", "--current", "5", "--targets", "4", "--credits", "3,3,3",
    ]);
    let (ok, out, err) = run(&args);
    assert!(!ok);
    assert!(out.is_empty());
    assert!(err.contains("Current semester cannot exceed total semesters"));
}

#[test]
fn test_bad_number_is_an_argument_error() {
    let args = predict_args(&["--total", "1", "--current", "1", "--targets", "x", "--credits", "3"]);
    let err = args.request().unwrap_err();
    assert!(format!("{err:#}").contains("--targets"));
}

#[test]
fn test_plan_conflicts_with_lists() {
    let parsed = Cli::try_parse_from([
        "cgpa-predictor", "predict", "--plan", "plan.csv", "--current", "1", "--total", "2",
    ]);
    assert!(parsed.is_err());
}

#[test]
fn test_lists_required_without_plan() {
    let parsed = Cli::try_parse_from(["cgpa-predictor", "predict", "--current", "1"]);
    assert!(parsed.is_err());
}
