use std::io::Write;

use cgpa_predictor::data::{load_plan, DataError};
use cgpa_predictor::{Field, PredictError, PredictRequest, Predictor};

fn four_semesters() -> PredictRequest {
    PredictRequest {
        total_semesters: 4,
        current_semester: 3,
        historical_grades: vec![3.0, 3.5],
        projected_grades: vec![4.0, 4.0],
        credits: vec![3.0, 3.0, 3.0, 3.0],
    }
}

#[test]
fn test_equal_credits_average() {
    let prediction = Predictor::default().predict(&four_semesters()).unwrap();
    assert_eq!(prediction.cgpa, 3.625);
    assert_eq!(prediction.total_credits, 12.0);
}

#[test]
fn test_all_zero_credits() {
    let mut req = four_semesters();
    req.credits = vec![0.0; 4];
    assert_eq!(Predictor::default().cgpa(&req), Err(PredictError::DivisionByZero));
}

#[test]
fn test_grade_above_four() {
    let mut req = four_semesters();
    req.historical_grades[0] = 4.5;
    assert!(matches!(
        Predictor::default().cgpa(&req),
        Err(PredictError::OutOfRange {
            field: Field::HistoricalGrade,
            semester: 1,
            ..
        })
    ));
}

#[test]
fn test_current_after_total() {
    let req = PredictRequest {
        total_semesters: 3,
        current_semester: 5,
        historical_grades: vec![3.0; 4],
        projected_grades: vec![],
        credits: vec![3.0; 3],
    };
    assert!(matches!(
        Predictor::default().cgpa(&req),
        Err(PredictError::InvalidConfiguration { total: 3, current: 5, .. })
    ));
}

#[test]
fn test_credit_above_thirty() {
    let mut req = four_semesters();
    req.credits[2] = 31.0;
    assert!(matches!(
        Predictor::default().cgpa(&req),
        Err(PredictError::OutOfRange {
            field: Field::Credits,
            semester: 3,
            ..
        })
    ));
}

#[test]
fn test_missing_credit() {
    let mut req = four_semesters();
    req.credits.pop();
    assert_eq!(
        Predictor::default().cgpa(&req),
        Err(PredictError::ShapeMismatch {
            field: Field::Credits,
            expected: 4,
            actual: 3,
        })
    );
}

#[test]
fn test_request_json_shape() {
    let req: PredictRequest = serde_json::from_str(
        r#"{
            "total_semesters": 2,
            "current_semester": 1,
            "projected_grades": [3.0, 3.5],
            "credits": [15, 15]
        }"#,
    )
    .unwrap();
    assert!(req.historical_grades.is_empty());
    assert_eq!(Predictor::default().cgpa(&req).unwrap(), 3.25);
}

#[test]
fn test_plan_file_prediction() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "semester,gpa,credits").unwrap();
    writeln!(file, "2,3.5,3").unwrap();
    writeln!(file, "1,3.0,3").unwrap();
    writeln!(file, "3,4.0,3").unwrap();
    writeln!(file, "4,4.0,3").unwrap();
    file.flush().unwrap();

    let request = load_plan(file.path()).unwrap().into_request(3);
    assert_eq!(request, four_semesters());
    assert_eq!(Predictor::default().cgpa(&request).unwrap(), 3.625);
}

#[test]
fn test_plan_file_with_bad_row() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "semester,gpa,credits").unwrap();
    writeln!(file, "1,three,3").unwrap();
    file.flush().unwrap();

    assert!(matches!(load_plan(file.path()), Err(DataError::Csv(_))));
}
