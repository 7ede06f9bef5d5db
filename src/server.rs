use actix_web::{
    error::InternalError, http::StatusCode, web, App, HttpResponse, HttpServer, ResponseError,
};
use serde::{Deserialize, Serialize};

use crate::error::PredictError;
use crate::form::{RawForm, SemesterLayout};
use crate::model::{PredictRequest, Predictor};

#[derive(Deserialize)]
pub struct LayoutQuery {
    pub total: u32,
    pub current: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

impl ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(ErrorBody {
            error: self.to_string(),
            kind: self.kind().to_string(),
        })
    }
}

// Semester input layout endpoint
async fn layout(
    query: web::Query<LayoutQuery>,
    predictor: web::Data<Predictor>,
) -> Result<HttpResponse, PredictError> {
    let layout = SemesterLayout::new(query.total, query.current, predictor.bounds())?;
    tracing::debug!(
        total = query.total,
        current = query.current,
        fields = layout.field_count(),
        "generated semester layout"
    );
    Ok(HttpResponse::Ok().json(layout))
}

// Prediction endpoint
async fn predict(
    req: web::Json<PredictRequest>,
    predictor: web::Data<Predictor>,
) -> Result<HttpResponse, PredictError> {
    let prediction = predictor.predict(&req).map_err(|err| {
        tracing::warn!(kind = err.kind(), "rejected prediction: {err}");
        err
    })?;
    tracing::info!(
        total = req.total_semesters,
        current = req.current_semester,
        cgpa = prediction.cgpa,
        "predicted CGPA"
    );
    Ok(HttpResponse::Ok().json(prediction))
}

// Raw form endpoint, called on every edit and on submit
async fn predict_form(
    form: web::Json<RawForm>,
    predictor: web::Data<Predictor>,
) -> Result<HttpResponse, PredictError> {
    if !form.is_complete(predictor.bounds()) {
        return Ok(HttpResponse::NoContent().finish());
    }
    let request = form.parse(predictor.bounds())?;
    let prediction = predictor.predict(&request)?;
    tracing::debug!(cgpa = prediction.cgpa, "form prediction");
    Ok(HttpResponse::Ok().json(prediction))
}

// What-if scenarios endpoint
async fn predict_scenarios(
    web::Json(requests): web::Json<Vec<PredictRequest>>,
    predictor: web::Data<Predictor>,
) -> HttpResponse {
    let batch = predictor.predict_many(&requests);
    tracing::info!(
        scenarios = batch.total_scenarios,
        failed = batch.summary.failed,
        "evaluated scenarios"
    );
    HttpResponse::Ok().json(batch)
}

// Active validation bounds
async fn get_bounds(predictor: web::Data<Predictor>) -> HttpResponse {
    HttpResponse::Ok().json(predictor.bounds())
}

// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("CGPA Predictor API is running!")
}

// Homepage endpoint
async fn serve_homepage() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(HOMEPAGE)
}

fn bad_request<E>(err: E, kind: &str) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    tracing::warn!(kind, "malformed request: {err}");
    let body = ErrorBody {
        error: err.to_string(),
        kind: kind.to_string(),
    };
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    // Extractor failures answer with the same body as validation errors.
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, _req| bad_request(err, "invalid_json")),
    )
    .app_data(
        web::QueryConfig::default().error_handler(|err, _req| bad_request(err, "invalid_query")),
    )
    .route("/", web::get().to(serve_homepage))
        .route("/layout", web::get().to(layout))
        .route("/predict", web::post().to(predict))
        .route("/predict/form", web::post().to(predict_form))
        .route("/predict/scenarios", web::post().to(predict_scenarios))
        .route("/bounds", web::get().to(get_bounds))
        .route("/health", web::get().to(health_check));
}

pub async fn start_api(predictor: Predictor, host: &str, port: u16) -> std::io::Result<()> {
    let predictor = web::Data::new(predictor);

    tracing::info!("Starting CGPA Predictor on http://{host}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(predictor.clone())
            .configure(routes)
    })
    .bind((host, port))?
    .run()
    .await
}

const HOMEPAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>CGPA Predictor</title>
    <style>
        body { font-family: Arial, sans-serif; max-width: 800px; margin: 50px auto; padding: 20px; background: #fff; color: #222; }
        body.dark { background: #1e1e2e; color: #e0e0e0; }
        .container { background: #f5f5f5; padding: 25px; border-radius: 10px; }
        body.dark .container { background: #2a2a3c; }
        .form-group { margin: 15px 0; }
        label { display: block; margin-bottom: 5px; font-weight: bold; }
        input { width: 100%; padding: 10px; border: 1px solid #ddd; border-radius: 4px; box-sizing: border-box; }
        button { background: #007bff; color: white; padding: 12px 24px; border: none; border-radius: 4px; cursor: pointer; margin: 5px 0; }
        button:hover { background: #0056b3; }
        .grid { display: grid; grid-template-columns: 1fr 1fr; gap: 10px; }
        .section { display: none; margin-top: 15px; }
        .show { display: block; }
        .result { margin-top: 20px; padding: 20px; border-radius: 5px; display: none; background: #d4edda; color: #155724; }
        .error { margin-top: 20px; padding: 15px; border-radius: 5px; display: none; background: #f8d7da; color: #721c24; }
        .theme-toggle { float: right; background: #6f42c1; }
    </style>
</head>
<body>
    <div class="container">
        <button class="theme-toggle" type="button" onclick="toggleTheme()">Dark Mode</button>
        <h1>CGPA Predictor</h1>
        <p>Enter your earned and expected semester grades to forecast your final CGPA.</p>

        <form id="cgpaForm">
            <div class="form-group">
                <label for="totalSemesters">Total Semesters:</label>
                <input type="number" id="totalSemesters" min="1" step="1" required>
            </div>
            <div class="form-group">
                <label for="currentSemester">Current Semester:</label>
                <input type="number" id="currentSemester" min="1" step="1" required>
            </div>

            <div id="semesterInputs" class="section">
                <div id="previousSection" class="section">
                    <h3>Earned CGPA</h3>
                    <div id="previousGrid" class="grid"></div>
                </div>
                <div id="expectedSection" class="section show">
                    <h3>Expected CGPA</h3>
                    <div id="expectedGrid" class="grid"></div>
                </div>
                <div class="section show">
                    <h3>Credits</h3>
                    <div id="creditsGrid" class="grid"></div>
                </div>
                <button type="submit">Predict CGPA</button>
            </div>
        </form>

        <div id="errorMessage" class="error"></div>
        <div id="result" class="result">
            <h3>Predicted CGPA: <span id="cgpaValue"></span></h3>
            <p id="creditSummary"></p>
        </div>
    </div>

    <script>
        let layout = null;

        function fieldInput(spec) {
            return `<div class="semester-item">
                <label for="${spec.id}">${spec.label}</label>
                <input type="number" id="${spec.id}" step="${spec.step}" min="${spec.min}" max="${spec.max}" required>
            </div>`;
        }

        async function updateLayout() {
            const total = parseInt(document.getElementById('totalSemesters').value);
            const current = parseInt(document.getElementById('currentSemester').value);
            if (!total || !current) return;

            const response = await fetch(`/layout?total=${total}&current=${current}`);
            const data = await response.json();
            if (!response.ok) return showError(data.error);

            hideError();
            layout = data;
            document.getElementById('previousGrid').innerHTML = layout.historical.map(fieldInput).join('');
            document.getElementById('expectedGrid').innerHTML = layout.projected.map(fieldInput).join('');
            document.getElementById('creditsGrid').innerHTML = layout.credits.map(fieldInput).join('');
            document.getElementById('previousSection').classList.toggle('show', layout.show_historical);
            document.getElementById('semesterInputs').classList.add('show');
        }

        function rawForm() {
            const values = specs => specs.map(spec => document.getElementById(spec.id).value);
            return {
                total_semesters: layout.total_semesters,
                current_semester: layout.current_semester,
                historical: values(layout.historical),
                projected: values(layout.projected),
                credits: values(layout.credits)
            };
        }

        async function submitForm(auto) {
            if (!layout) return;
            const response = await fetch('/predict/form', {
                method: 'POST',
                headers: {'Content-Type': 'application/json'},
                body: JSON.stringify(rawForm())
            });
            if (response.status === 204) {
                if (!auto) showError('Please fill in every semester field');
                return;
            }
            const data = await response.json();
            if (!response.ok) {
                if (auto) console.log('Auto-calc skipped:', data.error);
                else showError(data.error);
                return;
            }
            hideError();
            document.getElementById('cgpaValue').textContent = data.display;
            document.getElementById('creditSummary').textContent =
                `${data.earned_credits} credits earned, ${data.projected_credits} credits to go`;
            document.getElementById('result').style.display = 'block';
        }

        function showError(message) {
            const el = document.getElementById('errorMessage');
            el.textContent = message;
            el.style.display = 'block';
            setTimeout(hideError, 5000);
        }

        function hideError() {
            document.getElementById('errorMessage').style.display = 'none';
        }

        function toggleTheme() {
            const isDark = document.body.classList.toggle('dark');
            document.querySelector('.theme-toggle').textContent = isDark ? 'Light Mode' : 'Dark Mode';
            localStorage.setItem('theme', isDark ? 'dark' : 'light');
        }

        document.addEventListener('DOMContentLoaded', () => {
            if (localStorage.getItem('theme') === 'dark') {
                document.body.classList.add('dark');
                document.querySelector('.theme-toggle').textContent = 'Light Mode';
            }
            document.getElementById('totalSemesters').addEventListener('input', updateLayout);
            document.getElementById('currentSemester').addEventListener('input', updateLayout);
            document.getElementById('semesterInputs').addEventListener('input', () => submitForm(true));
            document.getElementById('cgpaForm').addEventListener('submit', e => {
                e.preventDefault();
                submitForm(false);
            });
        });
    </script>
</body>
</html>
"#;
