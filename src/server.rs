//! Single-user JSON HTTP server.
//!
//! Exposes the scoring workflow page by page: describe the job and upload
//! resumes, read the score table, read the shortlist, read the charts.
//! The server owns exactly one [`Session`]; submissions replace its results
//! and `POST /reset` clears them.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/skills` | Skill catalog offered for job descriptions |
//! | `POST` | `/submit` | Job description + base64-encoded `.docx` resumes |
//! | `GET`  | `/scores` | Score table in upload order, plus skipped files |
//! | `GET`  | `/suitable` | Shortlist: experience filter, best score first |
//! | `GET`  | `/charts` | Score and experience bar-chart data |
//! | `POST` | `/reset` | Clear the session |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "missing_fields", "message": "please fill in all fields ..." } }
//! ```
//!
//! Error codes: `bad_request` (400), `missing_fields` (400),
//! `not_submitted` (409), `payload_too_large` (413),
//! `no_readable_resumes` (422).
//!
//! Request bodies are capped at `[server] max_request_bytes`.

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use crate::analyze::{AnalysisError, Pipeline};
use crate::chart::Charts;
use crate::config::Config;
use crate::models::{Candidate, SkippedUpload, Upload};
use crate::session::{JobForm, Session, SessionError};

/// Shared state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    pipeline: Arc<Pipeline>,
    session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: Arc::new(config.clone()),
            pipeline: Arc::new(Pipeline::from_config(config)),
            session: Arc::new(Mutex::new(Session::new())),
        }
    }
}

/// Builds the router with all endpoints, the configured body limit and a
/// permissive CORS layer.
pub fn router(state: AppState) -> Router {
    let body_limit =
        usize::try_from(state.config.server.max_request_bytes).unwrap_or(usize::MAX);
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/skills", get(handle_skills))
        .route("/submit", post(handle_submit))
        .route("/scores", get(handle_scores))
        .route("/suitable", get(handle_suitable))
        .route("/charts", get(handle_charts))
        .route("/reset", post(handle_reset))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

/// Starts the server on `[server].bind` and runs until the process exits.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(bind = %bind_addr, "server started");
    println!("Resume ranker listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            AppError {
                status,
                code: "payload_too_large",
                message: format!(
                    "request body exceeds the server limit: {}",
                    rejection.body_text()
                ),
            }
        } else {
            bad_request(rejection.body_text())
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        let (status, code) = match &err {
            SessionError::MissingFields(_) => (StatusCode::BAD_REQUEST, "missing_fields"),
            SessionError::NotSubmitted => (StatusCode::CONFLICT, "not_submitted"),
            SessionError::Analysis(AnalysisError::NoReadableResumes(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "no_readable_resumes")
            }
        };
        AppError {
            status,
            code,
            message: err.to_string(),
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /skills ============

#[derive(Serialize)]
struct SkillsResponse {
    skills: Vec<String>,
}

async fn handle_skills(State(state): State<AppState>) -> Json<SkillsResponse> {
    Json(SkillsResponse {
        skills: state.config.skills.catalog.clone(),
    })
}

// ============ POST /submit ============

/// One uploaded file, content base64-encoded.
#[derive(Debug, Deserialize)]
pub struct FileBody {
    pub name: String,
    pub content_base64: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(flatten)]
    pub form: JobForm,
    #[serde(default)]
    pub files: Vec<FileBody>,
}

#[derive(Serialize)]
struct SubmitResponse {
    message: String,
    candidates: usize,
    skipped: Vec<SkippedUpload>,
}

async fn handle_submit(
    State(state): State<AppState>,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, AppError> {
    let Json(req) = body?;
    let uploads = decode_files(req.files)?;

    for skill in &req.form.skills {
        if !state.config.skills.contains(skill.trim()) {
            tracing::debug!(skill = %skill, "skill is not in the catalog");
        }
    }

    let mut session = state.session.lock().await;
    let analysis = session.submit(&req.form, &uploads, &state.pipeline)?;

    Ok(Json(SubmitResponse {
        message: "Resumes and job description submitted successfully.".to_string(),
        candidates: analysis.table.len(),
        skipped: analysis.skipped.clone(),
    }))
}

fn decode_files(files: Vec<FileBody>) -> Result<Vec<Upload>, AppError> {
    files
        .into_iter()
        .map(|f| {
            base64::engine::general_purpose::STANDARD
                .decode(f.content_base64.as_bytes())
                .map(|bytes| Upload::new(f.name.clone(), bytes))
                .map_err(|e| bad_request(format!("{}: invalid base64 content: {}", f.name, e)))
        })
        .collect()
}

// ============ GET /scores ============

#[derive(Serialize)]
struct ScoresResponse {
    submitted_at: Option<DateTime<Utc>>,
    candidates: Vec<Candidate>,
    skipped: Vec<SkippedUpload>,
}

async fn handle_scores(State(state): State<AppState>) -> Result<Json<ScoresResponse>, AppError> {
    let session = state.session.lock().await;
    Ok(Json(ScoresResponse {
        submitted_at: session.submitted_at(),
        candidates: session.scores()?.candidates.clone(),
        skipped: session.skipped()?.to_vec(),
    }))
}

// ============ GET /suitable ============

#[derive(Serialize)]
struct SuitableResponse {
    required_experience: f64,
    pick: usize,
    candidates: Vec<String>,
}

async fn handle_suitable(
    State(state): State<AppState>,
) -> Result<Json<SuitableResponse>, AppError> {
    let session = state.session.lock().await;
    let job = session.job()?;
    Ok(Json(SuitableResponse {
        required_experience: job.required_experience,
        pick: job.pick,
        candidates: session
            .suitable()?
            .into_iter()
            .map(|c| c.name.clone())
            .collect(),
    }))
}

// ============ GET /charts ============

async fn handle_charts(State(state): State<AppState>) -> Result<Json<Charts>, AppError> {
    let session = state.session.lock().await;
    Ok(Json(session.charts()?))
}

// ============ POST /reset ============

#[derive(Serialize)]
struct ResetResponse {
    status: String,
}

async fn handle_reset(State(state): State<AppState>) -> Json<ResetResponse> {
    state.session.lock().await.reset();
    tracing::info!("session reset");
    Json(ResetResponse {
        status: "reset".to_string(),
    })
}
