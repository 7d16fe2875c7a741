//! HTTP request handlers for the game server.
//!
//! Implements student management, puzzle generation, word submission and
//! the leaderboard using axum.

use crate::service::{GameService, ServiceError};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use wordpool_domain::dictionary::{MAX_WORD_LENGTH, MIN_WORD_LENGTH};
use wordpool_domain::student::validate_name;
use wordpool_domain::{
    Decision, LeaderboardEntry, PuzzleId, Student, StudentId, SubmissionRecord,
};
use wordpool_store::SqliteStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Game service backed by SQLite
    pub service: Arc<GameService<SqliteStore>>,
}

/// Field name to validation messages
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Error message
    pub message: String,
    /// Per-field validation messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Service-layer error
    Service(ServiceError),
    /// Request failed validation
    Validation(FieldErrors),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Validation(errors) => {
                tracing::warn!("Validation failed: {:?}", errors);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Validation failed".to_string(),
                    Some(errors),
                )
            }
            AppError::Service(ServiceError::StudentNotFound(_)) => {
                (StatusCode::NOT_FOUND, "Student not found".to_string(), None)
            }
            AppError::Service(ServiceError::PuzzleNotFound(_)) => {
                (StatusCode::NOT_FOUND, "Puzzle not found".to_string(), None)
            }
            AppError::Service(e) => {
                tracing::error!("Request failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg, None)
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            errors,
        });
        (status, body).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        AppError::Service(e)
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Number of words in the loaded dictionary
    pub dictionary_words: usize,
}

/// Single student response
#[derive(Debug, Serialize, Deserialize)]
pub struct StudentResponse {
    /// Always true
    pub success: bool,
    /// The student
    pub student: Student,
    /// Outcome message for mutations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Student listing
#[derive(Debug, Serialize, Deserialize)]
pub struct StudentListResponse {
    /// Always true
    pub success: bool,
    /// All students
    pub students: Vec<Student>,
}

/// Message-only response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Always true
    pub success: bool,
    /// Outcome message
    pub message: String,
}

/// A student's total score
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResponse {
    /// Always true
    pub success: bool,
    /// The student
    pub student_id: StudentId,
    /// Sum of accepted scores
    pub total_score: u64,
}

/// Newly generated puzzle
#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratePuzzleResponse {
    /// Always true
    pub success: bool,
    /// The 14 puzzle letters
    pub puzzle: String,
    /// Identifier to submit words against
    pub puzzle_id: PuzzleId,
    /// Outcome message
    pub message: String,
}

/// Words formable from a full puzzle
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidWordsResponse {
    /// Always true
    pub success: bool,
    /// The puzzle
    pub puzzle_id: PuzzleId,
    /// Formable dictionary words
    pub valid_words: Vec<String>,
}

/// Outcome of a word submission
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionResponse {
    /// Whether the word was accepted
    pub valid: bool,
    /// Points awarded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    /// Puzzle letters not yet used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_letters: Option<String>,
    /// Dictionary words still formable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_words: Option<Vec<String>>,
    /// Student-facing message
    pub message: String,
}

impl From<Decision> for SubmissionResponse {
    fn from(decision: Decision) -> Self {
        let message = decision.message().to_string();
        match decision {
            Decision::Accepted(acceptance) => SubmissionResponse {
                valid: true,
                score: Some(acceptance.score),
                remaining_letters: Some(acceptance.remaining_letters),
                remaining_words: Some(acceptance.remaining_words),
                message,
            },
            Decision::Rejected(_) => SubmissionResponse {
                valid: false,
                score: None,
                remaining_letters: None,
                remaining_words: None,
                message,
            },
        }
    }
}

/// Leaderboard listing
#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    /// Always true
    pub success: bool,
    /// Best words, highest score first
    pub scores: Vec<LeaderboardEntry>,
}

/// Student submission history
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionsResponse {
    /// Always true
    pub success: bool,
    /// Newest first
    pub submissions: Vec<SubmissionRecord>,
}

fn push_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

/// Unwrap a JSON object body
///
/// Bodies that are not JSON, or not an object, fail validation on `body`
/// instead of surfacing the extractor's plain-text rejection.
fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    let message = match payload {
        Ok(Json(body)) if body.is_object() => return Ok(body),
        Ok(_) => "The request body must be a JSON object.".to_string(),
        Err(rejection) => {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            "The request body must be valid JSON.".to_string()
        }
    };

    let mut errors = FieldErrors::new();
    push_error(&mut errors, "body", message);
    Err(AppError::Validation(errors))
}

/// Read an integer field; numeric strings such as `"7"` are accepted
fn integer_field(body: &Value, field: &str, label: &str, errors: &mut FieldErrors) -> Option<i64> {
    let parsed = match body.get(field) {
        None | Some(Value::Null) => {
            push_error(errors, field, format!("The {} field is required.", label));
            return None;
        }
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        Some(_) => None,
    };

    if parsed.is_none() {
        push_error(errors, field, format!("The {} must be an integer.", label));
    }
    parsed
}

/// Read a string field; `None` once an error has been recorded
fn string_field(body: &Value, field: &str, label: &str, errors: &mut FieldErrors) -> Option<String> {
    match body.get(field) {
        None | Some(Value::Null) => {
            push_error(errors, field, format!("The {} field is required.", label));
            None
        }
        Some(Value::String(text)) if text.is_empty() => {
            push_error(errors, field, format!("The {} field is required.", label));
            None
        }
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            push_error(errors, field, format!("The {} must be a string.", label));
            None
        }
    }
}

fn validated_name(body: &Value) -> Result<String, AppError> {
    let mut errors = FieldErrors::new();
    let name = string_field(body, "name", "name", &mut errors);

    if let Some(name) = &name {
        if let Err(message) = validate_name(name) {
            push_error(&mut errors, "name", message);
        }
    }

    match name {
        Some(name) if errors.is_empty() => Ok(name),
        _ => Err(AppError::Validation(errors)),
    }
}

/// Run store-bound work on the blocking pool
async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
}

/// GET /health - Liveness check
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        dictionary_words: state.service.dictionary().len(),
    })
}

/// GET /students
async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<StudentListResponse>, AppError> {
    let students = state.service.list_students()?;
    Ok(Json(StudentListResponse {
        success: true,
        students,
    }))
}

/// POST /students
async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<StudentResponse>), AppError> {
    let name = validated_name(&json_body(payload)?)?;
    let student = state.service.create_student(&name)?;

    Ok((
        StatusCode::CREATED,
        Json(StudentResponse {
            success: true,
            student,
            message: Some("Student created successfully!".to_string()),
        }),
    ))
}

/// GET /students/:id
async fn show_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StudentResponse>, AppError> {
    let student = state.service.get_student(StudentId(id))?;
    Ok(Json(StudentResponse {
        success: true,
        student,
        message: None,
    }))
}

/// PUT /students/:id
async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<StudentResponse>, AppError> {
    let name = validated_name(&json_body(payload)?)?;
    let student = state.service.rename_student(StudentId(id), &name)?;

    Ok(Json(StudentResponse {
        success: true,
        student,
        message: Some("Student updated successfully!".to_string()),
    }))
}

/// DELETE /students/:id
async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.service.delete_student(StudentId(id))?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Student deleted successfully!".to_string(),
    }))
}

/// GET /students/:id/submissions
async fn student_submissions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SubmissionsResponse>, AppError> {
    let submissions = state.service.student_submissions(StudentId(id))?;
    Ok(Json(SubmissionsResponse {
        success: true,
        submissions,
    }))
}

/// GET /students/:id/score
async fn student_score(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ScoreResponse>, AppError> {
    let total_score = state.service.student_total_score(StudentId(id))?;
    Ok(Json(ScoreResponse {
        success: true,
        student_id: StudentId(id),
        total_score,
    }))
}

/// POST /generate-puzzle
async fn generate_puzzle(
    State(state): State<AppState>,
) -> Result<Json<GeneratePuzzleResponse>, AppError> {
    let service = Arc::clone(&state.service);
    let puzzle = run_blocking(move || Ok(service.generate_puzzle()?)).await?;
    Ok(Json(GeneratePuzzleResponse {
        success: true,
        puzzle: puzzle.letters,
        puzzle_id: puzzle.id,
        message: "Puzzle generated successfully!".to_string(),
    }))
}

/// GET /puzzles/:id/valid-words
async fn valid_words(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ValidWordsResponse>, AppError> {
    let valid_words = state.service.valid_words(PuzzleId(id))?;
    Ok(Json(ValidWordsResponse {
        success: true,
        puzzle_id: PuzzleId(id),
        valid_words,
    }))
}

/// Check a submission's shape and references, returning its fields
fn validate_submission(
    state: &AppState,
    body: &Value,
) -> Result<(StudentId, PuzzleId, String), AppError> {
    let mut errors = FieldErrors::new();

    let student_id = integer_field(body, "student_id", "student id", &mut errors).map(StudentId);
    if let Some(id) = student_id {
        if !state.service.student_exists(id)? {
            push_error(&mut errors, "student_id", "The selected student id is invalid.");
        }
    }

    let puzzle_id = integer_field(body, "puzzle_id", "puzzle id", &mut errors).map(PuzzleId);
    if let Some(id) = puzzle_id {
        if !state.service.puzzle_exists(id)? {
            push_error(&mut errors, "puzzle_id", "The selected puzzle id is invalid.");
        }
    }

    let word = string_field(body, "word", "word", &mut errors);
    if let Some(word) = &word {
        let length = word.chars().count();
        if length < MIN_WORD_LENGTH {
            push_error(
                &mut errors,
                "word",
                format!("The word must be at least {} characters.", MIN_WORD_LENGTH),
            );
        }
        if length > MAX_WORD_LENGTH {
            push_error(
                &mut errors,
                "word",
                format!("The word may not be greater than {} characters.", MAX_WORD_LENGTH),
            );
        }
        if !word.chars().all(|c| c.is_ascii_alphabetic()) {
            push_error(&mut errors, "word", "The word format is invalid.");
        }
    }

    match (student_id, puzzle_id, word) {
        (Some(student), Some(puzzle), Some(word)) if errors.is_empty() => {
            Ok((student, puzzle, word))
        }
        _ => Err(AppError::Validation(errors)),
    }
}

/// POST /submit-word
async fn submit_word(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let body = json_body(payload)?;

    let decision = run_blocking(move || {
        let (student_id, puzzle_id, word) = validate_submission(&state, &body)?;
        Ok(state.service.submit_word(student_id, puzzle_id, &word)?)
    })
    .await?;

    Ok(Json(decision.into()))
}

/// GET /leaderboard
async fn leaderboard(State(state): State<AppState>) -> Result<Json<LeaderboardResponse>, AppError> {
    let scores = state.service.top_scores()?;
    Ok(Json(LeaderboardResponse {
        success: true,
        scores,
    }))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/:id",
            get(show_student).put(update_student).delete(delete_student),
        )
        .route("/students/:id/submissions", get(student_submissions))
        .route("/students/:id/score", get(student_score))
        .route("/generate-puzzle", post(generate_puzzle))
        .route("/puzzles/:id/valid-words", get(valid_words))
        .route("/submit-word", post(submit_word))
        .route("/leaderboard", get(leaderboard))
        .with_state(state)
}
