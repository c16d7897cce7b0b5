use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::intake::IntakeError;
use crate::jobs::JobError;
use crate::store::StoreError;

/// Status, machine-readable code, message, optional structured details.
type ErrorParts = (StatusCode, &'static str, String, Option<Value>);

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error(transparent)]
    Job(#[from] JobError),
}

impl AppError {
    fn parts(&self) -> ErrorParts {
        match self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            AppError::Intake(e) => intake_parts(e),
            AppError::Job(e) => job_parts(e),
        }
    }
}

fn persistence(e: &StoreError) -> ErrorParts {
    tracing::error!("Persistence error: {e}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "PERSISTENCE_ERROR",
        "A database error occurred".to_string(),
        None,
    )
}

fn intake_parts(e: &IntakeError) -> ErrorParts {
    let bad_request =
        |code: &'static str| -> ErrorParts { (StatusCode::BAD_REQUEST, code, e.to_string(), None) };
    match e {
        IntakeError::EmptyBatch => bad_request("EMPTY_BATCH"),
        IntakeError::BatchTooLarge { .. } => bad_request("BATCH_TOO_LARGE"),
        IntakeError::InvalidIdentifier(bad) => (
            StatusCode::BAD_REQUEST,
            "INVALID_IDENTIFIER",
            e.to_string(),
            Some(json!({ "invalid": bad })),
        ),
        IntakeError::MalformedFile(_) => bad_request("MALFORMED_FILE"),
        IntakeError::FileTooLarge { .. } => (
            StatusCode::PAYLOAD_TOO_LARGE,
            "FILE_TOO_LARGE",
            e.to_string(),
            None,
        ),
        IntakeError::Job(job) => job_parts(job),
        IntakeError::Persistence(store) => persistence(store),
    }
}

fn job_parts(e: &JobError) -> ErrorParts {
    let message = e.to_string();
    match e {
        JobError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
        JobError::AlreadyClaimed => (StatusCode::CONFLICT, "ALREADY_CLAIMED", message, None),
        JobError::NotJobOwner => (StatusCode::FORBIDDEN, "NOT_JOB_OWNER", message, None),
        JobError::InvalidState { current } => (
            StatusCode::CONFLICT,
            "INVALID_STATE",
            message,
            Some(json!({ "current": current })),
        ),
        JobError::QuotaNotMet { current, required } => (
            StatusCode::CONFLICT,
            "QUOTA_NOT_MET",
            message,
            Some(json!({ "current": current, "required": required })),
        ),
        JobError::InvalidJob(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message, None),
        JobError::Persistence(store) => persistence(store),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.parts();

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
