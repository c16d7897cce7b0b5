//! Axum route handlers for candidate submission.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::pipeline::{BatchInput, BatchResult};
use crate::intake::{IntakeError, MAX_FILE_BYTES};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ManualSubmission {
    pub sourcer_id: Uuid,
    pub profile_urls: Vec<String>,
}

/// POST /api/v1/jobs/:id/candidates
pub async fn handle_submit_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(request): Json<ManualSubmission>,
) -> Result<Json<BatchResult>, AppError> {
    let result = state
        .intake
        .submit_candidate_batch(
            job_id,
            request.sourcer_id,
            BatchInput::Manual(request.profile_urls),
        )
        .await?;
    Ok(Json(result))
}

/// POST /api/v1/jobs/:id/candidates/upload
///
/// Multipart form with a `sourcer_id` text field and a `file` part.
pub async fn handle_upload_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<BatchResult>, AppError> {
    let mut sourcer_id: Option<Uuid> = None;
    let mut file: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "sourcer_id" => {
                let raw = field.text().await.map_err(multipart_error)?;
                sourcer_id = Some(raw.trim().parse().map_err(|_| {
                    AppError::Validation("sourcer_id must be a UUID".to_string())
                })?);
            }
            "file" => {
                file = Some(field.bytes().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let sourcer_id =
        sourcer_id.ok_or_else(|| AppError::Validation("sourcer_id is required".to_string()))?;
    let file = file.ok_or_else(|| AppError::Validation("file is required".to_string()))?;

    let result = state
        .intake
        .submit_candidate_batch(job_id, sourcer_id, BatchInput::File(file))
        .await?;
    Ok(Json(result))
}

/// A body past the route's length limit is reported like any oversized file.
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return IntakeError::FileTooLarge { max: MAX_FILE_BYTES }.into();
    }
    AppError::Validation(format!("invalid multipart body: {e}"))
}
