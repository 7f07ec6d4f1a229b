//! Document ingestion routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::Error;
use ingest::{IngestError, IngestResult, JobStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{require_admin, Caller};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub season_id: Uuid,
    /// Recognized document text; the recognition step itself happens
    /// upstream of this API.
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub job_id: Uuid,
}

fn translate(e: IngestError) -> ApiError {
    match e {
        IngestError::JobNotFound => ApiError(Error::NotFound("Job not found".to_string())),
        IngestError::SeasonNotFound => ApiError(Error::NotFound("Season not found".to_string())),
        IngestError::NotCompleted => {
            ApiError(Error::Conflict("Job is not completed".to_string()))
        }
        IngestError::Database(e) => ApiError(Error::Database(e.to_string())),
    }
}

/// Queue a recognized document for question extraction
/// POST /api/ingest/upload
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(req): Json<UploadRequest>,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    require_admin(&caller)?;

    if req.text.trim().is_empty() {
        return Err(ApiError(Error::Validation(
            "document text is required".to_string(),
        )));
    }

    let job_id = state
        .ingester
        .enqueue(req.season_id, req.text)
        .await
        .map_err(translate)?;

    Ok((StatusCode::ACCEPTED, Json(UploadResponse { job_id })))
}

/// Poll a job's state and progress
/// GET /api/ingest/status/:job_id
pub async fn status(
    State(state): State<Arc<AppState>>,
    Caller(_caller): Caller,
    Path(job_id): Path<Uuid>,
) -> ApiResult<Json<JobStatus>> {
    let status = state
        .ingester
        .status(job_id)
        .await
        .ok_or_else(|| ApiError(Error::NotFound("Job not found".to_string())))?;
    Ok(Json(status))
}

/// Fetch a completed job's result payload
/// GET /api/ingest/result/:job_id
pub async fn result(
    State(state): State<Arc<AppState>>,
    Caller(_caller): Caller,
    Path(job_id): Path<Uuid>,
) -> ApiResult<Json<IngestResult>> {
    let result = state.ingester.result(job_id).await.map_err(translate)?;
    Ok(Json(result))
}
