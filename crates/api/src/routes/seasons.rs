//! Season routes: administration, lifecycle, and progress

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use common::models::{
    PageMeta, Paginated, Question, Season, SeasonProgress, SeasonProgressReport,
};
use common::Error;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{require_admin, Caller};
use crate::error::{ApiError, ApiResult, DbResultExt, OptionExt};
use crate::routes::page_params;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SeasonFilter {
    /// Narrow to seasons whose window contains this instant
    pub date: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSeasonRequest {
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSeasonRequest {
    pub title: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct SeasonDetail {
    #[serde(flatten)]
    pub season: Season,
    pub questions: Vec<Question>,
}

/// List seasons with pagination and an optional date filter
/// GET /api/seasons
pub async fn list(
    State(state): State<Arc<AppState>>,
    Caller(_caller): Caller,
    Query(filter): Query<SeasonFilter>,
) -> ApiResult<Json<Paginated<Season>>> {
    let (page, limit) = page_params(filter.page, filter.limit)?;

    let data = db::seasons::list(&state.pool, filter.date, (page - 1) * limit, limit)
        .await
        .db_err()?;
    let total = db::seasons::count(&state.pool, filter.date).await.db_err()?;

    Ok(Json(Paginated {
        data,
        meta: PageMeta::new(total, page, limit),
    }))
}

/// Create a season
/// POST /api/seasons
pub async fn create(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(req): Json<CreateSeasonRequest>,
) -> ApiResult<(StatusCode, Json<Season>)> {
    require_admin(&caller)?;

    if req.title.trim().is_empty() {
        return Err(ApiError(Error::Validation("title is required".to_string())));
    }
    if req.ends_at < req.starts_at {
        return Err(ApiError(Error::Validation(
            "ends_at must not precede starts_at".to_string(),
        )));
    }

    let season = db::seasons::create(&state.pool, req.title.trim(), req.starts_at, req.ends_at)
        .await
        .db_err()?;
    Ok((StatusCode::CREATED, Json(season)))
}

/// Get a season with its questions in display order
/// GET /api/seasons/:id
pub async fn get(
    State(state): State<Arc<AppState>>,
    Caller(_caller): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SeasonDetail>> {
    let season = db::seasons::get(&state.pool, id)
        .await
        .db_err()?
        .not_found("Season not found")?;
    let questions = db::questions::list_for_season(&state.pool, id)
        .await
        .db_err()?;

    Ok(Json(SeasonDetail { season, questions }))
}

/// Update a season's title or window
/// PATCH /api/seasons/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSeasonRequest>,
) -> ApiResult<Json<Season>> {
    require_admin(&caller)?;

    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            return Err(ApiError(Error::Validation(
                "title must not be empty".to_string(),
            )));
        }
    }

    let season = db::seasons::update(
        &state.pool,
        id,
        req.title.as_deref(),
        req.starts_at,
        req.ends_at,
    )
    .await
    .db_err()?
    .not_found("Season not found")?;

    Ok(Json(season))
}

/// Delete a season. Refused while questions or participations still
/// reference it.
/// DELETE /api/seasons/:id
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_admin(&caller)?;

    let deleted = db::seasons::delete(&state.pool, id).await.map_err(|e| {
        if db::is_fk_violation(&e) {
            ApiError(Error::Conflict(
                "Season still has questions or participations".to_string(),
            ))
        } else {
            ApiError::from(e)
        }
    })?;

    if deleted == 0 {
        return Err(ApiError(Error::NotFound("Season not found".to_string())));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Start the season for the caller
/// POST /api/seasons/:id/start
pub async fn start(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<SeasonProgress>)> {
    let progress = state.lifecycle.start(caller.id, id).await?;
    Ok((StatusCode::CREATED, Json(progress)))
}

/// Complete the season for the caller
/// POST /api/seasons/:id/complete
pub async fn complete(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SeasonProgress>> {
    let progress = state.lifecycle.complete(caller.id, id).await?;
    Ok(Json(progress))
}

/// The caller's participation in every season
/// GET /api/seasons/user/progress
pub async fn user_progress(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> ApiResult<Json<Vec<SeasonProgressReport>>> {
    let report = state.progress.season_report(caller.id).await?;
    Ok(Json(report))
}
