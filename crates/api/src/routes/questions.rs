//! Question routes: administration, gated reads, answer submission

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use common::models::{AttemptReport, PageMeta, Paginated, Question, QuestionWithAttempt};
use common::Error;
use engine::attempts::AttemptFeedback;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{require_admin, Caller};
use crate::error::{ApiError, ApiResult, DbResultExt, OptionExt};
use crate::routes::page_params;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuestionFilter {
    pub season_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub season_id: Uuid,
    pub content: String,
    pub options: Option<Vec<String>>,
    pub answer: String,
    pub explanation: String,
    pub order_index: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuestionRequest {
    pub content: Option<String>,
    pub options: Option<Vec<String>>,
    pub answer: Option<String>,
    pub explanation: Option<String>,
    pub order_index: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer: String,
}

fn check_question_shape(
    content: Option<&str>,
    answer: Option<&str>,
    options: Option<&Vec<String>>,
) -> Result<(), ApiError> {
    if matches!(content, Some(c) if c.trim().is_empty()) {
        return Err(ApiError(Error::Validation(
            "content must not be empty".to_string(),
        )));
    }
    if matches!(answer, Some(a) if a.trim().is_empty()) {
        return Err(ApiError(Error::Validation(
            "answer must not be empty".to_string(),
        )));
    }
    if matches!(options, Some(o) if o.len() < 4) {
        return Err(ApiError(Error::Validation(
            "multiple-choice questions need at least four options".to_string(),
        )));
    }
    Ok(())
}

/// List questions with pagination and an optional season filter
/// GET /api/questions
pub async fn list(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Query(filter): Query<QuestionFilter>,
) -> ApiResult<Json<Paginated<Question>>> {
    require_admin(&caller)?;
    let (page, limit) = page_params(filter.page, filter.limit)?;

    let data = db::questions::list(&state.pool, filter.season_id, (page - 1) * limit, limit)
        .await
        .db_err()?;
    let total = db::questions::count(&state.pool, filter.season_id)
        .await
        .db_err()?;

    Ok(Json(Paginated {
        data,
        meta: PageMeta::new(total, page, limit),
    }))
}

/// Create a question
/// POST /api/questions
pub async fn create(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(req): Json<CreateQuestionRequest>,
) -> ApiResult<(StatusCode, Json<Question>)> {
    require_admin(&caller)?;
    check_question_shape(
        Some(req.content.as_str()),
        Some(req.answer.as_str()),
        req.options.as_ref(),
    )?;

    db::seasons::get(&state.pool, req.season_id)
        .await
        .db_err()?
        .not_found("Season not found")?;

    let question = db::questions::create(
        &state.pool,
        req.season_id,
        req.content.trim(),
        req.options.as_ref(),
        &req.answer,
        &req.explanation,
        req.order_index,
    )
    .await
    .db_err()?;

    Ok((StatusCode::CREATED, Json(question)))
}

/// Get a single question, gated on having started its season
/// GET /api/questions/:id
pub async fn get(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Question>> {
    let (question, _progress) = state.attempts.get_question(id, caller.id).await?;
    Ok(Json(question))
}

/// Update a question. `season_id` never changes.
/// PATCH /api/questions/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateQuestionRequest>,
) -> ApiResult<Json<Question>> {
    require_admin(&caller)?;
    check_question_shape(
        req.content.as_deref(),
        req.answer.as_deref(),
        req.options.as_ref(),
    )?;

    let question = db::questions::update(
        &state.pool,
        id,
        req.content.as_deref(),
        req.options.as_ref(),
        req.answer.as_deref(),
        req.explanation.as_deref(),
        req.order_index,
    )
    .await
    .db_err()?
    .not_found("Question not found")?;

    Ok(Json(question))
}

/// Delete a question. Refused while attempts still reference it.
/// DELETE /api/questions/:id
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_admin(&caller)?;

    let deleted = db::questions::delete(&state.pool, id).await.map_err(|e| {
        if db::is_fk_violation(&e) {
            ApiError(Error::Conflict(
                "Question has recorded attempts".to_string(),
            ))
        } else {
            ApiError::from(e)
        }
    })?;

    if deleted == 0 {
        return Err(ApiError(Error::NotFound("Question not found".to_string())));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Submit an answer for a question
/// POST /api/questions/:id/submit
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitAnswerRequest>,
) -> ApiResult<(StatusCode, Json<AttemptFeedback>)> {
    let feedback = state.attempts.submit(id, &req.answer, caller.id).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

/// All questions of a season with the caller's own attempts
/// GET /api/questions/season/:season_id
pub async fn by_season(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(season_id): Path<Uuid>,
) -> ApiResult<Json<Vec<QuestionWithAttempt>>> {
    let questions = state.progress.season_questions(season_id, caller.id).await?;
    Ok(Json(questions))
}

/// The caller's attempt across all questions
/// GET /api/questions/user/progress
pub async fn user_progress(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> ApiResult<Json<Vec<AttemptReport>>> {
    let report = state.progress.attempt_report(caller.id).await?;
    Ok(Json(report))
}
