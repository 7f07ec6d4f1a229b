//! Question queries

use chrono::{DateTime, Utc};
use common::models::{Question, QuestionAttempt, QuestionWithAttempt, SeasonProgress};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

fn question_from_row(row: &PgRow) -> Question {
    Question {
        id: row.get("id"),
        season_id: row.get("season_id"),
        content: row.get("content"),
        options: row.get("options"),
        answer: row.get("answer"),
        explanation: row.get("explanation"),
        order_index: row.get("order_index"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    }
}

/// Create a new question
pub async fn create(
    pool: &PgPool,
    season_id: Uuid,
    content: &str,
    options: Option<&Vec<String>>,
    answer: &str,
    explanation: &str,
    order_index: i32,
) -> Result<Question, sqlx::Error> {
    sqlx::query_as::<_, Question>(
        r#"
        INSERT INTO questions (id, season_id, content, options, answer, explanation, order_index, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        RETURNING id, season_id, content, options, answer, explanation, order_index, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(season_id)
    .bind(content)
    .bind(options)
    .bind(answer)
    .bind(explanation)
    .bind(order_index)
    .fetch_one(pool)
    .await
}

/// Get a question by ID
pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, season_id, content, options, answer, explanation, order_index, created_at
        FROM questions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Get a question together with the caller's participation in its season,
/// as one consistent snapshot (a single statement, not two reads).
pub async fn get_with_participation(
    pool: &PgPool,
    question_id: Uuid,
    user_id: Uuid,
) -> Result<Option<(Question, Option<SeasonProgress>)>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT q.id, q.season_id, q.content, q.options, q.answer, q.explanation,
               q.order_index, q.created_at,
               sp.id AS sp_id, sp.user_id AS sp_user_id, sp.season_id AS sp_season_id,
               sp.is_completed AS sp_is_completed, sp.started_at AS sp_started_at,
               sp.ended_at AS sp_ended_at
        FROM questions q
        LEFT JOIN season_progress sp
            ON sp.season_id = q.season_id AND sp.user_id = $2
        WHERE q.id = $1
        "#,
    )
    .bind(question_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| {
        let question = question_from_row(&r);
        let progress = r
            .get::<Option<Uuid>, _>("sp_id")
            .map(|sp_id| SeasonProgress {
                id: sp_id,
                user_id: r.get("sp_user_id"),
                season_id: r.get("sp_season_id"),
                is_completed: r.get("sp_is_completed"),
                started_at: r.get::<DateTime<Utc>, _>("sp_started_at"),
                ended_at: r.get("sp_ended_at"),
            });
        (question, progress)
    }))
}

/// List questions, ordered by display order. `season_id` narrows to one
/// season.
pub async fn list(
    pool: &PgPool,
    season_id: Option<Uuid>,
    offset: i64,
    limit: i64,
) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, season_id, content, options, answer, explanation, order_index, created_at
        FROM questions
        WHERE $1::uuid IS NULL OR season_id = $1
        ORDER BY order_index ASC, created_at ASC
        OFFSET $2 LIMIT $3
        "#,
    )
    .bind(season_id)
    .bind(offset)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Count questions matching the same filter as [`list`]
pub async fn count(pool: &PgPool, season_id: Option<Uuid>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM questions
        WHERE $1::uuid IS NULL OR season_id = $1
        "#,
    )
    .bind(season_id)
    .fetch_one(pool)
    .await
}

/// All questions of a season in display order, each with the caller's own
/// attempt if one exists
pub async fn list_for_season_with_attempts(
    pool: &PgPool,
    season_id: Uuid,
    user_id: Uuid,
) -> Result<Vec<QuestionWithAttempt>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT q.id, q.season_id, q.content, q.options, q.answer, q.explanation,
               q.order_index, q.created_at,
               a.id AS a_id, a.user_id AS a_user_id, a.question_id AS a_question_id,
               a.answer AS a_answer, a.is_correct AS a_is_correct, a.points AS a_points,
               a.started_at AS a_started_at, a.ended_at AS a_ended_at
        FROM questions q
        LEFT JOIN question_attempts a
            ON a.question_id = q.id AND a.user_id = $2
        WHERE q.season_id = $1
        ORDER BY q.order_index ASC, q.created_at ASC
        "#,
    )
    .bind(season_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| {
            let question = question_from_row(&r);
            let attempt = r.get::<Option<Uuid>, _>("a_id").map(|a_id| QuestionAttempt {
                id: a_id,
                user_id: r.get("a_user_id"),
                question_id: r.get("a_question_id"),
                answer: r.get("a_answer"),
                is_correct: r.get("a_is_correct"),
                points: r.get("a_points"),
                started_at: r.get::<DateTime<Utc>, _>("a_started_at"),
                ended_at: r.get::<DateTime<Utc>, _>("a_ended_at"),
            });
            QuestionWithAttempt { question, attempt }
        })
        .collect())
}

/// All questions of a season in display order, unpaginated
pub async fn list_for_season(pool: &PgPool, season_id: Uuid) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, season_id, content, options, answer, explanation, order_index, created_at
        FROM questions
        WHERE season_id = $1
        ORDER BY order_index ASC, created_at ASC
        "#,
    )
    .bind(season_id)
    .fetch_all(pool)
    .await
}

/// Highest order_index currently used in a season, if it has questions
pub async fn max_order_index(pool: &PgPool, season_id: Uuid) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<i32>>(
        "SELECT MAX(order_index) FROM questions WHERE season_id = $1",
    )
    .bind(season_id)
    .fetch_one(pool)
    .await
}

/// Update question fields; absent fields keep their value. `season_id`
/// never changes after creation.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    content: Option<&str>,
    options: Option<&Vec<String>>,
    answer: Option<&str>,
    explanation: Option<&str>,
    order_index: Option<i32>,
) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(
        r#"
        UPDATE questions
        SET content = COALESCE($2, content),
            options = COALESCE($3, options),
            answer = COALESCE($4, answer),
            explanation = COALESCE($5, explanation),
            order_index = COALESCE($6, order_index)
        WHERE id = $1
        RETURNING id, season_id, content, options, answer, explanation, order_index, created_at
        "#,
    )
    .bind(id)
    .bind(content)
    .bind(options)
    .bind(answer)
    .bind(explanation)
    .bind(order_index)
    .fetch_optional(pool)
    .await
}

/// Delete a question. Fails with a foreign-key violation while attempts
/// still reference it; the caller translates that.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
