//! Question attempt queries
//!
//! The UNIQUE (user_id, question_id) constraint enforces the exactly-once
//! attempt rule. Attempts are immutable: created here, never updated.

use chrono::{DateTime, Utc};
use common::models::{AttemptReport, Question, QuestionAttempt};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Insert an attempt unless one already exists for the pair.
/// Under concurrent submissions exactly one caller gets `Some`; the rest
/// get `None` and surface the "already attempted" error.
pub async fn create_if_absent(
    pool: &PgPool,
    user_id: Uuid,
    question_id: Uuid,
    answer: &str,
    is_correct: bool,
    points: i32,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
) -> Result<Option<QuestionAttempt>, sqlx::Error> {
    sqlx::query_as::<_, QuestionAttempt>(
        r#"
        INSERT INTO question_attempts
            (id, user_id, question_id, answer, is_correct, points, started_at, ended_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (user_id, question_id) DO NOTHING
        RETURNING id, user_id, question_id, answer, is_correct, points, started_at, ended_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(question_id)
    .bind(answer)
    .bind(is_correct)
    .bind(points)
    .bind(started_at)
    .bind(ended_at)
    .fetch_optional(pool)
    .await
}

/// Get a user's attempt at a question, if any
pub async fn get(
    pool: &PgPool,
    user_id: Uuid,
    question_id: Uuid,
) -> Result<Option<QuestionAttempt>, sqlx::Error> {
    sqlx::query_as::<_, QuestionAttempt>(
        r#"
        SELECT id, user_id, question_id, answer, is_correct, points, started_at, ended_at
        FROM question_attempts
        WHERE user_id = $1 AND question_id = $2
        "#,
    )
    .bind(user_id)
    .bind(question_id)
    .fetch_optional(pool)
    .await
}

/// All of a user's attempts joined with their questions
pub async fn list_for_user_with_questions(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<AttemptReport>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, a.user_id, a.question_id, a.answer, a.is_correct, a.points,
               a.started_at, a.ended_at,
               q.id AS q_id, q.season_id AS q_season_id, q.content AS q_content,
               q.options AS q_options, q.answer AS q_answer, q.explanation AS q_explanation,
               q.order_index AS q_order_index, q.created_at AS q_created_at
        FROM question_attempts a
        JOIN questions q ON q.id = a.question_id
        WHERE a.user_id = $1
        ORDER BY a.ended_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| AttemptReport {
            attempt: QuestionAttempt {
                id: r.get("id"),
                user_id: r.get("user_id"),
                question_id: r.get("question_id"),
                answer: r.get("answer"),
                is_correct: r.get("is_correct"),
                points: r.get("points"),
                started_at: r.get::<DateTime<Utc>, _>("started_at"),
                ended_at: r.get::<DateTime<Utc>, _>("ended_at"),
            },
            question: Question {
                id: r.get("q_id"),
                season_id: r.get("q_season_id"),
                content: r.get("q_content"),
                options: r.get("q_options"),
                answer: r.get("q_answer"),
                explanation: r.get("q_explanation"),
                order_index: r.get("q_order_index"),
                created_at: r.get::<DateTime<Utc>, _>("q_created_at"),
            },
        })
        .collect())
}
