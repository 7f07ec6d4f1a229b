//! Season participation queries
//!
//! The UNIQUE (user_id, season_id) constraint is the enforcement point for
//! the one-participation invariant; every write here is a single
//! conditional statement against it.

use chrono::{DateTime, Utc};
use common::models::{Season, SeasonProgress, SeasonProgressReport};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Insert a participation unless one already exists for the pair.
/// Returns `None` when another row won the constraint — concurrent or not —
/// in which case the caller re-reads the winner's row (fetch-or-create).
pub async fn create_if_absent(
    pool: &PgPool,
    user_id: Uuid,
    season_id: Uuid,
) -> Result<Option<SeasonProgress>, sqlx::Error> {
    sqlx::query_as::<_, SeasonProgress>(
        r#"
        INSERT INTO season_progress (id, user_id, season_id, is_completed, started_at)
        VALUES ($1, $2, $3, FALSE, NOW())
        ON CONFLICT (user_id, season_id) DO NOTHING
        RETURNING id, user_id, season_id, is_completed, started_at, ended_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(season_id)
    .fetch_optional(pool)
    .await
}

/// Get a user's participation in a season
pub async fn get(
    pool: &PgPool,
    user_id: Uuid,
    season_id: Uuid,
) -> Result<Option<SeasonProgress>, sqlx::Error> {
    sqlx::query_as::<_, SeasonProgress>(
        r#"
        SELECT id, user_id, season_id, is_completed, started_at, ended_at
        FROM season_progress
        WHERE user_id = $1 AND season_id = $2
        "#,
    )
    .bind(user_id)
    .bind(season_id)
    .fetch_optional(pool)
    .await
}

/// Mark a participation completed, but only if it is still open.
/// Returns `None` both when no row exists and when it was already
/// completed; the caller disambiguates with a follow-up read. The
/// transition is terminal: nothing ever sets `is_completed` back.
pub async fn complete_if_open(
    pool: &PgPool,
    user_id: Uuid,
    season_id: Uuid,
) -> Result<Option<SeasonProgress>, sqlx::Error> {
    sqlx::query_as::<_, SeasonProgress>(
        r#"
        UPDATE season_progress
        SET is_completed = TRUE, ended_at = NOW()
        WHERE user_id = $1 AND season_id = $2 AND is_completed = FALSE
        RETURNING id, user_id, season_id, is_completed, started_at, ended_at
        "#,
    )
    .bind(user_id)
    .bind(season_id)
    .fetch_optional(pool)
    .await
}

/// All of a user's participations joined with their seasons
pub async fn list_for_user_with_seasons(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<SeasonProgressReport>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT sp.id, sp.user_id, sp.season_id, sp.is_completed, sp.started_at, sp.ended_at,
               s.id AS s_id, s.title AS s_title, s.starts_at AS s_starts_at,
               s.ends_at AS s_ends_at, s.created_at AS s_created_at
        FROM season_progress sp
        JOIN seasons s ON s.id = sp.season_id
        WHERE sp.user_id = $1
        ORDER BY sp.started_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| SeasonProgressReport {
            progress: SeasonProgress {
                id: r.get("id"),
                user_id: r.get("user_id"),
                season_id: r.get("season_id"),
                is_completed: r.get("is_completed"),
                started_at: r.get::<DateTime<Utc>, _>("started_at"),
                ended_at: r.get("ended_at"),
            },
            season: Season {
                id: r.get("s_id"),
                title: r.get("s_title"),
                starts_at: r.get::<DateTime<Utc>, _>("s_starts_at"),
                ends_at: r.get::<DateTime<Utc>, _>("s_ends_at"),
                created_at: r.get::<DateTime<Utc>, _>("s_created_at"),
            },
        })
        .collect())
}
