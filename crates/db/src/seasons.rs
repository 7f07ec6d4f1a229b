//! Season queries

use chrono::{DateTime, Utc};
use common::models::Season;
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new season
pub async fn create(
    pool: &PgPool,
    title: &str,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> Result<Season, sqlx::Error> {
    sqlx::query_as::<_, Season>(
        r#"
        INSERT INTO seasons (id, title, starts_at, ends_at, created_at)
        VALUES ($1, $2, $3, $4, NOW())
        RETURNING id, title, starts_at, ends_at, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(starts_at)
    .bind(ends_at)
    .fetch_one(pool)
    .await
}

/// Get a season by ID
pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Season>, sqlx::Error> {
    sqlx::query_as::<_, Season>(
        r#"
        SELECT id, title, starts_at, ends_at, created_at
        FROM seasons
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// List seasons, newest window first. `date` filters to seasons whose
/// window contains that instant.
pub async fn list(
    pool: &PgPool,
    date: Option<DateTime<Utc>>,
    offset: i64,
    limit: i64,
) -> Result<Vec<Season>, sqlx::Error> {
    sqlx::query_as::<_, Season>(
        r#"
        SELECT id, title, starts_at, ends_at, created_at
        FROM seasons
        WHERE $1::timestamptz IS NULL OR (starts_at <= $1 AND ends_at >= $1)
        ORDER BY starts_at DESC
        OFFSET $2 LIMIT $3
        "#,
    )
    .bind(date)
    .bind(offset)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Count seasons matching the same filter as [`list`]
pub async fn count(pool: &PgPool, date: Option<DateTime<Utc>>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM seasons
        WHERE $1::timestamptz IS NULL OR (starts_at <= $1 AND ends_at >= $1)
        "#,
    )
    .bind(date)
    .fetch_one(pool)
    .await
}

/// Update title and window; absent fields keep their value
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    title: Option<&str>,
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
) -> Result<Option<Season>, sqlx::Error> {
    sqlx::query_as::<_, Season>(
        r#"
        UPDATE seasons
        SET title = COALESCE($2, title),
            starts_at = COALESCE($3, starts_at),
            ends_at = COALESCE($4, ends_at)
        WHERE id = $1
        RETURNING id, title, starts_at, ends_at, created_at
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(starts_at)
    .bind(ends_at)
    .fetch_optional(pool)
    .await
}

/// Delete a season. Fails with a foreign-key violation while questions or
/// participations still reference it; the caller translates that.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM seasons WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
