//! Database layer for Quiz Seasons
//!
//! The storage layer is the single source of truth for the uniqueness
//! invariants: one participation per (user, season), one attempt per
//! (user, question). Both are UNIQUE constraints in the schema, and every
//! mutating query here is a single atomic statement against them.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

pub mod attempts;
pub mod progress;
pub mod questions;
pub mod seasons;
pub mod users;

#[cfg(test)]
mod contracts_test;

/// Create a database connection pool
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    info!("Database connected");
    Ok(pool)
}

/// Run database migrations from SQL files
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Running migrations...");

    let migration_sql = include_str!("../../../migrations/001_initial.sql");
    sqlx::raw_sql(migration_sql).execute(pool).await?;

    info!("Migrations complete");
    Ok(())
}

/// True when the error is a unique-constraint violation (Postgres 23505).
/// Callers translate this into the domain Conflict error for the key.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(
        e.as_database_error().and_then(|d| d.code()),
        Some(code) if code == "23505"
    )
}

/// True when the error is a foreign-key violation (Postgres 23503), e.g.
/// deleting a season that still owns questions or participations.
pub fn is_fk_violation(e: &sqlx::Error) -> bool {
    matches!(
        e.as_database_error().and_then(|d| d.code()),
        Some(code) if code == "23503"
    )
}
