//! Season lifecycle: starting and completing a participation

use chrono::{DateTime, Utc};
use common::models::{Season, SeasonProgress};
use common::{Error, Result};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

/// True when `now` lies within the season's availability window.
/// Both bounds are inclusive: a start at the exact `ends_at` instant is
/// still allowed.
pub fn window_contains(season: &Season, now: DateTime<Utc>) -> bool {
    now >= season.starts_at && now <= season.ends_at
}

/// A participation that already exists either satisfies an idempotent
/// start (still open) or refuses it (completed seasons cannot restart).
pub fn resolve_existing(progress: SeasonProgress) -> Result<SeasonProgress> {
    if progress.is_completed {
        Err(Error::Conflict(
            "You have already completed this season".to_string(),
        ))
    } else {
        Ok(progress)
    }
}

/// Owns the start/complete transitions of a user's participation
pub struct SeasonLifecycle {
    pool: PgPool,
}

impl SeasonLifecycle {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Start a season for a user.
    ///
    /// Fetch-or-create: while the participation is open, repeated calls
    /// return the same row; once completed they fail. Two concurrent calls
    /// race on the (user_id, season_id) constraint and the loser re-reads
    /// the winner's row.
    pub async fn start(&self, user_id: Uuid, season_id: Uuid) -> Result<SeasonProgress> {
        let season = db::seasons::get(&self.pool, season_id)
            .await?
            .ok_or_else(|| Error::NotFound("Season not found".to_string()))?;

        if !window_contains(&season, Utc::now()) {
            return Err(Error::Forbidden(
                "Season is not currently available".to_string(),
            ));
        }

        // Fast path: an existing row answers without touching the constraint.
        if let Some(existing) = db::progress::get(&self.pool, user_id, season_id).await? {
            return resolve_existing(existing);
        }

        if let Some(created) = db::progress::create_if_absent(&self.pool, user_id, season_id).await?
        {
            info!(user = %user_id, season = %season_id, "season started");
            return Ok(created);
        }

        // Lost the race: observe the winner's row instead of conflicting.
        debug!(user = %user_id, season = %season_id, "start lost creation race, re-reading");
        let winner = db::progress::get(&self.pool, user_id, season_id)
            .await?
            .ok_or_else(|| Error::Internal("participation missing after conflict".to_string()))?;
        resolve_existing(winner)
    }

    /// Complete a season for a user. Terminal: `is_completed` flips false
    /// to true exactly once and `ended_at` is set; no operation reverses it.
    pub async fn complete(&self, user_id: Uuid, season_id: Uuid) -> Result<SeasonProgress> {
        if let Some(done) = db::progress::complete_if_open(&self.pool, user_id, season_id).await? {
            info!(user = %user_id, season = %season_id, "season completed");
            return Ok(done);
        }

        // Zero rows updated: missing row or already completed.
        match db::progress::get(&self.pool, user_id, season_id).await? {
            None => Err(Error::NotFound("Season progress not found".to_string())),
            Some(_) => Err(Error::Conflict("Season is already completed".to_string())),
        }
    }
}
