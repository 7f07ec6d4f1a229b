//! Read-only progress projections

use common::models::{AttemptReport, QuestionWithAttempt, SeasonProgressReport};
use common::{Error, Result};
use sqlx::PgPool;
use uuid::Uuid;

/// Read-only views over a user's participations and attempts
pub struct ProgressQueries {
    pool: PgPool,
}

impl ProgressQueries {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All questions of a season in display order, each annotated with the
    /// caller's own attempt if one exists. Gated like the attempt engine:
    /// no participation, no questions.
    pub async fn season_questions(
        &self,
        season_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<QuestionWithAttempt>> {
        let season = db::seasons::get(&self.pool, season_id).await?;
        if season.is_none() {
            return Err(Error::NotFound("Season not found".to_string()));
        }

        if db::progress::get(&self.pool, user_id, season_id)
            .await?
            .is_none()
        {
            return Err(Error::Forbidden(
                "You must start the season first".to_string(),
            ));
        }

        let questions =
            db::questions::list_for_season_with_attempts(&self.pool, season_id, user_id).await?;
        Ok(questions)
    }

    /// All of the user's participations with their seasons
    pub async fn season_report(&self, user_id: Uuid) -> Result<Vec<SeasonProgressReport>> {
        let report = db::progress::list_for_user_with_seasons(&self.pool, user_id).await?;
        Ok(report)
    }

    /// All of the user's attempts with their questions
    pub async fn attempt_report(&self, user_id: Uuid) -> Result<Vec<AttemptReport>> {
        let report = db::attempts::list_for_user_with_questions(&self.pool, user_id).await?;
        Ok(report)
    }
}
