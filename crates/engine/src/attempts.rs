//! Question attempts: eligibility, scoring, exactly-once submission

use chrono::Utc;
use common::models::{Question, QuestionAttempt, SeasonProgress};
use common::{Error, Result};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

/// Points awarded for a correct answer in the baseline policy
pub const POINTS_PER_CORRECT: i32 = 10;

/// Score a submitted answer against the stored key: case-insensitive,
/// otherwise exact. No trimming, no partial credit.
pub fn score(submitted: &str, key: &str) -> (bool, i32) {
    let is_correct = submitted.to_lowercase() == key.to_lowercase();
    let points = if is_correct { POINTS_PER_CORRECT } else { 0 };
    (is_correct, points)
}

/// The stored attempt plus the immediate-feedback fields
#[derive(Debug, Clone, Serialize)]
pub struct AttemptFeedback {
    #[serde(flatten)]
    pub attempt: QuestionAttempt,
    pub correct_answer: String,
    pub explanation: String,
}

fn already_attempted() -> Error {
    Error::Conflict("You have already attempted this question".to_string())
}

/// Owns the "answer a question" action
pub struct AttemptEngine {
    pool: PgPool,
}

impl AttemptEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Eligibility check, doubling as the gated single-question read: the
    /// question must exist and the caller must hold a participation in its
    /// season. Users who have not started a season cannot view its
    /// questions either.
    ///
    /// Question and participation come from one statement, so the pair is
    /// a consistent snapshot.
    pub async fn get_question(
        &self,
        question_id: Uuid,
        user_id: Uuid,
    ) -> Result<(Question, SeasonProgress)> {
        let (question, participation) =
            db::questions::get_with_participation(&self.pool, question_id, user_id)
                .await?
                .ok_or_else(|| Error::NotFound("Question not found".to_string()))?;

        let progress = participation.ok_or_else(|| {
            Error::Forbidden("You must start the season first".to_string())
        })?;

        Ok((question, progress))
    }

    /// Submit an answer, exactly once per (user, question).
    ///
    /// The existence pre-check is a fast path; the conditional insert on
    /// the unique constraint decides the race. A concurrent loser gets the
    /// same "already attempted" error as a sequential repeat.
    pub async fn submit(
        &self,
        question_id: Uuid,
        answer: &str,
        user_id: Uuid,
    ) -> Result<AttemptFeedback> {
        let (question, progress) = self.get_question(question_id, user_id).await?;

        if progress.is_completed {
            return Err(Error::Conflict("Season is already completed".to_string()));
        }

        if db::attempts::get(&self.pool, user_id, question_id)
            .await?
            .is_some()
        {
            return Err(already_attempted());
        }

        let (is_correct, points) = score(answer, &question.answer);
        // The baseline records a single instant rather than elapsed time.
        let now = Utc::now();

        let attempt = db::attempts::create_if_absent(
            &self.pool,
            user_id,
            question_id,
            answer,
            is_correct,
            points,
            now,
            now,
        )
        .await?
        .ok_or_else(already_attempted)?;

        info!(
            user = %user_id,
            question = %question_id,
            correct = is_correct,
            points,
            "attempt recorded"
        );

        Ok(AttemptFeedback {
            attempt,
            correct_answer: question.answer,
            explanation: question.explanation,
        })
    }
}
