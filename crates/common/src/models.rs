//! Domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role flag supplied by the identity layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Player,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Player => "player",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "player" => Some(Role::Player),
            _ => None,
        }
    }
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The authenticated caller, as the core trusts it: an id and a role flag.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

/// A time-boxed collection of ordered questions.
/// The availability window `[starts_at, ends_at]` is inclusive on both ends.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Season {
    pub id: Uuid,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A question belonging to exactly one season
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: Uuid,
    pub season_id: Uuid,
    pub content: String,
    /// Multiple-choice options, when the question has them; the `answer`
    /// key alone decides scoring either way.
    pub options: Option<Vec<String>>,
    pub answer: String,
    pub explanation: String,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
}

/// One user's participation record in one season.
/// At most one row per (user_id, season_id); `is_completed` only ever
/// transitions false to true.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SeasonProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub season_id: Uuid,
    pub is_completed: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// One user's single, immutable answer submission to one question.
/// At most one row per (user_id, question_id). The baseline records a
/// single instant: `started_at == ended_at`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuestionAttempt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub question_id: Uuid,
    pub answer: String,
    pub is_correct: bool,
    pub points: i32,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

/// A question annotated with the caller's own attempt, if any
#[derive(Debug, Clone, Serialize)]
pub struct QuestionWithAttempt {
    #[serde(flatten)]
    pub question: Question,
    pub attempt: Option<QuestionAttempt>,
}

/// A participation joined with its season for display
#[derive(Debug, Clone, Serialize)]
pub struct SeasonProgressReport {
    #[serde(flatten)]
    pub progress: SeasonProgress,
    pub season: Season,
}

/// An attempt joined with its question for display
#[derive(Debug, Clone, Serialize)]
pub struct AttemptReport {
    #[serde(flatten)]
    pub attempt: QuestionAttempt,
    pub question: Question,
}

/// Offset-pagination metadata for administrative listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl PageMeta {
    /// `total_pages` uses ceiling division.
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        Self {
            total,
            page,
            limit,
            total_pages: (total + limit - 1) / limit,
        }
    }
}

/// A page of rows plus its metadata
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(PageMeta::new(23, 1, 10).total_pages, 3);
        assert_eq!(PageMeta::new(20, 1, 10).total_pages, 2);
        assert_eq!(PageMeta::new(0, 1, 10).total_pages, 0);
        assert_eq!(PageMeta::new(1, 1, 10).total_pages, 1);
    }
}
