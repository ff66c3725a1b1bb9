// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'attempts' table: one user taking one quiz once.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Attempt {
    pub id: i64,
    /// Fixed at creation to the submitting identity.
    pub user_id: i64,
    pub quiz_id: i64,
    /// Fraction of the quiz's questions answered correctly, in [0, 1].
    pub score: f64,
    /// Elapsed time reported by the client.
    pub time: f64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Represents the 'attempt_answers' table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AttemptAnswer {
    pub id: i64,
    pub attempt_id: i64,
    pub question_id: i64,
    pub answer: String,
    /// Set once at grading time.
    pub correct: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// An attempt with all of its answers.
#[derive(Debug, Serialize)]
pub struct AttemptDetail {
    #[serde(flatten)]
    pub attempt: Attempt,
    pub user_answers: Vec<AttemptAnswer>,
}

/// One answer inside a submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmittedAnswer {
    pub question_id: i64,
    #[validate(length(max = 500))]
    pub answer: String,
}

/// DTO for submitting a completed quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAttemptRequest {
    pub quiz_id: i64,
    #[validate(range(min = 0.0))]
    pub time: f64,
    #[validate(nested)]
    pub user_answers: Vec<SubmittedAnswer>,
}

/// DTO for an admin correcting their own attempt. `user_id` is not accepted.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAttemptRequest {
    pub quiz_id: i64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub score: f64,
    #[validate(range(min = 0.0))]
    pub time: f64,
}

/// DTO for an admin correcting a single graded answer.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAttemptAnswerRequest {
    pub attempt_id: i64,
    pub question_id: i64,
    #[validate(length(max = 500))]
    pub answer: String,
    pub correct: bool,
}
