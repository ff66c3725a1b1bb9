// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    pub quiz_id: i64,

    /// The text of the question.
    pub question: String,

    /// The canonical answer. Only admins ever see it.
    pub answer: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for sending a question to a non-admin (excludes the answer).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub quiz_id: i64,
    pub question: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            quiz_id: q.quiz_id,
            question: q.question,
            created_at: q.created_at,
        }
    }
}

/// The projection of a question handed to a reader.
///
/// Which variant a reader gets is decided by the access guard; serialization
/// is untagged so each variant renders as its own plain object.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum QuestionView {
    Public(PublicQuestion),
    Admin(Question),
}

/// DTO for creating or replacing a question.
#[derive(Debug, Deserialize, Validate)]
pub struct QuestionRequest {
    pub quiz_id: i64,
    #[validate(length(min = 1, max = 1000))]
    pub question: String,
    #[validate(length(min = 1, max = 500))]
    pub answer: String,
}
