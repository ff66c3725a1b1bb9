// src/handlers/questions.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    handlers::quizzes::find_quiz,
    models::question::{Question, QuestionRequest},
    services::{
        access::{Capability, Resource, authorize, shape_question, shape_questions},
        cascade::{self, Entity},
    },
    utils::{extract::ValidatedJson, jwt::Claims},
};

const QUESTION_COLUMNS: &str = "id, quiz_id, question, answer, created_at";

async fn find_question(pool: &SqlitePool, id: i64) -> Result<Question, AppError> {
    sqlx::query_as(&format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Question with submitted ID not found".to_string()))
}

async fn ensure_quiz(pool: &SqlitePool, quiz_id: i64) -> Result<(), AppError> {
    match find_quiz(pool, quiz_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::InvalidReference("Invalid Quiz".to_string())),
    }
}

pub async fn list_questions(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Read, Resource::Question)?;

    let questions: Vec<Question> =
        sqlx::query_as(&format!("SELECT {QUESTION_COLUMNS} FROM questions ORDER BY id"))
            .fetch_all(&pool)
            .await?;

    Ok(Json(shape_questions(&claims, questions)))
}

pub async fn get_question(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Read, Resource::Question)?;

    let question = find_question(&pool, id).await?;
    Ok(Json(shape_question(&claims, question)))
}

/// Creates a question with its canonical answer.
/// Admin only.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<QuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Write, Resource::Question)?;
    ensure_quiz(&pool, payload.quiz_id).await?;

    let question: Question = sqlx::query_as(&format!(
        "INSERT INTO questions (quiz_id, question, answer) VALUES ($1, $2, $3) RETURNING {QUESTION_COLUMNS}"
    ))
    .bind(payload.quiz_id)
    .bind(&payload.question)
    .bind(&payload.answer)
    .fetch_one(&pool)
    .await?;

    Ok(Json(question))
}

/// Replaces a question and its canonical answer. Answers already graded
/// against the old key keep their verdict.
/// Admin only.
pub async fn update_question(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<QuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Write, Resource::Question)?;
    find_question(&pool, id).await?;
    ensure_quiz(&pool, payload.quiz_id).await?;

    let question: Question = sqlx::query_as(&format!(
        "UPDATE questions SET quiz_id = $1, question = $2, answer = $3 WHERE id = $4 RETURNING {QUESTION_COLUMNS}"
    ))
    .bind(payload.quiz_id)
    .bind(&payload.question)
    .bind(&payload.answer)
    .bind(id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(question))
}

/// Deletes a question along with every submitted answer to it.
/// Admin only.
pub async fn delete_question(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Delete, Resource::Question)?;

    let question = find_question(&pool, id).await?;
    cascade::delete(&pool, Entity::Question, id).await?;

    Ok(Json(question))
}
