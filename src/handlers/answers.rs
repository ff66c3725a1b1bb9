// src/handlers/answers.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::attempt::{AttemptAnswer, UpdateAttemptAnswerRequest},
    services::{
        access::{Capability, Resource, authorize},
        cascade::{self, Entity},
    },
    utils::{extract::ValidatedJson, jwt::Claims},
};

const ANSWER_COLUMNS: &str = "id, attempt_id, question_id, answer, correct, created_at";

async fn find_answer(pool: &SqlitePool, id: i64) -> Result<AttemptAnswer, AppError> {
    sqlx::query_as(&format!("SELECT {ANSWER_COLUMNS} FROM attempt_answers WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User Answer with submitted ID not found".to_string()))
}

async fn exists(pool: &SqlitePool, table: &str, id: i64) -> Result<bool, AppError> {
    let row: Option<(i64,)> = sqlx::query_as(&format!("SELECT id FROM {table} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Corrects a graded answer, including its verdict.
/// Admin only.
pub async fn update_answer(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateAttemptAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Write, Resource::AttemptAnswer)?;
    find_answer(&pool, id).await?;

    if !exists(&pool, Entity::Attempt.table(), req.attempt_id).await? {
        return Err(AppError::InvalidReference("Invalid User Quiz".to_string()));
    }
    if !exists(&pool, Entity::Question.table(), req.question_id).await? {
        return Err(AppError::InvalidReference("Invalid Question".to_string()));
    }

    let answer: AttemptAnswer = sqlx::query_as(&format!(
        r#"
        UPDATE attempt_answers
        SET attempt_id = $1, question_id = $2, answer = $3, correct = $4
        WHERE id = $5
        RETURNING {ANSWER_COLUMNS}
        "#
    ))
    .bind(req.attempt_id)
    .bind(req.question_id)
    .bind(&req.answer)
    .bind(req.correct)
    .bind(id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(answer))
}

/// Deletes a single answer.
/// Admin only.
pub async fn delete_answer(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Delete, Resource::AttemptAnswer)?;

    let answer = find_answer(&pool, id).await?;
    cascade::delete(&pool, Entity::AttemptAnswer, id).await?;

    Ok(Json(answer))
}
