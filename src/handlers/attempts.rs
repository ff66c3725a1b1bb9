// src/handlers/attempts.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    handlers::quizzes::find_quiz,
    models::attempt::{Attempt, SubmitAttemptRequest, UpdateAttemptRequest},
    services::{
        access::{Capability, Resource, authorize},
        attempts,
        cascade::{self, Entity},
    },
    utils::{extract::ValidatedJson, jwt::Claims},
};

/// Lists the current user's attempts, each with its answers.
pub async fn list_attempts(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(attempts::attempts_of_user(&pool, claims.id).await?))
}

/// Submits a completed quiz.
///
/// The attempt always belongs to the caller; a `user_id` in the body is
/// ignored.
pub async fn submit_attempt(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(req): ValidatedJson<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let attempt =
        attempts::submit_attempt(&pool, claims.id, req.quiz_id, req.time, &req.user_answers).await?;

    Ok(Json(attempt))
}

/// Returns one of the caller's attempts with its answers.
pub async fn get_attempt(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = attempts::find_attempt(&pool, id).await?;
    authorize(&claims, Capability::Read, Resource::Attempt(&attempt))?;

    Ok(Json(attempts::detail(&pool, attempt).await?))
}

/// Overwrites score, time and quiz of an attempt. The owner never changes.
/// Admin only, and only on their own attempts.
pub async fn update_attempt(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = attempts::find_attempt(&pool, id).await?;
    authorize(&claims, Capability::Write, Resource::Attempt(&attempt))?;

    if find_quiz(&pool, req.quiz_id).await?.is_none() {
        return Err(AppError::InvalidReference("Invalid Quiz".to_string()));
    }

    let updated: Attempt = sqlx::query_as(
        r#"
        UPDATE attempts SET score = $1, time = $2, quiz_id = $3
        WHERE id = $4
        RETURNING id, user_id, quiz_id, score, time, created_at
        "#,
    )
    .bind(req.score)
    .bind(req.time)
    .bind(req.quiz_id)
    .bind(id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(updated))
}

/// Deletes an attempt and its answers.
/// Admin only, and only on their own attempts.
pub async fn delete_attempt(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = attempts::find_attempt(&pool, id).await?;
    authorize(&claims, Capability::Delete, Resource::Attempt(&attempt))?;

    cascade::delete(&pool, Entity::Attempt, id).await?;

    Ok(Json(attempt))
}
