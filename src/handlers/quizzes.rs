// src/handlers/quizzes.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    handlers::categories::find_category,
    models::{
        question::Question,
        quiz::{Quiz, QuizDetail, QuizRequest},
    },
    services::{
        access::{Capability, Resource, authorize, shape_questions},
        cascade::{self, Entity},
    },
    utils::{extract::ValidatedJson, html::clean_text, jwt::Claims},
};

const QUIZ_COLUMNS: &str = "id, title, description, difficulty, category_id, created_at";

pub async fn find_quiz(pool: &SqlitePool, id: i64) -> Result<Option<Quiz>, AppError> {
    let quiz: Option<Quiz> = sqlx::query_as(&format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(quiz)
}

fn not_found() -> AppError {
    AppError::NotFound("Quiz with submitted ID not found".to_string())
}

async fn ensure_category(pool: &SqlitePool, category_id: i64) -> Result<(), AppError> {
    match find_category(pool, category_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::InvalidReference("Invalid Category".to_string())),
    }
}

pub async fn list_quizzes(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Read, Resource::Quiz)?;

    let quizzes: Vec<Quiz> = sqlx::query_as(&format!("SELECT {QUIZ_COLUMNS} FROM quizzes ORDER BY id"))
        .fetch_all(&pool)
        .await?;

    Ok(Json(quizzes))
}

/// Returns a quiz with its questions.
/// Canonical answers are included for admins only.
pub async fn get_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Read, Resource::Quiz)?;

    let quiz = find_quiz(&pool, id).await?.ok_or_else(not_found)?;

    let questions: Vec<Question> = sqlx::query_as(
        "SELECT id, quiz_id, question, answer, created_at FROM questions WHERE quiz_id = $1 ORDER BY id",
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(QuizDetail {
        quiz,
        questions: shape_questions(&claims, questions),
    }))
}

/// Creates a quiz inside an existing category.
/// Admin only.
pub async fn create_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<QuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Write, Resource::Quiz)?;
    ensure_category(&pool, payload.category_id).await?;

    let quiz: Quiz = sqlx::query_as(&format!(
        r#"
        INSERT INTO quizzes (title, description, difficulty, category_id)
        VALUES ($1, $2, $3, $4)
        RETURNING {QUIZ_COLUMNS}
        "#
    ))
    .bind(clean_text(&payload.title))
    .bind(clean_text(&payload.description))
    .bind(payload.difficulty)
    .bind(payload.category_id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(quiz))
}

/// Replaces a quiz's fields.
/// Admin only.
pub async fn update_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<QuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Write, Resource::Quiz)?;
    find_quiz(&pool, id).await?.ok_or_else(not_found)?;
    ensure_category(&pool, payload.category_id).await?;

    let quiz: Quiz = sqlx::query_as(&format!(
        r#"
        UPDATE quizzes
        SET title = $1, description = $2, difficulty = $3, category_id = $4
        WHERE id = $5
        RETURNING {QUIZ_COLUMNS}
        "#
    ))
    .bind(clean_text(&payload.title))
    .bind(clean_text(&payload.description))
    .bind(payload.difficulty)
    .bind(payload.category_id)
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(not_found)?;

    Ok(Json(quiz))
}

/// Deletes a quiz together with its questions and the attempts made on it.
/// Admin only.
pub async fn delete_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Delete, Resource::Quiz)?;

    let quiz = find_quiz(&pool, id).await?.ok_or_else(not_found)?;
    cascade::delete(&pool, Entity::Quiz, id).await?;

    Ok(Json(quiz))
}
