// src/handlers/categories.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::category::{Category, CategoryRequest},
    services::{
        access::{Capability, Resource, authorize},
        cascade::{self, Entity},
    },
    utils::{extract::ValidatedJson, html::clean_text, jwt::Claims},
};

pub async fn find_category(pool: &SqlitePool, id: i64) -> Result<Option<Category>, AppError> {
    let category: Option<Category> =
        sqlx::query_as("SELECT id, name, created_at FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(category)
}

fn not_found() -> AppError {
    AppError::NotFound("Category with submitted ID not found".to_string())
}

pub async fn list_categories(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Read, Resource::Category)?;

    let categories: Vec<Category> =
        sqlx::query_as("SELECT id, name, created_at FROM categories ORDER BY id")
            .fetch_all(&pool)
            .await?;

    Ok(Json(categories))
}

pub async fn get_category(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Read, Resource::Category)?;

    let category = find_category(&pool, id).await?.ok_or_else(not_found)?;
    Ok(Json(category))
}

/// Creates a category. Names are unique.
/// Admin only.
pub async fn create_category(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Write, Resource::Category)?;

    let category: Category = sqlx::query_as(
        "INSERT INTO categories (name) VALUES ($1) RETURNING id, name, created_at",
    )
    .bind(clean_text(&payload.name))
    .fetch_one(&pool)
    .await?;

    Ok(Json(category))
}

/// Renames a category.
/// Admin only.
pub async fn update_category(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Write, Resource::Category)?;

    let category: Category = sqlx::query_as(
        "UPDATE categories SET name = $1 WHERE id = $2 RETURNING id, name, created_at",
    )
    .bind(clean_text(&payload.name))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(not_found)?;

    Ok(Json(category))
}

/// Deletes a category that no quiz belongs to.
/// Admin only.
pub async fn delete_category(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Delete, Resource::Category)?;

    let category = find_category(&pool, id).await?.ok_or_else(not_found)?;
    cascade::delete(&pool, Entity::Category, id).await?;

    Ok(Json(category))
}
