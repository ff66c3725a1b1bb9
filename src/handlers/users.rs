// src/handlers/users.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    models::user::{CreateUserRequest, RegisteredUser, UpdateMeRequest, User},
    services::{
        access::{Capability, Resource, authorize},
        cascade::{self, Entity},
    },
    utils::{
        extract::ValidatedJson,
        hash::hash_password,
        jwt::{AUTH_HEADER, Claims, sign_jwt},
    },
};

const USER_COLUMNS: &str = "id, name, email, password_digest, admin, created_at";

async fn find_user(pool: &SqlitePool, id: i64) -> Result<User, AppError> {
    sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User ID not found".to_string()))
}

fn duplicate_email(err: sqlx::Error) -> AppError {
    match AppError::from(err) {
        AppError::ValidationError(_) => {
            AppError::ValidationError("A user with this email already exists".to_string())
        }
        other => other,
    }
}

/// Registers a new user.
///
/// The response carries a fresh identity token in `x-auth-token`, so the
/// client is signed in right away.
pub async fn register(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let password_digest = hash_password(&payload.password)?;

    let user: User = sqlx::query_as(&format!(
        "INSERT INTO users (name, email, password_digest) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
    ))
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(password_digest)
    .fetch_one(&pool)
    .await
    .map_err(duplicate_email)?;

    let token = sign_jwt(user.id, user.admin, &config.jwt_secret, config.jwt_expiration)?;
    tracing::info!("Registered user {}", user.id);

    Ok(([(AUTH_HEADER, token)], Json(RegisteredUser::from(user))))
}

/// Lists all users in the system.
/// Admin only.
pub async fn list_users(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Read, Resource::User(None))?;

    let users: Vec<User> = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
        .fetch_all(&pool)
        .await?;

    Ok(Json(users))
}

/// Returns the current user's profile.
pub async fn me(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Read, Resource::User(Some(claims.id)))?;
    Ok(Json(find_user(&pool, claims.id).await?))
}

/// Updates the current user's name and email.
pub async fn update_me(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<UpdateMeRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Write, Resource::User(Some(claims.id)))?;

    let user: User = sqlx::query_as(&format!(
        "UPDATE users SET name = $1, email = $2 WHERE id = $3 RETURNING {USER_COLUMNS}"
    ))
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(claims.id)
    .fetch_optional(&pool)
    .await
    .map_err(duplicate_email)?
    .ok_or_else(|| AppError::NotFound("User ID not found".to_string()))?;

    Ok(Json(user))
}

/// Deletes a user and, with them, their attempts.
/// Admin only. Prevents deleting self.
pub async fn delete_user(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&claims, Capability::Delete, Resource::User(Some(id)))?;

    if id == claims.id {
        return Err(AppError::ValidationError("Cannot delete yourself".to_string()));
    }

    let user = find_user(&pool, id).await?;
    cascade::delete(&pool, Entity::User, id).await?;

    Ok(Json(user))
}
