// src/handlers/auth.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    models::user::{LoginRequest, User},
    utils::{extract::ValidatedJson, hash::verify_password, jwt::sign_jwt},
};

/// Authenticates a user and returns an identity token.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let invalid = || AppError::ValidationError("Invalid email or password.".to_string());

    let user: User = sqlx::query_as(
        r#"
        SELECT id, name, email, password_digest, admin, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(&payload.email)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?
    .ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password_digest) {
        return Err(invalid());
    }

    let token = sign_jwt(user.id, user.admin, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(json!({ "token": token })))
}
