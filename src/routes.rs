// src/routes.rs

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    middleware,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{answers, attempts, auth, categories, questions, quizzes, users},
    state::AppState,
    utils::jwt::{AUTH_HEADER, auth_middleware},
};

/// Assembles the main application router.
///
/// * Sign-up and login are public; every other route sits behind
///   `auth_middleware`, and role/ownership checks happen in the handlers.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool and config).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTH_HEADER, CONTENT_TYPE])
        .expose_headers([AUTH_HEADER]);

    let public_routes = Router::new()
        .route("/api/users", post(users::register))
        .route("/api/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/api/users", get(users::list_users))
        .route("/api/users/me", get(users::me).put(users::update_me))
        .route("/api/users/{id}", delete(users::delete_user))
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/api/quizzes",
            get(quizzes::list_quizzes).post(quizzes::create_quiz),
        )
        .route(
            "/api/quizzes/{id}",
            get(quizzes::get_quiz)
                .put(quizzes::update_quiz)
                .delete(quizzes::delete_quiz),
        )
        .route(
            "/api/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route(
            "/api/questions/{id}",
            get(questions::get_question)
                .put(questions::update_question)
                .delete(questions::delete_question),
        )
        .route(
            "/api/user-quizzes",
            get(attempts::list_attempts).post(attempts::submit_attempt),
        )
        .route(
            "/api/user-quizzes/{id}",
            get(attempts::get_attempt)
                .put(attempts::update_attempt)
                .delete(attempts::delete_attempt),
        )
        .route(
            "/api/user-answers/{id}",
            put(answers::update_answer).delete(answers::delete_answer),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global Middleware (applied top to bottom)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
