// tests/common/mod.rs

#![allow(dead_code)]

use quiz_api::{config::Config, db, routes, state::AppState, utils::jwt::sign_jwt};
use serde_json::Value;
use sqlx::SqlitePool;

pub const TEST_SECRET: &str = "test_secret_for_integration_tests";

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    pub client: reqwest::Client,
}

/// Spawns the app on a random port, backed by a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    let pool = db::init_pool("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expiration: 600,
        port: 0,
        rust_log: "error".to_string(),
        admin_email: None,
        admin_password: None,
        admin_name: None,
    };

    let state = AppState {
        pool: pool.clone(),
        config,
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        pool,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Inserts a user directly and returns (id, token). The stored digest is
    /// not a real hash; these users never log in with a password.
    pub async fn user(&self, name: &str, admin: bool) -> (i64, String) {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO users (name, email, password_digest, admin) VALUES ($1, $2, 'x', $3) RETURNING id",
        )
        .bind(name)
        .bind(format!("{}@example.com", name))
        .bind(admin)
        .fetch_one(&self.pool)
        .await
        .unwrap();

        let token = sign_jwt(id, admin, TEST_SECRET, 600).unwrap();
        (id, token)
    }

    pub async fn category(&self, name: &str) -> i64 {
        let (id,): (i64,) = sqlx::query_as("INSERT INTO categories (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .unwrap();
        id
    }

    pub async fn quiz(&self, title: &str, category_id: i64) -> i64 {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO quizzes (title, description, difficulty, category_id) VALUES ($1, 'desc', 5, $2) RETURNING id",
        )
        .bind(title)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .unwrap();
        id
    }

    pub async fn question(&self, quiz_id: i64, question: &str, answer: &str) -> i64 {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO questions (quiz_id, question, answer) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(quiz_id)
        .bind(question)
        .bind(answer)
        .fetch_one(&self.pool)
        .await
        .unwrap();
        id
    }

    /// The farm animals quiz: Q1 "Moo!", Q2 "Oink!". Returns (quiz, q1, q2).
    pub async fn farm_quiz(&self) -> (i64, i64, i64) {
        let category = self.category("School").await;
        let quiz = self.quiz("Farm Animals", category).await;
        let q1 = self.question(quiz, "What does the cow say?", "Moo!").await;
        let q2 = self.question(quiz, "What does the pig say?", "Oink!").await;
        (quiz, q1, q2)
    }

    pub async fn count(&self, table: &str) -> i64 {
        let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap();
        n
    }

    pub async fn get(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header("x-auth-token", token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("x-auth-token", token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .header("x-auth-token", token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .header("x-auth-token", token)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
