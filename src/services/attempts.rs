// src/services/attempts.rs

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::{
    error::AppError,
    models::attempt::{Attempt, AttemptAnswer, AttemptDetail, SubmittedAnswer},
    services::grader::{self, AnswerKey},
};

/// Grades a submission and stores the attempt with all of its answers.
///
/// The attempt row is inserted first, then every graded answer in a single
/// statement, inside one transaction. Any failure (including the future
/// being dropped mid-way) leaves neither the attempt nor any answer behind.
/// The returned attempt does not carry its answers.
pub async fn submit_attempt(
    pool: &SqlitePool,
    user_id: i64,
    quiz_id: i64,
    time: f64,
    submitted: &[SubmittedAnswer],
) -> Result<Attempt, AppError> {
    let quiz: Option<(i64,)> = sqlx::query_as("SELECT id FROM quizzes WHERE id = $1")
        .bind(quiz_id)
        .fetch_optional(pool)
        .await?;
    if quiz.is_none() {
        return Err(AppError::InvalidReference("Invalid Quiz".to_string()));
    }

    let answer_keys: Vec<AnswerKey> =
        sqlx::query_as("SELECT id, answer FROM questions WHERE quiz_id = $1")
            .bind(quiz_id)
            .fetch_all(pool)
            .await?;

    let grade = grader::grade(&answer_keys, submitted)?;

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::TransactionFailure(e.to_string()))?;

    let attempt = insert_attempt(&mut tx, user_id, quiz_id, time, grade.score)
        .await
        .map_err(transaction_error)?;

    if !grade.answers.is_empty() {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO attempt_answers (attempt_id, question_id, answer, correct) ");
        builder.push_values(&grade.answers, |mut row, answer| {
            row.push_bind(attempt.id)
                .push_bind(answer.question_id)
                .push_bind(answer.answer.as_str())
                .push_bind(answer.correct);
        });
        builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(transaction_error)?;
    }

    tx.commit()
        .await
        .map_err(|e| AppError::TransactionFailure(e.to_string()))?;

    tracing::info!(
        "User {} submitted attempt {} for quiz {}: {}/{} correct",
        user_id,
        attempt.id,
        quiz_id,
        grade.correct_count,
        answer_keys.len()
    );

    Ok(attempt)
}

async fn insert_attempt(
    conn: &mut SqliteConnection,
    user_id: i64,
    quiz_id: i64,
    time: f64,
    score: f64,
) -> Result<Attempt, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO attempts (user_id, quiz_id, score, time)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, quiz_id, score, time, created_at
        "#,
    )
    .bind(user_id)
    .bind(quiz_id)
    .bind(score)
    .bind(time)
    .fetch_one(conn)
    .await
}

/// Dangling references are the client's fault and keep their 400; anything
/// else inside the transaction is a store failure.
fn transaction_error(err: sqlx::Error) -> AppError {
    match AppError::from(err) {
        AppError::InternalServerError(msg) => AppError::TransactionFailure(msg),
        other => other,
    }
}

pub async fn find_attempt(pool: &SqlitePool, id: i64) -> Result<Attempt, AppError> {
    sqlx::query_as(
        "SELECT id, user_id, quiz_id, score, time, created_at FROM attempts WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("UserQuiz with submitted ID not found".to_string()))
}

pub async fn answers_of(pool: &SqlitePool, attempt_id: i64) -> Result<Vec<AttemptAnswer>, AppError> {
    let answers: Vec<AttemptAnswer> = sqlx::query_as(
        r#"
        SELECT id, attempt_id, question_id, answer, correct, created_at
        FROM attempt_answers
        WHERE attempt_id = $1
        ORDER BY id
        "#,
    )
    .bind(attempt_id)
    .fetch_all(pool)
    .await?;

    Ok(answers)
}

pub async fn detail(pool: &SqlitePool, attempt: Attempt) -> Result<AttemptDetail, AppError> {
    let user_answers = answers_of(pool, attempt.id).await?;
    Ok(AttemptDetail {
        attempt,
        user_answers,
    })
}

/// All attempts of one user, each with its answers.
pub async fn attempts_of_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<AttemptDetail>, AppError> {
    let attempts: Vec<Attempt> = sqlx::query_as(
        r#"
        SELECT id, user_id, quiz_id, score, time, created_at
        FROM attempts
        WHERE user_id = $1
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let answers: Vec<AttemptAnswer> = sqlx::query_as(
        r#"
        SELECT id, attempt_id, question_id, answer, correct, created_at
        FROM attempt_answers
        WHERE attempt_id IN (SELECT id FROM attempts WHERE user_id = $1)
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut by_attempt: HashMap<i64, Vec<AttemptAnswer>> = HashMap::new();
    for answer in answers {
        by_attempt.entry(answer.attempt_id).or_default().push(answer);
    }

    Ok(attempts
        .into_iter()
        .map(|attempt| AttemptDetail {
            user_answers: by_attempt.remove(&attempt.id).unwrap_or_default(),
            attempt,
        })
        .collect())
}
