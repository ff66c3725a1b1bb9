// src/services/grader.rs

use std::collections::{HashMap, HashSet};

use crate::{error::AppError, models::attempt::SubmittedAnswer};

/// The canonical answer of one question, as loaded for grading.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnswerKey {
    pub id: i64,
    pub answer: String,
}

/// A submitted answer after comparison with its answer key.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedAnswer {
    pub question_id: i64,
    pub answer: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub answers: Vec<GradedAnswer>,
    pub correct_count: usize,
    pub score: f64,
}

/// Grades a submission against the quiz's answer keys.
///
/// An answer is correct iff its text equals the canonical answer exactly
/// (case-sensitive, untrimmed). Answers naming a question outside the quiz
/// are kept and marked incorrect. A question is credited at most once: only
/// its first correct answer is marked correct, so the stored verdicts always
/// add up to `score = correct_count / answer_keys.len()`, within [0, 1].
pub fn grade(answer_keys: &[AnswerKey], submitted: &[SubmittedAnswer]) -> Result<Grade, AppError> {
    if answer_keys.is_empty() {
        return Err(AppError::InvalidState("Quiz has no questions".to_string()));
    }

    let keys: HashMap<i64, &str> = answer_keys
        .iter()
        .map(|k| (k.id, k.answer.as_str()))
        .collect();

    let mut credited = HashSet::new();
    let answers: Vec<GradedAnswer> = submitted
        .iter()
        .map(|s| {
            let is_match = keys.get(&s.question_id) == Some(&s.answer.as_str());
            let correct = is_match && credited.insert(s.question_id);
            GradedAnswer {
                question_id: s.question_id,
                answer: s.answer.clone(),
                correct,
            }
        })
        .collect();

    let correct_count = credited.len();
    let score = correct_count as f64 / keys.len() as f64;

    Ok(Grade {
        answers,
        correct_count,
        score,
    })
}
