// src/handlers/mod.rs

pub mod answers;
pub mod attempts;
pub mod auth;
pub mod categories;
pub mod questions;
pub mod quizzes;
pub mod users;
