// src/services/mod.rs

pub mod access;
pub mod attempts;
pub mod cascade;
pub mod grader;
