// src/models/mod.rs

pub mod problem;
pub mod progress;
pub mod submission;
pub mod user;
