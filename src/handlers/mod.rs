// src/handlers/mod.rs

pub mod auth;
pub mod execution;
pub mod problems;
pub mod profile;
pub mod reactions;
pub mod submissions;
