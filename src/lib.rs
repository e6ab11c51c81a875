// src/lib.rs

pub mod config;
pub mod error;
pub mod evaluator;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod problems;
pub mod remote;
pub mod routes;
pub mod sandbox;
pub mod state;
pub mod store;
pub mod utils;

pub use routes::create_router;

/// Schema migrations embedded from `./migrations`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
