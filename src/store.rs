// src/store.rs

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::models::progress::UserProgress;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("progress store error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result of an idempotent solved-set insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveRecord {
    Inserted,
    AlreadyPresent,
}

/// Per-user solved-set persistence.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Set union of `{problem_id}` into the user's solved-set.
    async fn add_solved(&self, user_id: i64, problem_id: &str) -> Result<SolveRecord, StoreError>;

    async fn progress(&self, user_id: i64) -> Result<UserProgress, StoreError>;
}

#[derive(Debug, Clone)]
pub struct SqliteProgressStore {
    pool: SqlitePool,
}

impl SqliteProgressStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressStore for SqliteProgressStore {
    async fn add_solved(&self, user_id: i64, problem_id: &str) -> Result<SolveRecord, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO solved_problems (user_id, problem_id, solved_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id, problem_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(problem_id)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(if result.rows_affected() == 1 {
            SolveRecord::Inserted
        } else {
            SolveRecord::AlreadyPresent
        })
    }

    async fn progress(&self, user_id: i64) -> Result<UserProgress, StoreError> {
        let solved: Vec<String> =
            sqlx::query_scalar("SELECT problem_id FROM solved_problems WHERE user_id = ?")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(UserProgress {
            user_id,
            solved_problems: solved.into_iter().collect::<BTreeSet<_>>(),
        })
    }
}
