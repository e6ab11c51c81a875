// src/models/progress.rs

use std::collections::BTreeSet;

use serde::Serialize;

/// Problems a user has passed. Membership only; grows, never shrinks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserProgress {
    pub user_id: i64,
    pub solved_problems: BTreeSet<String>,
}

impl UserProgress {
    pub fn has_solved(&self, problem_id: &str) -> bool {
        self.solved_problems.contains(problem_id)
    }
}

/// Published whenever a problem enters a user's solved-set for the first time.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    #[serde(skip)]
    pub user_id: i64,
    pub problem_id: String,
}
