// src/models/problem.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A worked example shown with the problem statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Example {
    pub input_text: String,
    pub output_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// One call of the user's function: positional arguments and the expected return value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub args: Vec<Value>,
    pub expected: Value,
}

/// Hidden fixtures a submission must satisfy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Verification {
    pub fixtures: Vec<Fixture>,
}

/// A catalog entry. Immutable once the registry is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub category: String,

    /// Position in the problem list; the catalog's orders are exactly 1..=N.
    pub order: u32,

    /// Name of the function the submitted source must define.
    pub entry_point: String,

    pub starter_code: String,
    pub statement: String,

    #[serde(default)]
    pub examples: Vec<Example>,

    #[serde(default)]
    pub constraints: Vec<String>,

    #[serde(default)]
    pub video_id: Option<String>,

    /// External problem page; when set the list links there instead of the workspace.
    #[serde(default)]
    pub link: Option<String>,

    pub verification: Verification,
}

/// Row of the problem list.
#[derive(Debug, Serialize)]
pub struct ProblemSummary {
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub order: u32,
    pub video_id: Option<String>,
    pub link: Option<String>,
    /// Only present for authenticated callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solved: Option<bool>,
}

impl ProblemSummary {
    pub fn from_problem(problem: &Problem, solved: Option<bool>) -> Self {
        Self {
            id: problem.id.clone(),
            title: problem.title.clone(),
            difficulty: problem.difficulty,
            category: problem.category.clone(),
            order: problem.order,
            video_id: problem.video_id.clone(),
            link: problem.link.clone(),
            solved,
        }
    }
}

/// Reaction counters and the caller's own flags for one problem.
#[derive(Debug, Default, Serialize)]
pub struct ReactionSummary {
    pub likes: i64,
    pub dislikes: i64,
    pub stars: i64,
    pub liked: bool,
    pub disliked: bool,
    pub starred: bool,
    pub solved: bool,
}

/// Problem workspace payload. Fixtures are never sent to clients.
#[derive(Debug, Serialize)]
pub struct ProblemDetail<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub difficulty: Difficulty,
    pub category: &'a str,
    pub order: u32,
    pub entry_point: &'a str,
    pub starter_code: &'a str,
    pub statement: &'a str,
    pub examples: &'a [Example],
    pub constraints: &'a [String],
    pub video_id: Option<&'a str>,
    pub reactions: ReactionSummary,
}

impl<'a> ProblemDetail<'a> {
    pub fn new(problem: &'a Problem, reactions: ReactionSummary) -> Self {
        Self {
            id: &problem.id,
            title: &problem.title,
            difficulty: problem.difficulty,
            category: &problem.category,
            order: problem.order,
            entry_point: &problem.entry_point,
            starter_code: &problem.starter_code,
            statement: &problem.statement,
            examples: &problem.examples,
            constraints: &problem.constraints,
            video_id: problem.video_id.as_deref(),
            reactions,
        }
    }
}
