// src/models/submission.rs

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::config::MAX_SOURCE_LEN;

/// Shown for every fixture mismatch; which case failed is deliberately withheld.
pub const ASSERTION_FAILED_MESSAGE: &str = "Oops! One or more test cases failed";
pub const PASSED_MESSAGE: &str = "Congrats! All tests passed!";
pub const UNAUTHENTICATED_MESSAGE: &str = "Please login to submit your code";

/// DTO for submitting a solution.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequest {
    #[serde(alias = "sourceText")]
    #[validate(length(min = 1), custom(function = "within_source_limit"))]
    pub source_text: String,
}

/// `length` counts characters; the limit is on encoded bytes.
fn within_source_limit(source_text: &str) -> Result<(), ValidationError> {
    if source_text.len() as u64 > MAX_SOURCE_LEN {
        let mut err = ValidationError::new("source_too_large");
        err.message = Some(format!("Source must be at most {} bytes", MAX_SOURCE_LEN).into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    AssertionFailed,
    RuntimeError,
    Unauthenticated,
}

/// Finer classification of a `RuntimeError` outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    EntryPointNotFound,
    CompileError,
    RuntimeError,
    Timeout,
    SandboxUnavailable,
}

/// Whether a passing submission made it into the solved-set.
/// Reported beside the outcome so a storage fault never reads as a failed solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Persistence {
    Recorded,
    AlreadySolved,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence: Option<Persistence>,
}

impl SubmissionResult {
    pub fn passed(persistence: Persistence) -> Self {
        Self {
            outcome: Outcome::Passed,
            kind: None,
            message: PASSED_MESSAGE.to_string(),
            persistence: Some(persistence),
        }
    }

    pub fn assertion_failed() -> Self {
        Self {
            outcome: Outcome::AssertionFailed,
            kind: None,
            message: ASSERTION_FAILED_MESSAGE.to_string(),
            persistence: None,
        }
    }

    pub fn runtime_error(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::RuntimeError,
            kind: Some(kind),
            message: message.into(),
            persistence: None,
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            outcome: Outcome::Unauthenticated,
            kind: None,
            message: UNAUTHENTICATED_MESSAGE.to_string(),
            persistence: None,
        }
    }
}
