// src/evaluator/mod.rs

//! Submission evaluation: isolate the entry point, compile it in the sandbox,
//! run the problem's fixtures and record a pass in the user's solved-set.

mod extract;
mod gate;
mod verify;

use std::sync::Arc;

use thiserror::Error;

pub use extract::isolate_entry_point;
pub use gate::{GateGuard, SubmissionGate};
pub use verify::{Verdict, structurally_equal};

use crate::{
    models::{
        problem::Problem,
        progress::ProgressEvent,
        submission::{FailureKind, Persistence, SubmissionResult},
    },
    notify::ProgressNotifier,
    sandbox::{Sandbox, SandboxError},
    store::{ProgressStore, SolveRecord},
};

/// Everything that stops a submission short of a verdict.
#[derive(Debug, Error)]
enum EvaluationError {
    #[error("Could not find a function named `{0}` in your code")]
    EntryPointNotFound(String),

    #[error(transparent)]
    Sandbox(#[from] SandboxError),
}

impl EvaluationError {
    fn into_result(self) -> SubmissionResult {
        let message = self.to_string();
        match self {
            EvaluationError::EntryPointNotFound(_) => {
                SubmissionResult::runtime_error(FailureKind::EntryPointNotFound, message)
            }
            EvaluationError::Sandbox(SandboxError::Compile(_)) => {
                SubmissionResult::runtime_error(FailureKind::CompileError, message)
            }
            EvaluationError::Sandbox(SandboxError::Runtime(_)) => {
                SubmissionResult::runtime_error(FailureKind::RuntimeError, message)
            }
            EvaluationError::Sandbox(SandboxError::Timeout(_)) => {
                SubmissionResult::runtime_error(FailureKind::Timeout, message)
            }
            EvaluationError::Sandbox(SandboxError::Unavailable(detail)) => {
                tracing::error!("Sandbox unavailable: {}", detail);
                SubmissionResult::runtime_error(
                    FailureKind::SandboxUnavailable,
                    "The code runner is unavailable, please try again later",
                )
            }
        }
    }
}

pub struct Evaluator {
    sandbox: Arc<dyn Sandbox>,
    store: Arc<dyn ProgressStore>,
    notifier: ProgressNotifier,
}

impl Evaluator {
    pub fn new(
        sandbox: Arc<dyn Sandbox>,
        store: Arc<dyn ProgressStore>,
        notifier: ProgressNotifier,
    ) -> Self {
        Self {
            sandbox,
            store,
            notifier,
        }
    }

    /// Evaluates `source_text` against `problem` on behalf of `user_id`.
    ///
    /// Anonymous submissions are rejected before any code runs. Only a pass
    /// touches the store, and a store failure is reported in
    /// [`SubmissionResult::persistence`] without changing the outcome.
    pub async fn evaluate(
        &self,
        source_text: &str,
        problem: &Problem,
        user_id: Option<i64>,
    ) -> SubmissionResult {
        let Some(user_id) = user_id else {
            return SubmissionResult::unauthenticated();
        };

        let result = match self.run(source_text, problem).await {
            Ok(Verdict::Passed) => SubmissionResult::passed(self.record_solve(user_id, problem).await),
            Ok(Verdict::Mismatch {
                fixture,
                expected,
                actual,
            }) => {
                tracing::debug!(
                    problem = %problem.id,
                    user_id,
                    fixture,
                    %expected,
                    %actual,
                    "fixture mismatch"
                );
                SubmissionResult::assertion_failed()
            }
            Err(err) => err.into_result(),
        };

        tracing::info!(
            problem = %problem.id,
            user_id,
            outcome = ?result.outcome,
            kind = ?result.kind,
            "submission evaluated"
        );
        result
    }

    async fn run(&self, source_text: &str, problem: &Problem) -> Result<Verdict, EvaluationError> {
        let snippet = isolate_entry_point(source_text, &problem.entry_point)
            .ok_or_else(|| EvaluationError::EntryPointNotFound(problem.entry_point.clone()))?;

        let mut callable = self.sandbox.compile(snippet, &problem.entry_point).await?;
        let verdict = problem.verification.verify(callable.as_mut()).await?;
        Ok(verdict)
    }

    async fn record_solve(&self, user_id: i64, problem: &Problem) -> Persistence {
        match self.store.add_solved(user_id, &problem.id).await {
            Ok(SolveRecord::Inserted) => {
                self.notifier.publish(ProgressEvent {
                    user_id,
                    problem_id: problem.id.clone(),
                });
                Persistence::Recorded
            }
            Ok(SolveRecord::AlreadyPresent) => Persistence::AlreadySolved,
            Err(err) => {
                tracing::error!(problem = %problem.id, user_id, "Failed to record solve: {}", err);
                Persistence::Failed {
                    message: "Your solution passed, but saving your progress failed".to_string(),
                }
            }
        }
    }
}
