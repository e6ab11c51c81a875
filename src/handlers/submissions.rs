// src/handlers/submissions.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    extractors::MaybeUser,
    models::submission::{Outcome, SubmitRequest},
    state::AppState,
};

/// Evaluates a solution for a problem.
///
/// * Anonymous callers get the `unauthenticated` result with 401; no code runs.
/// * A second submission while one of the same user is still running gets 409.
/// * Every evaluated submission answers 200, whatever the outcome.
pub async fn submit_solution(
    State(state): State<AppState>,
    user: MaybeUser,
    Path(problem_id): Path<String>,
    Json(req): Json<SubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    let problem = state.registry.require(&problem_id)?;
    req.validate()?;

    let user_id = user.user_id();
    let _slot = match user_id {
        Some(id) => Some(state.gate.try_acquire(id).ok_or_else(|| {
            AppError::Conflict("A submission is already being evaluated".to_string())
        })?),
        None => None,
    };

    let result = state
        .evaluator
        .evaluate(&req.source_text, problem, user_id)
        .await;

    let status = if result.outcome == Outcome::Unauthenticated {
        StatusCode::UNAUTHORIZED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(result)))
}
