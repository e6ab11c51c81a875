// src/handlers/problems.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::AppError,
    extractors::MaybeUser,
    handlers::reactions::reaction_summary,
    models::problem::{ProblemDetail, ProblemSummary},
    problems::Direction,
    state::AppState,
};

/// Query parameters for the problem list.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NavParams {
    pub direction: Direction,
}

/// Lists problems in display order, optionally filtered.
/// Authenticated callers also get a `solved` flag per row.
pub async fn list_problems(
    State(state): State<AppState>,
    user: MaybeUser,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let progress = match user.user_id() {
        Some(user_id) => Some(state.store.progress(user_id).await?),
        None => None,
    };

    let rows: Vec<ProblemSummary> = state
        .registry
        .search(params.category.as_deref(), params.q.as_deref())
        .into_iter()
        .map(|problem| {
            let solved = progress.as_ref().map(|p| p.has_solved(&problem.id));
            ProblemSummary::from_problem(problem, solved)
        })
        .collect();

    Ok(Json(rows))
}

/// Problem workspace: statement, examples and starter code, never the fixtures.
pub async fn get_problem(
    State(state): State<AppState>,
    user: MaybeUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let problem = state.registry.require(&id)?;
    let user_id = user.user_id();

    let mut reactions = reaction_summary(&state.pool, &problem.id, user_id).await?;
    if let Some(user_id) = user_id {
        reactions.solved = state.store.progress(user_id).await?.has_solved(&problem.id);
    }

    Ok(Json(ProblemDetail::new(problem, reactions)).into_response())
}

/// Previous/next problem in display order, wrapping at both ends.
pub async fn next_problem(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<NavParams>,
) -> Result<impl IntoResponse, AppError> {
    let next = state.registry.next_problem(&id, params.direction)?;

    Ok(Json(json!({
        "id": next.id,
        "order": next.order,
    })))
}
