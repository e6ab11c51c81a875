// src/handlers/execution.rs

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderValue, header},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    remote::{Language, RunRequest},
    state::AppState,
};

/// Forwards code to the remote execution API and relays its body verbatim,
/// under the upstream content type (JSON when upstream sends none).
///
/// Upstream and transport failures are not distinguished: the caller always
/// gets the generic 500 body.
pub async fn run_code(
    State(state): State<AppState>,
    Path(language): Path<String>,
    Json(req): Json<RunRequest>,
) -> Result<impl IntoResponse, AppError> {
    let language = Language::parse(&language)?;

    let reply = state.remote.run(language, &req.source_text).await?;
    let content_type = reply
        .content_type
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    Ok(([(header::CONTENT_TYPE, content_type)], reply.body))
}
