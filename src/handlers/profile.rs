// src/handlers/profile.rs

use axum::{
    Extension, Json,
    extract::State,
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::stream;
use tokio::sync::broadcast::error::RecvError;

use crate::{
    error::AppError,
    models::user::{MeResponse, User},
    state::AppState,
    utils::jwt::Claims,
};

/// Get current user's profile and statistics.
pub async fn get_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, display_name, password, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    let starred_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM problem_stars WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&state.pool)
            .await?;

    let progress = state.store.progress(user_id).await?;

    Ok(Json(MeResponse {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
        created_at: user.created_at,
        solved_count: progress.solved_problems.len(),
        starred_count,
    }))
}

/// The caller's solved-set.
pub async fn get_progress(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let progress = state.store.progress(claims.user_id()?).await?;
    Ok(Json(progress))
}

/// Server-sent events for the caller's solved-set changes.
///
/// Each newly solved problem produces one `progress` event carrying the problem id.
pub async fn progress_events(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let rx = state.notifier.subscribe();
    tracing::info!(user_id, "Progress stream opened");

    let events = stream::unfold(rx, move |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) if event.user_id == user_id => {
                    let item = Event::default().event("progress").json_data(&event);
                    return Some((item, rx));
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(user_id, skipped, "Progress stream lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
