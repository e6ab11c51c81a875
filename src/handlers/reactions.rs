// src/handlers/reactions.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::{FromRow, SqlitePool};

use crate::{
    error::AppError, models::problem::ReactionSummary, state::AppState, utils::jwt::Claims,
};

const LIKE: &str = "like";
const DISLIKE: &str = "dislike";

#[derive(FromRow)]
struct ReactionRow {
    likes: i64,
    dislikes: i64,
    stars: i64,
    own_kind: Option<String>,
    starred: i64,
}

/// Counters for a problem plus the caller's own like/dislike/star flags.
pub async fn reaction_summary(
    pool: &SqlitePool,
    problem_id: &str,
    user_id: Option<i64>,
) -> Result<ReactionSummary, AppError> {
    let row = sqlx::query_as::<_, ReactionRow>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM problem_reactions WHERE problem_id = ? AND kind = 'like') AS likes,
            (SELECT COUNT(*) FROM problem_reactions WHERE problem_id = ? AND kind = 'dislike') AS dislikes,
            (SELECT COUNT(*) FROM problem_stars WHERE problem_id = ?) AS stars,
            (SELECT kind FROM problem_reactions WHERE problem_id = ? AND user_id = ?) AS own_kind,
            EXISTS(SELECT 1 FROM problem_stars WHERE problem_id = ? AND user_id = ?) AS starred
        "#,
    )
    .bind(problem_id)
    .bind(problem_id)
    .bind(problem_id)
    .bind(problem_id)
    .bind(user_id)
    .bind(problem_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(ReactionSummary {
        likes: row.likes,
        dislikes: row.dislikes,
        stars: row.stars,
        liked: row.own_kind.as_deref() == Some(LIKE),
        disliked: row.own_kind.as_deref() == Some(DISLIKE),
        starred: row.starred != 0,
        solved: false,
    })
}

/// Sets, switches or clears the caller's like/dislike. The two are mutually exclusive.
async fn toggle_reaction(
    pool: &SqlitePool,
    user_id: i64,
    problem_id: &str,
    kind: &'static str,
) -> Result<Option<&'static str>, AppError> {
    let mut tx = pool.begin().await?;

    let existing: Option<String> = sqlx::query_scalar(
        "SELECT kind FROM problem_reactions WHERE user_id = ? AND problem_id = ?",
    )
    .bind(user_id)
    .bind(problem_id)
    .fetch_optional(&mut *tx)
    .await?;

    let now_set = if existing.as_deref() == Some(kind) {
        sqlx::query("DELETE FROM problem_reactions WHERE user_id = ? AND problem_id = ?")
            .bind(user_id)
            .bind(problem_id)
            .execute(&mut *tx)
            .await?;
        None
    } else {
        sqlx::query(
            r#"
            INSERT INTO problem_reactions (user_id, problem_id, kind, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, problem_id) DO UPDATE SET
                kind = excluded.kind,
                created_at = excluded.created_at
            "#,
        )
        .bind(user_id)
        .bind(problem_id)
        .bind(kind)
        .bind(chrono::Utc::now())
        .execute(&mut *tx)
        .await?;
        Some(kind)
    };

    tx.commit().await?;

    Ok(now_set)
}

async fn respond_reaction(
    state: &AppState,
    claims: &Claims,
    problem_id: &str,
    kind: &'static str,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = claims.user_id()?;
    let problem = state.registry.require(problem_id)?;

    let current = toggle_reaction(&state.pool, user_id, &problem.id, kind).await?;

    Ok(Json(serde_json::json!({
        "liked": current == Some(LIKE),
        "disliked": current == Some(DISLIKE),
    })))
}

/// Toggle Like on a problem (clears an existing dislike).
pub async fn toggle_like(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(problem_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    respond_reaction(&state, &claims, &problem_id, LIKE).await
}

/// Toggle Dislike on a problem (clears an existing like).
pub async fn toggle_dislike(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(problem_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    respond_reaction(&state, &claims, &problem_id, DISLIKE).await
}

/// Toggle Star on a problem.
pub async fn toggle_star(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(problem_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let problem = state.registry.require(&problem_id)?;

    let mut tx = state.pool.begin().await?;

    let removed = sqlx::query("DELETE FROM problem_stars WHERE user_id = ? AND problem_id = ?")
        .bind(user_id)
        .bind(&problem.id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
        > 0;

    if !removed {
        sqlx::query("INSERT INTO problem_stars (user_id, problem_id, created_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(&problem.id)
            .bind(chrono::Utc::now())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(Json(serde_json::json!({ "starred": !removed })))
}
