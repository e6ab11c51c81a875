// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, execution, problems, profile, reactions, submissions},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, problems, me, run).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let require_auth = || middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Listing, detail, navigation and submit accept anonymous callers.
    let problem_routes = Router::new()
        .route("/", get(problems::list_problems))
        .route("/{id}", get(problems::get_problem))
        .route("/{id}/next", get(problems::next_problem))
        .route("/{id}/submit", post(submissions::submit_solution))
        .merge(
            Router::new()
                .route("/{id}/like", post(reactions::toggle_like))
                .route("/{id}/dislike", post(reactions::toggle_dislike))
                .route("/{id}/star", post(reactions::toggle_star))
                .layer(require_auth()),
        );

    let me_routes = Router::new()
        .route("/", get(profile::get_me))
        .route("/progress", get(profile::get_progress))
        .route("/events", get(profile::progress_events))
        .layer(require_auth());

    let run_routes = Router::new()
        .route("/{language}", post(execution::run_code))
        .layer(require_auth());

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/problems", problem_routes)
        .nest("/api/me", me_routes)
        .nest("/api/run", run_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
