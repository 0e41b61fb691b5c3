use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::AppState;
use crate::{
    middleware::require_session,
    routes::{auth, dashboard, health_check, movies, tutor},
};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes(state: AppState) -> Router<AppState> {
    let upload_limit = DefaultBodyLimit::max(state.settings.max_upload_bytes);

    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/movies/recommendations", get(movies::recommend));

    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        // Tutor
        .route("/distill", post(tutor::distill_text))
        .route(
            "/distill/upload",
            post(tutor::distill_upload).layer(upload_limit),
        )
        .route("/contents/:id/open", post(tutor::open_content))
        .route("/session/layer", get(tutor::current_layer))
        .route("/session/feedback", post(tutor::feedback))
        .route("/session/quiz", post(tutor::start_quiz))
        .route("/session/quiz/answers", post(tutor::answer_quiz))
        // Mastery
        .route("/dashboard", get(dashboard::dashboard))
        .route("/contents/:id/history", get(dashboard::history))
        .route_layer(from_fn_with_state(state, require_session));

    public.merge(protected)
}
