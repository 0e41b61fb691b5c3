use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{api::AppState, error::AppError};

/// Pulls the session token out of an `Authorization: Bearer <uuid>` header
pub fn bearer_token(request: &Request) -> Option<Uuid> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
}

/// Middleware that resolves the bearer token to a live session.
///
/// On success the `StudentSession` is stored in the request extensions for
/// handlers to extract; otherwise the request is rejected with 401.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)
        .ok_or_else(|| AppError::Unauthorized("missing or malformed bearer token".to_string()))?;

    let session = state
        .sessions
        .get(&token)
        .await
        .ok_or_else(|| AppError::Unauthorized("session expired or unknown".to_string()))?;

    tracing::debug!(student_id = session.student_id, uri = %request.uri(), "Session resolved");

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
