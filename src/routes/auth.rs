use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;

use crate::{
    api::AppState,
    error::AppResult,
    models::Credentials,
    services::{auth, session::StudentSession},
};

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub student_id: i64,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub student_id: i64,
    pub username: String,
}

/// Handler for student registration
pub async fn register(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let student = auth::register(&state.db_pool, &credentials, state.settings.bcrypt_cost).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            student_id: student.id,
            username: student.username,
        }),
    ))
}

/// Handler for login; opens a new session
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> AppResult<Json<LoginResponse>> {
    let student = auth::login(&state.db_pool, &credentials).await?;
    let token = state.sessions.create(&student).await;

    Ok(Json(LoginResponse {
        token: token.to_string(),
        student_id: student.id,
        username: student.username,
    }))
}

/// Handler for logout; the token is unusable afterwards
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<StudentSession>,
) -> StatusCode {
    state.sessions.remove(&session.token).await;
    tracing::info!(student_id = session.student_id, "Student logged out");
    StatusCode::NO_CONTENT
}
