use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

pub mod auth;
pub mod dashboard;
pub mod movies;
pub mod tutor;

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
