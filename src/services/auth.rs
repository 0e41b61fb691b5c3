use sqlx::SqlitePool;

use crate::{
    db::students,
    error::{AppError, AppResult},
    models::{Credentials, Student},
};

fn validate(credentials: &Credentials) -> AppResult<&str> {
    let username = credentials.username.trim();
    if username.is_empty() {
        return Err(AppError::InvalidInput("Username cannot be empty".to_string()));
    }
    if credentials.password.is_empty() {
        return Err(AppError::InvalidInput("Password cannot be empty".to_string()));
    }
    Ok(username)
}

/// Registers a student with a salted bcrypt hash of their password
pub async fn register(
    pool: &SqlitePool,
    credentials: &Credentials,
    bcrypt_cost: u32,
) -> AppResult<Student> {
    let username = validate(credentials)?;

    let password = credentials.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt_cost))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))?;

    let result = students::insert_student(pool, username, &password_hash).await;
    match &result {
        Ok(student) => tracing::info!(student_id = student.id, "Student registered"),
        Err(AppError::UsernameTaken) => tracing::info!("Registration rejected: username taken"),
        Err(e) => tracing::error!(error = %e, "Registration failed"),
    }
    result
}

/// Verifies credentials
///
/// Unknown usernames and wrong passwords fail identically.
pub async fn login(pool: &SqlitePool, credentials: &Credentials) -> AppResult<Student> {
    let username = credentials.username.trim();

    let Some(row) = students::find_by_username(pool, username).await? else {
        tracing::info!("Login rejected");
        return Err(AppError::AuthenticationFailed);
    };

    let password = credentials.password.clone();
    let hash = row.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .unwrap_or(false);

    if !verified {
        tracing::info!("Login rejected");
        return Err(AppError::AuthenticationFailed);
    }

    tracing::info!(student_id = row.id, "Student logged in");
    Ok(Student::from(row))
}
