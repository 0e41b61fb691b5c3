use sqlx::SqlitePool;

use crate::{
    error::{AppError, AppResult},
    models::{Student, StudentRow},
};

/// Inserts a new student
///
/// Fails with `UsernameTaken` when the username is already registered; the
/// existing row is left untouched.
pub async fn insert_student(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> AppResult<Student> {
    let result = sqlx::query("INSERT INTO students (username, password_hash) VALUES (?, ?)")
        .bind(username)
        .bind(password_hash)
        .execute(pool)
        .await;

    match result {
        Ok(done) => Ok(Student {
            id: done.last_insert_rowid(),
            username: username.to_string(),
        }),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::UsernameTaken),
        Err(e) => Err(e.into()),
    }
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> AppResult<Option<StudentRow>> {
    let row = sqlx::query_as::<_, StudentRow>(
        "SELECT id, username, password_hash FROM students WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
