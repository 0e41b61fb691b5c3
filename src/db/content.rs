use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    error::{AppError, AppResult},
    models::{Content, ContentRow, LAYER_COUNT},
};

const CONTENT_COLUMNS: &str = "id, student_id, raw_text, layer0, layer1, layer2, layer3";

/// Persists a distilled text together with all of its layers in one statement
pub async fn insert_content(
    pool: &SqlitePool,
    student_id: i64,
    raw_text: &str,
    layers: [String; LAYER_COUNT],
) -> AppResult<Content> {
    let [layer0, layer1, layer2, layer3] = &layers;

    let done = sqlx::query(
        "INSERT INTO content (student_id, raw_text, layer0, layer1, layer2, layer3) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(student_id)
    .bind(raw_text)
    .bind(layer0)
    .bind(layer1)
    .bind(layer2)
    .bind(layer3)
    .execute(pool)
    .await?;

    Ok(Content {
        id: done.last_insert_rowid(),
        student_id,
        raw_text: raw_text.to_string(),
        layers,
    })
}

/// Fetches a content item only if it belongs to the given student
pub async fn find_owned(
    pool: &SqlitePool,
    content_id: i64,
    student_id: i64,
) -> AppResult<Option<Content>> {
    let row = sqlx::query_as::<_, ContentRow>(&format!(
        "SELECT {} FROM content WHERE id = ? AND student_id = ?",
        CONTENT_COLUMNS
    ))
    .bind(content_id)
    .bind(student_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Content::from))
}

/// Lists a student's content, newest first
pub async fn list_for_student(pool: &SqlitePool, student_id: i64) -> AppResult<Vec<Content>> {
    let rows = sqlx::query_as::<_, ContentRow>(&format!(
        "SELECT {} FROM content WHERE student_id = ? ORDER BY id DESC",
        CONTENT_COLUMNS
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Content::from).collect())
}

/// Fails with `NotFound` unless the content exists and is owned by the student
///
/// Runs on the caller's connection so appends can check ownership inside
/// their own transaction.
pub async fn ensure_owned(
    conn: &mut SqliteConnection,
    content_id: i64,
    student_id: i64,
) -> AppResult<()> {
    let owned: Option<i64> =
        sqlx::query_scalar("SELECT id FROM content WHERE id = ? AND student_id = ?")
            .bind(content_id)
            .bind(student_id)
            .fetch_optional(&mut *conn)
            .await?;

    owned
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("content {}", content_id)))
}
