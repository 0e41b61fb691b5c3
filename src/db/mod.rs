pub mod content;
pub mod events;
pub mod sqlite;
pub mod students;

pub use sqlite::{create_memory_pool, create_pool, run_migrations};

#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    let pool = create_memory_pool().await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
