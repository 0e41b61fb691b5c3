use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// A registered student; never mutated after registration
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Student {
    pub id: i64,
    pub username: String,
}

/// Row shape of the `students` table
#[derive(Debug, FromRow)]
pub struct StudentRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Student {
            id: row.id,
            username: row.username,
        }
    }
}

/// Username/password pair used for both registration and login
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}
