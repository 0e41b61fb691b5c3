use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::time::{Duration, Instant};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Content, Layer, QuizQuestion, Student},
};

/// Questions generated for the layer being read, awaiting answers
#[derive(Debug, Clone)]
pub struct PendingQuiz {
    pub layer: Layer,
    pub questions: Vec<QuizQuestion>,
}

/// The content a student is currently browsing
#[derive(Debug, Clone)]
pub struct ActiveContent {
    pub content: Content,
    pub layer: Layer,
    pub quiz: Option<PendingQuiz>,
}

impl ActiveContent {
    /// Every newly opened content starts at the simplest layer
    pub fn new(content: Content) -> Self {
        Self {
            content,
            layer: Layer::SIMPLEST,
            quiz: None,
        }
    }
}

/// Per-login state
#[derive(Debug)]
pub struct SessionState {
    pub student_id: i64,
    pub username: String,
    pub active: Option<ActiveContent>,
}

impl SessionState {
    pub fn active(&self) -> AppResult<&ActiveContent> {
        self.active.as_ref().ok_or_else(no_active_content)
    }

    pub fn active_mut(&mut self) -> AppResult<&mut ActiveContent> {
        self.active.as_mut().ok_or_else(no_active_content)
    }
}

fn no_active_content() -> AppError {
    AppError::InvalidInput("No active content; distill or open content first".to_string())
}

/// Authenticated session attached to a request by the session middleware
///
/// The state mutex is held for the whole of an interaction, so requests
/// within one session are processed one at a time while other sessions
/// proceed independently.
#[derive(Clone)]
pub struct StudentSession {
    pub token: Uuid,
    pub student_id: i64,
    pub state: Arc<Mutex<SessionState>>,
}

struct Entry {
    session: StudentSession,
    last_seen: Instant,
}

/// In-memory registry of live sessions keyed by bearer token
///
/// A session unused for longer than the idle timeout no longer resolves,
/// and expired entries are swept whenever a new session is opened.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Entry>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            inner: Arc::default(),
            idle_timeout,
        }
    }

    /// Opens a new session for the student and returns its token
    pub async fn create(&self, student: &Student) -> Uuid {
        let token = Uuid::new_v4();
        let state = SessionState {
            student_id: student.id,
            username: student.username.clone(),
            active: None,
        };

        let entry = Entry {
            session: StudentSession {
                token,
                student_id: student.id,
                state: Arc::new(Mutex::new(state)),
            },
            last_seen: Instant::now(),
        };

        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() <= self.idle_timeout);
        let expired = before - sessions.len();
        sessions.insert(token, entry);

        tracing::debug!(
            student_id = student.id,
            expired,
            live = sessions.len(),
            "Session opened"
        );

        token
    }

    /// Resolves a token and marks the session as used
    ///
    /// Does not touch the session's state lock. An expired session is
    /// removed and resolves to `None`.
    pub async fn get(&self, token: &Uuid) -> Option<StudentSession> {
        let mut sessions = self.inner.write().await;
        let entry = sessions.get_mut(token)?;

        if entry.last_seen.elapsed() > self.idle_timeout {
            sessions.remove(token);
            return None;
        }

        entry.last_seen = Instant::now();
        Some(entry.session.clone())
    }

    /// Drops the session; returns false if the token was unknown
    pub async fn remove(&self, token: &Uuid) -> bool {
        self.inner.write().await.remove(token).is_some()
    }
}
