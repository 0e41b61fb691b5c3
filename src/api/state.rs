use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::{
    config::Config,
    services::{
        extract::DocumentExtractor, generator::TextGenerator, recommender::SimilarityIndex,
        session::SessionStore,
    },
};

/// Request-independent knobs copied out of `Config`
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub bcrypt_cost: u32,
    pub quiz_question_count: usize,
    pub max_upload_bytes: usize,
    pub session_idle: Duration,
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            bcrypt_cost: config.bcrypt_cost,
            quiz_question_count: config.quiz_question_count,
            max_upload_bytes: config.max_upload_bytes,
            session_idle: Duration::from_secs(config.session_idle_secs),
        }
    }
}

/// Shared application state
///
/// Everything here is either immutable after startup or guards its own
/// interior, so cloning per request is cheap and lock-free.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub generator: Arc<dyn TextGenerator>,
    pub extractor: Arc<dyn DocumentExtractor>,
    pub recommender: Arc<SimilarityIndex>,
    pub sessions: SessionStore,
    pub settings: Settings,
}

impl AppState {
    pub fn new(
        db_pool: SqlitePool,
        generator: Arc<dyn TextGenerator>,
        extractor: Arc<dyn DocumentExtractor>,
        recommender: SimilarityIndex,
        settings: Settings,
    ) -> Self {
        Self {
            db_pool,
            generator,
            extractor,
            recommender: Arc::new(recommender),
            sessions: SessionStore::new(settings.session_idle),
            settings,
        }
    }
}
