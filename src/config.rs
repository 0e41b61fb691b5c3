use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// SQLite database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// OpenAI-compatible API key
    pub openai_api_key: String,

    /// OpenAI-compatible API base URL
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// Chat model used for explanations and quizzes
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    /// Per-request timeout for the LLM service
    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,

    /// CSV file the movie recommender is built from
    #[serde(default = "default_movie_dataset_path")]
    pub movie_dataset_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// bcrypt work factor for password hashes
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Number of questions requested per generated quiz
    #[serde(default = "default_quiz_question_count")]
    pub quiz_question_count: usize,

    /// Largest request body accepted by the document upload route
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Sessions unused for this long are dropped
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

fn default_database_url() -> String {
    "sqlite://db/tutor.db".to_string()
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    60
}

fn default_movie_dataset_path() -> String {
    "movie_dataset.csv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_quiz_question_count() -> usize {
    5
}

fn default_max_upload_bytes() -> usize {
    200 * 1024 * 1024
}

fn default_session_idle_secs() -> u64 {
    60 * 60
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_variables() {
        let vars = vec![("OPENAI_API_KEY".to_string(), "sk-test".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.database_url, "sqlite://db/tutor.db");
        assert_eq!(config.llm_model, "gpt-4o-mini");
        assert_eq!(config.port, 3000);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.quiz_question_count, 5);
        assert_eq!(config.max_upload_bytes, 200 * 1024 * 1024);
        assert_eq!(config.session_idle_secs, 3600);
    }

    #[test]
    fn test_api_key_is_required() {
        let vars: Vec<(String, String)> = vec![];
        let result = envy::from_iter::<_, Config>(vars);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let vars = vec![
            ("OPENAI_API_KEY".to_string(), "sk-test".to_string()),
            ("PORT".to_string(), "8080".to_string()),
            ("MOVIE_DATASET_PATH".to_string(), "/data/movies.csv".to_string()),
            ("MAX_UPLOAD_BYTES".to_string(), "1048576".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.movie_dataset_path, "/data/movies.csv");
        assert_eq!(config.max_upload_bytes, 1_048_576);
    }
}
