use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lumen_api::{
    api::{create_router, AppState, Settings},
    config::Config,
    db,
    services::{
        dataset::load_movies, extract::PdfExtractor, generator::OpenAiGenerator,
        recommender::SimilarityIndex,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("lumen_api=info,tower_http=info,sqlx=warn")
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    tracing::info!(database_url = %config.database_url, "Database ready");

    let movies = load_movies(&config.movie_dataset_path)
        .with_context(|| format!("Failed to load movie dataset {}", config.movie_dataset_path))?;
    let recommender = tokio::task::spawn_blocking(move || SimilarityIndex::build(movies)).await?;

    let generator = OpenAiGenerator::new(
        config.openai_api_key.clone(),
        config.openai_api_url.clone(),
        config.llm_model.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;

    let state = AppState::new(
        pool,
        Arc::new(generator),
        Arc::new(PdfExtractor),
        recommender,
        Settings::from(&config),
    );

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "Server running");

    axum::serve(listener, app).await?;
    Ok(())
}
