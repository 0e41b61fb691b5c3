use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::AppState,
    error::{AppError, AppResult},
    models::{Movie, Recommendation},
};

const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default)]
    title: String,
    limit: Option<usize>,
}

/// The matched movie as shown to the client
#[derive(Debug, Serialize)]
pub struct MovieDetails {
    pub title: String,
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
    pub cast: String,
    pub director: String,
}

impl From<&Movie> for MovieDetails {
    fn from(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            genres: movie.genre_list().into_iter().map(String::from).collect(),
            keywords: movie.keyword_list().into_iter().map(String::from).collect(),
            cast: movie.cast.clone(),
            director: movie.director.clone(),
        }
    }
}

/// Outcome of a lookup; an unknown title is a normal result, not an error
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecommendationResponse {
    Found {
        movie: MovieDetails,
        recommendations: Vec<Recommendation>,
    },
    NotFound {
        title: String,
    },
}

/// Handler for content-based movie recommendations
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    // Blank is rejected, but lookup uses the title exactly as sent
    if params.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
    }
    let title = params.title.as_str();
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

    let response = match state.recommender.rank(title, limit) {
        Some(ranking) => {
            tracing::info!(
                title = %ranking.movie.title,
                results = ranking.recommendations.len(),
                "Recommendations served"
            );
            RecommendationResponse::Found {
                movie: MovieDetails::from(&ranking.movie),
                recommendations: ranking.recommendations,
            }
        }
        None => {
            tracing::info!(title, "Movie not found");
            RecommendationResponse::NotFound {
                title: title.to_string(),
            }
        }
    };

    Ok(Json(response))
}
