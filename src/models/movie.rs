use serde::{Deserialize, Serialize};

/// Raw dataset row; any column may be missing and is then treated as empty
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
}

/// A movie loaded from the dataset, with its position and combined feature text
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Movie {
    /// Row index in load order
    pub index: usize,
    pub title: String,
    pub genres: String,
    pub keywords: String,
    pub cast: String,
    pub director: String,
    #[serde(skip)]
    pub combined_features: String,
}

impl Movie {
    pub fn new(index: usize, record: MovieRecord) -> Self {
        let title = record.title.unwrap_or_default();
        let genres = record.genres.unwrap_or_default();
        let keywords = record.keywords.unwrap_or_default();
        let cast = record.cast.unwrap_or_default();
        let director = record.director.unwrap_or_default();

        let combined_features = [
            title.as_str(),
            genres.as_str(),
            director.as_str(),
            keywords.as_str(),
            cast.as_str(),
        ]
        .join(" ");

        Self {
            index,
            title,
            genres,
            keywords,
            cast,
            director,
            combined_features,
        }
    }

    pub fn genre_list(&self) -> Vec<&str> {
        self.genres.split_whitespace().collect()
    }

    pub fn keyword_list(&self) -> Vec<&str> {
        self.keywords.split_whitespace().collect()
    }
}

/// A neighbouring title and its cosine similarity to the query
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub score: f64,
}
