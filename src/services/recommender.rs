use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::{Movie, Recommendation};

/// Sparse term-frequency vector: (vocabulary index, raw count), sorted by index
#[derive(Debug, Clone, Default)]
struct TermVector {
    counts: Vec<(usize, u32)>,
    norm: f64,
}

impl TermVector {
    fn dot(&self, other: &TermVector) -> f64 {
        let (mut a, mut b) = (self.counts.iter().peekable(), other.counts.iter().peekable());
        let mut sum = 0.0;

        while let (Some(&&(ia, ca)), Some(&&(ib, cb))) = (a.peek(), b.peek()) {
            match ia.cmp(&ib) {
                std::cmp::Ordering::Less => {
                    a.next();
                }
                std::cmp::Ordering::Greater => {
                    b.next();
                }
                std::cmp::Ordering::Equal => {
                    sum += ca as f64 * cb as f64;
                    a.next();
                    b.next();
                }
            }
        }

        sum
    }

    fn cosine(&self, other: &TermVector) -> f64 {
        if self.norm == 0.0 || other.norm == 0.0 {
            return 0.0;
        }
        (self.dot(other) / (self.norm * other.norm)).clamp(0.0, 1.0)
    }
}

/// Splits text into tokens on whitespace and punctuation, keeping case as loaded
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
}

/// Builds one count vector per document over a shared vocabulary
fn vectorize<'a>(documents: impl Iterator<Item = &'a str>) -> (Vec<TermVector>, usize) {
    let mut vocabulary: HashMap<&'a str, usize> = HashMap::new();
    let mut vectors = Vec::new();

    for document in documents {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for token in tokenize(document) {
            let next_id = vocabulary.len();
            let id = *vocabulary.entry(token).or_insert(next_id);
            *counts.entry(id).or_insert(0) += 1;
        }

        let norm = counts
            .values()
            .map(|&c| (c as f64) * (c as f64))
            .sum::<f64>()
            .sqrt();

        vectors.push(TermVector {
            counts: counts.into_iter().collect(),
            norm,
        });
    }

    (vectors, vocabulary.len())
}

/// A movie matched by title plus its nearest neighbours
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Ranking {
    pub movie: Movie,
    pub recommendations: Vec<Recommendation>,
}

/// Content-based similarity index over a static movie corpus
///
/// The full N×N cosine matrix is computed once at construction and never
/// mutated, so an `Arc<SimilarityIndex>` can be read from any number of
/// handlers without locking.
#[derive(Debug)]
pub struct SimilarityIndex {
    movies: Vec<Movie>,
    matrix: Vec<Vec<f64>>,
    vocabulary_size: usize,
}

impl SimilarityIndex {
    pub fn build(movies: Vec<Movie>) -> Self {
        let (vectors, vocabulary_size) =
            vectorize(movies.iter().map(|m| m.combined_features.as_str()));
        let n = vectors.len();

        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            // A vector is always identical to itself, empty or not
            matrix[i][i] = 1.0;
            for j in (i + 1)..n {
                let score = vectors[i].cosine(&vectors[j]);
                matrix[i][j] = score;
                matrix[j][i] = score;
            }
        }

        tracing::info!(
            movies = n,
            vocabulary = vocabulary_size,
            "Built similarity matrix"
        );

        Self {
            movies,
            matrix,
            vocabulary_size,
        }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    pub fn similarity(&self, i: usize, j: usize) -> Option<f64> {
        self.matrix.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Resolves a title to its row index
    ///
    /// Matching is exact but case-insensitive; with duplicate titles the
    /// first one in load order wins.
    pub fn find_index(&self, title: &str) -> Option<usize> {
        let wanted = title.to_lowercase();
        self.movies
            .iter()
            .position(|movie| movie.title.to_lowercase() == wanted)
    }

    /// Returns the `k` titles most similar to `title`, best first
    ///
    /// The query itself is never part of the result, and equal scores keep
    /// their original row order. `None` means the title is not in the corpus.
    pub fn rank(&self, title: &str, k: usize) -> Option<Ranking> {
        let index = self.find_index(title)?;

        let mut neighbours: Vec<(usize, f64)> = self.matrix[index]
            .iter()
            .copied()
            .enumerate()
            .filter(|&(j, _)| j != index)
            .collect();

        // sort_by is stable, which provides the row-order tie break
        neighbours.sort_by(|a, b| b.1.total_cmp(&a.1));

        let recommendations = neighbours
            .into_iter()
            .take(k)
            .map(|(j, score)| Recommendation {
                title: self.movies[j].title.clone(),
                score,
            })
            .collect();

        Some(Ranking {
            movie: self.movies[index].clone(),
            recommendations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieRecord;

    fn movie(index: usize, title: &str, genres: &str, director: &str, keywords: &str, cast: &str) -> Movie {
        Movie::new(
            index,
            MovieRecord {
                title: Some(title.to_string()),
                genres: Some(genres.to_string()),
                keywords: Some(keywords.to_string()),
                cast: Some(cast.to_string()),
                director: Some(director.to_string()),
            },
        )
    }

    fn corpus() -> SimilarityIndex {
        SimilarityIndex::build(vec![
            movie(0, "Avatar", "Action Adventure", "James Cameron", "space marine", "Sam Worthington"),
            movie(1, "Aliens", "Action Horror", "James Cameron", "space marine", "Sigourney Weaver"),
            movie(2, "Titanic", "Drama Romance", "James Cameron", "ship iceberg", "Kate Winslet"),
            movie(3, "Notting Hill", "Comedy Romance", "Roger Michell", "bookshop london", "Hugh Grant"),
            movie(4, "Gravity", "Drama Thriller", "Alfonso Cuaron", "space astronaut", "Sandra Bullock"),
        ])
    }

    #[test]
    fn test_tokenize_splits_on_punctuation_and_keeps_case() {
        let tokens: Vec<&str> = tokenize("Sci-Fi, space  Space!").collect();
        assert_eq!(tokens, vec!["Sci", "Fi", "space", "Space"]);
    }

    #[test]
    fn test_vocabulary_counts_distinct_tokens() {
        let index = SimilarityIndex::build(vec![
            movie(0, "A", "x y", "", "", ""),
            movie(1, "B", "y z", "", "", ""),
        ]);
        // A, x, y, B, z
        assert_eq!(index.vocabulary_size(), 5);
    }

    #[test]
    fn test_matrix_is_symmetric_with_unit_diagonal() {
        let index = corpus();
        for i in 0..index.len() {
            assert_eq!(index.similarity(i, i), Some(1.0));
            for j in 0..index.len() {
                assert_eq!(index.similarity(i, j), index.similarity(j, i));
                let score = index.similarity(i, j).unwrap();
                assert!((0.0..=1.0).contains(&score));
            }
        }
    }

    #[test]
    fn test_rank_excludes_query_and_sorts_descending() {
        let index = corpus();
        let ranking = index.rank("Avatar", 10).unwrap();

        assert_eq!(ranking.movie.title, "Avatar");
        assert_eq!(ranking.recommendations.len(), 4);
        assert!(ranking.recommendations.iter().all(|r| r.title != "Avatar"));
        assert_eq!(ranking.recommendations[0].title, "Aliens");
        assert!(ranking
            .recommendations
            .windows(2)
            .all(|pair| pair[0].score >= pair[1].score));
    }

    #[test]
    fn test_rank_returns_at_most_k() {
        let index = corpus();
        assert_eq!(index.rank("Avatar", 2).unwrap().recommendations.len(), 2);
        assert!(index.rank("Avatar", 0).unwrap().recommendations.is_empty());
    }

    #[test]
    fn test_rank_is_case_insensitive_and_not_found_is_none() {
        let index = corpus();
        assert!(index.rank("notting hILL", 3).is_some());
        assert!(index.rank("Solaris", 3).is_none());
        assert!(index.rank("Nott", 3).is_none());
    }

    #[test]
    fn test_ties_keep_row_order() {
        let index = SimilarityIndex::build(vec![
            movie(0, "Query", "Drama", "", "", ""),
            movie(1, "Alpha", "Comedy", "", "", ""),
            movie(2, "Beta", "Horror", "", "", ""),
            movie(3, "Gamma", "Western", "", "", ""),
        ]);

        let titles: Vec<String> = index
            .rank("Query", 3)
            .unwrap()
            .recommendations
            .into_iter()
            .map(|r| r.title)
            .collect();

        assert_eq!(titles, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_duplicate_titles_resolve_to_first_occurrence() {
        let index = SimilarityIndex::build(vec![
            movie(0, "Solaris", "Drama", "Andrei Tarkovsky", "", ""),
            movie(1, "Other", "Drama", "", "", ""),
            movie(2, "SOLARIS", "Drama", "Steven Soderbergh", "", ""),
        ]);

        assert_eq!(index.find_index("solaris"), Some(0));
        let ranking = index.rank("solaris", 5).unwrap();
        assert_eq!(ranking.movie.director, "Andrei Tarkovsky");
        assert_eq!(ranking.recommendations.len(), 2);
    }

    #[test]
    fn test_two_movie_corpus_differing_in_director() {
        let index = SimilarityIndex::build(vec![
            movie(0, "A", "Drama", "Xavier", "heist", "Cole"),
            movie(1, "B", "Drama", "Yvonne", "heist", "Cole"),
        ]);

        let ranking = index.rank("A", 5).unwrap();
        assert_eq!(ranking.recommendations.len(), 1);
        assert_eq!(ranking.recommendations[0].title, "B");
        // 3 shared tokens out of 5 on each side
        assert!((ranking.recommendations[0].score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_empty_feature_text_scores_zero_against_others() {
        let index = SimilarityIndex::build(vec![
            movie(0, "", "", "", "", ""),
            movie(1, "Heat", "Crime", "", "", ""),
        ]);

        assert_eq!(index.similarity(0, 0), Some(1.0));
        assert_eq!(index.similarity(0, 1), Some(0.0));
    }

    #[test]
    fn test_empty_corpus() {
        let index = SimilarityIndex::build(vec![]);
        assert!(index.is_empty());
        assert!(index.rank("anything", 5).is_none());
    }
}
