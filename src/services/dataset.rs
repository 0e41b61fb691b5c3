use std::{io::Read, path::Path};

use crate::{
    error::AppResult,
    models::{Movie, MovieRecord},
};

/// Loads the whole movie dataset from a CSV file with a header row
///
/// Only the title, genres, keywords, cast and director columns are read;
/// any other columns are ignored.
pub fn load_movies(path: impl AsRef<Path>) -> AppResult<Vec<Movie>> {
    let path = path.as_ref();
    let reader = csv::Reader::from_path(path)?;
    let movies = read_movies(reader)?;

    tracing::info!(
        path = %path.display(),
        movies = movies.len(),
        "Loaded movie dataset"
    );

    Ok(movies)
}

fn read_movies<R: Read>(mut reader: csv::Reader<R>) -> AppResult<Vec<Movie>> {
    reader
        .deserialize::<MovieRecord>()
        .enumerate()
        .map(|(index, record)| Ok(Movie::new(index, record?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
index,budget,genres,keywords,title,cast,director
0,237000000,Action Adventure Fantasy,culture clash future,Avatar,Sam Worthington Zoe Saldana,James Cameron
1,300000000,Adventure Fantasy,ocean drug abuse,Pirates of the Caribbean: At World's End,Johnny Depp,Gore Verbinski
2,0,,,\"Sunday, Bloody Sunday\",,
";

    #[test]
    fn test_reads_rows_in_order_with_missing_values_empty() {
        let movies = read_movies(csv::Reader::from_reader(SAMPLE.as_bytes())).unwrap();

        assert_eq!(movies.len(), 3);
        assert_eq!(movies[0].index, 0);
        assert_eq!(movies[0].title, "Avatar");
        assert_eq!(movies[0].director, "James Cameron");
        assert_eq!(movies[1].title, "Pirates of the Caribbean: At World's End");
        assert_eq!(movies[2].title, "Sunday, Bloody Sunday");
        assert_eq!(movies[2].genres, "");
        assert_eq!(movies[2].cast, "");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let movies = load_movies(file.path()).unwrap();
        assert_eq!(movies.len(), 3);
    }

    #[test]
    fn test_missing_file_is_a_dataset_error() {
        let result = load_movies("/definitely/not/here.csv");
        assert!(matches!(result, Err(crate::error::AppError::Dataset(_))));
    }
}
