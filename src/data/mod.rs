//! Data tables consumed and produced by the recommendation engine.
//!
//! The engine is a pure in-process computation library: it consumes an
//! in-memory rating table and movie catalog (produced upstream by data
//! loading and activity filtering, which are not this crate's concern) and
//! returns ordered [`Recommendation`] records. [`InteractionMatrix`]
//! materializes the dense user x item pivot with **0.0 as the "no rating"
//! sentinel**; callers on a rating scale that legitimately contains 0
//! must remap before building the matrix.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::primitives::Matrix;

/// User identifier.
pub type UserId = u32;

/// Movie identifier.
pub type MovieId = u32;

/// A single observed rating. Immutable once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Rating user
    pub user_id: UserId,
    /// Rated movie
    pub movie_id: MovieId,
    /// Score, strictly positive on the MovieLens 0.5-5.0 scale
    pub rating: f32,
}

impl Rating {
    /// Creates a rating record.
    #[must_use]
    pub fn new(user_id: UserId, movie_id: MovieId, rating: f32) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
        }
    }
}

/// A catalog entry: id, title and genre labels.
///
/// An item is expected to carry at least one label, but empty label sets
/// are tolerated everywhere downstream (they score zero similarity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Movie identifier
    pub movie_id: MovieId,
    /// Display title; not guaranteed unique across the catalog
    pub title: String,
    /// Genre labels, a small closed-ish vocabulary
    pub genres: Vec<String>,
}

impl Movie {
    /// Creates a movie from explicit genre labels.
    #[must_use]
    pub fn new(movie_id: MovieId, title: impl Into<String>, genres: &[&str]) -> Self {
        Self {
            movie_id,
            title: title.into(),
            genres: genres.iter().map(|g| (*g).to_string()).collect(),
        }
    }

    /// Creates a movie from a pipe-delimited genre line, the upstream
    /// catalog format (`"Action|Comedy"`). Empty segments are dropped.
    #[must_use]
    pub fn from_genre_line(movie_id: MovieId, title: impl Into<String>, line: &str) -> Self {
        let genres = line
            .split('|')
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            movie_id,
            title: title.into(),
            genres,
        }
    }
}

/// The movie table, in catalog order, with an id lookup.
///
/// Catalog order defines the row order of every derived item matrix.
/// Duplicate ids keep their first occurrence in the lookup.
#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Movie>,
    by_id: HashMap<MovieId, usize>,
}

impl Catalog {
    /// Builds a catalog from movie records, preserving their order.
    #[must_use]
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        let mut by_id = HashMap::with_capacity(movies.len());
        for (row, movie) in movies.iter().enumerate() {
            by_id.entry(movie.movie_id).or_insert(row);
        }
        Self { movies, by_id }
    }

    /// Number of catalog entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Returns true if the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// All movies in catalog order.
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Looks up a movie by id.
    #[must_use]
    pub fn get(&self, movie_id: MovieId) -> Option<&Movie> {
        self.by_id.get(&movie_id).map(|&row| &self.movies[row])
    }

    /// Catalog row of a movie id.
    #[must_use]
    pub fn position(&self, movie_id: MovieId) -> Option<usize> {
        self.by_id.get(&movie_id).copied()
    }
}

/// Dense-filled user x item rating matrix with id index maps.
///
/// Rows are users and columns are movies, both in ascending id order.
/// Missing cells hold the 0.0 sentinel; a stored 0.0 is indistinguishable
/// from "unrated" by design, and rated-item checks everywhere test for
/// strictly positive values.
#[derive(Debug, Clone)]
pub struct InteractionMatrix {
    user_ids: Vec<UserId>,
    movie_ids: Vec<MovieId>,
    user_index: HashMap<UserId, usize>,
    movie_index: HashMap<MovieId, usize>,
    values: Matrix<f32>,
}

impl InteractionMatrix {
    /// Pivots rating records into the dense matrix.
    ///
    /// Duplicate (user, movie) observations are averaged, matching the
    /// upstream pivot's aggregation. No activity filtering happens here;
    /// that belongs to the upstream builder.
    #[must_use]
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        let user_ids: Vec<UserId> = ratings
            .iter()
            .map(|r| r.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let movie_ids: Vec<MovieId> = ratings
            .iter()
            .map(|r| r.movie_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let user_index: HashMap<UserId, usize> = user_ids
            .iter()
            .enumerate()
            .map(|(pos, &id)| (id, pos))
            .collect();
        let movie_index: HashMap<MovieId, usize> = movie_ids
            .iter()
            .enumerate()
            .map(|(pos, &id)| (id, pos))
            .collect();

        let n_movies = movie_ids.len();
        let mut sums = vec![0.0_f32; user_ids.len() * n_movies];
        let mut counts = vec![0_u32; user_ids.len() * n_movies];
        for r in ratings {
            let cell = user_index[&r.user_id] * n_movies + movie_index[&r.movie_id];
            sums[cell] += r.rating;
            counts[cell] += 1;
        }

        let data: Vec<f32> = sums
            .iter()
            .zip(counts.iter())
            .map(|(&sum, &count)| if count == 0 { 0.0 } else { sum / count as f32 })
            .collect();
        let values = Matrix::from_vec(user_ids.len(), n_movies, data)
            .expect("pivot dimensions are consistent by construction");

        Self {
            user_ids,
            movie_ids,
            user_index,
            movie_index,
            values,
        }
    }

    /// Number of user rows.
    #[must_use]
    pub fn n_users(&self) -> usize {
        self.user_ids.len()
    }

    /// Number of movie columns.
    #[must_use]
    pub fn n_movies(&self) -> usize {
        self.movie_ids.len()
    }

    /// User ids in row order.
    #[must_use]
    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }

    /// Movie ids in column order.
    #[must_use]
    pub fn movie_ids(&self) -> &[MovieId] {
        &self.movie_ids
    }

    /// Returns true if the user has a row.
    #[must_use]
    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.user_index.contains_key(&user_id)
    }

    /// Row position of a user id.
    #[must_use]
    pub fn user_position(&self, user_id: UserId) -> Option<usize> {
        self.user_index.get(&user_id).copied()
    }

    /// Column position of a movie id.
    #[must_use]
    pub fn movie_position(&self, movie_id: MovieId) -> Option<usize> {
        self.movie_index.get(&movie_id).copied()
    }

    /// The stored cell for (user, movie); `None` when either id has no
    /// row/column. A `Some(0.0)` is the sentinel, not an observed zero.
    #[must_use]
    pub fn rating(&self, user_id: UserId, movie_id: MovieId) -> Option<f32> {
        let row = self.user_position(user_id)?;
        let col = self.movie_position(movie_id)?;
        Some(self.values.get(row, col))
    }

    /// The dense value matrix.
    #[must_use]
    pub fn values(&self) -> &Matrix<f32> {
        &self.values
    }
}

/// One ranked result record, the shape every recommend operation returns.
///
/// The meaning of `score` is per model: predicted rating for the latent
/// factor model, cosine similarity for the content and neighbor models,
/// rating count for popularity, blended score for the hybrid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Recommended movie
    pub movie_id: MovieId,
    /// Catalog title
    pub title: String,
    /// Catalog genre labels
    pub genres: Vec<String>,
    /// Ranking score, descending in the result list
    pub score: f32,
}

/// A popularity-ranked movie with its aggregate statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularMovie {
    /// Ranked movie
    pub movie_id: MovieId,
    /// Catalog title
    pub title: String,
    /// Catalog genre labels
    pub genres: Vec<String>,
    /// Number of ratings observed
    pub n_ratings: usize,
    /// Mean of the observed ratings
    pub mean_rating: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ratings() -> Vec<Rating> {
        vec![
            Rating::new(2, 30, 4.0),
            Rating::new(1, 10, 5.0),
            Rating::new(1, 20, 3.0),
            Rating::new(2, 10, 1.0),
        ]
    }

    #[test]
    fn test_pivot_sorts_ids_and_zero_fills() {
        let m = InteractionMatrix::from_ratings(&sample_ratings());
        assert_eq!(m.user_ids(), &[1, 2]);
        assert_eq!(m.movie_ids(), &[10, 20, 30]);
        assert_eq!(m.values().shape(), (2, 3));
        // user 1 never rated movie 30 -> sentinel
        assert_eq!(m.rating(1, 30), Some(0.0));
        assert_eq!(m.rating(1, 10), Some(5.0));
        assert_eq!(m.rating(2, 30), Some(4.0));
    }

    #[test]
    fn test_pivot_averages_duplicates() {
        let ratings = vec![
            Rating::new(1, 10, 2.0),
            Rating::new(1, 10, 4.0),
            Rating::new(1, 20, 1.0),
        ];
        let m = InteractionMatrix::from_ratings(&ratings);
        assert_eq!(m.rating(1, 10), Some(3.0));
    }

    #[test]
    fn test_unknown_ids_are_none() {
        let m = InteractionMatrix::from_ratings(&sample_ratings());
        assert_eq!(m.rating(99, 10), None);
        assert_eq!(m.rating(1, 99), None);
        assert!(!m.contains_user(99));
        assert_eq!(m.movie_position(99), None);
    }

    #[test]
    fn test_empty_ratings() {
        let m = InteractionMatrix::from_ratings(&[]);
        assert_eq!(m.n_users(), 0);
        assert_eq!(m.n_movies(), 0);
    }

    #[test]
    fn test_movie_from_genre_line() {
        let movie = Movie::from_genre_line(1, "Toy Story", "Animation|Comedy");
        assert_eq!(movie.genres, vec!["Animation", "Comedy"]);

        let bare = Movie::from_genre_line(2, "Untagged", "");
        assert!(bare.genres.is_empty());
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::from_movies(vec![
            Movie::new(10, "A", &["Action"]),
            Movie::new(20, "B", &["Drama"]),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.position(20), Some(1));
        assert_eq!(catalog.get(10).map(|m| m.title.as_str()), Some("A"));
        assert!(catalog.get(30).is_none());
    }

    #[test]
    fn test_catalog_duplicate_id_keeps_first() {
        let catalog = Catalog::from_movies(vec![
            Movie::new(10, "First", &["Action"]),
            Movie::new(10, "Second", &["Drama"]),
        ]);
        assert_eq!(catalog.position(10), Some(0));
        assert_eq!(catalog.get(10).map(|m| m.title.as_str()), Some("First"));
    }

    #[test]
    fn test_rating_serde_round_trip() {
        let r = Rating::new(1, 10, 4.5);
        let json = serde_json::to_string(&r).expect("serializes");
        let back: Rating = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, r);
    }
}
