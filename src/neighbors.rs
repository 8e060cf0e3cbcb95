//! Item-based collaborative filtering.
//!
//! Two movies are neighbors when the same users rated them similarly,
//! regardless of genre metadata. The index is a brute-force cosine scan
//! over item column vectors; fitting precomputes each column's non-zero
//! form and L2 norm, since interaction columns are mostly sentinel zeros.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::data::{Catalog, InteractionMatrix, MovieId, Recommendation};
use crate::error::{RecomendarError, Result};
use crate::traits::{Query, ScoringStrategy};

/// One item column in sparse form: the user rows that rated it, their
/// ratings, and the column norm.
#[derive(Debug, Clone)]
struct SparseColumn {
    rows: Vec<usize>,
    values: Vec<f32>,
    norm: f32,
}

impl SparseColumn {
    fn cosine_similarity(&self, other: &Self) -> f32 {
        if self.norm == 0.0 || other.norm == 0.0 {
            return 0.0;
        }
        let mut dot = 0.0;
        let mut a = 0;
        let mut b = 0;
        while a < self.rows.len() && b < other.rows.len() {
            match self.rows[a].cmp(&other.rows[b]) {
                Ordering::Less => a += 1,
                Ordering::Greater => b += 1,
                Ordering::Equal => {
                    dot += self.values[a] * other.values[b];
                    a += 1;
                    b += 1;
                }
            }
        }
        dot / (self.norm * other.norm)
    }
}

/// Nearest-neighbor model over co-rating patterns.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use recomendar::data::{Catalog, InteractionMatrix, Movie, Rating};
/// use recomendar::neighbors::ItemNeighborModel;
///
/// let matrix = Arc::new(InteractionMatrix::from_ratings(&[
///     Rating::new(1, 10, 5.0),
///     Rating::new(1, 20, 5.0),
///     Rating::new(2, 10, 4.0),
///     Rating::new(2, 20, 4.0),
/// ]));
/// let catalog = Arc::new(Catalog::from_movies(vec![
///     Movie::new(10, "Alien", &["Horror", "Sci-Fi"]),
///     Movie::new(20, "Aliens", &["Action", "Sci-Fi"]),
/// ]));
///
/// let model = ItemNeighborModel::fit(matrix, catalog);
/// let recs = model.recommend(10, 1).expect("movie 10 is in the matrix");
/// assert_eq!(recs[0].movie_id, 20);
/// ```
#[derive(Debug)]
pub struct ItemNeighborModel {
    columns: Vec<SparseColumn>,
    matrix: Arc<InteractionMatrix>,
    catalog: Arc<Catalog>,
}

impl ItemNeighborModel {
    /// Builds the sparse column index over the interaction matrix.
    #[must_use]
    pub fn fit(matrix: Arc<InteractionMatrix>, catalog: Arc<Catalog>) -> Self {
        let values = matrix.values();
        let columns: Vec<SparseColumn> = (0..matrix.n_movies())
            .map(|col| {
                let mut rows = Vec::new();
                let mut cell_values = Vec::new();
                let mut sum_of_squares = 0.0;
                for row in 0..matrix.n_users() {
                    let value = values.get(row, col);
                    if value != 0.0 {
                        rows.push(row);
                        cell_values.push(value);
                        sum_of_squares += value * value;
                    }
                }
                SparseColumn {
                    rows,
                    values: cell_values,
                    norm: sum_of_squares.sqrt(),
                }
            })
            .collect();

        debug!(
            n_movies = columns.len(),
            n_users = matrix.n_users(),
            "fitting item neighbor model"
        );

        Self {
            columns,
            matrix,
            catalog,
        }
    }

    /// Ranks the nearest co-rated movies for a movie id.
    ///
    /// Queries `min(n + 1, n_items)` neighbors by cosine distance and
    /// excludes the query movie by identity, never by position, since a
    /// movie with an identical rating pattern ties the self-match at
    /// distance 0 and tie-breaking may order it first. Distances convert
    /// to `similarity = 1 - distance`; ties break by ascending movie id.
    ///
    /// # Errors
    ///
    /// Returns [`RecomendarError::UnknownItem`] when `movie_id` has no
    /// column in the fitted matrix. Unlike an unknown user, this is a
    /// caller precondition violation: the item never entered the fitted
    /// space, usually because it did not survive upstream filtering.
    pub fn recommend(&self, movie_id: MovieId, n: usize) -> Result<Vec<Recommendation>> {
        let query_col = self
            .matrix
            .movie_position(movie_id)
            .ok_or(RecomendarError::UnknownItem { movie_id })?;

        let movie_ids = self.matrix.movie_ids();
        let k = (n + 1).min(movie_ids.len());

        let query = &self.columns[query_col];
        let mut neighbors: Vec<(usize, f32)> = self
            .columns
            .iter()
            .enumerate()
            .map(|(col, column)| (col, 1.0 - query.cosine_similarity(column)))
            .collect();
        neighbors.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| movie_ids[a.0].cmp(&movie_ids[b.0]))
        });
        neighbors.truncate(k);

        let results: Vec<Recommendation> = neighbors
            .into_iter()
            .filter(|&(col, _)| col != query_col)
            .take(n)
            .filter_map(|(col, distance)| {
                self.catalog.get(movie_ids[col]).map(|movie| Recommendation {
                    movie_id: movie.movie_id,
                    title: movie.title.clone(),
                    genres: movie.genres.clone(),
                    score: 1.0 - distance,
                })
            })
            .collect();

        if results.is_empty() {
            warn!(movie_id, "no similar movies found");
        }

        Ok(results)
    }
}

impl ScoringStrategy for ItemNeighborModel {
    fn recommend(&self, query: &Query, n: usize) -> Result<Vec<Recommendation>> {
        match query {
            Query::Item(movie_id) => self.recommend(*movie_id, n),
            _ => Ok(Vec::new()),
        }
    }
}
