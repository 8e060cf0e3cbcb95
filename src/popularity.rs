//! Popularity ranking, the cold-start fallback.
//!
//! Aggregates rating count and mean rating per movie from raw rating
//! tuples. Ordering is count-dominant: a movie rated 100 times at 3.0
//! outranks one rated 5 times at 5.0. The mean is carried in the record
//! for display, not for ordering.

use std::collections::HashMap;
use std::sync::Arc;

use crate::data::{Catalog, MovieId, PopularMovie, Rating, Recommendation};
use crate::error::Result;
use crate::traits::{Query, ScoringStrategy};

/// Count-ranked movie statistics.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use recomendar::data::{Catalog, Movie, Rating};
/// use recomendar::popularity::PopularityModel;
///
/// let ratings = vec![
///     Rating::new(1, 10, 3.0),
///     Rating::new(2, 10, 4.0),
///     Rating::new(1, 20, 5.0),
/// ];
/// let catalog = Arc::new(Catalog::from_movies(vec![
///     Movie::new(10, "Jaws", &["Thriller"]),
///     Movie::new(20, "Tango", &["Drama"]),
/// ]));
///
/// let model = PopularityModel::fit(&ratings, catalog);
/// let top = model.top(1);
/// assert_eq!(top[0].movie_id, 10);
/// assert_eq!(top[0].n_ratings, 2);
/// ```
#[derive(Debug)]
pub struct PopularityModel {
    ranked: Vec<PopularMovie>,
}

impl PopularityModel {
    /// Aggregates counts and means from raw ratings.
    ///
    /// No activity filtering happens here; that belongs upstream.
    /// Movies absent from the catalog are dropped at the join, as
    /// everywhere else. Ties on count break by ascending movie id.
    #[must_use]
    pub fn fit(ratings: &[Rating], catalog: Arc<Catalog>) -> Self {
        let mut stats: HashMap<MovieId, (usize, f32)> = HashMap::new();
        for r in ratings {
            let entry = stats.entry(r.movie_id).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += r.rating;
        }

        let mut ranked: Vec<PopularMovie> = stats
            .into_iter()
            .filter_map(|(movie_id, (count, sum))| {
                catalog.get(movie_id).map(|movie| PopularMovie {
                    movie_id,
                    title: movie.title.clone(),
                    genres: movie.genres.clone(),
                    n_ratings: count,
                    mean_rating: sum / count as f32,
                })
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.n_ratings
                .cmp(&a.n_ratings)
                .then_with(|| a.movie_id.cmp(&b.movie_id))
        });

        Self { ranked }
    }

    /// The most-rated movies, at most `n`.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<PopularMovie> {
        self.ranked.iter().take(n).cloned().collect()
    }

    /// Number of distinct ranked movies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    /// Returns true if no movie accumulated any ratings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

impl ScoringStrategy for PopularityModel {
    /// Answers every query kind with the global ranking; popularity is
    /// the fallback when the query's user or item is unknown elsewhere.
    fn recommend(&self, _query: &Query, n: usize) -> Result<Vec<Recommendation>> {
        Ok(self
            .top(n)
            .into_iter()
            .map(|movie| Recommendation {
                movie_id: movie.movie_id,
                title: movie.title,
                genres: movie.genres,
                score: movie.n_ratings as f32,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Movie;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::from_movies(vec![
            Movie::new(1, "Everyone Saw It", &["Action"]),
            Movie::new(2, "Critics' Pick", &["Drama"]),
        ]))
    }

    #[test]
    fn test_count_dominates_mean() {
        // movie 1: 100 ratings averaging 3.0; movie 2: 5 ratings at 5.0
        let mut ratings = Vec::new();
        for user in 0..100 {
            ratings.push(Rating::new(user, 1, 3.0));
        }
        for user in 0..5 {
            ratings.push(Rating::new(user, 2, 5.0));
        }

        let model = PopularityModel::fit(&ratings, catalog());
        let top = model.top(2);
        assert_eq!(top[0].movie_id, 1);
        assert_eq!(top[0].n_ratings, 100);
        assert!((top[0].mean_rating - 3.0).abs() < 1e-5);
        assert_eq!(top[1].movie_id, 2);
        assert!((top[1].mean_rating - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_input_empty_output() {
        let model = PopularityModel::fit(&[], catalog());
        assert!(model.is_empty());
        assert!(model.top(10).is_empty());
    }

    #[test]
    fn test_count_ties_break_by_ascending_id() {
        let ratings = vec![
            Rating::new(1, 2, 5.0),
            Rating::new(2, 2, 5.0),
            Rating::new(1, 1, 2.0),
            Rating::new(2, 1, 2.0),
        ];
        let model = PopularityModel::fit(&ratings, catalog());
        let top = model.top(2);
        assert_eq!(top[0].movie_id, 1);
        assert_eq!(top[1].movie_id, 2);
    }

    #[test]
    fn test_uncataloged_movies_are_dropped() {
        let ratings = vec![Rating::new(1, 99, 4.0), Rating::new(1, 1, 4.0)];
        let model = PopularityModel::fit(&ratings, catalog());
        assert_eq!(model.len(), 1);
        assert_eq!(model.top(5)[0].movie_id, 1);
    }

    #[test]
    fn test_top_caps_at_n() {
        let ratings = vec![Rating::new(1, 1, 4.0), Rating::new(1, 2, 4.0)];
        let model = PopularityModel::fit(&ratings, catalog());
        assert_eq!(model.top(1).len(), 1);
        assert!(model.top(0).is_empty());
    }

    #[test]
    fn test_strategy_answers_any_query_kind() {
        let ratings = vec![Rating::new(1, 1, 4.0)];
        let model = PopularityModel::fit(&ratings, catalog());

        let strategy: &dyn ScoringStrategy = &model;
        let by_user = strategy
            .recommend(&Query::User(12345), 5)
            .expect("popularity never fails");
        let by_item = strategy
            .recommend(&Query::Item(12345), 5)
            .expect("popularity never fails");
        assert_eq!(by_user, by_item);
        assert_eq!(by_user[0].score, 1.0);
    }
}
