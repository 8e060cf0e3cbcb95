//! The scoring capability shared by all recommendation models.

use crate::data::{MovieId, Recommendation, UserId};
use crate::error::Result;

/// What a recommendation is requested for.
///
/// Each model scores the query kinds it understands: the latent factor
/// model and hybrid blender answer [`Query::User`], the content model
/// answers [`Query::Title`], the neighbor model answers [`Query::Item`],
/// and the popularity model answers everything with its global ranking
/// (its cold-start fallback role).
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Recommend for a user's taste
    User(UserId),
    /// Recommend movies similar to an item, by co-rating patterns
    Item(MovieId),
    /// Recommend movies similar to a title, by genre content
    Title(String),
}

/// A fitted model that turns a query into a ranked list.
///
/// Implementations are immutable after fitting: `recommend` takes `&self`
/// and concurrent calls against one fitted value need no coordination.
/// A query kind a model does not score yields `Ok(vec![])`, the same soft
/// outcome as an unknown entity; only the neighbor model's unknown-item
/// precondition violation surfaces as an error.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use recomendar::prelude::*;
///
/// let ratings = vec![
///     Rating::new(1, 10, 5.0),
///     Rating::new(1, 20, 3.0),
///     Rating::new(2, 10, 1.0),
///     Rating::new(2, 30, 4.0),
/// ];
/// let matrix = Arc::new(InteractionMatrix::from_ratings(&ratings));
/// let catalog = Arc::new(Catalog::from_movies(vec![
///     Movie::new(10, "A", &["Action"]),
///     Movie::new(20, "B", &["Comedy"]),
///     Movie::new(30, "C", &["Drama"]),
/// ]));
///
/// let model = LatentFactorModel::fit(Arc::clone(&matrix), Arc::clone(&catalog), 1)
///     .expect("rank 1 is valid for a 2x3 matrix");
/// let strategy: &dyn ScoringStrategy = &model;
/// let recs = strategy.recommend(&Query::User(1), 5).expect("user queries are soft");
/// assert!(recs.iter().all(|r| r.movie_id != 10 && r.movie_id != 20));
/// ```
pub trait ScoringStrategy {
    /// Returns at most `n` results, descending by score.
    ///
    /// # Errors
    ///
    /// Only the item-neighbor model errors, and only for a movie id that
    /// never entered its fitted matrix.
    fn recommend(&self, query: &Query, n: usize) -> Result<Vec<Recommendation>>;
}
