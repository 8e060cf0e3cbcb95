//! Hybrid blending of collaborative and content signals.
//!
//! Re-ranks the latent factor model's candidate pool by mixing each
//! candidate's predicted rating with its genre overlap against a target
//! movie. The blend weight comes from the user's own rating of the
//! target: a strong observed preference shifts trust toward genre
//! similarity, no observation splits trust evenly.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use crate::data::{Catalog, InteractionMatrix, MovieId, Recommendation, UserId};
use crate::error::Result;
use crate::latent::LatentFactorModel;
use crate::traits::{Query, ScoringStrategy};

/// Fraction of a target movie's genre labels that a candidate shares.
///
/// Returns 0.0 for an empty target label set rather than dividing by
/// zero.
///
/// # Examples
///
/// ```
/// use recomendar::hybrid::genre_match;
///
/// let action_comedy = vec!["Action".to_string(), "Comedy".to_string()];
/// let action = vec!["Action".to_string()];
/// assert!((genre_match(&action, &action_comedy) - 0.5).abs() < 1e-6);
/// assert!((genre_match(&action_comedy, &action_comedy) - 1.0).abs() < 1e-6);
/// assert_eq!(genre_match(&action, &[]), 0.0);
/// ```
#[must_use]
pub fn genre_match(candidate: &[String], target: &[String]) -> f32 {
    if target.is_empty() {
        return 0.0;
    }
    let target_set: HashSet<&str> = target.iter().map(String::as_str).collect();
    let shared = candidate
        .iter()
        .filter(|genre| target_set.contains(genre.as_str()))
        .count();
    shared as f32 / target_set.len() as f32
}

/// Blender over a fitted latent factor model.
///
/// The model, matrix and catalog should come from the same data
/// generation; nothing enforces that here, the caller picks which
/// generations to compose.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use recomendar::data::{Catalog, InteractionMatrix, Movie, Rating};
/// use recomendar::hybrid::HybridRecommender;
/// use recomendar::latent::LatentFactorModel;
///
/// let matrix = Arc::new(InteractionMatrix::from_ratings(&[
///     Rating::new(1, 10, 4.0),
///     Rating::new(1, 40, 5.0),
///     Rating::new(2, 20, 3.0),
///     Rating::new(2, 30, 5.0),
/// ]));
/// let catalog = Arc::new(Catalog::from_movies(vec![
///     Movie::new(10, "Speed", &["Action"]),
///     Movie::new(20, "Ronin", &["Action"]),
///     Movie::new(30, "Ikiru", &["Drama"]),
///     Movie::new(40, "Heat", &["Action"]),
/// ]));
/// let latent = Arc::new(
///     LatentFactorModel::fit(Arc::clone(&matrix), Arc::clone(&catalog), 1)
///         .expect("rank 1 is valid"),
/// );
///
/// let hybrid = HybridRecommender::new(latent, matrix, catalog);
/// let recs = hybrid.recommend(1, Some(40), 1);
/// assert_eq!(recs[0].movie_id, 20); // shares the target's genre
/// ```
#[derive(Debug)]
pub struct HybridRecommender {
    latent: Arc<LatentFactorModel>,
    matrix: Arc<InteractionMatrix>,
    catalog: Arc<Catalog>,
}

impl HybridRecommender {
    /// Composes a fitted latent model with an interaction matrix and
    /// catalog.
    #[must_use]
    pub fn new(
        latent: Arc<LatentFactorModel>,
        matrix: Arc<InteractionMatrix>,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            latent,
            matrix,
            catalog,
        }
    }

    /// Trust placed in the content signal for one (user, target) pair.
    ///
    /// The user's strictly positive rating of the target normalizes to
    /// [0, 1] as `rating / 5`; a sentinel 0, a missing cell, or an
    /// unknown id all mean no observed preference and fall back to an
    /// even 0.5 split.
    #[must_use]
    pub fn blend_weight(&self, user_id: UserId, movie_id: MovieId) -> f32 {
        match self.matrix.rating(user_id, movie_id) {
            Some(rating) if rating > 0.0 => rating / 5.0,
            _ => 0.5,
        }
    }

    /// Blended ranking for a user, optionally steered toward a target
    /// movie.
    ///
    /// An unknown user yields an empty list. The collaborative pool is
    /// `2n` candidates deep to leave room for re-ranking. Without a
    /// target, or when the target is missing from the catalog, the
    /// collaborative ranking passes through untouched (a defined
    /// fallback, not an error). Otherwise each candidate's score becomes
    /// `(1 - w) * predicted + w * 5 * genre_match`, putting both terms
    /// on the 0-5 rating scale before mixing. Ties break by ascending
    /// movie id.
    #[must_use]
    pub fn recommend(
        &self,
        user_id: UserId,
        target: Option<MovieId>,
        n: usize,
    ) -> Vec<Recommendation> {
        if !self.matrix.contains_user(user_id) {
            return Vec::new();
        }

        let mut pool = self.latent.recommend(user_id, 2 * n);

        let Some(target_id) = target else {
            pool.truncate(n);
            return pool;
        };
        let Some(target_movie) = self.catalog.get(target_id) else {
            pool.truncate(n);
            return pool;
        };

        let weight = self.blend_weight(user_id, target_id);
        for rec in &mut pool {
            let overlap = genre_match(&rec.genres, &target_movie.genres);
            rec.score = (1.0 - weight) * rec.score + weight * 5.0 * overlap;
        }
        pool.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.movie_id.cmp(&b.movie_id))
        });
        pool.truncate(n);
        pool
    }
}

impl ScoringStrategy for HybridRecommender {
    fn recommend(&self, query: &Query, n: usize) -> Result<Vec<Recommendation>> {
        match query {
            Query::User(user_id) => Ok(self.recommend(*user_id, None, n)),
            _ => Ok(Vec::new()),
        }
    }
}
