//! Latent factor collaborative filtering.
//!
//! Decomposes the dense-filled interaction matrix into low-rank user and
//! item factors with a truncated SVD, then reconstructs a full predicted
//! rating surface over the same user/item index space. This is the one
//! numerically approximate operation in the crate: reconstructed values
//! need not match any training rating, including originally-known ones.

use std::cmp::Ordering;
use std::sync::Arc;

use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::data::{Catalog, InteractionMatrix, MovieId, Recommendation, UserId};
use crate::error::{RecomendarError, Result};
use crate::primitives::Matrix;
use crate::traits::{Query, ScoringStrategy};

/// Seed used by [`LatentFactorModel::fit`], matching the upstream batch
/// pipeline's fixed seed.
pub const DEFAULT_RANDOM_STATE: u64 = 42;

/// Extra sketch columns beyond the requested rank for the randomized
/// range finder.
const OVERSAMPLES: usize = 10;

/// Truncated-SVD latent factor model.
///
/// Fitting captures its input generation (`Arc`s to the interaction
/// matrix and catalog); the fitted value is immutable and queries take
/// `&self`. A refit constructs a wholly new value.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use recomendar::data::{Catalog, InteractionMatrix, Movie, Rating};
/// use recomendar::latent::LatentFactorModel;
///
/// let matrix = Arc::new(InteractionMatrix::from_ratings(&[
///     Rating::new(1, 10, 5.0),
///     Rating::new(1, 20, 3.0),
///     Rating::new(2, 10, 1.0),
///     Rating::new(2, 30, 4.0),
/// ]));
/// let catalog = Arc::new(Catalog::from_movies(vec![
///     Movie::new(10, "A", &["Action"]),
///     Movie::new(20, "B", &["Comedy"]),
///     Movie::new(30, "C", &["Drama"]),
/// ]));
///
/// let model = LatentFactorModel::fit(matrix, catalog, 1).expect("valid rank");
/// let recs = model.recommend(1, 3);
/// assert_eq!(recs.len(), 1); // only movie 30 is unrated by user 1
/// ```
#[derive(Debug)]
pub struct LatentFactorModel {
    rank: usize,
    random_state: u64,
    user_factors: Matrix<f32>,
    item_factors: Matrix<f32>,
    predicted: Matrix<f32>,
    matrix: Arc<InteractionMatrix>,
    catalog: Arc<Catalog>,
}

impl LatentFactorModel {
    /// Fits with the default random state.
    ///
    /// # Errors
    ///
    /// Returns [`RecomendarError::InvalidRank`] unless
    /// `1 <= rank <= min(n_users, n_movies) - 1`.
    pub fn fit(
        matrix: Arc<InteractionMatrix>,
        catalog: Arc<Catalog>,
        rank: usize,
    ) -> Result<Self> {
        Self::fit_seeded(matrix, catalog, rank, DEFAULT_RANDOM_STATE)
    }

    /// Fits with an explicit random state.
    ///
    /// The decomposition is a randomized range finder (project onto a
    /// seeded random sketch, orthonormalize with QR, decompose the small
    /// projection exactly) and is deterministic for a fixed seed.
    ///
    /// # Errors
    ///
    /// Returns [`RecomendarError::InvalidRank`] unless
    /// `1 <= rank <= min(n_users, n_movies) - 1`.
    pub fn fit_seeded(
        matrix: Arc<InteractionMatrix>,
        catalog: Arc<Catalog>,
        rank: usize,
        random_state: u64,
    ) -> Result<Self> {
        let (n_users, n_movies) = matrix.values().shape();
        let limit = n_users.min(n_movies).saturating_sub(1);
        if rank == 0 || rank > limit {
            return Err(RecomendarError::InvalidRank {
                requested: rank,
                limit,
            });
        }

        debug!(n_users, n_movies, rank, "fitting latent factor model");

        let a = DMatrix::from_row_slice(n_users, n_movies, matrix.values().as_slice());
        let sketch = (rank + OVERSAMPLES).min(n_users.min(n_movies));

        let mut rng = StdRng::seed_from_u64(random_state);
        let omega = DMatrix::from_fn(n_movies, sketch, |_, _| rng.gen_range(-1.0_f32..1.0));

        // Range finder: an orthonormal basis for the column space of A
        // restricted to the sketch, then an exact SVD of the small
        // projection B = Q^T A.
        let q = (&a * omega).qr().q();
        let b = q.transpose() * &a;
        let svd = b.svd(true, true);
        let u_b = svd
            .u
            .ok_or_else(|| RecomendarError::from("SVD did not produce left factors"))?;
        let v_t = svd
            .v_t
            .ok_or_else(|| RecomendarError::from("SVD did not produce right factors"))?;
        let u = q * u_b;

        // user factors absorb the singular values (U_k Sigma_k), item
        // factors are the top-k right vectors (V_k^T)
        let mut user_factors = Matrix::zeros(n_users, rank);
        for i in 0..n_users {
            for j in 0..rank {
                user_factors.set(i, j, u[(i, j)] * svd.singular_values[j]);
            }
        }
        let mut item_factors = Matrix::zeros(rank, n_movies);
        for i in 0..rank {
            for j in 0..n_movies {
                item_factors.set(i, j, v_t[(i, j)]);
            }
        }

        let predicted = user_factors
            .matmul(&item_factors)
            .map_err(RecomendarError::from)?;

        Ok(Self {
            rank,
            random_state,
            user_factors,
            item_factors,
            predicted,
            matrix,
            catalog,
        })
    }

    /// The fitted rank.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// The seed the factors were fit with.
    #[must_use]
    pub fn random_state(&self) -> u64 {
        self.random_state
    }

    /// User latent factors, `n_users x rank`.
    #[must_use]
    pub fn user_factors(&self) -> &Matrix<f32> {
        &self.user_factors
    }

    /// Item latent factors, `rank x n_movies`.
    #[must_use]
    pub fn item_factors(&self) -> &Matrix<f32> {
        &self.item_factors
    }

    /// The reconstructed rating surface, indexed like the input matrix.
    #[must_use]
    pub fn predicted(&self) -> &Matrix<f32> {
        &self.predicted
    }

    /// Predicted rating for one (user, movie) cell, `None` when either id
    /// is outside the fitted index space.
    #[must_use]
    pub fn predicted_rating(&self, user_id: UserId, movie_id: MovieId) -> Option<f32> {
        let row = self.matrix.user_position(user_id)?;
        let col = self.matrix.movie_position(movie_id)?;
        Some(self.predicted.get(row, col))
    }

    /// Ranks unrated movies for a user by predicted rating.
    ///
    /// An unknown user is a normal cold-start outcome and yields an empty
    /// list. Movies the user rated strictly positively are excluded;
    /// sentinel-0 cells count as unrated and stay eligible. Ties are
    /// broken by ascending movie id so rankings reproduce across runs.
    /// Results are joined with the catalog; movies absent from it are
    /// dropped.
    #[must_use]
    pub fn recommend(&self, user_id: UserId, n: usize) -> Vec<Recommendation> {
        let Some(row) = self.matrix.user_position(user_id) else {
            return Vec::new();
        };

        let predictions = self.predicted.row_slice(row);
        let stored = self.matrix.values().row_slice(row);

        let mut candidates: Vec<(MovieId, f32)> = self
            .matrix
            .movie_ids()
            .iter()
            .enumerate()
            .filter(|&(col, _)| stored[col] <= 0.0)
            .map(|(col, &movie_id)| (movie_id, predictions[col]))
            .collect();

        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        candidates.truncate(n);

        candidates
            .into_iter()
            .filter_map(|(movie_id, score)| {
                self.catalog.get(movie_id).map(|movie| Recommendation {
                    movie_id,
                    title: movie.title.clone(),
                    genres: movie.genres.clone(),
                    score,
                })
            })
            .collect()
    }
}

impl ScoringStrategy for LatentFactorModel {
    fn recommend(&self, query: &Query, n: usize) -> Result<Vec<Recommendation>> {
        match query {
            Query::User(user_id) => Ok(self.recommend(*user_id, n)),
            _ => Ok(Vec::new()),
        }
    }
}
