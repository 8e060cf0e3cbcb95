//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use recomendar::prelude::*;
//! ```

pub use crate::content::ContentModel;
pub use crate::data::{
    Catalog, InteractionMatrix, Movie, MovieId, PopularMovie, Rating, Recommendation, UserId,
};
pub use crate::error::{RecomendarError, Result};
pub use crate::hybrid::HybridRecommender;
pub use crate::latent::LatentFactorModel;
pub use crate::neighbors::ItemNeighborModel;
pub use crate::popularity::PopularityModel;
pub use crate::primitives::{Matrix, Vector};
pub use crate::traits::{Query, ScoringStrategy};
