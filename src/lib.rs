//! Recomendar: a movie recommendation engine in pure Rust.
//!
//! Four scoring models over an in-memory rating table and movie catalog,
//! plus a hybrid stage that blends the collaborative and content signals
//! into one ranking. The crate is a pure in-process computation library:
//! no I/O, no wire protocol, no UI.
//!
//! Every model is fit once into an immutable value; queries take `&self`
//! and run concurrently without coordination. Refitting builds a new
//! value over new [`std::sync::Arc`] table generations.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use recomendar::prelude::*;
//!
//! let matrix = Arc::new(InteractionMatrix::from_ratings(&[
//!     Rating::new(1, 10, 5.0),
//!     Rating::new(1, 20, 3.0),
//!     Rating::new(2, 10, 1.0),
//!     Rating::new(2, 30, 4.0),
//! ]));
//! let catalog = Arc::new(Catalog::from_movies(vec![
//!     Movie::new(10, "Heat", &["Action", "Crime"]),
//!     Movie::new(20, "Airplane!", &["Comedy"]),
//!     Movie::new(30, "Chinatown", &["Crime", "Drama"]),
//! ]));
//!
//! let model = LatentFactorModel::fit(Arc::clone(&matrix), Arc::clone(&catalog), 1)
//!     .expect("rank 1 fits a 2x3 matrix");
//!
//! // user 1 rated movies 10 and 20, so only 30 is left to recommend
//! let recs = model.recommend(1, 10);
//! assert_eq!(recs.len(), 1);
//! assert_eq!(recs[0].title, "Chinatown");
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`data`]: Rating, Movie, Catalog and InteractionMatrix tables
//! - [`latent`]: Latent factor collaborative filtering (truncated SVD)
//! - [`content`]: Genre-similarity content filtering
//! - [`neighbors`]: Item-based collaborative filtering (cosine k-NN)
//! - [`popularity`]: Count-ranked fallback
//! - [`hybrid`]: Collaborative/content score blending
//! - [`metrics`]: Ranking-quality metrics
//! - [`traits`]: The `ScoringStrategy` capability all models share
//! - [`error`]: Error types

pub mod content;
pub mod data;
pub mod error;
pub mod hybrid;
pub mod latent;
pub mod metrics;
pub mod neighbors;
pub mod popularity;
pub mod prelude;
pub mod primitives;
pub mod traits;

pub use error::{RecomendarError, Result};
pub use primitives::{Matrix, Vector};
pub use traits::{Query, ScoringStrategy};
