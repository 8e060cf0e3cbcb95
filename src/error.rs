//! Error types for recomendar operations.
//!
//! Query-style operations distinguish two failure classes: unknown
//! users/titles are a normal cold-start outcome and yield an empty result,
//! while querying the neighbor index for an item that never entered the
//! fitted matrix is a caller bug and surfaces as [`RecomendarError::UnknownItem`].

use std::fmt;

use crate::data::MovieId;

/// Main error type for recomendar operations.
///
/// # Examples
///
/// ```
/// use recomendar::error::RecomendarError;
///
/// let err = RecomendarError::InvalidRank { requested: 10, limit: 4 };
/// assert!(err.to_string().contains("rank"));
/// ```
#[derive(Debug)]
pub enum RecomendarError {
    /// Requested latent rank exceeds what the interaction matrix supports.
    InvalidRank {
        /// Rank passed to fit
        requested: usize,
        /// Largest valid rank, `min(n_users, n_items) - 1`
        limit: usize,
    },

    /// Movie id absent from the fitted interaction matrix columns.
    ///
    /// Items usually go missing because they did not survive upstream
    /// activity filtering, so this names the offending id instead of
    /// returning an empty ranking.
    UnknownItem {
        /// The id the caller queried
        movie_id: MovieId,
    },

    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for RecomendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecomendarError::InvalidRank { requested, limit } => {
                write!(
                    f,
                    "Invalid latent rank: requested {requested}, matrix supports at most {limit}"
                )
            }
            RecomendarError::UnknownItem { movie_id } => {
                write!(
                    f,
                    "Movie id {movie_id} is not in the fitted interaction matrix; it may not have enough ratings"
                )
            }
            RecomendarError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {expected}, got {actual}")
            }
            RecomendarError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for RecomendarError {}

impl From<&str> for RecomendarError {
    fn from(msg: &str) -> Self {
        RecomendarError::Other(msg.to_string())
    }
}

impl From<String> for RecomendarError {
    fn from(msg: String) -> Self {
        RecomendarError::Other(msg)
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, RecomendarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_rank_display() {
        let err = RecomendarError::InvalidRank {
            requested: 50,
            limit: 9,
        };
        let msg = err.to_string();
        assert!(msg.contains("50"));
        assert!(msg.contains("9"));
        assert!(msg.contains("rank"));
    }

    #[test]
    fn test_unknown_item_names_the_id() {
        let err = RecomendarError::UnknownItem { movie_id: 4242 };
        assert!(err.to_string().contains("4242"));
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = RecomendarError::DimensionMismatch {
            expected: "3x4".to_string(),
            actual: "3x2".to_string(),
        };
        assert!(err.to_string().contains("3x4"));
        assert!(err.to_string().contains("3x2"));
    }

    #[test]
    fn test_from_str() {
        let err: RecomendarError = "boom".into();
        assert!(matches!(err, RecomendarError::Other(_)));
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_from_string() {
        let err: RecomendarError = String::from("boom").into();
        assert!(matches!(err, RecomendarError::Other(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RecomendarError>();
    }
}
