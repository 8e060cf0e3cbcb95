//! Ranking-quality metrics for evaluating recommendation lists.
//!
//! These operate on the ordered movie-id lists the models return, so an
//! offline evaluation can hold out ratings and score how well each model
//! recovers them.

use crate::data::MovieId;

/// Whether a held-out movie appears in the top-k of a ranking.
///
/// # Examples
///
/// ```
/// use recomendar::metrics::hit_at_k;
///
/// let ranked = [30, 10, 20];
/// assert_eq!(hit_at_k(&ranked, 10, 1), 0.0);
/// assert_eq!(hit_at_k(&ranked, 10, 2), 1.0);
/// ```
#[must_use]
pub fn hit_at_k(ranked: &[MovieId], held_out: MovieId, k: usize) -> f32 {
    if ranked.iter().take(k).any(|&movie_id| movie_id == held_out) {
        1.0
    } else {
        0.0
    }
}

/// Reciprocal of the held-out movie's rank, 0.0 when absent.
///
/// # Examples
///
/// ```
/// use recomendar::metrics::reciprocal_rank;
///
/// let ranked = [30, 10, 20];
/// assert!((reciprocal_rank(&ranked, 30) - 1.0).abs() < 1e-6);
/// assert!((reciprocal_rank(&ranked, 20) - 1.0 / 3.0).abs() < 1e-6);
/// assert_eq!(reciprocal_rank(&ranked, 99), 0.0);
/// ```
#[must_use]
pub fn reciprocal_rank(ranked: &[MovieId], held_out: MovieId) -> f32 {
    ranked
        .iter()
        .position(|&movie_id| movie_id == held_out)
        .map_or(0.0, |rank| 1.0 / (rank + 1) as f32)
}

/// Fraction of the top-k that is relevant.
///
/// Returns 0.0 for `k == 0`.
///
/// # Examples
///
/// ```
/// use recomendar::metrics::precision_at_k;
///
/// let ranked = [30, 10, 20, 40];
/// let relevant = [10, 40];
/// assert!((precision_at_k(&ranked, &relevant, 2) - 0.5).abs() < 1e-6);
/// assert!((precision_at_k(&ranked, &relevant, 4) - 0.5).abs() < 1e-6);
/// ```
#[must_use]
pub fn precision_at_k(ranked: &[MovieId], relevant: &[MovieId], k: usize) -> f32 {
    if k == 0 {
        return 0.0;
    }
    let hits = ranked
        .iter()
        .take(k)
        .filter(|movie_id| relevant.contains(movie_id))
        .count();
    hits as f32 / k.min(ranked.len()).max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_at_k_boundaries() {
        let ranked = [5, 3, 1];
        assert_eq!(hit_at_k(&ranked, 1, 3), 1.0);
        assert_eq!(hit_at_k(&ranked, 1, 2), 0.0);
        assert_eq!(hit_at_k(&[], 1, 3), 0.0);
        assert_eq!(hit_at_k(&ranked, 5, 0), 0.0);
    }

    #[test]
    fn test_reciprocal_rank_positions() {
        let ranked = [5, 3, 1];
        assert!((reciprocal_rank(&ranked, 3) - 0.5).abs() < 1e-6);
        assert_eq!(reciprocal_rank(&[], 3), 0.0);
    }

    #[test]
    fn test_precision_at_k_empty_cases() {
        assert_eq!(precision_at_k(&[], &[1], 5), 0.0);
        assert_eq!(precision_at_k(&[1], &[1], 0), 0.0);
        assert_eq!(precision_at_k(&[1], &[], 1), 0.0);
    }

    #[test]
    fn test_precision_at_k_short_ranking() {
        // a 2-long ranking judged at k=5 divides by what was returned
        let ranked = [1, 2];
        let relevant = [1, 2];
        assert!((precision_at_k(&ranked, &relevant, 5) - 1.0).abs() < 1e-6);
    }
}
