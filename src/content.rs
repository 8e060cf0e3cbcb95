//! Content-based filtering over genre labels.
//!
//! Encodes each catalog entry as a binary vector over the genre
//! vocabulary and precomputes pairwise item-item cosine similarity.
//! Lookups are by title, the key the presentation layer holds; duplicate
//! titles collapse to their first catalog occurrence.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::debug;

use crate::data::{Catalog, Recommendation};
use crate::error::Result;
use crate::primitives::Matrix;
use crate::traits::{Query, ScoringStrategy};

/// Genre-similarity model.
///
/// The similarity matrix is square over catalog rows, symmetric, has unit
/// diagonal and values in [0, 1] (cosine of non-negative binary vectors).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use recomendar::content::ContentModel;
/// use recomendar::data::{Catalog, Movie};
///
/// let catalog = Arc::new(Catalog::from_movies(vec![
///     Movie::new(1, "Die Hard", &["Action", "Thriller"]),
///     Movie::new(2, "Speed", &["Action", "Thriller"]),
///     Movie::new(3, "Annie Hall", &["Comedy", "Romance"]),
/// ]));
///
/// let model = ContentModel::fit(catalog);
/// let recs = model.recommend("Die Hard", 1);
/// assert_eq!(recs[0].title, "Speed");
/// ```
#[derive(Debug)]
pub struct ContentModel {
    vocabulary: Vec<String>,
    features: Matrix<f32>,
    similarity: Matrix<f32>,
    title_index: HashMap<String, usize>,
    catalog: Arc<Catalog>,
}

impl ContentModel {
    /// Builds the feature and similarity matrices from the catalog.
    ///
    /// The vocabulary is the sorted, de-duplicated set of every genre
    /// label in the catalog. Entries with no labels (tolerated, though
    /// the source data never produces them) get a zero row and zero
    /// similarity to everything; their self-similarity is still pinned
    /// to 1 so the unit-diagonal invariant holds for all items.
    #[must_use]
    pub fn fit(catalog: Arc<Catalog>) -> Self {
        let vocabulary: Vec<String> = catalog
            .movies()
            .iter()
            .flat_map(|movie| movie.genres.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let label_column: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(col, label)| (label.as_str(), col))
            .collect();

        let n_items = catalog.len();
        let mut features = Matrix::zeros(n_items, vocabulary.len());
        for (row, movie) in catalog.movies().iter().enumerate() {
            for genre in &movie.genres {
                if let Some(&col) = label_column.get(genre.as_str()) {
                    features.set(row, col, 1.0);
                }
            }
        }

        debug!(
            n_items,
            vocabulary = vocabulary.len(),
            "fitting content similarity model"
        );

        let mut similarity = Matrix::zeros(n_items, n_items);
        let rows: Vec<_> = (0..n_items).map(|row| features.row(row)).collect();
        for i in 0..n_items {
            similarity.set(i, i, 1.0);
            for j in (i + 1)..n_items {
                let sim = rows[i].cosine_similarity(&rows[j]);
                similarity.set(i, j, sim);
                similarity.set(j, i, sim);
            }
        }

        let mut title_index = HashMap::with_capacity(n_items);
        for (row, movie) in catalog.movies().iter().enumerate() {
            // first occurrence wins for duplicate titles
            title_index.entry(movie.title.clone()).or_insert(row);
        }

        Self {
            vocabulary,
            features,
            similarity,
            title_index,
            catalog,
        }
    }

    /// The sorted genre vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// The binary item x genre feature matrix, rows in catalog order.
    #[must_use]
    pub fn features(&self) -> &Matrix<f32> {
        &self.features
    }

    /// The item x item cosine similarity matrix.
    #[must_use]
    pub fn similarity(&self) -> &Matrix<f32> {
        &self.similarity
    }

    /// Cosine similarity between two catalog rows.
    ///
    /// # Panics
    ///
    /// Panics if either row is out of bounds.
    #[must_use]
    pub fn similarity_between(&self, row_a: usize, row_b: usize) -> f32 {
        self.similarity.get(row_a, row_b)
    }

    /// Ranks catalog entries by genre similarity to a title.
    ///
    /// An unknown title yields an empty list (soft outcome). The queried
    /// row itself is excluded by identity: its self-similarity of 1
    /// would otherwise always top the ranking, and excluding by identity
    /// stays correct even when another entry shares the exact genre set
    /// and ties at 1.0. Ties are broken by ascending movie id.
    #[must_use]
    pub fn recommend(&self, title: &str, n: usize) -> Vec<Recommendation> {
        let Some(&query_row) = self.title_index.get(title) else {
            return Vec::new();
        };

        let scores = self.similarity.row_slice(query_row);
        let movies = self.catalog.movies();

        let mut ranked: Vec<(usize, f32)> = (0..movies.len())
            .filter(|&row| row != query_row)
            .map(|row| (row, scores[row]))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| movies[a.0].movie_id.cmp(&movies[b.0].movie_id))
        });
        ranked.truncate(n);

        ranked
            .into_iter()
            .map(|(row, score)| {
                let movie = &movies[row];
                Recommendation {
                    movie_id: movie.movie_id,
                    title: movie.title.clone(),
                    genres: movie.genres.clone(),
                    score,
                }
            })
            .collect()
    }
}

impl ScoringStrategy for ContentModel {
    fn recommend(&self, query: &Query, n: usize) -> Result<Vec<Recommendation>> {
        match query {
            Query::Title(title) => Ok(self.recommend(title, n)),
            _ => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Movie;

    fn scenario_b_catalog() -> Arc<Catalog> {
        Arc::new(Catalog::from_movies(vec![
            Movie::new(1, "X", &["Action", "Comedy"]),
            Movie::new(2, "Y", &["Action"]),
            Movie::new(3, "Z", &["Drama"]),
        ]))
    }

    #[test]
    fn test_vocabulary_is_sorted_and_unique() {
        let model = ContentModel::fit(scenario_b_catalog());
        assert_eq!(model.vocabulary(), &["Action", "Comedy", "Drama"]);
        assert_eq!(model.features().shape(), (3, 3));
    }

    #[test]
    fn test_similarity_diagonal_and_symmetry() {
        let model = ContentModel::fit(scenario_b_catalog());
        let n = model.similarity().n_rows();
        for i in 0..n {
            assert!((model.similarity_between(i, i) - 1.0).abs() < 1e-6);
            for j in 0..n {
                let forward = model.similarity_between(i, j);
                assert!((forward - model.similarity_between(j, i)).abs() < 1e-6);
                assert!((0.0..=1.0 + 1e-6).contains(&forward));
            }
        }
    }

    #[test]
    fn test_shared_genre_beats_disjoint() {
        let model = ContentModel::fit(scenario_b_catalog());
        let xy = model.similarity_between(0, 1);
        let xz = model.similarity_between(0, 2);
        assert!(xy > xz);
        assert!(xz.abs() < 1e-6);
    }

    #[test]
    fn test_recommend_never_returns_the_query() {
        let model = ContentModel::fit(scenario_b_catalog());
        let recs = model.recommend("X", 10);
        assert!(recs.iter().all(|r| r.title != "X"));
        assert_eq!(recs.len(), 2);
        // Y shares Action with X, Z shares nothing
        assert_eq!(recs[0].title, "Y");
    }

    #[test]
    fn test_identity_exclusion_survives_duplicate_genre_sets() {
        let catalog = Arc::new(Catalog::from_movies(vec![
            Movie::new(5, "Twin A", &["Action"]),
            Movie::new(6, "Twin B", &["Action"]),
        ]));
        let model = ContentModel::fit(catalog);

        // Twin B ties with Twin A's self-similarity at 1.0; positional
        // exclusion could drop the wrong row, identity exclusion cannot.
        let recs = model.recommend("Twin B", 5);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title, "Twin A");
        assert!((recs[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_title_is_soft_empty() {
        let model = ContentModel::fit(scenario_b_catalog());
        assert!(model.recommend("No Such Film", 5).is_empty());
    }

    #[test]
    fn test_duplicate_title_first_occurrence_wins() {
        let catalog = Arc::new(Catalog::from_movies(vec![
            Movie::new(1, "Remake", &["Action"]),
            Movie::new(2, "Remake", &["Drama"]),
            Movie::new(3, "Other", &["Action"]),
        ]));
        let model = ContentModel::fit(catalog);

        // lookups resolve to row 0 (Action), so "Other" matches perfectly
        let recs = model.recommend("Remake", 1);
        assert_eq!(recs[0].title, "Other");
        assert!((recs[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_genre_set_is_defended() {
        let catalog = Arc::new(Catalog::from_movies(vec![
            Movie::new(1, "Untagged", &[]),
            Movie::new(2, "Tagged", &["Action"]),
        ]));
        let model = ContentModel::fit(catalog);

        assert!((model.similarity_between(0, 0) - 1.0).abs() < 1e-6);
        assert!(model.similarity_between(0, 1).abs() < 1e-6);
        let recs = model.recommend("Untagged", 5);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].score.abs() < 1e-6);
    }

    #[test]
    fn test_recommend_caps_at_n() {
        let model = ContentModel::fit(scenario_b_catalog());
        assert_eq!(model.recommend("X", 1).len(), 1);
        assert!(model.recommend("X", 0).is_empty());
    }
}
