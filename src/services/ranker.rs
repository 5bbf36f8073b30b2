use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::models::{CatalogEntry, ScoredEntry};

use super::taste::TasteVector;
use super::vector_space::FeatureMatrix;

/// Ratings are on a fixed 0-10 scale
pub const RATING_SCALE: f64 = 10.0;

/// Similarity forced onto liked entries so they sink to the bottom
pub const LIKED_SIMILARITY: f64 = -1.0;

/// Scores every catalog entry against the taste vector, in catalog order
///
/// `final_score = similarity * sim_weight + rating_norm * (1 - sim_weight)`.
pub fn score_all<'a>(
    catalog: &'a [CatalogEntry],
    matrix: &FeatureMatrix,
    taste: &TasteVector,
    liked: &BTreeSet<usize>,
    sim_weight: f64,
) -> Vec<ScoredEntry<'a>> {
    debug_assert_eq!(catalog.len(), matrix.len());
    let rating_weight = 1.0 - sim_weight;

    catalog
        .iter()
        .zip(matrix.rows())
        .enumerate()
        .map(|(index, (entry, row))| {
            let similarity = if liked.contains(&index) {
                LIKED_SIMILARITY
            } else {
                taste.cosine_similarity(row)
            };
            let rating_norm = entry.rating / RATING_SCALE;

            ScoredEntry {
                index,
                entry,
                similarity,
                rating_norm,
                final_score: similarity * sim_weight + rating_norm * rating_weight,
            }
        })
        .collect()
}

/// Orders by final score descending, then by catalog index ascending
pub fn by_final_score(a: &ScoredEntry<'_>, b: &ScoredEntry<'_>) -> Ordering {
    b.final_score
        .total_cmp(&a.final_score)
        .then_with(|| a.index.cmp(&b.index))
}

/// Returns the `top_k` best scored entries
///
/// Liked entries are not removed, only pushed down; if `top_k` exceeds the
/// number of other entries they can still appear at the tail.
pub fn rank<'a>(
    catalog: &'a [CatalogEntry],
    matrix: &FeatureMatrix,
    taste: &TasteVector,
    liked: &BTreeSet<usize>,
    sim_weight: f64,
    top_k: usize,
) -> Vec<ScoredEntry<'a>> {
    let mut scored = score_all(catalog, matrix, taste, liked, sim_weight);
    scored.sort_by(by_final_score);
    scored.truncate(top_k);
    scored
}
