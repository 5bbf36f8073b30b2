use std::collections::BTreeSet;

use crate::error::{AppError, AppResult};

use super::vector_space::{FeatureMatrix, SparseVector};

/// Dense mean of the liked rows of a feature matrix
#[derive(Debug, Clone, PartialEq)]
pub struct TasteVector {
    data: Vec<f64>,
    norm: f64,
}

impl TasteVector {
    fn new(data: Vec<f64>) -> Self {
        let norm = data.iter().map(|x| x * x).sum::<f64>().sqrt();
        Self { data, norm }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn dim(&self) -> usize {
        self.data.len()
    }

    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// Cosine similarity against a matrix row; zero when either side is the zero vector
    pub fn cosine_similarity(&self, row: &SparseVector) -> f64 {
        let row_norm = row.norm();
        if self.norm == 0.0 || row_norm == 0.0 {
            return 0.0;
        }

        row.dot_dense(&self.data) / (self.norm * row_norm)
    }
}

/// Averages the rows at `liked` with equal weight
///
/// An empty selection or an index outside the matrix is a caller error.
pub fn aggregate(matrix: &FeatureMatrix, liked: &BTreeSet<usize>) -> AppResult<TasteVector> {
    if liked.is_empty() {
        return Err(AppError::InvalidInput(
            "At least one liked entry is required to build a taste vector".to_string(),
        ));
    }

    let mut sum = vec![0.0; matrix.dim()];
    for &index in liked {
        let row = matrix.row(index).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Liked index {} is outside the catalog of {} entries",
                index,
                matrix.len()
            ))
        })?;
        for (dim, weight) in row.iter() {
            sum[dim] += weight;
        }
    }

    let count = liked.len() as f64;
    for x in &mut sum {
        *x /= count;
    }

    Ok(TasteVector::new(sum))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::vector_space::VectorSpaceModel;

    const EPS: f64 = 1e-9;

    fn fixture() -> (VectorSpaceModel, FeatureMatrix) {
        VectorSpaceModel::fit(&[
            "Action Action 1990s",
            "Drama Drama 1990s",
            "Comedy Comedy 2000s",
        ])
        .unwrap()
    }

    #[test]
    fn test_single_liked_entry_is_its_row() {
        let (_, matrix) = fixture();
        let taste = aggregate(&matrix, &BTreeSet::from([1])).unwrap();

        assert_eq!(taste.dim(), matrix.dim());
        let row = matrix.row(1).unwrap();
        for (dim, weight) in row.iter() {
            assert!((taste.as_slice()[dim] - weight).abs() < EPS);
        }
        assert!((taste.cosine_similarity(row) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_mean_of_liked_rows() {
        let (model, matrix) = fixture();
        let taste = aggregate(&matrix, &BTreeSet::from([0, 2])).unwrap();

        let action = model.dimension_of("action").unwrap();
        let comedy = model.dimension_of("comedy").unwrap();
        let drama = model.dimension_of("drama").unwrap();
        assert!((taste.as_slice()[action] - matrix.row(0).unwrap().get(action) / 2.0).abs() < EPS);
        assert!((taste.as_slice()[comedy] - matrix.row(2).unwrap().get(comedy) / 2.0).abs() < EPS);
        assert_eq!(taste.as_slice()[drama], 0.0);
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let (_, matrix) = fixture();
        assert!(matches!(
            aggregate(&matrix, &BTreeSet::new()),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let (_, matrix) = fixture();
        assert!(aggregate(&matrix, &BTreeSet::from([0, 3])).is_err());
    }

    #[test]
    fn test_cosine_with_zero_row() {
        let (_, matrix) = fixture();
        let taste = aggregate(&matrix, &BTreeSet::from([0])).unwrap();
        assert_eq!(taste.cosine_similarity(&SparseVector::default()), 0.0);
    }
}
