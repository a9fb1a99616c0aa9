//! Vector arithmetic shared by the embedders, the table and the search engine.
//!
//! # Algorithm Details
//! - Similarity metric: cosine similarity, zero vectors score 0.0
//! - Means: accumulated in `f64` and narrowed once, so the result does not
//!   depend on the order vectors were added in (up to `f32` rounding)

use crate::vector::types::{VectorDimension, VectorError};

/// Computes cosine similarity between two vectors.
///
/// # Arguments
/// * `a` - First vector
/// * `b` - Second vector
///
/// # Returns
/// * Cosine similarity in range [-1, 1], where 1 is most similar
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vectors must have same dimension");

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

/// Cosine similarity of `query` against every row of a row-major matrix.
///
/// The query norm is computed once. Result index `i` corresponds to row `i`.
pub fn cosine_against_rows(query: &[f32], matrix: &[f32], dimension: VectorDimension) -> Vec<f32> {
    let dim = dimension.get();
    debug_assert_eq!(query.len(), dim, "Query must match matrix dimension");
    debug_assert_eq!(matrix.len() % dim, 0, "Matrix length must be a multiple of dim");

    let query_norm: f32 = query.iter().map(|x| x * x).sum::<f32>().sqrt();

    matrix
        .chunks_exact(dim)
        .map(|row| {
            let row_norm: f32 = row.iter().map(|x| x * x).sum::<f32>().sqrt();
            if query_norm == 0.0 || row_norm == 0.0 {
                0.0
            } else {
                let dot: f32 = query.iter().zip(row).map(|(x, y)| x * y).sum();
                dot / (query_norm * row_norm)
            }
        })
        .collect()
}

/// Running coordinate-wise mean.
///
/// Sums are kept in `f64`; `finish` returns `None` when nothing was added,
/// which callers must treat as "no embedding" rather than a zero vector.
#[derive(Debug, Clone)]
pub struct MeanAccumulator {
    sums: Vec<f64>,
    count: usize,
}

impl MeanAccumulator {
    pub fn new(dimension: VectorDimension) -> Self {
        Self {
            sums: vec![0.0; dimension.get()],
            count: 0,
        }
    }

    /// Adds one vector to the running mean.
    pub fn add(&mut self, vector: &[f32]) -> Result<(), VectorError> {
        if vector.len() != self.sums.len() {
            return Err(VectorError::DimensionMismatch {
                expected: self.sums.len(),
                actual: vector.len(),
            });
        }
        for (sum, &value) in self.sums.iter_mut().zip(vector) {
            *sum += f64::from(value);
        }
        self.count += 1;
        Ok(())
    }

    /// Number of vectors added so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the mean, or `None` if no vector was added.
    #[must_use]
    pub fn finish(self) -> Option<Vec<f32>> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(self.sums.into_iter().map(|s| (s / n) as f32).collect())
    }
}

/// Coordinate-wise mean of a set of equally sized vectors.
///
/// Returns `Ok(None)` for an empty input.
pub fn mean_of<'a, I>(dimension: VectorDimension, vectors: I) -> Result<Option<Vec<f32>>, VectorError>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut acc = MeanAccumulator::new(dimension);
    for vector in vectors {
        acc.add(vector)?;
    }
    Ok(acc.finish())
}
