//! Word vector space produced by an external word2vec training run.
//!
//! The core never trains vectors itself. It consumes anything that satisfies
//! [`VectorSpace`]: lookup by token, plus the whole vocabulary as a matrix for
//! nearest-term queries. [`WordVectors`] is the in-memory implementation used
//! by the pipeline and the loaders.

use std::collections::HashMap;

use crate::vector::types::{VectorDimension, VectorError, validate_finite};

/// Read-only vocabulary → vector mapping.
///
/// Implementations must be immutable after construction so they can be
/// shared across query threads without locking.
pub trait VectorSpace: Send + Sync {
    /// Vector for `token`, or `None` when the token is out of vocabulary.
    fn vector_of(&self, token: &str) -> Option<&[f32]>;

    /// All known tokens in a fixed iteration order.
    fn all_tokens(&self) -> &[String];

    /// Row-major matrix of all vectors, aligned with [`all_tokens`](Self::all_tokens).
    fn all_vectors(&self) -> &[f32];

    /// Dimension shared by every vector in the space.
    fn dimension(&self) -> VectorDimension;

    /// Number of tokens in the vocabulary.
    fn len(&self) -> usize {
        self.all_tokens().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory word vectors stored as one contiguous matrix.
pub struct WordVectors {
    tokens: Vec<String>,
    index: HashMap<String, usize>,
    matrix: Vec<f32>,
    dimension: VectorDimension,
}

impl std::fmt::Debug for WordVectors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordVectors")
            .field("vocabulary", &self.tokens.len())
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl WordVectors {
    /// Builds a vector space from `(token, vector)` pairs.
    ///
    /// Vocabulary order follows the input order. A repeated token keeps its
    /// first vector; later duplicates are skipped with a warning.
    ///
    /// # Errors
    /// - [`VectorError::InvalidDimension`] if `dimension` is zero
    /// - [`VectorError::DimensionMismatch`] if any vector has another length
    /// - [`VectorError::NonFinite`] if any component is NaN or infinite
    pub fn from_entries<I, S>(dimension: usize, entries: I) -> Result<Self, VectorError>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let dimension = VectorDimension::new(dimension)?;
        let mut tokens = Vec::new();
        let mut index = HashMap::new();
        let mut matrix = Vec::new();

        for (token, vector) in entries {
            let token = token.into();
            dimension.validate_vector(&vector)?;
            validate_finite(&vector)?;
            if index.contains_key(&token) {
                tracing::warn!("duplicate token '{token}' in vector space, keeping first vector");
                continue;
            }
            index.insert(token.clone(), tokens.len());
            tokens.push(token);
            matrix.extend_from_slice(&vector);
        }

        tracing::debug!(
            "built vector space with {} tokens ({dimension})",
            tokens.len()
        );

        Ok(Self {
            tokens,
            index,
            matrix,
            dimension,
        })
    }

    /// Builds a vector space, inferring the dimension from the first entry.
    ///
    /// # Errors
    /// [`VectorError::EmptyVocabulary`] when `entries` is empty, otherwise as
    /// [`from_entries`](Self::from_entries).
    pub fn from_vec(entries: Vec<(String, Vec<f32>)>) -> Result<Self, VectorError> {
        let dimension = entries
            .first()
            .map(|(_, v)| v.len())
            .ok_or(VectorError::EmptyVocabulary)?;
        Self::from_entries(dimension, entries)
    }

    /// Whether `token` is in the vocabulary.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Row of `token` in the vocabulary matrix.
    #[must_use]
    pub fn position(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }
}

impl VectorSpace for WordVectors {
    fn vector_of(&self, token: &str) -> Option<&[f32]> {
        let row = *self.index.get(token)?;
        let dim = self.dimension.get();
        Some(&self.matrix[row * dim..(row + 1) * dim])
    }

    fn all_tokens(&self) -> &[String] {
        &self.tokens
    }

    fn all_vectors(&self) -> &[f32] {
        &self.matrix
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }
}
