//! Type-safe wrappers and core types for the vector layer.
//!
//! Newtypes keep dimensions and similarity scores from leaking around as
//! bare `usize`/`f32` values and carry their own validation.

use serde::Serialize;
use thiserror::Error;

/// Type-safe wrapper for cosine similarity scores.
///
/// Cosine similarity lives in the range [-1.0, 1.0] where:
/// - 1.0 indicates identical direction
/// - 0.0 indicates orthogonal vectors (or a zero vector on either side)
/// - -1.0 indicates opposite direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Score(f32);

impl Score {
    /// Tolerance for rounding error when a similarity lands just outside [-1, 1].
    const SLACK: f32 = 1e-5;

    /// Creates a new `Score` with validation.
    ///
    /// Values marginally outside [-1.0, 1.0] due to floating-point rounding
    /// are clamped; anything further out, or NaN, is an error.
    pub fn new(value: f32) -> Result<Self, VectorError> {
        if value.is_nan() {
            return Err(VectorError::InvalidScore {
                value,
                reason: "Score cannot be NaN",
            });
        }
        if !(-1.0 - Self::SLACK..=1.0 + Self::SLACK).contains(&value) {
            return Err(VectorError::InvalidScore {
                value,
                reason: "Score must be in range [-1.0, 1.0]",
            });
        }
        Ok(Self(value.clamp(-1.0, 1.0)))
    }

    /// Creates a score, clamping out-of-range values into [-1.0, 1.0].
    ///
    /// NaN is passed through `clamp` unchanged, so callers must rule it out.
    #[must_use]
    pub fn clamped(value: f32) -> Self {
        Self(value.clamp(-1.0, 1.0))
    }

    /// Creates a score of 0.0 (orthogonal).
    #[must_use]
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a score of 1.0 (identical direction).
    #[must_use]
    pub const fn one() -> Self {
        Self(1.0)
    }

    /// Returns the underlying f32 value.
    #[must_use]
    pub fn get(&self) -> f32 {
        self.0
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// Type-safe wrapper for vector dimensions.
///
/// Every vector in a [`VectorSpace`](crate::vector::VectorSpace) and every
/// embedding derived from it shares one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VectorDimension(usize);

impl VectorDimension {
    /// Creates a new `VectorDimension` with validation.
    ///
    /// Returns an error if the dimension is zero.
    pub fn new(dim: usize) -> Result<Self, VectorError> {
        if dim == 0 {
            return Err(VectorError::InvalidDimension {
                dimension: 0,
                reason: "Vector dimension cannot be zero",
            });
        }
        Ok(Self(dim))
    }

    /// Returns the underlying dimension value.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }

    /// Validates that a vector has the expected dimension.
    pub fn validate_vector(&self, vector: &[f32]) -> Result<(), VectorError> {
        if vector.len() != self.0 {
            return Err(VectorError::DimensionMismatch {
                expected: self.0,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

/// Rejects NaN and infinite components.
pub fn validate_finite(vector: &[f32]) -> Result<(), VectorError> {
    match vector.iter().position(|v| !v.is_finite()) {
        Some(position) => Err(VectorError::NonFinite {
            position,
            value: vector[position],
        }),
        None => Ok(()),
    }
}

impl std::fmt::Display for VectorDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d", self.0)
    }
}

/// Errors that can occur during vector operations.
///
/// All error messages include actionable suggestions for resolution.
#[derive(Error, Debug)]
pub enum VectorError {
    #[error(
        "Vector dimension mismatch: expected {expected}, got {actual}\nSuggestion: Ensure all vectors come from the same trained word2vec model"
    )]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid vector dimension: {dimension}\nReason: {reason}")]
    InvalidDimension {
        dimension: usize,
        reason: &'static str,
    },

    #[error("Invalid score value: {value}\nReason: {reason}")]
    InvalidScore { value: f32, reason: &'static str },

    #[error(
        "Non-finite value {value} at position {position}\nSuggestion: Retrain or re-export the word vectors; NaN and infinity cannot be averaged"
    )]
    NonFinite { position: usize, value: f32 },

    #[error(
        "Vector space is empty\nSuggestion: Train the word vectors with a lower min_count or on a larger corpus"
    )]
    EmptyVocabulary,
}

impl VectorError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            Self::InvalidDimension { .. } => "INVALID_DIMENSION",
            Self::InvalidScore { .. } => "INVALID_SCORE",
            Self::NonFinite { .. } => "NON_FINITE_VALUE",
            Self::EmptyVocabulary => "EMPTY_VOCABULARY",
        }
    }
}
