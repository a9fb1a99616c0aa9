//! Vector layer: the trained word vector space and the arithmetic on top of it.
//!
//! # Architecture
//! Word vectors come from an external word2vec run and are exposed through the
//! [`VectorSpace`] trait. Everything downstream (attribute means, per-item
//! tables, nearest-neighbour search) is built on the helpers in [`math`].

pub mod math;
mod space;
mod types;

// Re-export core types for public API
pub use math::{MeanAccumulator, cosine_against_rows, cosine_similarity, mean_of};
pub use space::{VectorSpace, WordVectors};
pub use types::{Score, VectorDimension, VectorError, validate_finite};
