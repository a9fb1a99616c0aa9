//! From token lists to aggregated item vectors.
//!
//! `AttributeEmbedder` averages word vectors for one attribute,
//! `ItemEmbedder` produces the four rows of one review, and `EmbeddingTable`
//! averages rows across reviews of the same item.

mod attribute;
mod item;
mod table;

pub use attribute::AttributeEmbedder;
pub use item::{EmbeddingRow, ItemEmbedder};
pub use table::{EmbeddingTable, OccurrenceIndex};
