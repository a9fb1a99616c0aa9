//! Aggregated word embeddings for whisky reviews.
//!
//! Reviews tokenized into nose, palate and finish are mapped through a trained
//! word vector space, averaged per review and then per item, and served as a
//! similarity table with fuzzy name lookup.

pub mod config;
pub mod display;
pub mod embedding;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod review;
pub mod search;
pub mod vector;

// Explicit exports for better API clarity
pub use config::Settings;
pub use embedding::{AttributeEmbedder, EmbeddingRow, EmbeddingTable, ItemEmbedder, OccurrenceIndex};
pub use error::{
    BuildError, BuildResult, EmbedError, EmbedResult, LoadError, LoadResult, QueryError,
    QueryResult,
};
pub use pipeline::{BuildReport, Pipeline, PipelineOptions};
pub use review::{Attribute, AttributeKey, CorpusMode, RecordFilter, ReviewRecord, training_corpus};
pub use search::{
    Description, MatchStrategy, NameResolver, Neighbor, Resolution, ResolverConfig, SimilarItems,
    SimilarityEngine, TermMatch,
};
pub use vector::{Score, VectorDimension, VectorError, VectorSpace, WordVectors};
