//! Similarity queries and name resolution.

mod engine;
mod resolver;

pub use engine::{
    DEFAULT_DESCRIBE_N, DEFAULT_MIN_COUNT, DEFAULT_TOP_N, Description, Neighbor, SimilarItems,
    SimilarityEngine, TermMatch,
};
pub use resolver::{
    DEFAULT_FUZZY_CANDIDATES, DEFAULT_FUZZY_CUTOFF, MatchStrategy, NameResolver, Resolution,
    ResolverConfig,
};
