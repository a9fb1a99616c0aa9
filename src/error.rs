//! Error types for the whisky embedding pipeline
//!
//! This module provides structured error types using thiserror for better
//! error handling and actionable error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::review::Attribute;
use crate::vector::VectorError;

/// Errors raised while turning one review into embedding rows.
///
/// During a build these never abort the run: the offending review is
/// excluded and the build continues.
#[derive(Error, Debug)]
pub enum EmbedError {
    /// Every token of an attribute was out of vocabulary (or the list was empty)
    #[error("No in-vocabulary tokens for attribute '{attribute}'")]
    EmptyEmbedding { attribute: Attribute },

    /// A required attribute is absent from the record
    #[error("Review of '{name}' has no '{attribute}' section")]
    MissingAttribute { name: String, attribute: Attribute },

    #[error(transparent)]
    Vector(#[from] VectorError),
}

impl EmbedError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::EmptyEmbedding { .. } => "EMPTY_EMBEDDING",
            Self::MissingAttribute { .. } => "MISSING_ATTRIBUTE",
            Self::Vector(e) => e.status_code(),
        }
    }
}

/// Errors that abort a pipeline build.
///
/// Individual bad reviews never end up here; they are excluded and counted.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Failed to start {threads} embedding workers: {reason}")]
    WorkerPool { threads: usize, reason: String },

    #[error("Failed to aggregate embedding rows: {0}")]
    Aggregation(#[from] VectorError),
}

impl BuildError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::WorkerPool { .. } => "WORKER_POOL_ERROR",
            Self::Aggregation(e) => e.status_code(),
        }
    }
}

/// Errors returned by similarity and description queries.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Name resolution exhausted exact, substring and fuzzy matching
    #[error("Could not find a suitable match for '{query}'")]
    Unresolved { query: String },

    /// Vocabulary lookup for a term that was never trained
    #[error("Term '{term}' is not in the vocabulary")]
    UnknownTerm { term: String },

    /// A resolved item has no row for an attribute. Admission and table
    /// building disagree, which is a build bug rather than a user error.
    #[error("Embedding table has no '{attribute}' row for '{name}'")]
    MissingEmbedding { name: String, attribute: Attribute },
}

impl QueryError {
    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in JSON responses
    /// for programmatic error handling.
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::Unresolved { .. } => "UNRESOLVED",
            Self::UnknownTerm { .. } => "UNKNOWN_TERM",
            Self::MissingEmbedding { .. } => "MISSING_EMBEDDING",
        }
    }

    /// Whether this error signals broken internal state rather than a miss.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::MissingEmbedding { .. })
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Unresolved { .. } => vec![
                "Check the spelling, or try a shorter part of the name",
                "Items with only incomplete reviews are not in the table",
            ],
            Self::UnknownTerm { .. } => vec![
                "Terms must be given in their tokenized form (lower case, stemmed)",
                "Rare words are dropped when the vectors are trained with a high min_count",
            ],
            Self::MissingEmbedding { .. } => vec![
                "This is a bug in the table build, please report it with the input data",
            ],
        }
    }
}

/// Errors from the file loaders at the edge of the pipeline.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed line {line} in '{path}': {reason}")]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Invalid vectors in '{path}': {source}")]
    Vectors { path: PathBuf, source: VectorError },
}

impl LoadError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::Malformed { .. } => "PARSE_ERROR",
            Self::Vectors { source, .. } => source.status_code(),
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::FileRead { .. } => vec![
                "Check that the file exists and you have read permissions",
                "Paths in settings.toml are relative to the working directory",
            ],
            Self::Malformed { .. } => vec![
                "Reviews are JSON Lines: one {\"name\", \"url\", \"attributes\"} object per line",
                "Vectors use the word2vec text format: token followed by its values",
            ],
            Self::Vectors { .. } => vec![
                "Export the vectors again from a single trained model",
            ],
        }
    }
}

/// Result type alias for embedding operations
pub type EmbedResult<T> = Result<T, EmbedError>;

/// Result type alias for pipeline builds
pub type BuildResult<T> = Result<T, BuildError>;

/// Result type alias for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type alias for loader operations
pub type LoadResult<T> = Result<T, LoadError>;
