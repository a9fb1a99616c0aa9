//! Input/Output handling for the CLI.
//!
//! This module provides:
//! - Loaders for word vectors and tokenized reviews
//! - Unified output formatting (text, JSON)
//! - Consistent error handling and exit codes

pub mod exit_code;
pub mod format;
pub mod load;

pub use exit_code::ExitCode;
pub use format::{ErrorDetails, JsonResponse, OutputFormat, ResponseMeta};
pub use load::{load_reviews, load_word_vectors};
