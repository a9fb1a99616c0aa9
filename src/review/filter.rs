//! Admission policy for reviews that are complete enough to embed.

use crate::review::{Attribute, ReviewRecord};

/// Default minimum: an attribute needs strictly more than this many tokens.
pub const DEFAULT_MIN_TOKENS: usize = 5;

/// Selects the reviews usable for embedding.
///
/// A review is admitted only if every required attribute (nose, palate,
/// finish) is present with more than `min_tokens` tokens. One thin attribute
/// rejects the whole review, since a partial review cannot give a
/// trustworthy overall vector.
#[derive(Debug, Clone, Copy)]
pub struct RecordFilter {
    min_tokens: usize,
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TOKENS)
    }
}

impl RecordFilter {
    pub fn new(min_tokens: usize) -> Self {
        Self { min_tokens }
    }

    pub fn min_tokens(&self) -> usize {
        self.min_tokens
    }

    /// Whether `record` covers all required attributes with enough text.
    pub fn is_complete(&self, record: &ReviewRecord) -> bool {
        Attribute::REQUIRED.iter().all(|attribute| {
            attribute
                .key()
                .and_then(|key| record.tokens(&key))
                .is_some_and(|tokens| tokens.len() > self.min_tokens)
        })
    }

    /// Keeps the complete records, preserving input order.
    pub fn admit(&self, records: impl IntoIterator<Item = ReviewRecord>) -> Vec<ReviewRecord> {
        let mut seen = 0usize;
        let admitted: Vec<ReviewRecord> = records
            .into_iter()
            .inspect(|_| seen += 1)
            .filter(|record| self.is_complete(record))
            .collect();

        tracing::debug!(
            "admitted {} of {seen} reviews (min_tokens > {})",
            admitted.len(),
            self.min_tokens
        );
        admitted
    }
}
