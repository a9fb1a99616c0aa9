//! Training corpus handed to the external word2vec trainer.

use serde::{Deserialize, Serialize};

use crate::review::ReviewRecord;
use crate::review::filter::DEFAULT_MIN_TOKENS;

/// How reviews are cut into training sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorpusMode {
    /// Every attribute with more than five tokens is its own sentence.
    #[default]
    PerAttribute,
    /// All attributes of a review are concatenated into one sentence.
    WholeReview,
}

/// Builds the sentence list for word vector training.
///
/// Works on the full record set, not only admitted records: vocabulary from
/// incomplete reviews still helps the vectors.
pub fn training_corpus<'a, I>(records: I, mode: CorpusMode) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = &'a ReviewRecord>,
{
    match mode {
        CorpusMode::PerAttribute => records
            .into_iter()
            .flat_map(|record| record.sections().map(|(_, tokens)| tokens))
            .filter(|tokens| tokens.len() > DEFAULT_MIN_TOKENS)
            .map(|tokens| tokens.to_vec())
            .collect(),
        CorpusMode::WholeReview => records
            .into_iter()
            .map(|record| {
                record
                    .sections()
                    .flat_map(|(_, tokens)| tokens.iter().cloned())
                    .collect()
            })
            .collect(),
    }
}
