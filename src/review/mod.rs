//! Review records as they arrive from the normalization step.
//!
//! Tokenization and stopword removal happen upstream; this module only
//! harmonizes section headings, decides which reviews are complete enough to
//! embed, and cuts the training corpus.

mod attribute;
pub mod corpus;
pub mod filter;
mod record;

pub use attribute::{Attribute, AttributeKey};
pub use corpus::{CorpusMode, training_corpus};
pub use filter::RecordFilter;
pub use record::ReviewRecord;
