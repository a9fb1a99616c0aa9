//! Per-review embedding rows.

use serde::Serialize;

use crate::embedding::AttributeEmbedder;
use crate::error::{EmbedError, EmbedResult};
use crate::review::{Attribute, ReviewRecord};
use crate::vector::{VectorSpace, mean_of};

/// One `(item, attribute, vector)` row before cross-review aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingRow {
    pub name: String,
    pub attribute: Attribute,
    pub vector: Vec<f32>,
}

impl EmbeddingRow {
    pub fn new(name: impl Into<String>, attribute: Attribute, vector: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            attribute,
            vector,
        }
    }
}

/// Turns one admitted review into its four embedding rows.
#[derive(Clone, Copy)]
pub struct ItemEmbedder<'a> {
    space: &'a dyn VectorSpace,
    attributes: AttributeEmbedder<'a>,
}

impl<'a> ItemEmbedder<'a> {
    pub fn new(space: &'a dyn VectorSpace) -> Self {
        Self {
            space,
            attributes: AttributeEmbedder::new(space),
        }
    }

    /// Embeds nose, palate and finish, plus an overall row.
    ///
    /// The overall vector is the mean of this review's three attribute
    /// vectors. It is computed here, per review, before reviews of the same
    /// item are averaged together; it is not derived again from the
    /// aggregated attribute means.
    ///
    /// Rows come back in `nos`, `pal`, `fin`, `ful` order.
    pub fn embed(&self, record: &ReviewRecord) -> EmbedResult<[EmbeddingRow; 4]> {
        let name = record.name();

        let [nose, palate, finish] = Attribute::REQUIRED.map(|attribute| {
            let tokens = attribute
                .key()
                .and_then(|key| record.tokens(&key))
                .ok_or_else(|| EmbedError::MissingAttribute {
                    name: name.to_string(),
                    attribute,
                })?;
            self.attributes.embed(attribute, tokens)
        });
        let (nose, palate, finish) = (nose?, palate?, finish?);

        let overall = mean_of(
            self.space.dimension(),
            [nose.as_slice(), palate.as_slice(), finish.as_slice()],
        )?
        .ok_or(EmbedError::EmptyEmbedding {
            attribute: Attribute::Overall,
        })?;

        Ok([
            EmbeddingRow::new(name, Attribute::Nose, nose),
            EmbeddingRow::new(name, Attribute::Palate, palate),
            EmbeddingRow::new(name, Attribute::Finish, finish),
            EmbeddingRow::new(name, Attribute::Overall, overall),
        ])
    }
}
