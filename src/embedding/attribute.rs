//! Sentence embedding of one attribute: the mean of its word vectors.

use crate::error::{EmbedError, EmbedResult};
use crate::review::Attribute;
use crate::vector::{MeanAccumulator, VectorSpace};

/// Averages token vectors into a single attribute vector.
#[derive(Clone, Copy)]
pub struct AttributeEmbedder<'a> {
    space: &'a dyn VectorSpace,
}

impl<'a> AttributeEmbedder<'a> {
    pub fn new(space: &'a dyn VectorSpace) -> Self {
        Self { space }
    }

    /// Mean of the in-vocabulary token vectors.
    ///
    /// Out-of-vocabulary tokens are common and silently skipped. When no token
    /// is left the result is [`EmbedError::EmptyEmbedding`]; there is no
    /// zero-vector fallback.
    pub fn embed<S: AsRef<str>>(&self, attribute: Attribute, tokens: &[S]) -> EmbedResult<Vec<f32>> {
        let mut acc = MeanAccumulator::new(self.space.dimension());

        for token in tokens {
            if let Some(vector) = self.space.vector_of(token.as_ref()) {
                acc.add(vector)?;
            }
        }

        let skipped = tokens.len() - acc.count();
        if skipped > 0 {
            tracing::trace!("{attribute}: {skipped} of {} tokens out of vocabulary", tokens.len());
        }

        acc.finish()
            .ok_or(EmbedError::EmptyEmbedding { attribute })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::WordVectors;

    fn space() -> WordVectors {
        WordVectors::from_entries(
            2,
            [
                ("smoky", vec![1.0, 0.0]),
                ("sweet", vec![0.0, 1.0]),
                ("peaty", vec![1.0, 0.0]),
                ("oak", vec![0.25, 0.75]),
            ],
        )
        .unwrap()
    }

    fn assert_close(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_mean_of_in_vocabulary_tokens() {
        let space = space();
        let embedder = AttributeEmbedder::new(&space);

        let nose = embedder.embed(Attribute::Nose, &["smoky", "peaty"]).unwrap();
        assert_close(&nose, &[1.0, 0.0]);

        let finish = embedder
            .embed(Attribute::Finish, &["smoky", "sweet", "smoky", "sweet", "smoky", "sweet"])
            .unwrap();
        assert_close(&finish, &[0.5, 0.5]);
    }

    #[test]
    fn test_out_of_vocabulary_tokens_are_skipped() {
        let space = space();
        let embedder = AttributeEmbedder::new(&space);

        let with_oov = embedder
            .embed(Attribute::Palate, &["sherry", "sweet", "raisin", "oak"])
            .unwrap();
        let without = embedder.embed(Attribute::Palate, &["sweet", "oak"]).unwrap();
        assert_close(&with_oov, &without);
        assert_close(&with_oov, &[0.125, 0.875]);
    }

    #[test]
    fn test_permutation_invariance() {
        let space = space();
        let embedder = AttributeEmbedder::new(&space);

        let tokens = ["oak", "smoky", "sweet", "peaty", "oak"];
        let reference = embedder.embed(Attribute::Nose, &tokens).unwrap();

        let permutations: [[&str; 5]; 3] = [
            ["smoky", "oak", "oak", "sweet", "peaty"],
            ["peaty", "sweet", "smoky", "oak", "oak"],
            ["oak", "peaty", "oak", "smoky", "sweet"],
        ];
        for permuted in permutations {
            let vector = embedder.embed(Attribute::Nose, &permuted).unwrap();
            assert_close(&vector, &reference);
        }
    }

    #[test]
    fn test_all_out_of_vocabulary_is_an_error() {
        let space = space();
        let embedder = AttributeEmbedder::new(&space);

        let err = embedder
            .embed(Attribute::Finish, &["cinnamon", "clove"])
            .unwrap_err();
        assert!(matches!(
            err,
            EmbedError::EmptyEmbedding {
                attribute: Attribute::Finish
            }
        ));

        let empty: [&str; 0] = [];
        assert!(embedder.embed(Attribute::Nose, &empty).is_err());
    }
}
