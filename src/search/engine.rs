//! Nearest-neighbour queries over the aggregated embedding table.
//!
//! All queries are read-only and take `&self`; one engine can serve any
//! number of threads once the table is built.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::embedding::{EmbeddingTable, OccurrenceIndex};
use crate::error::{QueryError, QueryResult};
use crate::review::Attribute;
use crate::search::resolver::{NameResolver, Resolution, ResolverConfig};
use crate::vector::{Score, VectorSpace, cosine_against_rows, cosine_similarity};

/// Default number of ranks considered by `most_similar` (the first is dropped).
pub const DEFAULT_TOP_N: usize = 15;

/// Default minimum number of reviews for an item to be recommended.
pub const DEFAULT_MIN_COUNT: usize = 3;

/// Default number of ranks considered by `describe` (the first is dropped).
pub const DEFAULT_DESCRIBE_N: usize = 10;

/// One similar item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub name: String,
    pub score: Score,
    /// Number of admitted reviews behind this item's vector.
    pub reviews: usize,
}

/// Result of a `most_similar` query.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarItems {
    pub resolution: Resolution,
    pub attribute: Attribute,
    pub neighbors: Vec<Neighbor>,
}

/// Vocabulary terms closest to an item's nose, palate and finish.
#[derive(Debug, Clone, Serialize)]
pub struct Description {
    pub resolution: Resolution,
    pub terms: BTreeMap<Attribute, Vec<String>>,
}

/// A vocabulary term with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermMatch {
    pub term: String,
    pub score: Score,
}

/// Query front-end over one built table, its review counts and the
/// vector space the table was built from.
#[derive(Clone, Copy)]
pub struct SimilarityEngine<'a> {
    table: &'a EmbeddingTable,
    occurrences: &'a OccurrenceIndex,
    space: &'a dyn VectorSpace,
    resolver: NameResolver<'a>,
}

impl<'a> SimilarityEngine<'a> {
    pub fn new(
        table: &'a EmbeddingTable,
        occurrences: &'a OccurrenceIndex,
        space: &'a dyn VectorSpace,
        resolver_config: ResolverConfig,
    ) -> Self {
        Self {
            table,
            occurrences,
            space,
            resolver: NameResolver::new(occurrences, resolver_config),
        }
    }

    /// Resolves a user-typed name.
    pub fn resolve(&self, name: &str) -> QueryResult<Resolution> {
        self.resolver.resolve(name).ok_or_else(|| QueryError::Unresolved {
            query: name.to_string(),
        })
    }

    /// Items whose `attribute` vector is closest to the named item's.
    ///
    /// Candidates need at least `min_count` reviews. After sorting by cosine
    /// similarity the first rank is dropped (it is the item itself whenever
    /// the item passes the count filter) and the next `n - 1` ranks are
    /// returned.
    pub fn most_similar(
        &self,
        name: &str,
        attribute: Attribute,
        n: usize,
        min_count: usize,
    ) -> QueryResult<SimilarItems> {
        let resolution = self.resolve(name)?;
        let target = self.vector(&resolution.name, attribute)?;

        // The target scores exactly 1.0 against itself; a parallel vector may
        // round to 1.0 as well but never above it once clamped.
        let target_name = resolution.name.as_str();
        let mut ranked: Vec<(&str, Score)> = self
            .table
            .cross_section(attribute)
            .filter(|(candidate, _)| self.occurrences.count(candidate) >= min_count)
            .map(|(candidate, vector)| {
                let score = if candidate == target_name {
                    Score::one()
                } else {
                    to_score(cosine_similarity(target, vector))
                };
                (candidate, score)
            })
            .collect();

        // Descending by score, the target first among equals.
        ranked.sort_by(|(a_name, a), (b_name, b)| {
            b.cmp(a)
                .then_with(|| (*b_name == target_name).cmp(&(*a_name == target_name)))
        });

        let neighbors = ranked
            .into_iter()
            .skip(1)
            .take(n.saturating_sub(1))
            .map(|(candidate, score)| Neighbor {
                name: candidate.to_string(),
                score,
                reviews: self.occurrences.count(candidate),
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            "most_similar('{}', {attribute}): {} neighbours",
            resolution.name,
            neighbors.len()
        );

        Ok(SimilarItems {
            resolution,
            attribute,
            neighbors,
        })
    }

    /// Describes an item by the vocabulary terms nearest to each of its
    /// nose, palate and finish vectors.
    ///
    /// The top match is dropped (it is usually the dominant token of the
    /// reviews) and the next `n - 1` terms are returned per attribute.
    pub fn describe(&self, name: &str, n: usize) -> QueryResult<Description> {
        let resolution = self.resolve(name)?;

        let mut terms = BTreeMap::new();
        for attribute in Attribute::REQUIRED {
            let vector = self.vector(&resolution.name, attribute)?;
            let nearest = self
                .nearest_terms(vector, n, None)
                .into_iter()
                .map(|m| m.term)
                .collect();
            terms.insert(attribute, nearest);
        }

        Ok(Description { resolution, terms })
    }

    /// Vocabulary terms closest to `term`'s own vector, excluding the top rank.
    pub fn similar_terms(&self, term: &str, n: usize) -> QueryResult<Vec<TermMatch>> {
        let vector = self
            .space
            .vector_of(term)
            .ok_or_else(|| QueryError::UnknownTerm {
                term: term.to_string(),
            })?;
        let own_row = self.space.all_tokens().iter().position(|t| t == term);
        Ok(self.nearest_terms(vector, n, own_row))
    }

    /// Ranks the whole vocabulary against `vector`, drops rank 1 and keeps
    /// the next `n - 1`. `pinned` is the query's own row, scored 1.0 so it
    /// always takes rank 1. Other ties keep vocabulary order.
    fn nearest_terms(&self, vector: &[f32], n: usize, pinned: Option<usize>) -> Vec<TermMatch> {
        let mut scores: Vec<Score> =
            cosine_against_rows(vector, self.space.all_vectors(), self.space.dimension())
                .into_iter()
                .map(to_score)
                .collect();
        if let Some(row) = pinned {
            scores[row] = Score::one();
        }

        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .cmp(&scores[a])
                .then_with(|| (Some(b) == pinned).cmp(&(Some(a) == pinned)))
        });

        let tokens = self.space.all_tokens();
        order
            .into_iter()
            .skip(1)
            .take(n.saturating_sub(1))
            .map(|row| TermMatch {
                term: tokens[row].clone(),
                score: scores[row],
            })
            .collect()
    }

    /// Table vector of a resolved item.
    ///
    /// A resolved name always comes from the admitted set, so a miss here
    /// means the table and the occurrence index were built from different
    /// records.
    fn vector(&self, name: &str, attribute: Attribute) -> QueryResult<&'a [f32]> {
        self.table.lookup(name, attribute).ok_or_else(|| {
            tracing::error!(
                "invariant violated: '{name}' resolved but the table has no '{attribute}' row"
            );
            QueryError::MissingEmbedding {
                name: name.to_string(),
                attribute,
            }
        })
    }
}

/// Cosine similarity as a `Score`, clamped into [-1, 1]. NaN becomes 0.
fn to_score(similarity: f32) -> Score {
    Score::new(similarity).unwrap_or_else(|e| {
        tracing::warn!("{e}");
        if similarity.is_nan() {
            Score::zero()
        } else {
            Score::clamped(similarity)
        }
    })
}
