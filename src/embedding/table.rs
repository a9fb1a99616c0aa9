//! Aggregated per-item embeddings and review counts.

use std::collections::{BTreeMap, HashMap};

use crate::embedding::EmbeddingRow;
use crate::review::Attribute;
use crate::vector::{MeanAccumulator, VectorDimension, VectorError};

/// One vector per `(item, attribute)`, the mean over all of the item's reviews.
///
/// Stored as one cross-section per attribute so similarity queries can walk a
/// single attribute without filtering. Item names iterate in sorted order.
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    dimension: VectorDimension,
    sections: BTreeMap<Attribute, BTreeMap<String, Vec<f32>>>,
}

impl EmbeddingTable {
    /// Groups rows by `(name, attribute)` and reduces each group to its mean.
    ///
    /// The result does not depend on the order of `rows`.
    ///
    /// # Errors
    /// [`VectorError::DimensionMismatch`] if a row does not match `dimension`.
    pub fn build<I>(dimension: VectorDimension, rows: I) -> Result<Self, VectorError>
    where
        I: IntoIterator<Item = EmbeddingRow>,
    {
        let mut groups: BTreeMap<Attribute, BTreeMap<String, MeanAccumulator>> = BTreeMap::new();
        let mut row_count = 0usize;

        for row in rows {
            groups
                .entry(row.attribute)
                .or_default()
                .entry(row.name)
                .or_insert_with(|| MeanAccumulator::new(dimension))
                .add(&row.vector)?;
            row_count += 1;
        }

        let sections = groups
            .into_iter()
            .map(|(attribute, by_name)| {
                let means = by_name
                    .into_iter()
                    .filter_map(|(name, acc)| acc.finish().map(|mean| (name, mean)))
                    .collect();
                (attribute, means)
            })
            .collect();

        let table = Self {
            dimension,
            sections,
        };
        tracing::debug!(
            "aggregated {row_count} embedding rows into {} items",
            table.len()
        );
        Ok(table)
    }

    /// Aggregated vector for one item and attribute.
    pub fn lookup(&self, name: &str, attribute: Attribute) -> Option<&[f32]> {
        self.sections
            .get(&attribute)?
            .get(name)
            .map(Vec::as_slice)
    }

    /// Every item's vector for one attribute, keyed by name.
    pub fn rows_for_attribute(&self, attribute: Attribute) -> BTreeMap<&str, &[f32]> {
        self.cross_section(attribute).collect()
    }

    /// Iterator form of [`rows_for_attribute`](Self::rows_for_attribute), in name order.
    pub fn cross_section(&self, attribute: Attribute) -> impl Iterator<Item = (&str, &[f32])> {
        self.sections
            .get(&attribute)
            .into_iter()
            .flat_map(|by_name| by_name.iter().map(|(n, v)| (n.as_str(), v.as_slice())))
    }

    /// Item names present in the table, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cross_section(Attribute::Overall).map(|(name, _)| name)
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.sections
            .get(&Attribute::Overall)
            .map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dimension(&self) -> VectorDimension {
        self.dimension
    }
}

/// Number of admitted reviews per item.
///
/// Keeps the order in which names were first seen, which is the candidate
/// order used by name resolution.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceIndex {
    counts: HashMap<String, usize>,
    order: Vec<String>,
}

impl OccurrenceIndex {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        for name in names {
            index.record(name.as_ref());
        }
        index
    }

    fn record(&mut self, name: &str) {
        match self.counts.get_mut(name) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(name.to_string(), 1);
                self.order.push(name.to_string());
            }
        }
    }

    /// Review count for `name`, zero when unknown.
    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.counts.contains_key(name)
    }

    /// Distinct names in first-seen order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of reviews counted.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}
