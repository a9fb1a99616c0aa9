//! Normalized review records.

use std::collections::BTreeMap;

use crate::review::attribute::AttributeKey;

/// One tokenized review of one item.
///
/// Several records may share a `name` when an item was reviewed more than
/// once. Records are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    name: String,
    url: String,
    attributes: BTreeMap<AttributeKey, Vec<String>>,
    /// Canonical keys in the order their first heading appeared.
    order: Vec<AttributeKey>,
}

impl ReviewRecord {
    /// Builds a record from raw headings and their token lists.
    ///
    /// The name is lower-cased and trimmed. Headings are harmonized to their
    /// canonical keys; when two headings collapse onto the same key the later
    /// one's tokens win and the section keeps the earlier one's position.
    pub fn new<N, U, I, K>(name: N, url: U, sections: I) -> Self
    where
        N: AsRef<str>,
        U: Into<String>,
        I: IntoIterator<Item = (K, Vec<String>)>,
        K: AsRef<str>,
    {
        let name = name.as_ref().trim().to_lowercase();

        let mut attributes = BTreeMap::new();
        let mut order = Vec::new();
        for (heading, tokens) in sections {
            let key = AttributeKey::harmonize(heading.as_ref());
            if attributes.insert(key.clone(), tokens).is_some() {
                tracing::debug!(
                    "review of '{name}': heading '{}' overrides earlier '{key}' section",
                    heading.as_ref()
                );
            } else {
                order.push(key);
            }
        }

        Self {
            name,
            url: url.into(),
            attributes,
            order,
        }
    }

    /// Builds a record whose attribute keys are already canonical.
    ///
    /// Sections are ordered by key since the map carries no heading order.
    pub fn from_parts(
        name: impl AsRef<str>,
        url: impl Into<String>,
        attributes: BTreeMap<AttributeKey, Vec<String>>,
    ) -> Self {
        Self {
            name: name.as_ref().trim().to_lowercase(),
            url: url.into(),
            order: attributes.keys().cloned().collect(),
            attributes,
        }
    }

    /// Canonical item name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the review came from. Not used in any computation.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Tokens of one section, if present.
    pub fn tokens(&self, key: &AttributeKey) -> Option<&[String]> {
        self.attributes.get(key).map(Vec::as_slice)
    }

    /// All sections in canonical key order.
    pub fn attributes(&self) -> &BTreeMap<AttributeKey, Vec<String>> {
        &self.attributes
    }

    /// All sections in the order their headings appeared in the review.
    pub fn sections(&self) -> impl Iterator<Item = (&AttributeKey, &[String])> {
        self.order
            .iter()
            .filter_map(|key| self.attributes.get_key_value(key))
            .map(|(key, tokens)| (key, tokens.as_slice()))
    }
}
