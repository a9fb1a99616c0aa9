//! File loaders for the two pipeline inputs.
//!
//! - Word vectors in the word2vec text format: an optional `<count> <dim>`
//!   header, then one `token v1 v2 ...` line per vocabulary entry.
//! - Tokenized reviews as JSON Lines, one
//!   `{"name": ..., "url": ..., "attributes": {heading: [tokens]}}` per line.
//!
//! Both loaders stream line by line and report the 1-based line number of the
//! first malformed line.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{LoadError, LoadResult};
use crate::review::ReviewRecord;
use crate::vector::{VectorError, VectorSpace, WordVectors, validate_finite};

/// Loads a word2vec text file into memory.
///
/// # Errors
/// - [`LoadError::FileRead`] if the file cannot be opened or read
/// - [`LoadError::Malformed`] for a non-numeric or non-finite value, or a row
///   whose length differs from the header (or first row)
/// - [`LoadError::Vectors`] if the file holds no vectors at all
pub fn load_word_vectors(path: impl AsRef<Path>) -> LoadResult<WordVectors> {
    let path = path.as_ref();
    let reader = open(path)?;

    let mut dimension: Option<usize> = None;
    let mut header_checked = false;
    let mut entries: Vec<(String, Vec<f32>)> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|source| LoadError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        if !header_checked {
            header_checked = true;
            if let Some(header_dim) = parse_header(&parts) {
                tracing::debug!("vector file header declares {header_dim} dimensions");
                dimension = Some(header_dim);
                continue;
            }
        }

        let token = parts[0].to_string();
        let vector = parts[1..]
            .iter()
            .map(|value| value.parse::<f32>())
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|e| malformed(path, line_no, format!("invalid value for '{token}': {e}")))?;
        if let Err(VectorError::NonFinite { position, value }) = validate_finite(&vector) {
            return Err(malformed(
                path,
                line_no,
                format!("'{token}' has non-finite value {value} at position {position}"),
            ));
        }

        let expected = *dimension.get_or_insert(vector.len());
        if vector.len() != expected {
            return Err(malformed(
                path,
                line_no,
                format!(
                    "'{token}' has {} values, expected {expected}",
                    vector.len()
                ),
            ));
        }

        entries.push((token, vector));
    }

    let dimension = dimension.unwrap_or(0);
    if entries.is_empty() {
        return Err(LoadError::Vectors {
            path: path.to_path_buf(),
            source: VectorError::EmptyVocabulary,
        });
    }

    let space = WordVectors::from_entries(dimension, entries).map_err(|source| {
        LoadError::Vectors {
            path: path.to_path_buf(),
            source,
        }
    })?;

    tracing::info!(
        "loaded {} word vectors ({}) from {}",
        space.len(),
        space.dimension(),
        path.display()
    );

    Ok(space)
}

/// A `<count> <dim>` header line, both positive integers.
fn parse_header(parts: &[&str]) -> Option<usize> {
    match parts {
        [count, dim] => {
            count.parse::<usize>().ok()?;
            dim.parse::<usize>().ok().filter(|d| *d > 0)
        }
        _ => None,
    }
}

/// One line of the reviews file.
#[derive(Debug, Deserialize)]
struct RawReview {
    name: String,
    #[serde(default)]
    url: String,
    #[serde(deserialize_with = "ordered_sections")]
    attributes: Vec<(String, Vec<String>)>,
}

/// Keeps headings in file order so that when two of them harmonize to the
/// same attribute the one written later wins.
fn ordered_sections<'de, D>(deserializer: D) -> Result<Vec<(String, Vec<String>)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct SectionsVisitor;

    impl<'de> Visitor<'de> for SectionsVisitor {
        type Value = Vec<(String, Vec<String>)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of attribute headings to token lists")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut sections = Vec::with_capacity(map.size_hint().unwrap_or(4));
            while let Some(entry) = map.next_entry::<String, Vec<String>>()? {
                sections.push(entry);
            }
            Ok(sections)
        }
    }

    deserializer.deserialize_map(SectionsVisitor)
}

/// Loads tokenized reviews, harmonizing attribute headings on the way in.
///
/// # Errors
/// - [`LoadError::FileRead`] if the file cannot be opened or read
/// - [`LoadError::Malformed`] for a line that is not a review object
pub fn load_reviews(path: impl AsRef<Path>) -> LoadResult<Vec<ReviewRecord>> {
    let path = path.as_ref();
    let reader = open(path)?;

    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| LoadError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let raw: RawReview = serde_json::from_str(&line)
            .map_err(|e| malformed(path, i + 1, e.to_string()))?;
        records.push(ReviewRecord::new(raw.name, raw.url, raw.attributes));
    }

    tracing::info!("loaded {} reviews from {}", records.len(), path.display());
    Ok(records)
}

fn open(path: &Path) -> LoadResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| LoadError::FileRead {
            path: path.to_path_buf(),
            source,
        })
}

fn malformed(path: &Path, line: usize, reason: String) -> LoadError {
    LoadError::Malformed {
        path: path.to_path_buf(),
        line,
        reason,
    }
}
