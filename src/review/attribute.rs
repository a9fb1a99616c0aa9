//! Tasting attributes and harmonization of free-form review headings.
//!
//! Reviewers label their notes with whatever heading they like ("Nose",
//! "Aroma", "Flavour", "Finnish"...). Those headings are mapped onto a small
//! set of canonical three-letter keys through a static synonym table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Synonym table: raw heading (lower-cased, trimmed) → canonical key.
const SYNONYMS: &[(&str, AttributeKey)] = &[
    // palate
    ("tongue", AttributeKey::Palate),
    ("tasted", AttributeKey::Palate),
    ("pallate", AttributeKey::Palate),
    ("palette", AttributeKey::Palate),
    ("pallet", AttributeKey::Palate),
    ("flavour", AttributeKey::Palate),
    ("flavor", AttributeKey::Palate),
    ("pilate", AttributeKey::Palate),
    ("taste", AttributeKey::Palate),
    ("tasting", AttributeKey::Palate),
    ("palatte", AttributeKey::Palate),
    // colour
    ("color", AttributeKey::Colour),
    // nose
    ("sniffling", AttributeKey::Nose),
    ("nosing", AttributeKey::Nose),
    ("smell", AttributeKey::Nose),
    ("sniff", AttributeKey::Nose),
    ("supernose", AttributeKey::Nose),
    ("nosewise", AttributeKey::Nose),
    ("aroma", AttributeKey::Nose),
    ("noses", AttributeKey::Nose),
    ("snout", AttributeKey::Nose),
    // finish
    ("dev", AttributeKey::Finish),
    ("finally", AttributeKey::Finish),
    ("finishing", AttributeKey::Finish),
    ("evolution", AttributeKey::Finish),
    ("swallow", AttributeKey::Finish),
    ("afterward", AttributeKey::Finish),
    ("finnish", AttributeKey::Finish),
];

/// Canonical key of a review section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKey {
    Nose,
    Palate,
    Finish,
    Colour,
    /// Any other heading, truncated to its first three characters.
    Other(String),
}

impl AttributeKey {
    /// Maps a raw review heading onto its canonical key.
    ///
    /// Synonyms are resolved first; anything else is cut to three characters,
    /// so "Palate" becomes `pal` and "Body" becomes `bod`.
    pub fn harmonize(raw: &str) -> Self {
        let low = raw.trim().to_lowercase();

        if let Some((_, key)) = SYNONYMS.iter().find(|(syn, _)| *syn == low) {
            return key.clone();
        }

        let short: String = low.chars().take(3).collect();
        Self::from_canonical(&short)
    }

    /// Builds a key from an already canonical three-letter form.
    pub fn from_canonical(short: &str) -> Self {
        match short {
            "nos" => Self::Nose,
            "pal" => Self::Palate,
            "fin" => Self::Finish,
            "col" => Self::Colour,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical three-letter form.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Nose => "nos",
            Self::Palate => "pal",
            Self::Finish => "fin",
            Self::Colour => "col",
            Self::Other(short) => short,
        }
    }

    /// The embedding attribute this key feeds, if it is one of the required three.
    pub fn as_attribute(&self) -> Option<Attribute> {
        match self {
            Self::Nose => Some(Attribute::Nose),
            Self::Palate => Some(Attribute::Palate),
            Self::Finish => Some(Attribute::Finish),
            Self::Colour | Self::Other(_) => None,
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label of an embedding row: one of the three tasting dimensions or the
/// derived overall summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    #[serde(rename = "nos")]
    Nose,
    #[serde(rename = "pal")]
    Palate,
    #[serde(rename = "fin")]
    Finish,
    #[serde(rename = "ful")]
    Overall,
}

impl Attribute {
    /// The tasting dimensions every admitted review must cover.
    pub const REQUIRED: [Attribute; 3] = [Attribute::Nose, Attribute::Palate, Attribute::Finish];

    /// All row labels, in table order.
    pub const ALL: [Attribute; 4] = [
        Attribute::Nose,
        Attribute::Palate,
        Attribute::Finish,
        Attribute::Overall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nose => "nos",
            Self::Palate => "pal",
            Self::Finish => "fin",
            Self::Overall => "ful",
        }
    }

    /// Human readable name for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::Palate => "palate",
            Self::Finish => "finish",
            Self::Overall => "overall",
        }
    }

    /// Record key holding this attribute's tokens. `None` for `Overall`.
    pub fn key(&self) -> Option<AttributeKey> {
        match self {
            Self::Nose => Some(AttributeKey::Nose),
            Self::Palate => Some(AttributeKey::Palate),
            Self::Finish => Some(AttributeKey::Finish),
            Self::Overall => None,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = String;

    /// Accepts the short forms (`nos`, `pal`, `fin`, `ful`) and the long
    /// labels (`nose`, `palate`, `finish`, `overall`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nos" | "nose" => Ok(Self::Nose),
            "pal" | "palate" => Ok(Self::Palate),
            "fin" | "finish" => Ok(Self::Finish),
            "ful" | "full" | "overall" => Ok(Self::Overall),
            other => Err(format!(
                "unknown attribute '{other}', expected one of: nos, pal, fin, ful"
            )),
        }
    }
}
