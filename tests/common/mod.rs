#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use whiskyvec::{Pipeline, PipelineOptions, ReviewRecord, VectorSpace, WordVectors};

/// Tokens per attribute in generated reviews; one more than the admission threshold.
pub const TOKENS_PER_ATTRIBUTE: usize = 6;

/// Small 3-d tasting vocabulary: a smoky axis, a sweet axis and a citrus axis.
pub const VOCABULARY: &[(&str, [f32; 3])] = &[
    ("smoke", [1.0, 0.0, 0.0]),
    ("peat", [0.9, 0.1, 0.0]),
    ("ash", [0.8, 0.2, 0.0]),
    ("honey", [0.0, 1.0, 0.0]),
    ("vanilla", [0.1, 0.9, 0.0]),
    ("toffee", [0.2, 0.8, 0.0]),
    ("citrus", [0.0, 0.0, 1.0]),
    ("lemon", [0.0, 0.1, 0.9]),
];

pub fn tasting_vectors() -> WordVectors {
    WordVectors::from_entries(
        3,
        VOCABULARY
            .iter()
            .map(|(token, vector)| (*token, vector.to_vec())),
    )
    .expect("valid test vocabulary")
}

pub fn tasting_space() -> Arc<dyn VectorSpace> {
    Arc::new(tasting_vectors())
}

/// `words` repeated until the list is `len` tokens long.
pub fn tokens(words: &[&str], len: usize) -> Vec<String> {
    words
        .iter()
        .cycle()
        .take(len)
        .map(|w| w.to_string())
        .collect()
}

/// A complete review with one word list per tasting attribute.
pub fn review(name: &str, nose: &[&str], palate: &[&str], finish: &[&str]) -> ReviewRecord {
    ReviewRecord::new(
        name,
        format!("https://reviews.example/{}", name.replace(' ', "-")),
        vec![
            ("Nose", tokens(nose, TOKENS_PER_ATTRIBUTE)),
            ("Palate", tokens(palate, TOKENS_PER_ATTRIBUTE)),
            ("Finish", tokens(finish, TOKENS_PER_ATTRIBUTE)),
        ],
    )
}

pub fn smoky(name: &str) -> ReviewRecord {
    review(name, &["smoke"], &["peat"], &["ash"])
}

pub fn sweet(name: &str) -> ReviewRecord {
    review(name, &["honey"], &["vanilla"], &["toffee"])
}

pub fn citrus(name: &str) -> ReviewRecord {
    review(name, &["citrus"], &["lemon"], &["citrus"])
}

/// Reviews for five items with different review counts:
/// - ardbeg 10, laphroaig 10: smoky, 3 reviews each
/// - glenfoo: sweet, 3 reviews
/// - glenfoo reserve: sweet, 1 review
/// - lemon drop: citrus, 3 reviews
pub fn shelf() -> Vec<ReviewRecord> {
    let mut records = Vec::new();
    for _ in 0..3 {
        records.push(smoky("Ardbeg 10"));
        records.push(review("Laphroaig 10", &["peat"], &["smoke"], &["ash"]));
        records.push(sweet("glenfoo"));
        records.push(citrus("lemon drop"));
    }
    records.push(sweet("glenfoo reserve"));
    records
}

pub fn build(records: Vec<ReviewRecord>) -> Pipeline {
    Pipeline::build(tasting_space(), records, &PipelineOptions::default())
        .expect("pipeline builds")
}

/// Input files on disk for loader and settings tests.
pub struct TestData {
    pub dir: TempDir,
}

impl TestData {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Writes the test vocabulary in word2vec text format, with header.
    pub fn add_vectors(&self, path: &str) -> PathBuf {
        let mut content = format!("{} 3\n", VOCABULARY.len());
        for (token, vector) in VOCABULARY {
            content.push_str(&format!(
                "{token} {} {} {}\n",
                vector[0], vector[1], vector[2]
            ));
        }
        self.add_file(path, &content)
    }

    /// Writes reviews as JSON Lines.
    pub fn add_reviews(&self, path: &str, lines: &[serde_json::Value]) -> PathBuf {
        let content: String = lines.iter().map(|line| format!("{line}\n")).collect();
        self.add_file(path, &content)
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }
}
