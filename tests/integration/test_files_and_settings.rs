//! End to end from files on disk, driven by settings.

use std::sync::Arc;

use serde_json::json;

use crate::common::{TestData, VOCABULARY};
use whiskyvec::io::{load_reviews, load_word_vectors};
use whiskyvec::{Attribute, LoadError, Pipeline, PipelineOptions, Settings, VectorSpace};

fn review_line(name: &str, nose: &str, palate: &str, finish: &str) -> serde_json::Value {
    json!({
        "name": name,
        "url": format!("https://reviews.example/{name}"),
        "attributes": {
            "Nose": vec![nose; 6],
            "Palate": vec![palate; 6],
            "Finish": vec![finish; 6],
            "Colour": ["amber"],
        }
    })
}

#[test]
fn test_build_from_files_named_in_settings() {
    let data = TestData::new();
    let vectors = data.add_vectors("data/vectors.txt");
    let reviews = data.add_reviews(
        "data/reviews.jsonl",
        &[
            review_line("Ardbeg 10", "smoke", "peat", "ash"),
            review_line("Ardbeg 10", "peat", "smoke", "ash"),
            review_line("Glenfoo", "honey", "vanilla", "toffee"),
            json!({"name": "Sparse", "attributes": {"nose": ["smoke"]}}),
        ],
    );

    let config = data.add_file(
        ".whiskyvec/settings.toml",
        &format!(
            "[data]\nreviews = {:?}\nvectors = {:?}\n\n[build]\nparallel_threads = 2\n\n[query]\nmin_count = 1\n",
            reviews.display().to_string(),
            vectors.display().to_string()
        ),
    );
    let settings = Settings::load_from(&config).unwrap();
    assert_eq!(settings.build.parallel_threads, 2);

    let space = load_word_vectors(&settings.data.vectors).unwrap();
    assert_eq!(space.len(), VOCABULARY.len());
    let records = load_reviews(&settings.data.reviews).unwrap();
    assert_eq!(records.len(), 4);

    let options = PipelineOptions::from(&settings);
    assert_eq!(options.parallel_threads, 2);
    assert_eq!(options.min_tokens, 5);

    let pipeline = Pipeline::build(Arc::new(space), records, &options).unwrap();
    assert_eq!(pipeline.report().incomplete, 1);
    assert_eq!(pipeline.occurrences().count("ardbeg 10"), 2);

    let result = pipeline
        .most_similar(
            "ardbeg",
            Attribute::Overall,
            settings.query.top_n,
            settings.query.min_count,
        )
        .unwrap();
    assert_eq!(result.resolution.name, "ardbeg 10");
    assert_eq!(result.neighbors.len(), 1);
    assert_eq!(result.neighbors[0].name, "glenfoo");
}

#[test]
fn test_resolver_settings_reach_the_engine() {
    let data = TestData::new();
    let config = data.add_file(
        "settings.toml",
        "[resolver]\ncutoff = 0.95\nmax_candidates = 1\n",
    );
    let settings = Settings::load_from(&config).unwrap();

    let options = PipelineOptions::from(&settings);
    assert_eq!(options.resolver.cutoff, 0.95);
    assert_eq!(options.resolver.max_candidates, 1);

    let pipeline = Pipeline::build(
        crate::common::tasting_space(),
        crate::common::shelf(),
        &options,
    )
    .unwrap();

    // Close enough at the default cutoff, too far at 0.95
    assert!(pipeline.engine().resolve("argbed 10").is_err());
}

#[test]
fn test_missing_input_files() {
    let data = TestData::new();

    let err = load_word_vectors(data.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, LoadError::FileRead { .. }));
    assert!(!err.recovery_suggestions().is_empty());

    let err = load_reviews(data.path().join("absent.jsonl")).unwrap_err();
    assert!(matches!(err, LoadError::FileRead { .. }));
}

#[test]
fn test_init_writes_loadable_settings() {
    let data = TestData::new();

    let path = Settings::init_config_file(data.path(), false).unwrap();
    let settings = Settings::load_from(&path).unwrap();

    assert_eq!(settings.resolver.max_candidates, 3);
    assert_eq!(settings.build.min_tokens, 5);
    assert!(Settings::init_config_file(data.path(), false).is_err());
}
