//! Build-time behaviour: admission, exclusion accounting, aggregation.

use std::sync::Arc;
use std::thread;

use crate::common::{build, review, shelf, smoky, sweet, tasting_space, tokens};
use whiskyvec::{
    Attribute, CorpusMode, Pipeline, PipelineOptions, ReviewRecord, training_corpus,
};

#[test]
fn test_report_accounts_for_every_review() {
    let mut records = shelf();
    // Palate has exactly five tokens: not admitted
    records.push(ReviewRecord::new(
        "short palate",
        "",
        vec![
            ("nose", tokens(&["smoke"], 6)),
            ("palate", tokens(&["peat"], 5)),
            ("finish", tokens(&["ash"], 6)),
        ],
    ));
    // Finish missing entirely
    records.push(ReviewRecord::new(
        "no finish",
        "",
        vec![("nose", tokens(&["smoke"], 6)), ("palate", tokens(&["peat"], 6))],
    ));
    // Complete but nothing in vocabulary
    records.push(review("mystery", &["cinnamon"], &["clove"], &["ginger"]));

    let total = records.len();
    let pipeline = build(records);
    let report = pipeline.report();

    assert_eq!(report.reviews, total);
    assert_eq!(report.incomplete, 2);
    assert_eq!(report.empty_embeddings, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(report.admitted, 13);
    assert_eq!(report.items, 5);
    assert_eq!(
        report.reviews,
        report.incomplete + report.empty_embeddings + report.failed + report.admitted
    );

    for excluded in ["short palate", "no finish", "mystery"] {
        assert!(!pipeline.occurrences().contains(excluded));
        assert!(pipeline.table().lookup(excluded, Attribute::Overall).is_none());
    }
}

#[test]
fn test_heading_synonyms_are_harmonized() {
    let record = ReviewRecord::new(
        "glenfoo",
        "",
        vec![
            ("Aroma", tokens(&["honey"], 6)),
            ("Flavour", tokens(&["vanilla"], 6)),
            ("Finnish", tokens(&["toffee"], 6)),
        ],
    );
    let pipeline = build(vec![record]);

    assert_eq!(pipeline.report().admitted, 1);
    assert_eq!(
        pipeline.table().lookup("glenfoo", Attribute::Nose),
        Some(&[0.0, 1.0, 0.0][..])
    );
}

#[test]
fn test_item_vector_is_mean_over_reviews() {
    let records = vec![
        review("glenfoo", &["smoke"], &["smoke"], &["smoke"]),
        review("glenfoo", &["honey"], &["honey"], &["honey"]),
    ];
    let pipeline = build(records);

    assert_eq!(pipeline.occurrences().count("glenfoo"), 2);
    for attribute in Attribute::ALL {
        assert_eq!(
            pipeline.table().lookup("glenfoo", attribute),
            Some(&[0.5, 0.5, 0.0][..]),
            "{attribute}"
        );
    }
}

#[test]
fn test_overall_is_mean_of_attribute_means() {
    // Unequal token counts: a pooled mean would weight nose more heavily
    let record = ReviewRecord::new(
        "lopsided",
        "",
        vec![
            ("nose", tokens(&["smoke"], 12)),
            ("palate", tokens(&["honey"], 6)),
            ("finish", tokens(&["citrus"], 6)),
        ],
    );
    let pipeline = build(vec![record]);

    let overall = pipeline
        .table()
        .lookup("lopsided", Attribute::Overall)
        .unwrap();
    for value in overall {
        assert!((value - 1.0 / 3.0).abs() < 1e-6);
    }
}

#[test]
fn test_review_order_does_not_change_the_table() {
    let forward = build(shelf());
    let mut reversed_records = shelf();
    reversed_records.reverse();
    let reversed = build(reversed_records);

    assert_eq!(forward.report(), reversed.report());
    for name in forward.occurrences().names() {
        assert_eq!(
            forward.occurrences().count(name),
            reversed.occurrences().count(name)
        );
        for attribute in Attribute::ALL {
            assert_eq!(
                forward.table().lookup(name, attribute),
                reversed.table().lookup(name, attribute)
            );
        }
    }
}

#[test]
fn test_min_tokens_option() {
    let records = vec![ReviewRecord::new(
        "terse",
        "",
        vec![
            ("nose", tokens(&["smoke"], 3)),
            ("palate", tokens(&["peat"], 3)),
            ("finish", tokens(&["ash"], 3)),
        ],
    )];

    let strict = Pipeline::build(tasting_space(), records.clone(), &PipelineOptions::default())
        .unwrap();
    assert_eq!(strict.report().incomplete, 1);

    let lenient = Pipeline::build(
        tasting_space(),
        records,
        &PipelineOptions {
            min_tokens: 2,
            ..PipelineOptions::default()
        },
    )
    .unwrap();
    assert_eq!(lenient.report().admitted, 1);
}

#[test]
fn test_concurrent_queries_share_one_pipeline() {
    let pipeline = Arc::new(build(shelf()));
    let expected = pipeline
        .most_similar("ardbeg 10", Attribute::Overall, 15, 3)
        .unwrap()
        .neighbors;

    thread::scope(|scope| {
        for _ in 0..4 {
            let pipeline = Arc::clone(&pipeline);
            let expected = expected.clone();
            scope.spawn(move || {
                for _ in 0..25 {
                    let result = pipeline
                        .most_similar("ardbeg 10", Attribute::Overall, 15, 3)
                        .unwrap();
                    assert_eq!(result.neighbors, expected);
                    assert!(pipeline.describe("glenfoo", 4).is_ok());
                }
            });
        }
    });
}

#[test]
fn test_training_corpus_modes() {
    let mut records = vec![smoky("ardbeg 10"), sweet("glenfoo")];
    records.push(ReviewRecord::new(
        "terse",
        "",
        vec![("nose", tokens(&["peat"], 2)), ("body", tokens(&["oily"], 7))],
    ));

    let per_attribute = training_corpus(&records, CorpusMode::PerAttribute);
    // Three attributes from each complete review plus the long body section
    assert_eq!(per_attribute.len(), 7);
    assert!(per_attribute.iter().all(|sentence| sentence.len() > 5));

    let whole = training_corpus(&records, CorpusMode::WholeReview);
    assert_eq!(whole.len(), 3);
    assert_eq!(whole[0].len(), 18);
    assert_eq!(whole[2].len(), 9);
}
