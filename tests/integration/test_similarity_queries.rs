//! Similarity, description and term queries over a small built shelf.

use crate::common::{build, review, shelf, smoky};
use whiskyvec::{Attribute, MatchStrategy, QueryError};

#[test]
fn test_most_similar_ranks_and_excludes_target() {
    let pipeline = build(shelf());

    let result = pipeline
        .most_similar("ardbeg 10", Attribute::Overall, 15, 3)
        .unwrap();

    let names: Vec<&str> = result.neighbors.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["laphroaig 10", "glenfoo", "lemon drop"]);

    // Same token bag in a different attribute order: identical overall vector
    assert!((result.neighbors[0].score.get() - 1.0).abs() < 1e-6);
    assert_eq!(result.neighbors[0].reviews, 3);

    for pair in result.neighbors.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_most_similar_respects_min_count() {
    let pipeline = build(shelf());

    let strict = pipeline
        .most_similar("glenfoo", Attribute::Overall, 15, 3)
        .unwrap();
    assert!(strict.neighbors.iter().all(|n| n.name != "glenfoo reserve"));
    assert!(strict.neighbors.iter().all(|n| n.reviews >= 3));

    let loose = pipeline
        .most_similar("glenfoo", Attribute::Overall, 15, 1)
        .unwrap();
    assert_eq!(loose.neighbors[0].name, "glenfoo reserve");
    assert_eq!(loose.neighbors[0].reviews, 1);
}

#[test]
fn test_most_similar_truncates_to_n_minus_one() {
    let pipeline = build(shelf());

    let result = pipeline
        .most_similar("ardbeg 10", Attribute::Nose, 2, 1)
        .unwrap();
    assert_eq!(result.neighbors.len(), 1);
    assert_eq!(result.attribute, Attribute::Nose);

    let empty = pipeline
        .most_similar("ardbeg 10", Attribute::Nose, 1, 1)
        .unwrap();
    assert!(empty.neighbors.is_empty());
}

#[test]
fn test_identical_twins_never_return_the_query() {
    let records = vec![
        smoky("twin b"),
        smoky("twin a"),
        review("other", &["honey"], &["vanilla"], &["toffee"]),
    ];
    let pipeline = build(records);

    for (query, twin) in [("twin a", "twin b"), ("twin b", "twin a")] {
        let result = pipeline
            .most_similar(query, Attribute::Overall, 15, 1)
            .unwrap();
        assert_eq!(result.neighbors[0].name, twin);
        assert!(result.neighbors.iter().all(|n| n.name != query));
    }
}

#[test]
fn test_typo_resolves_by_fuzzy_match() {
    let pipeline = build(shelf());

    let result = pipeline
        .most_similar("Argbed 10", Attribute::Overall, 15, 3)
        .unwrap();
    assert_eq!(result.resolution.name, "ardbeg 10");
    assert_eq!(result.resolution.strategy, MatchStrategy::Fuzzy);
}

#[test]
fn test_partial_name_prefers_most_reviewed() {
    let pipeline = build(shelf());

    let resolution = pipeline.engine().resolve("foo").unwrap();
    assert_eq!(resolution.name, "glenfoo");
    assert_eq!(resolution.strategy, MatchStrategy::Substring);
    assert_eq!(resolution.candidates, 2);
}

#[test]
fn test_unresolvable_name() {
    let pipeline = build(shelf());

    let err = pipeline
        .most_similar("zzzzqqq", Attribute::Overall, 15, 3)
        .unwrap_err();
    assert!(matches!(err, QueryError::Unresolved { ref query } if query == "zzzzqqq"));

    assert!(matches!(
        pipeline.describe("   ", 10).unwrap_err(),
        QueryError::Unresolved { .. }
    ));
}

#[test]
fn test_describe_skips_top_term() {
    let pipeline = build(shelf());

    let description = pipeline.describe("ardbeg 10", 3).unwrap();
    assert_eq!(description.terms.len(), 3);
    assert!(!description.terms.contains_key(&Attribute::Overall));

    assert_eq!(description.terms[&Attribute::Nose], vec!["peat", "ash"]);
    assert_eq!(description.terms[&Attribute::Palate], vec!["smoke", "ash"]);
    assert_eq!(description.terms[&Attribute::Finish], vec!["peat", "smoke"]);
}

#[test]
fn test_similar_terms() {
    let pipeline = build(shelf());

    let matches = pipeline.similar_terms("honey", 3).unwrap();
    let terms: Vec<&str> = matches.iter().map(|m| m.term.as_str()).collect();
    assert_eq!(terms, vec!["vanilla", "toffee"]);

    assert!(matches!(
        pipeline.similar_terms("cinnamon", 3).unwrap_err(),
        QueryError::UnknownTerm { .. }
    ));
}
