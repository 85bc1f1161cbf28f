//! Integration tests for model-fragment fusion.

use clinscrub::domain::{FusionSource, Language, ModelFragment};
use clinscrub::engine::ScrubEngine;

fn fragment(start: usize, end: usize, label: &str, confidence: f32) -> ModelFragment {
    ModelFragment::new(start, end, label, confidence, "")
}

#[test]
fn test_fragmented_ssn_reassembled() {
    let engine = ScrubEngine::new(Language::English).unwrap();
    let text = "Patient SSN: 123-45-6789";
    let fragments = vec![
        fragment(13, 16, "ssn", 0.90),
        fragment(17, 19, "ssn", 0.85),
        fragment(20, 24, "ssn", 0.88),
    ];
    let merged = engine.merge(text, &fragments);
    let ssn: Vec<_> = merged.iter().filter(|e| e.entity_type == "ssn").collect();
    assert_eq!(ssn.len(), 1);
    assert_eq!(ssn[0].text, "123-45-6789");
    assert_eq!(ssn[0].start, 13);
    assert_eq!(ssn[0].end, 24);
    assert_eq!(ssn[0].source, FusionSource::Fused);
    // 0.6 * mean(0.90, 0.85, 0.88) + 0.4 * (0.3 + 0.55)
    assert!((0.8..=0.95).contains(&ssn[0].confidence));
}

#[test]
fn test_fragmented_date_reassembled() {
    let engine = ScrubEngine::new(Language::English).unwrap();
    let text = "DOB: 01/15/1970, Email: john@example.com";
    let fragments = vec![
        fragment(5, 7, "date", 0.80),
        fragment(7, 15, "date", 0.75),
        fragment(24, 40, "email", 0.95),
    ];
    let merged = engine.merge(text, &fragments);
    let dates: Vec<_> = merged.iter().filter(|e| e.entity_type == "date").collect();
    assert_eq!(dates.len(), 1);
    assert_eq!(dates[0].text, "01/15/1970");
    let emails: Vec<_> = merged.iter().filter(|e| e.entity_type == "email").collect();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].source, FusionSource::Fused);
}

#[test]
fn test_model_only_entity_survives() {
    let engine = ScrubEngine::new(Language::English).unwrap();
    let text = "Attending: Dr. Imaginary";
    let fragments = vec![fragment(15, 24, "person", 0.93)];
    let merged = engine.merge(text, &fragments);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].source, FusionSource::Model);
    assert_eq!(merged[0].text, "Imaginary");
    assert!((merged[0].confidence - 0.93).abs() < 1e-6);
}

#[test]
fn test_pattern_only_entity_emitted() {
    let engine = ScrubEngine::new(Language::English).unwrap();
    let text = "Fax cover for 123-45-6789 follows";
    // Model missed the SSN entirely.
    let merged = engine.merge(text, &[]);
    let ssn = merged.iter().find(|e| e.entity_type == "ssn").unwrap();
    assert_eq!(ssn.source, FusionSource::Pattern);
    assert_eq!(ssn.text, "123-45-6789");
}

#[test]
fn test_label_variants_cluster_together() {
    let engine = ScrubEngine::new(Language::English).unwrap();
    let text = "Call 555-123-4567 now";
    // Model labels the pieces with different phone spellings.
    let fragments = vec![
        fragment(5, 12, "phone", 0.9),
        fragment(13, 17, "telephone", 0.85),
    ];
    let merged = engine.merge(text, &fragments);
    let phones: Vec<_> = merged
        .iter()
        .filter(|e| e.entity_type == "phone_number")
        .collect();
    assert_eq!(phones.len(), 1);
    assert_eq!(phones[0].text, "555-123-4567");
}

#[test]
fn test_distinct_types_not_clustered() {
    let engine = ScrubEngine::new(Language::English).unwrap();
    let text = "Jane 10001";
    let fragments = vec![
        fragment(0, 4, "person", 0.9),
        fragment(5, 10, "zipcode", 0.8),
    ];
    let merged = engine.merge(text, &fragments);
    assert_eq!(merged.len(), 2);
    assert!(merged.iter().any(|e| e.entity_type == "person"));
    // zipcode normalizes to the canonical postcode label
    assert!(merged.iter().any(|e| e.entity_type == "postcode"));
}

#[test]
fn test_merge_output_sorted() {
    let engine = ScrubEngine::new(Language::English).unwrap();
    let text = "SSN 123-45-6789, email a@b.org, MRN MRN1234567";
    let merged = engine.merge(text, &[fragment(0, 3, "person", 0.6)]);
    for pair in merged.windows(2) {
        assert!(pair[0].start <= pair[1].start);
    }
}
