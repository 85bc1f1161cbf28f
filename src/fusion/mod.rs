//! Confidence fusion
//!
//! Combines fragmentary model predictions with pattern-detected semantic
//! units. Model fragments carry learned context sensitivity but often split
//! one identifier across several tokens; semantic units are whole spans with
//! structural evidence. Fusion clusters adjacent fragments of the same
//! normalized label, then corroborates each cluster against overlapping
//! units with a fixed weighting in favor of the model.

use crate::detection::SemanticUnit;
use crate::domain::{FusedEntity, FusionSource, ModelFragment};
use crate::text::{char_len, slice_chars};
use tracing::debug;

/// Weight of the model confidence when a cluster overlaps a semantic unit.
const MODEL_WEIGHT: f32 = 0.6;
/// Weight of the pattern score when a cluster overlaps a semantic unit.
const PATTERN_WEIGHT: f32 = 0.4;

/// Tuning knobs for the fusion pass.
#[derive(Debug, Clone)]
pub struct FusionConfig {
    /// Maximum character gap between fragments merged into one cluster
    pub gap_tolerance: usize,
    /// Keep the model's label even when the pattern label is more specific
    pub prefer_model_labels: bool,
    /// Emit pattern-only units that no model fragment corroborates
    pub use_semantic_patterns: bool,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            gap_tolerance: 1,
            prefer_model_labels: false,
            use_semantic_patterns: true,
        }
    }
}

/// Map label variants onto a canonical entity type.
///
/// Model vocabularies and locale catalogs disagree on naming; overlap and
/// clustering decisions compare canonical forms only.
pub fn normalize_label(label: &str) -> &str {
    match label.to_ascii_lowercase().as_str() {
        "zip" | "zipcode" | "zip_code" | "postal_code" => "postcode",
        "nir" | "insee" | "steuer_id" | "steuernummer" | "codice_fiscale" | "dni" | "nie"
        | "ssn_fr" | "tax_id" => "national_id",
        "phone" | "telephone" | "mobile" | "cell" | "fax" => "phone_number",
        "dob" | "date_of_birth" | "birthdate" => "date",
        "e-mail" | "email_address" => "email",
        "mrn" | "medical_record" => "medical_record_number",
        _ => canonical_of(label),
    }
}

fn canonical_of(label: &str) -> &str {
    const CANONICAL: &[&str] = &[
        "postcode",
        "national_id",
        "phone_number",
        "date",
        "email",
        "ssn",
        "npi",
        "credit_card",
        "url",
        "ip_address",
        "medical_record_number",
        "street_address",
        "person",
        "organization",
        "location",
    ];
    // Unknown labels pass through unchanged; comparisons still work because
    // both sides go through the same mapping.
    CANONICAL
        .iter()
        .find(|c| label.eq_ignore_ascii_case(c))
        .copied()
        .unwrap_or(label)
}

/// True when `a` is a more specific variant of the same canonical type as
/// `b`: they normalize identically, `a` is not already canonical, and `b`
/// is. "dni" is more specific than "national_id"; "ssn" and "npi" are
/// unrelated.
pub fn is_more_specific(a: &str, b: &str) -> bool {
    let canonical = normalize_label(a);
    canonical == normalize_label(b) && !a.eq_ignore_ascii_case(canonical) && b.eq_ignore_ascii_case(canonical)
}

/// A run of adjacent model fragments with one normalized label.
struct Cluster {
    start: usize,
    end: usize,
    label: String,
    confidence_sum: f32,
    count: usize,
}

impl Cluster {
    fn confidence(&self) -> f32 {
        self.confidence_sum / self.count as f32
    }

    fn overlaps(&self, unit: &SemanticUnit<'_>) -> bool {
        self.start < unit.end && unit.start < self.end
    }
}

/// Fuse model fragments with semantic units into a final entity list.
///
/// Fragments are clamped to the text bounds; degenerate spans are dropped.
/// Every cluster overlapping a given semantic unit is folded into one fused
/// entity, so a unit corroborated by several disjoint clusters (the model
/// missed a middle fragment) still yields a single span. Output is sorted by
/// start offset and non-overlapping.
pub fn merge_entities_with_semantic_units(
    text: &str,
    fragments: &[ModelFragment],
    units: &[SemanticUnit<'_>],
    config: &FusionConfig,
) -> Vec<FusedEntity> {
    let len = char_len(text);
    let mut sane: Vec<ModelFragment> = fragments
        .iter()
        .filter_map(|f| {
            let start = f.start.min(len);
            let end = f.end.min(len);
            if start >= end {
                debug!(start = f.start, end = f.end, "dropping degenerate fragment");
                return None;
            }
            let mut f = f.clone();
            f.start = start;
            f.end = end;
            Some(f)
        })
        .collect();
    sane.sort_by_key(|f| (f.start, f.end));

    let clusters = cluster_fragments(&sane, config.gap_tolerance);
    let mut fused: Vec<FusedEntity> = Vec::with_capacity(clusters.len());
    let mut unit_members: Vec<Vec<usize>> = vec![Vec::new(); units.len()];

    for (c_idx, cluster) in clusters.iter().enumerate() {
        let overlap = units.iter().position(|u| {
            cluster.overlaps(u) && normalize_label(&u.entity_type) == normalize_label(&cluster.label)
        });
        match overlap {
            Some(idx) => unit_members[idx].push(c_idx),
            None => fused.push(FusedEntity {
                start: cluster.start,
                end: cluster.end,
                entity_type: cluster.label.clone(),
                confidence: cluster.confidence().clamp(0.0, 1.0),
                text: slice_chars(text, cluster.start, cluster.end).to_string(),
                source: FusionSource::Model,
            }),
        }
    }

    for (idx, unit) in units.iter().enumerate() {
        let members = &unit_members[idx];
        if members.is_empty() {
            if config.use_semantic_patterns {
                fused.push(FusedEntity {
                    start: unit.start,
                    end: unit.end,
                    entity_type: unit.entity_type.clone(),
                    confidence: unit.score.clamp(0.0, 1.0),
                    text: slice_chars(text, unit.start, unit.end).to_string(),
                    source: FusionSource::Pattern,
                });
            }
            continue;
        }
        // The unit span is the complete semantic unit; clusters may cover
        // only parts of it. Model confidence is the mean over every
        // fragment of every member cluster.
        let mut start = unit.start;
        let mut end = unit.end;
        let mut confidence_sum = 0.0;
        let mut count = 0;
        for &c_idx in members {
            let cluster = &clusters[c_idx];
            start = start.min(cluster.start);
            end = end.max(cluster.end);
            confidence_sum += cluster.confidence_sum;
            count += cluster.count;
        }
        let model_confidence = confidence_sum / count as f32;
        let confidence = MODEL_WEIGHT * model_confidence + PATTERN_WEIGHT * unit.score;
        let label = &clusters[members[0]].label;
        let entity_type = if !config.prefer_model_labels && is_more_specific(&unit.entity_type, label)
        {
            unit.entity_type.clone()
        } else {
            label.clone()
        };
        fused.push(FusedEntity {
            start,
            end,
            entity_type,
            confidence: confidence.clamp(0.0, 1.0),
            text: slice_chars(text, start, end).to_string(),
            source: FusionSource::Fused,
        });
    }

    resolve_fused_overlaps(fused)
}

/// Keep the highest-confidence entity wherever spans still collide, e.g. a
/// pattern-only unit against a model-only cluster of a different label, or
/// two fused spans whose cluster unions grew into each other.
fn resolve_fused_overlaps(mut fused: Vec<FusedEntity>) -> Vec<FusedEntity> {
    fused.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.start.cmp(&b.start))
    });
    let mut kept: Vec<FusedEntity> = Vec::with_capacity(fused.len());
    for entity in fused {
        if kept.iter().any(|k| k.start < entity.end && entity.start < k.end) {
            debug!(
                start = entity.start,
                end = entity.end,
                entity_type = %entity.entity_type,
                "dropping overlapping fused entity"
            );
            continue;
        }
        kept.push(entity);
    }
    kept.sort_by_key(|e| (e.start, e.end));
    kept
}

fn cluster_fragments(fragments: &[ModelFragment], gap_tolerance: usize) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();
    for fragment in fragments {
        let label = normalize_label(&fragment.entity_type).to_string();
        let joinable = clusters.last_mut().filter(|c| {
            fragment.start <= c.end + gap_tolerance && c.label == label
        });
        match joinable {
            Some(cluster) => {
                cluster.end = cluster.end.max(fragment.end);
                cluster.confidence_sum += fragment.confidence;
                cluster.count += 1;
            }
            None => clusters.push(Cluster {
                start: fragment.start,
                end: fragment.end,
                label,
                confidence_sum: fragment.confidence,
                count: 1,
            }),
        }
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::find_semantic_units;
    use crate::domain::Language;
    use crate::patterns::PatternRegistry;

    fn fragment(start: usize, end: usize, label: &str, confidence: f32, text: &str) -> ModelFragment {
        ModelFragment::new(start, end, label.to_string(), confidence, slice_chars(text, start, end))
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("zipcode"), "postcode");
        assert_eq!(normalize_label("ZIP"), "postcode");
        assert_eq!(normalize_label("dni"), "national_id");
        assert_eq!(normalize_label("steuer_id"), "national_id");
        assert_eq!(normalize_label("phone"), "phone_number");
        assert_eq!(normalize_label("ssn"), "ssn");
        assert_eq!(normalize_label("custom_thing"), "custom_thing");
    }

    #[test]
    fn test_is_more_specific() {
        assert!(is_more_specific("dni", "national_id"));
        assert!(is_more_specific("codice_fiscale", "national_id"));
        assert!(!is_more_specific("national_id", "dni"));
        assert!(!is_more_specific("ssn", "npi"));
        assert!(!is_more_specific("national_id", "national_id"));
    }

    #[test]
    fn test_fragments_fuse_into_whole_ssn() {
        let registry = PatternRegistry::for_language(Language::English).unwrap();
        let text = "SSN: 123-45-6789";
        let units = find_semantic_units(text, registry.patterns());
        // A token model typically splits the SSN across pieces.
        let fragments = vec![
            fragment(5, 8, "ssn", 0.90, text),
            fragment(9, 11, "ssn", 0.85, text),
            fragment(12, 16, "ssn", 0.88, text),
        ];
        let fused =
            merge_entities_with_semantic_units(text, &fragments, &units, &FusionConfig::default());
        let ssn: Vec<_> = fused.iter().filter(|e| e.entity_type == "ssn").collect();
        assert_eq!(ssn.len(), 1);
        assert_eq!(ssn[0].text, "123-45-6789");
        assert_eq!(ssn[0].source, FusionSource::Fused);
        // 0.6 * mean(0.90, 0.85, 0.88) + 0.4 * pattern score
        assert!(ssn[0].confidence > 0.7);
    }

    #[test]
    fn test_split_clusters_fuse_into_one_entity() {
        let registry = PatternRegistry::for_language(Language::English).unwrap();
        let text = "SSN: 123-45-6789";
        let units = find_semantic_units(text, registry.patterns());
        // The model missed the middle group, leaving two clusters separated
        // by more than the gap tolerance; both corroborate the same unit.
        let fragments = vec![
            fragment(5, 8, "ssn", 0.90, text),
            fragment(12, 16, "ssn", 0.88, text),
        ];
        let fused =
            merge_entities_with_semantic_units(text, &fragments, &units, &FusionConfig::default());
        let ssn: Vec<_> = fused.iter().filter(|e| e.entity_type == "ssn").collect();
        assert_eq!(ssn.len(), 1);
        assert_eq!(ssn[0].text, "123-45-6789");
        assert_eq!(ssn[0].source, FusionSource::Fused);
        for pair in fused.windows(2) {
            assert!(pair[0].end <= pair[1].start, "overlapping fused entities");
        }
    }

    #[test]
    fn test_model_only_cluster_kept() {
        let text = "Seen by Dr. Garcia today";
        let fragments = vec![fragment(12, 18, "person", 0.95, text)];
        let fused = merge_entities_with_semantic_units(text, &fragments, &[], &FusionConfig::default());
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].source, FusionSource::Model);
        assert_eq!(fused[0].text, "Garcia");
        assert!((fused[0].confidence - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_standalone_units_emitted() {
        let registry = PatternRegistry::for_language(Language::English).unwrap();
        let text = "Reach me at test@example.com";
        let units = find_semantic_units(text, registry.patterns());
        let fused = merge_entities_with_semantic_units(text, &[], &units, &FusionConfig::default());
        assert!(fused.iter().any(|e| {
            e.entity_type == "email" && e.source == FusionSource::Pattern && e.text == "test@example.com"
        }));
    }

    #[test]
    fn test_standalone_units_suppressed_when_disabled() {
        let registry = PatternRegistry::for_language(Language::English).unwrap();
        let text = "Reach me at test@example.com";
        let units = find_semantic_units(text, registry.patterns());
        let config = FusionConfig {
            use_semantic_patterns: false,
            ..FusionConfig::default()
        };
        let fused = merge_entities_with_semantic_units(text, &[], &units, &config);
        assert!(fused.is_empty());
    }

    #[test]
    fn test_more_specific_pattern_label_wins() {
        let registry = PatternRegistry::for_language(Language::Spanish).unwrap();
        let text = "DNI: 12345678Z";
        let units = find_semantic_units(text, registry.patterns());
        let fragments = vec![fragment(5, 14, "national_id", 0.9, text)];
        let fused =
            merge_entities_with_semantic_units(text, &fragments, &units, &FusionConfig::default());
        // The catalog tags DNI matches as national_id directly, so the label
        // stays canonical either way; the fusion source must reflect the
        // corroboration.
        let dni = fused.iter().find(|e| e.text == "12345678Z").unwrap();
        assert_eq!(dni.source, FusionSource::Fused);
        assert_eq!(dni.entity_type, "national_id");
    }

    #[test]
    fn test_prefer_model_labels() {
        let text = "ID 12345678Z here";
        let fragments = vec![fragment(3, 12, "national_id", 0.9, text)];
        // Hand-built unit with a subtype label.
        let registry = PatternRegistry::from_toml(
            r#"
            [patterns.dni_sub]
            regex = '\b\d{8}[A-Za-z]\b'
            entity_type = "dni"
            priority = 10
            base_score = 0.5
            "#,
        )
        .unwrap();
        let units = find_semantic_units(text, registry.patterns());
        assert_eq!(units.len(), 1);

        let fused = merge_entities_with_semantic_units(
            text,
            &fragments,
            &units,
            &FusionConfig::default(),
        );
        assert_eq!(fused[0].entity_type, "dni");

        let config = FusionConfig {
            prefer_model_labels: true,
            ..FusionConfig::default()
        };
        let fused = merge_entities_with_semantic_units(text, &fragments, &units, &config);
        assert_eq!(fused[0].entity_type, "national_id");
    }

    #[test]
    fn test_degenerate_and_out_of_bounds_fragments_dropped() {
        let text = "short";
        let fragments = vec![
            ModelFragment::new(3, 3, "person", 0.9, String::new()),
            ModelFragment::new(10, 20, "person", 0.9, String::new()),
        ];
        let fused = merge_entities_with_semantic_units(text, &fragments, &[], &FusionConfig::default());
        assert!(fused.is_empty());
    }

    #[test]
    fn test_gap_tolerance_splits_distant_fragments() {
        let text = "John ..... Smith";
        let fragments = vec![
            fragment(0, 4, "person", 0.9, text),
            fragment(11, 16, "person", 0.9, text),
        ];
        let fused = merge_entities_with_semantic_units(text, &fragments, &[], &FusionConfig::default());
        assert_eq!(fused.len(), 2);

        let config = FusionConfig {
            gap_tolerance: 10,
            ..FusionConfig::default()
        };
        let fused = merge_entities_with_semantic_units(text, &fragments, &[], &config);
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].text, "John ..... Smith");
    }
}
