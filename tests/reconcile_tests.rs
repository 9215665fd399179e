//! Reconciliation properties over realistic tables.
//!
//! Covers ordering of candidate lists, duplicate claims, header handling on
//! both the reconcile and diagnostics paths, and the summary figures.

use name_recon::matching::diagnosis::{diagnose, diagnose_consuming};
use name_recon::matching::edit_distance;
use name_recon::rules::comparison_key;
use name_recon::{Annotation, Cell, Dataset, Reconciler, RuleSet};

fn catalog() -> Dataset {
    Dataset::from_text_rows([
        vec!["ATC1", "", "", "", "Corporation", "Manufacturer", "Name", "Tag"],
        vec!["", "", "", "", "Acme", "Acme Labs", "Paracetamol 500 mg", "N02BE01"],
        vec!["", "", "", "", "Acme", "Acme Labs", "Ibuprofen 400 mg", "M01AE01"],
        vec!["", "", "", "", "Beta", "Beta Pharma", "Aspirin Cardio 100", "B01AC06"],
        vec!["", "", "", "", "Beta", "Beta Pharma", "Amoxicillin 500", "J01CA04"],
        vec!["", "", "", "", "Gamma", "Gamma Inc", "Omeprazole 20", "A02BC01"],
    ])
}

fn inventory() -> Dataset {
    Dataset::from_text_rows([
        vec!["OTC3", "Corporation", "Manufacturer", "Name"],
        vec!["1", "Acme", "Acme Labs", "PARACETAMOL 500MG"],
        vec!["2", "Acme", "Acme Labs", "Ibuprofen x400 mg"],
        vec!["3", "Beta", "Beta Pharma", "Aspirin cardio 100"],
        vec!["4", "Acme", "Acme Labs", "Paracetamol 500 mg"],
        vec!["5", "Gamma", "Gamma Inc", "Omeprazol 20"],
    ])
}

fn rules() -> RuleSet {
    RuleSet::parse("/x(\\d)/g=$1\n/(\\d)([^\\d\\s])/g=$1 $2")
}

#[test]
fn test_full_reconciliation() {
    let target = catalog();
    let mut source = inventory();
    let rules = rules();

    let result = Reconciler::new(&rules).reconcile(&target, &mut source).unwrap();
    let tags: Vec<&str> = result.outcomes.iter().map(|o| o.matched_tag.as_str()).collect();
    assert_eq!(tags, vec!["N02BE01", "M01AE01", "B01AC06", "N02BE01", "A02BC01"]);

    // Rows 1-4 normalize to exact keys; "Omeprazol" is one letter short
    assert_eq!(result.summary.exact_count, 4);
    assert_eq!(result.summary.uncertain_count, 1);
    assert_eq!(result.summary.average_uncertain_distance, Some(1));

    // Row 4 claims paracetamol after row 1 did
    assert_eq!(result.outcomes[0].annotation, Annotation::None);
    assert_eq!(result.outcomes[3].annotation, Annotation::Duplicate);
    assert_eq!(source.records()[3][7].to_string(), "duplicate");

    let shortlist = source.records()[4][8].to_string();
    assert!(shortlist.starts_with("Omeprazole 20 (A02BC01); "));
}

#[test]
fn test_candidate_lists_are_sorted() {
    let target = catalog();
    let mut source = inventory();
    let rules = RuleSet::default();

    let result = Reconciler::new(&rules).reconcile(&target, &mut source).unwrap();
    for outcome in &result.outcomes {
        if let Some(candidates) = &outcome.candidates {
            assert_eq!(candidates.len(), 5);
            assert!(candidates.windows(2).all(|w| w[0].distance <= w[1].distance));
            assert_eq!(candidates[0].distance, outcome.distance);
        } else {
            assert_eq!(outcome.distance, 0);
        }
    }
}

#[test]
fn test_duplicates_flagged_regardless_of_distance() {
    let target = Dataset::from_text_rows([
        vec!["h", "", "", "", "c", "m", "n", "t"],
        vec!["", "", "", "", "c", "m", "solo", "S"],
    ]);
    let mut source = Dataset::from_text_rows([
        vec!["h", "c", "m", "n"],
        vec!["1", "c", "m", "sole"],
        vec!["2", "c", "m", "solo"],
        vec!["3", "c", "m", "something else"],
    ]);

    let rules = RuleSet::default();
    let result = Reconciler::new(&rules).reconcile(&target, &mut source).unwrap();
    let annotations: Vec<_> = result.outcomes.iter().map(|o| o.annotation).collect();
    assert_eq!(
        annotations,
        vec![Annotation::None, Annotation::Duplicate, Annotation::Duplicate]
    );
    // The exact match is still counted as exact
    assert_eq!(result.summary.exact_count, 1);
    assert_eq!(result.summary.uncertain_count, 2);
}

#[test]
fn test_reconcile_preserves_headers_diagnose_consumes_them() {
    let mut target = catalog();
    let mut source = inventory();
    let (target_rows, source_rows) = (target.len(), source.len());
    let rules = rules();

    Reconciler::new(&rules).reconcile(&target, &mut source).unwrap();
    assert_eq!(target.len(), target_rows);
    assert_eq!(source.len(), source_rows);
    assert_eq!(source.header().map(|h| h[0].to_string()), Some("OTC3".to_string()));

    // The read-only trace leaves both tables alone
    let trace = diagnose(&target, &source, &rules);
    assert_eq!(trace.entries.len(), target_rows - 1 + source_rows - 1);
    assert_eq!(target.len(), target_rows);

    // The single-use trace consumes one header row from each
    let consumed = diagnose_consuming(&mut target, &mut source, &rules);
    assert_eq!(consumed.entries.len(), trace.entries.len());
    assert_eq!(target.len(), target_rows - 1);
    assert_eq!(source.len(), source_rows - 1);
}

#[test]
fn test_trace_matches_reconciler_keys() {
    let target = catalog();
    let source = inventory();
    let rules = rules();

    let trace = diagnose(&target, &source, &rules);
    for entry in &trace.entries {
        assert_eq!(entry.key, comparison_key(&entry.original, &rules));
    }
    assert_eq!(trace.entries[5].original, "PARACETAMOL 500MG");
    assert_eq!(trace.entries[5].key, "paracetamol 500 mg");
}

#[test]
fn test_empty_rules_key_is_lowercased_raw_value() {
    let rules = RuleSet::parse("");
    for raw in ["Acme Corp", "ÉCOLE 12", "mixed Case-Name", ""] {
        assert_eq!(comparison_key(raw, &rules), raw.to_lowercase());
    }
}

#[test]
fn test_literal_rule_example() {
    // Literal patterns are case-sensitive: lowercase "acme" misses "Acme"
    let rules = RuleSet::parse("acme=ACME");
    assert_eq!(name_recon::rules::apply_rules("Acme Corp", &rules), "Acme Corp");

    let rules = RuleSet::parse("Acme=ACME");
    assert_eq!(name_recon::rules::apply_rules("Acme Corp", &rules), "ACME Corp");
    assert_eq!(comparison_key("Acme Corp", &rules), "acme corp");
}

#[test]
fn test_edit_distance_symmetry() {
    let names = ["paracetamol 500 mg", "paracetamol 500mg", "ibuprofen", "", "x"];
    for a in names {
        assert_eq!(edit_distance(a, a), 0);
        for b in names {
            assert_eq!(edit_distance(a, b), edit_distance(b, a));
        }
    }
}

#[test]
fn test_annotated_rows_are_padded() {
    let target = catalog();
    let mut source = inventory();
    let rules = RuleSet::default();

    Reconciler::new(&rules).reconcile(&target, &mut source).unwrap();
    for record in source.records() {
        assert_eq!(record.len(), 9);
    }
    // Header row is not padded
    assert_eq!(source.header().map(Vec::len), Some(4));
    assert!(matches!(source.records()[0][6], Cell::Number(_)));
}
