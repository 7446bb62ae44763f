//! End-to-end runs of the evidence engine.

use bioaudit_analysis::anomaly::Direction;
use bioaudit_analysis::report::Slot;
use bioaudit_analysis::{flatten, EvidenceEngine, Verdict};
use bioaudit_core::config::{AnomalyConfig, BioauditConfig};
use bioaudit_core::errors::Component;
use bioaudit_core::types::{Dataset, Record};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde_json::json;

const INJECTED: [&str; 3] = ["c-low-0", "c-low-1", "c-low-2"];

/// Three groups of 40: young adults and middle age around 72-75, elderly
/// 20 points lower, with three extreme lows injected into the elderly group.
fn three_groups() -> Dataset {
    let mut rng = StdRng::seed_from_u64(7);
    let mut records = Vec::new();
    let groups = [("a", 19.0..41.0, 75.0), ("b", 41.0..61.0, 72.0), ("c", 61.0..119.0, 52.0)];
    for (name, ages, mean) in groups {
        let normal = Normal::new(mean, 8.0).unwrap();
        let n = if name == "c" { 37 } else { 40 };
        for i in 0..n {
            let age = rng.gen_range(ages.clone());
            let score: f64 = normal.sample(&mut rng);
            records.push(Record::from_age(format!("{name}-{i}"), age, score.clamp(0.0, 100.0)).unwrap());
        }
    }
    for id in INJECTED {
        let age = rng.gen_range(61.0..119.0);
        records.push(Record::from_age(id, age, 0.0).unwrap());
    }
    Dataset::new(records).unwrap()
}

fn engine_with_trees(n_trees: usize) -> EvidenceEngine {
    EvidenceEngine::new(BioauditConfig {
        anomaly: AnomalyConfig {
            n_trees: Some(n_trees),
            ..AnomalyConfig::default()
        },
        ..BioauditConfig::default()
    })
}

#[test]
fn test_all_tests_detect_lower_group() {
    let run = engine_with_trees(50).run(&three_groups());
    let report = &run.report;

    assert_eq!(report.tests_available, 3);
    for t in report.available_tests() {
        assert!(t.p_value < 0.05, "{} p = {}", t.test, t.p_value);
    }
    assert_eq!(report.verdict, Verdict::StrongEvidence);
    assert_eq!(report.recommendations.len(), 4);

    let summary = run.summary.as_available().unwrap();
    assert_eq!(summary.worst_group, "60+");
    assert!(summary.gap > 15.0);

    let distribution = run.distribution.as_available().unwrap();
    assert_eq!(distribution.total, 120);
    assert_eq!(distribution.groups.iter().map(|g| g.count).sum::<usize>(), 120);

    // Quality falls with age across the three groups.
    let correlation = run.correlation.as_available().unwrap();
    assert!(correlation.get("age", "quality_score").unwrap() < 0.0);
}

#[test]
fn test_injected_lows_flagged_low() {
    let run = engine_with_trees(50).run(&three_groups());
    let zscore = run.report.zscore.as_available().unwrap();

    let flagged_low = zscore
        .results
        .iter()
        .filter(|r| INJECTED.contains(&r.record_id.as_str()))
        .filter(|r| r.flagged && r.direction == Direction::Low)
        .count();
    assert!(flagged_low >= 2, "only {flagged_low} of 3 injected lows flagged");

    let ensemble = run.report.ensemble.as_available().unwrap();
    let mut scores: Vec<f64> = ensemble.results.iter().map(|r| r.score).collect();
    scores.sort_by(f64::total_cmp);
    let median = scores[scores.len() / 2];
    for r in ensemble
        .results
        .iter()
        .filter(|r| INJECTED.contains(&r.record_id.as_str()))
    {
        assert!(r.score > median, "{} scored {}", r.record_id, r.score);
    }

    let agreement = run.report.agreement.unwrap();
    assert_eq!(agreement.total, 120);
    assert_eq!(
        agreement.both + agreement.ensemble_only + agreement.zscore_only + agreement.neither,
        120
    );
}

#[test]
fn test_ensemble_unavailable_when_too_few_records() {
    // 120 records cannot feed the default 100 trees.
    let run = EvidenceEngine::default().run(&three_groups());
    match &run.report.ensemble {
        Slot::Unavailable { component, code, .. } => {
            assert_eq!(*component, Component::EnsembleOutlierScorer);
            assert_eq!(code, "INSUFFICIENT_DATA");
        }
        Slot::Available(_) => panic!("ensemble should be unavailable"),
    }
    assert!(run.report.agreement.is_none());
    assert!(run.report.zscore.is_available());
    assert_eq!(run.report.verdict, Verdict::StrongEvidence);
}

#[test]
fn test_failed_test_excluded_from_verdict() {
    // Every score is Fair, so the contingency table has a single column.
    let mut records = Vec::new();
    for i in 0..10u64 {
        records.push(Record::from_age(format!("kid-{i}"), 3.0, 42.0 + (i % 5) as f64).unwrap());
        records.push(Record::from_age(format!("old-{i}"), 70.0, 54.0 + (i % 5) as f64).unwrap());
    }
    let run = EvidenceEngine::default().run(&Dataset::new(records).unwrap());
    let report = &run.report;

    match &report.chi_square {
        Slot::Unavailable { component, reason, .. } => {
            assert_eq!(*component, Component::ContingencyBuilder);
            assert!(reason.contains("minimum 2"));
        }
        Slot::Available(_) => panic!("chi-square should be unavailable"),
    }
    assert_eq!(report.tests_available, 2);
    assert_eq!(report.verdict, Verdict::StrongEvidence);
}

#[test]
fn test_empty_dataset_never_panics() {
    let run = EvidenceEngine::default().run(&Dataset::new(Vec::new()).unwrap());
    assert_eq!(run.report.verdict, Verdict::Unavailable);
    assert!(!run.summary.is_available());
    assert!(!run.distribution.is_available());
    assert!(!run.correlation.is_available());
    assert!(!run.screen.is_available());
    let text = run.render_text();
    assert!(text.contains("No verdict — no test available"));
    assert!(text.contains("IQR screen unavailable: [IqrScreen] insufficient data"));
    assert!(text.contains("Unavailable: [EnsembleOutlierScorer]"));
    assert!(!text.contains("{reason}"));
}

#[test]
fn test_run_is_reproducible_and_flattens() {
    let ds = three_groups();
    let engine = engine_with_trees(50);
    let a = engine.run(&ds);
    let b = engine.run(&ds);
    assert_eq!(a, b);

    let flat = flatten(&a).unwrap();
    assert_eq!(flat["report.verdict"], json!("StrongEvidence"));
    assert_eq!(flat["report.anova.status"], json!("available"));
    assert_eq!(flat["report.ensemble.seed"], json!(42));
    assert!(flat.contains_key("summary.groups.0.mean"));
    assert!(flat.contains_key("distribution.largest_group"));
    assert_eq!(flat["correlation.columns"], json!(["age", "quality_score"]));
    assert!(flat.keys().all(|k| !k.is_empty()));
}

#[test]
fn test_render_text_mentions_every_component() {
    let text = engine_with_trees(50).run(&three_groups()).render_text();
    for needle in [
        "Age distribution (120 records)",
        "Quality by age group",
        "Correlation over age, quality_score",
        "IQR screen",
        "Chi-Square Test of Independence",
        "One-Way ANOVA",
        "Kruskal-Wallis H Test",
        "isolation forest",
        "z-score",
        "Detector agreement",
        "Strong evidence — all tests agree",
    ] {
        assert!(text.contains(needle), "missing {needle}");
    }
}
