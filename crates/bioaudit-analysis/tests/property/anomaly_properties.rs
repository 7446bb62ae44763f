use bioaudit_analysis::anomaly::zscore::score_values;
use bioaudit_analysis::anomaly::{Direction, EnsembleOutlierScorer, EnsembleParams};
use bioaudit_core::types::{Dataset, NumericField, Record};
use proptest::prelude::*;

fn arb_dataset() -> impl Strategy<Value = Dataset> {
    prop::collection::vec((0.0f64..119.0, 0.0f64..100.0), 20..80).prop_map(|rows| {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, (age, score))| Record::from_age(i as u64, age, score).unwrap())
            .collect();
        Dataset::new(records).unwrap()
    })
}

fn scorer(contamination: f64, seed: u64) -> EnsembleOutlierScorer {
    EnsembleOutlierScorer::new(
        vec![NumericField::Age, NumericField::QualityScore],
        EnsembleParams {
            contamination,
            n_trees: 10,
            max_samples: 64,
            seed,
            standardize: true,
        },
    )
}

// ── Ensemble determinism ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn ensemble_is_deterministic(ds in arb_dataset(), seed in any::<u64>()) {
        let a = scorer(0.05, seed).score(&ds).unwrap();
        let b = scorer(0.05, seed).score(&ds).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn raising_contamination_never_shrinks_flags(ds in arb_dataset(), seed in any::<u64>()) {
        let low = scorer(0.05, seed).score(&ds).unwrap();
        let high = scorer(0.10, seed).score(&ds).unwrap();
        prop_assert!(high.totals.flagged >= low.totals.flagged);
        for (l, h) in low.results.iter().zip(&high.results) {
            prop_assert_eq!(l.score, h.score);
            prop_assert!(!l.flagged || h.flagged);
        }
    }

    #[test]
    fn ensemble_scores_in_unit_interval(ds in arb_dataset(), seed in any::<u64>()) {
        let out = scorer(0.05, seed).score(&ds).unwrap();
        prop_assert_eq!(out.results.len(), ds.len());
        for r in &out.results {
            prop_assert!(r.score > 0.0 && r.score <= 1.0);
            prop_assert_eq!(r.flagged, r.direction != Direction::Normal);
        }
    }
}

// ── Per-group z-score ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn zscores_centre_on_zero(values in prop::collection::vec(0.0f64..100.0, 2..50)) {
        let s = score_values(&values, 2.0);
        if !s.degenerate {
            let sum: f64 = s.z_scores.iter().sum();
            prop_assert!(sum.abs() < 1e-6);
        } else {
            prop_assert!(s.z_scores.iter().all(|&z| z == 0.0));
        }
    }

    #[test]
    fn zscore_flags_respect_threshold(
        values in prop::collection::vec(0.0f64..100.0, 2..50),
        threshold in 0.5f64..3.0,
    ) {
        let s = score_values(&values, threshold);
        for (z, d) in s.z_scores.iter().zip(&s.directions) {
            match d {
                Direction::High => prop_assert!(*z > threshold),
                Direction::Low => prop_assert!(*z < -threshold),
                Direction::Normal => prop_assert!(z.abs() <= threshold),
            }
        }
    }
}
