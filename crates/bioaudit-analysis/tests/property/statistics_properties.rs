use bioaudit_analysis::contingency::ContingencyTable;
use bioaudit_analysis::hypothesis::anova::decompose;
use bioaudit_analysis::hypothesis::chi_square::test_independence;
use bioaudit_analysis::hypothesis::kruskal::h_statistic;
use bioaudit_core::config::HypothesisConfig;
use proptest::prelude::*;

fn labels(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}{i}")).collect()
}

fn arb_counts() -> impl Strategy<Value = Vec<Vec<u64>>> {
    (2usize..6, 2usize..6).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop::collection::vec(1u64..60, cols), rows)
    })
}

fn table(counts: Vec<Vec<u64>>) -> ContingencyTable {
    let rows = counts.len();
    let cols = counts[0].len();
    ContingencyTable::from_counts(labels("r", rows), labels("c", cols), counts).unwrap()
}

fn arb_groups() -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(prop::collection::vec(0.0f64..100.0, 1..15), 2..6)
}

/// Groups whose pooled values are all distinct.
fn arb_untied_groups() -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(2usize..8, 2..5).prop_flat_map(|sizes| {
        let n: usize = sizes.iter().sum();
        (Just(sizes), Just((0..n).collect::<Vec<usize>>()).prop_shuffle()).prop_map(
            |(sizes, values)| {
                let mut groups: Vec<Vec<f64>> = Vec::new();
                let mut offset = 0;
                for size in sizes {
                    groups.push(
                        values[offset..offset + size]
                            .iter()
                            .map(|&v| v as f64)
                            .collect(),
                    );
                    offset += size;
                }
                groups
            },
        )
    })
}

// ── Expected counts preserve marginals ───────────────────────────────────

proptest! {
    #[test]
    fn expected_counts_preserve_marginals(counts in arb_counts()) {
        let t = table(counts);
        let expected = t.expected_counts();
        for (r, row) in expected.iter().enumerate() {
            let sum: f64 = row.iter().sum();
            prop_assert!((sum - t.row_totals[r] as f64).abs() < 1e-6);
        }
        for c in 0..t.n_cols() {
            let sum: f64 = expected.iter().map(|row| row[c]).sum();
            prop_assert!((sum - t.col_totals[c] as f64).abs() < 1e-6);
        }
    }
}

// ── Chi-square is invariant under row/column permutation ────────────────

proptest! {
    #[test]
    fn chi_square_permutation_invariant(counts in arb_counts(), shift in 0usize..5) {
        let config = HypothesisConfig::default();
        let baseline = test_independence(&table(counts.clone()), &config);

        let mut permuted: Vec<Vec<u64>> = counts.into_iter().rev().collect();
        for row in permuted.iter_mut() {
            let k = shift % row.len();
            row.rotate_left(k);
        }
        let permuted = test_independence(&table(permuted), &config);

        let tol = 1e-9 * baseline.statistic.abs().max(1.0);
        prop_assert!((baseline.statistic - permuted.statistic).abs() < tol);
        prop_assert!((baseline.p_value - permuted.p_value).abs() < 1e-9);
        prop_assert!((0.0..=1.0).contains(&baseline.p_value));
    }
}

// ── ANOVA: SSB + SSW = SST ───────────────────────────────────────────────

proptest! {
    #[test]
    fn anova_sum_of_squares_adds_up(groups in arb_groups()) {
        let d = decompose(&groups);
        let tol = 1e-7 * d.ss_total.max(1.0);
        prop_assert!((d.ss_between + d.ss_within - d.ss_total).abs() < tol);
        prop_assert!(d.ss_between >= 0.0 && d.ss_within >= 0.0);
    }
}

// ── Kruskal-Wallis ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn kruskal_untied_matches_rank_sum_formula(groups in arb_untied_groups()) {
        let h = h_statistic(&groups);
        prop_assert_eq!(h.tie_correction, 1.0);

        // H = 12 / (N(N+1)) Σ R_g² / n_g − 3(N+1), with ranks = value + 1.
        let n: f64 = groups.iter().map(|g| g.len() as f64).sum();
        let rank_term: f64 = groups
            .iter()
            .map(|g| {
                let r: f64 = g.iter().map(|v| v + 1.0).sum();
                r * r / g.len() as f64
            })
            .sum();
        let want = 12.0 / (n * (n + 1.0)) * rank_term - 3.0 * (n + 1.0);
        prop_assert!((h.corrected - want).abs() < 1e-9);
    }

    #[test]
    fn kruskal_tie_correction_relation(
        raw in prop::collection::vec(prop::collection::vec(0u8..5, 2..10), 2..5)
    ) {
        let groups: Vec<Vec<f64>> = raw
            .into_iter()
            .map(|g| g.into_iter().map(f64::from).collect())
            .collect();
        let h = h_statistic(&groups);
        prop_assert!(h.tie_correction <= 1.0);
        if h.tie_correction > 0.0 {
            prop_assert!((h.corrected * h.tie_correction - h.uncorrected).abs() < 1e-9);
            prop_assert!(h.corrected + 1e-12 >= h.uncorrected);
        } else {
            prop_assert_eq!(h.corrected, 0.0);
        }
    }
}
