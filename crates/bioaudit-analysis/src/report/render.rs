//! Plain-text rendering of a report.

use super::aggregator::Report;
use super::slot::Slot;
use crate::anomaly::{EnsembleOutcome, ZScoreOutcome};
use crate::hypothesis::TestResult;

const RULE: &str = "────────────────────────────────────────────────────────────";

/// Render the consolidated human-readable summary.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();

    out.push_str("╔══════════════════════════════════════════════════════════╗\n");
    out.push_str("║           Statistical Evidence & Anomaly Report          ║\n");
    out.push_str("╚══════════════════════════════════════════════════════════╝\n\n");

    for (n, slot) in [&report.chi_square, &report.anova, &report.kruskal]
        .into_iter()
        .enumerate()
    {
        write_test(&mut out, n + 1, slot);
    }
    write_ensemble(&mut out, &report.ensemble);
    write_zscore(&mut out, &report.zscore);

    if let Some(a) = &report.agreement {
        out.push_str("Detector agreement\n");
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&format!(
            "  both:          {:>6} ({:.1}%)\n",
            a.both,
            100.0 * a.both_fraction,
        ));
        out.push_str(&format!(
            "  ensemble only: {:>6} ({:.1}%)\n",
            a.ensemble_only,
            100.0 * a.ensemble_only_fraction,
        ));
        out.push_str(&format!(
            "  z-score only:  {:>6} ({:.1}%)\n",
            a.zscore_only,
            100.0 * a.zscore_only_fraction,
        ));
        out.push_str(&format!(
            "  neither:       {:>6} ({:.1}%)\n\n",
            a.neither,
            100.0 * a.neither_fraction,
        ));
    }

    out.push_str("Overall conclusion\n");
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("  {}\n", report.verdict));
    out.push_str(&format!("  {}\n", report.conclusion));
    for (i, rec) in report.recommendations.iter().enumerate() {
        out.push_str(&format!("    {}. {rec}\n", i + 1));
    }
    out
}

fn write_unavailable(out: &mut String, reason: &str) {
    out.push_str(&format!("  Unavailable: {reason}\n\n"));
}

fn write_test(out: &mut String, n: usize, slot: &Slot<TestResult>) {
    match slot {
        Slot::Available(t) => {
            out.push_str(&format!("{n}. {}\n", t.test.title()));
            out.push_str(RULE);
            out.push('\n');
            out.push_str(&format!(
                "  Result:  {}\n",
                if t.significant { "SIGNIFICANT" } else { "NOT SIGNIFICANT" },
            ));
            out.push_str(&format!("  Statistic: {:.4}\n", t.statistic));
            out.push_str(&format!("  P-value: {:.6} (alpha {})\n", t.p_value, t.alpha));
            out.push_str(&format!(
                "  Effect size: {:.4} ({:?})\n",
                t.effect_size,
                t.effect_size_kind,
            ));
            for g in &t.group_statistics {
                out.push_str(&format!("    {:<8} n={:<6} {:.2}\n", g.group, g.n, g.value));
            }
            for a in &t.advisories {
                out.push_str(&format!("  ⚠ {a}\n"));
            }
            out.push('\n');
        }
        Slot::Unavailable {
            component, reason, ..
        } => {
            out.push_str(&format!("{n}. {component}\n"));
            out.push_str(RULE);
            out.push('\n');
            write_unavailable(out, reason);
        }
    }
}

fn write_ensemble(out: &mut String, slot: &Slot<EnsembleOutcome>) {
    out.push_str("4. Ensemble outlier scorer (isolation forest)\n");
    out.push_str(RULE);
    out.push('\n');
    match slot {
        Slot::Available(e) => {
            out.push_str(&format!(
                "  Anomalies: {} ({:.2}%), threshold {:.4}\n",
                e.totals.flagged,
                e.totals.anomaly_rate,
                e.threshold,
            ));
            out.push_str(&format!("  Unusually high: {}\n", e.totals.high));
            out.push_str(&format!("  Unusually low:  {}\n", e.totals.low));
            out.push_str(&format!(
                "  Features: {} ({} trees, seed {})\n\n",
                e.features_used.join(", "),
                e.n_trees,
                e.seed,
            ));
        }
        Slot::Unavailable { reason, .. } => write_unavailable(out, reason),
    }
}

fn write_zscore(out: &mut String, slot: &Slot<ZScoreOutcome>) {
    out.push_str("5. Per-group z-score detector\n");
    out.push_str(RULE);
    out.push('\n');
    match slot {
        Slot::Available(z) => {
            out.push_str(&format!(
                "  Anomalies: {} ({:.2}%), threshold ±{}σ\n",
                z.totals.flagged,
                z.totals.anomaly_rate,
                z.threshold_std,
            ));
            for g in &z.groups {
                out.push_str(&format!(
                    "    {:<8} n={:<6} high={:<4} low={:<4} {:.2}%{}\n",
                    g.group,
                    g.n,
                    g.n_high,
                    g.n_low,
                    g.anomaly_rate,
                    if g.degenerate { " (degenerate)" } else { "" },
                ));
            }
            for a in &z.advisories {
                out.push_str(&format!("  ⚠ {a}\n"));
            }
            out.push('\n');
        }
        Slot::Unavailable { reason, .. } => write_unavailable(out, reason),
    }
}
