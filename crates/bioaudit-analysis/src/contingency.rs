//! Contingency Builder: cross-tabulate two categorical fields.
//!
//! Only observed categories appear; a category with no records is omitted,
//! never padded with a zero row or column.

use std::collections::BTreeMap;

use serde::Serialize;

use bioaudit_core::errors::{AnalysisError, Component};
use bioaudit_core::types::{CategoricalField, Dataset};

/// Observed frequencies with marginal totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContingencyTable {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// `counts[r][c]`.
    pub counts: Vec<Vec<u64>>,
    pub row_totals: Vec<u64>,
    pub col_totals: Vec<u64>,
    pub grand_total: u64,
}

impl ContingencyTable {
    /// Cross-tabulate `rows` × `cols` over the dataset.
    pub fn from_dataset(
        dataset: &Dataset,
        rows: CategoricalField,
        cols: CategoricalField,
    ) -> Result<Self, AnalysisError> {
        let mut row_keys: BTreeMap<usize, &'static str> = BTreeMap::new();
        let mut col_keys: BTreeMap<usize, &'static str> = BTreeMap::new();
        let mut cells: BTreeMap<(usize, usize), u64> = BTreeMap::new();

        for record in dataset {
            let (r, r_label) = rows.category_of(record);
            let (c, c_label) = cols.category_of(record);
            row_keys.insert(r, r_label);
            col_keys.insert(c, c_label);
            *cells.entry((r, c)).or_insert(0) += 1;
        }

        let counts = row_keys
            .keys()
            .map(|r| {
                col_keys
                    .keys()
                    .map(|c| cells.get(&(*r, *c)).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        let table = Self::from_counts(
            row_keys.values().map(|s| s.to_string()).collect(),
            col_keys.values().map(|s| s.to_string()).collect(),
            counts,
        )?;
        tracing::debug!(
            rows = %rows,
            cols = %cols,
            shape = ?(table.n_rows(), table.n_cols()),
            total = table.grand_total,
            "contingency table built"
        );
        Ok(table)
    }

    /// Build a table from raw counts. All-zero rows and columns are dropped.
    pub fn from_counts(
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        counts: Vec<Vec<u64>>,
    ) -> Result<Self, AnalysisError> {
        if counts.len() != row_labels.len() || counts.iter().any(|r| r.len() != col_labels.len())
        {
            return Err(AnalysisError::invalid(
                Component::ContingencyBuilder,
                "counts",
                format!(
                    "shape does not match {} row labels x {} column labels",
                    row_labels.len(),
                    col_labels.len()
                ),
            ));
        }

        let keep_rows: Vec<usize> = (0..row_labels.len())
            .filter(|&r| counts[r].iter().any(|&n| n > 0))
            .collect();
        let keep_cols: Vec<usize> = (0..col_labels.len())
            .filter(|&c| counts.iter().any(|row| row[c] > 0))
            .collect();

        if keep_rows.len() < 2 || keep_cols.len() < 2 {
            return Err(AnalysisError::insufficient(
                Component::ContingencyBuilder,
                format!(
                    "table has {} observed row categor{} and {} observed column categor{}, minimum 2 each required",
                    keep_rows.len(),
                    if keep_rows.len() == 1 { "y" } else { "ies" },
                    keep_cols.len(),
                    if keep_cols.len() == 1 { "y" } else { "ies" },
                ),
            ));
        }

        let counts: Vec<Vec<u64>> = keep_rows
            .iter()
            .map(|&r| keep_cols.iter().map(|&c| counts[r][c]).collect())
            .collect();
        let row_totals: Vec<u64> = counts.iter().map(|row| row.iter().sum()).collect();
        let col_totals: Vec<u64> = (0..keep_cols.len())
            .map(|c| counts.iter().map(|row| row[c]).sum())
            .collect();
        let grand_total = row_totals.iter().sum();

        Ok(Self {
            row_labels: keep_rows.iter().map(|&r| row_labels[r].clone()).collect(),
            col_labels: keep_cols.iter().map(|&c| col_labels[c].clone()).collect(),
            counts,
            row_totals,
            col_totals,
            grand_total,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.row_labels.len()
    }

    pub fn n_cols(&self) -> usize {
        self.col_labels.len()
    }

    /// Expected counts under independence: row_total × col_total / grand_total.
    pub fn expected_counts(&self) -> Vec<Vec<f64>> {
        let n = self.grand_total as f64;
        self.row_totals
            .iter()
            .map(|&rt| {
                self.col_totals
                    .iter()
                    .map(|&ct| rt as f64 * ct as f64 / n)
                    .collect()
            })
            .collect()
    }

    /// Row-normalised distribution in percent (each row sums to 100).
    pub fn row_percentages(&self) -> Vec<Vec<f64>> {
        self.counts
            .iter()
            .zip(&self.row_totals)
            .map(|(row, &total)| {
                row.iter()
                    .map(|&n| 100.0 * n as f64 / total as f64)
                    .collect()
            })
            .collect()
    }
}
