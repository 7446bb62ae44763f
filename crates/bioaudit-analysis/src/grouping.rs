//! Split a dataset's numeric column by a categorical field.

use std::collections::BTreeMap;

use bioaudit_core::errors::{AnalysisError, Component};
use bioaudit_core::types::{CategoricalField, Dataset, NumericField};

use crate::advisory::Advisory;

/// Values of one category, in dataset order.
#[derive(Debug, Clone)]
pub struct Group {
    pub ordinal: usize,
    pub label: &'static str,
    pub values: Vec<f64>,
    /// Positions of the contributing records in the dataset.
    pub indices: Vec<usize>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Collect the observed groups, ordered by category.
///
/// Fails with `MissingValue` when a record has no value for `field`.
pub fn collect(
    dataset: &Dataset,
    by: CategoricalField,
    field: &NumericField,
    component: Component,
) -> Result<Vec<Group>, AnalysisError> {
    let mut groups: BTreeMap<usize, Group> = BTreeMap::new();
    for (idx, record) in dataset.iter().enumerate() {
        let value = field
            .value_of(record)
            .ok_or_else(|| AnalysisError::MissingValue {
                component,
                record_id: record.id.to_string(),
                field: field.name().to_string(),
            })?;
        let (ordinal, label) = by.category_of(record);
        let group = groups.entry(ordinal).or_insert_with(|| Group {
            ordinal,
            label,
            values: Vec::new(),
            indices: Vec::new(),
        });
        group.values.push(value);
        group.indices.push(idx);
    }
    Ok(groups.into_values().collect())
}

/// Groups that entered a k-sample test, plus advisories for the ones left out.
#[derive(Debug, Clone)]
pub struct Partition {
    pub kept: Vec<Group>,
    pub advisories: Vec<Advisory>,
}

impl Partition {
    pub fn sample_size(&self) -> usize {
        self.kept.iter().map(Group::len).sum()
    }
}

/// Drop groups smaller than `min_group_size`; at least two groups must remain.
pub fn partition(
    groups: Vec<Group>,
    min_group_size: usize,
    component: Component,
) -> Result<Partition, AnalysisError> {
    let mut kept = Vec::new();
    let mut advisories = Vec::new();
    for group in groups {
        if group.len() < min_group_size {
            tracing::warn!(
                component = %component,
                group = group.label,
                size = group.len(),
                "group excluded: too few records"
            );
            advisories.push(Advisory::GroupExcluded {
                group: group.label.to_string(),
                size: group.len(),
                minimum: min_group_size,
            });
        } else {
            kept.push(group);
        }
    }

    if kept.len() < 2 {
        let mut reason = format!(
            "{} group{} remain{} after exclusion, minimum 2 required",
            kept.len(),
            if kept.len() == 1 { "" } else { "s" },
            if kept.len() == 1 { "s" } else { "" },
        );
        if !advisories.is_empty() {
            let excluded: Vec<String> = advisories.iter().map(ToString::to_string).collect();
            reason.push_str(&format!(" (excluded: {})", excluded.join("; ")));
        }
        return Err(AnalysisError::insufficient(component, reason));
    }

    Ok(Partition { kept, advisories })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bioaudit_core::types::{AgeGroup, Record};

    fn dataset(rows: &[(AgeGroup, f64)]) -> Dataset {
        Dataset::new(
            rows.iter()
                .enumerate()
                .map(|(i, (g, s))| Record::new(i as u64, *g, *s).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_collect_orders_by_category() {
        let ds = dataset(&[
            (AgeGroup::Elderly, 40.0),
            (AgeGroup::Child, 60.0),
            (AgeGroup::Elderly, 45.0),
        ]);
        let groups = collect(
            &ds,
            CategoricalField::AgeGroup,
            &NumericField::QualityScore,
            Component::GroupMeanTest,
        )
        .unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "0-5");
        assert_eq!(groups[1].values, vec![40.0, 45.0]);
        assert_eq!(groups[1].indices, vec![0, 2]);
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let ds = dataset(&[(AgeGroup::Child, 60.0)]);
        let err = collect(
            &ds,
            CategoricalField::AgeGroup,
            &NumericField::Age,
            Component::GroupMeanTest,
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingValue { .. }));
    }

    #[test]
    fn test_partition_excludes_small_groups() {
        let ds = dataset(&[
            (AgeGroup::Child, 60.0),
            (AgeGroup::Youth, 50.0),
            (AgeGroup::Youth, 55.0),
            (AgeGroup::Elderly, 30.0),
            (AgeGroup::Elderly, 35.0),
        ]);
        let groups = collect(
            &ds,
            CategoricalField::AgeGroup,
            &NumericField::QualityScore,
            Component::GroupMeanTest,
        )
        .unwrap();
        let p = partition(groups, 2, Component::GroupMeanTest).unwrap();
        assert_eq!(p.kept.len(), 2);
        assert_eq!(p.sample_size(), 4);
        assert_eq!(
            p.advisories,
            vec![Advisory::GroupExcluded {
                group: "0-5".into(),
                size: 1,
                minimum: 2
            }]
        );
    }

    #[test]
    fn test_partition_fails_with_one_group_left() {
        let ds = dataset(&[
            (AgeGroup::Child, 60.0),
            (AgeGroup::Youth, 50.0),
            (AgeGroup::Youth, 55.0),
        ]);
        let groups = collect(
            &ds,
            CategoricalField::AgeGroup,
            &NumericField::QualityScore,
            Component::GroupMeanTest,
        )
        .unwrap();
        let err = partition(groups, 2, Component::GroupMeanTest).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("GroupMeanTest"), "{msg}");
        assert!(msg.contains("group '0-5' has 1 record, minimum 2 required"), "{msg}");
    }
}
