//! Dataset container grouping sample records by experimental group.

use std::collections::BTreeMap;

use crate::error::{PorescopeError, Result};
use crate::record::{GroupLabel, SampleRecord};

/// Collection of sample records, organized by group label.
///
/// Within a group, sample ids are unique; records keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Map from group label -> records in insertion order
    groups: BTreeMap<GroupLabel, Vec<SampleRecord>>,
}

impl Dataset {
    /// Creates a new empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dataset from records, rejecting duplicate ids within a group.
    pub fn from_records(records: impl IntoIterator<Item = SampleRecord>) -> Result<Self> {
        let mut dataset = Self::new();
        for record in records {
            dataset.insert(record)?;
        }
        Ok(dataset)
    }

    /// Adds a record to its group.
    ///
    /// Returns an error if the group already has a sample with the same id.
    pub fn insert(&mut self, record: SampleRecord) -> Result<()> {
        let group = self.groups.entry(record.group_label.clone()).or_default();

        if group.iter().any(|r| r.sample_id == record.sample_id) {
            return Err(PorescopeError::DuplicateSample {
                group: record.group_label.to_string(),
                sample_id: record.sample_id,
            });
        }

        group.push(record);
        Ok(())
    }

    /// Gets a record by group and sample id.
    pub fn get(&self, group: &GroupLabel, sample_id: &str) -> Option<&SampleRecord> {
        self.groups
            .get(group)
            .and_then(|records| records.iter().find(|r| r.sample_id == sample_id))
    }

    /// Checks if a record with the given group and id exists.
    pub fn contains(&self, group: &GroupLabel, sample_id: &str) -> bool {
        self.get(group, sample_id).is_some()
    }

    /// Removes a record by group and sample id.
    pub fn remove(&mut self, group: &GroupLabel, sample_id: &str) -> Option<SampleRecord> {
        let records = self.groups.get_mut(group)?;
        let index = records.iter().position(|r| r.sample_id == sample_id)?;
        let removed = records.remove(index);
        if records.is_empty() {
            self.groups.remove(group);
        }
        Some(removed)
    }

    /// Returns the records of one group (empty if the group is unknown).
    pub fn group(&self, group: &GroupLabel) -> &[SampleRecord] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the group labels in sorted order.
    pub fn group_labels(&self) -> impl Iterator<Item = &GroupLabel> {
        self.groups.keys()
    }

    /// Returns an iterator over `(label, records)` pairs in label order.
    pub fn groups(&self) -> impl Iterator<Item = (&GroupLabel, &[SampleRecord])> {
        self.groups.iter().map(|(label, records)| (label, records.as_slice()))
    }

    /// Returns an iterator over all records.
    pub fn iter(&self) -> impl Iterator<Item = &SampleRecord> {
        self.groups.values().flatten()
    }

    /// Returns the total number of records.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Returns true if the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    /// Returns the number of non-empty groups.
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Merges another dataset into this one.
    pub fn extend(&mut self, other: Dataset) -> Result<()> {
        for record in other.groups.into_values().flatten() {
            self.insert(record)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeling::ClusterMetrics;
    use crate::record::ShapeStats;

    fn record(id: &str, group: GroupLabel) -> SampleRecord {
        SampleRecord {
            sample_id: id.to_string(),
            group_label: group,
            shape: ShapeStats::unavailable(10),
            clusters: ClusterMetrics::new(10, 2),
            points_removed: 0,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut dataset = Dataset::new();
        dataset.insert(record("n1", GroupLabel::ConditionA)).unwrap();
        dataset.insert(record("n1", GroupLabel::Random)).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.num_groups(), 2);
        assert!(dataset.contains(&GroupLabel::ConditionA, "n1"));
        assert!(!dataset.contains(&GroupLabel::ConditionB, "n1"));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut dataset = Dataset::new();
        dataset.insert(record("n1", GroupLabel::ConditionA)).unwrap();
        let err = dataset
            .insert(record("n1", GroupLabel::ConditionA))
            .unwrap_err();
        assert!(matches!(err, PorescopeError::DuplicateSample { .. }));
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_remove_drops_empty_group() {
        let mut dataset =
            Dataset::from_records([record("n1", GroupLabel::ConditionB)]).unwrap();
        assert!(dataset.remove(&GroupLabel::ConditionB, "n2").is_none());
        assert!(dataset.remove(&GroupLabel::ConditionB, "n1").is_some());
        assert!(dataset.is_empty());
        assert_eq!(dataset.num_groups(), 0);
        assert!(dataset.group(&GroupLabel::ConditionB).is_empty());
    }

    #[test]
    fn test_groups_are_sorted() {
        let dataset = Dataset::from_records([
            record("b", GroupLabel::ConditionB),
            record("r", GroupLabel::Random),
            record("a", GroupLabel::ConditionA),
        ])
        .unwrap();
        let labels: Vec<_> = dataset.group_labels().cloned().collect();
        assert_eq!(
            labels,
            vec![GroupLabel::Random, GroupLabel::ConditionA, GroupLabel::ConditionB]
        );
    }
}
