//! Cluster labelings and the metrics derived from them.
//!
//! A [`ClusterLabeling`] maps every point index of a [`PointSet`](crate::PointSet)
//! to a cluster id, where [`NOISE`] (0) marks unclustered points.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Label assigned to points that belong to no cluster.
pub const NOISE: usize = 0;

/// How density-based clustering treats border points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BorderPolicy {
    /// Border points join a neighboring cluster (classic DBSCAN).
    #[default]
    IncludeBorders,
    /// Only core points are clustered; borders are noise (DBSCAN*).
    CoreOnly,
}

/// Per-point cluster ids for one point set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterLabeling {
    labels: Vec<usize>,
}

impl ClusterLabeling {
    /// Creates a labeling from raw labels (index `i` labels point `i`).
    pub fn new(labels: Vec<usize>) -> Self {
        Self { labels }
    }

    /// Creates a labeling that marks `len` points as noise.
    #[must_use]
    pub fn all_noise(len: usize) -> Self {
        Self {
            labels: vec![NOISE; len],
        }
    }

    /// Returns the number of labeled points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if no points are labeled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the raw labels.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Returns the label of point `index`.
    #[must_use]
    pub fn label(&self, index: usize) -> Option<usize> {
        self.labels.get(index).copied()
    }

    /// Returns the number of points assigned to some cluster.
    #[must_use]
    pub fn clustered_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l != NOISE).count()
    }

    /// Returns the number of distinct clusters.
    #[must_use]
    pub fn num_clusters(&self) -> usize {
        self.cluster_sizes().len()
    }

    /// Returns the size of each cluster keyed by cluster id.
    #[must_use]
    pub fn cluster_sizes(&self) -> BTreeMap<usize, usize> {
        let mut sizes = BTreeMap::new();
        for &l in self.labels.iter().filter(|&&l| l != NOISE) {
            *sizes.entry(l).or_insert(0) += 1;
        }
        sizes
    }

    /// Returns the point indices carrying `cluster_id`, ascending.
    #[must_use]
    pub fn members(&self, cluster_id: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == cluster_id)
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns true if both labelings induce the same partition.
    ///
    /// Noise must match exactly; cluster ids may be permuted.
    #[must_use]
    pub fn same_partition(&self, other: &ClusterLabeling) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut forward: BTreeMap<usize, usize> = BTreeMap::new();
        let mut backward: BTreeMap<usize, usize> = BTreeMap::new();
        for (&a, &b) in self.labels.iter().zip(&other.labels) {
            if (a == NOISE) != (b == NOISE) {
                return false;
            }
            if a == NOISE {
                continue;
            }
            if *forward.entry(a).or_insert(b) != b || *backward.entry(b).or_insert(a) != a {
                return false;
            }
        }
        true
    }

    /// Summarizes this labeling as [`ClusterMetrics`].
    #[must_use]
    pub fn metrics(&self) -> ClusterMetrics {
        ClusterMetrics::new(self.len(), self.clustered_count())
    }
}

/// Clustered-point counts for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterMetrics {
    /// Number of points that were clustered over.
    pub total_points: usize,
    /// Number of points with a non-noise label.
    pub clustered_points: usize,
    /// `clustered_points / total_points`, 0 for an empty sample.
    pub fraction_clustered: f64,
}

impl ClusterMetrics {
    /// Creates metrics from counts.
    #[must_use]
    pub fn new(total_points: usize, clustered_points: usize) -> Self {
        let fraction_clustered = if total_points == 0 {
            0.0
        } else {
            clustered_points as f64 / total_points as f64
        };
        Self {
            total_points,
            clustered_points,
            fraction_clustered,
        }
    }

    /// Returns true if at least one point is clustered.
    #[must_use]
    pub fn has_cluster(&self) -> bool {
        self.clustered_points > 0
    }
}

/// Fraction of points carrying a non-noise label.
#[must_use]
pub fn clustered_fraction(labeling: &ClusterLabeling) -> f64 {
    labeling.metrics().fraction_clustered
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_metrics() {
        let labeling = ClusterLabeling::new(vec![0, 1, 1, 2, 0, 2, 2, 0]);
        let m = labeling.metrics();
        assert_eq!(m.total_points, 8);
        assert_eq!(m.clustered_points, 5);
        assert!((m.fraction_clustered - 0.625).abs() < 1e-12);
        assert!(m.has_cluster());
        assert_eq!(labeling.num_clusters(), 2);
        assert_eq!(labeling.members(2), vec![3, 5, 6]);
    }

    #[test]
    fn test_empty_fraction_is_zero() {
        let labeling = ClusterLabeling::all_noise(0);
        assert!(clustered_fraction(&labeling).abs() < f64::EPSILON);
        assert!(!labeling.metrics().has_cluster());
    }

    #[test]
    fn test_same_partition_ignores_relabeling() {
        let a = ClusterLabeling::new(vec![1, 1, 0, 2, 2]);
        let b = ClusterLabeling::new(vec![7, 7, 0, 3, 3]);
        assert!(a.same_partition(&b));
    }

    #[test]
    fn test_same_partition_detects_merge_and_noise() {
        let a = ClusterLabeling::new(vec![1, 1, 0, 2, 2]);
        let merged = ClusterLabeling::new(vec![1, 1, 0, 1, 1]);
        let noisier = ClusterLabeling::new(vec![1, 1, 0, 0, 2]);
        assert!(!a.same_partition(&merged));
        assert!(!merged.same_partition(&a));
        assert!(!a.same_partition(&noisier));
        assert!(!a.same_partition(&ClusterLabeling::all_noise(4)));
    }

    #[test]
    fn test_border_policy_serde_names() {
        let json = serde_json::to_string(&BorderPolicy::CoreOnly).unwrap();
        assert_eq!(json, "\"core_only\"");
    }

    proptest! {
        #[test]
        fn metrics_are_consistent(labels in prop::collection::vec(0usize..5, 0..50)) {
            let labeling = ClusterLabeling::new(labels);
            let m = labeling.metrics();
            prop_assert_eq!(m.total_points, labeling.len());
            prop_assert!((0.0..=1.0).contains(&m.fraction_clustered));
            let sized: usize = labeling.cluster_sizes().values().sum();
            prop_assert_eq!(sized, m.clustered_points);
        }

        #[test]
        fn relabeling_keeps_partition(labels in prop::collection::vec(0usize..5, 0..50)) {
            let shifted: Vec<usize> = labels
                .iter()
                .map(|&l| if l == NOISE { NOISE } else { l + 10 })
                .collect();
            let a = ClusterLabeling::new(labels);
            let b = ClusterLabeling::new(shifted);
            prop_assert!(a.same_partition(&b));
            prop_assert!(b.same_partition(&a));
        }
    }
}
