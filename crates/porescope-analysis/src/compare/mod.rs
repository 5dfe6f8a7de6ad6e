//! Comparative analysis of sample groups.
//!
//! [`compare_groups`] summarizes every group of a [`Dataset`], runs a
//! Kruskal–Wallis test on `fraction_clustered` across all groups and a
//! Mann–Whitney U test for every pair of groups.

mod distributions;
mod rank_tests;

pub use rank_tests::{kruskal_wallis, mann_whitney_u, KruskalWallisResult, MannWhitneyResult};

use porescope_core::{Dataset, GroupLabel, SampleRecord};
use serde::{Deserialize, Serialize};

/// Mean and sample standard deviation of the present values of a column.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Number of values summarized (missing values excluded).
    pub n: usize,
    pub mean: Option<f64>,
    /// Sample (n - 1) standard deviation; needs two values.
    pub stdev: Option<f64>,
}

impl Summary {
    /// Summarizes the finite values among `values`.
    pub fn from_values(values: impl IntoIterator<Item = Option<f64>>) -> Self {
        let values: Vec<f64> = values
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .collect();
        let n = values.len();
        if n == 0 {
            return Self::default();
        }
        let mean = values.iter().sum::<f64>() / n as f64;
        let stdev = (n > 1).then(|| {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        });
        Self {
            n,
            mean: Some(mean),
            stdev,
        }
    }
}

/// Descriptive statistics of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group: GroupLabel,
    pub n_samples: usize,
    pub fraction_clustered: Summary,
    pub points_removed: Summary,
    pub density: Summary,
    pub sphericity: Summary,
    /// Samples with at least one clustered point.
    pub nuclei_with_cluster: usize,
    /// Samples with no clustered point.
    pub nuclei_without_cluster: usize,
    /// `nuclei_with_cluster / n_samples`, 0 for an empty group.
    pub fraction_with_cluster: f64,
}

impl GroupSummary {
    /// Summarizes the records of one group.
    #[must_use]
    pub fn from_records(group: GroupLabel, records: &[SampleRecord]) -> Self {
        let n_samples = records.len();
        let with_cluster = records.iter().filter(|r| r.clusters.has_cluster()).count();
        Self {
            group,
            n_samples,
            fraction_clustered: Summary::from_values(
                records.iter().map(|r| Some(r.clusters.fraction_clustered)),
            ),
            points_removed: Summary::from_values(
                records.iter().map(|r| Some(r.points_removed as f64)),
            ),
            density: Summary::from_values(records.iter().map(|r| r.shape.density)),
            sphericity: Summary::from_values(records.iter().map(|r| r.shape.sphericity)),
            nuclei_with_cluster: with_cluster,
            nuclei_without_cluster: n_samples - with_cluster,
            fraction_with_cluster: if n_samples == 0 {
                0.0
            } else {
                with_cluster as f64 / n_samples as f64
            },
        }
    }
}

/// Mann–Whitney comparison of one pair of groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseComparison {
    pub first: GroupLabel,
    pub second: GroupLabel,
    pub test: MannWhitneyResult,
}

/// Everything [`compare_groups`] reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// One summary per group, in group order.
    pub groups: Vec<GroupSummary>,
    /// Omnibus test on `fraction_clustered`; absent with fewer than two
    /// non-empty groups.
    pub kruskal_wallis: Option<KruskalWallisResult>,
    /// One entry per group pair `(i, j)` with `i < j` in group order.
    pub pairwise: Vec<PairwiseComparison>,
}

impl ComparisonReport {
    /// Returns the summary of `group`, if present.
    #[must_use]
    pub fn group(&self, group: &GroupLabel) -> Option<&GroupSummary> {
        self.groups.iter().find(|g| &g.group == group)
    }

    /// Returns the pairwise test between `a` and `b` in either order.
    #[must_use]
    pub fn pair(&self, a: &GroupLabel, b: &GroupLabel) -> Option<&PairwiseComparison> {
        self.pairwise
            .iter()
            .find(|p| (&p.first == a && &p.second == b) || (&p.first == b && &p.second == a))
    }

    /// Returns true if the omnibus test rejects at level `alpha`.
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.kruskal_wallis
            .is_some_and(|kw| kw.is_significant(alpha))
    }

    /// Pairs whose difference is significant at level `alpha`.
    pub fn significant_pairs(&self, alpha: f64) -> impl Iterator<Item = &PairwiseComparison> {
        self.pairwise
            .iter()
            .filter(move |p| p.test.is_significant(alpha))
    }
}

/// Summarizes and tests every group of `dataset`.
#[must_use]
pub fn compare_groups(dataset: &Dataset) -> ComparisonReport {
    let groups: Vec<GroupSummary> = dataset
        .groups()
        .map(|(label, records)| GroupSummary::from_records(label.clone(), records))
        .collect();

    let fractions: Vec<(GroupLabel, Vec<f64>)> = dataset
        .groups()
        .map(|(label, records)| {
            let values = records
                .iter()
                .map(|r| r.clusters.fraction_clustered)
                .collect();
            (label.clone(), values)
        })
        .collect();

    let columns: Vec<&[f64]> = fractions.iter().map(|(_, v)| v.as_slice()).collect();
    let omnibus = kruskal_wallis(&columns);

    let mut pairwise = Vec::new();
    for (i, (first, a)) in fractions.iter().enumerate() {
        for (second, b) in &fractions[i + 1..] {
            if let Some(test) = mann_whitney_u(a, b) {
                pairwise.push(PairwiseComparison {
                    first: first.clone(),
                    second: second.clone(),
                    test,
                });
            }
        }
    }

    match &omnibus {
        Some(kw) => log::debug!(
            "compared {} groups: H = {:.4}, p = {:.4e}",
            groups.len(),
            kw.h,
            kw.p_value
        ),
        None => log::debug!(
            "compared {} groups: omnibus test unavailable",
            groups.len()
        ),
    }

    ComparisonReport {
        groups,
        kruskal_wallis: omnibus,
        pairwise,
    }
}
