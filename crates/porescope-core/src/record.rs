//! Per-sample records and their tabular form.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::labeling::ClusterMetrics;

/// Experimental group a sample belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GroupLabel {
    /// Simulated complete spatial randomness.
    Random,
    /// First biological condition (e.g. wild type).
    ConditionA,
    /// Second biological condition (e.g. mutant).
    ConditionB,
    /// Any further named condition.
    Other(String),
}

impl GroupLabel {
    /// Returns the label as written in tables.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Random => "random",
            Self::ConditionA => "condition_a",
            Self::ConditionB => "condition_b",
            Self::Other(name) => name,
        }
    }

    /// Parses a table label; unknown names become [`GroupLabel::Other`].
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label {
            "random" => Self::Random,
            "condition_a" => Self::ConditionA,
            "condition_b" => Self::ConditionB,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape descriptors of one cleaned point set.
///
/// Geometric fields are `None` when the convex hull could not be computed
/// (or, for ratios, when the surface area is zero).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStats {
    /// Hull surface area (square microns).
    pub surface_area: Option<f64>,
    /// Hull volume (cubic microns).
    pub volume: Option<f64>,
    /// `π^(1/3) (6V)^(2/3) / A`; 1 for a sphere.
    pub sphericity: Option<f64>,
    /// Number of points the statistics were computed from.
    pub point_count: usize,
    /// Points per unit surface area.
    pub density: Option<f64>,
}

impl ShapeStats {
    /// Stats for a sample whose hull is unavailable.
    #[must_use]
    pub fn unavailable(point_count: usize) -> Self {
        Self {
            surface_area: None,
            volume: None,
            sphericity: None,
            point_count,
            density: None,
        }
    }

    /// Returns true if every geometric field is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.surface_area.is_some()
            && self.volume.is_some()
            && self.sphericity.is_some()
            && self.density.is_some()
    }
}

/// Everything measured for one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub sample_id: String,
    pub group_label: GroupLabel,
    pub shape: ShapeStats,
    pub clusters: ClusterMetrics,
    /// Points trimmed by the hull optimizer before measuring.
    pub points_removed: usize,
}

impl SampleRecord {
    /// Flattens the record into one table row.
    #[must_use]
    pub fn to_row(&self) -> SampleRow {
        SampleRow {
            sample_id: self.sample_id.clone(),
            surface_area: self.shape.surface_area,
            volume: self.shape.volume,
            sphericity: self.shape.sphericity,
            num_points: self.shape.point_count,
            density: self.shape.density,
            total: self.clusters.total_points,
            clustered: self.clusters.clustered_points,
            fraction_clustered: self.clusters.fraction_clustered,
            points_removed: self.points_removed,
            group_label: self.group_label.to_string(),
        }
    }
}

/// Tabular form of a [`SampleRecord`]; missing values serialize as empty cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    pub sample_id: String,
    pub surface_area: Option<f64>,
    pub volume: Option<f64>,
    pub sphericity: Option<f64>,
    pub num_points: usize,
    pub density: Option<f64>,
    pub total: usize,
    pub clustered: usize,
    pub fraction_clustered: f64,
    pub points_removed: usize,
    pub group_label: String,
}

impl From<SampleRow> for SampleRecord {
    fn from(row: SampleRow) -> Self {
        Self {
            sample_id: row.sample_id,
            group_label: GroupLabel::parse(&row.group_label),
            shape: ShapeStats {
                surface_area: row.surface_area,
                volume: row.volume,
                sphericity: row.sphericity,
                point_count: row.num_points,
                density: row.density,
            },
            clusters: ClusterMetrics {
                total_points: row.total,
                clustered_points: row.clustered,
                fraction_clustered: row.fraction_clustered,
            },
            points_removed: row.points_removed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SampleRecord {
        SampleRecord {
            sample_id: "nucleus_07".to_string(),
            group_label: GroupLabel::ConditionB,
            shape: ShapeStats {
                surface_area: Some(18.0),
                volume: None,
                sphericity: None,
                point_count: 120,
                density: Some(120.0 / 18.0),
            },
            clusters: ClusterMetrics::new(120, 12),
            points_removed: 3,
        }
    }

    #[test]
    fn test_group_label_text() {
        for label in [
            GroupLabel::Random,
            GroupLabel::ConditionA,
            GroupLabel::ConditionB,
            GroupLabel::Other("nup96_ko".to_string()),
        ] {
            assert_eq!(GroupLabel::parse(label.as_str()), label);
        }
    }

    #[test]
    fn test_row_keeps_missing_fields() {
        let row = record().to_row();
        assert_eq!(row.group_label, "condition_b");
        assert_eq!(row.volume, None);
        assert_eq!(row.num_points, 120);
        assert_eq!(SampleRecord::from(row), record());
    }

    #[test]
    fn test_unavailable_stats() {
        let stats = ShapeStats::unavailable(3);
        assert!(!stats.is_complete());
        assert_eq!(stats.point_count, 3);
    }
}
