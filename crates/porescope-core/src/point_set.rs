//! Point sets: the coordinates of one nucleus or one simulation run.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// An ordered, immutable sequence of 3D points in physical units (microns).
///
/// Point identity is positional: labelings and hull facets refer to points by
/// their index in the owning set. Every transformation returns a new set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    points: Vec<DVec3>,
}

impl PointSet {
    /// Creates a point set from a list of points.
    pub fn new(points: Vec<DVec3>) -> Self {
        Self { points }
    }

    /// Creates a point set from coordinate triples.
    pub fn from_xyz(coords: impl IntoIterator<Item = [f64; 3]>) -> Self {
        Self {
            points: coords.into_iter().map(DVec3::from_array).collect(),
        }
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the set has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the points.
    #[must_use]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Returns the point at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<DVec3> {
        self.points.get(index).copied()
    }

    /// Returns an iterator over the points.
    pub fn iter(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.points.iter().copied()
    }

    /// Consumes the set and returns the underlying points.
    #[must_use]
    pub fn into_points(self) -> Vec<DVec3> {
        self.points
    }

    /// Returns the mean of all coordinates, or `None` for an empty set.
    #[must_use]
    pub fn centroid(&self) -> Option<DVec3> {
        if self.points.is_empty() {
            return None;
        }
        let sum: DVec3 = self.points.iter().copied().sum();
        Some(sum / self.points.len() as f64)
    }

    /// Returns the axis-aligned bounding box as `(min, max)`.
    ///
    /// Returns `None` for an empty set.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        let first = *self.points.first()?;
        Some(
            self.points
                .iter()
                .fold((first, first), |(min, max), &p| (min.min(p), max.max(p))),
        )
    }

    /// Returns the diagonal length of the bounding box (0 for empty sets).
    #[must_use]
    pub fn extent(&self) -> f64 {
        self.bounding_box()
            .map_or(0.0, |(min, max)| (max - min).length())
    }

    /// Returns a new set containing the points at `indices`, in that order.
    ///
    /// Indices outside the set are skipped.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            points: indices
                .iter()
                .filter_map(|&i| self.points.get(i).copied())
                .collect(),
        }
    }

    /// Returns a new set with every coordinate multiplied by the per-axis `scale`.
    ///
    /// This is the pixel-to-micron conversion applied by loaders.
    #[must_use]
    pub fn scaled(&self, scale: DVec3) -> Self {
        Self {
            points: self.points.iter().map(|&p| p * scale).collect(),
        }
    }

    /// Returns a new set with the points of `other` appended after these.
    #[must_use]
    pub fn concat(&self, other: &PointSet) -> Self {
        let mut points = Vec::with_capacity(self.len() + other.len());
        points.extend_from_slice(&self.points);
        points.extend_from_slice(&other.points);
        Self { points }
    }
}

impl From<Vec<DVec3>> for PointSet {
    fn from(points: Vec<DVec3>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<DVec3> for PointSet {
    fn from_iter<I: IntoIterator<Item = DVec3>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
