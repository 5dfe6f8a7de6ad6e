//! Rendering seam.
//!
//! The analysis never draws anything. A viewer implements [`SceneRenderer`]
//! and receives [`SampleView`]s: a point cloud, the hull as a triangle mesh
//! and the cluster labels as a per-point scalar quantity.

use glam::DVec3;
use porescope_analysis::ConvexHull;
use porescope_core::{ClusterLabeling, PointSet, PorescopeError, Result, NOISE};

/// Read-only view of one analyzed sample.
#[derive(Debug, Clone, Copy)]
pub struct SampleView<'a> {
    pub sample_id: &'a str,
    pub points: &'a PointSet,
    pub hull: Option<&'a ConvexHull>,
    pub labeling: Option<&'a ClusterLabeling>,
}

impl<'a> SampleView<'a> {
    /// A bare point cloud.
    pub fn new(sample_id: &'a str, points: &'a PointSet) -> Self {
        Self {
            sample_id,
            points,
            hull: None,
            labeling: None,
        }
    }

    /// Attaches a hull computed from the same points.
    ///
    /// # Errors
    ///
    /// Returns [`PorescopeError::SizeMismatch`] if the hull was computed from
    /// a different number of points.
    pub fn with_hull(mut self, hull: &'a ConvexHull) -> Result<Self> {
        if hull.point_count() != self.points.len() {
            return Err(PorescopeError::SizeMismatch {
                expected: self.points.len(),
                actual: hull.point_count(),
            });
        }
        self.hull = Some(hull);
        Ok(self)
    }

    /// Attaches one cluster label per point.
    ///
    /// # Errors
    ///
    /// Returns [`PorescopeError::SizeMismatch`] on a length mismatch.
    pub fn with_labeling(mut self, labeling: &'a ClusterLabeling) -> Result<Self> {
        if labeling.len() != self.points.len() {
            return Err(PorescopeError::SizeMismatch {
                expected: self.points.len(),
                actual: labeling.len(),
            });
        }
        self.labeling = Some(labeling);
        Ok(self)
    }

    /// Hull facets as vertex positions, outward-facing.
    pub fn hull_triangles(&self) -> impl Iterator<Item = [DVec3; 3]> + 'a {
        let points = self.points.points();
        self.hull
            .into_iter()
            .flat_map(|hull| hull.facets().iter())
            .map(move |&[a, b, c]| [points[a], points[b], points[c]])
    }

    /// Cluster id of every point as a scalar; noise maps to 0.
    pub fn label_values(&self) -> Option<Vec<f64>> {
        self.labeling
            .map(|l| l.labels().iter().map(|&id| id as f64).collect())
    }

    /// Indices of clustered points.
    pub fn clustered_indices(&self) -> Vec<usize> {
        self.labeling.map_or_else(Vec::new, |l| {
            l.labels()
                .iter()
                .enumerate()
                .filter(|(_, &id)| id != NOISE)
                .map(|(i, _)| i)
                .collect()
        })
    }
}

/// Receives analyzed samples for display.
pub trait SceneRenderer {
    /// Draws or records one sample.
    fn render(&mut self, view: &SampleView<'_>) -> Result<()>;

    /// Renders several samples, stopping at the first error.
    fn render_all<'a, I>(&mut self, views: I) -> Result<()>
    where
        I: IntoIterator<Item = SampleView<'a>>,
    {
        for view in views {
            self.render(&view)?;
        }
        Ok(())
    }
}
