//! Shape statistics derived from a point set and its convex hull.

use std::f64::consts::PI;

use porescope_core::{PointSet, ShapeStats};

use crate::hull::{compute_hull, ConvexHull};

/// Sphericity `π^(1/3) (6V)^(2/3) / A`, or `None` for a non-positive area.
#[must_use]
pub fn sphericity(volume: f64, surface_area: f64) -> Option<f64> {
    if surface_area > 0.0 && volume >= 0.0 {
        Some(PI.cbrt() * (6.0 * volume).powf(2.0 / 3.0) / surface_area)
    } else {
        None
    }
}

/// Computes shape statistics of `points` from an already computed hull.
#[must_use]
pub fn compute_stats(points: &PointSet, hull: &ConvexHull) -> ShapeStats {
    let surface_area = hull.surface_area();
    let volume = hull.volume();
    let point_count = points.len();
    let density = (surface_area > 0.0).then(|| point_count as f64 / surface_area);
    ShapeStats {
        surface_area: Some(surface_area),
        volume: Some(volume),
        sphericity: sphericity(volume, surface_area),
        point_count,
        density,
    }
}

/// Computes the hull and shape statistics of `points`.
///
/// A degenerate point set yields [`ShapeStats::unavailable`] rather than an
/// error, so one bad sample never aborts a batch.
#[must_use]
pub fn stats_for_points(points: &PointSet) -> (ShapeStats, Option<ConvexHull>) {
    match compute_hull(points) {
        Ok(hull) => (compute_stats(points, &hull), Some(hull)),
        Err(err) => {
            log::warn!("shape statistics unavailable: {err}");
            (ShapeStats::unavailable(points.len()), None)
        }
    }
}
