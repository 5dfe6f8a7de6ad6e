//! Null-model point sets: complete spatial randomness on a sphere surface.

use glam::DVec3;
use porescope_core::options::{validate_min_separation, validate_sphere};
use porescope_core::{PointSet, Result};
use rand::Rng;
use rand_distr::{Distribution, UnitSphere};

/// Draws `count` points uniformly on the surface of a sphere of `radius`
/// centered at the origin.
///
/// Directions are drawn with [`UnitSphere`].
///
/// # Errors
///
/// Returns [`porescope_core::PorescopeError::InvalidParameter`] for a zero
/// count or a non-positive radius.
pub fn generate_sphere_points<R: Rng + ?Sized>(
    count: usize,
    radius: f64,
    rng: &mut R,
) -> Result<PointSet> {
    validate_sphere(count, radius)?;
    Ok((0..count).map(|_| random_direction(rng) * radius).collect())
}

/// Draws `count` sphere points, then keeps only those whose nearest neighbor
/// in the drawn set lies at least `min_dist` away.
///
/// Filtering is a single pass over the original draw, so the retained count
/// can be far below `count` when `min_dist` is large for the point density.
///
/// # Errors
///
/// Returns [`porescope_core::PorescopeError::InvalidParameter`] for a zero
/// count, a non-positive radius or a negative separation.
pub fn generate_with_min_separation<R: Rng + ?Sized>(
    count: usize,
    radius: f64,
    min_dist: f64,
    rng: &mut R,
) -> Result<PointSet> {
    validate_min_separation(min_dist)?;
    let drawn = generate_sphere_points(count, radius, rng)?;
    let nearest = nearest_neighbor_distances(&drawn);
    let keep: Vec<usize> = nearest
        .iter()
        .enumerate()
        .filter(|(_, &d)| d >= min_dist)
        .map(|(i, _)| i)
        .collect();
    log::trace!(
        "min-separation filter kept {}/{} points (min_dist {min_dist})",
        keep.len(),
        count
    );
    Ok(drawn.select(&keep))
}

/// Distance from each point to its nearest other point.
///
/// A lone point gets `f64::INFINITY`.
#[must_use]
pub fn nearest_neighbor_distances(points: &PointSet) -> Vec<f64> {
    let pts = points.points();
    let mut nearest = vec![f64::INFINITY; pts.len()];
    for i in 0..pts.len() {
        for j in (i + 1)..pts.len() {
            let d = pts[i].distance(pts[j]);
            nearest[i] = nearest[i].min(d);
            nearest[j] = nearest[j].min(d);
        }
    }
    nearest
}

fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> DVec3 {
    let [x, y, z]: [f64; 3] = UnitSphere.sample(rng);
    DVec3::new(x, y, z)
}
