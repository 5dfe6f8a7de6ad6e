//! Density-based clustering (DBSCAN / DBSCAN*).
//!
//! A point is a core point when at least `min_points` points, itself
//! included, lie within distance `eps` (inclusive). Core points closer than
//! `eps` share a cluster. Border points follow [`BorderPolicy`].
//!
//! Clusters are seeded from core points in ascending index order and fully
//! expanded breadth-first, visiting neighbors in ascending index order,
//! before the next seed is considered. A border point within `eps` of
//! several clusters therefore keeps the first cluster that reaches it, which
//! is the cluster with the smallest id.

use std::collections::VecDeque;

use porescope_core::options::validate_eps;
use porescope_core::{
    BorderPolicy, ClusterLabeling, ClusterMetrics, ClusterOptions, PointSet, PorescopeError,
    Result, NOISE,
};
use serde::{Deserialize, Serialize};

/// Indices of all points within `eps` of each point (self included), ascending.
///
/// Brute-force pairwise search; samples hold a few hundred points.
#[must_use]
pub fn neighborhoods(points: &PointSet, eps: f64) -> Vec<Vec<usize>> {
    let pts = points.points();
    let eps2 = eps * eps;
    pts.iter()
        .map(|&p| {
            pts.iter()
                .enumerate()
                .filter(|(_, &q)| p.distance_squared(q) <= eps2)
                .map(|(j, _)| j)
                .collect()
        })
        .collect()
}

/// Clusters `points` and returns one label per point.
///
/// Fewer points than `min_points` is not an error; every point is noise.
///
/// # Errors
///
/// Returns [`PorescopeError::InvalidParameter`] for a negative or non-finite
/// `eps`, or a zero `min_points`.
pub fn dbscan(
    points: &PointSet,
    eps: f64,
    min_points: usize,
    border_policy: BorderPolicy,
) -> Result<ClusterLabeling> {
    validate_eps(eps)?;
    if min_points == 0 {
        return Err(PorescopeError::InvalidParameter(
            "min_points must be at least 1".to_string(),
        ));
    }

    let n = points.len();
    if n < min_points {
        return Ok(ClusterLabeling::all_noise(n));
    }

    let neighbors = neighborhoods(points, eps);
    let is_core: Vec<bool> = neighbors.iter().map(|nb| nb.len() >= min_points).collect();

    let mut labels = vec![NOISE; n];
    let mut next_id = 1;
    let mut queue = VecDeque::new();

    for seed in 0..n {
        if !is_core[seed] || labels[seed] != NOISE {
            continue;
        }
        let id = next_id;
        next_id += 1;
        labels[seed] = id;
        queue.push_back(seed);

        while let Some(i) = queue.pop_front() {
            for &j in &neighbors[i] {
                if labels[j] != NOISE {
                    continue;
                }
                if is_core[j] {
                    labels[j] = id;
                    queue.push_back(j);
                } else if border_policy == BorderPolicy::IncludeBorders {
                    labels[j] = id;
                }
            }
        }
    }

    log::trace!(
        "dbscan eps={eps} min_points={min_points}: {} clusters over {n} points",
        next_id - 1
    );
    Ok(ClusterLabeling::new(labels))
}

/// Clusters `points` with the parameters in `options`.
pub fn dbscan_with(points: &PointSet, options: &ClusterOptions) -> Result<ClusterLabeling> {
    dbscan(points, options.eps, options.min_points, options.border_policy)
}

/// Cluster metrics at one neighborhood radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsSweepPoint {
    pub eps: f64,
    pub metrics: ClusterMetrics,
    pub num_clusters: usize,
}

/// Evaluates clustering at every radius in `eps_values`, in the given order.
///
/// # Errors
///
/// Fails on the first invalid radius or on a zero `min_points`.
pub fn sweep_eps(
    points: &PointSet,
    eps_values: &[f64],
    min_points: usize,
    border_policy: BorderPolicy,
) -> Result<Vec<EpsSweepPoint>> {
    eps_values
        .iter()
        .map(|&eps| {
            let labeling = dbscan(points, eps, min_points, border_policy)?;
            Ok(EpsSweepPoint {
                eps,
                metrics: labeling.metrics(),
                num_clusters: labeling.num_clusters(),
            })
        })
        .collect()
}
