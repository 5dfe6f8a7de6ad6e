//! Analysis algorithms for porescope.
//!
//! - [`hull`]: 3D convex hull with surface area and volume
//! - [`shape`]: sphericity and density from a hull
//! - [`hull_opt`]: greedy outlier trimming that keeps the hull spherical
//! - [`simulate`]: random points on a sphere, optionally thinned
//! - [`dbscan`]: density clustering and eps sweeps
//! - [`compare`]: group summaries and rank tests

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Index counts and ratios convert between usize and f64 freely
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::many_single_char_names)]

pub mod compare;
pub mod dbscan;
pub mod hull;
pub mod hull_opt;
pub mod shape;
pub mod simulate;

pub use compare::{
    compare_groups, kruskal_wallis, mann_whitney_u, ComparisonReport, GroupSummary,
    KruskalWallisResult, MannWhitneyResult, PairwiseComparison, Summary,
};
pub use dbscan::{dbscan, dbscan_with, neighborhoods, sweep_eps, EpsSweepPoint};
pub use hull::{compute_hull, ConvexHull};
pub use hull_opt::{
    optimize_hull, rank_by_centroid_distance, HullOptimization, OptimizerStep, StopReason,
};
pub use shape::{compute_stats, sphericity, stats_for_points};
pub use simulate::{generate_sphere_points, generate_with_min_separation, nearest_neighbor_distances};
