//! porescope: clustering analysis of nuclear pore complexes on the nuclear envelope.
//!
//! Each sample is a set of 3D NPC coordinates in microns. The pipeline trims
//! outlying points with the hull optimizer, measures the envelope's convex
//! hull, clusters the points with DBSCAN and collects everything into a
//! [`SampleRecord`]. Simulated random samples on a sphere serve as the null
//! model that biological conditions are compared against.
//!
//! # Quick Start
//!
//! ```no_run
//! use porescope::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let analyzer = Analyzer::new(AnalysisOptions::default())?;
//!     let loader = CsvPointLoader::new().with_scale(DVec3::new(0.05, 0.05, 0.2));
//!
//!     let samples = vec![
//!         SampleInput::new("wt_01", GroupLabel::ConditionA, loader.load("wt_01.csv")?),
//!         SampleInput::new("mut_01", GroupLabel::ConditionB, loader.load("mut_01.csv")?),
//!     ];
//!     let mut dataset = analyzer.analyze_batch(&samples)?;
//!     for analysis in analyzer.simulate_random_group(20)? {
//!         dataset.insert(analysis.into_record())?;
//!     }
//!
//!     let report = analyzer.compare(&dataset);
//!     println!("significant: {}", report.is_significant(0.05));
//!     save_dataset(&dataset, "results.csv")?;
//!     Ok(())
//! }
//! ```
//!
//! # Crates
//!
//! - `porescope-core`: point sets, labelings, records, options, errors
//! - `porescope-analysis`: hull, shape statistics, optimizer, simulator,
//!   DBSCAN and group statistics
//!
//! # Features
//!
//! - `parallel`: analyze batches on the rayon thread pool

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

mod io;
mod pipeline;
mod render;
mod simulation;

pub use porescope_core::{
    clustered_fraction, AnalysisOptions, BorderPolicy, ClusterLabeling, ClusterMetrics,
    ClusterOptions, Dataset, GroupLabel, HullOptimizerOptions, PointSet, PointSetLoader,
    PorescopeError, Result, SampleRecord, SampleRow, ShapeStats, SimulationOptions,
    TestSphericity, DVec3, NOISE,
};

pub use porescope_analysis::{
    compare_groups, compute_hull, compute_stats, dbscan, dbscan_with,
    generate_sphere_points, generate_with_min_separation, kruskal_wallis, mann_whitney_u,
    nearest_neighbor_distances, optimize_hull, rank_by_centroid_distance, sphericity,
    stats_for_points, sweep_eps, ComparisonReport, ConvexHull, EpsSweepPoint, GroupSummary,
    HullOptimization, KruskalWallisResult, MannWhitneyResult, OptimizerStep, PairwiseComparison,
    StopReason, Summary,
};

pub use io::{load_dataset, read_records, save_dataset, write_records, CsvPointLoader};
pub use pipeline::{Analyzer, SampleAnalysis, SampleInput};
pub use render::{SampleView, SceneRenderer};
pub use simulation::SimulationSummary;

/// Installs an `env_logger` logger configured from `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::try_init();
    log::debug!("porescope {} logging initialized", env!("CARGO_PKG_VERSION"));
}
