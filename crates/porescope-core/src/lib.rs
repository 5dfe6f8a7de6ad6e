//! Core data model for porescope.
//!
//! This crate provides the value types shared by the analysis pipeline:
//! - [`PointSet`] for the coordinates of one nucleus or simulation run
//! - [`ClusterLabeling`] and [`ClusterMetrics`] for density clustering results
//! - [`ShapeStats`] and [`SampleRecord`] for per-sample measurements
//! - [`Dataset`] for records grouped by experimental condition
//! - [`AnalysisOptions`] for run configuration

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Counts are converted to ratios throughout
#![allow(clippy::cast_precision_loss)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod dataset;
pub mod error;
pub mod labeling;
pub mod options;
pub mod point_set;
pub mod record;
pub mod source;

pub use dataset::Dataset;
pub use error::{PorescopeError, Result};
pub use labeling::{clustered_fraction, BorderPolicy, ClusterLabeling, ClusterMetrics, NOISE};
pub use options::{
    AnalysisOptions, ClusterOptions, HullOptimizerOptions, SimulationOptions, TestSphericity,
};
pub use point_set::PointSet;
pub use record::{GroupLabel, SampleRecord, SampleRow, ShapeStats};
pub use source::PointSetLoader;

// Re-export glam types for convenience
pub use glam::DVec3;
