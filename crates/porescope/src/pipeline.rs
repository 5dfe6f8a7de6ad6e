//! Per-sample analysis pipeline.
//!
//! Raw coordinates → hull optimizer → cleaned points → shape statistics and
//! density clustering → [`SampleRecord`].

use porescope_analysis::{
    compare_groups, dbscan_with, optimize_hull, stats_for_points, sweep_eps, ComparisonReport,
    ConvexHull, EpsSweepPoint, HullOptimization,
};
use porescope_core::{
    AnalysisOptions, ClusterLabeling, Dataset, GroupLabel, PointSet, Result, SampleRecord,
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::render::SampleView;

/// One raw sample queued for batch analysis.
#[derive(Debug, Clone)]
pub struct SampleInput {
    pub sample_id: String,
    pub group: GroupLabel,
    /// Coordinates in microns.
    pub points: PointSet,
}

impl SampleInput {
    pub fn new(sample_id: impl Into<String>, group: GroupLabel, points: PointSet) -> Self {
        Self {
            sample_id: sample_id.into(),
            group,
            points,
        }
    }
}

/// Everything computed for one sample.
#[derive(Debug, Clone)]
pub struct SampleAnalysis {
    record: SampleRecord,
    points: PointSet,
    hull: Option<ConvexHull>,
    labeling: ClusterLabeling,
    optimization: Option<HullOptimization>,
}

impl SampleAnalysis {
    /// Returns the tabular record.
    pub fn record(&self) -> &SampleRecord {
        &self.record
    }

    /// Consumes the analysis and returns the record.
    pub fn into_record(self) -> SampleRecord {
        self.record
    }

    /// Returns the points the statistics were computed from.
    pub fn points(&self) -> &PointSet {
        &self.points
    }

    /// Returns the hull of the cleaned points, if it could be computed.
    pub fn hull(&self) -> Option<&ConvexHull> {
        self.hull.as_ref()
    }

    /// Returns the cluster labels of the cleaned points.
    pub fn labeling(&self) -> &ClusterLabeling {
        &self.labeling
    }

    /// Returns the optimizer diagnostics; `None` for untrimmed samples.
    pub fn optimization(&self) -> Option<&HullOptimization> {
        self.optimization.as_ref()
    }

    /// Returns a read-only view for a [`SceneRenderer`](crate::SceneRenderer).
    pub fn view(&self) -> SampleView<'_> {
        SampleView {
            sample_id: &self.record.sample_id,
            points: &self.points,
            hull: self.hull.as_ref(),
            labeling: Some(&self.labeling),
        }
    }
}

/// Runs the analysis pipeline with one validated set of options.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    options: AnalysisOptions,
}

impl Analyzer {
    /// Creates an analyzer after validating `options`.
    ///
    /// # Errors
    ///
    /// Returns [`porescope_core::PorescopeError::InvalidParameter`] for out
    /// of range options.
    pub fn new(options: AnalysisOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Returns the options in use.
    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Trims, measures and clusters one sample.
    ///
    /// A degenerate sample is not an error: its geometric fields are missing.
    pub fn analyze_sample(
        &self,
        sample_id: impl Into<String>,
        group: GroupLabel,
        points: &PointSet,
    ) -> Result<SampleAnalysis> {
        let sample_id = sample_id.into();
        let optimization = optimize_hull(points, &self.options.hull_optimizer)?;
        log::debug!(
            "{sample_id}: trimmed {} of {} points ({:?})",
            optimization.points_removed(),
            points.len(),
            optimization.stop_reason()
        );
        let cleaned = optimization.points().clone();
        self.measure(sample_id, group, cleaned, Some(optimization))
    }

    /// Measures and clusters `points` as given, without hull optimization.
    pub fn analyze_untrimmed(
        &self,
        sample_id: impl Into<String>,
        group: GroupLabel,
        points: PointSet,
    ) -> Result<SampleAnalysis> {
        self.measure(sample_id.into(), group, points, None)
    }

    fn measure(
        &self,
        sample_id: String,
        group: GroupLabel,
        points: PointSet,
        optimization: Option<HullOptimization>,
    ) -> Result<SampleAnalysis> {
        let (shape, hull) = stats_for_points(&points);
        let labeling = dbscan_with(&points, &self.options.clustering)?;
        let points_removed = optimization
            .as_ref()
            .map_or(0, HullOptimization::points_removed);

        if hull.is_none() {
            log::warn!("{sample_id}: hull unavailable, shape fields left empty");
        }

        let record = SampleRecord {
            sample_id,
            group_label: group,
            shape,
            clusters: labeling.metrics(),
            points_removed,
        };
        Ok(SampleAnalysis {
            record,
            points,
            hull,
            labeling,
            optimization,
        })
    }

    /// Analyzes every sample and collects the records into a [`Dataset`].
    ///
    /// Output order does not depend on scheduling. With the `parallel`
    /// feature samples are processed on the rayon pool.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate `(group, sample_id)`; degenerate samples only
    /// lose their geometric fields.
    pub fn analyze_batch(&self, samples: &[SampleInput]) -> Result<Dataset> {
        let analyze = |s: &SampleInput| {
            self.analyze_sample(s.sample_id.as_str(), s.group.clone(), &s.points)
                .map(SampleAnalysis::into_record)
        };

        #[cfg(feature = "parallel")]
        let records: Vec<Result<SampleRecord>> = samples.par_iter().map(analyze).collect();
        #[cfg(not(feature = "parallel"))]
        let records: Vec<Result<SampleRecord>> = samples.iter().map(analyze).collect();

        let mut dataset = Dataset::new();
        let mut incomplete = 0;
        for record in records {
            let record = record?;
            if !record.shape.is_complete() {
                incomplete += 1;
            }
            dataset.insert(record)?;
        }
        log::info!(
            "analyzed {} samples in {} groups ({incomplete} without shape statistics)",
            dataset.len(),
            dataset.num_groups()
        );
        Ok(dataset)
    }

    /// Clusters `points` at every radius of the configured eps sweep.
    pub fn sweep_eps(&self, points: &PointSet) -> Result<Vec<EpsSweepPoint>> {
        let clustering = &self.options.clustering;
        sweep_eps(
            points,
            &self.options.eps_sweep,
            clustering.min_points,
            clustering.border_policy,
        )
    }

    /// Summarizes and tests the groups of `dataset`.
    pub fn compare(&self, dataset: &Dataset) -> ComparisonReport {
        compare_groups(dataset)
    }
}
