//! Seeded null-model groups.

use porescope_analysis::{generate_sphere_points, generate_with_min_separation, Summary};
use porescope_core::{GroupLabel, PointSet, Result, SampleRecord};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::pipeline::{Analyzer, SampleAnalysis};

/// Mean and spread of repeated simulation runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub runs: usize,
    /// Points per run after separation filtering.
    pub retained_points: Summary,
    pub fraction_clustered: Summary,
}

impl SimulationSummary {
    pub fn from_records(records: &[SampleRecord]) -> Self {
        Self {
            runs: records.len(),
            retained_points: Summary::from_values(
                records.iter().map(|r| Some(r.clusters.total_points as f64)),
            ),
            fraction_clustered: Summary::from_values(
                records.iter().map(|r| Some(r.clusters.fraction_clustered)),
            ),
        }
    }
}

impl Analyzer {
    /// Draws `runs` point sets from the configured null model.
    ///
    /// All runs share one `StdRng` seeded from
    /// [`SimulationOptions::seed`](porescope_core::SimulationOptions), so the
    /// sequence is reproducible.
    pub fn simulate_point_sets(&self, runs: usize) -> Result<Vec<PointSet>> {
        let sim = &self.options().simulation;
        let mut rng = StdRng::seed_from_u64(sim.seed);
        (0..runs)
            .map(|_| match sim.min_separation {
                Some(min_dist) => {
                    generate_with_min_separation(sim.count, sim.radius, min_dist, &mut rng)
                }
                None => generate_sphere_points(sim.count, sim.radius, &mut rng),
            })
            .collect()
    }

    /// Simulates and analyzes `runs` samples of the [`GroupLabel::Random`]
    /// group, named `random_000`, `random_001`, ...
    ///
    /// Simulated points lie exactly on the sphere, so they skip hull
    /// optimization and report no removed points.
    pub fn simulate_random_group(&self, runs: usize) -> Result<Vec<SampleAnalysis>> {
        let analyses = self
            .simulate_point_sets(runs)?
            .into_iter()
            .enumerate()
            .map(|(i, points)| {
                self.analyze_untrimmed(format!("random_{i:03}"), GroupLabel::Random, points)
            })
            .collect::<Result<Vec<_>>>()?;
        log::info!("simulated {} random samples", analyses.len());
        Ok(analyses)
    }

    /// Simulates `runs` samples and summarizes retained counts and clustering.
    pub fn summarize_simulations(&self, runs: usize) -> Result<SimulationSummary> {
        let records: Vec<SampleRecord> = self
            .simulate_random_group(runs)?
            .into_iter()
            .map(SampleAnalysis::into_record)
            .collect();
        let summary = SimulationSummary::from_records(&records);
        log::info!(
            "{} runs: retained {:.1} ± {:.1} points, fraction clustered {:.3} ± {:.3}",
            summary.runs,
            summary.retained_points.mean.unwrap_or(f64::NAN),
            summary.retained_points.stdev.unwrap_or(f64::NAN),
            summary.fraction_clustered.mean.unwrap_or(f64::NAN),
            summary.fraction_clustered.stdev.unwrap_or(f64::NAN),
        );
        Ok(summary)
    }
}
