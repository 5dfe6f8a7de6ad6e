//! Configuration options for an analysis run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PorescopeError, Result};
use crate::labeling::BorderPolicy;

/// Global configuration for the porescope pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Density clustering parameters.
    pub clustering: ClusterOptions,

    /// Outlier trimming parameters.
    pub hull_optimizer: HullOptimizerOptions,

    /// Null-model simulation parameters.
    pub simulation: SimulationOptions,

    /// Neighborhood radii evaluated by eps sweeps.
    pub eps_sweep: Vec<f64>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            clustering: ClusterOptions::default(),
            hull_optimizer: HullOptimizerOptions::default(),
            simulation: SimulationOptions::default(),
            eps_sweep: vec![0.1, 0.15, 0.2, 0.25, 0.3],
        }
    }
}

impl AnalysisOptions {
    /// Parses options from JSON; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Serializes options as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("loaded analysis options from {}", path.as_ref().display());
        Self::from_json_str(&text)
    }

    /// Saves options to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Checks every parameter range.
    pub fn validate(&self) -> Result<()> {
        self.clustering.validate()?;
        self.hull_optimizer.validate()?;
        self.simulation.validate()?;
        for &eps in &self.eps_sweep {
            validate_eps(eps)?;
        }
        Ok(())
    }
}

/// DBSCAN parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterOptions {
    /// Neighborhood radius (microns).
    pub eps: f64,
    /// Minimum neighborhood size of a core point, the point itself included.
    pub min_points: usize,
    /// Treatment of border points.
    pub border_policy: BorderPolicy,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            eps: 0.2,
            min_points: 3,
            border_policy: BorderPolicy::IncludeBorders,
        }
    }
}

impl ClusterOptions {
    /// Checks `eps >= 0` and `min_points >= 1`.
    pub fn validate(&self) -> Result<()> {
        validate_eps(self.eps)?;
        if self.min_points == 0 {
            return Err(PorescopeError::InvalidParameter(
                "min_points must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Which area and volume feed the sphericity reported for the `test` candidate.
///
/// The stop decision never depends on it; it only changes the step trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TestSphericity {
    /// Sphericity of the test candidate's own hull.
    #[default]
    Candidate,
    /// Reuse the current configuration's area and volume, matching
    /// historical result tables.
    CurrentShape,
}

/// Hull optimizer parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullOptimizerOptions {
    /// Largest share of a sample that may be trimmed, in `[0, 1]`.
    pub budget_fraction: f64,
    /// Source of the test candidate's sphericity.
    pub test_sphericity: TestSphericity,
}

impl Default for HullOptimizerOptions {
    fn default() -> Self {
        Self {
            budget_fraction: 0.1,
            test_sphericity: TestSphericity::Candidate,
        }
    }
}

impl HullOptimizerOptions {
    /// Maximum number of removal steps for a sample of `point_count` points.
    #[must_use]
    pub fn budget(&self, point_count: usize) -> usize {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let budget = (self.budget_fraction * point_count as f64).floor() as usize;
        budget.min(point_count)
    }

    /// Checks that the budget fraction lies in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.budget_fraction) {
            return Err(PorescopeError::InvalidParameter(format!(
                "budget_fraction must be within [0, 1], got {}",
                self.budget_fraction
            )));
        }
        Ok(())
    }
}

/// Null-model simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    /// Points drawn per run, before separation filtering.
    pub count: usize,
    /// Sphere radius (microns).
    pub radius: f64,
    /// Minimum nearest-neighbor distance kept, if any.
    pub min_separation: Option<f64>,
    /// Seed of the run generator.
    pub seed: u64,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            count: 150,
            radius: 1.25,
            min_separation: Some(0.16),
            seed: 42,
        }
    }
}

impl SimulationOptions {
    /// Checks count, radius and separation.
    pub fn validate(&self) -> Result<()> {
        validate_sphere(self.count, self.radius)?;
        if let Some(min_dist) = self.min_separation {
            validate_min_separation(min_dist)?;
        }
        Ok(())
    }
}

/// Rejects negative or non-finite neighborhood radii.
pub fn validate_eps(eps: f64) -> Result<()> {
    if eps.is_finite() && eps >= 0.0 {
        Ok(())
    } else {
        Err(PorescopeError::InvalidParameter(format!(
            "eps must be a finite non-negative distance, got {eps}"
        )))
    }
}

/// Rejects empty samples and non-positive radii.
pub fn validate_sphere(count: usize, radius: f64) -> Result<()> {
    if count == 0 {
        return Err(PorescopeError::InvalidParameter(
            "point count must be positive".to_string(),
        ));
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(PorescopeError::InvalidParameter(format!(
            "radius must be positive, got {radius}"
        )));
    }
    Ok(())
}

/// Rejects negative or non-finite separations.
pub fn validate_min_separation(min_dist: f64) -> Result<()> {
    if min_dist.is_finite() && min_dist >= 0.0 {
        Ok(())
    } else {
        Err(PorescopeError::InvalidParameter(format!(
            "minimum separation must be non-negative, got {min_dist}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = AnalysisOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.clustering.min_points, 3);
        assert_eq!(options.hull_optimizer.budget(131), 13);
        assert_eq!(options.hull_optimizer.budget(9), 0);
    }

    #[test]
    fn test_json_round_trip_with_partial_input() {
        let options =
            AnalysisOptions::from_json_str(r#"{"clustering": {"eps": 0.25}}"#).unwrap();
        assert!((options.clustering.eps - 0.25).abs() < f64::EPSILON);
        assert_eq!(options.clustering.min_points, 3);
        assert_eq!(options.simulation, SimulationOptions::default());

        let text = options.to_json_string().unwrap();
        assert_eq!(AnalysisOptions::from_json_str(&text).unwrap(), options);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(AnalysisOptions::from_json_str(r#"{"clustering": {"eps": -0.1}}"#).is_err());
        assert!(AnalysisOptions::from_json_str(r#"{"clustering": {"min_points": 0}}"#).is_err());
        assert!(
            AnalysisOptions::from_json_str(r#"{"hull_optimizer": {"budget_fraction": 1.5}}"#)
                .is_err()
        );
        assert!(AnalysisOptions::from_json_str(r#"{"simulation": {"radius": 0.0}}"#).is_err());
        assert!(validate_eps(f64::NAN).is_err());
        assert!(validate_sphere(0, 1.0).is_err());
        assert!(validate_min_separation(-1.0).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "porescope_options_{}.json",
            std::process::id()
        ));
        let mut options = AnalysisOptions::default();
        options.hull_optimizer.test_sphericity = TestSphericity::CurrentShape;
        options.save(&path).unwrap();
        let loaded = AnalysisOptions::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, options);
    }
}
