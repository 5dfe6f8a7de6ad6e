//! Hull optimization: trimming of the farthest outlying points.
//!
//! Points are ranked by descending distance from the centroid. At step `k`
//! the optimizer compares the set without the `k - 1` farthest points
//! (`current`) against the set without the `k` farthest points (`test`), and
//! accepts the removal while the test set's vertex-usage ratio
//! (`hull vertices / points`) does not drop. At most
//! `floor(budget_fraction · R)` points are ever removed.
//!
//! The run is an explicit state machine over the immutable ranked sequence:
//! the state is the cutoff plus the hull of `current`, and each transition
//! either accepts the next removal or stops for a [`StopReason`].

use glam::DVec3;
use porescope_core::{HullOptimizerOptions, PointSet, Result, TestSphericity};
use serde::{Deserialize, Serialize};

use crate::hull::{compute_hull, ConvexHull};
use crate::shape::sphericity;

/// Why the optimizer stopped trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Removing the next point would lower the vertex-usage ratio.
    RatioDecreased,
    /// A candidate hull could not be computed.
    HullFailed,
    /// The removal budget was used up (or was zero).
    BudgetExhausted,
}

/// Diagnostics of one evaluated removal step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerStep {
    /// 1-based step index; step `k` considers removing the `k`-th farthest point.
    pub step: usize,
    pub current_ratio: f64,
    /// `None` when the test hull failed.
    pub test_ratio: Option<f64>,
    pub current_surface_area: f64,
    pub current_volume: f64,
    pub current_sphericity: Option<f64>,
    /// Follows [`TestSphericity`].
    pub test_sphericity: Option<f64>,
    /// Whether the removal was applied.
    pub accepted: bool,
}

/// Result of a hull optimization run.
#[derive(Debug, Clone)]
pub struct HullOptimization {
    points: PointSet,
    order: Vec<usize>,
    removed: usize,
    budget: usize,
    stop_reason: StopReason,
    steps: Vec<OptimizerStep>,
}

impl HullOptimization {
    /// Returns the surviving points, farthest from the centroid first.
    #[must_use]
    pub fn points(&self) -> &PointSet {
        &self.points
    }

    /// Consumes the result and returns the surviving points.
    #[must_use]
    pub fn into_points(self) -> PointSet {
        self.points
    }

    /// Returns the number of trimmed points.
    #[must_use]
    pub fn points_removed(&self) -> usize {
        self.removed
    }

    /// Returns the maximum number of removals that was allowed.
    #[must_use]
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Returns why trimming stopped.
    #[must_use]
    pub fn stop_reason(&self) -> StopReason {
        self.stop_reason
    }

    /// Returns every evaluated step, in order.
    #[must_use]
    pub fn steps(&self) -> &[OptimizerStep] {
        &self.steps
    }

    /// Returns the input indices of the trimmed points, farthest first.
    #[must_use]
    pub fn removed_indices(&self) -> &[usize] {
        &self.order[..self.removed]
    }

    /// Returns the input indices of the surviving points, in output order.
    #[must_use]
    pub fn kept_indices(&self) -> &[usize] {
        &self.order[self.removed..]
    }
}

/// Ranks point indices by descending distance from the centroid.
///
/// Equal distances keep input order.
#[must_use]
pub fn rank_by_centroid_distance(points: &PointSet) -> Vec<usize> {
    let Some(centroid) = points.centroid() else {
        return Vec::new();
    };
    let distances: Vec<f64> = points.iter().map(|p| p.distance(centroid)).collect();
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| distances[b].total_cmp(&distances[a]));
    order
}

/// Trims outlying points from `points`.
///
/// A hull failure never propagates: the optimizer stops and keeps the
/// current cutoff.
///
/// # Errors
///
/// Returns [`porescope_core::PorescopeError::InvalidParameter`] if `options`
/// are out of range.
pub fn optimize_hull(points: &PointSet, options: &HullOptimizerOptions) -> Result<HullOptimization> {
    options.validate()?;

    let order = rank_by_centroid_distance(points);
    let ranked: Vec<DVec3> = order.iter().map(|&i| points.points()[i]).collect();
    let budget = options.budget(ranked.len());

    let (removed, stop_reason, steps) = run(&ranked, budget, options.test_sphericity);

    log::debug!(
        "hull optimization removed {removed}/{} points (budget {budget}, {stop_reason:?})",
        ranked.len()
    );

    Ok(HullOptimization {
        points: PointSet::new(ranked[removed..].to_vec()),
        order,
        removed,
        budget,
        stop_reason,
        steps,
    })
}

/// State carried between steps: the accepted cutoff and the hull of
/// `ranked[cutoff..]`.
struct TrimState {
    cutoff: usize,
    current: ConvexHull,
}

fn run(
    ranked: &[DVec3],
    budget: usize,
    mode: TestSphericity,
) -> (usize, StopReason, Vec<OptimizerStep>) {
    let mut steps = Vec::new();
    if budget == 0 {
        return (0, StopReason::BudgetExhausted, steps);
    }

    let mut state = match compute_hull(&PointSet::new(ranked.to_vec())) {
        Ok(current) => TrimState { cutoff: 0, current },
        Err(err) => {
            log::debug!("hull optimization stopped before step 1: {err}");
            return (0, StopReason::HullFailed, steps);
        }
    };

    for step in 1..=budget {
        let current = &state.current;
        let current_ratio = current.vertex_usage_ratio();
        let current_sphericity = sphericity(current.volume(), current.surface_area());

        let test = compute_hull(&PointSet::new(ranked[step..].to_vec()));
        let test_ratio = test.as_ref().ok().map(ConvexHull::vertex_usage_ratio);
        let test_sphericity = match (mode, &test) {
            (TestSphericity::Candidate, Ok(hull)) => sphericity(hull.volume(), hull.surface_area()),
            (TestSphericity::Candidate, Err(_)) => None,
            (TestSphericity::CurrentShape, _) => current_sphericity,
        };

        let outcome = match test {
            Ok(hull) if hull.vertex_usage_ratio() < current_ratio => {
                Err(StopReason::RatioDecreased)
            }
            Ok(hull) => Ok(hull),
            Err(_) => Err(StopReason::HullFailed),
        };

        let record = OptimizerStep {
            step,
            current_ratio,
            test_ratio,
            current_surface_area: current.surface_area(),
            current_volume: current.volume(),
            current_sphericity,
            test_sphericity,
            accepted: outcome.is_ok(),
        };
        log::trace!("hull optimization step {record:?}");
        steps.push(record);

        match outcome {
            Ok(hull) => {
                state = TrimState {
                    cutoff: step,
                    current: hull,
                };
            }
            Err(reason) => return (state.cutoff, reason, steps),
        }
    }

    (state.cutoff, StopReason::BudgetExhausted, steps)
}
