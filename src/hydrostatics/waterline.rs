use serde::Serialize;
use tracing::{debug, trace};

use super::config::HydroConfig;
use super::profile_set::ProfileSet;
use crate::error::{EquilibriumError, GeometryError, Result, ValidationError};
use crate::math::Point3;

/// Floating equilibrium of a profile set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaterlineSolution {
    /// Waterline height in the set's frame.
    pub waterline: f64,
    /// Waterline height above the set's lowest point.
    pub draft: f64,
    /// Centroid of the submerged volume.
    pub center_of_buoyancy: Point3,
    /// Displaced mass in kg.
    pub displacement: f64,
    /// Submerged volume in m³.
    pub volume: f64,
    /// Solver iterations used.
    pub iterations: usize,
}

/// Finds the waterline at which a profile set displaces a target mass.
///
/// Each iteration clips every profile at the current waterline and corrects
/// the waterline by `Δh = (error / target) × draft`. The step is kept inside
/// the bracket of waterlines known to float too low or too high; a step that
/// leaves it, or follows an iteration that failed to halve the residual, is
/// replaced by bisection.
#[derive(Debug, Clone, Copy)]
pub struct WaterlineSolver {
    total_weight: f64,
    initial_draft: Option<f64>,
    initial_depth_fraction: f64,
    water_density: f64,
    tolerance_kg: f64,
    max_iterations: usize,
}

impl WaterlineSolver {
    /// Creates a solver for `total_weight` kg with default parameters.
    #[must_use]
    pub fn new(total_weight: f64) -> Self {
        Self {
            total_weight,
            initial_draft: None,
            initial_depth_fraction: 0.0,
            water_density: 0.0,
            tolerance_kg: 0.0,
            max_iterations: 0,
        }
        .with_config(&HydroConfig::default())
    }

    /// Takes density, tolerance, iteration cap and seed fraction from
    /// `config`.
    #[must_use]
    pub fn with_config(mut self, config: &HydroConfig) -> Self {
        self.initial_depth_fraction = config.initial_depth_fraction;
        self.water_density = config.water_density;
        self.tolerance_kg = config.tolerance_kg;
        self.max_iterations = config.max_iterations;
        self
    }

    /// Seeds the search with a draft above the set's lowest point.
    #[must_use]
    pub fn with_initial_draft(mut self, draft: f64) -> Self {
        self.initial_draft = Some(draft);
        self
    }

    /// Solves for equilibrium over `set`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidParameter`] for a non-positive
    /// weight, [`EquilibriumError::InsufficientVolume`] if the set displaces
    /// nothing, [`EquilibriumError::CapacityExceeded`] if even full immersion
    /// falls short of the target, and [`EquilibriumError::NotConverged`] when
    /// the iteration cap is reached.
    pub fn execute(&self, set: &ProfileSet) -> Result<WaterlineSolution> {
        let target = self.total_weight;
        if !(target.is_finite() && target > 0.0) {
            return Err(ValidationError::InvalidParameter(format!(
                "total weight must be positive, got {target}"
            ))
            .into());
        }
        let (Some(bottom), Some(top)) = (set.min_z(), set.max_z()) else {
            return Err(GeometryError::ZeroVolume.into());
        };

        let displaced = |waterline: f64| {
            set.submerged(waterline)
                .map_or(0.0, |v| v.volume * self.water_density)
        };

        let capacity = displaced(top);
        if capacity <= 0.0 {
            return Err(EquilibriumError::InsufficientVolume { target }.into());
        }
        if capacity < target - self.tolerance_kg {
            return Err(EquilibriumError::CapacityExceeded { target, capacity }.into());
        }

        let mut low = bottom;
        let mut high = top;
        let seed = self
            .initial_draft
            .unwrap_or(self.initial_depth_fraction * (top - bottom));
        let mut waterline = bottom + seed;
        if waterline <= low || waterline >= high {
            waterline = 0.5 * (low + high);
        }

        let mut error = target;
        let mut evaluated = waterline;
        let mut previous = f64::INFINITY;
        for iteration in 1..=self.max_iterations {
            evaluated = waterline;
            let mass = displaced(waterline);
            error = target - mass;
            trace!(
                iteration,
                waterline,
                residual = error,
                "waterline iteration"
            );

            if error.abs() <= self.tolerance_kg {
                return self.solution(set, waterline, bottom, iteration);
            }
            if error > 0.0 {
                low = waterline;
            } else {
                high = waterline;
            }

            let draft = waterline - bottom;
            let next = waterline + (error / target) * draft;
            let stalled = error.abs() > 0.5 * previous;
            waterline = if next > low && next < high && !stalled {
                next
            } else {
                0.5 * (low + high)
            };
            previous = error.abs();
        }

        Err(EquilibriumError::NotConverged {
            iterations: self.max_iterations,
            waterline: evaluated,
            residual: error,
        }
        .into())
    }

    fn solution(
        &self,
        set: &ProfileSet,
        waterline: f64,
        bottom: f64,
        iterations: usize,
    ) -> Result<WaterlineSolution> {
        let submerged = set
            .submerged(waterline)
            .ok_or(EquilibriumError::InsufficientVolume {
                target: self.total_weight,
            })?;
        let solution = WaterlineSolution {
            waterline,
            draft: waterline - bottom,
            center_of_buoyancy: submerged.centroid,
            displacement: submerged.volume * self.water_density,
            volume: submerged.volume,
            iterations,
        };
        debug!(
            waterline,
            displacement = solution.displacement,
            iterations,
            "waterline converged"
        );
        Ok(solution)
    }
}
