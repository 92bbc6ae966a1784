use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Maps a heel angle to the right-hand rotation about the X axis.
///
/// A positive right-hand rotation swings the keel towards +y, immersing the
/// −y side. `StarboardDown` negates the angle so a positive heel immerses +y.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeelConvention {
    /// Heel angles are right-hand rotations about +X.
    #[default]
    RightHand,
    /// Positive heel immerses the +y side.
    StarboardDown,
}

impl HeelConvention {
    /// Rotation angle in radians for a heel given in degrees.
    #[must_use]
    pub fn rotation_angle(self, heel_deg: f64) -> f64 {
        match self {
            Self::RightHand => heel_deg.to_radians(),
            Self::StarboardDown => -heel_deg.to_radians(),
        }
    }

    /// Sign that turns `CG.y − CB.y` into a righting arm that is positive
    /// when the hull tends back upright.
    #[must_use]
    pub fn righting_sign(self) -> f64 {
        match self {
            Self::RightHand => 1.0,
            Self::StarboardDown => -1.0,
        }
    }
}

/// Parameters for hull sampling and the waterline solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydroConfig {
    /// Water density in kg/m³.
    pub water_density: f64,
    /// Target spacing between regular stations in m.
    pub station_step: f64,
    /// Solver stops when `|target − displaced| ≤ tolerance_kg`.
    pub tolerance_kg: f64,
    /// Solver iteration cap.
    pub max_iterations: usize,
    /// Initial waterline as a fraction of hull depth when no target
    /// waterline is given.
    pub initial_depth_fraction: f64,
    /// Distance below which two profile points are the same point.
    pub point_tolerance: f64,
    /// Sign convention for heel angles.
    pub heel_convention: HeelConvention,
}

impl Default for HydroConfig {
    fn default() -> Self {
        Self {
            water_density: 1000.0,
            station_step: 0.05,
            tolerance_kg: 1.0,
            max_iterations: 200,
            initial_depth_fraction: 0.5,
            point_tolerance: 1e-9,
            heel_convention: HeelConvention::RightHand,
        }
    }
}

impl HydroConfig {
    /// Sets the water density in kg/m³.
    #[must_use]
    pub fn with_water_density(mut self, water_density: f64) -> Self {
        self.water_density = water_density;
        self
    }

    /// Sets the target spacing of regular stations.
    #[must_use]
    pub fn with_station_step(mut self, station_step: f64) -> Self {
        self.station_step = station_step;
        self
    }

    /// Sets the solver tolerance on displaced mass.
    #[must_use]
    pub fn with_tolerance_kg(mut self, tolerance_kg: f64) -> Self {
        self.tolerance_kg = tolerance_kg;
        self
    }

    /// Sets the solver iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the heel sign convention.
    #[must_use]
    pub fn with_heel_convention(mut self, heel_convention: HeelConvention) -> Self {
        self.heel_convention = heel_convention;
        self
    }

    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidParameter`] for a non-positive
    /// density, step, tolerance or iteration cap, an initial depth fraction
    /// outside `(0, 1]`, or a negative point tolerance.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("water_density", self.water_density),
            ("station_step", self.station_step),
            ("tolerance_kg", self.tolerance_kg),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations must be at least 1".into()));
        }
        let fraction = self.initial_depth_fraction;
        if fraction <= 0.0 || !(0.0..=1.0).contains(&fraction) {
            return Err(invalid(format!(
                "initial_depth_fraction must be in (0, 1], got {fraction}"
            )));
        }
        if self.point_tolerance.is_nan() || self.point_tolerance < 0.0 {
            return Err(invalid(format!(
                "point_tolerance must be non-negative, got {}",
                self.point_tolerance
            )));
        }
        Ok(())
    }
}

fn invalid(message: String) -> crate::error::HullformError {
    ValidationError::InvalidParameter(message).into()
}
