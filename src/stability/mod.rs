//! Righting-arm (GZ) curves from a heel sweep.

mod sweep;

pub use sweep::StabilitySweep;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::hydrostatics::{CenterOfGravity, MassComponent};
use crate::math::Point3;

/// Largest number of heel angles a single sweep may sample.
pub const MAX_SWEEP_SAMPLES: usize = 10_000;

/// Parameters of a heel sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Paddler mass in kg; the hull's target payload when `None`.
    pub paddler_weight: Option<f64>,
    /// Paddler center of gravity height in m.
    pub paddler_cg_z: f64,
    /// Hull mass in kg; the hull's target weight when `None`.
    pub hull_weight: Option<f64>,
    /// Largest heel angle in degrees.
    pub max_angle: f64,
    /// Angle increment in degrees.
    pub step: f64,
    /// Stop at the first negative GZ that follows a positive one.
    pub break_on_vanishing: bool,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            paddler_weight: None,
            paddler_cg_z: 0.25,
            hull_weight: None,
            max_angle: 90.0,
            step: 3.0,
            break_on_vanishing: false,
        }
    }
}

impl StabilityConfig {
    /// Overrides the hull and paddler masses in kg.
    #[must_use]
    pub fn with_weights(mut self, hull_weight: f64, paddler_weight: f64) -> Self {
        self.hull_weight = Some(hull_weight);
        self.paddler_weight = Some(paddler_weight);
        self
    }

    /// Sets the paddler CG height.
    #[must_use]
    pub fn with_paddler_cg_z(mut self, paddler_cg_z: f64) -> Self {
        self.paddler_cg_z = paddler_cg_z;
        self
    }

    /// Sets the largest heel angle and the increment, in degrees.
    #[must_use]
    pub fn with_angles(mut self, max_angle: f64, step: f64) -> Self {
        self.max_angle = max_angle;
        self.step = step;
        self
    }

    /// Stops the sweep once the curve turns negative.
    #[must_use]
    pub fn with_break_on_vanishing(mut self, break_on_vanishing: bool) -> Self {
        self.break_on_vanishing = break_on_vanishing;
        self
    }

    /// Heel angles `0, step, 2·step, …` up to and including `max_angle`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidParameter`] for a non-positive step,
    /// a negative maximum, or more than [`MAX_SWEEP_SAMPLES`] angles.
    pub fn angles(&self) -> Result<Vec<f64>> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ValidationError::InvalidParameter(format!(
                "angle step must be positive, got {}",
                self.step
            ))
            .into());
        }
        if !(self.max_angle.is_finite() && self.max_angle >= 0.0) {
            return Err(ValidationError::InvalidParameter(format!(
                "max angle must be non-negative, got {}",
                self.max_angle
            ))
            .into());
        }
        let steps = (self.max_angle / self.step + 1e-9).floor();
        #[allow(clippy::cast_precision_loss)]
        let cap = MAX_SWEEP_SAMPLES as f64;
        if steps >= cap {
            return Err(ValidationError::InvalidParameter(format!(
                "angle step {} over {} degrees exceeds {MAX_SWEEP_SAMPLES} samples",
                self.step, self.max_angle
            ))
            .into());
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = steps as usize;
        #[allow(clippy::cast_precision_loss)]
        Ok((0..=count).map(|k| k as f64 * self.step).collect())
    }
}

/// Center of gravity of the hull and a paddler seated on the centerline at
/// the hull CG station.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidParameter`] if a weight is negative or
/// not finite, or both are zero.
pub fn combined_cg(
    hull_cg: &Point3,
    hull_weight: f64,
    paddler_weight: f64,
    paddler_cg_z: f64,
) -> Result<CenterOfGravity> {
    let paddler = Point3::new(hull_cg.x, 0.0, paddler_cg_z);
    CenterOfGravity::from_components(&[
        MassComponent::new("Hull", hull_weight, *hull_cg)?,
        MassComponent::new("Paddler", paddler_weight, paddler)?,
    ])
}

/// One heel angle of the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StabilityPoint {
    /// Heel angle in degrees.
    pub angle: f64,
    /// Righting arm in m.
    pub gz: f64,
    /// Righting moment in N·m.
    pub moment: f64,
    /// Waterline height in the heeled frame.
    pub waterline: f64,
    /// Waterline height above the lowest point of the heeled hull.
    pub draft: f64,
    /// Displaced mass in kg.
    pub displacement: f64,
    /// Center of buoyancy in the heeled frame.
    pub center_of_buoyancy: Point3,
    /// Combined CG rotated with the hull.
    pub center_of_gravity: Point3,
}

/// The GZ curve with its derived scalars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StabilityCurve {
    /// Samples in ascending angle order.
    pub points: Vec<StabilityPoint>,
    /// Interpolated heel angle where GZ turns negative.
    pub vanishing_angle: Option<f64>,
    /// Largest righting moment in N·m.
    pub max_moment: f64,
    /// Heel angle of [`StabilityCurve::max_moment`].
    pub max_moment_angle: f64,
}

impl StabilityCurve {
    /// Derives the vanishing angle and peak moment from ordered samples.
    #[must_use]
    pub fn from_points(points: Vec<StabilityPoint>) -> Self {
        let vanishing_angle = vanishing_angle(&points);
        let (max_moment, max_moment_angle) = points
            .iter()
            .map(|p| (p.moment, p.angle))
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .unwrap_or((0.0, 0.0));
        Self {
            points,
            vanishing_angle,
            max_moment,
            max_moment_angle,
        }
    }

    /// Largest righting arm and its angle.
    #[must_use]
    pub fn max_gz(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.gz, p.angle))
            .max_by(|a, b| a.0.total_cmp(&b.0))
    }
}

/// Linear interpolation between the last sample with `GZ ≥ 0` and the first
/// sample with `GZ < 0` after it.
fn vanishing_angle(points: &[StabilityPoint]) -> Option<f64> {
    points.windows(2).find_map(|w| {
        let (a, b) = (&w[0], &w[1]);
        (b.gz < 0.0 && a.gz >= 0.0)
            .then(|| a.angle + (0.0 - a.gz) * (b.angle - a.angle) / (b.gz - a.gz))
    })
}
