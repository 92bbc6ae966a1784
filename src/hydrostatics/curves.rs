//! Displacement and buoyancy tabulated over waterlines and heel angles.

use std::borrow::Cow;

use serde::Serialize;
use tracing::debug;

use super::config::HeelConvention;
use super::hull::Hull;
use super::profile_set::ProfileSet;
use crate::error::Result;
use crate::geometry::{Profile, SectionProperties};
use crate::math::{Point3, TOLERANCE};

/// Submerged volume and its centroid at one waterline and heel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HydrostaticPoint {
    /// Heel angle in degrees.
    pub heel: f64,
    /// Waterline height in the heeled frame.
    pub waterline: f64,
    /// Submerged volume in m³.
    pub volume: f64,
    /// Displaced mass in kg.
    pub displacement: f64,
    /// `None` when the hull is dry at this waterline.
    pub center_of_buoyancy: Option<Point3>,
}

impl ProfileSet {
    /// Submerged volume, displacement and center of buoyancy at each
    /// waterline, in input order. No equilibrium is solved.
    #[must_use]
    pub fn displacement_curve(
        &self,
        waterlines: &[f64],
        water_density: f64,
    ) -> Vec<HydrostaticPoint> {
        waterlines
            .iter()
            .map(|&waterline| hydrostatics_at(self, 0.0, waterline, water_density))
            .collect()
    }
}

impl Profile {
    /// Submerged section properties with the section heeled about `origin`
    /// to each angle (degrees), cut at a fixed `waterline`. Dry sections give
    /// `None`.
    #[must_use]
    pub fn submerged_at_heel_angles(
        &self,
        origin: &Point3,
        heel_angles: &[f64],
        waterline: f64,
        convention: HeelConvention,
    ) -> Vec<Option<SectionProperties>> {
        heel_angles
            .iter()
            .map(|&heel| {
                self.rotated_about_x(origin, convention.rotation_angle(heel))
                    .submerged_properties(waterline)
            })
            .collect()
    }
}

impl Hull {
    /// Displacement curve of the hull heeled to `heel_deg`, for waterline
    /// heights in the heeled frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the heeled curves cannot be fitted or sampled.
    pub fn displacement_curve(
        &self,
        heel_deg: f64,
        waterlines: &[f64],
    ) -> Result<Vec<HydrostaticPoint>> {
        let set = self.profiles_at(heel_deg)?;
        let density = self.config().water_density;
        Ok(waterlines
            .iter()
            .map(|&waterline| hydrostatics_at(&set, heel_deg, waterline, density))
            .collect())
    }

    /// Submerged volume and center of buoyancy at each heel angle for one
    /// fixed waterline height. Unlike a stability sweep, the displacement is
    /// allowed to change with heel.
    ///
    /// # Errors
    ///
    /// Returns an error if the heeled curves cannot be fitted or sampled.
    pub fn buoyancy_at_heel_angles(
        &self,
        heel_angles: &[f64],
        waterline: f64,
    ) -> Result<Vec<HydrostaticPoint>> {
        let density = self.config().water_density;
        heel_angles
            .iter()
            .map(|&heel| {
                let set = self.profiles_at(heel)?;
                let point = hydrostatics_at(&set, heel, waterline, density);
                debug!(heel, volume = point.volume, "buoyancy at heel");
                Ok(point)
            })
            .collect()
    }

    fn profiles_at(&self, heel_deg: f64) -> Result<Cow<'_, ProfileSet>> {
        if heel_deg.abs() < TOLERANCE {
            Ok(Cow::Borrowed(self.regular_profiles()))
        } else {
            Ok(Cow::Owned(self.heeled_profiles(heel_deg)?))
        }
    }
}

fn hydrostatics_at(
    set: &ProfileSet,
    heel: f64,
    waterline: f64,
    water_density: f64,
) -> HydrostaticPoint {
    let submerged = set.submerged(waterline);
    let volume = submerged.map_or(0.0, |v| v.volume);
    HydrostaticPoint {
        heel,
        waterline,
        volume,
        displacement: volume * water_density,
        center_of_buoyancy: submerged.map(|v| v.centroid),
    }
}
