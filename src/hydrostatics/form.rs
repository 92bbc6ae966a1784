//! Hull form parameters at a waterline: principal dimensions and the block,
//! prismatic, midship and waterplane coefficients.

use serde::Serialize;

use super::hull::Hull;
use crate::error::{Result, ValidationError};
use crate::geometry::Profile;

/// Principal dimensions and form coefficients at one upright waterline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormParameters {
    pub waterline: f64,
    /// Waterline height above the keel.
    pub draft: f64,
    /// Length of the waterline (LWL).
    pub waterline_length: f64,
    /// Widest waterline beam (BWL).
    pub waterline_beam: f64,
    pub waterplane_area: f64,
    /// Largest submerged section area.
    pub max_section_area: f64,
    pub wetted_surface: f64,
    pub displaced_volume: f64,
    /// `∇ / (LWL · BWL · T)`
    pub block_coefficient: f64,
    /// `∇ / (Amax · LWL)`
    pub prismatic_coefficient: f64,
    /// `Amax / (BWL · T)`
    pub midship_coefficient: f64,
    /// `Awp / (LWL · BWL)`
    pub waterplane_coefficient: f64,
}

impl FormParameters {
    /// Computes the form parameters of `hull` at its solved waterline.
    ///
    /// # Errors
    ///
    /// See [`FormParameters::at_waterline`].
    pub fn compute(hull: &Hull) -> Result<Self> {
        Self::at_waterline(hull, hull.equilibrium().waterline)
    }

    /// Computes the form parameters of `hull` upright at `waterline`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidParameter`] if the waterline lies at
    /// or below the keel, or any coefficient denominator is zero.
    pub fn at_waterline(hull: &Hull, waterline: f64) -> Result<Self> {
        let set = hull.regular_profiles();
        let draft = waterline - hull.bounds().min.z;
        if draft.is_nan() || draft <= 0.0 {
            return Err(invalid(format!(
                "Invalid waterline {waterline}: at or below the keel"
            )));
        }
        let step = set.step();
        let profiles = set.profiles();

        let waterline_length = waterline_length(profiles, step, waterline);
        let waterline_beam = profiles
            .iter()
            .filter_map(|p| p.waterline_width(waterline))
            .fold(0.0, f64::max);
        let waterplane_area: f64 = profiles
            .iter()
            .filter_map(|p| p.waterline_width(waterline))
            .map(|w| w * step)
            .sum();
        let max_section_area = profiles
            .iter()
            .filter_map(|p| p.submerged_properties(waterline))
            .map(|s| s.area)
            .fold(0.0, f64::max);
        let wetted_surface: f64 = profiles
            .iter()
            .map(|p| p.wetted_perimeter(waterline) * step)
            .sum();
        let displaced_volume = set.submerged(waterline).map_or(0.0, |v| v.volume);

        let block = ratio(
            displaced_volume,
            waterline_length * waterline_beam * draft,
            "block coefficient",
        )?;
        let prismatic = ratio(
            displaced_volume,
            max_section_area * waterline_length,
            "prismatic coefficient",
        )?;
        let midship = ratio(
            max_section_area,
            waterline_beam * draft,
            "midship coefficient",
        )?;
        let waterplane = ratio(
            waterplane_area,
            waterline_length * waterline_beam,
            "waterplane coefficient",
        )?;

        Ok(Self {
            waterline,
            draft,
            waterline_length,
            waterline_beam,
            waterplane_area,
            max_section_area,
            wetted_surface,
            displaced_volume,
            block_coefficient: block,
            prismatic_coefficient: prismatic,
            midship_coefficient: midship,
            waterplane_coefficient: waterplane,
        })
    }
}

/// Longitudinal extent of the submerged stations. Each end is carried to the
/// point where the section bottoms cross the waterline, or to the slab edge
/// when the end station is still submerged.
fn waterline_length(profiles: &[Profile], step: f64, waterline: f64) -> f64 {
    let bottoms: Vec<(f64, f64)> = profiles
        .iter()
        .filter_map(|p| p.min_z().map(|z| (p.station(), z)))
        .collect();
    let wet = |i: usize| bottoms[i].1 < waterline;
    let (Some(first), Some(last)) = (
        (0..bottoms.len()).find(|&i| wet(i)),
        (0..bottoms.len()).rfind(|&i| wet(i)),
    ) else {
        return 0.0;
    };

    let crossing = |wet_i: usize, dry_i: usize| {
        let (x0, z0) = bottoms[wet_i];
        let (x1, z1) = bottoms[dry_i];
        x0 + (waterline - z0) / (z1 - z0) * (x1 - x0)
    };
    let aft = if first > 0 {
        crossing(first, first - 1)
    } else {
        bottoms[first].0 - 0.5 * step
    };
    let fore = if last + 1 < bottoms.len() {
        crossing(last, last + 1)
    } else {
        bottoms[last].0 + 0.5 * step
    };
    fore - aft
}

fn ratio(numerator: f64, denominator: f64, what: &str) -> Result<f64> {
    if denominator.abs() < f64::EPSILON {
        return Err(invalid(format!("{what}: zero denominator")));
    }
    Ok(numerator / denominator)
}

fn invalid(message: String) -> crate::error::HullformError {
    ValidationError::InvalidParameter(message).into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::hydrostatics::config::HydroConfig;
    use crate::hydrostatics::definition::{CurveDefinition, HullDefinition};

    fn box_hull() -> Hull {
        let def = HullDefinition::new(vec![
            CurveDefinition::new("chine", vec![[0.0, 0.3, 0.0], [5.0, 0.3, 0.0]]),
            CurveDefinition::new("gunwale", vec![[0.0, 0.3, 0.3], [5.0, 0.3, 0.3]]),
        ])
        .with_targets(50.0, 50.0);
        Hull::build(&def, HydroConfig::default()).unwrap()
    }

    /// Keel dipping to z = 0 amidships, rising to 0.2 at both ends.
    fn rockered_hull() -> Hull {
        let def = HullDefinition::new(vec![
            CurveDefinition::new(
                "keel",
                vec![[0.0, 0.0, 0.2], [2.5, 0.0, 0.0], [5.0, 0.0, 0.2]],
            ),
            CurveDefinition::new(
                "gunwale",
                vec![[0.0, 0.0, 0.35], [2.5, 0.3, 0.3], [5.0, 0.0, 0.35]],
            ),
        ])
        .with_targets(20.0, 40.0);
        Hull::build(&def, HydroConfig::default()).unwrap()
    }

    #[test]
    fn box_coefficients_are_one() {
        let form = FormParameters::at_waterline(&box_hull(), 0.1).unwrap();
        assert!((form.draft - 0.1).abs() < 1e-12);
        assert!((form.waterline_length - 5.0).abs() < 1e-9);
        assert!((form.waterline_beam - 0.6).abs() < 1e-9);
        assert!((form.waterplane_area - 3.0).abs() < 1e-9);
        assert!((form.max_section_area - 0.06).abs() < 1e-9);
        // Bottom plus two sides, ends excluded.
        assert!((form.wetted_surface - 5.0 * 0.8).abs() < 1e-9);
        for c in [
            form.block_coefficient,
            form.prismatic_coefficient,
            form.midship_coefficient,
            form.waterplane_coefficient,
        ] {
            assert!((c - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn solved_waterline_by_default() {
        let hull = box_hull();
        let form = FormParameters::compute(&hull).unwrap();
        assert!((form.waterline - hull.equilibrium().waterline).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_waterline() {
        let err = FormParameters::at_waterline(&box_hull(), -0.05).unwrap_err();
        assert!(format!("{err}").contains("Invalid waterline"));
    }

    #[test]
    fn rockered_waterline_shorter_than_hull() {
        let hull = rockered_hull();
        let form = FormParameters::at_waterline(&hull, 0.1).unwrap();
        assert!(form.waterline_length > 0.0);
        assert!(form.waterline_length < hull.bounds().length());
        assert!(form.block_coefficient > 0.0 && form.block_coefficient < 1.0);
        assert!(form.prismatic_coefficient > 0.0 && form.prismatic_coefficient < 1.0);
    }
}
