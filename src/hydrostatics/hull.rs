use serde::Serialize;
use tracing::{debug, info};

use super::config::HydroConfig;
use super::definition::HullDefinition;
use super::mass::MassComponent;
use super::profile_set::{ProfileSet, StationGap};
use super::waterline::{WaterlineSolution, WaterlineSolver};
use crate::error::{GeometryError, Result, ValidationError};
use crate::geometry::{Curve, Profile};
use crate::math::{Aabb, Point3, TOLERANCE};

/// A built hull: fitted curves, sampled sections, and the upright
/// equilibrium at the configured target weight.
#[derive(Debug, Clone)]
pub struct Hull {
    name: String,
    description: String,
    curves: Vec<Curve>,
    bounds: Aabb,
    regular: ProfileSet,
    main: ProfileSet,
    volume: f64,
    cg: Point3,
    target_weight: f64,
    target_payload: f64,
    config: HydroConfig,
    equilibrium: WaterlineSolution,
}

impl Hull {
    /// Builds a hull from its definition.
    ///
    /// Off-center curves get a mirror image, the curves are sampled into the
    /// regular and main profile sets, the enclosed volume is integrated and
    /// the upright waterline is solved for `target_weight + target_payload`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or a curve is invalid, the
    /// sections leave an interior gap or enclose no volume, or the waterline
    /// cannot be solved.
    pub fn build(definition: &HullDefinition, config: HydroConfig) -> Result<Self> {
        config.validate()?;
        let curves = fit_curves(definition, config.point_tolerance)?;

        let bounds = Aabb::from_points(curves.iter().flat_map(Curve::points));
        let regular = ProfileSet::regular(
            &curves,
            (bounds.min.x, bounds.max.x),
            config.station_step,
            config.point_tolerance,
        )?;
        let main = ProfileSet::sample(
            &curves,
            control_stations(&curves, config.point_tolerance),
            0.0,
            config.point_tolerance,
        )?;

        let total = regular
            .volume_properties()
            .ok_or(GeometryError::ZeroVolume)?;

        let initial_draft = definition
            .target_waterline
            .unwrap_or(config.initial_depth_fraction * bounds.depth());
        let equilibrium = WaterlineSolver::new(definition.total_weight())
            .with_config(&config)
            .with_initial_draft(initial_draft)
            .execute(&regular)?;

        info!(
            hull = %definition.name,
            curves = curves.len(),
            stations = regular.profiles().len(),
            gaps = regular.gaps().len(),
            volume = total.volume,
            waterline = equilibrium.waterline,
            "hull built"
        );

        Ok(Self {
            name: definition.name.clone(),
            description: definition.description.clone(),
            curves,
            bounds,
            regular,
            main,
            volume: total.volume,
            cg: total.centroid,
            target_weight: definition.target_weight,
            target_payload: definition.target_payload,
            config,
            equilibrium,
        })
    }

    /// Hull name from the definition.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description from the definition.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Input curves followed by their generated mirrors.
    #[must_use]
    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    /// Box around every control point, mirrors included.
    #[must_use]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Sections at uniform spacing, used for integration.
    #[must_use]
    pub fn regular_profiles(&self) -> &ProfileSet {
        &self.regular
    }

    /// Sections at every control-point station, for inspection.
    #[must_use]
    pub fn main_profiles(&self) -> &ProfileSet {
        &self.main
    }

    /// Enclosed volume in m³.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Centroid of the enclosed volume, used as the hull's center of gravity.
    #[must_use]
    pub fn cg(&self) -> Point3 {
        self.cg
    }

    /// Hull mass in kg.
    #[must_use]
    pub fn target_weight(&self) -> f64 {
        self.target_weight
    }

    /// Payload mass in kg.
    #[must_use]
    pub fn target_payload(&self) -> f64 {
        self.target_payload
    }

    /// Sampling and solver parameters the hull was built with.
    #[must_use]
    pub fn config(&self) -> &HydroConfig {
        &self.config
    }

    /// The hull structure as a point mass at its volumetric centroid.
    ///
    /// The centroid stands in for the CG of a shell of uniform thickness;
    /// hulls with concentrated ballast need a hand-placed component.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidParameter`] unless `mass` is
    /// positive and finite.
    pub fn mass_component(&self, mass: f64) -> Result<MassComponent> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(ValidationError::InvalidParameter(format!(
                "hull mass must be positive, got {mass} kg"
            ))
            .into());
        }
        Ok(MassComponent::new("Hull", mass, self.cg)?
            .with_description("hull structure at the volumetric centroid"))
    }

    /// Upright equilibrium at `target_weight + target_payload`.
    #[must_use]
    pub fn equilibrium(&self) -> &WaterlineSolution {
        &self.equilibrium
    }

    /// Curves rotated about the X axis through the hull CG.
    ///
    /// # Errors
    ///
    /// Returns an error if a rotated curve cannot be refitted.
    pub fn heeled_curves(&self, heel_deg: f64) -> Result<Vec<Curve>> {
        let angle = self.config.heel_convention.rotation_angle(heel_deg);
        self.curves
            .iter()
            .map(|c| c.rotated_about_x(&self.cg, angle))
            .collect()
    }

    /// Regular profile set resampled from the heeled curves. The hull itself
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the heeled curves cannot be fitted or sampled.
    pub fn heeled_profiles(&self, heel_deg: f64) -> Result<ProfileSet> {
        let curves = self.heeled_curves(heel_deg)?;
        self.regular.resample(&curves, self.config.point_tolerance)
    }

    /// Solves the waterline for `total_weight` at `heel_deg`.
    ///
    /// # Errors
    ///
    /// See [`WaterlineSolver::execute`].
    pub fn solve(&self, total_weight: f64, heel_deg: f64) -> Result<WaterlineSolution> {
        self.solve_from(total_weight, heel_deg, None)
    }

    /// Like [`Hull::solve`], seeding the search with a draft (height above
    /// the lowest point of the heeled geometry).
    ///
    /// # Errors
    ///
    /// See [`WaterlineSolver::execute`].
    pub fn solve_from(
        &self,
        total_weight: f64,
        heel_deg: f64,
        initial_draft: Option<f64>,
    ) -> Result<WaterlineSolution> {
        let mut solver = WaterlineSolver::new(total_weight).with_config(&self.config);
        if let Some(draft) = initial_draft {
            solver = solver.with_initial_draft(draft);
        }
        let solution = if heel_deg.abs() < TOLERANCE {
            solver.execute(&self.regular)?
        } else {
            solver.execute(&self.heeled_profiles(heel_deg)?)?
        };
        debug!(
            heel = heel_deg,
            waterline = solution.waterline,
            cb_y = solution.center_of_buoyancy.y,
            "heeled waterline solved"
        );
        Ok(solution)
    }

    /// Numeric summary of the build.
    #[must_use]
    pub fn summary(&self) -> HullSummary {
        HullSummary {
            name: self.name.clone(),
            volume: self.volume,
            displacement: self.equilibrium.displacement,
            waterline: self.equilibrium.waterline,
            cg: self.cg,
            cb: self.equilibrium.center_of_buoyancy,
            bounds: self.bounds,
            regular_profiles: ProfileSummary::of_set(&self.regular),
            main_profiles: ProfileSummary::of_set(&self.main),
            gaps: self.regular.gaps().to_vec(),
        }
    }
}

/// Fits the input curves and appends a mirror for every off-center curve
/// not already flagged as a mirror.
fn fit_curves(definition: &HullDefinition, tolerance: f64) -> Result<Vec<Curve>> {
    let fitted = definition
        .curves
        .iter()
        .map(super::definition::CurveDefinition::to_curve)
        .collect::<Result<Vec<_>>>()?;
    let mirrors = fitted
        .iter()
        .filter(|c| !c.is_mirrored() && !c.is_centerline(tolerance))
        .map(Curve::mirrored_copy)
        .collect::<Result<Vec<_>>>()?;
    Ok(fitted.into_iter().chain(mirrors).collect())
}

/// Every distinct control-point x, ascending.
fn control_stations(curves: &[Curve], tolerance: f64) -> Vec<f64> {
    let mut xs: Vec<f64> = curves.iter().flat_map(Curve::points).map(|p| p.x).collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup_by(|a, b| (*a - *b).abs() <= tolerance);
    xs
}

/// One profile as a station and its ordered points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub station: f64,
    /// Points in polygon order.
    pub points: Vec<[f64; 3]>,
}

impl ProfileSummary {
    fn of_set(set: &ProfileSet) -> Vec<Self> {
        set.profiles().iter().map(Self::of_profile).collect()
    }

    fn of_profile(profile: &Profile) -> Self {
        Self {
            station: profile.station(),
            points: profile.points().iter().map(|p| [p.x, p.y, p.z]).collect(),
        }
    }
}

/// Build output handed to collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HullSummary {
    pub name: String,
    /// Enclosed volume in m³.
    pub volume: f64,
    /// Upright displacement in kg.
    pub displacement: f64,
    /// Upright waterline height.
    pub waterline: f64,
    pub cg: Point3,
    /// Upright center of buoyancy.
    pub cb: Point3,
    pub bounds: Aabb,
    pub regular_profiles: Vec<ProfileSummary>,
    pub main_profiles: Vec<ProfileSummary>,
    pub gaps: Vec<StationGap>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{EquilibriumError, HullformError};
    use crate::hydrostatics::definition::CurveDefinition;

    fn box_hull(weight: f64, payload: f64) -> HullDefinition {
        HullDefinition::new(vec![
            CurveDefinition::new("chine", vec![[0.0, 0.3, 0.0], [5.0, 0.3, 0.0]]),
            CurveDefinition::new("gunwale", vec![[0.0, 0.3, 0.3], [5.0, 0.3, 0.3]]),
        ])
        .with_targets(weight, payload)
    }

    #[test]
    fn mirrors_off_center_curves_only() {
        let mut def = box_hull(50.0, 50.0);
        def.curves.push(CurveDefinition::new(
            "keel",
            vec![[0.0, 0.0, 0.0], [5.0, 0.0, 0.0]],
        ));
        let hull = Hull::build(&def, HydroConfig::default()).unwrap();
        let names: Vec<&str> = hull.curves().iter().map(Curve::name).collect();
        assert_eq!(
            names,
            ["chine", "gunwale", "keel", "Mirror of chine", "Mirror of gunwale"]
        );
        assert!((hull.bounds().beam() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn flagged_mirror_not_mirrored_again() {
        let mut def = box_hull(50.0, 50.0);
        let mut flagged =
            CurveDefinition::new("chine'", vec![[0.0, -0.3, 0.0], [5.0, -0.3, 0.0]]);
        flagged.mirrored = true;
        def.curves.push(flagged);
        let hull = Hull::build(&def, HydroConfig::default()).unwrap();
        assert_eq!(hull.curves().len(), 5);
        assert!(hull
            .curves()
            .iter()
            .all(|c| !c.name().starts_with("Mirror of chine'")));
    }

    #[test]
    fn box_build() {
        let hull = Hull::build(&box_hull(50.0, 50.0), HydroConfig::default()).unwrap();
        assert!((hull.volume() - 0.9).abs() < 1e-9);
        assert!((hull.cg().z - 0.15).abs() < 1e-9);
        let eq = hull.equilibrium();
        assert!((eq.volume - 0.1).abs() <= 0.001);
        assert!((eq.waterline - 0.1 / 3.0).abs() <= 1.0 / 3000.0 + 1e-9);
        assert_eq!(hull.main_profiles().stations(), &[0.0, 5.0]);
    }

    #[test]
    fn heel_does_not_mutate_hull() {
        let hull = Hull::build(&box_hull(50.0, 50.0), HydroConfig::default()).unwrap();
        let before = hull.curves()[0].points().to_vec();
        let heeled = hull.heeled_profiles(20.0).unwrap();
        assert_eq!(hull.curves()[0].points(), before.as_slice());
        assert_eq!(heeled.stations(), hull.regular_profiles().stations());
        let sol = hull.solve(100.0, 20.0).unwrap();
        assert!((sol.displacement - 100.0).abs() <= 1.0);
    }

    #[test]
    fn overloaded_hull_fails_build() {
        let err = Hull::build(&box_hull(600.0, 400.0), HydroConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            HullformError::Equilibrium(EquilibriumError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn hull_mass_sits_at_centroid() {
        let hull = Hull::build(&box_hull(50.0, 50.0), HydroConfig::default()).unwrap();
        let component = hull.mass_component(22.0).unwrap();
        assert_eq!(component.name, "Hull");
        assert!((component.mass - 22.0).abs() < f64::EPSILON);
        assert_eq!(component.position, hull.cg());
        assert!(hull.mass_component(0.0).is_err());
    }

    #[test]
    fn summary_lists_profiles() {
        let hull = Hull::build(&box_hull(50.0, 50.0), HydroConfig::default()).unwrap();
        let summary = hull.summary();
        assert_eq!(summary.regular_profiles.len(), 100);
        assert_eq!(summary.regular_profiles[0].points.len(), 4);
        let upright = hull.equilibrium().displacement;
        assert!((summary.displacement - upright).abs() < f64::EPSILON);
    }
}
