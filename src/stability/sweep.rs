use tracing::{debug, info, warn};

use super::{combined_cg, StabilityConfig, StabilityCurve, StabilityPoint};
use crate::error::Result;
use crate::hydrostatics::{CenterOfGravity, Hull, LoadingLimits, MassComponent};
use crate::math::transform::rotate_about_x;
use crate::math::{Point3, GRAVITY};

/// Heels a hull through a range of angles and records the righting arm at
/// each one.
///
/// At every angle the hull is rotated about the X axis through its CG, the
/// waterline is solved for the loaded weight, and `GZ = CG.y − CB.y` is taken
/// in the heeled frame. The loading is either an explicit list of mass
/// components or the hull plus one paddler from [`StabilityConfig`].
/// Sequential sweeps seed each solve with the previous draft; with the
/// `parallel` feature every angle is solved independently from the upright
/// draft.
#[derive(Debug, Clone)]
pub struct StabilitySweep<'a> {
    hull: &'a Hull,
    config: StabilityConfig,
    components: Option<Vec<MassComponent>>,
}

impl<'a> StabilitySweep<'a> {
    /// Creates a sweep over `hull` with the default configuration.
    #[must_use]
    pub fn new(hull: &'a Hull) -> Self {
        Self {
            hull,
            config: StabilityConfig::default(),
            components: None,
        }
    }

    /// Replaces the sweep configuration.
    #[must_use]
    pub fn with_config(mut self, config: StabilityConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the hull with explicit mass components. They replace the
    /// hull and paddler weights of the configuration and must include the
    /// hull's own mass, see [`Hull::mass_component`].
    #[must_use]
    pub fn with_components(mut self, components: Vec<MassComponent>) -> Self {
        self.components = Some(components);
        self
    }

    /// The loading condition the sweep solves for.
    ///
    /// # Errors
    ///
    /// Returns an error if the components or weights are invalid.
    pub fn loading(&self) -> Result<CenterOfGravity> {
        if let Some(components) = &self.components {
            let cg = CenterOfGravity::from_components(components)?;
            for issue in cg.check(&LoadingLimits::default()) {
                warn!(%issue, "implausible loading condition");
            }
            return Ok(cg);
        }
        let hull_weight = self.config.hull_weight.unwrap_or(self.hull.target_weight());
        let paddler_weight = self
            .config
            .paddler_weight
            .unwrap_or(self.hull.target_payload());
        combined_cg(
            &self.hull.cg(),
            hull_weight,
            paddler_weight,
            self.config.paddler_cg_z,
        )
    }

    /// Runs the sweep.
    ///
    /// # Errors
    ///
    /// Returns an error if the angle range or weights are invalid, or the
    /// waterline cannot be solved at some angle.
    pub fn execute(&self) -> Result<StabilityCurve> {
        let angles = self.config.angles()?;
        let loading = self.loading()?;
        let total_weight = loading.total_mass;
        let cg = loading.position;
        debug!(
            total_weight,
            cg_z = cg.z,
            angles = angles.len(),
            "stability sweep started"
        );

        let upright = self.hull.solve(total_weight, 0.0)?;

        #[cfg(feature = "parallel")]
        let points = {
            use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

            let all = angles
                .par_iter()
                .map(|&angle| self.point(angle, &cg, total_weight, Some(upright.draft)))
                .collect::<Result<Vec<_>>>()?;
            if self.config.break_on_vanishing {
                truncate_after_vanishing(all)
            } else {
                all
            }
        };

        #[cfg(not(feature = "parallel"))]
        let points = {
            let mut points = Vec::with_capacity(angles.len());
            let mut draft = upright.draft;
            let mut seen_positive = false;
            for &angle in &angles {
                let point = self.point(angle, &cg, total_weight, Some(draft))?;
                draft = point.draft;
                let vanished = seen_positive && point.gz < 0.0;
                seen_positive |= point.gz > 0.0;
                points.push(point);
                if vanished && self.config.break_on_vanishing {
                    break;
                }
            }
            points
        };

        let curve = StabilityCurve::from_points(points);
        info!(
            hull = %self.hull.name(),
            samples = curve.points.len(),
            vanishing_angle = ?curve.vanishing_angle,
            max_moment = curve.max_moment,
            max_moment_angle = curve.max_moment_angle,
            "stability sweep finished"
        );
        Ok(curve)
    }

    fn point(
        &self,
        angle: f64,
        cg: &Point3,
        total_weight: f64,
        initial_draft: Option<f64>,
    ) -> Result<StabilityPoint> {
        let heel = self.hull.config().heel_convention;
        let solution = self.hull.solve_from(total_weight, angle, initial_draft)?;
        let cg_heeled = rotate_about_x(cg, &self.hull.cg(), heel.rotation_angle(angle));
        let gz = heel.righting_sign() * (cg_heeled.y - solution.center_of_buoyancy.y);
        debug!(angle, gz, waterline = solution.waterline, "heel sample");
        Ok(StabilityPoint {
            angle,
            gz,
            moment: total_weight * GRAVITY * gz,
            waterline: solution.waterline,
            draft: solution.draft,
            displacement: solution.displacement,
            center_of_buoyancy: solution.center_of_buoyancy,
            center_of_gravity: cg_heeled,
        })
    }
}

/// Keeps samples up to and including the first negative GZ that follows a
/// positive one.
#[cfg(feature = "parallel")]
fn truncate_after_vanishing(mut points: Vec<StabilityPoint>) -> Vec<StabilityPoint> {
    let mut seen_positive = false;
    let cut = points.iter().position(|p| {
        let vanished = seen_positive && p.gz < 0.0;
        seen_positive |= p.gz > 0.0;
        vanished
    });
    if let Some(index) = cut {
        points.truncate(index + 1);
    }
    points
}
