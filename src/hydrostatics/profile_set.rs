use serde::Serialize;
use tracing::warn;

use crate::error::{GeometryError, Result};
use crate::geometry::{Curve, Profile, SectionProperties};
use crate::math::{Point3, Vector3, TOLERANCE};

/// A station where the curves meet in fewer than 3 distinct points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationGap {
    pub station: f64,
    /// Distinct points found there.
    pub distinct: usize,
}

/// Integrated volume and its centroid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeProperties {
    /// Volume in m³.
    pub volume: f64,
    /// Centroid of the volume.
    pub centroid: Point3,
}

/// Cross-sections sampled from a set of curves at ordered stations.
#[derive(Debug, Clone)]
pub struct ProfileSet {
    step: f64,
    stations: Vec<f64>,
    profiles: Vec<Profile>,
    gaps: Vec<StationGap>,
}

impl ProfileSet {
    /// Samples `curves` at slab midpoints across `x_range`.
    ///
    /// The range is split into `n = ceil(L / step)` slabs of width `L / n`,
    /// so the actual spacing is at most `step`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is empty, no station yields a valid
    /// profile, a gap has valid stations on both sides, or a curve
    /// evaluation fails.
    pub fn regular(
        curves: &[Curve],
        x_range: (f64, f64),
        step: f64,
        tolerance: f64,
    ) -> Result<Self> {
        let length = x_range.1 - x_range.0;
        if length <= TOLERANCE || step.is_nan() || step <= 0.0 {
            return Err(GeometryError::Degenerate(format!(
                "cannot place stations over [{}, {}] with step {step}",
                x_range.0, x_range.1
            ))
            .into());
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = ((length / step) - TOLERANCE).ceil().max(1.0) as usize;
        #[allow(clippy::cast_precision_loss)]
        let width = length / n as f64;
        #[allow(clippy::cast_precision_loss)]
        let stations = (0..n)
            .map(|i| x_range.0 + (i as f64 + 0.5) * width)
            .collect();
        Self::sample(curves, stations, width, tolerance)
    }

    /// Samples `curves` at the given stations (sorted ascending).
    ///
    /// `step` is the slab width used for integration; sets that are not
    /// uniformly spaced should pass zero.
    ///
    /// # Errors
    ///
    /// See [`ProfileSet::regular`].
    pub fn sample(
        curves: &[Curve],
        mut stations: Vec<f64>,
        step: f64,
        tolerance: f64,
    ) -> Result<Self> {
        stations.sort_by(f64::total_cmp);
        let mut hints: Vec<Option<f64>> = vec![None; curves.len()];
        let mut sampled = Vec::with_capacity(stations.len());

        for &x in &stations {
            let mut points = Vec::with_capacity(curves.len());
            for (curve, hint) in curves.iter().zip(hints.iter_mut()) {
                if let Some(hit) = curve.point_at_station(x, *hint)? {
                    *hint = Some(hit.parameter);
                    points.push(hit.point);
                }
            }
            sampled.push(Profile::new(x, points, tolerance));
        }

        let first = sampled.iter().position(Profile::is_valid);
        let last = sampled.iter().rposition(Profile::is_valid);
        let (Some(first), Some(last)) = (first, last) else {
            return Err(GeometryError::ZeroVolume.into());
        };
        if let Some(hole) = sampled[first..=last].iter().find(|p| !p.is_valid()) {
            return Err(GeometryError::CoverageGap {
                station: hole.station(),
                distinct: hole.len(),
            }
            .into());
        }

        let gaps: Vec<StationGap> = sampled
            .iter()
            .filter(|p| !p.is_valid())
            .map(|p| StationGap {
                station: p.station(),
                distinct: p.len(),
            })
            .collect();
        for gap in &gaps {
            warn!(
                station = gap.station,
                distinct = gap.distinct,
                "no cross-section at hull end station"
            );
        }

        let profiles: Vec<Profile> = sampled.into_iter().filter(Profile::is_valid).collect();
        let stations = profiles.iter().map(Profile::station).collect();
        Ok(Self {
            step,
            stations,
            profiles,
            gaps,
        })
    }

    /// Samples new curves at this set's stations and spacing.
    ///
    /// # Errors
    ///
    /// See [`ProfileSet::regular`].
    pub fn resample(&self, curves: &[Curve], tolerance: f64) -> Result<Self> {
        let stations = self
            .stations
            .iter()
            .copied()
            .chain(self.gaps.iter().map(|g| g.station))
            .collect();
        Self::sample(curves, stations, self.step, tolerance)
    }

    /// Slab width.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Stations of the valid profiles, ascending.
    #[must_use]
    pub fn stations(&self) -> &[f64] {
        &self.stations
    }

    /// Valid profiles, ordered by station.
    #[must_use]
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Stations skipped for lack of points (hull ends only).
    #[must_use]
    pub fn gaps(&self) -> &[StationGap] {
        &self.gaps
    }

    /// Lowest profile point.
    #[must_use]
    pub fn min_z(&self) -> Option<f64> {
        self.profiles
            .iter()
            .filter_map(Profile::min_z)
            .min_by(f64::total_cmp)
    }

    /// Highest profile point.
    #[must_use]
    pub fn max_z(&self) -> Option<f64> {
        self.profiles
            .iter()
            .filter_map(Profile::max_z)
            .max_by(f64::total_cmp)
    }

    /// Total enclosed volume and centroid. `None` when nothing is enclosed.
    #[must_use]
    pub fn volume_properties(&self) -> Option<VolumeProperties> {
        self.integrate(Profile::properties)
    }

    /// Volume and centroid of the part below `waterline`. `None` when dry.
    #[must_use]
    pub fn submerged(&self, waterline: f64) -> Option<VolumeProperties> {
        self.integrate(|p| p.submerged_properties(waterline))
    }

    fn integrate<F>(&self, section: F) -> Option<VolumeProperties>
    where
        F: Fn(&Profile) -> Option<SectionProperties>,
    {
        let mut volume = 0.0;
        let mut moment = Vector3::zeros();
        for profile in &self.profiles {
            let Some(s) = section(profile) else {
                continue;
            };
            let v = s.area * self.step;
            volume += v;
            moment += Vector3::new(profile.station(), s.centroid_y, s.centroid_z) * v;
        }
        (volume > TOLERANCE * TOLERANCE).then(|| VolumeProperties {
            volume,
            centroid: Point3::from(moment / volume),
        })
    }
}
