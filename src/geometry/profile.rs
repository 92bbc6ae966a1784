use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::{
    centroid_yz, clip_below, level_crossings_y, perimeter_yz, signed_area_yz,
};
use crate::math::transform::rotate_about_x;
use crate::math::{Point3, TOLERANCE};

/// Area and centroid of a transverse section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionProperties {
    /// Section area in m².
    pub area: f64,
    /// Transverse coordinate of the area centroid.
    pub centroid_y: f64,
    /// Vertical coordinate of the area centroid.
    pub centroid_z: f64,
}

impl SectionProperties {
    fn of_polygon(points: &[Point3]) -> Option<Self> {
        let (centroid_y, centroid_z) = centroid_yz(points)?;
        Some(Self {
            area: signed_area_yz(points).abs(),
            centroid_y,
            centroid_z,
        })
    }
}

/// A transverse cross-section at one longitudinal station.
///
/// Points are deduplicated and ordered counter-clockwise (in the y-z plane)
/// around their mean, forming a closed polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    station: f64,
    points: Vec<Point3>,
}

impl Profile {
    /// Builds a profile from an unordered bag of points.
    ///
    /// Points within `tolerance` of an earlier point are dropped. The rest are
    /// sorted by `atan2(z − cz, y − cy)` around their mean `(cy, cz)`; the sort
    /// is stable so ties keep insertion order. The result may hold fewer than
    /// 3 points, see [`Profile::is_valid`].
    #[must_use]
    pub fn new(
        station: f64,
        points: impl IntoIterator<Item = Point3>,
        tolerance: f64,
    ) -> Self {
        let mut unique: Vec<Point3> = Vec::new();
        for p in points {
            if !unique
                .iter()
                .any(|q| nalgebra::distance(q, &p) <= tolerance)
            {
                unique.push(p);
            }
        }

        if !unique.is_empty() {
            #[allow(clippy::cast_precision_loss)]
            let n = unique.len() as f64;
            let cy = unique.iter().map(|p| p.y).sum::<f64>() / n;
            let cz = unique.iter().map(|p| p.z).sum::<f64>() / n;
            unique.sort_by(|a, b| {
                let ta = (a.z - cz).atan2(a.y - cy);
                let tb = (b.z - cz).atan2(b.y - cy);
                ta.total_cmp(&tb)
            });
        }

        Self {
            station,
            points: unique,
        }
    }

    /// Builds a profile, failing if fewer than 3 distinct points remain.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateProfile`] for fewer than 3 distinct
    /// points.
    pub fn try_new(
        station: f64,
        points: impl IntoIterator<Item = Point3>,
        tolerance: f64,
    ) -> Result<Self> {
        let profile = Self::new(station, points, tolerance);
        if profile.is_valid() {
            Ok(profile)
        } else {
            Err(GeometryError::DegenerateProfile {
                station,
                distinct: profile.len(),
            }
            .into())
        }
    }

    /// Longitudinal station.
    #[must_use]
    pub fn station(&self) -> f64 {
        self.station
    }

    /// Ordered polygon vertices.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Number of distinct points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no point was kept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A profile needs at least 3 distinct points to enclose area.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.points.len() >= 3
    }

    /// Checks that every point lies on the station plane.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] naming the first point whose x
    /// differs from the station by more than `tolerance`.
    pub fn validate_station_plane(&self, tolerance: f64) -> Result<()> {
        match self
            .points
            .iter()
            .position(|p| (p.x - self.station).abs() > tolerance)
        {
            Some(i) => Err(GeometryError::Degenerate(format!(
                "profile point {i} has x = {}, off station {}",
                self.points[i].x, self.station
            ))
            .into()),
            None => Ok(()),
        }
    }

    /// Copy rotated about the X axis through `origin` by `angle` radians,
    /// keeping the station.
    #[must_use]
    pub fn rotated_about_x(&self, origin: &Point3, angle: f64) -> Self {
        let points = self.points.iter().map(|p| rotate_about_x(p, origin, angle));
        Self::new(self.station, points, 0.0)
    }

    /// Enclosed area (shoelace).
    #[must_use]
    pub fn area(&self) -> f64 {
        signed_area_yz(&self.points).abs()
    }

    /// Area centroid, placed on the station plane. `None` for zero area.
    #[must_use]
    pub fn centroid(&self) -> Option<Point3> {
        centroid_yz(&self.points).map(|(y, z)| Point3::new(self.station, y, z))
    }

    /// Area and centroid of the full section.
    #[must_use]
    pub fn properties(&self) -> Option<SectionProperties> {
        SectionProperties::of_polygon(&self.points)
    }

    /// Slab volume `area × step`.
    #[must_use]
    pub fn volume(&self, step: f64) -> f64 {
        self.area() * step
    }

    /// Closed boundary length.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        perimeter_yz(&self.points)
    }

    /// Lowest vertex height.
    #[must_use]
    pub fn min_z(&self) -> Option<f64> {
        self.points.iter().map(|p| p.z).min_by(f64::total_cmp)
    }

    /// Highest vertex height.
    #[must_use]
    pub fn max_z(&self) -> Option<f64> {
        self.points.iter().map(|p| p.z).max_by(f64::total_cmp)
    }

    /// The part of the polygon at or below `waterline`.
    #[must_use]
    pub fn clip_below(&self, waterline: f64) -> Vec<Point3> {
        clip_below(&self.points, waterline)
    }

    /// Area and centroid of the part below `waterline`. `None` when dry.
    #[must_use]
    pub fn submerged_properties(&self, waterline: f64) -> Option<SectionProperties> {
        let clipped = self.clip_below(waterline);
        if clipped.len() < 3 {
            return None;
        }
        SectionProperties::of_polygon(&clipped)
    }

    /// Hull boundary length below `waterline`, excluding the waterline
    /// closing segment.
    #[must_use]
    pub fn wetted_perimeter(&self, waterline: f64) -> f64 {
        let clipped = self.clip_below(waterline);
        let n = clipped.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .filter_map(|i| {
                let a = &clipped[i];
                let b = &clipped[(i + 1) % n];
                let on_surface =
                    (a.z - waterline).abs() < TOLERANCE && (b.z - waterline).abs() < TOLERANCE;
                (!on_surface).then(|| (b.y - a.y).hypot(b.z - a.z))
            })
            .sum()
    }

    /// Width of the section at `waterline`: the span between the outermost
    /// boundary crossings. `None` if the waterline misses the section.
    #[must_use]
    pub fn waterline_width(&self, waterline: f64) -> Option<f64> {
        let ys = level_crossings_y(&self.points, waterline);
        let lo = ys.iter().copied().min_by(f64::total_cmp)?;
        let hi = ys.iter().copied().max_by(f64::total_cmp)?;
        Some(hi - lo)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::HullformError;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    /// 2 × 2 square in scrambled order with a duplicate.
    fn square() -> Profile {
        Profile::new(
            1.0,
            vec![
                p(1.0, 1.0, 2.0),
                p(1.0, -1.0, 0.0),
                p(1.0, 1.0, 0.0),
                p(1.0, -1.0, 2.0),
                p(1.0, 1.0, 0.0),
            ],
            1e-9,
        )
    }

    #[test]
    fn duplicates_removed() {
        assert_eq!(square().len(), 4);
    }

    #[test]
    fn ordered_counter_clockwise() {
        let s = square();
        assert!(signed_area_yz(s.points()) > 0.0);
        // Starts at the lower-left corner (angle −3π/4).
        assert_eq!(s.points()[0], p(1.0, -1.0, 0.0));
        assert_eq!(s.points()[1], p(1.0, 1.0, 0.0));
    }

    #[test]
    fn area_and_centroid_of_square() {
        let s = square();
        assert!((s.area() - 4.0).abs() < 1e-12);
        let c = s.centroid().unwrap();
        assert!((c.x - 1.0).abs() < 1e-12);
        assert!(c.y.abs() < 1e-12);
        assert!((c.z - 1.0).abs() < 1e-12);
        assert!((s.volume(0.05) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn triangle_area_matches_reference() {
        let t = Profile::new(
            0.0,
            vec![p(0.0, 0.3, 0.3), p(0.0, 0.0, 0.0), p(0.0, -0.3, 0.3)],
            1e-9,
        );
        assert!((t.area() - 0.09).abs() < 1e-12);
        let c = t.properties().unwrap();
        assert!(c.centroid_y.abs() < 1e-12);
        assert!((c.centroid_z - 0.2).abs() < 1e-12);
    }

    #[test]
    fn too_few_points_is_invalid() {
        let prof = Profile::new(
            0.0,
            vec![p(0.0, 0.0, 0.0), p(0.0, 0.0, 0.0), p(0.0, 1.0, 0.0)],
            1e-9,
        );
        assert!(!prof.is_valid());
        let err = Profile::try_new(0.5, vec![p(0.5, 0.0, 0.0)], 1e-9).unwrap_err();
        assert!(matches!(
            err,
            HullformError::Geometry(GeometryError::DegenerateProfile { distinct: 1, .. })
        ));
        assert!(Profile::new(0.0, Vec::new(), 1e-9).is_empty());
    }

    #[test]
    fn station_plane_validation() {
        assert!(square().validate_station_plane(1e-9).is_ok());
        let skew = Profile::new(
            1.0,
            vec![p(1.0, 0.0, 0.0), p(1.2, 1.0, 0.0), p(1.0, 0.0, 1.0)],
            1e-9,
        );
        assert!(skew.validate_station_plane(1e-3).is_err());
        assert!(skew.validate_station_plane(0.5).is_ok());
    }

    #[test]
    fn submerged_half_of_square() {
        let sub = square().submerged_properties(1.0).unwrap();
        assert!((sub.area - 2.0).abs() < 1e-12);
        assert!((sub.centroid_z - 0.5).abs() < 1e-12);
        assert!(square().submerged_properties(-0.5).is_none());
    }

    #[test]
    fn wetted_perimeter_excludes_waterline() {
        let s = square();
        assert!((s.perimeter() - 8.0).abs() < 1e-12);
        assert!((s.wetted_perimeter(3.0) - 8.0).abs() < 1e-12);
        assert!((s.wetted_perimeter(1.0) - 4.0).abs() < 1e-12);
        assert!(s.wetted_perimeter(-1.0).abs() < 1e-12);
    }

    #[test]
    fn waterline_width_of_square() {
        let s = square();
        assert!((s.waterline_width(0.5).unwrap() - 2.0).abs() < 1e-12);
        assert!(s.waterline_width(5.0).is_none());
    }

    #[test]
    fn vertical_extent() {
        let s = square();
        assert_eq!(s.min_z(), Some(0.0));
        assert_eq!(s.max_z(), Some(2.0));
    }

    #[test]
    fn rotation_keeps_area_and_moves_centroid() {
        let sq = square();
        let r = sq.rotated_about_x(&p(1.0, 0.0, 0.0), std::f64::consts::FRAC_PI_2);
        assert_eq!(r.len(), 4);
        assert!((r.station() - 1.0).abs() < f64::EPSILON);
        assert!((r.area() - sq.area()).abs() < 1e-12);
        let c = r.centroid().unwrap();
        assert!((c.y + 1.0).abs() < 1e-12);
        assert!(c.z.abs() < 1e-12);
    }
}
