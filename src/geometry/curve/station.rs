use tracing::trace;

use super::{Curve, Fit};
use crate::error::{GeometryError, Result};
use crate::math::spline::brent;
use crate::math::{Point3, TOLERANCE};

/// Minimum number of parameter subintervals scanned for sign changes.
const MIN_SCAN_INTERVALS: usize = 64;
/// Scan subintervals per control-point span.
const SCAN_INTERVALS_PER_SPAN: usize = 16;
const ROOT_MAX_ITER: usize = 100;

/// A curve point located at a longitudinal station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationPoint {
    /// Curve parameter of the point.
    pub parameter: f64,
    /// The point itself; its x equals the requested station.
    pub point: Point3,
}

impl Curve {
    /// Evaluates the curve at longitudinal coordinate `x`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::StationOutOfRange`] if the curve does not
    /// reach `x`, or [`GeometryError::RootNotFound`] if the chord-length root
    /// search fails.
    pub fn eval_x(&self, x: f64) -> Result<Point3> {
        match self.point_at_station(x, None)? {
            Some(hit) => Ok(hit.point),
            None => Err(GeometryError::StationOutOfRange {
                curve: self.name.clone(),
                x,
                min: self.x_extent.0,
                max: self.x_extent.1,
            }
            .into()),
        }
    }

    /// Locates the curve point at station `x`, or `None` if the curve does
    /// not reach it.
    ///
    /// In chord-length mode every sign change of `x(t) − x` is refined with
    /// Brent's method. When several roots exist the one nearest to `hint` is
    /// returned (the first one without a hint).
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::RootNotFound`] if a bracketed root fails to
    /// converge.
    pub fn point_at_station(&self, x: f64, hint: Option<f64>) -> Result<Option<StationPoint>> {
        let (lo, hi) = self.x_extent;
        if x < lo - TOLERANCE || x > hi + TOLERANCE {
            return Ok(None);
        }

        let parameter = match &self.fit {
            Fit::Longitudinal { .. } => x.clamp(lo, hi),
            Fit::ChordLength { x: sx, .. } => {
                let roots = self.station_roots(|t| sx.evaluate(t) - x, x)?;
                if roots.len() > 1 {
                    trace!(
                        curve = %self.name,
                        x,
                        roots = roots.len(),
                        "multiple station roots"
                    );
                }
                let chosen = match hint {
                    Some(h) => roots
                        .iter()
                        .copied()
                        .min_by(|a, b| (a - h).abs().total_cmp(&(b - h).abs())),
                    None => roots.first().copied(),
                };
                // No crossing: the curve only grazes x at an extremum.
                let Some(t) = chosen else {
                    return Ok(None);
                };
                t
            }
        };

        let mut point = self.point_at(parameter);
        point.x = x;
        Ok(Some(StationPoint { parameter, point }))
    }

    fn scan_intervals(&self) -> usize {
        (SCAN_INTERVALS_PER_SPAN * (self.points.len() - 1)).max(MIN_SCAN_INTERVALS)
    }

    #[allow(clippy::cast_precision_loss)]
    fn scan_grid(&self) -> Vec<f64> {
        let n = self.scan_intervals();
        (0..=n).map(|i| i as f64 / n as f64).collect()
    }

    fn station_roots<F>(&self, g: F, x: f64) -> Result<Vec<f64>>
    where
        F: Fn(f64) -> f64,
    {
        let ts = self.scan_grid();
        let gs: Vec<f64> = ts.iter().map(|&t| g(t)).collect();
        let mut roots = Vec::new();
        for i in 0..ts.len() - 1 {
            if gs[i].abs() < TOLERANCE {
                roots.push(ts[i]);
            } else if gs[i + 1].abs() >= TOLERANCE && gs[i] * gs[i + 1] < 0.0 {
                let root = brent(&g, ts[i], ts[i + 1], TOLERANCE, ROOT_MAX_ITER).ok_or_else(|| {
                    GeometryError::RootNotFound {
                        curve: self.name.clone(),
                        x,
                    }
                })?;
                roots.push(root);
            }
        }
        if gs[gs.len() - 1].abs() < TOLERANCE {
            roots.push(ts[ts.len() - 1]);
        }
        Ok(roots)
    }

    /// Longitudinal extent actually reached by the fitted curve.
    pub(super) fn sampled_x_extent(&self) -> (f64, f64) {
        match &self.fit {
            Fit::Longitudinal { y, .. } => y.domain(),
            Fit::ChordLength { x, .. } => {
                let samples = self.scan_grid().into_iter().map(|t| x.evaluate(t));
                let control = self.points.iter().map(|p| p.x);
                samples
                    .chain(control)
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                        (lo.min(v), hi.max(v))
                    })
            }
        }
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

    fn curl() -> Curve {
        Curve::new(
            "stem",
            vec![
                p(4.0, 0.0, 0.0),
                p(4.8, 0.0, 0.1),
                p(5.0, 0.0, 0.3),
                p(4.9, 0.0, 0.45),
            ],
        )
        .unwrap()
    }

    #[test]
    fn longitudinal_station_is_direct() {
        let c = Curve::new("keel", vec![p(0.0, 0.0, 0.1), p(2.0, 0.0, 0.0), p(4.0, 0.0, 0.1)])
            .unwrap();
        let hit = c.point_at_station(2.0, None).unwrap().unwrap();
        assert!((hit.parameter - 2.0).abs() < TOLERANCE);
        assert!(hit.point.z.abs() < 1e-12);
    }

    #[test]
    fn out_of_range_is_none_for_station_and_error_for_eval() {
        let c = curl();
        assert!(c.point_at_station(3.0, None).unwrap().is_none());
        assert!(matches!(
            c.eval_x(3.0).unwrap_err(),
            HullformError::Geometry(GeometryError::StationOutOfRange { .. })
        ));
    }

    #[test]
    fn chord_station_lands_on_requested_x() {
        let c = curl();
        let hit = c.point_at_station(4.5, None).unwrap().unwrap();
        assert!((hit.point.x - 4.5).abs() < 1e-12);
        let on_curve = c.eval_t(hit.parameter).unwrap();
        assert!((on_curve.x - 4.5).abs() < 1e-8);
    }

    #[test]
    fn hint_selects_nearest_root() {
        let c = curl();
        // x = 4.95 is crossed on the way up and again on the way back.
        let first = c.point_at_station(4.95, None).unwrap().unwrap();
        let late = c.point_at_station(4.95, Some(1.0)).unwrap().unwrap();
        assert!(late.parameter > first.parameter);
        assert!(late.point.z > first.point.z);
    }

    #[test]
    fn control_point_station_found() {
        let c = curl();
        let q = c.eval_x(4.8).unwrap();
        assert!((q.z - 0.1).abs() < 1e-8);
    }
}
