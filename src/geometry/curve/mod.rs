//! Smooth longitudinal hull curves fitted through control points.

mod station;

pub use station::StationPoint;

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result, ValidationError};
use crate::math::spline::{cubic_spline, pchip, EndCondition, PiecewiseCubic};
use crate::math::transform::{mirror_y, rotate_about_x};
use crate::math::{Point3, Vector3, TOLERANCE};

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Returns `true` if `t` lies inside the domain (with tolerance).
    #[must_use]
    pub fn contains(&self, t: f64) -> bool {
        t >= self.t_min - TOLERANCE && t <= self.t_max + TOLERANCE
    }
}

/// How a curve is parametrized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parametrization {
    /// Longitudinal when control-point x is strictly monotonic, chord length
    /// otherwise.
    #[default]
    Auto,
    /// y(x) and z(x) as monotone cubics; the parameter is x itself.
    Longitudinal,
    /// x(t), y(t), z(t) as cubic splines over normalized chord length.
    ChordLength,
}

/// Fitting options for [`Curve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveOptions {
    /// Requested parametrization.
    pub parametrization: Parametrization,
    /// End condition of the chord-length splines.
    pub end_condition: EndCondition,
    /// Marks a curve generated as the mirror image of another.
    pub mirrored: bool,
}

impl CurveOptions {
    /// Sets the parametrization.
    #[must_use]
    pub fn with_parametrization(mut self, parametrization: Parametrization) -> Self {
        self.parametrization = parametrization;
        self
    }

    /// Sets the chord-length end condition.
    #[must_use]
    pub fn with_end_condition(mut self, end_condition: EndCondition) -> Self {
        self.end_condition = end_condition;
        self
    }

    /// Sets the mirrored flag.
    #[must_use]
    pub fn with_mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }
}

/// The fitted interpolants, tagged by parametrization.
#[derive(Debug, Clone)]
enum Fit {
    Longitudinal {
        y: PiecewiseCubic,
        z: PiecewiseCubic,
    },
    ChordLength {
        x: PiecewiseCubic,
        y: PiecewiseCubic,
        z: PiecewiseCubic,
    },
}

/// A smooth 3D curve through an ordered list of control points.
///
/// Curves are immutable: heel and mirroring produce new curves.
#[derive(Debug, Clone)]
pub struct Curve {
    name: String,
    points: Vec<Point3>,
    options: CurveOptions,
    fit: Fit,
    x_extent: (f64, f64),
}

impl Curve {
    /// Fits a curve with default options.
    ///
    /// # Errors
    ///
    /// See [`Curve::with_options`].
    pub fn new(name: impl Into<String>, points: Vec<Point3>) -> Result<Self> {
        Self::with_options(name, points, CurveOptions::default())
    }

    /// Fits a curve through `points`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if fewer than 2 points are given, a
    /// coordinate is not finite, two consecutive points coincide, or
    /// [`Parametrization::Longitudinal`] is requested for points whose x is
    /// not strictly monotonic.
    pub fn with_options(
        name: impl Into<String>,
        points: Vec<Point3>,
        options: CurveOptions,
    ) -> Result<Self> {
        let name = name.into();
        validate_points(&name, &points)?;

        let longitudinal = match options.parametrization {
            Parametrization::Auto => first_non_monotonic(&points).is_none(),
            Parametrization::Longitudinal => {
                if let Some(index) = first_non_monotonic(&points) {
                    return Err(
                        ValidationError::NonMonotonicStation { curve: name, index }.into()
                    );
                }
                true
            }
            Parametrization::ChordLength => false,
        };
        let (mode, fit) = if longitudinal {
            (Parametrization::Longitudinal, fit_longitudinal(&points)?)
        } else {
            (
                Parametrization::ChordLength,
                fit_chord_length(&points, options.end_condition)?,
            )
        };

        let mut curve = Self {
            name,
            points,
            options: options.with_parametrization(mode),
            fit,
            x_extent: (0.0, 0.0),
        };
        curve.x_extent = curve.sampled_x_extent();
        Ok(curve)
    }

    /// Returns the curve name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the control points in input order.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Returns `true` for a generated mirror curve.
    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        self.options.mirrored
    }

    /// Returns the resolved parametrization (never [`Parametrization::Auto`]).
    #[must_use]
    pub fn parametrization(&self) -> Parametrization {
        self.options.parametrization
    }

    /// Returns the chord-length end condition.
    #[must_use]
    pub fn end_condition(&self) -> EndCondition {
        self.options.end_condition
    }

    /// Returns the parameter domain: the x range in longitudinal mode,
    /// `[0, 1]` in chord-length mode.
    #[must_use]
    pub fn domain(&self) -> CurveDomain {
        match &self.fit {
            Fit::Longitudinal { y, .. } => {
                let (lo, hi) = y.domain();
                CurveDomain::new(lo, hi)
            }
            Fit::ChordLength { .. } => CurveDomain::new(0.0, 1.0),
        }
    }

    /// Returns the `(min, max)` longitudinal extent the curve reaches.
    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        self.x_extent
    }

    /// Returns `true` if every control point lies on the centerplane.
    #[must_use]
    pub fn is_centerline(&self, tolerance: f64) -> bool {
        self.points.iter().all(|p| p.y.abs() <= tolerance)
    }

    /// Returns `true` if control-point x is strictly increasing or strictly
    /// decreasing.
    #[must_use]
    pub fn is_monotonic_x(&self) -> bool {
        first_non_monotonic(&self.points).is_none()
    }

    /// Total length of the control polyline.
    #[must_use]
    pub fn chord_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| nalgebra::distance(&w[0], &w[1]))
            .sum()
    }

    /// Evaluates the curve at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if `t` is outside [`Curve::domain`].
    pub fn eval_t(&self, t: f64) -> Result<Point3> {
        let domain = self.domain();
        if !domain.contains(t) {
            return Err(GeometryError::ParameterOutOfRange {
                value: t,
                min: domain.t_min,
                max: domain.t_max,
            }
            .into());
        }
        Ok(self.point_at(t))
    }

    /// Returns `n` points evenly spaced in parameter, ends included.
    #[must_use]
    pub fn sample(&self, n: usize) -> Vec<Point3> {
        let domain = self.domain();
        match n {
            0 => Vec::new(),
            1 => vec![self.point_at(domain.t_min)],
            _ => {
                #[allow(clippy::cast_precision_loss)]
                let step = (domain.t_max - domain.t_min) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        #[allow(clippy::cast_precision_loss)]
                        let t = domain.t_min + step * i as f64;
                        self.point_at(t)
                    })
                    .collect()
            }
        }
    }

    /// Unit tangent at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if `t` is out of range or the first derivative
    /// vanishes.
    pub fn tangent(&self, t: f64) -> Result<Vector3> {
        self.eval_t(t)?;
        let d1 = self.first_derivative(t);
        let len = d1.norm();
        if len < TOLERANCE {
            return Err(zero_derivative(&self.name, t));
        }
        Ok(d1 / len)
    }

    /// Curvature `|r' × r''| / |r'|³` at parameter `t`. Zero on straight
    /// stretches.
    ///
    /// # Errors
    ///
    /// Returns an error if `t` is out of range or the first derivative
    /// vanishes.
    pub fn curvature(&self, t: f64) -> Result<f64> {
        self.eval_t(t)?;
        let d1 = self.first_derivative(t);
        let len = d1.norm();
        if len < TOLERANCE {
            return Err(zero_derivative(&self.name, t));
        }
        Ok(d1.cross(&self.second_derivative(t)).norm() / len.powi(3))
    }

    /// Principal unit normal at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if `t` is out of range, the first derivative
    /// vanishes, or the curvature is zero (collinear control points).
    pub fn normal(&self, t: f64) -> Result<Vector3> {
        let tangent = self.tangent(t)?;
        let d2 = self.second_derivative(t);
        let perp = d2 - tangent * d2.dot(&tangent);
        let len = perp.norm();
        if len < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "curve '{}' has zero curvature at t = {t}, normal is undefined",
                self.name
            ))
            .into());
        }
        Ok(perp / len)
    }

    /// Returns a copy with every control point rotated about the X axis
    /// through `origin`, refitted with the same parametrization.
    ///
    /// * `angle` - Rotation angle in radians (right-hand rule).
    ///
    /// # Errors
    ///
    /// Returns an error if the rotated points cannot be refitted.
    pub fn rotated_about_x(&self, origin: &Point3, angle: f64) -> Result<Self> {
        let points = self
            .points
            .iter()
            .map(|p| rotate_about_x(p, origin, angle))
            .collect();
        Self::with_options(self.name.clone(), points, self.options)
    }

    /// Returns the mirror image across `y = 0`, named `Mirror of <name>` and
    /// flagged as mirrored.
    ///
    /// # Errors
    ///
    /// Returns an error if the mirrored points cannot be refitted.
    pub fn mirrored_copy(&self) -> Result<Self> {
        let points = self.points.iter().map(mirror_y).collect();
        Self::with_options(
            format!("Mirror of {}", self.name),
            points,
            self.options.with_mirrored(true),
        )
    }

    fn point_at(&self, t: f64) -> Point3 {
        match &self.fit {
            Fit::Longitudinal { y, z } => Point3::new(t, y.evaluate(t), z.evaluate(t)),
            Fit::ChordLength { x, y, z } => {
                Point3::new(x.evaluate(t), y.evaluate(t), z.evaluate(t))
            }
        }
    }

    fn first_derivative(&self, t: f64) -> Vector3 {
        match &self.fit {
            Fit::Longitudinal { y, z } => Vector3::new(1.0, y.derivative(t), z.derivative(t)),
            Fit::ChordLength { x, y, z } => {
                Vector3::new(x.derivative(t), y.derivative(t), z.derivative(t))
            }
        }
    }

    fn second_derivative(&self, t: f64) -> Vector3 {
        match &self.fit {
            Fit::Longitudinal { y, z } => {
                Vector3::new(0.0, y.second_derivative(t), z.second_derivative(t))
            }
            Fit::ChordLength { x, y, z } => Vector3::new(
                x.second_derivative(t),
                y.second_derivative(t),
                z.second_derivative(t),
            ),
        }
    }
}

fn validate_points(name: &str, points: &[Point3]) -> Result<()> {
    if points.len() < 2 {
        return Err(ValidationError::TooFewPoints {
            curve: name.to_string(),
            count: points.len(),
        }
        .into());
    }
    if let Some(index) = points
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
    {
        return Err(ValidationError::NonFinite {
            curve: name.to_string(),
            index,
        }
        .into());
    }
    if let Some(index) = points
        .windows(2)
        .position(|w| nalgebra::distance(&w[0], &w[1]) < TOLERANCE)
    {
        return Err(ValidationError::RepeatedPoint {
            curve: name.to_string(),
            index: index + 1,
        }
        .into());
    }
    Ok(())
}

/// Index of the first point that breaks strict monotonicity of x, relative to
/// the direction set by the first step.
fn first_non_monotonic(points: &[Point3]) -> Option<usize> {
    let first_step = points[1].x - points[0].x;
    if first_step.abs() < f64::MIN_POSITIVE {
        return Some(1);
    }
    let direction = first_step.signum();
    points
        .windows(2)
        .position(|w| (w[1].x - w[0].x) * direction <= 0.0)
        .map(|i| i + 1)
}

fn fit_longitudinal(points: &[Point3]) -> Result<Fit> {
    let mut ordered = points.to_vec();
    if ordered[0].x > ordered[ordered.len() - 1].x {
        ordered.reverse();
    }
    let x: Vec<f64> = ordered.iter().map(|p| p.x).collect();
    let y: Vec<f64> = ordered.iter().map(|p| p.y).collect();
    let z: Vec<f64> = ordered.iter().map(|p| p.z).collect();
    Ok(Fit::Longitudinal {
        y: pchip(&x, &y)?,
        z: pchip(&x, &z)?,
    })
}

fn fit_chord_length(points: &[Point3], end: EndCondition) -> Result<Fit> {
    let t = chord_length_parameters(points);
    let x: Vec<f64> = points.iter().map(|p| p.x).collect();
    let y: Vec<f64> = points.iter().map(|p| p.y).collect();
    let z: Vec<f64> = points.iter().map(|p| p.z).collect();
    Ok(Fit::ChordLength {
        x: cubic_spline(&t, &x, end)?,
        y: cubic_spline(&t, &y, end)?,
        z: cubic_spline(&t, &z, end)?,
    })
}

/// Cumulative chord length normalized to `[0, 1]`.
fn chord_length_parameters(points: &[Point3]) -> Vec<f64> {
    let mut lengths = Vec::with_capacity(points.len());
    let mut total = 0.0;
    lengths.push(0.0);
    for w in points.windows(2) {
        total += nalgebra::distance(&w[0], &w[1]);
        lengths.push(total);
    }
    if total > 0.0 {
        for length in &mut lengths {
            *length /= total;
        }
    }
    lengths
}

fn zero_derivative(name: &str, t: f64) -> crate::error::HullformError {
    GeometryError::Degenerate(format!(
        "curve '{name}' has a zero first derivative at t = {t}"
    ))
    .into()
}
