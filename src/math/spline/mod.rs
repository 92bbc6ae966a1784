//! One-dimensional interpolants and root finding.
//!
//! Both interpolants produce a [`PiecewiseCubic`]: one cubic polynomial per
//! knot interval, stored in local form `a + b·s + c·s² + d·s³` with
//! `s = x − xᵢ`.

mod cubic;
mod pchip;
mod root;

pub use cubic::{cubic_spline, EndCondition};
pub use pchip::pchip;
pub use root::brent;

use crate::error::{GeometryError, Result};

/// A C¹ (or C²) piecewise cubic over strictly increasing knots.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseCubic {
    knots: Vec<f64>,
    coeffs: Vec<[f64; 4]>,
}

impl PiecewiseCubic {
    /// Builds the interpolant from knot values and first derivatives
    /// (cubic Hermite form).
    pub(crate) fn from_hermite(x: &[f64], y: &[f64], slopes: &[f64]) -> Self {
        let coeffs = x
            .windows(2)
            .enumerate()
            .map(|(i, w)| {
                let h = w[1] - w[0];
                let delta = (y[i + 1] - y[i]) / h;
                let (d0, d1) = (slopes[i], slopes[i + 1]);
                [
                    y[i],
                    d0,
                    (3.0 * delta - 2.0 * d0 - d1) / h,
                    (d0 + d1 - 2.0 * delta) / (h * h),
                ]
            })
            .collect();
        Self {
            knots: x.to_vec(),
            coeffs,
        }
    }

    pub(crate) fn from_parts(knots: Vec<f64>, coeffs: Vec<[f64; 4]>) -> Self {
        Self { knots, coeffs }
    }

    /// Knot range `(first, last)`.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    /// Value at `x`. Outside the domain the end polynomials are extended.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        let (i, s) = self.locate(x);
        let [a, b, c, d] = self.coeffs[i];
        a + s * (b + s * (c + s * d))
    }

    /// First derivative at `x`.
    #[must_use]
    pub fn derivative(&self, x: f64) -> f64 {
        let (i, s) = self.locate(x);
        let [_, b, c, d] = self.coeffs[i];
        b + s * (2.0 * c + 3.0 * d * s)
    }

    /// Second derivative at `x`.
    #[must_use]
    pub fn second_derivative(&self, x: f64) -> f64 {
        let (i, s) = self.locate(x);
        let [_, _, c, d] = self.coeffs[i];
        2.0 * c + 6.0 * d * s
    }

    fn locate(&self, x: f64) -> (usize, f64) {
        let last = self.coeffs.len() - 1;
        let i = self
            .knots
            .partition_point(|&k| k <= x)
            .saturating_sub(1)
            .min(last);
        (i, x - self.knots[i])
    }
}

/// Checks that `x` and `y` pair up, hold at least two samples and that `x`
/// strictly increases.
fn check_samples(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(GeometryError::Degenerate(format!(
            "interpolant has {} abscissae but {} ordinates",
            x.len(),
            y.len()
        ))
        .into());
    }
    if x.len() < 2 {
        return Err(
            GeometryError::Degenerate("interpolant needs at least 2 samples".into()).into(),
        );
    }
    if x.windows(2).any(|w| w[1] <= w[0]) {
        return Err(
            GeometryError::Degenerate("interpolant abscissae must strictly increase".into()).into(),
        );
    }
    Ok(())
}

/// Secant slopes between consecutive samples.
fn secants(x: &[f64], y: &[f64]) -> Vec<f64> {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| (yw[1] - yw[0]) / (xw[1] - xw[0]))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hermite_reproduces_cubic() {
        // f(x) = x³ on [0, 1, 2] with exact slopes.
        let x = [0.0, 1.0, 2.0];
        let y = [0.0, 1.0, 8.0];
        let d = [0.0, 3.0, 12.0];
        let f = PiecewiseCubic::from_hermite(&x, &y, &d);
        for &t in &[0.25, 0.5, 1.3, 1.9] {
            assert!((f.evaluate(t) - t * t * t).abs() < 1e-12);
            assert!((f.derivative(t) - 3.0 * t * t).abs() < 1e-12);
            assert!((f.second_derivative(t) - 6.0 * t).abs() < 1e-12);
        }
    }

    #[test]
    fn evaluate_hits_knots() {
        let x = [0.0, 0.5, 2.0];
        let y = [1.0, -1.0, 3.0];
        let f = PiecewiseCubic::from_hermite(&x, &y, &[0.0, 0.0, 0.0]);
        for (xi, yi) in x.iter().zip(y.iter()) {
            assert!((f.evaluate(*xi) - yi).abs() < 1e-12);
        }
        assert_eq!(f.domain(), (0.0, 2.0));
    }

    #[test]
    fn check_samples_rejects_bad_input() {
        assert!(check_samples(&[0.0], &[0.0]).is_err());
        assert!(check_samples(&[0.0, 1.0], &[0.0]).is_err());
        assert!(check_samples(&[0.0, 0.0], &[0.0, 1.0]).is_err());
        assert!(check_samples(&[0.0, 1.0], &[0.0, 1.0]).is_ok());
    }
}
