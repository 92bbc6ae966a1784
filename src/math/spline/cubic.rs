use serde::{Deserialize, Serialize};

use super::{check_samples, secants, PiecewiseCubic};
use crate::error::Result;

/// Boundary condition for [`cubic_spline`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndCondition {
    /// Zero second derivative at both ends.
    #[default]
    Natural,
    /// Zero first derivative at both ends.
    Clamped,
}

/// Fits a C² cubic spline through `(x, y)`.
///
/// Solves the tridiagonal system for the knot second derivatives with the
/// Thomas algorithm.
///
/// # Errors
///
/// Returns an error if the slices differ in length, hold fewer than two
/// samples, or `x` does not strictly increase.
pub fn cubic_spline(x: &[f64], y: &[f64], end: EndCondition) -> Result<PiecewiseCubic> {
    check_samples(x, y)?;
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let delta = secants(x, y);

    // Rows of the system: sub, diag, sup, rhs.
    let mut sub = vec![0.0; n];
    let mut diag = vec![1.0; n];
    let mut sup = vec![0.0; n];
    let mut rhs = vec![0.0; n];

    for i in 1..n - 1 {
        sub[i] = h[i - 1];
        diag[i] = 2.0 * (h[i - 1] + h[i]);
        sup[i] = h[i];
        rhs[i] = 6.0 * (delta[i] - delta[i - 1]);
    }
    if end == EndCondition::Clamped {
        diag[0] = 2.0 * h[0];
        sup[0] = h[0];
        rhs[0] = 6.0 * delta[0];
        sub[n - 1] = h[n - 2];
        diag[n - 1] = 2.0 * h[n - 2];
        rhs[n - 1] = -6.0 * delta[n - 2];
    }

    let m = solve_tridiagonal(&sub, &diag, &sup, &rhs);

    let coeffs = (0..n - 1)
        .map(|i| {
            [
                y[i],
                delta[i] - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0,
                m[i] / 2.0,
                (m[i + 1] - m[i]) / (6.0 * h[i]),
            ]
        })
        .collect();
    Ok(PiecewiseCubic::from_parts(x.to_vec(), coeffs))
}

/// Thomas algorithm. The systems built above are diagonally dominant so no
/// pivoting is needed.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];
    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - sub[i] * c[i - 1];
        c[i] = sup[i] / denom;
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / denom;
    }
    let mut out = vec![0.0; n];
    out[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        out[i] = d[i] - c[i] * out[i + 1];
    }
    out
}
