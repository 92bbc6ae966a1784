use super::{check_samples, secants, PiecewiseCubic};
use crate::error::Result;

/// Fits a shape-preserving monotone cubic (PCHIP) through `(x, y)`.
///
/// Interior slopes are the weighted harmonic mean of the neighbouring secants
/// (zero at local extrema); end slopes use the one-sided three-point formula
/// with the shape-preserving limiter. Two samples give a straight line.
///
/// # Errors
///
/// Returns an error if the slices differ in length, hold fewer than two
/// samples, or `x` does not strictly increase.
pub fn pchip(x: &[f64], y: &[f64]) -> Result<PiecewiseCubic> {
    check_samples(x, y)?;
    let delta = secants(x, y);
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let n = x.len();

    let mut slopes = vec![0.0; n];
    if n == 2 {
        slopes[0] = delta[0];
        slopes[1] = delta[0];
        return Ok(PiecewiseCubic::from_hermite(x, y, &slopes));
    }

    for k in 1..n - 1 {
        let (d0, d1) = (delta[k - 1], delta[k]);
        if d0 * d1 <= 0.0 {
            continue;
        }
        let w1 = 2.0 * h[k] + h[k - 1];
        let w2 = h[k] + 2.0 * h[k - 1];
        slopes[k] = (w1 + w2) / (w1 / d0 + w2 / d1);
    }
    slopes[0] = end_slope(h[0], h[1], delta[0], delta[1]);
    slopes[n - 1] = end_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);

    Ok(PiecewiseCubic::from_hermite(x, y, &slopes))
}

/// One-sided three-point end slope, limited so the end interval stays
/// monotone.
fn end_slope(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if d * m0 <= 0.0 {
        0.0
    } else if m0 * m1 <= 0.0 && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn two_points_is_linear() {
        let f = pchip(&[0.0, 2.0], &[1.0, 5.0]).unwrap();
        assert!((f.evaluate(0.5) - 2.0).abs() < 1e-12);
        assert!((f.derivative(1.7) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn interpolates_samples() {
        let x = [0.0, 1.0, 2.5, 4.0];
        let y = [0.0, 0.3, 0.35, 0.1];
        let f = pchip(&x, &y).unwrap();
        for (xi, yi) in x.iter().zip(y.iter()) {
            assert!((f.evaluate(*xi) - yi).abs() < 1e-12);
        }
    }

    #[test]
    fn does_not_overshoot_monotone_data() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [0.0, 0.0, 1.0, 1.0, 1.0];
        let f = pchip(&x, &y).unwrap();
        for i in 0..=400 {
            let t = f64::from(i) * 0.01;
            let v = f.evaluate(t);
            assert!((-1e-12..=1.0 + 1e-12).contains(&v), "overshoot {v} at {t}");
        }
    }

    #[test]
    fn flat_slope_at_local_extremum() {
        let f = pchip(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).unwrap();
        assert!(f.derivative(1.0).abs() < 1e-12);
        assert!(f.evaluate(0.5) <= 1.0);
    }

    #[test]
    fn reproduces_straight_line() {
        let x = [0.0, 0.7, 1.1, 3.0];
        let y: Vec<f64> = x.iter().map(|v| 0.5 * v - 0.2).collect();
        let f = pchip(&x, &y).unwrap();
        assert!((f.evaluate(2.0) - 0.8).abs() < 1e-12);
        assert!(f.second_derivative(2.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_decreasing_abscissae() {
        assert!(pchip(&[1.0, 0.0], &[0.0, 1.0]).is_err());
    }
}
