/// Finds a root of `f` in `[a, b]` with Brent's method.
///
/// Combines bisection, secant and inverse quadratic interpolation. Returns
/// `None` when `f(a)` and `f(b)` share a sign or the iteration budget runs out
/// before the bracket shrinks below `xtol`.
#[allow(clippy::many_single_char_names, clippy::float_cmp)]
pub fn brent<F>(f: F, a: f64, b: f64, xtol: f64, max_iter: usize) -> Option<f64>
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = (a, b);
    let (mut fa, mut fb) = (f(a), f(b));
    if fa == 0.0 {
        return Some(a);
    }
    if fb == 0.0 {
        return Some(b);
    }
    if fa * fb > 0.0 {
        return None;
    }

    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..max_iter {
        if (fb > 0.0) == (fc > 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * xtol;
        let m = 0.5 * (c - b);
        if m.abs() <= tol || fb == 0.0 {
            return Some(b);
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * m * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }
            if 2.0 * p < (3.0 * m * q - (tol * q).abs()).min((e * q).abs()) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = m;
            }
        } else {
            d = m;
            e = m;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(m) };
        fb = f(b);
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn finds_sqrt_two() {
        let r = brent(|x| x * x - 2.0, 0.0, 2.0, 1e-12, 100).unwrap();
        assert!((r - 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn finds_root_of_cubic() {
        let r = brent(|x| x * x * x - x - 1.0, 1.0, 2.0, 1e-12, 100).unwrap();
        assert!((r * r * r - r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn endpoint_root_returned_directly() {
        assert_eq!(brent(|x| x - 1.0, 1.0, 3.0, 1e-12, 100), Some(1.0));
    }

    #[test]
    fn no_sign_change_is_none() {
        assert!(brent(|x| x * x + 1.0, -1.0, 1.0, 1e-12, 100).is_none());
    }

    #[test]
    fn reversed_bracket_works() {
        let r = brent(f64::cos, 3.0, 0.0, 1e-12, 100).unwrap();
        assert!((r - std::f64::consts::FRAC_PI_2).abs() < 1e-10);
    }
}
