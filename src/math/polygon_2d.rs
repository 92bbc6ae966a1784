//! Polygon helpers in the transverse (y, z) plane.
//!
//! Cross-sections live at a fixed station x, so every helper here ignores the
//! x coordinate and treats `y` as the horizontal and `z` as the vertical axis.

use super::{Point3, TOLERANCE};

/// Computes the signed area of a polygon in the YZ plane (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_yz(points: &[Point3]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].y * points[j].z - points[j].y * points[i].z;
    }
    sum * 0.5
}

/// Computes the area-weighted centroid `(y, z)` of a closed polygon.
///
/// Returns `None` when the polygon has no area.
#[must_use]
pub fn centroid_yz(points: &[Point3]) -> Option<(f64, f64)> {
    let area = signed_area_yz(points);
    if area.abs() < TOLERANCE {
        return None;
    }
    let n = points.len();
    let mut cy = 0.0;
    let mut cz = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let cross = points[i].y * points[j].z - points[j].y * points[i].z;
        cy += (points[i].y + points[j].y) * cross;
        cz += (points[i].z + points[j].z) * cross;
    }
    let factor = 1.0 / (6.0 * area);
    Some((cy * factor, cz * factor))
}

/// Length of the closed polygon boundary in the YZ plane.
#[must_use]
pub fn perimeter_yz(points: &[Point3]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| {
            let a = &points[i];
            let b = &points[(i + 1) % n];
            (b.y - a.y).hypot(b.z - a.z)
        })
        .sum()
}

/// Clips a closed polygon to the half-plane `z <= level`.
///
/// Sutherland-Hodgman against a single edge: vertices at or below the level
/// are kept in order and a linearly interpolated point is inserted wherever an
/// edge crosses the level, so an ordered simple polygon stays closed and simple.
#[must_use]
pub fn clip_below(points: &[Point3], level: f64) -> Vec<Point3> {
    let n = points.len();
    let mut clipped = Vec::with_capacity(n + 2);
    for i in 0..n {
        let current = points[i];
        let next = points[(i + 1) % n];
        let current_in = current.z <= level;
        let next_in = next.z <= level;

        if current_in {
            clipped.push(current);
        }
        if current_in != next_in {
            let t = (level - current.z) / (next.z - current.z);
            clipped.push(Point3::new(
                current.x + t * (next.x - current.x),
                current.y + t * (next.y - current.y),
                level,
            ));
        }
    }
    clipped
}

/// Transverse coordinates where the closed polygon boundary crosses `z = level`.
///
/// Vertices lying exactly on the level are reported once.
#[must_use]
pub fn level_crossings_y(points: &[Point3], level: f64) -> Vec<f64> {
    let n = points.len();
    let mut ys = Vec::new();
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        if (a.z - level).abs() < TOLERANCE {
            ys.push(a.y);
        } else if (a.z < level && b.z > level) || (a.z > level && b.z < level) {
            let t = (level - a.z) / (b.z - a.z);
            ys.push(a.y + t * (b.y - a.y));
        }
    }
    ys
}
