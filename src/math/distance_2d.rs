use super::{Point2, TOLERANCE};

/// Returns the parameter of the projection of `p` onto the line `a → b`.
///
/// `0` is at `a`, `1` at `b`; the value is not clamped. Degenerate
/// segments project everything onto `0`.
#[must_use]
pub fn project_on_segment(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return 0.0;
    }
    (p - a).dot(&d) / len_sq
}

/// Returns the minimum distance from `p` to the line segment `a → b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    // Project onto the infinite line, clamp to [0, 1].
    let t = project_on_segment(p, a, b).clamp(0.0, 1.0);
    let closest = a + (b - a) * t;
    (p - closest).norm()
}

/// Returns `true` if `p` lies strictly inside segment `a → b`, within `tol`.
///
/// Points within `tol` of either endpoint are not interior.
#[must_use]
pub fn point_inside_segment(p: &Point2, a: &Point2, b: &Point2, tol: f64) -> bool {
    if (p - a).norm() <= tol || (p - b).norm() <= tol {
        return false;
    }
    let t = project_on_segment(p, a, b);
    t > 0.0 && t < 1.0 && point_to_segment_dist(p, a, b) <= tol
}
