use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::{angle_distance, normalize_angle, polar_angle, Point2, Vector2, TOLERANCE};
use crate::error::{GeometryError, Result};

/// One of the four quadrants of the unit circle.
///
/// Boundaries belong to the quadrant they open: `0°` is `First`,
/// `90°` is `Second`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    First,
    Second,
    Third,
    Fourth,
}

impl Quadrant {
    /// Classifies an angle (radians, any range).
    #[must_use]
    pub fn of(angle: f64) -> Self {
        let a = normalize_angle(angle);
        if a < FRAC_PI_2 {
            Self::First
        } else if a < PI {
            Self::Second
        } else if a < 1.5 * PI {
            Self::Third
        } else {
            Self::Fourth
        }
    }

    /// Zero-based index, counter-clockwise from `First`.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
            Self::Fourth => 3,
        }
    }

    /// The angle at which this quadrant starts.
    #[must_use]
    pub fn start_angle(self) -> f64 {
        FRAC_PI_2 * self.index() as f64
    }

    /// The next quadrant counter-clockwise.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::Third,
            Self::Third => Self::Fourth,
            Self::Fourth => Self::First,
        }
    }

    /// The next quadrant clockwise.
    #[must_use]
    pub fn prev(self) -> Self {
        match self {
            Self::First => Self::Fourth,
            Self::Second => Self::First,
            Self::Third => Self::Second,
            Self::Fourth => Self::Third,
        }
    }
}

/// Center, radius, start angle and signed sweep of a solved arc. Positive
/// sweeps run counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolvedArc {
    pub center: Point2,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

/// Solves the arc from `p1` to `p2` around `nominal_center`.
///
/// The radius is the mean of the nominal center's distances to both
/// endpoints. The actual center sits on the chord's perpendicular bisector,
/// on the nominal center's side. A convex arc is the minor arc, bulging away
/// from the center; a concave arc is the major arc.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] if the endpoints coincide or if the
/// nominal center is collinear with the chord.
pub fn solve_arc(
    p1: &Point2,
    p2: &Point2,
    nominal_center: &Point2,
    convex: bool,
) -> Result<SolvedArc> {
    let chord = p2 - p1;
    let len = chord.norm();
    if len < TOLERANCE {
        return Err(GeometryError::Degenerate("arc endpoints coincide".into()).into());
    }

    let half = len * 0.5;
    let mid = p1 + chord * 0.5;
    let normal = Vector2::new(-chord.y, chord.x) / len;

    let side = (nominal_center - mid).dot(&normal);
    if side.abs() < TOLERANCE * len.max(1.0) {
        return Err(GeometryError::Degenerate(format!(
            "arc center ({}, {}) is collinear with its chord",
            nominal_center.x, nominal_center.y
        ))
        .into());
    }

    // Never shorter than half the chord (triangle inequality).
    let radius = 0.5 * ((nominal_center - p1).norm() + (nominal_center - p2).norm());
    let h = (radius * radius - half * half).max(0.0).sqrt();
    let sign = side.signum();
    let center = mid + normal * (h * sign);

    let start_angle = polar_angle(&(p1 - center));
    let minor = 2.0 * (half / radius).min(1.0).asin();
    let (magnitude, bulge_dir) = if convex {
        (minor, -normal * sign)
    } else {
        (TAU - minor, normal * sign)
    };

    // Pick the sweep direction whose midpoint lands on the bulge side.
    let target = polar_angle(&bulge_dir);
    let ccw = angle_distance(start_angle + magnitude * 0.5, target);
    let cw = angle_distance(start_angle - magnitude * 0.5, target);
    let sweep = if ccw <= cw { magnitude } else { -magnitude };

    Ok(SolvedArc {
        center,
        radius,
        start_angle,
        sweep,
    })
}

/// Evaluates a point on an arc at parameter `t` in `[0, 1]`.
#[must_use]
pub fn arc_point_at(center: &Point2, radius: f64, start_angle: f64, sweep: f64, t: f64) -> Point2 {
    let angle = start_angle + sweep * t;
    Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Computes the unit tangent direction on an arc at parameter `t` in `[0, 1]`.
///
/// The tangent points in the direction of increasing `t`.
#[must_use]
pub fn arc_tangent_at(start_angle: f64, sweep: f64, t: f64) -> Vector2 {
    let angle = start_angle + sweep * t;
    let sign = if sweep >= 0.0 { 1.0 } else { -1.0 };
    Vector2::new(-sign * angle.sin(), sign * angle.cos())
}

/// Returns `true` if `angle` lies within the sweep starting at `start_angle`.
#[must_use]
pub fn angle_in_sweep(angle: f64, start_angle: f64, sweep: f64) -> bool {
    if sweep >= 0.0 {
        normalize_angle(angle - start_angle) <= sweep + TOLERANCE
    } else {
        normalize_angle(start_angle - angle) <= -sweep + TOLERANCE
    }
}

/// Returns the axis-extreme angles (multiples of 90°) that the sweep passes.
///
/// Walks quadrant by quadrant from the start angle in the sweep direction.
/// A boundary the arc merely starts on is not reported.
#[must_use]
pub fn crossed_axis_angles(start_angle: f64, sweep: f64) -> Vec<f64> {
    let start = normalize_angle(start_angle);
    let mut crossed = Vec::new();
    let mut quadrant = Quadrant::of(start);

    if sweep >= 0.0 {
        let mut travelled = normalize_angle(quadrant.next().start_angle() - start);
        while travelled <= sweep + TOLERANCE && crossed.len() < 4 {
            quadrant = quadrant.next();
            crossed.push(quadrant.start_angle());
            travelled += FRAC_PI_2;
        }
    } else {
        let mut travelled = start - quadrant.start_angle();
        if travelled < TOLERANCE {
            quadrant = quadrant.prev();
            travelled = FRAC_PI_2;
        }
        while travelled <= -sweep + TOLERANCE && crossed.len() < 4 {
            crossed.push(quadrant.start_angle());
            quadrant = quadrant.prev();
            travelled += FRAC_PI_2;
        }
    }
    crossed
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const TOL: f64 = 1e-9;

    #[test]
    fn quadrant_boundaries_open_the_next_quadrant() {
        assert_eq!(Quadrant::of(0.0), Quadrant::First);
        assert_eq!(Quadrant::of(FRAC_PI_2), Quadrant::Second);
        assert_eq!(Quadrant::of(PI), Quadrant::Third);
        assert_eq!(Quadrant::of(-0.1), Quadrant::Fourth);
        assert_eq!(Quadrant::of(TAU + 0.1), Quadrant::First);
    }

    #[test]
    fn convex_quarter_circle() {
        let arc = solve_arc(
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Point2::origin(),
            true,
        )
        .unwrap();
        assert_abs_diff_eq!(arc.center.x, 0.0, epsilon = TOL);
        assert_abs_diff_eq!(arc.center.y, 0.0, epsilon = TOL);
        assert_abs_diff_eq!(arc.radius, 1.0, epsilon = TOL);
        assert_abs_diff_eq!(arc.start_angle, 0.0, epsilon = TOL);
        assert_abs_diff_eq!(arc.sweep, FRAC_PI_2, epsilon = TOL);
    }

    #[test]
    fn concave_is_the_major_arc() {
        let arc = solve_arc(
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Point2::origin(),
            false,
        )
        .unwrap();
        assert_abs_diff_eq!(arc.sweep, -1.5 * PI, epsilon = TOL);
        let end = arc_point_at(&arc.center, arc.radius, arc.start_angle, arc.sweep, 1.0);
        assert_abs_diff_eq!(end.x, 0.0, epsilon = TOL);
        assert_abs_diff_eq!(end.y, 1.0, epsilon = TOL);
    }

    #[test]
    fn nominal_center_is_projected_onto_bisector() {
        // Slightly off-bisector nominal center still yields an equidistant center.
        let p1 = Point2::new(0.0, 0.0);
        let p2 = Point2::new(2.0, 0.0);
        let arc = solve_arc(&p1, &p2, &Point2::new(1.05, -1.0), true).unwrap();
        assert_abs_diff_eq!((arc.center - p1).norm(), (arc.center - p2).norm(), epsilon = TOL);
        assert_abs_diff_eq!(arc.center.x, 1.0, epsilon = TOL);
        assert!(arc.center.y < 0.0);
        // Convex: bulges away from the center, i.e. upward.
        let mid = arc_point_at(&arc.center, arc.radius, arc.start_angle, arc.sweep, 0.5);
        assert!(mid.y > 0.0);
    }

    #[test]
    fn collinear_center_is_degenerate() {
        let r = solve_arc(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
            &Point2::new(5.0, 0.0),
            true,
        );
        assert!(r.is_err());
    }

    #[test]
    fn center_near_the_chord_still_solves() {
        let p1 = Point2::new(0.0, 0.0);
        let p2 = Point2::new(2.0, 0.0);
        let arc = solve_arc(&p1, &p2, &Point2::new(1.0, 0.1), true).unwrap();
        assert!(arc.radius >= 1.0);
        assert!(arc.radius.is_finite() && arc.center.y.is_finite());
        assert_abs_diff_eq!((arc.center - p1).norm(), arc.radius, epsilon = TOL);
    }

    #[test]
    fn coincident_endpoints_are_degenerate() {
        let p = Point2::new(1.0, 1.0);
        assert!(solve_arc(&p, &p, &Point2::origin(), true).is_err());
    }

    #[test]
    fn tangent_is_unit_and_follows_sweep() {
        let t = arc_tangent_at(0.0, FRAC_PI_2, 0.0);
        assert_abs_diff_eq!(t.norm(), 1.0, epsilon = TOL);
        assert_abs_diff_eq!(t.y, 1.0, epsilon = TOL);
        let t = arc_tangent_at(0.0, -FRAC_PI_2, 0.0);
        assert_abs_diff_eq!(t.y, -1.0, epsilon = TOL);
    }

    #[test]
    fn sweep_membership() {
        assert!(angle_in_sweep(0.5, 0.0, 1.0));
        assert!(!angle_in_sweep(1.5, 0.0, 1.0));
        assert!(angle_in_sweep(TAU - 0.5, 0.0, -1.0));
        assert!(!angle_in_sweep(0.5, 0.0, -1.0));
    }

    #[test]
    fn crossed_axes_counter_clockwise() {
        let crossed = crossed_axis_angles(0.1, PI);
        assert_eq!(crossed.len(), 2);
        assert_abs_diff_eq!(crossed[0], FRAC_PI_2, epsilon = TOL);
        assert_abs_diff_eq!(crossed[1], PI, epsilon = TOL);
    }

    #[test]
    fn crossed_axes_clockwise() {
        let crossed = crossed_axis_angles(0.1, -0.2);
        assert_eq!(crossed.len(), 1);
        assert_abs_diff_eq!(crossed[0], 0.0, epsilon = TOL);
    }
}
