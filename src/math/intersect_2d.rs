use super::{Point2, Vector2, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.perp(d2);
    // Scale-aware parallel test: compare against the direction magnitudes.
    if cross.abs() < TOLERANCE * d1.norm() * d2.norm() {
        return None;
    }
    let d = p2 - p1;
    let t = d.perp(d2) / cross;
    let u = d.perp(d1) / cross;
    Some((t, u))
}

/// Intersection point of the infinite lines through `a0 → a1` and `b0 → b1`.
#[must_use]
pub fn line_through_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<Point2> {
    let da = a1 - a0;
    let db = b1 - b0;
    line_line_intersect_2d(a0, &da, b0, &db).map(|(t, _)| point_at(a0, &da, t))
}

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;
    let (t, u) = line_line_intersect_2d(a0, &da, b0, &db)?;

    // Use a small epsilon to include endpoints.
    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t_clamped = t.clamp(0.0, 1.0);
        Some((point_at(a0, &da, t_clamped), t_clamped, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Linear interpolation: `origin + dir * t`.
#[must_use]
pub fn point_at(origin: &Point2, dir: &Vector2, t: f64) -> Point2 {
    origin + dir * t
}

/// Intersection of the line `origin + t * dir` with a circle.
///
/// Returns the line parameters of the intersections in ascending order:
/// empty if the line misses, one value if it is tangent.
#[must_use]
pub fn line_circle_intersect_2d(
    origin: &Point2,
    dir: &Vector2,
    center: &Point2,
    radius: f64,
) -> Vec<f64> {
    let a = dir.norm_squared();
    if a < TOLERANCE * TOLERANCE || radius < TOLERANCE {
        return Vec::new();
    }

    // Substitute the parametric line into the circle equation:
    // |origin + t*dir - center|² = r²
    let f = origin - center;
    let b = 2.0 * f.dot(dir);
    let c = f.norm_squared() - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < -TOLERANCE {
        return Vec::new();
    }
    let disc_sqrt = discriminant.max(0.0).sqrt();
    if disc_sqrt < TOLERANCE * 100.0 {
        vec![-b / (2.0 * a)]
    } else {
        vec![(-b - disc_sqrt) / (2.0 * a), (-b + disc_sqrt) / (2.0 * a)]
    }
}

/// Nearest intersection of a ray with a closed polygon boundary.
///
/// Only hits with ray parameter greater than `min_t` count. Returns the
/// hit point, its ray parameter and the index of the polygon side hit
/// (side `i` runs from `polygon[i]` to `polygon[i + 1]`).
#[must_use]
pub fn ray_polygon_intersect_2d(
    origin: &Point2,
    dir: &Vector2,
    polygon: &[Point2],
    min_t: f64,
) -> Option<(Point2, f64, usize)> {
    let n = polygon.len();
    if n < 2 {
        return None;
    }
    let mut best: Option<(Point2, f64, usize)> = None;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let side = b - a;
        let Some((t, u)) = line_line_intersect_2d(origin, dir, &a, &side) else {
            continue;
        };
        if t <= min_t || u < -TOLERANCE || u > 1.0 + TOLERANCE {
            continue;
        }
        match best {
            Some((_, best_t, _)) if best_t <= t => {}
            _ => best = Some((point_at(origin, dir, t), t, i)),
        }
    }
    best
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn line_line_perpendicular() {
        let p1 = Point2::new(0.0, 0.0);
        let d1 = Vector2::new(1.0, 0.0);
        let p2 = Point2::new(0.5, -1.0);
        let d2 = Vector2::new(0.0, 1.0);
        let (t, u) = line_line_intersect_2d(&p1, &d1, &p2, &d2).unwrap();
        assert!((t - 0.5).abs() < TOLERANCE);
        assert!((u - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn line_line_parallel_returns_none() {
        let p1 = Point2::new(0.0, 0.0);
        let d1 = Vector2::new(1.0, 0.0);
        let p2 = Point2::new(0.0, 1.0);
        let d2 = Vector2::new(1.0, 0.0);
        assert!(line_line_intersect_2d(&p1, &d1, &p2, &d2).is_none());
    }

    #[test]
    fn lines_through_points() {
        let p = line_through_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 1.0),
            &Point2::new(0.0, 2.0),
            &Point2::new(2.0, 0.0),
        )
        .unwrap();
        assert!((p.x - 1.0).abs() < TOLERANCE);
        assert!((p.y - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn segment_segment_crossing() {
        let a0 = Point2::new(0.0, 0.0);
        let a1 = Point2::new(2.0, 2.0);
        let b0 = Point2::new(0.0, 2.0);
        let b1 = Point2::new(2.0, 0.0);
        let (pt, t, u) = segment_segment_intersect_2d(&a0, &a1, &b0, &b1).unwrap();
        assert!((pt.x - 1.0).abs() < TOLERANCE);
        assert!((pt.y - 1.0).abs() < TOLERANCE);
        assert!((t - 0.5).abs() < TOLERANCE);
        assert!((u - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn segment_segment_no_crossing() {
        let a0 = Point2::new(0.0, 0.0);
        let a1 = Point2::new(1.0, 0.0);
        let b0 = Point2::new(0.0, 1.0);
        let b1 = Point2::new(1.0, 1.0);
        assert!(segment_segment_intersect_2d(&a0, &a1, &b0, &b1).is_none());
    }

    #[test]
    fn line_circle_two_crossings() {
        let ts = line_circle_intersect_2d(
            &Point2::new(-2.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &Point2::origin(),
            1.0,
        );
        assert_eq!(ts.len(), 2);
        assert!((ts[0] - 1.0).abs() < 1e-9);
        assert!((ts[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn line_circle_tangent() {
        let ts = line_circle_intersect_2d(
            &Point2::new(-1.0, 1.0),
            &Vector2::new(1.0, 0.0),
            &Point2::origin(),
            1.0,
        );
        assert_eq!(ts.len(), 1, "ts={ts:?}");
        assert!((ts[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn line_circle_miss() {
        let ts = line_circle_intersect_2d(
            &Point2::new(-1.0, 3.0),
            &Vector2::new(1.0, 0.0),
            &Point2::origin(),
            1.0,
        );
        assert!(ts.is_empty());
    }

    #[test]
    fn ray_hits_nearest_polygon_side() {
        let square = [
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, -1.0),
            Point2::new(1.0, 1.0),
            Point2::new(-1.0, 1.0),
        ];
        let (hit, t, side) = ray_polygon_intersect_2d(
            &Point2::origin(),
            &Vector2::new(1.0, 0.0),
            &square,
            TOLERANCE,
        )
        .unwrap();
        assert!((hit.x - 1.0).abs() < TOLERANCE);
        assert!((t - 1.0).abs() < TOLERANCE);
        assert_eq!(side, 1);
    }
}
