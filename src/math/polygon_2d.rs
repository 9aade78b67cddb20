use std::f64::consts::TAU;

use super::{polar_point, Point2, Vector2, TOLERANCE};
use crate::error::{GeometryError, Result};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns the vertex average of a polygon.
#[must_use]
pub fn centroid_2d(points: &[Point2]) -> Option<Point2> {
    if points.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let inv_n = 1.0 / points.len() as f64;
    let sum = points
        .iter()
        .fold(Vector2::zeros(), |acc, p| acc + p.coords);
    Some(Point2::from(sum * inv_n))
}

/// Builds a regular polygon with `sides` corners on a circle of `radius`.
///
/// The first corner sits at polar angle `rotation` around `center`; corners
/// run counter-clockwise.
///
/// # Errors
///
/// Returns an error if fewer than three sides are requested or the radius
/// is not positive.
pub fn regular_polygon(sides: usize, radius: f64, rotation: f64, center: &Point2) -> Result<Vec<Point2>> {
    if sides < 3 {
        #[allow(clippy::cast_precision_loss)]
        return Err(GeometryError::ParameterOutOfRange {
            parameter: "sides",
            value: sides as f64,
            min: 3.0,
            max: f64::INFINITY,
        }
        .into());
    }
    if radius < TOLERANCE {
        return Err(GeometryError::Degenerate("polygon radius must be positive".into()).into());
    }
    #[allow(clippy::cast_precision_loss)]
    let step = TAU / sides as f64;
    #[allow(clippy::cast_precision_loss)]
    Ok((0..sides)
        .map(|i| polar_point(center, radius, rotation + step * i as f64))
        .collect())
}

/// Returns the midpoints of the polygon's sides; side `i` runs from
/// `points[i]` to `points[i + 1]`.
#[must_use]
pub fn side_midpoints(points: &[Point2]) -> Vec<Point2> {
    let n = points.len();
    (0..n)
        .map(|i| nalgebra::center(&points[i], &points[(i + 1) % n]))
        .collect()
}

/// Even-odd point-in-polygon test.
#[must_use]
pub fn point_in_polygon(p: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (&polygon[i], &polygon[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert!((signed_area_2d(&unit_square()) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = unit_square();
        pts.reverse();
        assert!((signed_area_2d(&pts) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area_2d(&[Point2::new(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area_2d(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn regular_hexagon_is_ccw_with_expected_area() {
        let hex = regular_polygon(6, 1.0, 0.0, &Point2::origin()).unwrap();
        assert_eq!(hex.len(), 6);
        let expected = 1.5 * 3.0_f64.sqrt();
        assert!((signed_area_2d(&hex) - expected).abs() < 1e-9);
        assert!((hex[0].x - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn regular_polygon_rejects_digons() {
        assert!(regular_polygon(2, 1.0, 0.0, &Point2::origin()).is_err());
        assert!(regular_polygon(5, 0.0, 0.0, &Point2::origin()).is_err());
    }

    #[test]
    fn midpoints_and_centroid() {
        let mids = side_midpoints(&unit_square());
        assert!((mids[0].x - 0.5).abs() < TOLERANCE && mids[0].y.abs() < TOLERANCE);
        let c = centroid_2d(&unit_square()).unwrap();
        assert!((c.x - 0.5).abs() < TOLERANCE && (c.y - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn containment() {
        assert!(point_in_polygon(&Point2::new(0.5, 0.5), &unit_square()));
        assert!(!point_in_polygon(&Point2::new(1.5, 0.5), &unit_square()));
    }
}
