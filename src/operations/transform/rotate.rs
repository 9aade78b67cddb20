use crate::error::Result;
use crate::math::{Point2, Transform};
use crate::topology::Map;

use super::GeneralTransform;

/// Rotates a map about a center point.
pub struct Rotate {
    center: Point2,
    angle: f64,
}

impl Rotate {
    /// Creates a new `Rotate` operation.
    ///
    /// * `angle` - Counter-clockwise rotation angle in radians.
    #[must_use]
    pub fn new(center: Point2, angle: f64) -> Self {
        Self { center, angle }
    }

    /// Executes the rotation, modifying the map in place.
    ///
    /// # Errors
    ///
    /// Returns an error if an arc cannot be re-solved.
    pub fn execute(&self, map: &mut Map) -> Result<()> {
        GeneralTransform::new(Transform::rotation_about(&self.center, self.angle)).execute(map)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn quarter_turn_about_offset_center() {
        let mut map = Map::new();
        let a = map.insert_vertex(Point2::new(2.0, 1.0));
        let b = map.insert_vertex(Point2::new(3.0, 1.0));
        map.insert_line(a, b).unwrap();
        Rotate::new(Point2::new(1.0, 1.0), FRAC_PI_2).execute(&mut map).unwrap();

        let pa = map.point(a).unwrap();
        let pb = map.point(b).unwrap();
        assert_abs_diff_eq!(pa.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pa.y, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pb.y, 3.0, epsilon = 1e-12);
        let angle = map.vertex(a).unwrap().neighbours.iter().next().unwrap().angle;
        assert_abs_diff_eq!(angle, FRAC_PI_2, epsilon = 1e-12);
    }
}
