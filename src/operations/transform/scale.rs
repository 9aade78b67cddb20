use crate::error::{GeometryError, Result};
use crate::math::{Point2, Transform, TOLERANCE};
use crate::topology::Map;

use super::GeneralTransform;

/// Uniformly scales a map about a center point.
pub struct Scale {
    center: Point2,
    factor: f64,
}

impl Scale {
    /// Creates a new `Scale` operation.
    #[must_use]
    pub fn new(center: Point2, factor: f64) -> Self {
        Self { center, factor }
    }

    /// Executes the scaling, modifying the map in place.
    ///
    /// # Errors
    ///
    /// Returns an error if `factor` is not positive.
    pub fn execute(&self, map: &mut Map) -> Result<()> {
        if self.factor < TOLERANCE {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "factor",
                value: self.factor,
                min: TOLERANCE,
                max: f64::INFINITY,
            }
            .into());
        }
        GeneralTransform::new(Transform::scaling_about(&self.center, self.factor)).execute(map)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::topology::{ArcSpec, EdgeCurve};

    #[test]
    fn doubling_scales_arc_radius() {
        let mut map = Map::new();
        let a = map.insert_vertex(Point2::new(1.0, 0.0));
        let b = map.insert_vertex(Point2::new(-1.0, 0.0));
        let e = map
            .insert_edge(a, b, EdgeCurve::Curve(ArcSpec::new(Point2::new(0.0, -0.5), true)))
            .unwrap();
        let before = map.edge(e).unwrap().arc.unwrap().radius();
        Scale::new(Point2::origin(), 2.0).execute(&mut map).unwrap();
        let after = map.edge(e).unwrap().arc.unwrap().radius();
        assert_abs_diff_eq!(after, 2.0 * before, epsilon = 1e-12);
        assert_abs_diff_eq!(map.point(b).unwrap().x, -2.0);
    }

    #[test]
    fn non_positive_factor_is_rejected() {
        let mut map = Map::new();
        assert!(Scale::new(Point2::origin(), 0.0).execute(&mut map).is_err());
        assert!(Scale::new(Point2::origin(), -1.0).execute(&mut map).is_err());
    }
}
