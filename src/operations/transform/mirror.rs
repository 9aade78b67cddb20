use crate::error::Result;
use crate::math::{Point2, Transform};
use crate::topology::Map;

use super::GeneralTransform;

/// Reflects a map across a line through `center`.
pub struct Mirror {
    center: Point2,
    axis_angle: f64,
}

impl Mirror {
    /// Creates a new `Mirror` operation.
    ///
    /// * `axis_angle` - Direction of the mirror line, in radians from +x.
    #[must_use]
    pub fn new(center: Point2, axis_angle: f64) -> Self {
        Self { center, axis_angle }
    }

    /// Executes the reflection, modifying the map in place.
    ///
    /// # Errors
    ///
    /// Returns an error if an arc cannot be re-solved.
    pub fn execute(&self, map: &mut Map) -> Result<()> {
        GeneralTransform::new(Transform::reflection_about(&self.center, self.axis_angle)).execute(map)
    }
}
