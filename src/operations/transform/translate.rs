use crate::error::Result;
use crate::math::{Transform, Vector2};
use crate::topology::Map;

use super::GeneralTransform;

/// Translates a map by an offset.
pub struct Translate {
    offset: Vector2,
}

impl Translate {
    /// Creates a new `Translate` operation.
    #[must_use]
    pub fn new(offset: Vector2) -> Self {
        Self { offset }
    }

    /// Executes the translation, modifying the map in place.
    ///
    /// # Errors
    ///
    /// Returns an error if an arc cannot be re-solved.
    pub fn execute(&self, map: &mut Map) -> Result<()> {
        GeneralTransform::new(Transform::translation(&self.offset)).execute(map)
    }
}
