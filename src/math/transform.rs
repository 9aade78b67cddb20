use serde::{Deserialize, Serialize};

use super::{Matrix3, Point2, Vector2, TOLERANCE};
use crate::error::{GeometryError, Result};

/// A 2D affine transform stored as a 3x3 homogeneous matrix.
///
/// Rotations, scalings and reflections take an explicit center so that
/// geometry built around a non-origin model center can be manipulated in
/// place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    matrix: Matrix3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Returns the underlying homogeneous matrix.
    #[must_use]
    pub fn matrix(&self) -> &Matrix3 {
        &self.matrix
    }

    /// Translation by `offset`.
    #[must_use]
    pub fn translation(offset: &Vector2) -> Self {
        Self {
            matrix: Matrix3::new_translation(offset),
        }
    }

    /// Counter-clockwise rotation by `angle` radians about `center`.
    #[must_use]
    pub fn rotation_about(center: &Point2, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        #[rustfmt::skip]
        let rot = Matrix3::new(
            c,  -s,  0.0,
            s,   c,  0.0,
            0.0, 0.0, 1.0,
        );
        Self::about(center, rot)
    }

    /// Uniform scaling by `factor` about `center`.
    #[must_use]
    pub fn scaling_about(center: &Point2, factor: f64) -> Self {
        #[rustfmt::skip]
        let scale = Matrix3::new(
            factor, 0.0,    0.0,
            0.0,    factor, 0.0,
            0.0,    0.0,    1.0,
        );
        Self::about(center, scale)
    }

    /// Reflection across the line through `center` at polar angle `axis_angle`.
    #[must_use]
    pub fn reflection_about(center: &Point2, axis_angle: f64) -> Self {
        let (s, c) = (2.0 * axis_angle).sin_cos();
        #[rustfmt::skip]
        let refl = Matrix3::new(
            c,   s,   0.0,
            s,  -c,   0.0,
            0.0, 0.0, 1.0,
        );
        Self::about(center, refl)
    }

    /// Composes `scale ∘ rotation` about `center`, followed by `translation`.
    ///
    /// This is the placement transform of a tile: the motif is scaled and
    /// rotated around its own center, then moved into position.
    #[must_use]
    pub fn from_parts(scale: f64, rotation: f64, center: &Point2, translation: &Vector2) -> Self {
        Self::scaling_about(center, scale)
            .then(&Self::rotation_about(center, rotation))
            .then(&Self::translation(translation))
    }

    fn about(center: &Point2, linear: Matrix3) -> Self {
        let to_origin = Matrix3::new_translation(&(-center.coords));
        let back = Matrix3::new_translation(&center.coords);
        Self {
            matrix: back * linear * to_origin,
        }
    }

    /// Returns the transform that applies `self` first, then `next`.
    #[must_use]
    pub fn then(&self, next: &Transform) -> Self {
        Self {
            matrix: next.matrix * self.matrix,
        }
    }

    /// Transforms a point.
    #[must_use]
    pub fn apply(&self, p: &Point2) -> Point2 {
        self.matrix.transform_point(p)
    }

    /// Transforms a direction (translation is ignored).
    #[must_use]
    pub fn apply_vector(&self, v: &Vector2) -> Vector2 {
        self.matrix.transform_vector(v)
    }

    /// Returns the inverse transform.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform is singular (e.g. a zero scale).
    pub fn inverse(&self) -> Result<Self> {
        if self.linear_determinant().abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("transform is not invertible".into()).into());
        }
        self.matrix
            .try_inverse()
            .map(|matrix| Self { matrix })
            .ok_or_else(|| GeometryError::Degenerate("transform is not invertible".into()).into())
    }

    /// Returns `true` if the transform flips orientation.
    #[must_use]
    pub fn is_reflection(&self) -> bool {
        self.linear_determinant() < 0.0
    }

    /// Returns the uniform scale factor (geometric mean of the axis scales).
    #[must_use]
    pub fn scale_factor(&self) -> f64 {
        self.linear_determinant().abs().sqrt()
    }

    /// Returns `true` if the transform is the identity within tolerance.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        (self.matrix - Matrix3::identity()).amax() < TOLERANCE
    }

    fn linear_determinant(&self) -> f64 {
        let m = &self.matrix;
        m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)]
    }
}
