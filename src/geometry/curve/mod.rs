mod arc;
mod circle;
mod line;

pub use arc::Arc;
pub use circle::Circle;
pub use line::Line;

use crate::math::{Point2, Vector2};

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }
}

/// Trait for parametric curves in the plane.
pub trait Curve {
    /// Evaluates the curve at parameter `t`.
    fn evaluate(&self, t: f64) -> Point2;

    /// Returns the unit tangent at parameter `t`.
    fn tangent(&self, t: f64) -> Vector2;

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Returns whether the curve is closed.
    fn is_closed(&self) -> bool;
}

/// Evenly spaced points over a bounded curve, `segments + 1` of them for an
/// open curve and `segments` for a closed one. Unbounded curves give none.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sample(curve: &impl Curve, segments: usize) -> Vec<Point2> {
    let CurveDomain { t_min, t_max } = curve.domain();
    if !t_min.is_finite() || !t_max.is_finite() {
        return Vec::new();
    }
    let segments = segments.max(1);
    let count = if curve.is_closed() { segments } else { segments + 1 };
    (0..count)
        .map(|i| curve.evaluate(t_min + (t_max - t_min) * i as f64 / segments as f64))
        .collect()
}
