use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::math::Point2;

use super::petal::{max_crossings, petal_chain};
use super::Strategy;

/// Margin, in degrees, kept from both ends of the tip angle range.
const THETA_MARGIN: f64 = 0.5;

/// A star given by the half-angle `theta` (degrees) at each tip, measured
/// from the direction to the center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star2Params {
    pub n: usize,
    pub theta: f64,
    pub s: usize,
}

impl Star2Params {
    #[must_use]
    pub fn new(n: usize, theta: f64, s: usize) -> Self {
        Self { n, theta, s }
    }

    /// Clamps `n >= 3`, `theta` to `[0.5, 180 - 180/n - 0.5]`, and `s` to
    /// the number of axes the tip edge crosses.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn clamped(&self) -> Self {
        let n = self.n.max(3);
        let theta = self
            .theta
            .clamp(THETA_MARGIN, 180.0 - 180.0 / n as f64 - THETA_MARGIN);
        let s = self.s.clamp(1, max_crossings(n, PI - theta.to_radians()));
        Self { n, theta, s }
    }

    /// Polar angle at which the tip edge leaves the tip.
    #[must_use]
    pub fn petal_angle(&self) -> f64 {
        PI - self.theta.to_radians()
    }

    pub(crate) fn chain(&self, motif: &'static str) -> Result<(Vec<Point2>, Strategy)> {
        let (points, strategy) = petal_chain(self.n, self.petal_angle(), self.s, motif)?;
        Ok((points, Strategy::Petal(strategy)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::motif::StarParams;

    #[test]
    fn clamping_ranges() {
        let p = Star2Params::new(6, 0.0, 0).clamped();
        assert_abs_diff_eq!(p.theta, 0.5);
        assert_eq!(p.s, 1);
        let p = Star2Params::new(6, 400.0, 5).clamped();
        assert_abs_diff_eq!(p.theta, 149.5, epsilon = 1e-12);
        assert_eq!(p.s, 1);
    }

    #[test]
    fn matches_star_with_the_same_tip_angle() {
        // A {8/3} star leaves each tip at 90 + 67.5 degrees, a half-angle
        // of 22.5 degrees from the center direction.
        let star = StarParams::new(8, 3.0, 2).chain("star").unwrap().0;
        let (star2, strategy) = Star2Params::new(8, 22.5, 2).chain("star2").unwrap();
        assert!(matches!(strategy, Strategy::Petal(_)));
        for (a, b) in star.iter().zip(&star2).take(2) {
            assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-9);
            assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-9);
        }
    }
}
