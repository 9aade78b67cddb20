use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::math::Point2;

use super::petal::{divide_at_crossings, max_crossings, petal_chain};
use super::{Strategy, CLAMP_MARGIN};

/// A rosette: petals leave each tip at an angle set by `q`, cross `s`
/// mirror axes, and start from a tip pulled inward by the neck `k`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RosetteParams {
    pub n: usize,
    pub q: f64,
    pub s: usize,
    pub k: f64,
}

impl RosetteParams {
    #[must_use]
    pub fn new(n: usize, q: f64, s: usize, k: f64) -> Self {
        Self { n, q, s, k }
    }

    /// Clamps `n >= 3`, `q` and `k` to `[-0.99, 0.99]`, and `s` to the
    /// number of axes the petal crosses.
    #[must_use]
    pub fn clamped(&self) -> Self {
        let n = self.n.max(3);
        let limit = 1.0 - CLAMP_MARGIN;
        let q = self.q.clamp(-limit, limit);
        let s = self.s.clamp(1, max_crossings(n, petal_angle(n, q)));
        Self {
            n,
            q,
            s,
            k: self.k.clamp(-limit, limit),
        }
    }

    /// Polar angle at which the petal leaves the tip.
    #[must_use]
    pub fn petal_angle(&self) -> f64 {
        petal_angle(self.n, self.q)
    }

    pub(crate) fn chain(&self, motif: &'static str) -> Result<(Vec<Point2>, Strategy)> {
        let (mut points, strategy) = petal_chain(self.n, self.petal_angle(), self.s, motif)?;
        // Negative necks have no effect.
        let neck = self.k.max(0.0);
        if neck > 0.0 {
            let foot = points[1].x;
            points[0] = Point2::new(1.0 - neck * (1.0 - foot), 0.0);
            // The bent first segment can cut through neighbouring petals.
            points = divide_at_crossings(&points, self.n);
        }
        Ok((points, Strategy::Petal(strategy)))
    }
}

/// `q = 0` follows the edge of the regular n-gon; `q -> 1` turns the
/// petal towards the center, `q -> -1` away from it.
#[allow(clippy::cast_precision_loss)]
fn petal_angle(n: usize, q: f64) -> f64 {
    let half_wedge = PI / n as f64;
    FRAC_PI_2 + half_wedge + q * (FRAC_PI_2 - half_wedge)
}
