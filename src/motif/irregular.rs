use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result, Side};
use crate::math::intersect_2d::line_through_intersect_2d;
use crate::math::polygon_2d::side_midpoints;
use crate::math::Point2;
use crate::topology::{Map, VertexId};

use super::degenerate;

/// A star inferred on a convex tile: every side midpoint is joined towards
/// the midpoints `d` sides away in both directions, keeping `s` crossings
/// along each chord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrregularParams {
    pub tile: Vec<Point2>,
    pub d: f64,
    pub s: usize,
}

impl IrregularParams {
    #[must_use]
    pub fn new(tile: Vec<Point2>, d: f64, s: usize) -> Self {
        Self { tile, d, s }
    }

    /// Rounds `d` to an integer in `[1, (m - 1) / 2]` for an `m`-sided tile
    /// and clamps `s` to `[1, d]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn clamped(&self) -> Self {
        let d_max = ((self.tile.len().saturating_sub(1)) / 2).max(1);
        let d = self.d.round().clamp(1.0, d_max as f64);
        Self {
            tile: self.tile.clone(),
            d,
            s: self.s.clamp(1, self.hops_for(d)),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn hops_for(&self, d: f64) -> usize {
        (d.round() as usize).max(1)
    }

    /// Builds the whole figure. Chains from neighbouring midpoints end on
    /// the same points but as separate vertices; the connect step merges
    /// them.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub(crate) fn build(&self, motif: &'static str) -> Result<Map> {
        let m = self.tile.len();
        if m < 3 {
            return Err(GeometryError::Degenerate(format!("tile has {m} corners")).into());
        }
        let mids = side_midpoints(&self.tile);
        let d = self.hops_for(self.d);
        let at = |j: usize, offset: isize| -> Point2 {
            mids[(j as isize + offset).rem_euclid(m as isize) as usize]
        };

        let mut map = Map::new();
        let anchors: Vec<VertexId> = mids.iter().map(|&p| map.insert_vertex(p)).collect();
        let (di, si) = (d as isize, self.s as isize);
        for (j, &anchor) in anchors.iter().enumerate() {
            for (dir, side) in [(1, Side::Top), (-1, Side::Bottom)] {
                let a = at(j, 0);
                let b = at(j, dir * di);
                let mut prev = anchor;
                for i in 1..=si {
                    let point = if i == di {
                        nalgebra::center(&a, &b)
                    } else {
                        let c = at(j, dir * i);
                        let e = at(j, dir * (i - di));
                        line_through_intersect_2d(&a, &b, &c, &e)
                            .ok_or_else(|| degenerate(motif, i as usize, side))?
                    };
                    let v = map.insert_vertex(point);
                    map.insert_line(prev, v)?;
                    prev = v;
                }
            }
        }
        Ok(map)
    }
}
