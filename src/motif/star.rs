use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{Result, Side};
use crate::geometry::curve::Line;
use crate::math::intersect_2d::line_through_intersect_2d;
use crate::math::{Point2, TOLERANCE};

use super::{degenerate, snap, tip, Strategy, CLAMP_MARGIN};

/// How the branch points of a star are located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarStrategy {
    /// Crossings of the tip chord with the chords of the mirrored copies.
    /// Needs an integral density.
    Chord,
    /// Crossings of the tip chord with the symmetry axes between tips.
    Axis,
}

impl StarStrategy {
    /// Chooses the strategy for a clamped density.
    #[must_use]
    pub fn select(d: f64) -> Self {
        if (d - d.round()).abs() < TOLERANCE {
            Self::Chord
        } else {
            Self::Axis
        }
    }
}

/// A `{n/d}` star: each tip is joined towards the tip `d` places round.
///
/// `s` counts the crossings kept along each half chord. With `s == d`
/// (integral `d`) the chain runs all the way to the chord midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarParams {
    pub n: usize,
    pub d: f64,
    pub s: usize,
}

impl StarParams {
    #[must_use]
    pub fn new(n: usize, d: f64, s: usize) -> Self {
        Self { n, d, s }
    }

    /// Clamps `n >= 3`, `d` to `[1, n/2 - 0.01]` after snapping near-integers,
    /// and `s` to `[1, floor(d)]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clamped(&self) -> Self {
        let n = self.n.max(3);
        let d = snap(self.d).clamp(1.0, n as f64 / 2.0 - CLAMP_MARGIN);
        let s_max = (d.floor() as usize).max(1);
        Self {
            n,
            d,
            s: self.s.clamp(1, s_max),
        }
    }

    /// The strategy this star is built with.
    #[must_use]
    pub fn strategy(&self) -> StarStrategy {
        StarStrategy::select(self.d)
    }

    /// The half-chord chain, tip first.
    pub(crate) fn chain(&self, motif: &'static str) -> Result<(Vec<Point2>, Strategy)> {
        let strategy = self.strategy();
        let mut points = vec![tip(0.0)];
        match strategy {
            StarStrategy::Chord => points.extend(chord_points(self, motif)?),
            StarStrategy::Axis => points.extend(axis_points(self, motif)?),
        }
        Ok((points, Strategy::Star(strategy)))
    }
}

/// Branch points from chord/chord crossings. The chord from tip 0 towards
/// tip `d` meets the mirrored chord from tip `i` (towards tip `i - d`).
#[allow(clippy::cast_precision_loss)]
fn chord_points(p: &StarParams, motif: &'static str) -> Result<Vec<Point2>> {
    let n = p.n as f64;
    let a = tip(0.0);
    let b = tip(p.d / n);
    let mut points = Vec::with_capacity(p.s);
    for i in 1..=p.s {
        let fi = i as f64;
        if (fi - p.d).abs() < TOLERANCE {
            // The mirrored chord is this chord reversed.
            points.push(nalgebra::center(&a, &b));
            continue;
        }
        let c = line_through_intersect_2d(&a, &b, &tip(fi / n), &tip((fi - p.d) / n))
            .ok_or_else(|| degenerate(motif, i, Side::Top))?;
        points.push(c);
    }
    Ok(points)
}

/// Branch points from chord/axis crossings. The mirrored chord from tip `i`
/// is the reflection of the tip chord about the axis at `pi * i / n`, so
/// the two meet on that axis.
#[allow(clippy::cast_precision_loss)]
fn axis_points(p: &StarParams, motif: &'static str) -> Result<Vec<Point2>> {
    let n = p.n as f64;
    let chord = Line::through(tip(0.0), &tip(p.d / n))?;
    (1..=p.s)
        .map(|i| {
            let axis = Line::from_angle(Point2::origin(), PI * i as f64 / n);
            chord
                .crossing(&axis)
                .ok_or_else(|| degenerate(motif, i, Side::Top))
        })
        .collect()
}
