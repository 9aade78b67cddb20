use std::f64::consts::{PI, TAU};

use crate::error::{Result, Side};
use crate::geometry::curve::Line;
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::{polar_point, Point2, TOLERANCE};

use super::{degenerate, tip, CLAMP_MARGIN};

/// How the branch points of a petal are located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetalStrategy {
    /// One branch point, solved in closed form on the first axis.
    Single,
    /// Several branch points: every axis crossing up to the `s`-th, plus
    /// the crossings with the petals of other copies that lie before it.
    Interlaced,
}

impl PetalStrategy {
    /// Chooses the strategy for a clamped intersection count.
    #[must_use]
    pub fn select(s: usize) -> Self {
        if s <= 1 {
            Self::Single
        } else {
            Self::Interlaced
        }
    }
}

/// The largest usable intersection count for a petal leaving the tip at
/// polar angle `phi`: the mirror axes at `pi * i / n` it crosses ahead of
/// the tip, counting only axes up to the vertical.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn max_crossings(n: usize, phi: f64) -> usize {
    let nf = n as f64;
    (1..=n / 2)
        .filter(|&i| PI * i as f64 / nf < phi - CLAMP_MARGIN)
        .count()
        .max(1)
}

/// The petal chain for a ray leaving the tip `(1, 0)` at polar angle `phi`.
pub(crate) fn petal_chain(
    n: usize,
    phi: f64,
    s: usize,
    motif: &'static str,
) -> Result<(Vec<Point2>, PetalStrategy)> {
    let strategy = PetalStrategy::select(s);
    let points = match strategy {
        PetalStrategy::Single => vec![tip(0.0), single_branch(n, phi, motif)?],
        PetalStrategy::Interlaced => interlaced(n, phi, s, motif)?,
    };
    Ok((points, strategy))
}

/// Law of sines in the triangle (center, tip, branch): the angle at the
/// center is `pi / n`, at the tip `pi - phi`.
#[allow(clippy::cast_precision_loss)]
fn single_branch(n: usize, phi: f64, motif: &'static str) -> Result<Point2> {
    let beta = PI / n as f64;
    let opposite = (phi - beta).sin();
    if opposite < TOLERANCE {
        return Err(degenerate(motif, 1, Side::Top));
    }
    Ok(polar_point(&Point2::origin(), phi.sin() / opposite, beta))
}

#[allow(clippy::cast_precision_loss)]
fn interlaced(n: usize, phi: f64, s: usize, motif: &'static str) -> Result<Vec<Point2>> {
    let nf = n as f64;
    let ray = Line::from_angle(tip(0.0), phi);

    let mut axis_hits: Vec<f64> = (1..n)
        .filter_map(|i| {
            let axis = Line::from_angle(Point2::origin(), PI * i as f64 / nf);
            ray.intersect_line(&axis)
                .map(|(t, _)| t)
                .filter(|&t| t > TOLERANCE)
        })
        .collect();
    axis_hits.sort_by(f64::total_cmp);
    if axis_hits.len() < s {
        return Err(degenerate(motif, axis_hits.len() + 1, Side::Top));
    }
    let end = axis_hits[s - 1];
    let mut hits = axis_hits[..s].to_vec();

    // Rotated petals: a crossing counts only if both chains reach it.
    for k in 1..n {
        let kf = k as f64 / nf;
        let other = Line::from_angle(tip(kf), phi + TAU * kf);
        if let Some((t, u)) = ray.intersect_line(&other) {
            if t > TOLERANCE && t < end - TOLERANCE && u > TOLERANCE && u < end - TOLERANCE {
                hits.push(t);
            }
        }
    }
    hits.sort_by(f64::total_cmp);
    hits.dedup_by(|a, b| (*a - *b).abs() < TOLERANCE);

    let mut points = Vec::with_capacity(hits.len() + 1);
    points.push(tip(0.0));
    points.extend(hits.into_iter().map(|t| ray.point_at(t)));
    Ok(points)
}

/// Inserts every point where a segment of `points` crosses the interior of
/// a segment of one of its `2n` rotated or mirrored copies.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn divide_at_crossings(points: &[Point2], n: usize) -> Vec<Point2> {
    let copies: Vec<Vec<Point2>> = (0..n)
        .flat_map(|k| {
            let (sin, cos) = (TAU * k as f64 / n as f64).sin_cos();
            [false, true].into_iter().map(move |mirrored| {
                points
                    .iter()
                    .map(|p| {
                        let y = if mirrored { -p.y } else { p.y };
                        Point2::new(cos * p.x - sin * y, sin * p.x + cos * y)
                    })
                    .collect()
            })
        })
        .collect();
    let interior = |x: f64| x > TOLERANCE && x < 1.0 - TOLERANCE;

    let mut divided = Vec::with_capacity(points.len());
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let mut hits: Vec<f64> = copies
            .iter()
            .flat_map(|copy| copy.windows(2))
            .filter_map(|other| segment_segment_intersect_2d(&a, &b, &other[0], &other[1]))
            .filter(|&(_, t, u)| interior(t) && interior(u))
            .map(|(_, t, _)| t)
            .collect();
        hits.sort_by(f64::total_cmp);
        hits.dedup_by(|x, y| (*x - *y).abs() < TOLERANCE);
        divided.push(a);
        divided.extend(hits.into_iter().map(|t| a + (b - a) * t));
    }
    divided.extend(points.last().copied());
    divided
}
