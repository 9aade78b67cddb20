use std::f64::consts::PI;

use tracing::{debug, warn};

use crate::error::{MapError, Result};
use crate::math::distance_2d::point_inside_segment;
use crate::math::{angle_distance, Aabb, ANGLE_TOLERANCE};
use crate::operations::query::Verify;
use crate::topology::{EdgeCurve, EdgeId, Map, VertexId};

use super::merge::MergeCoincident;
use super::split::SplitEdge;

/// How far a [`Cleanse`] goes. Each level runs every pass up to and
/// including itself, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum CleanseLevel {
    /// Drop vertices with no edges.
    RemoveIsolated,
    /// Drop degree-1 vertices hanging off a point edge, with the edge.
    RemoveDegenerate,
    /// Merge vertices within tolerance.
    MergeCoincident,
    /// Replace two collinear lines through a degree-2 vertex by one.
    JoinCollinear,
    /// Split lines that pass through another vertex.
    DivideOverlapping,
    /// Rebuild every neighbour list from the edges.
    RebuildNeighbours,
    /// Check the map invariants.
    #[default]
    Verify,
}

/// What each pass of a [`Cleanse`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanseReport {
    pub isolated_removed: usize,
    pub degenerate_removed: usize,
    pub vertices_merged: usize,
    pub edges_joined: usize,
    pub edges_divided: usize,
    pub neighbours_repaired: usize,
    pub overlaps_resolved: usize,
}

impl CleanseReport {
    /// Total number of repairs made.
    #[must_use]
    pub fn total(&self) -> usize {
        self.isolated_removed
            + self.degenerate_removed
            + self.vertices_merged
            + self.edges_joined
            + self.edges_divided
            + self.neighbours_repaired
            + self.overlaps_resolved
    }
}

/// Multi-level map maintenance.
///
/// Geometry that cannot be repaired is left in place: if the final
/// verification still finds defects the operation fails with
/// [`MapError::CleanseIncomplete`], and the map stays usable.
pub struct Cleanse {
    level: CleanseLevel,
    tolerance: Option<f64>,
}

impl Cleanse {
    /// Creates a new `Cleanse` operation using the map's tolerance.
    #[must_use]
    pub fn new(level: CleanseLevel) -> Self {
        Self {
            level,
            tolerance: None,
        }
    }

    /// Overrides the vertex merge tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Executes every pass up to the configured level.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::CleanseIncomplete`] if verification finds
    /// residual defects, or any error raised by a repair.
    pub fn execute(&self, map: &mut Map) -> Result<CleanseReport> {
        let tol = self.tolerance.unwrap_or_else(|| map.tolerance());
        let level = self.level;
        let mut report = CleanseReport::default();

        if level >= CleanseLevel::RemoveIsolated {
            report.isolated_removed = remove_isolated(map)?;
        }
        if level >= CleanseLevel::RemoveDegenerate {
            report.degenerate_removed = remove_degenerate(map)?;
        }
        if level >= CleanseLevel::MergeCoincident {
            report.vertices_merged = MergeCoincident::new(tol).execute(map)?;
        }
        if level >= CleanseLevel::JoinCollinear {
            report.edges_joined = join_collinear(map)?;
        }
        if level >= CleanseLevel::DivideOverlapping {
            report.edges_divided = divide_overlapping(map, tol)?;
        }
        if level >= CleanseLevel::RebuildNeighbours {
            report.neighbours_repaired = map.rebuild_incidence();
            report.overlaps_resolved = resolve_overlaps(map)?;
        }
        debug!(?level, ?report, "cleanse passes complete");

        if level >= CleanseLevel::Verify {
            let defects = Verify::with_tolerance(tol).execute(map);
            if let Some(first) = defects.first() {
                warn!(residual = defects.len(), %first, "cleanse incomplete");
                return Err(MapError::CleanseIncomplete {
                    residual: defects.len(),
                }
                .into());
            }
        }
        Ok(report)
    }
}

fn remove_isolated(map: &mut Map) -> Result<usize> {
    let isolated: Vec<VertexId> = map
        .vertices()
        .filter(|(_, v)| v.degree() == 0)
        .map(|(id, _)| id)
        .collect();
    for &v in &isolated {
        map.remove_vertex(v)?;
    }
    Ok(isolated.len())
}

fn remove_degenerate(map: &mut Map) -> Result<usize> {
    let mut removed = 0;
    for v in map.vertex_ids() {
        let Ok(vertex) = map.vertex(v) else {
            continue;
        };
        if vertex.degree() != 1 {
            continue;
        }
        let Some(e) = vertex.neighbours.edges().next() else {
            continue;
        };
        if matches!(map.edge(e)?.curve, EdgeCurve::Point) {
            map.remove_vertex(v)?;
            removed += 1;
        }
    }
    Ok(removed)
}

fn join_collinear(map: &mut Map) -> Result<usize> {
    let mut joined = 0;
    for v in map.vertex_ids() {
        let Ok(vertex) = map.vertex(v) else {
            continue;
        };
        if vertex.degree() != 2 {
            continue;
        }
        let entries: Vec<(EdgeId, f64)> = vertex.neighbours.iter().map(|n| (n.edge, n.angle)).collect();
        let (e1, a1) = entries[0];
        let (e2, a2) = entries[1];
        if !map.edge(e1)?.is_line() || !map.edge(e2)?.is_line() {
            continue;
        }
        if (angle_distance(a1, a2) - PI).abs() > ANGLE_TOLERANCE {
            continue;
        }
        let (Some(a), Some(b)) = (map.edge(e1)?.other(v), map.edge(e2)?.other(v)) else {
            continue;
        };
        if a == b {
            continue;
        }
        map.remove_vertex(v)?;
        map.insert_line(a, b)?;
        joined += 1;
    }
    Ok(joined)
}

fn divide_overlapping(map: &mut Map, tol: f64) -> Result<usize> {
    let mut divided = 0;
    let mut work: Vec<EdgeId> = map
        .edges()
        .filter(|(_, e)| e.is_line())
        .map(|(id, _)| id)
        .collect();

    while let Some(e) = work.pop() {
        if !map.contains_edge(e) {
            continue;
        }
        let (p1, p2) = map.edge_points(e)?;
        let data = map.edge(e)?;
        let (v1, v2) = (data.v1, data.v2);
        let mut aabb = Aabb::from_point(p1);
        aabb.include(&p2);

        // The interior vertex nearest to v1, if any.
        let hit = map
            .vertices()
            .filter(|(id, v)| {
                *id != v1
                    && *id != v2
                    && aabb.contains(&v.point, tol)
                    && point_inside_segment(&v.point, &p1, &p2, tol)
            })
            .map(|(id, v)| (id, (v.point - p1).norm()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id);

        if let Some(w) = hit {
            let (_, first, second) = SplitEdge::at_vertex(e, w).execute(map)?;
            work.push(first);
            work.push(second);
            divided += 1;
        }
    }
    Ok(divided)
}

/// Splits pairs of straight edges that leave a vertex in the same direction.
///
/// The longer edge is routed through the far end of the shorter one, which
/// then coincides with the shorter edge and is absorbed by it.
fn resolve_overlaps(map: &mut Map) -> Result<usize> {
    let mut resolved = 0;
    for v in map.vertex_ids() {
        let Ok(vertex) = map.vertex(v) else {
            continue;
        };
        for (first, second) in vertex.neighbours.coincident_directions() {
            let (Ok(d1), Ok(d2)) = (map.edge(first), map.edge(second)) else {
                continue;
            };
            if !d1.is_line() || !d2.is_line() {
                continue;
            }
            let (Some(f1), Some(f2)) = (d1.other(v), d2.other(v)) else {
                continue;
            };
            let origin = map.point(v)?;
            let l1 = (map.point(f1)? - origin).norm();
            let l2 = (map.point(f2)? - origin).norm();
            let (longer, through) = if l1 > l2 { (first, f2) } else { (second, f1) };
            SplitEdge::at_vertex(longer, through).execute(map)?;
            resolved += 1;
            // Later pairs at this vertex may refer to the edge just split.
            break;
        }
    }
    Ok(resolved)
}
