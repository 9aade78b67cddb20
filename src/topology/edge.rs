use serde::{Deserialize, Serialize};

use crate::geometry::curve::Arc;
use crate::math::Point2;

use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in a map.
    pub struct EdgeId;
}

/// Center and convexity of a circular edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSpec {
    /// Nominal center; the solved center lies on the chord's bisector.
    pub center: Point2,
    pub convex: bool,
}

impl ArcSpec {
    #[must_use]
    pub fn new(center: Point2, convex: bool) -> Self {
        Self { center, convex }
    }
}

/// The kind of curve an edge follows between its endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeCurve {
    /// Degenerate or incomplete edge.
    Point,
    /// Straight segment.
    Line,
    /// Circular arc.
    Curve(ArcSpec),
    /// Straight chord standing in for an arc.
    Chord(ArcSpec),
}

impl EdgeCurve {
    /// Returns the arc parameters, if the curve carries any.
    #[must_use]
    pub fn arc_spec(&self) -> Option<&ArcSpec> {
        match self {
            Self::Curve(spec) | Self::Chord(spec) => Some(spec),
            Self::Point | Self::Line => None,
        }
    }

    /// Returns a mutable reference to the arc parameters, if any.
    pub fn arc_spec_mut(&mut self) -> Option<&mut ArcSpec> {
        match self {
            Self::Curve(spec) | Self::Chord(spec) => Some(spec),
            Self::Point | Self::Line => None,
        }
    }

    /// Name used in logs and documents.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Line => "line",
            Self::Curve(_) => "curve",
            Self::Chord(_) => "chord",
        }
    }
}

/// Data associated with a map edge.
///
/// An edge connects two distinct vertices. `arc` is derived from the
/// endpoints and the curve's [`ArcSpec`] and is present exactly when
/// `curve` is [`EdgeCurve::Curve`]; the map re-derives it whenever an
/// endpoint moves.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// First endpoint.
    pub v1: VertexId,
    /// Second endpoint.
    pub v2: VertexId,
    /// The curve the edge follows.
    pub curve: EdgeCurve,
    /// Solved arc for curved edges.
    pub arc: Option<Arc>,
}

impl EdgeData {
    /// Returns `true` if `v` is one of the endpoints.
    #[must_use]
    pub fn touches(&self, v: VertexId) -> bool {
        self.v1 == v || self.v2 == v
    }

    /// Returns the endpoint opposite `v`, or `None` if `v` is not an endpoint.
    #[must_use]
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if self.v1 == v {
            Some(self.v2)
        } else if self.v2 == v {
            Some(self.v1)
        } else {
            None
        }
    }

    /// Returns `true` if the edge connects `a` and `b`, in either order.
    #[must_use]
    pub fn connects(&self, a: VertexId, b: VertexId) -> bool {
        (self.v1 == a && self.v2 == b) || (self.v1 == b && self.v2 == a)
    }

    #[must_use]
    pub fn is_line(&self) -> bool {
        matches!(self.curve, EdgeCurve::Line)
    }
}
