use crate::math::Point2;

use super::neighbours::Neighbours;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in a map.
    pub struct VertexId;
}

/// Data associated with a map vertex.
///
/// Identity is the [`VertexId`], never the coordinates: two coincident
/// vertices stay distinct until they are merged.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The position of the vertex.
    pub point: Point2,
    /// Incident edges sorted by departure angle.
    pub neighbours: Neighbours,
}

impl VertexData {
    /// Creates a new isolated vertex at the given point.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self {
            point,
            neighbours: Neighbours::new(),
        }
    }

    /// Number of incident edges.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.neighbours.len()
    }
}
