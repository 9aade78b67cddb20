use crate::math::Aabb;
use crate::topology::Map;

/// Computes the axis-aligned bounding box of a map.
///
/// Curved edges contribute their tight arc bounds, so a bulging arc is
/// covered even where it leaves the hull of the vertices.
#[derive(Debug, Default)]
pub struct BoundingBox;

impl BoundingBox {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the query, returning `None` for an empty map.
    #[must_use]
    pub fn execute(&self, map: &Map) -> Option<Aabb> {
        let mut aabb = Aabb::from_points(map.vertices().map(|(_, v)| &v.point))?;
        for (_, e) in map.edges() {
            if let Some(arc) = &e.arc {
                aabb.union(&arc.tight_bounds());
            }
        }
        Some(aabb)
    }
}
