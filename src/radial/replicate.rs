use std::f64::consts::TAU;

use tracing::trace;

use crate::error::Result;
use crate::math::{Point2, Transform};
use crate::operations::transform::GeneralTransform;
use crate::topology::{Map, VertexId};

/// One placed copy of the unit map.
#[derive(Debug, Clone)]
pub struct UnitCopy {
    /// Rotation index: the copy is turned by `index * 360 / n` degrees.
    pub index: usize,
    /// Whether this is the mirrored partner of the copy with this index.
    pub mirrored: bool,
    /// The copy's vertices, in the unit's insertion order.
    pub vertices: Vec<VertexId>,
}

/// Copies a unit map `folds` times (twice that for reflective units) into a
/// target map, each copy translated to `center` and turned by its share of
/// a full rotation. Nothing is merged; mirrored copies are placed exactly
/// over their partners and flipped later by [`super::Connect`].
pub struct Replicate<'a> {
    unit: &'a Map,
    center: Point2,
    folds: usize,
    reflective: bool,
}

impl<'a> Replicate<'a> {
    /// Creates a new `Replicate` operation.
    #[must_use]
    pub fn new(unit: &'a Map, center: Point2, folds: usize, reflective: bool) -> Self {
        Self {
            unit,
            center,
            folds,
            reflective,
        }
    }

    /// Executes the replication, returning the copies in placement order.
    ///
    /// # Errors
    ///
    /// Returns an error if a copy's arcs cannot be re-solved after moving.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self, target: &mut Map) -> Result<Vec<UnitCopy>> {
        let folds = self.folds.max(1);
        let step = TAU / folds as f64;
        let to_center = Transform::translation(&self.center.coords);
        let order = self.unit.vertex_ids();
        let mirrors: &[bool] = if self.reflective {
            &[false, true]
        } else {
            &[false]
        };

        let mut copies = Vec::with_capacity(folds * mirrors.len());
        for index in 0..folds {
            let place =
                to_center.then(&Transform::rotation_about(&self.center, step * index as f64));
            for &mirrored in mirrors {
                let ids = target.append(self.unit);
                let vertices: Vec<VertexId> =
                    order.iter().filter_map(|v| ids.get(v).copied()).collect();
                GeneralTransform::on_vertices(vertices.clone(), place).execute(target)?;
                trace!(index, mirrored, vertices = vertices.len(), "unit copy placed");
                copies.push(UnitCopy {
                    index,
                    mirrored,
                    vertices,
                });
            }
        }
        Ok(copies)
    }
}
