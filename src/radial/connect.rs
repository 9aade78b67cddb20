use std::f64::consts::TAU;

use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::math::{Point2, Transform, TOLERANCE};
use crate::operations::modification::{Cleanse, CleanseReport, MergeCoincident};
use crate::operations::transform::{GeneralTransform, Scale};
use crate::topology::Map;

use super::{ConnectOptions, Normalization, UnitCopy};

/// What the connect step did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectReport {
    /// Mirrored copies flipped into place.
    pub reflected: usize,
    /// Uniform scale applied about the center.
    pub scale: f64,
    /// Seam vertices merged across copies.
    pub merged: usize,
    pub cleanse: CleanseReport,
}

/// Stitches replicated copies into one map.
///
/// Mirrored copies are reflected about their rotated axis, the whole map
/// is scaled about the center per the normalization, coincident seam
/// vertices are merged (closest pairs first), and the result is cleansed.
pub struct Connect<'a> {
    copies: &'a [UnitCopy],
    center: Point2,
    folds: usize,
    options: ConnectOptions,
}

impl<'a> Connect<'a> {
    /// Creates a new `Connect` operation.
    #[must_use]
    pub fn new(copies: &'a [UnitCopy], center: Point2, folds: usize, options: ConnectOptions) -> Self {
        Self {
            copies,
            center,
            folds,
            options,
        }
    }

    /// Executes the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the normalization target is not positive, the
    /// figure has no extent to normalize, or the final cleanse leaves
    /// defects.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self, map: &mut Map) -> Result<ConnectReport> {
        let step = TAU / self.folds.max(1) as f64;
        let mut reflected = 0;
        for copy in self.copies.iter().filter(|c| c.mirrored) {
            let axis = step * copy.index as f64;
            GeneralTransform::on_vertices(
                copy.vertices.clone(),
                Transform::reflection_about(&self.center, axis),
            )
            .execute(map)?;
            reflected += 1;
        }

        let scale = self.scale_factor(map)?;
        if (scale - 1.0).abs() > TOLERANCE {
            Scale::new(self.center, scale).execute(map)?;
        }

        let tol = self.options.tolerance;
        let merged = MergeCoincident::new(tol).execute(map)?;
        debug!(reflected, scale, merged, "seams merged");
        let cleanse = Cleanse::new(self.options.cleanse_level)
            .with_tolerance(tol)
            .execute(map)?;
        debug!(repairs = cleanse.total(), "connected map cleansed");
        Ok(ConnectReport {
            reflected,
            scale,
            merged,
            cleanse,
        })
    }

    fn scale_factor(&self, map: &Map) -> Result<f64> {
        let (target, measured) = match self.options.normalization {
            Normalization::None => return Ok(1.0),
            Normalization::TipRadius(r) => {
                let reach = map
                    .vertices()
                    .map(|(_, v)| (v.point - self.center).norm())
                    .fold(0.0, f64::max);
                (r, reach)
            }
            Normalization::EdgeLength(len) => {
                let first = self
                    .copies
                    .first()
                    .and_then(|c| c.vertices.get(..2))
                    .map(|pair| -> Result<f64> {
                        Ok((map.point(pair[1])? - map.point(pair[0])?).norm())
                    })
                    .transpose()?
                    .unwrap_or(0.0);
                (len, first)
            }
        };
        if target <= 0.0 {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "normalization",
                value: target,
                min: 0.0,
                max: f64::INFINITY,
            }
            .into());
        }
        if measured < TOLERANCE {
            return Err(GeometryError::Degenerate("nothing to normalize against".into()).into());
        }
        Ok(target / measured)
    }
}
