mod extension;
mod irregular;
mod petal;
mod rosette;
mod star;
mod star2;

pub use extension::{Boundary, Extension};
pub use irregular::IrregularParams;
pub use petal::PetalStrategy;
pub use rosette::RosetteParams;
pub use star::{StarParams, StarStrategy};
pub use star2::Star2Params;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ConstructionError, Result, RosaceError, Side};
use crate::math::Point2;
use crate::topology::Map;

/// Distance kept from the open ends of every clamped parameter range.
pub(crate) const CLAMP_MARGIN: f64 = 0.01;

/// The construction path a unit was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Star(StarStrategy),
    Petal(PetalStrategy),
    /// Chords between the edge midpoints of an irregular tile.
    Inferred,
}

/// The single-wedge geometry of a motif, before replication.
///
/// Reflective families are a chain that starts at the tip on the positive
/// x axis and runs into `y >= 0`; it is copied `2n` times, every second
/// copy reflected.
#[derive(Debug, Clone)]
pub struct UnitMotif {
    /// The unit map, in unit-radius wedge-local coordinates.
    pub map: Map,
    /// Branch points of the unit chain, tip excluded, in chain order.
    pub branch_points: Vec<Point2>,
    pub strategy: Strategy,
    /// Number of rotated copies to make (1 for irregular stars).
    pub folds: usize,
    /// Whether every copy has a mirrored partner.
    pub reflective: bool,
}

/// A motif recipe. Parameters are clamped with [`Motif::clamped`] before
/// anything is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Motif {
    Star(StarParams),
    Rosette(RosetteParams),
    Star2(Star2Params),
    IrregularStar(IrregularParams),
    ExtendedStar {
        star: StarParams,
        extension: Extension,
    },
    ExtendedRosette {
        rosette: RosetteParams,
        extension: Extension,
    },
}

impl Motif {
    /// Short family name used in logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Star(_) => "star",
            Self::Rosette(_) => "rosette",
            Self::Star2(_) => "star2",
            Self::IrregularStar(_) => "irregular star",
            Self::ExtendedStar { .. } => "extended star",
            Self::ExtendedRosette { .. } => "extended rosette",
        }
    }

    /// Returns a copy with every parameter clamped to its valid range.
    #[must_use]
    pub fn clamped(&self) -> Self {
        match self {
            Self::Star(p) => Self::Star(p.clamped()),
            Self::Rosette(p) => Self::Rosette(p.clamped()),
            Self::Star2(p) => Self::Star2(p.clamped()),
            Self::IrregularStar(p) => Self::IrregularStar(p.clamped()),
            Self::ExtendedStar { star, extension } => Self::ExtendedStar {
                star: star.clamped(),
                extension: extension.clone(),
            },
            Self::ExtendedRosette { rosette, extension } => Self::ExtendedRosette {
                rosette: rosette.clamped(),
                extension: extension.clone(),
            },
        }
    }

    /// Number of rotated copies the figure is made of.
    #[must_use]
    pub fn folds(&self) -> usize {
        match self {
            Self::Star(p) | Self::ExtendedStar { star: p, .. } => p.n,
            Self::Rosette(p) | Self::ExtendedRosette { rosette: p, .. } => p.n,
            Self::Star2(p) => p.n,
            Self::IrregularStar(_) => 1,
        }
    }

    /// Whether the family is built from a half-wedge and its mirror image.
    #[must_use]
    pub fn is_reflective(&self) -> bool {
        !matches!(self, Self::IrregularStar(_))
    }

    /// The final-stage extension, for extended families.
    #[must_use]
    pub fn extension(&self) -> Option<&Extension> {
        match self {
            Self::ExtendedStar { extension, .. } | Self::ExtendedRosette { extension, .. } => {
                Some(extension)
            }
            _ => None,
        }
    }

    /// Builds the unit geometry of the motif.
    ///
    /// Parameters are expected to be clamped already; out-of-range values
    /// are clamped again here so the construction never sees them.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::Degenerate`] if a required branch point
    /// cannot be located.
    pub fn build_unit(&self) -> Result<UnitMotif> {
        let name = self.name();
        let (points, strategy) = match self.clamped() {
            Self::Star(p) | Self::ExtendedStar { star: p, .. } => p.chain(name)?,
            Self::Rosette(p) | Self::ExtendedRosette { rosette: p, .. } => p.chain(name)?,
            Self::Star2(p) => p.chain(name)?,
            Self::IrregularStar(p) => {
                let map = p.build(name)?;
                debug!(motif = name, vertices = map.vertex_count(), "irregular unit built");
                return Ok(UnitMotif {
                    map,
                    branch_points: Vec::new(),
                    strategy: Strategy::Inferred,
                    folds: 1,
                    reflective: false,
                });
            }
        };
        debug!(motif = name, ?strategy, branches = points.len() - 1, "unit built");
        let map = chain_map(&points)?;
        Ok(UnitMotif {
            map,
            branch_points: points[1..].to_vec(),
            strategy,
            folds: self.folds(),
            reflective: true,
        })
    }
}

/// Builds a map holding one straight edge between consecutive points.
pub(crate) fn chain_map(points: &[Point2]) -> Result<Map> {
    let mut map = Map::new();
    let mut prev = None;
    for &p in points {
        let v = map.insert_vertex(p);
        if let Some(u) = prev {
            map.insert_line(u, v)?;
        }
        prev = Some(v);
    }
    Ok(map)
}

/// Logs and returns a degenerate-construction error.
pub(crate) fn degenerate(motif: &'static str, branch: usize, side: Side) -> RosaceError {
    error!(motif, branch, %side, "branch point could not be located");
    ConstructionError::Degenerate {
        motif,
        branch,
        side,
    }
    .into()
}

/// Snaps values within [`CLAMP_MARGIN`] of an integer onto it.
pub(crate) fn snap(value: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() < CLAMP_MARGIN {
        rounded
    } else {
        value
    }
}

/// The point at `fraction` of a full turn on the unit circle.
pub(crate) fn tip(fraction: f64) -> Point2 {
    let angle = fraction * std::f64::consts::TAU;
    Point2::new(angle.cos(), angle.sin())
}
