use serde::{Deserialize, Serialize};

use crate::motif::Motif;
use crate::topology::{ArcSpec, EdgeCurve};

use super::{FillRegion, ViewSettings};

/// Version written by this crate and the only one it reads.
pub(crate) const FORMAT_VERSION: u32 = 1;

/// Just enough of a document to check its version before parsing the rest.
#[derive(Debug, Deserialize)]
pub(crate) struct Header {
    pub version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Document {
    pub version: u32,
    pub name: String,
    pub view: ViewSettings,
    pub fill: FillRegion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motif: Option<Motif>,
    pub map: MapDocument,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct MapDocument {
    pub edges: Vec<EdgeNode>,
    /// Vertices no edge refers to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vertices: Vec<InlineVertex>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct EdgeNode {
    pub v1: VertexNode,
    pub v2: VertexNode,
    pub shape: Shape,
}

/// A vertex written in full the first time, by id afterwards.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum VertexNode {
    Reference { reference: u32 },
    Inline(InlineVertex),
}

impl VertexNode {
    #[must_use]
    pub fn id(&self) -> u32 {
        match self {
            Self::Reference { reference } => *reference,
            Self::Inline(inline) => inline.id,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct InlineVertex {
    pub id: u32,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum Shape {
    Point,
    Line,
    Curve { center: [f64; 2], convex: bool },
    Chord { center: [f64; 2], convex: bool },
}

impl From<&EdgeCurve> for Shape {
    fn from(curve: &EdgeCurve) -> Self {
        match curve {
            EdgeCurve::Point => Self::Point,
            EdgeCurve::Line => Self::Line,
            EdgeCurve::Curve(spec) => Self::Curve {
                center: [spec.center.x, spec.center.y],
                convex: spec.convex,
            },
            EdgeCurve::Chord(spec) => Self::Chord {
                center: [spec.center.x, spec.center.y],
                convex: spec.convex,
            },
        }
    }
}

impl From<Shape> for EdgeCurve {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Point => Self::Point,
            Shape::Line => Self::Line,
            Shape::Curve { center, convex } => Self::Curve(ArcSpec::new(center.into(), convex)),
            Shape::Chord { center, convex } => Self::Chord(ArcSpec::new(center.into(), convex)),
        }
    }
}
