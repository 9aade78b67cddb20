use std::collections::HashMap;

use tracing::debug;

use crate::error::{PersistenceError, Result};
use crate::math::{Point2, MERGE_TOLERANCE};
use crate::topology::{Map, VertexId};

use super::document::{Document, InlineVertex, MapDocument, VertexNode};
use super::Mosaic;

/// Resolves document ids to the vertices built for them. Lives for one
/// parse only.
#[derive(Default)]
struct Resolver {
    table: HashMap<u32, VertexId>,
}

impl Resolver {
    fn resolve(&mut self, map: &mut Map, node: &VertexNode) -> Result<VertexId> {
        match node {
            VertexNode::Reference { reference } => self
                .table
                .get(reference)
                .copied()
                .ok_or_else(|| PersistenceError::ReferenceNotFound(*reference).into()),
            VertexNode::Inline(inline) => self.define(map, inline),
        }
    }

    fn define(&mut self, map: &mut Map, inline: &InlineVertex) -> Result<VertexId> {
        if self.table.contains_key(&inline.id) {
            return Err(PersistenceError::DuplicateId(inline.id).into());
        }
        let v = map.insert_vertex(Point2::new(inline.x, inline.y));
        self.table.insert(inline.id, v);
        Ok(v)
    }
}

/// Rebuilds a mosaic from its document form.
pub(crate) fn from_document(doc: Document) -> Result<Mosaic> {
    let map = read_map(&doc.map)?;
    Ok(Mosaic {
        name: doc.name,
        view: doc.view,
        fill: doc.fill,
        motif: doc.motif,
        map,
    })
}

fn read_map(doc: &MapDocument) -> Result<Map> {
    let mut map = Map::with_tolerance(MERGE_TOLERANCE);
    let mut resolver = Resolver::default();
    for edge in &doc.edges {
        let v1 = resolver.resolve(&mut map, &edge.v1)?;
        let v2 = resolver.resolve(&mut map, &edge.v2)?;
        if map.find_edge(v1, v2).is_some() {
            return Err(PersistenceError::DuplicateEdge(edge.v1.id(), edge.v2.id()).into());
        }
        map.insert_edge(v1, v2, edge.shape.into())?;
    }
    for inline in &doc.vertices {
        resolver.define(&mut map, inline)?;
    }
    debug!(
        vertices = map.vertex_count(),
        edges = map.edge_count(),
        "map resolved"
    );
    Ok(map)
}
