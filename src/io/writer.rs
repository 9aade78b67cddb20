use std::collections::HashMap;

use tracing::debug;

use crate::error::Result;
use crate::topology::{Map, VertexId};

use super::document::{
    Document, EdgeNode, InlineVertex, MapDocument, Shape, VertexNode, FORMAT_VERSION,
};
use super::Mosaic;

/// Assigns document ids to vertices in the order they are first written.
#[derive(Default)]
struct IdTable {
    ids: HashMap<VertexId, u32>,
    next: u32,
}

impl IdTable {
    fn node(&mut self, map: &Map, v: VertexId) -> Result<VertexNode> {
        if let Some(&reference) = self.ids.get(&v) {
            return Ok(VertexNode::Reference { reference });
        }
        Ok(VertexNode::Inline(self.define(map, v)?))
    }

    fn define(&mut self, map: &Map, v: VertexId) -> Result<InlineVertex> {
        let p = map.point(v)?;
        let id = self.next;
        self.next += 1;
        self.ids.insert(v, id);
        Ok(InlineVertex { id, x: p.x, y: p.y })
    }
}

/// Flattens a mosaic into its document form. The map is verified first so
/// an invalid graph never reaches a file.
pub(crate) fn to_document(mosaic: &Mosaic) -> Result<Document> {
    mosaic.map.verify()?;
    Ok(Document {
        version: FORMAT_VERSION,
        name: mosaic.name.clone(),
        view: mosaic.view,
        fill: mosaic.fill,
        motif: mosaic.motif.clone(),
        map: map_document(&mosaic.map)?,
    })
}

fn map_document(map: &Map) -> Result<MapDocument> {
    let mut table = IdTable::default();
    let mut doc = MapDocument::default();
    for (_, e) in map.edges() {
        let v1 = table.node(map, e.v1)?;
        let v2 = table.node(map, e.v2)?;
        doc.edges.push(EdgeNode {
            v1,
            v2,
            shape: Shape::from(&e.curve),
        });
    }
    for v in map.vertex_ids() {
        if !table.ids.contains_key(&v) {
            doc.vertices.push(table.define(map, v)?);
        }
    }
    debug!(
        edges = doc.edges.len(),
        isolated = doc.vertices.len(),
        vertices = table.next,
        "map flattened"
    );
    Ok(doc)
}
