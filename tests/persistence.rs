#![allow(clippy::unwrap_used)]

mod common;

use rosace::error::{PersistenceError, RosaceError};
use rosace::io::{self, Mosaic};
use rosace::math::Point2;
use rosace::motif::{Boundary, Extension, Motif, StarParams};
use rosace::topology::{EdgeCurve, Map};

/// Every edge of `a` has a counterpart in `b` between the vertices at the
/// same positions, and the vertex degrees agree.
fn assert_same_graph(a: &Map, b: &Map) {
    assert_eq!(a.vertex_count(), b.vertex_count());
    assert_eq!(a.edge_count(), b.edge_count());
    for (_, v) in a.vertices() {
        let w = b.nearest_vertex(&v.point, 1e-12).unwrap();
        assert_eq!(b.degree(w).unwrap(), v.degree());
    }
    for (_, e) in a.edges() {
        let (p1, p2) = (a.point(e.v1).unwrap(), a.point(e.v2).unwrap());
        let w1 = b.nearest_vertex(&p1, 1e-12).unwrap();
        let w2 = b.nearest_vertex(&p2, 1e-12).unwrap();
        let f = b.find_edge(w1, w2).unwrap();
        assert_eq!(b.edge(f).unwrap().curve, e.curve);
    }
}

#[test]
fn round_trip_keeps_shared_vertices() {
    common::init_tracing();
    let mosaic = Mosaic::from_motif("octagram", &Motif::Star(StarParams::new(8, 3.0, 2))).unwrap();
    let text = io::to_json(&mosaic).unwrap();

    // Each vertex is written inline once; every other endpoint is a reference.
    let map = &mosaic.map;
    let references = text.matches("\"reference\"").count();
    assert_eq!(references, 2 * map.edge_count() - map.vertex_count());

    let back = io::from_json(&text).unwrap();
    assert_same_graph(map, &back.map);
    assert!(back.map.verify().is_ok());
}

#[test]
fn arcs_and_isolated_vertices_survive() {
    let motif = Motif::ExtendedStar {
        star: StarParams::new(6, 2.0, 1),
        extension: Extension::new(Boundary::Circle { radius: 1.5 }).connected(true),
    };
    let mut mosaic = Mosaic::from_motif("hexagram", &motif).unwrap();
    mosaic.map.insert_vertex(Point2::new(4.0, 4.0));

    let back = io::from_json(&io::to_json(&mosaic).unwrap()).unwrap();
    assert_same_graph(&mosaic.map, &back.map);
    let arcs = back
        .map
        .edges()
        .filter(|(_, e)| matches!(e.curve, EdgeCurve::Curve(_)))
        .count();
    assert_eq!(arcs, 6);
    assert_eq!(back.motif, Some(motif));
}

#[test]
fn save_and_load_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rosette.json");
    let mut mosaic = Mosaic::from_motif("pentagram", &Motif::Star(StarParams::new(5, 2.0, 1))).unwrap();
    mosaic.view.width = 640;

    io::save(&path, &mosaic).unwrap();
    let back = io::load(&path).unwrap();
    assert_eq!(back.name, "pentagram");
    assert_eq!(back.view.width, 640);
    assert_same_graph(&mosaic.map, &back.map);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = io::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(
        err,
        RosaceError::Persistence(PersistenceError::Io(_))
    ));
}

#[test]
fn dangling_reference_fails() {
    let text = r#"{
        "version": 1,
        "name": "broken",
        "view": {"width": 10, "height": 10, "zoom": 1.0, "background": [0, 0, 0, 255], "center": [0.0, 0.0]},
        "fill": {"min": [0, 0], "max": [0, 0]},
        "map": {"edges": [
            {"v1": {"reference": 3}, "v2": {"id": 0, "x": 0.0, "y": 0.0}, "shape": {"kind": "line"}}
        ]}
    }"#;
    let err = io::from_json(text).unwrap_err();
    assert!(matches!(
        err,
        RosaceError::Persistence(PersistenceError::ReferenceNotFound(3))
    ));
}

#[test]
fn malformed_json_is_reported() {
    let err = io::from_json("{\"version\": 1,").unwrap_err();
    assert!(matches!(
        err,
        RosaceError::Persistence(PersistenceError::Json(_))
    ));
}
