#![allow(clippy::unwrap_used)]

mod common;

use std::f64::consts::FRAC_PI_2;

use approx::assert_abs_diff_eq;
use rosace::math::{Point2, Vector2};
use rosace::operations::modification::{Cleanse, CleanseLevel, MergeVertices, SplitEdge};
use rosace::operations::query::BoundingBox;
use rosace::operations::transform::{Mirror, Rotate, Translate};
use rosace::topology::{ArcSpec, EdgeCurve, Map};

#[test]
fn merging_coincident_vertices_drops_only_duplicates() {
    let mut map = Map::new();
    let a = map.insert_vertex(Point2::new(0.0, 0.0));
    let b = map.insert_vertex(Point2::new(1.0, 0.0));
    let c = map.insert_vertex(Point2::new(1.0, 1.0));
    let twin = map.insert_vertex(Point2::new(0.0, 0.0));
    map.insert_line(a, b).unwrap();
    map.insert_line(b, c).unwrap();
    map.insert_line(twin, c).unwrap();
    map.insert_line(twin, b).unwrap();

    let discarded = MergeVertices::new(a, twin).execute(&mut map).unwrap();
    assert_eq!(discarded, 1);
    assert_eq!(map.vertex_count(), 3);
    assert_eq!(map.edge_count(), 3);
    assert_eq!(map.degree(a).unwrap(), 2);
    assert!(map.verify().is_ok());
}

#[test]
fn cleanse_tolerance_separates_near_from_far() {
    common::init_tracing();
    let mut map = Map::new();
    let a = map.insert_vertex(Point2::new(0.0, 0.0));
    let near = map.insert_vertex(Point2::new(1e-9, 0.0));
    let far = map.insert_vertex(Point2::new(1.0, 0.0));
    let top = map.insert_vertex(Point2::new(0.5, 1.0));
    map.insert_line(a, top).unwrap();
    map.insert_line(near, far).unwrap();
    map.insert_line(far, top).unwrap();

    let report = Cleanse::new(CleanseLevel::MergeCoincident)
        .with_tolerance(1e-6)
        .execute(&mut map)
        .unwrap();
    assert_eq!(report.vertices_merged, 1);
    assert_eq!(map.vertex_count(), 3);
    assert!(map.contains_vertex(far));
    assert_eq!(map.edge_count(), 3);
}

#[test]
fn edits_leave_a_valid_map() {
    let mut map = Map::new();
    let corners: Vec<_> = [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]
        .into_iter()
        .map(|(x, y)| map.insert_vertex(Point2::new(x, y)))
        .collect();
    let mut sides = Vec::new();
    for i in 0..4 {
        sides.push(map.insert_line(corners[i], corners[(i + 1) % 4]).unwrap());
    }
    // Bow the top side outwards.
    map.remove_edge(sides[2]).unwrap();
    map.insert_edge(
        corners[2],
        corners[3],
        EdgeCurve::Curve(ArcSpec::new(Point2::new(1.0, 1.0), true)),
    )
    .unwrap();
    SplitEdge::new(sides[0], Point2::new(1.0, 0.0))
        .execute(&mut map)
        .unwrap();
    let stray = map.insert_vertex(Point2::new(1.0, 1e-8));
    map.insert_line(stray, corners[2]).unwrap();
    assert!(map.verify().is_err());

    Cleanse::new(CleanseLevel::Verify).execute(&mut map).unwrap();
    assert!(map.verify().is_ok());
    let mid = map.nearest_vertex(&Point2::new(1.0, 0.0), 1e-6).unwrap();
    assert_eq!(map.degree(mid).unwrap(), 3);

    Rotate::new(Point2::new(1.0, 1.0), FRAC_PI_2).execute(&mut map).unwrap();
    Mirror::new(Point2::new(1.0, 1.0), 0.0).execute(&mut map).unwrap();
    Translate::new(Vector2::new(5.0, 0.0)).execute(&mut map).unwrap();
    assert!(map.verify().is_ok());

    // The bowed side now faces left.
    let bounds = BoundingBox::new().execute(&map).unwrap();
    assert_abs_diff_eq!(bounds.min.x, 6.0 - 2f64.sqrt(), epsilon = 1e-9);
    assert_abs_diff_eq!(bounds.max.y, 2.0, epsilon = 1e-9);
}
