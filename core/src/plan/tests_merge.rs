use crate::plan::detection::cycle_signed_area;
use crate::plan::graph::PlanGraph;
use crate::plan::types::WallType;
use crate::topo::{AreaId, IdGenerator, NodeId};

enum Corner {
    At(f64, f64),
    Existing(NodeId),
}

/// Draw a closed ring through `corners`, creating any corner given as a
/// position and reusing any given as an id.
fn ring(graph: &mut PlanGraph, corners: Vec<Corner>) -> Vec<NodeId> {
    let ids: Vec<NodeId> = corners
        .into_iter()
        .map(|c| match c {
            Corner::At(x, y) => graph.add_node(x, y),
            Corner::Existing(id) => id,
        })
        .collect();
    for i in 0..ids.len() {
        let next = &ids[(i + 1) % ids.len()];
        if graph.wall_between(&ids[i], next).is_none() {
            graph.add_wall(&ids[i], next, WallType::Wall).expect("ring wall");
        }
    }
    ids
}

fn rect(x: f64, y: f64, w: f64, h: f64) -> Vec<Corner> {
    vec![
        Corner::At(x, y),
        Corner::At(x + w, y),
        Corner::At(x + w, y + h),
        Corner::At(x, y + h),
    ]
}

fn area_with(graph: &PlanGraph, node: &NodeId) -> AreaId {
    graph
        .areas()
        .iter()
        .find(|a| a.node_ids.contains(node))
        .map(|a| a.id.clone())
        .expect("area containing node")
}

fn total_area(graph: &PlanGraph) -> f64 {
    graph
        .areas()
        .iter()
        .map(|a| cycle_signed_area(&a.node_ids, graph.nodes()))
        .sum()
}

#[test]
fn test_merge_rooms_sharing_a_wall() {
    let mut graph = PlanGraph::with_ids(IdGenerator::new("merge"));
    let left = ring(&mut graph, rect(0.0, 0.0, 400.0, 400.0));
    let right = ring(
        &mut graph,
        vec![
            Corner::Existing(left[1].clone()),
            Corner::At(800.0, 0.0),
            Corner::At(800.0, 400.0),
            Corner::Existing(left[2].clone()),
        ],
    );
    assert_eq!(graph.areas().len(), 2);

    let a = area_with(&graph, &left[0]);
    let b = area_with(&graph, &right[1]);
    assert_eq!(graph.find_mergeable_areas(&a), vec![b.clone()]);

    let report = graph.merge_areas(&a, &b).expect("both areas exist");

    assert_eq!(report.walls_split, 0);
    assert_eq!(report.nodes_merged, 0);
    assert_eq!(report.walls_removed, 1);
    assert_eq!(report.created.len(), 1);

    assert_eq!(graph.areas().len(), 1);
    let merged = &graph.areas()[0];
    assert!(merged.id != a && merged.id != b);
    assert_eq!(merged.node_ids.len(), 6);
    assert!((cycle_signed_area(&merged.node_ids, graph.nodes()) - 320_000.0).abs() < 1e-6);
    assert!(graph.wall_between(&left[1], &left[2]).is_none());
}

#[test]
fn test_merge_rooms_drawn_with_their_own_corners() {
    let mut graph = PlanGraph::with_ids(IdGenerator::new("merge"));
    let left = ring(&mut graph, rect(0.0, 0.0, 400.0, 400.0));
    let right = ring(&mut graph, rect(400.0, 0.0, 400.0, 400.0));
    let side = ring(
        &mut graph,
        vec![
            Corner::Existing(right[1].clone()),
            Corner::At(1200.0, 0.0),
            Corner::At(1200.0, 400.0),
            Corner::Existing(right[2].clone()),
        ],
    );
    assert_eq!(graph.areas().len(), 3);
    assert_eq!(graph.nodes().len(), 10);

    let a = area_with(&graph, &left[0]);
    let b = area_with(&graph, &right[0]);
    let c = area_with(&graph, &side[1]);

    let report = graph.merge_areas(&a, &b).expect("both areas exist");

    // Two coincident corner pairs collapse onto the left room's corners
    assert_eq!(report.nodes_merged, 2);
    assert!(graph.node(&right[0]).is_none());
    assert!(graph.node(&right[3]).is_none());
    assert_eq!(graph.nodes().len(), 8);

    // The duplicate right/left wall and then the shared side are gone
    assert_eq!(report.walls_removed, 2);
    assert!(graph.wall_between(&left[1], &left[2]).is_none());

    assert_eq!(graph.areas().len(), 2);
    assert!(graph.area(&a).is_none());
    assert!(graph.area(&b).is_none());
    assert!(graph.area(&c).is_some(), "neighbouring room keeps its identity");

    let merged = graph.areas().iter().find(|x| x.id != c).expect("merged area");
    assert!((cycle_signed_area(&merged.node_ids, graph.nodes()) - 320_000.0).abs() < 1e-6);
}

#[test]
fn test_merge_overlapping_rooms_splits_at_crossings() {
    let mut graph = PlanGraph::with_ids(IdGenerator::new("merge"));
    let square = ring(&mut graph, rect(0.0, 0.0, 400.0, 400.0));
    let bar = ring(&mut graph, rect(300.0, 100.0, 400.0, 200.0));

    let a = area_with(&graph, &square[0]);
    let b = area_with(&graph, &bar[1]);
    assert!(graph.find_mergeable_areas(&a).contains(&b));

    let report = graph.merge_areas(&a, &b).expect("both areas exist");

    assert_eq!(report.intersections, 2);
    assert_eq!(report.walls_split, 4);
    assert!(graph.find_nearby_node(400.0, 100.0, 1.0).is_some());
    assert!(graph.find_nearby_node(400.0, 300.0, 1.0).is_some());

    assert!(graph.area(&a).is_none());
    assert!(graph.area(&b).is_none());

    // Union of both footprints, no double counting of the overlap
    assert_eq!(graph.areas().len(), 2);
    assert!((total_area(&graph) - 220_000.0).abs() < 1e-6);
}

#[test]
fn test_merge_with_unknown_area_is_a_noop() {
    let mut graph = PlanGraph::with_ids(IdGenerator::new("merge"));
    let square = ring(&mut graph, rect(0.0, 0.0, 400.0, 400.0));
    let a = area_with(&graph, &square[0]);
    let walls_before = graph.walls().to_vec();

    assert!(graph.merge_areas(&a, &AreaId::from("missing")).is_none());
    assert!(graph.merge_areas(&a, &a).is_none());

    assert_eq!(graph.walls(), walls_before.as_slice());
    assert!(graph.area(&a).is_some());
}

#[test]
fn test_distant_rooms_are_not_mergeable() {
    let mut graph = PlanGraph::with_ids(IdGenerator::new("merge"));
    let first = ring(&mut graph, rect(0.0, 0.0, 400.0, 400.0));
    let second = ring(&mut graph, rect(1000.0, 0.0, 400.0, 400.0));

    let a = area_with(&graph, &first[0]);
    let b = area_with(&graph, &second[0]);

    assert!(graph.find_mergeable_areas(&a).is_empty());
    assert!(graph.find_mergeable_areas(&b).is_empty());
    assert!(graph.find_mergeable_areas(&AreaId::from("missing")).is_empty());
}
