use crate::geometry::EPSILON;
use crate::plan::detection::{cycle_signed_area, detect_areas};
use crate::plan::types::{Node, Wall, WallType};
use crate::topo::{NodeId, WallId};
use std::collections::BTreeSet;

fn node(id: &str, x: f64, y: f64) -> Node {
    Node::new(NodeId::from(id), x, y)
}

fn wall(id: &str, a: &str, b: &str) -> Wall {
    Wall::new(WallId::from(id), NodeId::from(a), NodeId::from(b), 20.0, WallType::Wall)
}

fn as_sets(cycles: &[Vec<NodeId>]) -> BTreeSet<BTreeSet<NodeId>> {
    cycles.iter().map(|c| c.iter().cloned().collect()).collect()
}

fn square() -> (Vec<Node>, Vec<Wall>) {
    let nodes = vec![
        node("n1", 0.0, 0.0),
        node("n2", 400.0, 0.0),
        node("n3", 400.0, 400.0),
        node("n4", 0.0, 400.0),
    ];
    let walls = vec![
        wall("w1", "n1", "n2"),
        wall("w2", "n2", "n3"),
        wall("w3", "n3", "n4"),
        wall("w4", "n4", "n1"),
    ];
    (nodes, walls)
}

#[test]
fn test_square_room() {
    let (nodes, walls) = square();
    let areas = detect_areas(&nodes, &walls);

    assert_eq!(areas.len(), 1);
    let ids: Vec<&str> = areas[0].iter().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["n1", "n2", "n3", "n4"]);

    let signed = cycle_signed_area(&areas[0], &nodes);
    assert!(signed > 0.0);
    assert!((signed - 160_000.0).abs() < EPSILON);
}

#[test]
fn test_square_wound_the_other_way() {
    // Same room, walls listed against the drawing order
    let (nodes, _) = square();
    let walls = vec![
        wall("w1", "n2", "n1"),
        wall("w2", "n1", "n4"),
        wall("w3", "n4", "n3"),
        wall("w4", "n3", "n2"),
    ];
    let areas = detect_areas(&nodes, &walls);

    assert_eq!(areas.len(), 1);
    assert!(cycle_signed_area(&areas[0], &nodes) > 0.0);
}

#[test]
fn test_open_v_has_no_area() {
    let nodes = vec![node("a", 0.0, 0.0), node("b", 100.0, 100.0), node("c", 200.0, 0.0)];
    let walls = vec![wall("w1", "a", "b"), wall("w2", "b", "c")];
    assert!(detect_areas(&nodes, &walls).is_empty());
}

#[test]
fn test_too_small_inputs() {
    let nodes = vec![node("a", 0.0, 0.0), node("b", 100.0, 0.0)];
    let walls = vec![wall("w1", "a", "b")];
    assert!(detect_areas(&nodes, &walls).is_empty());
    assert!(detect_areas(&[], &[]).is_empty());
}

#[test]
fn test_two_rooms_sharing_a_wall() {
    let nodes = vec![
        node("a", 0.0, 0.0),
        node("b", 400.0, 0.0),
        node("c", 800.0, 0.0),
        node("d", 800.0, 400.0),
        node("e", 400.0, 400.0),
        node("f", 0.0, 400.0),
    ];
    let walls = vec![
        wall("w1", "a", "b"),
        wall("w2", "b", "c"),
        wall("w3", "c", "d"),
        wall("w4", "d", "e"),
        wall("w5", "e", "f"),
        wall("w6", "f", "a"),
        wall("w7", "b", "e"),
    ];

    let areas = detect_areas(&nodes, &walls);
    assert_eq!(areas.len(), 2);

    let expected: BTreeSet<BTreeSet<NodeId>> = [
        ["a", "b", "e", "f"].iter().map(|s| NodeId::from(*s)).collect(),
        ["b", "c", "d", "e"].iter().map(|s| NodeId::from(*s)).collect(),
    ]
    .into_iter()
    .collect();
    assert_eq!(as_sets(&areas), expected);

    let total: f64 = areas.iter().map(|a| cycle_signed_area(a, &nodes)).sum();
    assert!((total - 320_000.0).abs() < EPSILON);
}

#[test]
fn test_doors_and_windows_close_rooms() {
    let (nodes, mut walls) = square();
    walls[1].wall_type = WallType::Door;
    walls[3].wall_type = WallType::Window;
    assert_eq!(detect_areas(&nodes, &walls).len(), 1);
}

#[test]
fn test_dangling_spur_outside_is_ignored() {
    let (mut nodes, mut walls) = square();
    nodes.push(node("spur", -200.0, -200.0));
    walls.push(wall("w5", "n1", "spur"));

    let areas = detect_areas(&nodes, &walls);
    assert_eq!(areas.len(), 1);
    assert!(!areas[0].contains(&NodeId::from("spur")));
}

#[test]
fn test_spur_into_a_room_dead_ends_its_trace() {
    // The room boundary runs into the spur and back, whichever wall starts it
    let (nodes, walls) = spur_into_room();
    for order in wall_orders(&walls) {
        assert!(detect_areas(&nodes, &order).is_empty());
    }
}

#[test]
fn test_bow_tie_yields_two_simple_rooms() {
    // Two triangles touching at one corner
    let nodes = vec![
        node("m", 200.0, 200.0),
        node("a", 0.0, 0.0),
        node("b", 0.0, 400.0),
        node("c", 400.0, 0.0),
        node("d", 400.0, 400.0),
    ];
    let walls = vec![
        wall("w1", "a", "m"),
        wall("w2", "m", "b"),
        wall("w3", "b", "a"),
        wall("w4", "c", "m"),
        wall("w5", "m", "d"),
        wall("w6", "d", "c"),
    ];

    let areas = detect_areas(&nodes, &walls);
    assert_eq!(areas.len(), 2);
    for area in &areas {
        assert_eq!(area.len(), 3);
        let distinct: BTreeSet<&NodeId> = area.iter().collect();
        assert_eq!(distinct.len(), area.len(), "trace revisited a node");
        assert!(cycle_signed_area(area, &nodes) > 0.0);
    }
}

#[test]
fn test_missing_endpoint_and_degenerate_walls_are_ignored() {
    let (nodes, mut walls) = square();
    walls.push(wall("ghost", "n1", "nowhere"));
    walls.push(wall("loop", "n2", "n2"));

    let areas = detect_areas(&nodes, &walls);
    assert_eq!(areas.len(), 1);
}

fn spur_into_room() -> (Vec<Node>, Vec<Wall>) {
    let (mut nodes, mut walls) = square();
    nodes.push(node("spur", 200.0, 200.0));
    walls.push(wall("w5", "n1", "spur"));
    (nodes, walls)
}

fn room_with_bridged_pillar() -> (Vec<Node>, Vec<Wall>) {
    let (mut nodes, mut walls) = square();
    nodes.extend([
        node("p1", 150.0, 150.0),
        node("p2", 250.0, 150.0),
        node("p3", 250.0, 250.0),
        node("p4", 150.0, 250.0),
    ]);
    walls.extend([
        wall("q1", "p1", "p2"),
        wall("q2", "p2", "p3"),
        wall("q3", "p3", "p4"),
        wall("q4", "p4", "p1"),
        wall("bridge", "n1", "p1"),
    ]);
    (nodes, walls)
}

/// Every rotation of the wall list, forwards and reversed.
fn wall_orders(walls: &[Wall]) -> Vec<Vec<Wall>> {
    let mut orders = Vec::new();
    for k in 0..walls.len() {
        let mut rotated = walls.to_vec();
        rotated.rotate_left(k);
        let mut reversed = rotated.clone();
        reversed.reverse();
        orders.push(rotated);
        orders.push(reversed);
    }
    orders
}

#[test]
fn test_detection_is_deterministic() {
    let (nodes, walls) = square();
    let first = detect_areas(&nodes, &walls);
    let second = detect_areas(&nodes, &walls);
    assert_eq!(first, second);

    // Wall order changes which half-edge reports a face, not the faces
    for graph in [square(), spur_into_room(), room_with_bridged_pillar()] {
        let (nodes, walls) = graph;
        let expected = as_sets(&detect_areas(&nodes, &walls));
        for order in wall_orders(&walls) {
            assert_eq!(as_sets(&detect_areas(&nodes, &order)), expected);
        }
    }
}

#[test]
fn test_bridged_pillar_keeps_only_the_pillar() {
    // The room boundary runs across the bridge twice, so it is not simple
    let (nodes, walls) = room_with_bridged_pillar();
    for order in wall_orders(&walls) {
        let areas = detect_areas(&nodes, &order);
        assert_eq!(areas.len(), 1);
        let pillar: BTreeSet<NodeId> = ["p1", "p2", "p3", "p4"].iter().map(|s| NodeId::from(*s)).collect();
        assert_eq!(as_sets(&areas), [pillar].into_iter().collect());
    }
}

#[test]
fn test_every_area_is_closed_and_positive() {
    let nodes = vec![
        node("a", 0.0, 0.0),
        node("b", 300.0, 0.0),
        node("c", 600.0, 0.0),
        node("d", 600.0, 300.0),
        node("e", 300.0, 300.0),
        node("f", 0.0, 300.0),
        node("g", 300.0, 600.0),
        node("h", 0.0, 600.0),
    ];
    let walls = vec![
        wall("w1", "a", "b"),
        wall("w2", "b", "c"),
        wall("w3", "c", "d"),
        wall("w4", "d", "e"),
        wall("w5", "e", "f"),
        wall("w6", "f", "a"),
        wall("w7", "b", "e"),
        wall("w8", "e", "g"),
        wall("w9", "g", "h"),
        wall("w10", "h", "f"),
    ];

    let areas = detect_areas(&nodes, &walls);
    assert_eq!(areas.len(), 3);
    for area in &areas {
        assert!(area.len() >= 3);
        assert!(area.iter().all(|id| nodes.iter().any(|n| &n.id == id)));
        assert!(cycle_signed_area(area, &nodes) > 0.0);
    }
}
