//! Area detection for the wall graph.
//!
//! Computes enclosed rooms from nodes and walls by:
//! 1. Building an undirected adjacency map from every wall (doors and windows included)
//! 2. Tracing one face per unvisited directed half-edge, always taking the
//!    most clockwise turn relative to the edge just walked, until the first
//!    half-edge comes round again
//! 3. Rejecting boundaries that dead-end or revisit a node
//! 4. Keeping boundaries of 3+ nodes whose signed area is positive
//!    (the unbounded outer face traces negative)
//!
//! Every half-edge of a face yields the same boundary, so the verdict does
//! not depend on where a trace starts. Nodes are never pruned here; outline
//! extraction does its own pruning.

use crate::geometry::utils_2d::polygon_signed_area;
use crate::geometry::{Point2, EPSILON};
use crate::plan::types::{Node, Wall};
use crate::topo::NodeId;
use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;
use tracing::{debug, warn};

/// Find all closed areas as ordered node-id cycles.
///
/// Returns an empty list for graphs with fewer than 3 nodes or 3 walls.
/// Walls that reference unknown nodes, and degenerate walls, are ignored.
pub fn detect_areas(nodes: &[Node], walls: &[Wall]) -> Vec<Vec<NodeId>> {
    if nodes.len() < 3 || walls.len() < 3 {
        return Vec::new();
    }

    let positions: HashMap<&NodeId, Point2> = nodes.iter().map(|n| (&n.id, n.position())).collect();

    // 1. Adjacency, in wall order so traces are reproducible
    let mut adjacency: HashMap<&NodeId, Vec<&NodeId>> = nodes.iter().map(|n| (&n.id, Vec::new())).collect();
    let mut live_walls: Vec<&Wall> = Vec::with_capacity(walls.len());
    for wall in walls {
        if wall.is_degenerate() {
            warn!(wall = %wall.id, "Skipping degenerate wall during area detection");
            continue;
        }
        if !positions.contains_key(&wall.start_node_id) || !positions.contains_key(&wall.end_node_id) {
            warn!(wall = %wall.id, "Skipping wall with a missing endpoint during area detection");
            continue;
        }
        if let Some(list) = adjacency.get_mut(&wall.start_node_id) {
            list.push(&wall.end_node_id);
        }
        if let Some(list) = adjacency.get_mut(&wall.end_node_id) {
            list.push(&wall.start_node_id);
        }
        live_walls.push(wall);
    }

    let half_edges = 2 * live_walls.len();
    let graph = FaceGraph {
        positions,
        adjacency,
        half_edges,
    };
    let mut visited: HashSet<(&NodeId, &NodeId)> = HashSet::new();
    let mut areas = Vec::new();

    // 2. Trace from every half-edge
    for wall in live_walls.iter().copied() {
        let directions = [
            (&wall.start_node_id, &wall.end_node_id),
            (&wall.end_node_id, &wall.start_node_id),
        ];

        for (start, next) in directions {
            if visited.contains(&(start, next)) {
                continue;
            }

            let Some(cycle) = graph.trace_face(start, next, &mut visited) else {
                continue;
            };

            // 4. Inner faces only
            if cycle.len() >= 3 && graph.signed_area(&cycle) > EPSILON {
                areas.push(cycle.into_iter().cloned().collect());
            }
        }
    }

    debug!(nodes = nodes.len(), walls = walls.len(), areas = areas.len(), "Area detection pass");
    areas
}

/// Borrowed view of the wall graph used while tracing.
struct FaceGraph<'a> {
    positions: HashMap<&'a NodeId, Point2>,
    adjacency: HashMap<&'a NodeId, Vec<&'a NodeId>>,
    half_edges: usize,
}

impl<'a> FaceGraph<'a> {
    /// Walk the face bounded by the half-edge `start -> first`.
    ///
    /// The walk turns back at dead ends and stops once `start -> first` comes
    /// round again, marking every half-edge it crosses. The boundary is
    /// returned (without repeating `start`) only when it is simple: a dead
    /// end or a node met twice rejects the whole face.
    fn trace_face(
        &self,
        start: &'a NodeId,
        first: &'a NodeId,
        visited: &mut HashSet<(&'a NodeId, &'a NodeId)>,
    ) -> Option<Vec<&'a NodeId>> {
        let mut boundary = Vec::new();
        let mut dead_end = false;
        let mut current = start;
        let mut next = first;

        loop {
            visited.insert((current, next));
            boundary.push(current);
            if boundary.len() > self.half_edges {
                warn!(node = %start, "Face trace did not close");
                return None;
            }

            let neighbors = self.adjacency.get(next)?;
            if neighbors.len() < 2 {
                dead_end = true;
            }
            let turn = self.most_clockwise_neighbor(current, next, neighbors)?;

            current = next;
            next = turn;
            if current == start && next == first {
                break;
            }
        }

        if dead_end {
            debug!(node = %start, "Rejecting face with a dead end");
            return None;
        }
        let distinct: HashSet<&NodeId> = boundary.iter().copied().collect();
        if distinct.len() != boundary.len() {
            debug!(node = %start, "Rejecting non-simple face");
            return None;
        }
        Some(boundary)
    }

    /// Pick the neighbor with the smallest clockwise rotation from the
    /// reversed incoming direction. Walking back to `prev` only happens when
    /// it is the sole option.
    fn most_clockwise_neighbor(
        &self,
        prev: &'a NodeId,
        current: &'a NodeId,
        neighbors: &[&'a NodeId],
    ) -> Option<&'a NodeId> {
        let curr_pos = self.positions.get(current)?;
        let prev_pos = self.positions.get(prev)?;
        let base_angle = (prev_pos[1] - curr_pos[1]).atan2(prev_pos[0] - curr_pos[0]);

        let mut best = neighbors.first().copied();
        let mut min_diff = TAU;

        for &candidate in neighbors {
            if candidate == prev {
                continue;
            }
            let Some(pos) = self.positions.get(candidate) else {
                continue;
            };
            let angle = (pos[1] - curr_pos[1]).atan2(pos[0] - curr_pos[0]);
            let diff = normalize_turn(base_angle - angle);

            if diff < min_diff {
                min_diff = diff;
                best = Some(candidate);
            }
        }

        best
    }

    fn signed_area(&self, cycle: &[&NodeId]) -> f64 {
        let points: Vec<Point2> = cycle.iter().filter_map(|id| self.positions.get(*id).copied()).collect();
        polygon_signed_area(&points)
    }
}

/// Wrap an angle difference into (0, 2π].
fn normalize_turn(mut diff: f64) -> f64 {
    while diff <= 0.0 {
        diff += TAU;
    }
    while diff > TAU {
        diff -= TAU;
    }
    diff
}

/// Signed area of an ordered node cycle, skipping ids with no node.
pub fn cycle_signed_area(cycle: &[NodeId], nodes: &[Node]) -> f64 {
    let positions: HashMap<&NodeId, Point2> = nodes.iter().map(|n| (&n.id, n.position())).collect();
    let points: Vec<Point2> = cycle.iter().filter_map(|id| positions.get(id).copied()).collect();
    polygon_signed_area(&points)
}
