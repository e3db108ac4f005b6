//! Outer outline of a floor.

use crate::geometry::Point2;
use crate::plan::graph::PlanGraph;
use crate::topo::NodeId;
use std::collections::{HashMap, HashSet};

impl PlanGraph {
    /// Walk the floor's wall loop and return its corner positions.
    ///
    /// Dead-end nodes are pruned repeatedly first. The walk starts at the
    /// first surviving node and always takes the first unvisited surviving
    /// neighbour, stopping when none is left. `None` when fewer than three
    /// corners remain.
    pub fn floor_polygon(&self) -> Option<Vec<Point2>> {
        let mut adjacency: HashMap<&NodeId, Vec<&NodeId>> =
            self.nodes().iter().map(|n| (&n.id, Vec::new())).collect();
        for wall in self.walls() {
            adjacency.entry(&wall.start_node_id).or_default().push(&wall.end_node_id);
            adjacency.entry(&wall.end_node_id).or_default().push(&wall.start_node_id);
        }

        let mut active: HashSet<&NodeId> = adjacency.keys().copied().collect();
        loop {
            let dead: Vec<&NodeId> = active
                .iter()
                .copied()
                .filter(|id| live_degree(&adjacency, &active, id) < 2)
                .collect();
            if dead.is_empty() {
                break;
            }
            for id in dead {
                active.remove(id);
            }
        }

        if active.len() < 3 {
            return None;
        }

        let start = self.nodes().iter().map(|n| &n.id).find(|id| active.contains(id))?;
        let mut polygon = Vec::new();
        let mut visited: HashSet<&NodeId> = HashSet::new();
        let mut current = start;

        loop {
            visited.insert(current);
            if let Some(pos) = self.node_position(current) {
                polygon.push(pos);
            }

            let next = adjacency
                .get(current)
                .and_then(|neighbors| neighbors.iter().copied().find(|n| active.contains(n) && !visited.contains(n)));
            match next {
                Some(next) => current = next,
                None => break,
            }
        }

        (polygon.len() >= 3).then_some(polygon)
    }

    pub fn is_floor_closed(&self) -> bool {
        self.floor_polygon().is_some()
    }
}

fn live_degree(adjacency: &HashMap<&NodeId, Vec<&NodeId>>, active: &HashSet<&NodeId>, id: &NodeId) -> usize {
    adjacency
        .get(id)
        .map_or(0, |neighbors| neighbors.iter().filter(|n| active.contains(**n)).count())
}
