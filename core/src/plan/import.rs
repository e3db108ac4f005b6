//! Loading node/wall data produced outside the editor.
//!
//! Every entry is validated on its own. Bad entries are logged and skipped;
//! the rest of the document still loads.

use crate::plan::graph::PlanGraph;
use crate::plan::types::{Node, Wall};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{info, warn};

/// Counts of accepted and rejected entries from one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub nodes_added: usize,
    pub nodes_skipped: usize,
    pub walls_added: usize,
    pub walls_skipped: usize,
    pub areas_detected: usize,
}

impl PlanGraph {
    /// Append `{ "nodes": [...], "walls": [...] }` to the graph and detect
    /// areas once at the end.
    pub fn import_json(&mut self, document: &Value) -> ImportReport {
        let mut report = ImportReport::default();

        let mut node_ids: HashSet<_> = self.nodes().iter().map(|n| n.id.clone()).collect();
        for entry in entries(document, "nodes") {
            let node = match Node::deserialize(entry) {
                Ok(node) if node.x.is_finite() && node.y.is_finite() => node,
                Ok(node) => {
                    warn!(node = %node.id, "import: non-finite coordinates");
                    report.nodes_skipped += 1;
                    continue;
                }
                Err(err) => {
                    warn!(%err, "import: malformed node");
                    report.nodes_skipped += 1;
                    continue;
                }
            };
            if !node_ids.insert(node.id.clone()) {
                warn!(node = %node.id, "import: duplicate node id");
                report.nodes_skipped += 1;
                continue;
            }
            self.push_node(node);
            report.nodes_added += 1;
        }

        let mut wall_ids: HashSet<_> = self.walls().iter().map(|w| w.id.clone()).collect();
        let mut pairs: HashSet<_> = self.walls().iter().map(Wall::pair_key).collect();
        for entry in entries(document, "walls") {
            let wall = match Wall::deserialize(entry) {
                Ok(wall) => wall,
                Err(err) => {
                    warn!(%err, "import: malformed wall");
                    report.walls_skipped += 1;
                    continue;
                }
            };

            let reason = if wall.is_degenerate() {
                Some("degenerate wall")
            } else if !node_ids.contains(&wall.start_node_id) || !node_ids.contains(&wall.end_node_id) {
                Some("unknown endpoint")
            } else if wall_ids.contains(&wall.id) {
                Some("duplicate wall id")
            } else if pairs.contains(&wall.pair_key()) {
                Some("duplicate node pair")
            } else {
                None
            };
            if let Some(reason) = reason {
                warn!(wall = %wall.id, reason, "import: skipping wall");
                report.walls_skipped += 1;
                continue;
            }

            wall_ids.insert(wall.id.clone());
            pairs.insert(wall.pair_key());
            self.push_wall(wall);
            report.walls_added += 1;
        }

        self.recalculate_areas();
        report.areas_detected = self.areas().len();

        info!(
            nodes = report.nodes_added,
            walls = report.walls_added,
            skipped = report.nodes_skipped + report.walls_skipped,
            areas = report.areas_detected,
            "Imported plan data"
        );
        report
    }
}

fn entries<'a>(document: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    document
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}
