//! Ready-made room outlines.

use crate::plan::graph::PlanGraph;
use crate::plan::types::{Node, Wall, WallType};
use crate::topo::{AreaId, NodeId};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AreaTemplate {
    Square,
    LShape,
    TShape,
    UShape,
}

impl AreaTemplate {
    pub const ALL: [AreaTemplate; 4] = [Self::Square, Self::LShape, Self::TShape, Self::UShape];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Square => "Square",
            Self::LShape => "L Shape",
            Self::TShape => "T Shape",
            Self::UShape => "U Shape",
        }
    }

    /// Corners of the outline, in ring order, with the top-left of the
    /// bounding box at `(x, y)`.
    pub fn outline(&self, x: f64, y: f64, size: f64) -> Vec<[f64; 2]> {
        match self {
            Self::Square => vec![[x, y], [x + size, y], [x + size, y + size], [x, y + size]],
            Self::LShape => {
                let s = size / 2.0;
                vec![
                    [x, y],
                    [x + size, y],
                    [x + size, y + s],
                    [x + s, y + s],
                    [x + s, y + size],
                    [x, y + size],
                ]
            }
            Self::TShape => {
                let s = size / 3.0;
                vec![
                    [x + s, y],
                    [x + 2.0 * s, y],
                    [x + 2.0 * s, y + s],
                    [x + size, y + s],
                    [x + size, y + 2.0 * s],
                    [x, y + 2.0 * s],
                    [x, y + s],
                    [x + s, y + s],
                ]
            }
            Self::UShape => {
                let s = size / 3.0;
                vec![
                    [x, y],
                    [x + s, y],
                    [x + s, y + 2.0 * s],
                    [x + 2.0 * s, y + 2.0 * s],
                    [x + 2.0 * s, y],
                    [x + size, y],
                    [x + size, y + size],
                    [x, y + size],
                ]
            }
        }
    }
}

impl PlanGraph {
    /// Append a closed ring of walls shaped like `template` and detect it.
    /// Returns the area that picked up the new corners.
    pub fn add_area_from_template(&mut self, template: AreaTemplate, x: f64, y: f64, size: f64) -> Option<AreaId> {
        let thickness = self.config.default_wall_thickness;
        let corners = template.outline(x, y, size);

        let ids: Vec<NodeId> = corners.iter().map(|_| self.ids.next_id()).collect();
        for (id, p) in ids.iter().zip(&corners) {
            self.push_node(Node::new(id.clone(), p[0], p[1]));
        }
        for (i, start) in ids.iter().enumerate() {
            let end = &ids[(i + 1) % ids.len()];
            let wall = Wall::new(self.ids.next_id(), start.clone(), end.clone(), thickness, WallType::Wall);
            self.push_wall(wall);
        }
        self.recalculate_areas();

        let area = self
            .areas()
            .iter()
            .find(|a| a.node_ids.iter().any(|n| ids.contains(n)))
            .map(|a| a.id.clone());
        debug!(template = template.name(), area = ?area, "Added area from template");
        area
    }
}
