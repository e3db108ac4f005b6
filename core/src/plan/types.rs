use crate::geometry::Point2;
use crate::topo::{AreaId, NodeId, WallId};
use serde::{Deserialize, Serialize};

/// A graph vertex: a wall corner in plan coordinates (centimeters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

impl Node {
    pub fn new(id: NodeId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    pub fn position(&self) -> Point2 {
        [self.x, self.y]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallType {
    #[default]
    Wall,
    Door,
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorSwing {
    Left,
    Right,
    Sliding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorType {
    Entrance,
    Exit,
    Standard,
}

/// A graph edge between two nodes. Doors and windows are walls too and take
/// part in area detection like any other segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wall {
    pub id: WallId,
    pub start_node_id: NodeId,
    pub end_node_id: NodeId,
    pub thickness: f64,
    #[serde(rename = "type", default)]
    pub wall_type: WallType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub door_swing: Option<DoorSwing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub door_type: Option<DoorType>,
    /// Opening width for doors and windows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub flipped: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
}

impl Wall {
    pub fn new(id: WallId, start: NodeId, end: NodeId, thickness: f64, wall_type: WallType) -> Self {
        Self {
            id,
            start_node_id: start,
            end_node_id: end,
            thickness,
            wall_type,
            door_swing: None,
            door_type: None,
            width: None,
            height: None,
            flipped: false,
            locked: false,
        }
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        &self.start_node_id == node || &self.end_node_id == node
    }

    /// The endpoint across the wall from `node`, if `node` is an endpoint.
    pub fn other_end(&self, node: &NodeId) -> Option<&NodeId> {
        if &self.start_node_id == node {
            Some(&self.end_node_id)
        } else if &self.end_node_id == node {
            Some(&self.start_node_id)
        } else {
            None
        }
    }

    /// True when both walls join the same unordered pair of nodes.
    pub fn connects(&self, a: &NodeId, b: &NodeId) -> bool {
        (&self.start_node_id == a && &self.end_node_id == b)
            || (&self.start_node_id == b && &self.end_node_id == a)
    }

    pub fn is_degenerate(&self) -> bool {
        self.start_node_id == self.end_node_id
    }

    /// Order-independent key of the node pair.
    pub fn pair_key(&self) -> (NodeId, NodeId) {
        if self.start_node_id <= self.end_node_id {
            (self.start_node_id.clone(), self.end_node_id.clone())
        } else {
            (self.end_node_id.clone(), self.start_node_id.clone())
        }
    }
}

/// A detected room. Geometry comes from `node_ids`; everything else is
/// user state that survives re-detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    /// Ordered boundary cycle.
    pub node_ids: Vec<NodeId>,
    pub floor_type_id: String,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    #[serde(default, alias = "locked")]
    pub locked_size: bool,
    #[serde(default)]
    pub locked_dimension: bool,
    /// Degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

fn visible_by_default() -> bool {
    true
}

impl Area {
    /// True when `node_ids` contains both endpoints of the wall.
    pub fn bounds(&self, wall: &Wall) -> bool {
        self.node_ids.contains(&wall.start_node_id) && self.node_ids.contains(&wall.end_node_id)
    }

    /// Same members regardless of order.
    pub fn has_node_set(&self, node_ids: &[NodeId]) -> bool {
        self.node_ids.len() == node_ids.len() && node_ids.iter().all(|id| self.node_ids.contains(id))
    }
}

/// Partial node update. Only position is editable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl NodeUpdate {
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y) }
    }
}

/// Partial wall update. Endpoints are not editable here; use the
/// topology operations instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WallUpdate {
    pub thickness: Option<f64>,
    pub wall_type: Option<WallType>,
    pub door_swing: Option<Option<DoorSwing>>,
    pub door_type: Option<Option<DoorType>>,
    pub width: Option<Option<f64>>,
    pub height: Option<Option<f64>>,
    pub flipped: Option<bool>,
    pub locked: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaUpdate {
    pub name: Option<String>,
    pub floor_type_id: Option<String>,
    pub visible: Option<bool>,
    pub locked_size: Option<bool>,
    pub locked_dimension: Option<bool>,
    pub rotation: Option<Option<f64>>,
}
