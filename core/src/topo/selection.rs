use super::{AreaId, NodeId, WallId};
use serde::{Deserialize, Serialize};

/// Something the editor can hand to the selection collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selection {
    Node(NodeId),
    Wall(WallId),
    Area(AreaId),
}

/// Single-item selection, one slot per entity kind.
///
/// Selecting something clears the other kinds, so at most one slot is set
/// after any `select` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    pub node: Option<NodeId>,
    pub wall: Option<WallId>,
    pub area: Option<AreaId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, target: Selection) {
        self.clear();
        match target {
            Selection::Node(id) => self.node = Some(id),
            Selection::Wall(id) => self.wall = Some(id),
            Selection::Area(id) => self.area = Some(id),
        }
    }

    /// Drops `target` if it is the current selection of its kind.
    /// Returns true if something was deselected.
    pub fn deselect(&mut self, target: &Selection) -> bool {
        let slot_matches = match target {
            Selection::Node(id) => self.node.as_ref() == Some(id),
            Selection::Wall(id) => self.wall.as_ref() == Some(id),
            Selection::Area(id) => self.area.as_ref() == Some(id),
        };
        if !slot_matches {
            return false;
        }
        match target {
            Selection::Node(_) => self.node = None,
            Selection::Wall(_) => self.wall = None,
            Selection::Area(_) => self.area = None,
        }
        true
    }

    pub fn clear(&mut self) {
        self.node = None;
        self.wall = None;
        self.area = None;
    }

    pub fn current(&self) -> Option<Selection> {
        if let Some(id) = &self.node {
            return Some(Selection::Node(id.clone()));
        }
        if let Some(id) = &self.wall {
            return Some(Selection::Wall(id.clone()));
        }
        self.area.clone().map(Selection::Area)
    }

    pub fn is_empty(&self) -> bool {
        self.current().is_none()
    }
}
