//! Per-floor undo/redo.
//!
//! Each floor keeps its own `past / present / future` stacks of deep
//! snapshots. Snapshots are plain owned values, so nothing done to the live
//! graph after a commit can reach back into history.

use crate::editor::CommitSink;
use crate::plan::types::{Area, Node, Wall};
use crate::topo::FloorId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Everything on a floor that undo restores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorSnapshot {
    pub nodes: Vec<Node>,
    pub walls: Vec<Wall>,
    pub areas: Vec<Area>,
    /// Opaque to this crate; carried along so undo restores them too.
    pub fixtures: Vec<Value>,
}

#[derive(Debug, Clone)]
struct FloorHistory {
    past: VecDeque<FloorSnapshot>,
    present: FloorSnapshot,
    future: VecDeque<FloorSnapshot>,
}

impl FloorHistory {
    fn starting_at(present: FloorSnapshot) -> Self {
        Self {
            past: VecDeque::new(),
            present,
            future: VecDeque::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct History {
    floors: HashMap<FloorId, FloorHistory>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(50)
    }
}

impl History {
    /// `capacity` bounds the undo depth of each floor. The oldest entry is
    /// dropped first.
    pub fn new(capacity: usize) -> Self {
        Self {
            floors: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Start tracking a floor at `initial`. A floor that is already tracked
    /// keeps its stacks. Returns true if tracking started.
    pub fn track(&mut self, floor: &FloorId, initial: FloorSnapshot) -> bool {
        if self.floors.contains_key(floor) {
            return false;
        }
        self.floors.insert(floor.clone(), FloorHistory::starting_at(initial));
        true
    }

    pub fn is_tracked(&self, floor: &FloorId) -> bool {
        self.floors.contains_key(floor)
    }

    /// Make `snapshot` the new present. The previous present becomes
    /// undoable and the redo stack is cleared. An untracked floor starts
    /// tracking at `snapshot` with nothing to undo.
    pub fn record(&mut self, floor: &FloorId, snapshot: FloorSnapshot) {
        let Some(history) = self.floors.get_mut(floor) else {
            self.track(floor, snapshot);
            return;
        };

        let previous = std::mem::replace(&mut history.present, snapshot);
        history.past.push_back(previous);
        while history.past.len() > self.capacity {
            history.past.pop_front();
        }
        history.future.clear();
        debug!(floor = %floor, depth = history.past.len(), "History commit");
    }

    /// Step back. Returns the snapshot to restore.
    pub fn undo(&mut self, floor: &FloorId) -> Option<FloorSnapshot> {
        let history = self.floors.get_mut(floor)?;
        let previous = history.past.pop_back()?;
        let current = std::mem::replace(&mut history.present, previous);
        history.future.push_front(current);
        Some(history.present.clone())
    }

    /// Step forward again. Returns the snapshot to restore.
    pub fn redo(&mut self, floor: &FloorId) -> Option<FloorSnapshot> {
        let history = self.floors.get_mut(floor)?;
        let next = history.future.pop_front()?;
        let current = std::mem::replace(&mut history.present, next);
        history.past.push_back(current);
        Some(history.present.clone())
    }

    pub fn can_undo(&self, floor: &FloorId) -> bool {
        self.floors.get(floor).map_or(false, |h| !h.past.is_empty())
    }

    pub fn can_redo(&self, floor: &FloorId) -> bool {
        self.floors.get(floor).map_or(false, |h| !h.future.is_empty())
    }

    /// Drop all history of a floor.
    pub fn forget(&mut self, floor: &FloorId) {
        self.floors.remove(floor);
    }
}

impl CommitSink for History {
    fn commit(&mut self, floor: &FloorId, snapshot: FloorSnapshot) {
        self.record(floor, snapshot);
    }

    fn track(&mut self, floor: &FloorId, snapshot: FloorSnapshot) {
        History::track(self, floor, snapshot);
    }

    fn forget(&mut self, floor: &FloorId) {
        History::forget(self, floor);
    }
}
