//! The editing session.
//!
//! [`Editor`] owns a [`Layout`] and routes every edit to the current floor's
//! [`PlanGraph`]. It talks to the rest of the host through two seams:
//!
//! 1. A [`CommitSink`] receives one deep snapshot of the floor after every
//!    finished edit. Compound edits (merge, openings, templates) commit once
//!    at the end, never in between.
//! 2. A [`SelectionSink`] is told what to select after a creation and what
//!    to drop after a deletion.
//!
//! Graph edits never fail loudly. An edit that had no effect returns
//! `None`/`false` and commits nothing. Floor management returns
//! [`PlanError`] because the host usually has to report it.

pub mod layout;
pub use layout::{Floor, Layout};

use crate::config::PlanConfig;
use crate::error::PlanError;
use crate::history::{FloorSnapshot, History};
use crate::plan::{
    AreaTemplate, AreaUpdate, DoorSwing, DoorType, ImportReport, MergeReport, NodeUpdate, PlanGraph, WallType,
    WallUpdate,
};
use crate::topo::{AreaId, FloorId, IdGenerator, NodeId, Selection, SelectionState, WallId};
use serde_json::Value;
use tracing::{info, warn};

/// Receives the floor state at each commit point.
pub trait CommitSink {
    fn commit(&mut self, floor: &FloorId, snapshot: FloorSnapshot);

    /// Called when a floor becomes current with the state it was loaded in.
    fn track(&mut self, _floor: &FloorId, _snapshot: FloorSnapshot) {}

    /// Called when a floor is deleted.
    fn forget(&mut self, _floor: &FloorId) {}
}

/// Receives selection changes caused by edits.
pub trait SelectionSink {
    fn select(&mut self, target: Selection);
    fn deselect(&mut self, target: &Selection);
    fn clear(&mut self);
}

impl SelectionSink for SelectionState {
    fn select(&mut self, target: Selection) {
        SelectionState::select(self, target);
    }

    fn deselect(&mut self, target: &Selection) {
        SelectionState::deselect(self, target);
    }

    fn clear(&mut self) {
        SelectionState::clear(self);
    }
}

pub struct Editor<C = History, S = SelectionState> {
    layout: Layout,
    config: PlanConfig,
    ids: IdGenerator,
    commits: C,
    selection: S,
}

impl Editor {
    /// Session over `layout` with in-memory history and selection.
    pub fn new(layout: Layout, config: PlanConfig) -> Self {
        let history = History::new(config.history_capacity);
        Self::with_collaborators(layout, config, history, SelectionState::new())
    }

    pub fn from_json(json: &str, config: PlanConfig) -> Result<Self, PlanError> {
        config.validate()?;
        Ok(Self::new(Layout::from_json(json)?, config))
    }
}

impl<C: CommitSink, S: SelectionSink> Editor<C, S> {
    /// Session over `layout` reporting to the given collaborators.
    ///
    /// A missing or dangling current floor falls back to the first floor.
    pub fn with_collaborators(mut layout: Layout, config: PlanConfig, commits: C, selection: S) -> Self {
        let current_is_valid = layout.current_floor().is_some();
        if !current_is_valid {
            layout.current_floor_id = layout.floors.first().map(|f| f.id.clone());
        }

        let mut editor = Self {
            layout,
            config,
            ids: IdGenerator::random(),
            commits,
            selection,
        };
        for index in 0..editor.layout.floors.len() {
            editor.configure_floor(index);
        }
        editor.track_current();
        editor
    }

    /// Reseed every id source from `seed`. Floors get their own derived
    /// sequence so ids stay unique across floors.
    pub fn with_id_seed(mut self, seed: &str) -> Self {
        self.ids = IdGenerator::new(seed);
        for floor in &mut self.layout.floors {
            floor.graph.set_id_generator(self.ids.derive(floor.id.as_str()));
        }
        self
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn into_layout(self) -> Layout {
        self.layout
    }

    pub fn to_json(&self) -> Result<String, PlanError> {
        self.layout.to_json()
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    pub fn current_floor(&self) -> Option<&Floor> {
        self.layout.current_floor()
    }

    pub fn current_floor_id(&self) -> Option<&FloorId> {
        self.layout.current_floor_id.as_ref()
    }

    /// Graph of the current floor.
    pub fn graph(&self) -> Option<&PlanGraph> {
        self.current_floor().map(|f| &f.graph)
    }

    pub fn commits(&self) -> &C {
        &self.commits
    }

    pub fn selection(&self) -> &S {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut S {
        &mut self.selection
    }

    /// Push the current floor to the commit sink.
    pub fn commit(&mut self) -> Result<(), PlanError> {
        let floor = self.layout.current_floor().ok_or(PlanError::NoCurrentFloor)?;
        let id = floor.id.clone();
        let snapshot = floor.snapshot();
        self.commits.commit(&id, snapshot);
        Ok(())
    }

    // =========================================================================
    // Graph Edits
    // =========================================================================

    pub fn add_node(&mut self, x: f64, y: f64) -> Option<NodeId> {
        self.edit("add_node", |graph| Some(graph.add_node(x, y)))
    }

    /// Move a node. Dragging hosts pass `commit = false` while the pointer
    /// moves and commit once on release.
    pub fn update_node(&mut self, id: &NodeId, update: NodeUpdate, commit: bool) -> bool {
        if commit {
            self.edit("update_node", |graph| graph.update_node(id, update).then_some(()))
                .is_some()
        } else {
            self.graph_mut("update_node")
                .map_or(false, |graph| graph.update_node(id, update))
        }
    }

    pub fn delete_node(&mut self, id: &NodeId) -> bool {
        let deleted = self
            .edit("delete_node", |graph| graph.delete_node(id).then_some(()))
            .is_some();
        if deleted {
            self.selection.deselect(&Selection::Node(id.clone()));
        }
        deleted
    }

    /// Connect two nodes and select the wall.
    pub fn add_wall(&mut self, start: &NodeId, end: &NodeId, wall_type: WallType) -> Option<WallId> {
        let id = self.edit("add_wall", |graph| graph.add_wall(start, end, wall_type))?;
        self.selection.select(Selection::Wall(id.clone()));
        Some(id)
    }

    pub fn update_wall(&mut self, id: &WallId, update: WallUpdate, commit: bool) -> bool {
        if commit {
            self.edit("update_wall", |graph| graph.update_wall(id, update).then_some(()))
                .is_some()
        } else {
            self.graph_mut("update_wall")
                .map_or(false, |graph| graph.update_wall(id, update))
        }
    }

    pub fn delete_wall(&mut self, id: &WallId) -> bool {
        let deleted = self
            .edit("delete_wall", |graph| graph.delete_wall(id).then_some(()))
            .is_some();
        if deleted {
            self.selection.deselect(&Selection::Wall(id.clone()));
        }
        deleted
    }

    /// Split a wall at `(x, y)` and select the new corner.
    pub fn split_wall(&mut self, id: &WallId, x: f64, y: f64) -> Option<NodeId> {
        let node = self.edit("split_wall", |graph| graph.split_wall(id, x, y))?;
        self.selection.select(Selection::Node(node.clone()));
        Some(node)
    }

    /// Cut a door or window into a wall and select the opening.
    pub fn insert_door_window(
        &mut self,
        wall: &WallId,
        opening: WallType,
        width: f64,
        door_swing: Option<DoorSwing>,
        door_type: Option<DoorType>,
    ) -> Option<WallId> {
        let id = self.edit("insert_door_window", |graph| {
            graph.insert_door_window(wall, opening, width, door_swing, door_type)
        })?;
        self.selection.select(Selection::Wall(id.clone()));
        Some(id)
    }

    pub fn delete_area(&mut self, id: &AreaId) -> bool {
        let deleted = self
            .edit("delete_area", |graph| graph.delete_area(id).then_some(()))
            .is_some();
        if deleted {
            self.selection.deselect(&Selection::Area(id.clone()));
        }
        deleted
    }

    pub fn update_area(&mut self, id: &AreaId, update: AreaUpdate) -> bool {
        self.edit("update_area", |graph| graph.update_area(id, update).then_some(()))
            .is_some()
    }

    pub fn toggle_area_size_lock(&mut self, id: &AreaId) -> Option<bool> {
        self.edit("toggle_area_size_lock", |graph| graph.toggle_area_size_lock(id))
    }

    pub fn toggle_area_drag_lock(&mut self, id: &AreaId) -> Option<bool> {
        self.edit("toggle_area_drag_lock", |graph| graph.toggle_area_drag_lock(id))
    }

    /// Merge two areas into one. Both source ids stop existing, so neither
    /// may stay selected.
    pub fn merge_areas(&mut self, a: &AreaId, b: &AreaId) -> Option<MergeReport> {
        let report = self.edit("merge_areas", |graph| graph.merge_areas(a, b))?;
        self.selection.deselect(&Selection::Area(a.clone()));
        self.selection.deselect(&Selection::Area(b.clone()));
        Some(report)
    }

    pub fn add_area_from_template(&mut self, template: AreaTemplate, x: f64, y: f64, size: f64) -> Option<AreaId> {
        let id = self.edit("add_area_from_template", |graph| {
            graph.add_area_from_template(template, x, y, size)
        })?;
        self.selection.select(Selection::Area(id.clone()));
        Some(id)
    }

    pub fn import_json(&mut self, document: &Value) -> Option<ImportReport> {
        self.edit("import_json", |graph| Some(graph.import_json(document)))
    }

    // =========================================================================
    // Floors
    // =========================================================================

    /// Add an empty floor at `level` and make it current.
    pub fn add_floor(
        &mut self,
        name: &str,
        level: i32,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Result<FloorId, PlanError> {
        if self.layout.has_level(level) {
            warn!(level, "add_floor: level already exists");
            return Err(PlanError::DuplicateFloorLevel(level));
        }

        let id: FloorId = self.ids.next_id();
        let mut floor = Floor::new(id.clone(), name, level);
        floor.floor_type = Some(self.config.default_floor_type.clone());
        floor.width = Some(width.unwrap_or(self.layout.width));
        floor.height = Some(height.unwrap_or(self.layout.height));
        floor.graph.set_id_generator(self.ids.derive(id.as_str()));
        self.layout.floors.push(floor);
        self.configure_floor(self.layout.floors.len() - 1);

        self.switch_floor(&id)?;
        Ok(id)
    }

    pub fn switch_floor(&mut self, id: &FloorId) -> Result<(), PlanError> {
        if self.layout.floor(id).is_none() {
            return Err(PlanError::UnknownFloor(id.clone()));
        }
        self.layout.current_floor_id = Some(id.clone());
        self.track_current();
        self.selection.clear();
        info!(floor = %id, "Switched floor");
        Ok(())
    }

    /// Delete a floor and its history. Deleting the current floor moves to
    /// the first remaining floor, or leaves no floor current.
    pub fn delete_floor(&mut self, id: &FloorId) -> Result<(), PlanError> {
        let Some(index) = self.layout.floors.iter().position(|f| &f.id == id) else {
            return Err(PlanError::UnknownFloor(id.clone()));
        };

        self.commits.forget(id);
        self.layout.floors.remove(index);

        if self.layout.current_floor_id.as_ref() == Some(id) {
            match self.layout.floors.first().map(|f| f.id.clone()) {
                Some(next) => self.switch_floor(&next)?,
                None => {
                    self.layout.current_floor_id = None;
                    self.selection.clear();
                }
            }
        }
        info!(floor = %id, remaining = self.layout.floors.len(), "Deleted floor");
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn graph_mut(&mut self, op: &str) -> Option<&mut PlanGraph> {
        match self.layout.current_floor_mut() {
            Some(floor) => Some(&mut floor.graph),
            None => {
                warn!(op, "No current floor");
                None
            }
        }
    }

    /// Run `apply` on the current graph and commit if it had an effect.
    fn edit<T>(&mut self, op: &str, apply: impl FnOnce(&mut PlanGraph) -> Option<T>) -> Option<T> {
        let out = apply(self.graph_mut(op)?)?;
        self.commit().ok()?;
        Some(out)
    }

    fn track_current(&mut self) {
        if let Some(floor) = self.layout.current_floor() {
            let id = floor.id.clone();
            let snapshot = floor.snapshot();
            self.commits.track(&id, snapshot);
        }
    }

    /// Hand the session config to a floor, with the floor's own floor type
    /// (or the layout's) as the default for new areas.
    fn configure_floor(&mut self, index: usize) {
        let mut config = self.config.clone();
        let Some(floor) = self.layout.floors.get_mut(index) else {
            return;
        };
        if let Some(floor_type) = floor.floor_type.clone().or_else(|| self.layout.floor_type.clone()) {
            config.default_floor_type = floor_type;
        }
        floor.graph.set_config(config);
    }
}

impl<S: SelectionSink> Editor<History, S> {
    pub fn can_undo(&self) -> bool {
        self.current_floor_id().map_or(false, |id| self.commits.can_undo(id))
    }

    pub fn can_redo(&self) -> bool {
        self.current_floor_id().map_or(false, |id| self.commits.can_redo(id))
    }

    /// Restore the previous commit of the current floor.
    pub fn undo(&mut self) -> bool {
        let Some(id) = self.layout.current_floor_id.clone() else {
            return false;
        };
        match self.commits.undo(&id) {
            Some(snapshot) => {
                self.restore(&id, snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let Some(id) = self.layout.current_floor_id.clone() else {
            return false;
        };
        match self.commits.redo(&id) {
            Some(snapshot) => {
                self.restore(&id, snapshot);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, id: &FloorId, snapshot: FloorSnapshot) {
        if let Some(floor) = self.layout.floor_mut(id) {
            floor.restore(snapshot);
        }
        self.selection.clear();
    }
}

#[cfg(test)]
mod tests_editor;
