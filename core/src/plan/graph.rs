use crate::config::PlanConfig;
use crate::geometry::utils_2d::{closest_point_on_segment, distance, point_to_segment_distance};
use crate::geometry::Point2;
use crate::plan::detection::{cycle_signed_area, detect_areas};
use crate::plan::reconcile::{reconcile_areas, ReconcileReport};
use crate::plan::types::{Area, AreaUpdate, DoorSwing, Node, NodeUpdate, Wall, WallType, WallUpdate};
use crate::topo::{AreaId, IdGenerator, NodeId, WallId};
use crate::units::LengthUnit;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// The closest point on any wall to a query position.
#[derive(Debug, Clone, PartialEq)]
pub struct WallPoint {
    pub wall_id: WallId,
    pub x: f64,
    pub y: f64,
}

/// Nodes, walls and areas of one floor.
///
/// Entities reference each other by id only. All storage is `Vec` so that
/// iteration order, and with it detection output, is stable between runs.
/// Structural edits re-run detection and reconciliation before returning;
/// committing the result to history is left to the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanGraph {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    walls: Vec<Wall>,
    #[serde(default)]
    areas: Vec<Area>,
    #[serde(skip)]
    pub(crate) ids: IdGenerator,
    #[serde(skip)]
    pub(crate) config: PlanConfig,
}

impl PlanGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty graph drawing its ids from `ids`.
    pub fn with_ids(ids: IdGenerator) -> Self {
        Self {
            ids,
            ..Self::default()
        }
    }

    /// Build a graph from stored collections. Areas are taken as they are;
    /// call [`PlanGraph::recalculate_areas`] to re-derive them.
    pub fn from_parts(nodes: Vec<Node>, walls: Vec<Wall>, areas: Vec<Area>) -> Self {
        Self {
            nodes,
            walls,
            areas,
            ..Self::default()
        }
    }

    pub fn set_config(&mut self, config: PlanConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    pub fn set_id_generator(&mut self, ids: IdGenerator) {
        self.ids = ids;
    }

    /// Replace all collections at once, e.g. when restoring a snapshot.
    pub fn replace_contents(&mut self, nodes: Vec<Node>, walls: Vec<Wall>, areas: Vec<Area>) {
        self.nodes = nodes;
        self.walls = walls;
        self.areas = areas;
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn wall(&self, id: &WallId) -> Option<&Wall> {
        self.walls.iter().find(|w| &w.id == id)
    }

    pub fn area(&self, id: &AreaId) -> Option<&Area> {
        self.areas.iter().find(|a| &a.id == id)
    }

    pub fn node_position(&self, id: &NodeId) -> Option<Point2> {
        self.node(id).map(Node::position)
    }

    /// Start and end positions of a wall.
    pub fn wall_coordinates(&self, id: &WallId) -> Option<(Point2, Point2)> {
        self.wall(id).and_then(|w| self.segment_of(w))
    }

    pub(crate) fn segment_of(&self, wall: &Wall) -> Option<(Point2, Point2)> {
        let start = self.node_position(&wall.start_node_id)?;
        let end = self.node_position(&wall.end_node_id)?;
        Some((start, end))
    }

    pub fn wall_length(&self, id: &WallId) -> Option<f64> {
        self.wall_coordinates(id).map(|(a, b)| distance(a, b))
    }

    /// Walls with both endpoints on the area's boundary.
    pub fn boundary_walls(&self, area: &Area) -> Vec<&Wall> {
        self.walls.iter().filter(|w| area.bounds(w)).collect()
    }

    /// Walls touching a node, in wall order.
    pub fn walls_at(&self, node: &NodeId) -> Vec<&Wall> {
        self.walls.iter().filter(|w| w.touches(node)).collect()
    }

    pub(crate) fn wall_between(&self, a: &NodeId, b: &NodeId) -> Option<&Wall> {
        self.walls.iter().find(|w| w.connects(a, b))
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// First node, in node order, strictly closer than `threshold`.
    pub fn find_nearby_node(&self, x: f64, y: f64, threshold: f64) -> Option<&Node> {
        self.nodes.iter().find(|n| distance(n.position(), [x, y]) < threshold)
    }

    /// [`PlanGraph::find_nearby_node`] with the configured pointer threshold.
    pub fn node_near(&self, x: f64, y: f64) -> Option<&Node> {
        self.find_nearby_node(x, y, self.config.nearby_node_threshold)
    }

    /// [`PlanGraph::find_closest_wall_point`] with the configured pointer threshold.
    pub fn wall_point_near(&self, x: f64, y: f64) -> Option<WallPoint> {
        self.find_closest_wall_point(x, y, self.config.nearby_node_threshold)
    }

    /// Closest point over all walls, if strictly closer than `threshold`.
    pub fn find_closest_wall_point(&self, x: f64, y: f64, threshold: f64) -> Option<WallPoint> {
        let query = [x, y];
        let mut best: Option<(f64, WallPoint)> = None;

        for wall in &self.walls {
            let Some((start, end)) = self.segment_of(wall) else {
                continue;
            };
            let dist = point_to_segment_distance(start, end, query);
            if dist >= threshold {
                continue;
            }
            if best.as_ref().map_or(true, |(d, _)| dist < *d) {
                let foot = closest_point_on_segment(start, end, query);
                best = Some((
                    dist,
                    WallPoint {
                        wall_id: wall.id.clone(),
                        x: foot[0],
                        y: foot[1],
                    },
                ));
            }
        }

        best.map(|(_, point)| point)
    }

    // =========================================================================
    // Detection
    // =========================================================================

    /// Re-detect faces and reconcile them with the current area list.
    pub fn recalculate_areas(&mut self) -> ReconcileReport {
        let cycles = detect_areas(&self.nodes, &self.walls);
        let outcome = reconcile_areas(
            &self.areas,
            cycles,
            &self.nodes,
            &mut self.ids,
            &self.config.default_floor_type,
        );
        self.areas = outcome.areas;
        outcome.report
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    pub fn add_node(&mut self, x: f64, y: f64) -> NodeId {
        let id: NodeId = self.ids.next_id();
        self.nodes.push(Node::new(id.clone(), x, y));
        self.recalculate_areas();
        id
    }

    /// Move a node. Topology is unchanged, so areas are not re-detected.
    pub fn update_node(&mut self, id: &NodeId, update: NodeUpdate) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|n| &n.id == id) else {
            warn!(node = %id, "update_node: unknown node");
            return false;
        };
        if let Some(x) = update.x {
            node.x = x;
        }
        if let Some(y) = update.y {
            node.y = y;
        }
        true
    }

    /// Delete a node. A node joining exactly two walls is dissolved: the two
    /// walls become one spanning their far endpoints, keeping the first
    /// wall's thickness, type and height. Any other node takes its walls
    /// with it.
    pub fn delete_node(&mut self, id: &NodeId) -> bool {
        if self.node(id).is_none() {
            warn!(node = %id, "delete_node: unknown node");
            return false;
        }

        let touching: Vec<Wall> = self.walls_at(id).into_iter().cloned().collect();
        self.walls.retain(|w| !w.touches(id));

        if let [first, second] = touching.as_slice() {
            let far_a = first.other_end(id).cloned();
            let far_b = second.other_end(id).cloned();
            if let (Some(a), Some(b)) = (far_a, far_b) {
                if a != b && self.wall_between(&a, &b).is_none() {
                    let mut merged = Wall::new(self.ids.next_id(), a, b, first.thickness, first.wall_type);
                    merged.height = first.height;
                    debug!(node = %id, wall = %merged.id, "Dissolved through-node into one wall");
                    self.walls.push(merged);
                }
            }
        }

        self.nodes.retain(|n| &n.id != id);
        self.recalculate_areas();
        true
    }

    // =========================================================================
    // Wall Operations
    // =========================================================================

    /// Connect two nodes. If a wall already joins the pair it is retargeted
    /// in place to the requested type and default thickness.
    pub fn add_wall(&mut self, start: &NodeId, end: &NodeId, wall_type: WallType) -> Option<WallId> {
        if start == end {
            warn!(node = %start, "add_wall: refusing degenerate wall");
            return None;
        }
        if self.node(start).is_none() || self.node(end).is_none() {
            warn!(start = %start, end = %end, "add_wall: unknown endpoint");
            return None;
        }

        let thickness = self.config.default_wall_thickness;
        let door_swing = (wall_type == WallType::Door).then_some(DoorSwing::Left);

        if let Some(existing) = self.walls.iter_mut().find(|w| w.connects(start, end)) {
            existing.wall_type = wall_type;
            existing.thickness = thickness;
            existing.door_swing = door_swing;
            let id = existing.id.clone();
            debug!(wall = %id, ?wall_type, "Retargeted existing wall");
            self.recalculate_areas();
            return Some(id);
        }

        let mut wall = Wall::new(self.ids.next_id(), start.clone(), end.clone(), thickness, wall_type);
        wall.door_swing = door_swing;
        let id = wall.id.clone();
        self.walls.push(wall);
        self.recalculate_areas();
        Some(id)
    }

    /// Change wall properties. Endpoints are untouched, so no re-detection.
    pub fn update_wall(&mut self, id: &WallId, update: WallUpdate) -> bool {
        let Some(wall) = self.walls.iter_mut().find(|w| &w.id == id) else {
            warn!(wall = %id, "update_wall: unknown wall");
            return false;
        };
        if let Some(thickness) = update.thickness {
            wall.thickness = thickness;
        }
        if let Some(wall_type) = update.wall_type {
            wall.wall_type = wall_type;
        }
        if let Some(door_swing) = update.door_swing {
            wall.door_swing = door_swing;
        }
        if let Some(door_type) = update.door_type {
            wall.door_type = door_type;
        }
        if let Some(width) = update.width {
            wall.width = width;
        }
        if let Some(height) = update.height {
            wall.height = height;
        }
        if let Some(flipped) = update.flipped {
            wall.flipped = flipped;
        }
        if let Some(locked) = update.locked {
            wall.locked = locked;
        }
        true
    }

    /// Remove a wall and the nodes it leaves unreferenced.
    ///
    /// Areas are not re-detected: removed node ids are only stripped from
    /// their `node_ids`, so a room with one missing wall keeps its state.
    pub fn delete_wall(&mut self, id: &WallId) -> bool {
        let before = self.walls.len();
        self.walls.retain(|w| &w.id != id);
        if self.walls.len() == before {
            warn!(wall = %id, "delete_wall: unknown wall");
            return false;
        }

        let removed = self.remove_orphan_nodes();
        if !removed.is_empty() {
            for area in &mut self.areas {
                area.node_ids.retain(|n| !removed.contains(n));
            }
        }
        true
    }

    /// Insert a node at `(x, y)` and replace the wall by two halves meeting
    /// there. Returns the new node id.
    pub fn split_wall(&mut self, id: &WallId, x: f64, y: f64) -> Option<NodeId> {
        if self.wall(id).is_none() {
            warn!(wall = %id, "split_wall: unknown wall");
            return None;
        }

        let node_id: NodeId = self.ids.next_id();
        self.nodes.push(Node::new(node_id.clone(), x, y));
        self.split_at_node(id, &node_id)?;
        self.recalculate_areas();
        Some(node_id)
    }

    /// Replace a wall by `start -> node` and `node -> end`, carrying over
    /// thickness, type and height. Does not re-detect.
    pub(crate) fn split_at_node(&mut self, id: &WallId, node: &NodeId) -> Option<[WallId; 2]> {
        let index = self.walls.iter().position(|w| &w.id == id)?;
        if self.walls[index].touches(node) {
            return None;
        }
        let original = self.walls.remove(index);

        let mut first = Wall::new(
            self.ids.next_id(),
            original.start_node_id.clone(),
            node.clone(),
            original.thickness,
            original.wall_type,
        );
        first.height = original.height;

        let mut second = Wall::new(
            self.ids.next_id(),
            node.clone(),
            original.end_node_id.clone(),
            original.thickness,
            original.wall_type,
        );
        second.height = original.height;

        let ids = [first.id.clone(), second.id.clone()];
        self.walls.push(first);
        self.walls.push(second);
        Some(ids)
    }

    /// Drop nodes no wall references. Returns the removed ids.
    pub(crate) fn remove_orphan_nodes(&mut self) -> HashSet<NodeId> {
        let referenced: HashSet<&NodeId> = self
            .walls
            .iter()
            .flat_map(|w| [&w.start_node_id, &w.end_node_id])
            .collect();

        let removed: HashSet<NodeId> = self
            .nodes
            .iter()
            .filter(|n| !referenced.contains(&n.id))
            .map(|n| n.id.clone())
            .collect();

        self.nodes.retain(|n| !removed.contains(&n.id));
        removed
    }

    pub(crate) fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub(crate) fn push_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
    }

    pub(crate) fn walls_mut(&mut self) -> &mut Vec<Wall> {
        &mut self.walls
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    pub(crate) fn areas_mut(&mut self) -> &mut Vec<Area> {
        &mut self.areas
    }

    // =========================================================================
    // Area Operations
    // =========================================================================

    /// Delete an area by removing the walls only it uses.
    ///
    /// When every boundary wall is shared with another area, the first one is
    /// removed anyway so the room visibly opens up.
    pub fn delete_area(&mut self, id: &AreaId) -> bool {
        let Some(area) = self.area(id).cloned() else {
            warn!(area = %id, "delete_area: unknown area");
            return false;
        };

        let own_walls: Vec<&Wall> = self.boundary_walls(&area);
        let unique: Vec<WallId> = own_walls
            .iter()
            .filter(|w| !self.areas.iter().any(|other| other.id != area.id && other.bounds(w)))
            .map(|w| w.id.clone())
            .collect();

        let doomed: Vec<WallId> = if unique.is_empty() {
            own_walls.first().map(|w| w.id.clone()).into_iter().collect()
        } else {
            unique
        };

        self.walls.retain(|w| !doomed.contains(&w.id));
        self.remove_orphan_nodes();
        self.areas.retain(|a| &a.id != id);
        debug!(area = %id, walls = doomed.len(), "Deleted area");
        self.recalculate_areas();
        true
    }

    pub fn update_area(&mut self, id: &AreaId, update: AreaUpdate) -> bool {
        let Some(area) = self.areas.iter_mut().find(|a| &a.id == id) else {
            warn!(area = %id, "update_area: unknown area");
            return false;
        };
        if let Some(name) = update.name {
            area.name = name;
        }
        if let Some(floor_type_id) = update.floor_type_id {
            area.floor_type_id = floor_type_id;
        }
        if let Some(visible) = update.visible {
            area.visible = visible;
        }
        if let Some(locked_size) = update.locked_size {
            area.locked_size = locked_size;
        }
        if let Some(locked_dimension) = update.locked_dimension {
            area.locked_dimension = locked_dimension;
        }
        if let Some(rotation) = update.rotation {
            area.rotation = rotation;
        }
        true
    }

    /// Flip the size lock. Returns the new state.
    pub fn toggle_area_size_lock(&mut self, id: &AreaId) -> Option<bool> {
        let locked = !self.area(id)?.locked_size;
        self.update_area(
            id,
            AreaUpdate {
                locked_size: Some(locked),
                ..AreaUpdate::default()
            },
        );
        Some(locked)
    }

    /// Flip the drag lock. Returns the new state.
    pub fn toggle_area_drag_lock(&mut self, id: &AreaId) -> Option<bool> {
        let locked = !self.area(id)?.locked_dimension;
        self.update_area(
            id,
            AreaUpdate {
                locked_dimension: Some(locked),
                ..AreaUpdate::default()
            },
        );
        Some(locked)
    }

    /// Floor surface of an area in square meters.
    pub fn area_surface(&self, id: &AreaId) -> f64 {
        let Some(area) = self.area(id) else {
            return 0.0;
        };
        let resolvable = area.node_ids.iter().filter(|n| self.node(n).is_some()).count();
        if resolvable < 3 {
            return 0.0;
        }
        let raw = cycle_signed_area(&area.node_ids, &self.nodes).abs();
        LengthUnit::Centimeter.area_to_square_meters(raw)
    }
}
