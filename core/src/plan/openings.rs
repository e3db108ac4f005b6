//! Doors and windows cut into existing walls.

use crate::geometry::utils_2d::{distance, lerp, round_to_grid};
use crate::plan::graph::PlanGraph;
use crate::plan::types::{DoorSwing, DoorType, Node, Wall, WallType};
use crate::topo::{NodeId, WallId};
use tracing::{debug, warn};

impl PlanGraph {
    /// Replace a wall by three segments: plain wall, a centered opening of
    /// `width`, plain wall. Returns the id of the opening segment.
    ///
    /// Both flanks keep at least the configured minimum margin. Walls shorter
    /// than `width` plus two margins are left alone. New corners snap to the
    /// grid.
    pub fn insert_door_window(
        &mut self,
        wall_id: &WallId,
        opening: WallType,
        width: f64,
        door_swing: Option<DoorSwing>,
        door_type: Option<DoorType>,
    ) -> Option<WallId> {
        if opening == WallType::Wall {
            warn!(wall = %wall_id, "insert_door_window: opening must be a door or a window");
            return None;
        }
        if !width.is_finite() || width <= 0.0 {
            warn!(wall = %wall_id, width, "insert_door_window: width must be positive");
            return None;
        }
        let Some(wall) = self.wall(wall_id).cloned() else {
            warn!(wall = %wall_id, "insert_door_window: unknown wall");
            return None;
        };
        let (start, end) = self.segment_of(&wall)?;

        let margin = self.config.opening_min_margin;
        let grid = self.config.grid_step;
        let length = distance(start, end);
        if length < width + 2.0 * margin {
            debug!(wall = %wall_id, length, width, "Wall too short for opening");
            return None;
        }

        let dist_c = (length / 2.0 - width / 2.0).max(margin);
        let dist_d = (length / 2.0 + width / 2.0).min(length - margin);

        let snap = |p: [f64; 2]| [round_to_grid(p[0], grid), round_to_grid(p[1], grid)];
        let c = snap(lerp(start, end, dist_c / length));
        let d = snap(lerp(start, end, dist_d / length));

        let node_c: NodeId = self.ids.next_id();
        let node_d: NodeId = self.ids.next_id();
        self.push_node(Node::new(node_c.clone(), c[0], c[1]));
        self.push_node(Node::new(node_d.clone(), d[0], d[1]));

        self.walls_mut().retain(|w| &w.id != wall_id);

        let mut before = Wall::new(
            self.ids.next_id(),
            wall.start_node_id.clone(),
            node_c.clone(),
            wall.thickness,
            WallType::Wall,
        );
        before.height = wall.height;

        let mut gap = Wall::new(self.ids.next_id(), node_c, node_d.clone(), wall.thickness, opening);
        gap.width = Some(width);
        gap.height = wall.height;
        if opening == WallType::Door {
            gap.door_swing = Some(door_swing.unwrap_or(DoorSwing::Left));
            gap.door_type = Some(door_type.unwrap_or(DoorType::Standard));
        }

        let mut after = Wall::new(
            self.ids.next_id(),
            node_d,
            wall.end_node_id.clone(),
            wall.thickness,
            WallType::Wall,
        );
        after.height = wall.height;

        let gap_id = gap.id.clone();
        self.push_wall(before);
        self.push_wall(gap);
        self.push_wall(after);
        self.recalculate_areas();

        debug!(wall = %wall_id, opening = %gap_id, ?opening, "Inserted opening");
        Some(gap_id)
    }
}
