//! Merging two areas into one.
//!
//! The merge works on the wall graph, not on the area records:
//! 1. Intersect every boundary wall of A with every boundary wall of B
//! 2. Split walls at the (grid-snapped) intersection points
//! 3. Unify B's corners with coincident corners of A
//! 4. Rewrite walls through that mapping, dropping degenerate and duplicate walls
//! 5. Drop walls both rooms now share, so the common side disappears
//! 6. Forget both areas and re-detect; the union surfaces as a new face

use crate::geometry::utils_2d::{distance, point_to_segment_distance, round_to_grid, segment_intersection, within_box};
use crate::geometry::Point2;
use crate::plan::graph::PlanGraph;
use crate::plan::types::{Area, Node};
use crate::topo::{AreaId, NodeId, WallId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Bookkeeping of one merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    pub intersections: usize,
    pub walls_split: usize,
    pub nodes_merged: usize,
    pub walls_removed: usize,
    /// Areas minted by the final detection pass.
    pub created: Vec<AreaId>,
}

/// Boundary wall intersection between the two areas.
struct Crossing {
    wall_a: WallId,
    wall_b: WallId,
    point: Point2,
}

impl PlanGraph {
    /// Merge area `b` into area `a`. Returns `None` (and changes nothing)
    /// when either area is unknown or both ids are the same.
    pub fn merge_areas(&mut self, a: &AreaId, b: &AreaId) -> Option<MergeReport> {
        if a == b {
            warn!(area = %a, "merge_areas: cannot merge an area with itself");
            return None;
        }
        let (Some(area_a), Some(area_b)) = (self.area(a).cloned(), self.area(b).cloned()) else {
            warn!(a = %a, b = %b, "merge_areas: one or both areas not found");
            return None;
        };

        let areas_before: HashSet<AreaId> = self.areas().iter().map(|x| x.id.clone()).collect();
        let mut report = MergeReport::default();

        // 1. Crossings between the two boundaries
        let crossings = self.crossings(&area_a, &area_b);
        report.intersections = crossings.len();

        // 2. Split at each crossing. Each split is its own detection pass.
        let mut side_a = area_a.node_ids.clone();
        let mut side_b = area_b.node_ids.clone();
        let mut pieces: HashMap<WallId, Vec<WallId>> = HashMap::new();

        for crossing in &crossings {
            let snap = self.config.merge_snap_radius;
            let (junction, reused) = match self.find_nearby_node(crossing.point[0], crossing.point[1], snap) {
                Some(node) => (node.id.clone(), true),
                None => {
                    let id: NodeId = self.ids.next_id();
                    self.push_node(Node::new(id.clone(), crossing.point[0], crossing.point[1]));
                    (id, false)
                }
            };

            let mut split_any = false;
            for (wall, side) in [(&crossing.wall_a, &mut side_a), (&crossing.wall_b, &mut side_b)] {
                if self.split_piece(&mut pieces, wall, &junction) {
                    report.walls_split += 1;
                    split_any = true;
                    if !side.contains(&junction) {
                        side.push(junction.clone());
                    }
                }
            }

            if !reused && !split_any {
                self.nodes_mut().retain(|n| n.id != junction);
            }
        }

        // 3. Corner unification, first match wins
        let tolerance = self.config.node_merge_tolerance;
        let positions_a: Vec<(NodeId, Point2)> = side_a
            .iter()
            .filter_map(|id| self.node_position(id).map(|p| (id.clone(), p)))
            .collect();

        let mut mapping: HashMap<NodeId, NodeId> = HashMap::new();
        for id in &side_b {
            if side_a.contains(id) {
                continue;
            }
            let Some(pos) = self.node_position(id) else {
                continue;
            };
            if let Some((target, _)) = positions_a.iter().find(|(_, p)| within_box(*p, pos, tolerance)) {
                mapping.insert(id.clone(), target.clone());
            }
        }
        report.nodes_merged = mapping.len();

        // 4. Rewrite walls, then drop degenerate and duplicate ones
        let walls_before = self.walls().len();
        for wall in self.walls_mut().iter_mut() {
            if let Some(target) = mapping.get(&wall.start_node_id) {
                wall.start_node_id = target.clone();
            }
            if let Some(target) = mapping.get(&wall.end_node_id) {
                wall.end_node_id = target.clone();
            }
        }

        let mut seen = HashSet::new();
        self.walls_mut()
            .retain(|w| !w.is_degenerate() && seen.insert(w.pair_key()));

        // 5. Shared sides
        let set_a: HashSet<NodeId> = side_a.iter().cloned().collect();
        let set_b: HashSet<NodeId> = side_b
            .iter()
            .map(|id| mapping.get(id).unwrap_or(id).clone())
            .collect();
        self.walls_mut().retain(|w| {
            let ends = [&w.start_node_id, &w.end_node_id];
            !ends.iter().all(|n| set_a.contains(*n) && set_b.contains(*n))
        });
        report.walls_removed = walls_before - self.walls().len();

        // 6. Forget mapped-away nodes and both areas
        self.nodes_mut().retain(|n| !mapping.contains_key(&n.id));

        let merged: HashSet<&NodeId> = set_a.union(&set_b).collect();
        for area in self.areas_mut().iter_mut() {
            remap_area_nodes(area, &mapping);
        }
        self.areas_mut().retain(|area| {
            let original = &area.id == a || &area.id == b;
            let born_in_merge = !areas_before.contains(&area.id) && area.node_ids.iter().all(|n| merged.contains(n));
            !original && !born_in_merge
        });

        let pass = self.recalculate_areas();
        report.created = pass.created;

        info!(
            a = %a,
            b = %b,
            intersections = report.intersections,
            split = report.walls_split,
            merged_nodes = report.nodes_merged,
            removed_walls = report.walls_removed,
            "Merged areas"
        );
        Some(report)
    }

    /// Areas that `id` could be merged with: at least two corners within the
    /// node tolerance of the other's corners, or crossing boundary walls.
    pub fn find_mergeable_areas(&self, id: &AreaId) -> Vec<AreaId> {
        let Some(area) = self.area(id) else {
            return Vec::new();
        };
        let tolerance = self.config.node_merge_tolerance;
        let corners = self.corner_positions(area);

        self.areas()
            .iter()
            .filter(|other| other.id != area.id)
            .filter(|other| {
                let other_corners = self.corner_positions(other);
                let shared = corners
                    .iter()
                    .filter(|p| other_corners.iter().any(|q| within_box(**p, *q, tolerance)))
                    .count();
                shared >= 2 || !self.crossings(area, other).is_empty()
            })
            .map(|other| other.id.clone())
            .collect()
    }

    fn corner_positions(&self, area: &Area) -> Vec<Point2> {
        area.node_ids.iter().filter_map(|n| self.node_position(n)).collect()
    }

    fn crossings(&self, area_a: &Area, area_b: &Area) -> Vec<Crossing> {
        let grid = self.config.grid_step;
        let walls_b: Vec<(WallId, Point2, Point2)> = self
            .boundary_walls(area_b)
            .into_iter()
            .filter_map(|w| self.segment_of(w).map(|(s, e)| (w.id.clone(), s, e)))
            .collect();

        let mut crossings = Vec::new();
        for wall_a in self.boundary_walls(area_a) {
            let Some((a1, a2)) = self.segment_of(wall_a) else {
                continue;
            };
            for (wall_b, b1, b2) in &walls_b {
                if let Some(p) = segment_intersection(a1, a2, *b1, *b2) {
                    crossings.push(Crossing {
                        wall_a: wall_a.id.clone(),
                        wall_b: wall_b.clone(),
                        point: [round_to_grid(p[0], grid), round_to_grid(p[1], grid)],
                    });
                }
            }
        }
        crossings
    }

    /// Split whichever current piece of `original` passes through `junction`.
    ///
    /// Nothing happens when the junction is already a corner of that piece,
    /// lies within the snap radius of one of its ends, or is off the wall.
    fn split_piece(&mut self, pieces: &mut HashMap<WallId, Vec<WallId>>, original: &WallId, junction: &NodeId) -> bool {
        let Some(at) = self.node_position(junction) else {
            return false;
        };
        let snap = self.config.merge_snap_radius;
        let family = pieces.entry(original.clone()).or_insert_with(|| vec![original.clone()]);

        let closest = family
            .iter()
            .filter_map(|id| {
                let wall = self.wall(id)?;
                let (s, e) = self.segment_of(wall)?;
                Some((id.clone(), wall.touches(junction), s, e, point_to_segment_distance(s, e, at)))
            })
            .min_by(|x, y| x.4.total_cmp(&y.4));

        let Some((piece, touches, start, end, offset)) = closest else {
            return false;
        };
        if touches || offset > snap || distance(start, at) < snap || distance(end, at) < snap {
            return false;
        }

        let Some(halves) = self.split_at_node(&piece, junction) else {
            return false;
        };
        family.retain(|id| id != &piece);
        family.extend(halves);

        debug!(wall = %piece, node = %junction, "Split wall at merge junction");
        self.recalculate_areas();
        true
    }
}

/// Rewrite an area's node ids through the merge mapping, collapsing repeats.
fn remap_area_nodes(area: &mut Area, mapping: &HashMap<NodeId, NodeId>) {
    if !area.node_ids.iter().any(|n| mapping.contains_key(n)) {
        return;
    }
    let mut remapped: Vec<NodeId> = Vec::with_capacity(area.node_ids.len());
    for id in &area.node_ids {
        let id = mapping.get(id).unwrap_or(id);
        if !remapped.contains(id) {
            remapped.push(id.clone());
        }
    }
    area.node_ids = remapped;
}
