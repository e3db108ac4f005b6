//! Maps freshly detected cycles back onto the previous area list.
//!
//! Detection knows nothing about names, floor types or locks. Reconciliation
//! carries that state across by matching node sets, and keeps "broken" areas
//! alive while an edit has their wall loop open.

use crate::plan::types::{Area, Node};
use crate::topo::{AreaId, IdGenerator, NodeId};
use std::collections::HashSet;
use tracing::debug;

/// What happened to each area during one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    /// Previous areas matched by an identical node set.
    pub kept: Vec<AreaId>,
    /// Areas minted for cycles with no previous match.
    pub created: Vec<AreaId>,
    /// Previous areas with an open loop that were kept as is.
    pub preserved_broken: Vec<AreaId>,
    /// Previous areas that were orphaned or absorbed into a larger face.
    pub dropped: Vec<AreaId>,
}

#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub areas: Vec<Area>,
    pub report: ReconcileReport,
}

/// Build the new area list: detected cycles first, in detection order, then
/// preserved broken areas in their previous order.
pub fn reconcile_areas(
    previous: &[Area],
    cycles: Vec<Vec<NodeId>>,
    nodes: &[Node],
    ids: &mut IdGenerator,
    default_floor_type: &str,
) -> ReconcileOutcome {
    let mut report = ReconcileReport::default();
    let mut areas = Vec::with_capacity(cycles.len());

    for (index, cycle) in cycles.into_iter().enumerate() {
        let area = match previous.iter().find(|prev| prev.has_node_set(&cycle)) {
            Some(prev) => {
                report.kept.push(prev.id.clone());
                let floor_type_id = if prev.floor_type_id.is_empty() {
                    default_floor_type.to_string()
                } else {
                    prev.floor_type_id.clone()
                };
                Area {
                    id: prev.id.clone(),
                    name: prev.name.clone(),
                    node_ids: cycle,
                    floor_type_id,
                    visible: true,
                    locked_size: prev.locked_size,
                    locked_dimension: prev.locked_dimension,
                    rotation: prev.rotation,
                }
            }
            None => {
                let id: AreaId = ids.next_id();
                report.created.push(id.clone());
                Area {
                    id,
                    name: format!("Area {}", index + 1),
                    node_ids: cycle,
                    floor_type_id: default_floor_type.to_string(),
                    visible: true,
                    locked_size: false,
                    locked_dimension: false,
                    rotation: None,
                }
            }
        };
        areas.push(area);
    }

    let live_nodes: HashSet<&NodeId> = nodes.iter().map(|n| &n.id).collect();
    let mut preserved = Vec::new();

    for prev in previous {
        if report.kept.contains(&prev.id) {
            continue;
        }
        if should_preserve(prev, &areas, &live_nodes) {
            report.preserved_broken.push(prev.id.clone());
            preserved.push(prev.clone());
        } else {
            report.dropped.push(prev.id.clone());
        }
    }

    areas.extend(preserved);

    debug!(
        kept = report.kept.len(),
        created = report.created.len(),
        preserved = report.preserved_broken.len(),
        dropped = report.dropped.len(),
        "Area reconciliation"
    );

    ReconcileOutcome { areas, report }
}

/// A leftover area survives when some of its nodes still exist, no detected
/// area has exactly its node set, and it was not absorbed into a larger face.
fn should_preserve(prev: &Area, detected: &[Area], live_nodes: &HashSet<&NodeId>) -> bool {
    let has_live_node = prev.node_ids.iter().any(|id| live_nodes.contains(id));
    if !has_live_node {
        return false;
    }

    detected.iter().all(|area| {
        let exact = area.has_node_set(&prev.node_ids);
        let absorbed = prev.node_ids.len() < area.node_ids.len()
            && prev.node_ids.iter().all(|id| area.node_ids.contains(id));
        !exact && !absorbed
    })
}
