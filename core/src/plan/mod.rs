//! Floor plan graph: nodes joined by walls, and the rooms they enclose.

pub mod detection;
pub mod graph;
pub mod import;
pub mod merge;
pub mod openings;
pub mod outline;
pub mod reconcile;
pub mod templates;
pub mod types;

pub use detection::{cycle_signed_area, detect_areas};
pub use graph::{PlanGraph, WallPoint};
pub use import::ImportReport;
pub use merge::MergeReport;
pub use reconcile::{reconcile_areas, ReconcileOutcome, ReconcileReport};
pub use templates::AreaTemplate;
pub use types::*;

#[cfg(test)]
mod tests_detection;
#[cfg(test)]
mod tests_merge;
