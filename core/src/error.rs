use crate::topo::FloorId;
use thiserror::Error;

/// Errors raised at the crate boundary: loading layouts and configuration,
/// and managing floors. Graph edits never fail; they log and do nothing.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Floor not found: {0}")]
    UnknownFloor(FloorId),
    #[error("Floor level {0} already exists")]
    DuplicateFloorLevel(i32),
    #[error("Layout has no current floor")]
    NoCurrentFloor,
}
