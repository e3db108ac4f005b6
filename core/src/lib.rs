pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod history;
pub mod plan;
pub mod topo;
pub mod units;

pub use config::PlanConfig;
pub use editor::{CommitSink, Editor, Floor, Layout, SelectionSink};
pub use error::PlanError;
pub use history::{FloorSnapshot, History};
pub use plan::PlanGraph;

pub fn version() -> &'static str {
    "0.1.0"
}
