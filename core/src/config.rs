//! Editor tunables.
//!
//! Every field has a serde default, so a partial JSON document (or `{}`)
//! yields a complete configuration.

use crate::error::PlanError;
use serde::{Deserialize, Serialize};

mod defaults {
    pub fn wall_thickness() -> f64 {
        20.0
    }

    pub fn floor_type() -> String {
        "default".to_string()
    }

    pub fn snap_radius() -> f64 {
        5.0
    }

    pub fn node_tolerance() -> f64 {
        5.0
    }

    pub fn grid_step() -> f64 {
        10.0
    }

    pub fn opening_margin() -> f64 {
        10.0
    }

    pub fn nearby_threshold() -> f64 {
        20.0
    }

    pub fn history_capacity() -> usize {
        50
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanConfig {
    /// Thickness given to walls created by `add_wall` and templates.
    #[serde(default = "defaults::wall_thickness")]
    pub default_wall_thickness: f64,
    /// Floor type assigned to newly detected areas.
    #[serde(default = "defaults::floor_type")]
    pub default_floor_type: String,
    /// An intersection closer than this to an existing node reuses the node.
    #[serde(default = "defaults::snap_radius")]
    pub merge_snap_radius: f64,
    /// Per-axis tolerance under which two nodes are the same corner.
    #[serde(default = "defaults::node_tolerance")]
    pub node_merge_tolerance: f64,
    #[serde(default = "defaults::grid_step")]
    pub grid_step: f64,
    /// Minimum length of the plain wall left on each side of a door/window.
    #[serde(default = "defaults::opening_margin")]
    pub opening_min_margin: f64,
    /// Pointer distance used by `node_near` and `wall_point_near`.
    #[serde(default = "defaults::nearby_threshold")]
    pub nearby_node_threshold: f64,
    #[serde(default = "defaults::history_capacity")]
    pub history_capacity: usize,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            default_wall_thickness: defaults::wall_thickness(),
            default_floor_type: defaults::floor_type(),
            merge_snap_radius: defaults::snap_radius(),
            node_merge_tolerance: defaults::node_tolerance(),
            grid_step: defaults::grid_step(),
            opening_min_margin: defaults::opening_margin(),
            nearby_node_threshold: defaults::nearby_threshold(),
            history_capacity: defaults::history_capacity(),
        }
    }
}

impl PlanConfig {
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        let config: PlanConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        let distances = [
            ("defaultWallThickness", self.default_wall_thickness),
            ("mergeSnapRadius", self.merge_snap_radius),
            ("nodeMergeTolerance", self.node_merge_tolerance),
            ("gridStep", self.grid_step),
            ("openingMinMargin", self.opening_min_margin),
            ("nearbyNodeThreshold", self.nearby_node_threshold),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlanError::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if self.history_capacity == 0 {
            return Err(PlanError::InvalidConfig(
                "historyCapacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
