use crate::error::PlanError;
use crate::history::FloorSnapshot;
use crate::plan::PlanGraph;
use crate::topo::{FloorId, LayoutId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One level of the building. The graph fields sit at the top level of the
/// floor's JSON object next to its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Floor {
    pub id: FloorId,
    pub name: String,
    pub level: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(flatten)]
    pub graph: PlanGraph,
    #[serde(default)]
    pub fixtures: Vec<Value>,
}

impl Floor {
    pub fn new(id: FloorId, name: impl Into<String>, level: i32) -> Self {
        Self {
            id,
            name: name.into(),
            level,
            floor_type: None,
            width: None,
            height: None,
            graph: PlanGraph::new(),
            fixtures: Vec::new(),
        }
    }

    /// Deep copy of everything undo restores.
    pub fn snapshot(&self) -> FloorSnapshot {
        FloorSnapshot {
            nodes: self.graph.nodes().to_vec(),
            walls: self.graph.walls().to_vec(),
            areas: self.graph.areas().to_vec(),
            fixtures: self.fixtures.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: FloorSnapshot) {
        self.graph.replace_contents(snapshot.nodes, snapshot.walls, snapshot.areas);
        self.fixtures = snapshot.fixtures;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub id: LayoutId,
    pub name: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub floors: Vec<Floor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_floor_id: Option<FloorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_type: Option<String>,
}

impl Layout {
    pub fn new(id: LayoutId, name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id,
            name: name.into(),
            width,
            height,
            floors: Vec::new(),
            current_floor_id: None,
            floor_type: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, PlanError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn floor(&self, id: &FloorId) -> Option<&Floor> {
        self.floors.iter().find(|f| &f.id == id)
    }

    pub fn floor_mut(&mut self, id: &FloorId) -> Option<&mut Floor> {
        self.floors.iter_mut().find(|f| &f.id == id)
    }

    pub fn current_floor(&self) -> Option<&Floor> {
        self.current_floor_id.as_ref().and_then(|id| self.floor(id))
    }

    pub fn current_floor_mut(&mut self) -> Option<&mut Floor> {
        let id = self.current_floor_id.clone()?;
        self.floor_mut(&id)
    }

    pub fn has_level(&self, level: i32) -> bool {
        self.floors.iter().any(|f| f.level == level)
    }
}
