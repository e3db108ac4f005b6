use serde::{Deserialize, Serialize};
use std::fmt;

/// Length unit of plan coordinates. Layouts are drawn in centimeters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum LengthUnit {
    Millimeter,
    #[default]
    Centimeter,
    Meter,
}

impl LengthUnit {
    fn meters_per_unit(&self) -> f64 {
        match self {
            Self::Millimeter => 0.001,
            Self::Centimeter => 0.01,
            Self::Meter => 1.0,
        }
    }

    pub fn to_meters(&self, value: f64) -> f64 {
        value * self.meters_per_unit()
    }

    /// Convert an area measured in this unit squared to m².
    pub fn area_to_square_meters(&self, area: f64) -> f64 {
        let k = self.meters_per_unit();
        area * k * k
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millimeter => write!(f, "mm"),
            Self::Centimeter => write!(f, "cm"),
            Self::Meter => write!(f, "m"),
        }
    }
}
