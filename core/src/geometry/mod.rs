//! Plan-space geometry.
//!
//! Points are `[x, y]` pairs in plan units (centimeters). The y axis points
//! down, as on screen.

pub type Point2 = [f64; 2];

pub const EPSILON: f64 = 1e-6;

pub mod utils_2d;
pub use utils_2d::{
    closest_point_on_segment, distance, point_to_segment_distance, polygon_area,
    polygon_signed_area, round_to_grid, segment_intersection,
};
