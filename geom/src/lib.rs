//! Geometry primitives for tile-local map space. Units are meters; x grows east and y grows
//! south, matching tile coordinates. 3D positions put the 2D y into z and use y for height.

mod angle;
mod bounds;
mod line;
mod polyline;
mod pt;
mod ring;
mod tessellation;

pub use crate::angle::Angle;
pub use crate::bounds::{Bounds, Bounds3D};
pub use crate::line::Line;
pub use crate::polyline::PolyLine;
pub use crate::pt::{Pt2D, Pt3D};
pub use crate::ring::Ring;
pub use crate::tessellation::{triangulate, Triangle};

/// Segments shorter than this are considered degenerate.
pub const EPSILON_DIST: f64 = 1e-4;

const EARTH_CIRCUMFERENCE: f64 = 40075016.68;

/// The width of one web-mercator tile in meters at some zoom level.
pub fn tile_size(zoom: u32) -> f64 {
    EARTH_CIRCUMFERENCE / 2.0_f64.powi(zoom as i32)
}
