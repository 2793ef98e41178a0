//! One handler per feature shape. Each turns a classified feature into output for one or two
//! categories of the tile.

mod area;
mod node;
mod polyline;

use road_graph::{GroupID, RoadGraph};
use vector_features::{PathSide, PathType};

use crate::{TerrainGrid, Tile3DOptions};

pub use self::area::handle_area;
pub use self::node::handle_node;
pub use self::polyline::handle_polyline;

/// Read-only state shared by every handler while building one tile.
pub struct TileContext<'a> {
    pub grid: &'a TerrainGrid,
    pub graph: &'a RoadGraph,
    pub options: &'a Tile3DOptions,
}

/// Draw order of ground-level geometry. Higher is on top.
pub mod z_index {
    pub const FARMLAND: f64 = 1.0;
    pub const GRASS: f64 = 2.0;
    pub const SAND: f64 = 3.0;
    pub const ROCK: f64 = 3.0;
    pub const GARDEN: f64 = 4.0;
    pub const MANICURED_GRASS: f64 = 4.0;
    pub const CONSTRUCTION: f64 = 5.0;
    pub const PAVEMENT: f64 = 6.0;
    pub const PITCH: f64 = 7.0;
    pub const HELIPAD: f64 = 7.0;
    pub const ASPHALT: f64 = 8.0;
    pub const ROADWAY_AREA: f64 = 9.0;
    pub const SIDEWALK: f64 = 10.0;
    pub const SIDE_CYCLEWAY: f64 = 11.0;
    pub const FOOTWAY: f64 = 12.0;
    pub const CYCLEWAY: f64 = 12.0;
    pub const ROADWAY: f64 = 13.0;
    pub const RUNWAY: f64 = 13.0;
    pub const JUNCTION: f64 = 14.0;
    pub const RAILWAY: f64 = 15.0;
    pub const TRAMWAY: f64 = 16.0;
    pub const BARRIER: f64 = 20.0;
}

/// Paths that take part in junctions, grouped so that only paths of the same kind and side
/// merge. None for everything else.
pub fn path_group(path_type: PathType, side: Option<PathSide>) -> Option<GroupID> {
    let kind = match path_type {
        PathType::Roadway => 0,
        PathType::Footway => 1,
        PathType::Cycleway => 2,
        _ => return None,
    };
    let side = match side {
        None => 0,
        Some(PathSide::Both) => 1,
        Some(PathSide::Left) => 2,
        Some(PathSide::Right) => 3,
    };
    Some(kind * 4 + side)
}

/// The group of plain roadways, whose junctions get their own polygons.
pub const ROADWAY_GROUP: GroupID = 0;
