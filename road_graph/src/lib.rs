//! A planar graph of road center-lines, built per tile. Roads are registered into logical
//! groups (roadways, footways, cycleways, ...). Vertices of roads in the same group that coincide
//! are merged into intersections, and junctions with more than two directions get a covering
//! polygon.
//!
//! Roads, vertices and intersections live in arenas owned by the `RoadGraph` and are addressed
//! by integer IDs. The link from a vertex to its intersection is a lookup table, not a pointer.

#[macro_use]
extern crate log;

mod graph;
mod intersection;
mod road;
mod segment_group;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use crate::graph::{IntersectionPolygon, RoadGraph, INTERSECTION_EPSILON};
pub use crate::intersection::{Direction, Intersection};
pub use crate::road::{LinkedVertex, Road};
pub use crate::segment_group::SegmentGroup;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoadID(pub usize);

impl fmt::Display for RoadID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Road #{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexID(pub usize);

impl fmt::Display for VertexID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Vertex #{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntersectionID(pub usize);

impl fmt::Display for IntersectionID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Intersection #{}", self.0)
    }
}

/// Roads only merge with other roads in the same group.
pub type GroupID = u32;
