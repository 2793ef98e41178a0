use geom::Pt2D;

use crate::{GroupID, RoadID, VertexID};

/// One center-line registered in the graph. Its vertices are stored in the graph's vertex arena.
#[derive(Clone, Debug)]
pub struct Road {
    pub id: RoadID,
    pub group: GroupID,
    pub width: f64,
    /// In order along the road. Always at least two.
    pub vertices: Vec<VertexID>,
}

impl Road {
    pub fn first_vertex(&self) -> VertexID {
        self.vertices[0]
    }

    pub fn last_vertex(&self) -> VertexID {
        self.vertices[self.vertices.len() - 1]
    }

    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }
}

/// A vertex of exactly one road, linked to its neighbours along that road.
#[derive(Clone, Debug)]
pub struct LinkedVertex {
    pub id: VertexID,
    pub road: RoadID,
    pub pos: Pt2D,
    pub next: Option<VertexID>,
    pub prev: Option<VertexID>,
}
