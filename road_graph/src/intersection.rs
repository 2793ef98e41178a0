use geom::{Pt2D, EPSILON_DIST};

use crate::{IntersectionID, RoadGraph, RoadID, VertexID};

/// One way out of an intersection: a road, and the vertex of that road adjacent to the center.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Direction {
    pub road: RoadID,
    pub vertex: VertexID,
}

/// A point where two or more roads of the same group meet.
#[derive(Clone, Debug)]
pub struct Intersection {
    pub id: IntersectionID,
    pub center: Pt2D,
    pub directions: Vec<Direction>,
}

impl Intersection {
    pub fn new(id: IntersectionID, center: Pt2D) -> Intersection {
        Intersection {
            id,
            center,
            directions: Vec::new(),
        }
    }

    pub fn add_direction(&mut self, road: RoadID, vertex: VertexID) {
        self.directions.push(Direction { road, vertex });
    }

    /// A closed polygon covering the junction. Directions are walked in order of their angle
    /// around the center; each contributes two corners, one per side of its road, pushed out to
    /// the junction radius. The radius is the widest half-width of any road here, but never past
    /// the adjacent vertex.
    pub fn polygon(&self, graph: &RoadGraph) -> Vec<Pt2D> {
        let radius = self
            .directions
            .iter()
            .map(|d| graph.road(d.road).half_width())
            .fold(0.0, f64::max);

        let mut spokes: Vec<(f64, Pt2D, f64, f64)> = Vec::new();
        for d in &self.directions {
            let toward = graph.vertex(d.vertex).pos;
            let delta = toward - self.center;
            let dir = match delta.normalize() {
                Some(dir) => dir,
                None => continue,
            };
            let reach = radius.min(delta.length());
            spokes.push((
                self.center.angle_to(toward).normalized_radians(),
                dir,
                reach,
                graph.road(d.road).half_width(),
            ));
        }
        spokes.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut pts: Vec<Pt2D> = Vec::new();
        for (_, dir, reach, half_width) in spokes {
            let along = self.center + dir.scale(reach);
            // perpendicular() points towards smaller angles
            let side = dir.perpendicular().scale(half_width);
            for pt in [along + side, along - side] {
                if pts
                    .last()
                    .map(|last| !last.approx_eq(pt, EPSILON_DIST))
                    .unwrap_or(true)
                {
                    pts.push(pt);
                }
            }
        }
        if let Some(first) = pts.first().cloned() {
            pts.push(first);
        }
        pts
    }
}
