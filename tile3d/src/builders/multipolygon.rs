use geom::{Bounds, Pt2D, Ring};
use vector_features::{RingType, VectorArea};

#[derive(Clone, Debug, PartialEq)]
pub struct Tile3DRing {
    pub ring_type: RingType,
    /// Closed or not; rings are closed when they're used.
    pub nodes: Vec<Pt2D>,
}

/// Outer rings plus holes, in any order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tile3DMultipolygon {
    pub rings: Vec<Tile3DRing>,
}

impl Tile3DMultipolygon {
    pub fn new() -> Tile3DMultipolygon {
        Tile3DMultipolygon::default()
    }

    pub fn from_area(area: &VectorArea) -> Tile3DMultipolygon {
        let mut mp = Tile3DMultipolygon::new();
        for ring in &area.rings {
            mp.add_ring(ring.ring_type, ring.points());
        }
        mp
    }

    pub fn add_ring(&mut self, ring_type: RingType, nodes: Vec<Pt2D>) {
        self.rings.push(Tile3DRing { ring_type, nodes });
    }

    /// Every usable outer ring with the holes it contains. Outer rings come back with positive
    /// signed area and holes with negative. Rings that can't be closed or have no area are
    /// skipped, and so are holes outside of every outer ring.
    pub fn polygons(&self) -> Vec<(Ring, Vec<Ring>)> {
        let mut result: Vec<(Ring, Vec<Ring>)> = Vec::new();
        let mut holes = Vec::new();
        for ring in &self.rings {
            let closed = match Ring::must_close(ring.nodes.clone()) {
                Ok(r) => r,
                Err(err) => {
                    debug!("Skipping a ring: {}", err);
                    continue;
                }
            };
            if closed.area() < geom::EPSILON_DIST * geom::EPSILON_DIST {
                debug!("Skipping a ring with no area");
                continue;
            }
            match ring.ring_type {
                RingType::Outer => {
                    let outer = if closed.signed_area() > 0.0 {
                        closed
                    } else {
                        closed.reversed()
                    };
                    result.push((outer, Vec::new()));
                }
                RingType::Inner => {
                    holes.push(if closed.signed_area() < 0.0 {
                        closed
                    } else {
                        closed.reversed()
                    });
                }
            }
        }

        for hole in holes {
            let pt = hole.points()[0];
            if let Some((_, list)) = result.iter_mut().find(|(outer, _)| outer.contains_pt(pt)) {
                list.push(hole);
            } else {
                debug!("Skipping a hole that isn't inside any outer ring");
            }
        }
        result
    }

    pub fn get_bounds(&self) -> Bounds {
        let mut bounds = Bounds::new();
        for ring in &self.rings {
            if ring.ring_type == RingType::Outer {
                for pt in &ring.nodes {
                    bounds.update(*pt);
                }
            }
        }
        bounds
    }
}
