use anyhow::{bail, Result};

use crate::{
    AreaDescriptor, OsmReference, RingType, VectorArea, VectorAreaRing, VectorNode,
};

/// Groups the rings of one Mapbox polygon into areas. Rings arrive in order: every outer ring is
/// followed by its holes.
pub struct MapboxAreaHandler {
    rings: Vec<VectorAreaRing>,
    descriptor: AreaDescriptor,
}

impl MapboxAreaHandler {
    pub fn new(descriptor: AreaDescriptor) -> MapboxAreaHandler {
        MapboxAreaHandler {
            rings: Vec::new(),
            descriptor,
        }
    }

    /// The ring must be closed. Clockwise rings are outer, others are holes.
    pub fn add_ring(&mut self, ring: &[[f64; 2]]) -> Result<()> {
        match (ring.first(), ring.last()) {
            (Some(first), Some(last)) if first == last => {}
            (Some(_), Some(_)) => bail!("Invalid Mapbox ring: first and last points differ"),
            _ => bail!("Invalid Mapbox ring: no points"),
        }

        let ring_type = if is_ring_clockwise(ring) {
            RingType::Outer
        } else {
            RingType::Inner
        };
        self.rings.push(VectorAreaRing {
            ring_type,
            nodes: ring.iter().map(|[x, y]| VectorNode::vertex(*x, *y)).collect(),
        });
        Ok(())
    }

    pub fn get_features(&self) -> Result<Vec<VectorArea>> {
        let mut areas: Vec<VectorArea> = Vec::new();
        for ring in &self.rings {
            match ring.ring_type {
                RingType::Outer => {
                    areas.push(VectorArea {
                        rings: vec![ring.clone()],
                        osm_reference: OsmReference::none(),
                        descriptor: self.descriptor.clone(),
                    });
                }
                RingType::Inner => match areas.last_mut() {
                    Some(area) => area.rings.push(ring.clone()),
                    None => bail!("Invalid Mapbox ring order: a hole comes before any outer ring"),
                },
            }
        }
        Ok(areas)
    }
}

/// In the y-down frame of tiles, clockwise means the sum of (x2 - x1) * (y2 + y1) over every edge
/// is negative. The edge from the last point back to the first is included. Rotating the points
/// doesn't change the answer, and reversing them flips it.
pub fn is_ring_clockwise(ring: &[[f64; 2]]) -> bool {
    let mut sum = 0.0;
    for (idx, pt1) in ring.iter().enumerate() {
        let pt2 = ring.get(idx + 1).unwrap_or(&ring[0]);
        sum += (pt2[0] - pt1[0]) * (pt2[1] + pt1[1]);
    }
    sum < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: [[f64; 2]; 5] = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    fn reversed(ring: &[[f64; 2]]) -> Vec<[f64; 2]> {
        ring.iter().rev().cloned().collect()
    }

    #[test]
    fn winding() {
        assert!(!is_ring_clockwise(&SQUARE));
        assert!(is_ring_clockwise(&reversed(&SQUARE)));

        // Rotations of the distinct points, closed again
        let distinct = &SQUARE[..4];
        for shift in 0..4 {
            let mut rotated: Vec<[f64; 2]> = (0..4).map(|i| distinct[(i + shift) % 4]).collect();
            rotated.push(rotated[0]);
            assert!(!is_ring_clockwise(&rotated));
            assert!(is_ring_clockwise(&reversed(&rotated)));
        }
    }

    #[test]
    fn square_is_a_hole() {
        let mut handler = MapboxAreaHandler::new(AreaDescriptor::Water);
        handler.add_ring(&SQUARE).unwrap();
        assert_eq!(handler.rings[0].ring_type, RingType::Inner);
        // With no outer ring before it, grouping fails
        assert!(handler.get_features().is_err());
    }

    #[test]
    fn open_ring() {
        let mut handler = MapboxAreaHandler::new(AreaDescriptor::Water);
        assert!(handler
            .add_ring(&[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]])
            .is_err());
        assert!(handler.add_ring(&[]).is_err());
    }

    #[test]
    fn holes_follow_their_outer_ring() {
        let outer = reversed(&[[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0], [0.0, 0.0]]);
        let hole = [[2.0, 2.0], [2.0, 4.0], [4.0, 4.0], [4.0, 2.0], [2.0, 2.0]];
        let second = reversed(&[[20.0, 0.0], [20.0, 5.0], [25.0, 5.0], [25.0, 0.0], [20.0, 0.0]]);

        let mut handler = MapboxAreaHandler::new(AreaDescriptor::Forest);
        handler.add_ring(&outer).unwrap();
        handler.add_ring(&hole).unwrap();
        handler.add_ring(&second).unwrap();

        let areas = handler.get_features().unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].rings.len(), 2);
        assert_eq!(areas[0].rings[1].ring_type, RingType::Inner);
        assert_eq!(areas[1].rings.len(), 1);
        assert_eq!(areas[1].descriptor, AreaDescriptor::Forest);
    }
}
