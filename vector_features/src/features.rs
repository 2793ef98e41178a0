use geom::Pt2D;
use serde::{Deserialize, Serialize};

use crate::{AreaDescriptor, PointDescriptor, PolylineDescriptor};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OsmReferenceType {
    None,
    Node,
    Way,
    Relation,
}

/// Points back to the OSM object a feature was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OsmReference {
    pub id: u64,
    pub ref_type: OsmReferenceType,
}

impl OsmReference {
    pub fn new(ref_type: OsmReferenceType, id: u64) -> OsmReference {
        OsmReference { id, ref_type }
    }

    /// For features with no OSM source, like Mapbox polygons.
    pub fn none() -> OsmReference {
        OsmReference {
            id: 0,
            ref_type: OsmReferenceType::None,
        }
    }
}

/// A point in tile-local meters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorNode {
    pub x: f64,
    pub y: f64,
    /// Radians
    pub rotation: f64,
    pub osm_reference: Option<OsmReference>,
    pub descriptor: Option<PointDescriptor>,
}

impl VectorNode {
    /// An unclassified vertex of some ring or polyline.
    pub fn vertex(x: f64, y: f64) -> VectorNode {
        VectorNode {
            x,
            y,
            rotation: 0.0,
            osm_reference: None,
            descriptor: None,
        }
    }

    pub fn pt(&self) -> Pt2D {
        Pt2D::new(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RingType {
    Outer,
    Inner,
}

/// A closed loop of nodes. The first and last node coincide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorAreaRing {
    pub ring_type: RingType,
    pub nodes: Vec<VectorNode>,
}

impl VectorAreaRing {
    pub fn points(&self) -> Vec<Pt2D> {
        self.nodes.iter().map(|n| n.pt()).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorArea {
    pub rings: Vec<VectorAreaRing>,
    pub osm_reference: OsmReference,
    pub descriptor: AreaDescriptor,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorPolyline {
    pub nodes: Vec<VectorNode>,
    pub osm_reference: OsmReference,
    pub descriptor: PolylineDescriptor,
}

impl VectorPolyline {
    pub fn points(&self) -> Vec<Pt2D> {
        self.nodes.iter().map(|n| n.pt()).collect()
    }
}

/// Everything classified for one tile. Nodes here always have a descriptor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorFeatureCollection {
    pub nodes: Vec<VectorNode>,
    pub polylines: Vec<VectorPolyline>,
    pub areas: Vec<VectorArea>,
}

impl VectorFeatureCollection {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.polylines.is_empty() && self.areas.is_empty()
    }

    pub fn extend(&mut self, other: VectorFeatureCollection) {
        self.nodes.extend(other.nodes);
        self.polylines.extend(other.polylines);
        self.areas.extend(other.areas);
    }
}
