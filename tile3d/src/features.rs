use geom::Bounds3D;
use serde::{Deserialize, Serialize};
use vector_features::{OsmReference, PointDescriptor, TreeType};

/// One building or building part. Arrays hold one entry per vertex: 3 floats of position and
/// normal, 2 of uv, one texture id, and 4 bytes of RGBA color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile3DExtrudedGeometry {
    pub osm_reference: OsmReference,
    pub bounding_box: Bounds3D,
    pub position: Vec<f32>,
    pub normal: Vec<f32>,
    pub uv: Vec<f32>,
    pub texture_id: Vec<u8>,
    pub color: Vec<u8>,
}

/// Ground decals of one feature, drawn in order of `z_index`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile3DProjectedGeometry {
    pub z_index: f64,
    pub bounding_box: Bounds3D,
    pub position: Vec<f32>,
    pub normal: Vec<f32>,
    pub uv: Vec<f32>,
    pub texture_id: Vec<u8>,
}

/// Water surfaces and waterways, following the terrain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile3DHuggingGeometry {
    pub bounding_box: Bounds3D,
    pub position: Vec<f32>,
    pub normal: Vec<f32>,
    pub uv: Vec<f32>,
    pub texture_id: Vec<u8>,
}

/// Footprints where the terrain's own texture should be hidden, as `[x, z]` pairs forming
/// triangles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile3DTerrainMaskGeometry {
    pub position: Vec<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile3DLabel {
    pub text: String,
    pub priority: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InstanceType {
    GenericTree,
    PineTree,
    OakTree,
    LindenTree,
    BeechTree,
    FirTree,
    Shrub,
    Hydrant,
    StreetLamp,
    AdColumn,
    Bench,
    PicnicTable,
    BusStop,
    TransmissionTower,
    UtilityPole,
    WindTurbine,
    Bollard,
}

impl InstanceType {
    pub fn tree(tree_type: TreeType) -> InstanceType {
        match tree_type {
            TreeType::Generic => InstanceType::GenericTree,
            TreeType::Pine => InstanceType::PineTree,
            TreeType::Oak => InstanceType::OakTree,
            TreeType::Linden => InstanceType::LindenTree,
            TreeType::Beech => InstanceType::BeechTree,
            TreeType::Fir => InstanceType::FirTree,
        }
    }

    /// None for descriptors that aren't placed as instances, like labels.
    pub fn from_descriptor(descriptor: &PointDescriptor) -> Option<InstanceType> {
        Some(match descriptor {
            PointDescriptor::Tree { tree_type, .. } => InstanceType::tree(*tree_type),
            PointDescriptor::Hydrant => InstanceType::Hydrant,
            PointDescriptor::StreetLamp => InstanceType::StreetLamp,
            PointDescriptor::AdColumn => InstanceType::AdColumn,
            PointDescriptor::Bench => InstanceType::Bench,
            PointDescriptor::PicnicTable => InstanceType::PicnicTable,
            PointDescriptor::BusStop => InstanceType::BusStop,
            PointDescriptor::TransmissionTower => InstanceType::TransmissionTower,
            PointDescriptor::UtilityPole => InstanceType::UtilityPole,
            PointDescriptor::WindTurbine { .. } => InstanceType::WindTurbine,
            PointDescriptor::Bollard => InstanceType::Bollard,
            PointDescriptor::Label { .. } => return None,
        })
    }

    /// Vegetation is dense enough that the low-detail level can skip some of it.
    pub fn is_reducible(self) -> bool {
        matches!(
            self,
            InstanceType::GenericTree
                | InstanceType::PineTree
                | InstanceType::OakTree
                | InstanceType::LindenTree
                | InstanceType::BeechTree
                | InstanceType::FirTree
                | InstanceType::Shrub
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile3DInstance {
    pub instance_type: InstanceType,
    pub x: f64,
    /// Height
    pub y: f64,
    pub z: f64,
    pub scale: f64,
    /// Radians
    pub rotation: f64,
}

/// Everything built for one tile, grouped by how it's rendered.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tile3DFeatureCollection {
    pub x: u32,
    pub y: u32,
    pub zoom: u32,
    pub extruded: Vec<Tile3DExtrudedGeometry>,
    pub projected: Vec<Tile3DProjectedGeometry>,
    pub hugging: Vec<Tile3DHuggingGeometry>,
    pub terrain_mask: Vec<Tile3DTerrainMaskGeometry>,
    pub labels: Vec<Tile3DLabel>,
    pub instances: Vec<Tile3DInstance>,
}

impl Tile3DFeatureCollection {
    pub fn new(x: u32, y: u32, zoom: u32) -> Tile3DFeatureCollection {
        Tile3DFeatureCollection {
            x,
            y,
            zoom,
            ..Default::default()
        }
    }
}
