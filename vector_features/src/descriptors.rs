//! Descriptors say what a feature is, with whatever attributes the geometry builders need.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AreaDescriptor {
    Building(BuildingParams),
    BuildingPart(BuildingParams),
    BuildingConstruction,
    Sand,
    Rock,
    Pitch { pitch_type: PitchType },
    ManicuredGrass,
    Garden,
    Grass,
    Water,
    Construction,
    Asphalt,
    RoadwayArea,
    Pavement,
    Helipad,
    Forest,
    Shrubbery,
    Farmland,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingParams {
    /// Meters above the ground, including the roof
    pub height: f64,
    pub min_height: f64,
    pub levels: u32,
    pub roof_height: f64,
    pub roof_type: RoofType,
    pub roof_material: RoofMaterial,
    /// 0xRRGGBB
    pub roof_color: u32,
    pub roof_orientation: Option<RoofOrientation>,
    /// Degrees clockwise from north
    pub roof_direction: Option<f64>,
    pub facade_material: FacadeMaterial,
    pub facade_color: u32,
    pub windows: bool,
    /// False for `building=roof` and friends, which are only a roof on pillars
    pub has_walls: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoofType {
    Flat,
    Hipped,
    Gabled,
    Gambrel,
    Pyramidal,
    Onion,
    Dome,
    Round,
    Skillion,
    Mansard,
    QuadrupleSaltbox,
    Saltbox,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoofMaterial {
    Default,
    Tiles,
    Metal,
    Concrete,
    Thatch,
    Wood,
    Grass,
    Glass,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoofOrientation {
    Along,
    Across,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacadeMaterial {
    Plaster,
    Brick,
    Wood,
    Glass,
    Concrete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchType {
    Generic,
    Football,
    Basketball,
    Tennis,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PolylineDescriptor {
    Path(PathDescriptor),
    Fence {
        material: FenceMaterial,
        /// Measured from `min_height`
        height: f64,
        min_height: f64,
    },
    Wall {
        wall_type: WallType,
        height: f64,
    },
    PowerLine,
    Waterway {
        width: f64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PathType {
    Roadway,
    Footway,
    Cycleway,
    Runway,
    Railway,
    Tramway,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathMaterial {
    Asphalt,
    Concrete,
    Wood,
    Cobblestone,
    Dirt,
    Sand,
}

/// Which side of the center-line a derived path covers. Left and right are relative to the
/// direction of the way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PathSide {
    Both,
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathDescriptor {
    pub path_type: PathType,
    /// Total width in meters. For sidewalks and cycleways derived from a roadway, this spans the
    /// roadway too.
    pub width: f64,
    pub material: Option<PathMaterial>,
    pub lanes_forward: u32,
    pub lanes_backward: u32,
    pub is_roadway_marked: bool,
    pub side: Option<PathSide>,
}

impl PathDescriptor {
    pub fn new(path_type: PathType, width: f64) -> PathDescriptor {
        PathDescriptor {
            path_type,
            width,
            material: None,
            lanes_forward: 0,
            lanes_backward: 0,
            is_roadway_marked: false,
            side: None,
        }
    }

    pub fn total_lanes(&self) -> u32 {
        self.lanes_forward + self.lanes_backward
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FenceMaterial {
    Wood,
    ChainLink,
    Metal,
    Concrete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallType {
    Hedge,
    Stone,
    Brick,
    Concrete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeType {
    Generic,
    Pine,
    Oak,
    Linden,
    Beech,
    Fir,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PointDescriptor {
    Tree {
        height: Option<f64>,
        tree_type: TreeType,
    },
    Hydrant,
    StreetLamp,
    AdColumn,
    Bench,
    PicnicTable,
    BusStop,
    TransmissionTower,
    UtilityPole,
    WindTurbine {
        height: Option<f64>,
    },
    Bollard,
    Label {
        text: String,
        priority: f64,
    },
}

impl PointDescriptor {
    /// Small street furniture that should face the closest road.
    pub fn faces_road(&self) -> bool {
        matches!(
            self,
            PointDescriptor::Hydrant
                | PointDescriptor::StreetLamp
                | PointDescriptor::Bench
                | PointDescriptor::BusStop
        )
    }
}
