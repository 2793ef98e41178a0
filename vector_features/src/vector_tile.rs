//! Classifiers over vector tile features. Tile producers already normalize the tags, so each
//! feature carries a `type` plus typed attributes, and the rules are lookups more than guesses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::osm::buildings::{roof_orientation, roof_type, supports_default_roof, LEVEL_HEIGHT};
use crate::{
    AreaDescriptor, BuildingParams, FacadeMaterial, FeatureClassifier, FenceMaterial, Modifier,
    PathDescriptor, PathMaterial, PathSide, PathType, PitchType, PointDescriptor,
    PolylineDescriptor, Qualifier, RoofMaterial, RoofType, TreeType, WallType,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VectorTileValue {
    Bool(bool),
    Number(f64),
    String(String),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorTileTags(BTreeMap<String, VectorTileValue>);

impl VectorTileTags {
    pub fn new() -> VectorTileTags {
        VectorTileTags(BTreeMap::new())
    }

    pub fn insert<K: Into<String>>(&mut self, k: K, v: VectorTileValue) {
        self.0.insert(k.into(), v);
    }

    pub fn string(&self, k: &str) -> Option<&str> {
        match self.0.get(k)? {
            VectorTileValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numbers encoded as strings are accepted too.
    pub fn number(&self, k: &str) -> Option<f64> {
        match self.0.get(k)? {
            VectorTileValue::Number(x) => Some(*x).filter(|x| x.is_finite()),
            VectorTileValue::String(s) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
            VectorTileValue::Bool(_) => None,
        }
    }

    pub fn bool(&self, k: &str) -> Option<bool> {
        match self.0.get(k)? {
            VectorTileValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<&str> {
        self.string("type")
    }
}

fn one<D>(descriptor: D) -> Option<Vec<Qualifier<D>>> {
    Some(vec![Qualifier::Descriptor(descriptor)])
}

fn default_roof(tags: &VectorTileTags) -> bool {
    if let Some(value) = tags.bool("defaultRoof") {
        return value;
    }
    supports_default_roof(tags.string("buildingType").unwrap_or("yes"))
}

fn roof_material(value: Option<&str>) -> RoofMaterial {
    match value {
        Some("tiles") => RoofMaterial::Tiles,
        Some("metal") => RoofMaterial::Metal,
        Some("concrete") => RoofMaterial::Concrete,
        Some("thatch") => RoofMaterial::Thatch,
        Some("wood") => RoofMaterial::Wood,
        Some("grass") => RoofMaterial::Grass,
        Some("glass") => RoofMaterial::Glass,
        _ => RoofMaterial::Default,
    }
}

fn building(tags: &VectorTileTags) -> BuildingParams {
    let roof_type = roof_type(tags.string("roofType")).unwrap_or(RoofType::Flat);
    let mut material = roof_material(tags.string("roofMaterial"));
    if material == RoofMaterial::Default && (!default_roof(tags) || roof_type != RoofType::Flat)
    {
        material = RoofMaterial::Concrete;
    }
    let levels = tags.number("levels").map(|l| l.max(0.0) as u32).unwrap_or(1);
    let roof_height = tags.number("roofHeight").unwrap_or(0.0).max(0.0);
    let height = tags
        .number("height")
        .unwrap_or(levels as f64 * LEVEL_HEIGHT + roof_height);
    let min_height = tags.number("minHeight").unwrap_or(0.0);
    let facade_material = match tags.string("material") {
        Some("brick") => FacadeMaterial::Brick,
        Some("wood") => FacadeMaterial::Wood,
        Some("glass") => FacadeMaterial::Glass,
        Some("concrete") => FacadeMaterial::Concrete,
        _ => FacadeMaterial::Plaster,
    };

    BuildingParams {
        height,
        min_height,
        levels,
        roof_height: roof_height.min(height - min_height).max(0.0),
        roof_type,
        roof_material: material,
        roof_color: tags.number("roofColor").map(|c| c as u32).unwrap_or(0xBBBBBB),
        roof_orientation: roof_orientation(tags.string("roofOrientation")),
        roof_direction: tags.number("roofDirection"),
        facade_material,
        facade_color: tags.number("color").map(|c| c as u32).unwrap_or(0xFFFFFF),
        windows: tags.bool("windows").unwrap_or(true),
        has_walls: tags.string("buildingType") != Some("roof"),
    }
}

pub struct VectorTileAreaClassifier;

impl FeatureClassifier<AreaDescriptor, VectorTileTags> for VectorTileAreaClassifier {
    fn from_tags(&self, tags: &VectorTileTags) -> Option<Vec<Qualifier<AreaDescriptor>>> {
        match tags.kind()? {
            "building" => one(AreaDescriptor::Building(building(tags))),
            "buildingPart" => one(AreaDescriptor::BuildingPart(building(tags))),
            "buildingConstruction" => one(AreaDescriptor::BuildingConstruction),
            "sand" => one(AreaDescriptor::Sand),
            "rock" => one(AreaDescriptor::Rock),
            "pitch" => one(AreaDescriptor::Pitch {
                pitch_type: match tags.string("pitchType") {
                    Some("football") => PitchType::Football,
                    Some("basketball") => PitchType::Basketball,
                    Some("tennis") => PitchType::Tennis,
                    _ => PitchType::Generic,
                },
            }),
            "manicuredGrass" => one(AreaDescriptor::ManicuredGrass),
            "garden" => one(AreaDescriptor::Garden),
            "grass" => one(AreaDescriptor::Grass),
            "water" => one(AreaDescriptor::Water),
            "construction" => one(AreaDescriptor::Construction),
            "asphalt" => one(AreaDescriptor::Asphalt),
            "roadwayArea" => one(AreaDescriptor::RoadwayArea),
            "pavement" => one(AreaDescriptor::Pavement),
            "helipad" => one(AreaDescriptor::Helipad),
            "forest" => one(AreaDescriptor::Forest),
            "shrubbery" => one(AreaDescriptor::Shrubbery),
            "farmland" => one(AreaDescriptor::Farmland),
            _ => None,
        }
    }
}

pub struct VectorTilePolylineClassifier;

fn path(tags: &VectorTileTags) -> Option<PathDescriptor> {
    let path_type = match tags.string("pathType")? {
        "roadway" => PathType::Roadway,
        "footway" => PathType::Footway,
        "cycleway" => PathType::Cycleway,
        "runway" => PathType::Runway,
        "railway" => PathType::Railway,
        "tramway" => PathType::Tramway,
        _ => return None,
    };
    let mut path = PathDescriptor::new(path_type, tags.number("width").unwrap_or(3.0));
    path.material = match tags.string("pathMaterial") {
        Some("asphalt") => Some(PathMaterial::Asphalt),
        Some("concrete") => Some(PathMaterial::Concrete),
        Some("wood") => Some(PathMaterial::Wood),
        Some("cobblestone") => Some(PathMaterial::Cobblestone),
        Some("dirt") => Some(PathMaterial::Dirt),
        Some("sand") => Some(PathMaterial::Sand),
        _ => None,
    };
    path.lanes_forward = tags.number("lanesForward").unwrap_or(0.0).max(0.0) as u32;
    path.lanes_backward = tags.number("lanesBackward").unwrap_or(0.0).max(0.0) as u32;
    path.is_roadway_marked = tags.bool("isRoadwayMarked").unwrap_or(false);
    path.side = match tags.string("side") {
        Some("both") => Some(PathSide::Both),
        Some("left") => Some(PathSide::Left),
        Some("right") => Some(PathSide::Right),
        _ => None,
    };
    Some(path)
}

impl FeatureClassifier<PolylineDescriptor, VectorTileTags> for VectorTilePolylineClassifier {
    fn from_tags(&self, tags: &VectorTileTags) -> Option<Vec<Qualifier<PolylineDescriptor>>> {
        match tags.kind()? {
            "path" => match path(tags) {
                Some(path) if path.width > 0.0 => one(PolylineDescriptor::Path(path)),
                _ => Some(Vec::new()),
            },
            "fence" => {
                let min_height = tags.number("minHeight").unwrap_or(0.0);
                let height = tags.number("height").unwrap_or(1.5) - min_height;
                if height <= 0.0 {
                    return Some(Vec::new());
                }
                let material = match tags.string("fenceMaterial") {
                    Some("chainLink") => FenceMaterial::ChainLink,
                    Some("metal") => FenceMaterial::Metal,
                    Some("concrete") => FenceMaterial::Concrete,
                    _ => FenceMaterial::Wood,
                };
                one(PolylineDescriptor::Fence {
                    material,
                    height,
                    min_height,
                })
            }
            "wall" => {
                let wall_type = match tags.string("wallType") {
                    Some("hedge") => WallType::Hedge,
                    Some("stone") => WallType::Stone,
                    Some("brick") => WallType::Brick,
                    _ => WallType::Concrete,
                };
                one(PolylineDescriptor::Wall {
                    wall_type,
                    height: tags.number("height").unwrap_or(2.0),
                })
            }
            "powerLine" => one(PolylineDescriptor::PowerLine),
            "waterway" => one(PolylineDescriptor::Waterway {
                width: tags.number("width").unwrap_or(3.0),
            }),
            "treeRow" => Some(vec![Qualifier::Modifier(Modifier::NodeRow {
                spacing: 10.0,
                randomness: 1.0,
                descriptor: PointDescriptor::Tree {
                    height: tags.number("height"),
                    tree_type: TreeType::Generic,
                },
            })]),
            _ => None,
        }
    }
}

pub struct VectorTileNodeClassifier;

impl FeatureClassifier<PointDescriptor, VectorTileTags> for VectorTileNodeClassifier {
    fn from_tags(&self, tags: &VectorTileTags) -> Option<Vec<Qualifier<PointDescriptor>>> {
        match tags.kind()? {
            "tree" => one(PointDescriptor::Tree {
                height: tags.number("height"),
                tree_type: match tags.string("treeType") {
                    Some("pine") => TreeType::Pine,
                    Some("oak") => TreeType::Oak,
                    Some("linden") => TreeType::Linden,
                    Some("beech") => TreeType::Beech,
                    Some("fir") => TreeType::Fir,
                    _ => TreeType::Generic,
                },
            }),
            "hydrant" => one(PointDescriptor::Hydrant),
            "streetLamp" => one(PointDescriptor::StreetLamp),
            "adColumn" => one(PointDescriptor::AdColumn),
            "bench" => one(PointDescriptor::Bench),
            "picnicTable" => one(PointDescriptor::PicnicTable),
            "busStop" => one(PointDescriptor::BusStop),
            "transmissionTower" => one(PointDescriptor::TransmissionTower),
            "utilityPole" => one(PointDescriptor::UtilityPole),
            "windTurbine" => one(PointDescriptor::WindTurbine {
                height: tags.number("height"),
            }),
            "bollard" => one(PointDescriptor::Bollard),
            "label" => match tags.string("name") {
                Some(text) if !text.trim().is_empty() => one(PointDescriptor::Label {
                    text: text.trim().to_string(),
                    priority: tags.number("priority").unwrap_or(1.0),
                }),
                _ => Some(Vec::new()),
            },
            _ => None,
        }
    }
}
