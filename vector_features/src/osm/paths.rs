//! Defaults for linear features: highways, railways, waterways and barriers.

use abstutil::Tags;

use super::helpers::{parse_height, parse_meters, read_tag_as_unsigned_int};
use crate::{FenceMaterial, PathMaterial, PathSide, PathType, WallType};

pub struct PathParams {
    /// Only roadway, footway or cycleway
    pub path_type: PathType,
    pub material: PathMaterial,
    pub default_lanes: u32,
    pub default_width: Option<f64>,
    pub default_is_marked: bool,
}

impl PathParams {
    fn roadway(default_lanes: u32, default_is_marked: bool) -> PathParams {
        PathParams {
            path_type: PathType::Roadway,
            material: PathMaterial::Asphalt,
            default_lanes,
            default_width: None,
            default_is_marked,
        }
    }

    fn non_roadway(path_type: PathType) -> PathParams {
        PathParams {
            path_type,
            material: PathMaterial::Asphalt,
            default_lanes: 1,
            default_width: None,
            default_is_marked: false,
        }
    }
}

/// None for highway values that shouldn't be drawn, like proposed roads.
pub fn path_params(tags: &Tags) -> Option<PathParams> {
    let highway = tags.get_str("highway")?;
    let mut params = match highway {
        "motorway" | "trunk" | "primary" => PathParams::roadway(4, true),
        "secondary" | "tertiary" | "unclassified" | "residential" => PathParams::roadway(2, true),
        "living_street" | "service" => PathParams::roadway(1, false),
        "track" => {
            let mut params = PathParams::roadway(1, false);
            params.material = PathMaterial::Dirt;
            params.default_width = Some(3.0);
            params
        }
        "motorway_link" | "trunk_link" | "primary_link" | "secondary_link" | "tertiary_link" => {
            PathParams::roadway(1, true)
        }
        "footway" | "pedestrian" | "steps" | "path" | "bridleway" => {
            PathParams::non_roadway(PathType::Footway)
        }
        "cycleway" => PathParams::non_roadway(PathType::Cycleway),
        _ => return None,
    };
    if let Some(material) = path_material(tags.get_str("surface")) {
        params.material = material;
    }
    Some(params)
}

fn path_material(surface: Option<&str>) -> Option<PathMaterial> {
    Some(match surface? {
        "asphalt" | "paved" => PathMaterial::Asphalt,
        "concrete" | "concrete:plates" | "concrete:lanes" => PathMaterial::Concrete,
        "wood" => PathMaterial::Wood,
        "sett" | "cobblestone" | "unhewn_cobblestone" | "paving_stones" => {
            PathMaterial::Cobblestone
        }
        "dirt" | "ground" | "earth" | "unpaved" | "compacted" | "gravel" | "fine_gravel"
        | "grass" => PathMaterial::Dirt,
        "sand" => PathMaterial::Sand,
        _ => return None,
    })
}

/// An explicit `lane_markings` tag wins. Otherwise, roads with a center line by default only get
/// one with at least two lanes.
pub fn is_roadway_marked(tags: &Tags, total_lanes: u32, default_is_marked: bool) -> bool {
    match tags.get_str("lane_markings") {
        Some("yes") => true,
        Some("no") => false,
        _ => default_is_marked && total_lanes >= 2,
    }
}

fn combine_sides(left: bool, right: bool) -> Option<PathSide> {
    match (left, right) {
        (true, true) => Some(PathSide::Both),
        (true, false) => Some(PathSide::Left),
        (false, true) => Some(PathSide::Right),
        (false, false) => None,
    }
}

pub fn sidewalk_side(tags: &Tags) -> Option<PathSide> {
    match tags.get_str("sidewalk") {
        Some("both") | Some("yes") => return Some(PathSide::Both),
        Some("left") => return Some(PathSide::Left),
        Some("right") => return Some(PathSide::Right),
        Some(_) => return None,
        None => {}
    }
    if tags.is("sidewalk:both", "yes") {
        return Some(PathSide::Both);
    }
    combine_sides(
        tags.is("sidewalk:left", "yes"),
        tags.is("sidewalk:right", "yes"),
    )
}

const CYCLEWAY_VALUES: [&str; 4] = ["lane", "track", "opposite_lane", "opposite_track"];

pub fn cycleway_side(tags: &Tags) -> Option<PathSide> {
    if tags.is_any("cycleway", &CYCLEWAY_VALUES) || tags.is_any("cycleway:both", &CYCLEWAY_VALUES)
    {
        return Some(PathSide::Both);
    }
    combine_sides(
        tags.is_any("cycleway:left", &CYCLEWAY_VALUES),
        tags.is_any("cycleway:right", &CYCLEWAY_VALUES),
    )
}

/// Tramways are narrower than railways, since they have no ballast bed.
pub fn railway_params(tags: &Tags) -> (PathType, f64) {
    let default_gauge = if tags.is("railway", "narrow_gauge") {
        1000
    } else {
        1435
    };
    let gauge = read_tag_as_unsigned_int(tags, "gauge").unwrap_or(default_gauge) as f64 / 1000.0;
    if tags.is("railway", "tram") {
        (PathType::Tramway, gauge + 1.0)
    } else {
        (PathType::Railway, gauge + 1.6)
    }
}

pub fn waterway_width(tags: &Tags) -> Option<f64> {
    let default = match tags.get_str("waterway")? {
        "river" => 10.0,
        "canal" => 8.0,
        "stream" => 3.0,
        "ditch" | "drain" => 1.0,
        _ => return None,
    };
    Some(parse_meters(tags.get_str("width")).unwrap_or(default))
}

/// The material of a fence and its usual height.
pub fn fence_material(fence_type: Option<&str>) -> (FenceMaterial, f64) {
    match fence_type {
        Some("chain_link") | Some("wire") | Some("barbed_wire") | Some("mesh") => {
            (FenceMaterial::ChainLink, 2.0)
        }
        Some("metal") | Some("railing") | Some("metal_bars") | Some("bars") => {
            (FenceMaterial::Metal, 1.5)
        }
        Some("concrete") => (FenceMaterial::Concrete, 2.0),
        _ => (FenceMaterial::Wood, 1.5),
    }
}

pub fn wall_type_and_height(tags: &Tags) -> (WallType, f64) {
    let (wall_type, default_height) = match tags.get_str("wall") {
        Some("dry_stone") | Some("stone") => (WallType::Stone, 1.0),
        Some("brick") => (WallType::Brick, 2.0),
        Some("noise_barrier") => (WallType::Concrete, 4.0),
        _ => (WallType::Concrete, 2.0),
    };
    (wall_type, parse_height(tags.get_str("height"), default_height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(kv: &[(&str, &str)]) -> Tags {
        kv.iter().cloned().collect()
    }

    #[test]
    fn sides() {
        assert_eq!(sidewalk_side(&tags(&[("sidewalk", "yes")])), Some(PathSide::Both));
        assert_eq!(sidewalk_side(&tags(&[("sidewalk", "separate")])), None);
        assert_eq!(
            sidewalk_side(&tags(&[("sidewalk:left", "yes"), ("sidewalk:right", "yes")])),
            Some(PathSide::Both)
        );
        assert_eq!(
            sidewalk_side(&tags(&[("sidewalk:right", "yes")])),
            Some(PathSide::Right)
        );
        assert_eq!(cycleway_side(&tags(&[("cycleway", "lane")])), Some(PathSide::Both));
        assert_eq!(
            cycleway_side(&tags(&[("cycleway:left", "track")])),
            Some(PathSide::Left)
        );
        assert_eq!(cycleway_side(&tags(&[("cycleway", "no")])), None);
    }

    #[test]
    fn path_defaults() {
        assert!(path_params(&tags(&[("highway", "proposed")])).is_none());
        assert!(path_params(&tags(&[("highway", "bus_guideway")])).is_none());

        let track = path_params(&tags(&[("highway", "track")])).unwrap();
        assert_eq!(track.material, PathMaterial::Dirt);
        assert_eq!(track.default_width, Some(3.0));

        let paved = path_params(&tags(&[("highway", "track"), ("surface", "concrete")])).unwrap();
        assert_eq!(paved.material, PathMaterial::Concrete);

        let primary = path_params(&tags(&[("highway", "primary")])).unwrap();
        assert_eq!(primary.path_type, PathType::Roadway);
        assert_eq!(primary.default_lanes, 4);
    }

    #[test]
    fn rails() {
        let (kind, width) = railway_params(&tags(&[("railway", "rail")]));
        assert_eq!(kind, PathType::Railway);
        assert!((width - 3.035).abs() < 1e-9);
        let (kind, _) = railway_params(&tags(&[("railway", "tram")]));
        assert_eq!(kind, PathType::Tramway);
    }
}
