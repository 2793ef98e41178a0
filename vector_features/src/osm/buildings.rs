use abstutil::Tags;

use super::helpers::{parse_color, parse_meters, read_tag_as_unsigned_int};
use crate::{BuildingParams, FacadeMaterial, RoofMaterial, RoofOrientation, RoofType};

pub const LEVEL_HEIGHT: f64 = 3.5;
const ROOF_LEVEL_HEIGHT: f64 = 3.0;
const DEFAULT_ROOF_HEIGHT: f64 = 3.0;

/// Building types that usually don't have a regular roof on top.
const NO_DEFAULT_ROOF: [&str; 12] = [
    "roof",
    "stadium",
    "houseboat",
    "castle",
    "greenhouse",
    "storage_tank",
    "silo",
    "ship",
    "bridge",
    "digester",
    "water_tower",
    "shed",
];

const NO_WINDOWS: [&str; 9] = [
    "garage",
    "garages",
    "shed",
    "roof",
    "storage_tank",
    "silo",
    "digester",
    "water_tower",
    "greenhouse",
];

pub fn supports_default_roof(building_type: &str) -> bool {
    !NO_DEFAULT_ROOF.contains(&building_type)
}

pub fn roof_type(shape: Option<&str>) -> Option<RoofType> {
    Some(match shape? {
        "flat" => RoofType::Flat,
        "hipped" => RoofType::Hipped,
        "gabled" => RoofType::Gabled,
        "gambrel" => RoofType::Gambrel,
        "pyramidal" => RoofType::Pyramidal,
        "onion" => RoofType::Onion,
        "dome" => RoofType::Dome,
        "round" => RoofType::Round,
        "skillion" => RoofType::Skillion,
        "mansard" => RoofType::Mansard,
        "quadruple_saltbox" => RoofType::QuadrupleSaltbox,
        "saltbox" => RoofType::Saltbox,
        _ => return None,
    })
}

fn roof_material(material: Option<&str>) -> Option<RoofMaterial> {
    Some(match material? {
        "roof_tiles" | "tile" | "tiles" | "slate" => RoofMaterial::Tiles,
        "metal" | "metal_sheet" | "copper" | "tin" | "zinc" => RoofMaterial::Metal,
        "concrete" | "asphalt" | "tar_paper" | "eternit" | "cement" | "plastic" => {
            RoofMaterial::Concrete
        }
        "thatch" => RoofMaterial::Thatch,
        "wood" => RoofMaterial::Wood,
        "grass" | "plants" => RoofMaterial::Grass,
        "glass" => RoofMaterial::Glass,
        _ => return None,
    })
}

pub fn roof_orientation(value: Option<&str>) -> Option<RoofOrientation> {
    match value? {
        "along" => Some(RoofOrientation::Along),
        "across" => Some(RoofOrientation::Across),
        _ => None,
    }
}

/// Degrees, or a compass direction like "NE".
fn roof_direction(value: Option<&str>) -> Option<f64> {
    let value = value?.trim();
    if let Ok(degrees) = value.parse::<f64>() {
        return Some(degrees.rem_euclid(360.0));
    }
    const COMPASS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
        "NNW",
    ];
    COMPASS
        .iter()
        .position(|c| c.eq_ignore_ascii_case(value))
        .map(|idx| idx as f64 * 22.5)
}

pub struct RoofParams {
    pub roof_type: RoofType,
    pub material: RoofMaterial,
    pub color: u32,
}

/// A roof with no tagged material gets a plain default one, unless there's a reason to believe
/// it's not a default roof: a tagged color, a building type without regular roofs, or a shape
/// other than flat.
pub fn roof_params(tags: &Tags, supports_default_roof: bool) -> RoofParams {
    let roof_type = roof_type(tags.get_str("roof:shape")).unwrap_or(RoofType::Flat);
    let no_default = !supports_default_roof || roof_type != RoofType::Flat;

    let material_tag = tags.get_str("roof:material");
    let mut material = roof_material(material_tag).unwrap_or(RoofMaterial::Default);
    let color = parse_color(tags.get_str("roof:colour"));

    if (color.is_some() || no_default) && material == RoofMaterial::Default {
        material = RoofMaterial::Concrete;
    }

    let color = color.unwrap_or(match material {
        RoofMaterial::Concrete => 0xBBBBBB,
        RoofMaterial::Metal => {
            if material_tag == Some("copper") {
                0xA3CABD
            } else {
                0xC3D2DD
            }
        }
        RoofMaterial::Tiles => {
            if material_tag == Some("slate") {
                0x8C8C97
            } else {
                0xCB7D64
            }
        }
        _ => 0xFFFFFF,
    });

    RoofParams {
        roof_type,
        material,
        color,
    }
}

fn facade_material(value: Option<&str>) -> FacadeMaterial {
    match value {
        Some("brick") => FacadeMaterial::Brick,
        Some("wood") | Some("timber_framing") => FacadeMaterial::Wood,
        Some("glass") | Some("mirror") => FacadeMaterial::Glass,
        Some("concrete") | Some("cement_block") | Some("stone") => FacadeMaterial::Concrete,
        _ => FacadeMaterial::Plaster,
    }
}

/// `building_type` is the value of `building` or `building:part`.
pub fn building_params(tags: &Tags, building_type: &str) -> BuildingParams {
    let is_roof = building_type == "roof";
    let roof = roof_params(
        tags,
        supports_default_roof(building_type) && !tags.is("roof:shape", "none"),
    );

    let levels = read_tag_as_unsigned_int(tags, "building:levels").unwrap_or(1);
    let roof_height = parse_meters(tags.get_str("roof:height"))
        .or_else(|| {
            read_tag_as_unsigned_int(tags, "roof:levels").map(|l| l as f64 * ROOF_LEVEL_HEIGHT)
        })
        .unwrap_or(if roof.roof_type == RoofType::Flat {
            0.0
        } else {
            DEFAULT_ROOF_HEIGHT
        });
    let height = parse_meters(tags.get_str("height"))
        .unwrap_or(levels as f64 * LEVEL_HEIGHT + roof_height);
    let min_height = parse_meters(tags.get_str("min_height"))
        .or_else(|| {
            read_tag_as_unsigned_int(tags, "building:min_level").map(|l| l as f64 * LEVEL_HEIGHT)
        })
        .unwrap_or(0.0);

    let facade_material = facade_material(tags.get_str("building:material"));

    BuildingParams {
        height,
        min_height,
        levels,
        roof_height: roof_height.min(height - min_height).max(0.0),
        roof_type: roof.roof_type,
        roof_material: roof.material,
        roof_color: roof.color,
        roof_orientation: roof_orientation(tags.get_str("roof:orientation")),
        roof_direction: roof_direction(tags.get_str("roof:direction")),
        facade_material,
        facade_color: parse_color(tags.get_str("building:colour")).unwrap_or(0xFFFFFF),
        windows: !NO_WINDOWS.contains(&building_type) && facade_material != FacadeMaterial::Glass,
        has_walls: !is_roof,
    }
}
