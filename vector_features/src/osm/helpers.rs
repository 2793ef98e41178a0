//! Parsing OSM tag values.

use abstutil::Tags;

use crate::TreeType;

/// Parses a length like "3", "3.5 m", "2km", "12 ft" or "6'3\"". Plain numbers are meters.
pub fn parse_meters(value: Option<&str>) -> Option<f64> {
    parse_meters_scaled(value, 1.0)
}

/// Like `parse_meters`, but plain numbers without a unit are multiplied by `plain_scale`. Some
/// tags, like a trunk's `diameter`, default to millimeters.
pub fn parse_meters_scaled(value: Option<&str>, plain_scale: f64) -> Option<f64> {
    let raw = value?.trim().replace(',', ".");
    if raw.is_empty() {
        return None;
    }

    if let Some(idx) = raw.find('\'') {
        let feet: f64 = raw[..idx].trim().parse().ok()?;
        let rest = raw[idx + 1..].trim().trim_end_matches('"').trim();
        let inches: f64 = if rest.is_empty() {
            0.0
        } else {
            rest.parse().ok()?
        };
        return finite((feet * 12.0 + inches) * 0.0254);
    }
    if let Some(inches) = raw.strip_suffix('"') {
        return finite(inches.trim().parse::<f64>().ok()? * 0.0254);
    }

    for (suffix, factor) in [
        ("km", 1000.0),
        ("cm", 0.01),
        ("mm", 0.001),
        ("mi", 1609.344),
        ("ft", 0.3048),
        ("m", 1.0),
    ] {
        if let Some(number) = raw.strip_suffix(suffix) {
            return finite(number.trim().parse::<f64>().ok()? * factor);
        }
    }
    finite(raw.parse::<f64>().ok()? * plain_scale)
}

fn finite(x: f64) -> Option<f64> {
    if x.is_finite() {
        Some(x)
    } else {
        None
    }
}

pub fn parse_height(value: Option<&str>, default: f64) -> f64 {
    parse_meters(value).unwrap_or(default)
}

pub fn read_tag_as_unsigned_int(tags: &Tags, key: &str) -> Option<u32> {
    tags.get_str(key)?.trim().parse::<u32>().ok()
}

const NAMED_COLORS: [(&str, u32); 18] = [
    ("black", 0x000000),
    ("white", 0xffffff),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("silver", 0xc0c0c0),
    ("red", 0xff0000),
    ("maroon", 0x800000),
    ("orange", 0xffa500),
    ("yellow", 0xffff00),
    ("olive", 0x808000),
    ("green", 0x008000),
    ("lime", 0x00ff00),
    ("teal", 0x008080),
    ("blue", 0x0000ff),
    ("navy", 0x000080),
    ("brown", 0xa52a2a),
    ("beige", 0xf5f5dc),
    ("tan", 0xd2b48c),
];

/// Parses "#rgb", "#rrggbb" or a basic CSS color name into 0xRRGGBB.
pub fn parse_color(value: Option<&str>) -> Option<u32> {
    let raw = value?.trim().to_lowercase();
    if let Some(hex) = raw.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        return match hex.len() {
            6 => u32::from_str_radix(hex, 16).ok(),
            3 => {
                let short = u32::from_str_radix(hex, 16).ok()?;
                let (r, g, b) = ((short >> 8) & 0xf, (short >> 4) & 0xf, short & 0xf);
                Some((r * 17) << 16 | (g * 17) << 8 | (b * 17))
            }
            _ => None,
        };
    }
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == raw)
        .map(|(_, color)| *color)
}

pub fn is_underground(tags: &Tags) -> bool {
    if tags.is("location", "underground") {
        return true;
    }
    if tags.is_any("tunnel", &["yes", "culvert", "flooded"]) {
        return true;
    }
    let layer = tags
        .get_str("layer")
        .and_then(|x| x.trim().parse::<i32>().ok())
        .unwrap_or(0);
    let is_bridge = tags.contains_key("bridge") && !tags.is("bridge", "no");
    layer < 0 && !is_bridge
}

/// Uses the tagged height if there is one, then guesses from the crown or trunk size.
pub fn tree_height(tags: &Tags) -> Option<f64> {
    let min_height = parse_meters(tags.get_str("min_height")).unwrap_or(0.0);
    let tagged = parse_meters(tags.get_str("height"))
        .filter(|h| *h != 0.0)
        .or_else(|| parse_meters(tags.get_str("est_height")))
        .map(|h| h - min_height)
        .filter(|h| *h > 0.0);
    if tagged.is_some() {
        return tagged;
    }

    let crown = parse_meters(tags.get_str("diameter_crown")).filter(|w| *w != 0.0);
    let width = crown.unwrap_or_else(|| {
        let diameter = parse_meters_scaled(tags.get_str("diameter"), 0.001)
            .filter(|d| *d != 0.0)
            .or_else(|| {
                parse_meters(tags.get_str("circumference")).map(|c| c / std::f64::consts::PI)
            })
            .unwrap_or(0.0);
        diameter * 23.0
    });

    if width > 0.5 && width < 100.0 {
        Some(width * 2.0)
    } else {
        None
    }
}

pub fn tree_type(tags: &Tags) -> TreeType {
    match tags.get_str("genus") {
        Some("Pinus") => return TreeType::Pine,
        Some("Quercus") => return TreeType::Oak,
        Some("Tilia") => return TreeType::Linden,
        Some("Fagus") => return TreeType::Beech,
        Some("Abies") | Some("Picea") => return TreeType::Fir,
        _ => {}
    }
    if tags.is("leaf_type", "needleleaved") {
        return TreeType::Pine;
    }
    TreeType::Generic
}
