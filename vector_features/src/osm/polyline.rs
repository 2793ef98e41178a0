use abstutil::Tags;

use super::helpers::{
    is_underground, parse_height, parse_meters, read_tag_as_unsigned_int, tree_type,
};
use super::paths::{
    cycleway_side, fence_material, is_roadway_marked, path_params, railway_params, sidewalk_side,
    wall_type_and_height, waterway_width, PathParams,
};
use crate::{
    FeatureClassifier, Modifier, PathDescriptor, PathSide, PathType, PointDescriptor,
    PolylineDescriptor, Qualifier,
};

/// Extra width on each side of the roadway for a derived sidewalk or cycleway.
const SIDEWALK_WIDTH: f64 = 2.0;
const CYCLEWAY_WIDTH: f64 = 2.0;

pub struct OsmPolylineClassifier;

fn one(descriptor: PolylineDescriptor) -> Option<Vec<Qualifier<PolylineDescriptor>>> {
    Some(vec![Qualifier::Descriptor(descriptor)])
}

fn side_path(path_type: PathType, width: f64, side: PathSide) -> Qualifier<PolylineDescriptor> {
    let mut path = PathDescriptor::new(path_type, width);
    path.side = Some(side);
    Qualifier::Descriptor(PolylineDescriptor::Path(path))
}

/// Fills in lanes, width and markings of a roadway.
fn roadway(tags: &Tags, params: &PathParams, path: &mut PathDescriptor) {
    let is_one_way = tags.is("oneway", "yes") || tags.is("junction", "roundabout");
    let mut lanes_forward = read_tag_as_unsigned_int(tags, "lanes:forward");
    let mut lanes_backward = read_tag_as_unsigned_int(tags, "lanes:backward");
    let lanes_total = read_tag_as_unsigned_int(tags, "lanes").unwrap_or(if is_one_way {
        (params.default_lanes / 2).max(1)
    } else {
        params.default_lanes
    });

    if is_one_way {
        lanes_forward = Some(lanes_total);
        lanes_backward = Some(0);
    } else {
        match (lanes_forward, lanes_backward) {
            (None, None) => {
                let forward = (lanes_total + 1) / 2;
                lanes_forward = Some(forward);
                lanes_backward = Some(lanes_total - forward);
            }
            (None, Some(backward)) => {
                lanes_forward = Some(lanes_total.saturating_sub(backward));
            }
            (Some(forward), None) => {
                lanes_backward = Some(lanes_total.saturating_sub(forward));
            }
            (Some(_), Some(_)) => {}
        }
    }

    path.lanes_forward = lanes_forward.unwrap_or(0);
    path.lanes_backward = lanes_backward.unwrap_or(0);
    let total_lanes = path.total_lanes();

    path.width = parse_meters(tags.get_str("width"))
        .or(params.default_width)
        .unwrap_or_else(|| {
            let lane_width = if total_lanes == 1 { 4.0 } else { 3.0 };
            total_lanes as f64 * lane_width
        });
    path.is_roadway_marked = is_roadway_marked(tags, total_lanes, params.default_is_marked);
}

/// Sidewalks and cycleways drawn next to a roadway. Their width spans the whole roadway, plus
/// the cycleway when a sidewalk sits on the same side as one.
fn roadway_sides(tags: &Tags, road_width: f64) -> Vec<Qualifier<PolylineDescriptor>> {
    let mut result = Vec::new();
    let sidewalk = sidewalk_side(tags);
    let cycleway = cycleway_side(tags);

    if let Some(side) = cycleway {
        result.push(side_path(
            PathType::Cycleway,
            road_width + CYCLEWAY_WIDTH * 2.0,
            side,
        ));
    }

    let sidewalk = match sidewalk {
        Some(side) => side,
        None => return result,
    };
    match cycleway {
        None | Some(PathSide::Both) => {
            let extra = if cycleway.is_some() {
                CYCLEWAY_WIDTH * 2.0
            } else {
                0.0
            };
            result.push(side_path(
                PathType::Footway,
                road_width + SIDEWALK_WIDTH * 2.0 + extra,
                sidewalk,
            ));
        }
        Some(cycleway) => {
            for side in [PathSide::Left, PathSide::Right] {
                if sidewalk == side || sidewalk == PathSide::Both {
                    let extra = if cycleway == side {
                        CYCLEWAY_WIDTH * 2.0
                    } else {
                        0.0
                    };
                    result.push(side_path(
                        PathType::Footway,
                        road_width + SIDEWALK_WIDTH * 2.0 + extra,
                        side,
                    ));
                }
            }
        }
    }
    result
}

impl FeatureClassifier<PolylineDescriptor, Tags> for OsmPolylineClassifier {
    fn from_tags(&self, tags: &Tags) -> Option<Vec<Qualifier<PolylineDescriptor>>> {
        if is_underground(tags) || tags.is("area", "yes") {
            return None;
        }

        if tags.contains_key("highway") {
            let params = match path_params(tags) {
                Some(params) => params,
                None => return Some(Vec::new()),
            };

            let mut path = PathDescriptor::new(params.path_type, 0.0);
            path.material = Some(params.material);
            match params.path_type {
                PathType::Roadway => roadway(tags, &params, &mut path),
                PathType::Footway => {
                    path.width = parse_meters(tags.get_str("width")).unwrap_or(2.0);
                }
                _ => {
                    path.width = parse_meters(tags.get_str("width")).unwrap_or(3.0);
                }
            }

            let is_roadway = path.path_type == PathType::Roadway;
            let road_width = path.width;
            let mut qualifiers = vec![Qualifier::Descriptor(PolylineDescriptor::Path(path))];
            if is_roadway {
                qualifiers.extend(roadway_sides(tags, road_width));
            }
            return Some(qualifiers);
        }

        if tags.is_any("aeroway", &["runway", "taxiway"]) {
            let default = if tags.is("aeroway", "runway") {
                45.0
            } else {
                20.0
            };
            let width = parse_meters(tags.get_str("width")).unwrap_or(default);
            return one(PolylineDescriptor::Path(PathDescriptor::new(
                PathType::Runway,
                width,
            )));
        }

        if tags.is_any(
            "railway",
            &[
                "rail",
                "light_rail",
                "subway",
                "disused",
                "narrow_gauge",
                "tram",
            ],
        ) {
            let (path_type, width) = railway_params(tags);
            return one(PolylineDescriptor::Path(PathDescriptor::new(
                path_type, width,
            )));
        }

        if tags.is("barrier", "fence") {
            let (material, default_height) = fence_material(tags.get_str("fence_type"));
            let min_height = parse_height(tags.get_str("min_height"), 0.0);
            let height = parse_height(tags.get_str("height"), default_height) - min_height;
            if height <= 0.0 {
                return Some(Vec::new());
            }
            return one(PolylineDescriptor::Fence {
                material,
                height,
                min_height,
            });
        }

        if tags.is("barrier", "hedge") {
            return one(PolylineDescriptor::Wall {
                wall_type: crate::WallType::Hedge,
                height: parse_height(tags.get_str("height"), 1.0),
            });
        }

        if tags.is("barrier", "wall") {
            let (wall_type, height) = wall_type_and_height(tags);
            return one(PolylineDescriptor::Wall { wall_type, height });
        }

        if tags.is_any("power", &["line", "minor_line"]) {
            return one(PolylineDescriptor::PowerLine);
        }

        if tags.is("natural", "tree_row") {
            return Some(vec![Qualifier::Modifier(Modifier::NodeRow {
                spacing: 10.0,
                randomness: 1.0,
                descriptor: PointDescriptor::Tree {
                    height: parse_meters(tags.get_str("height")),
                    tree_type: tree_type(tags),
                },
            })]);
        }

        if tags.contains_key("waterway") {
            if let Some(width) = waterway_width(tags) {
                return one(PolylineDescriptor::Waterway { width });
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(kv: &[(&str, &str)]) -> Option<Vec<Qualifier<PolylineDescriptor>>> {
        let tags: Tags = kv.iter().cloned().collect();
        OsmPolylineClassifier.from_tags(&tags)
    }

    fn paths(kv: &[(&str, &str)]) -> Vec<PathDescriptor> {
        classify(kv)
            .unwrap()
            .into_iter()
            .map(|q| match q {
                Qualifier::Descriptor(PolylineDescriptor::Path(p)) => p,
                other => panic!("expected a path, got {:?}", other),
            })
            .collect()
    }

    #[test]
    fn default_lanes_split_evenly() {
        let road = &paths(&[("highway", "primary")])[0];
        assert_eq!(road.path_type, PathType::Roadway);
        assert_eq!(road.lanes_forward, 2);
        assert_eq!(road.lanes_backward, 2);
        assert_eq!(road.width, 12.0);
        assert!(road.is_roadway_marked);

        let odd = &paths(&[("highway", "primary"), ("lanes", "3")])[0];
        assert_eq!(odd.lanes_forward, 2);
        assert_eq!(odd.lanes_backward, 1);
    }

    #[test]
    fn one_way() {
        let road = &paths(&[("highway", "primary"), ("oneway", "yes"), ("lanes", "2")])[0];
        assert_eq!(road.lanes_forward, 2);
        assert_eq!(road.lanes_backward, 0);

        // Half the default lanes
        let untagged = &paths(&[("highway", "secondary"), ("junction", "roundabout")])[0];
        assert_eq!(untagged.lanes_forward, 1);
        assert_eq!(untagged.lanes_backward, 0);
        // A single lane is wider
        assert_eq!(untagged.width, 4.0);
        assert!(!untagged.is_roadway_marked);
    }

    #[test]
    fn partial_lane_tags() {
        let road = &paths(&[
            ("highway", "residential"),
            ("lanes", "3"),
            ("lanes:backward", "1"),
        ])[0];
        assert_eq!(road.lanes_forward, 2);
        assert_eq!(road.lanes_backward, 1);

        let clamped = &paths(&[
            ("highway", "residential"),
            ("lanes", "2"),
            ("lanes:forward", "5"),
        ])[0];
        assert_eq!(clamped.lanes_forward, 5);
        assert_eq!(clamped.lanes_backward, 0);
    }

    #[test]
    fn roadway_width() {
        let tagged = &paths(&[("highway", "residential"), ("width", "7.5")])[0];
        assert_eq!(tagged.width, 7.5);
        let track = &paths(&[("highway", "track")])[0];
        assert_eq!(track.width, 3.0);
        let footway = &paths(&[("highway", "footway")])[0];
        assert_eq!(footway.width, 2.0);
        assert_eq!(footway.path_type, PathType::Footway);
        let cycleway = &paths(&[("highway", "cycleway"), ("width", "2.5")])[0];
        assert_eq!(cycleway.width, 2.5);
    }

    #[test]
    fn sidewalks_and_cycleways() {
        let both = paths(&[("highway", "residential"), ("sidewalk", "both")]);
        assert_eq!(both.len(), 2);
        assert_eq!(both[1].path_type, PathType::Footway);
        assert_eq!(both[1].side, Some(PathSide::Both));
        assert_eq!(both[1].width, 6.0 + 4.0);

        let with_cycleways = paths(&[
            ("highway", "residential"),
            ("sidewalk", "both"),
            ("cycleway", "lane"),
        ]);
        assert_eq!(with_cycleways.len(), 3);
        assert_eq!(with_cycleways[1].path_type, PathType::Cycleway);
        assert_eq!(with_cycleways[1].width, 10.0);
        assert_eq!(with_cycleways[2].width, 14.0);

        let mixed = paths(&[
            ("highway", "residential"),
            ("sidewalk", "both"),
            ("cycleway:right", "track"),
        ]);
        assert_eq!(mixed.len(), 4);
        assert_eq!(mixed[1].side, Some(PathSide::Right));
        assert_eq!(mixed[2].side, Some(PathSide::Left));
        assert_eq!(mixed[2].width, 10.0);
        assert_eq!(mixed[3].side, Some(PathSide::Right));
        assert_eq!(mixed[3].width, 14.0);

        let left_only = paths(&[
            ("highway", "residential"),
            ("sidewalk", "left"),
            ("cycleway:right", "lane"),
        ]);
        assert_eq!(left_only.len(), 3);
        assert_eq!(left_only[2].side, Some(PathSide::Left));
        assert_eq!(left_only[2].width, 10.0);
    }

    #[test]
    fn fences() {
        assert!(matches!(
            classify(&[("barrier", "fence"), ("height", "0.3")]).unwrap()[0],
            Qualifier::Descriptor(PolylineDescriptor::Fence { height, .. }) if (height - 0.3).abs() < 1e-9
        ));
        // No height left once min_height is subtracted
        assert_eq!(
            classify(&[("barrier", "fence"), ("height", "0.3"), ("min_height", "0.3")]),
            Some(Vec::new())
        );
        assert_eq!(
            classify(&[("barrier", "fence"), ("height", "1"), ("min_height", "2")]),
            Some(Vec::new())
        );
    }

    #[test]
    fn other_lines() {
        assert_eq!(classify(&[("highway", "proposed")]), Some(Vec::new()));
        assert_eq!(classify(&[("highway", "primary"), ("tunnel", "yes")]), None);
        assert_eq!(classify(&[("highway", "pedestrian"), ("area", "yes")]), None);
        assert_eq!(classify(&[("building", "yes")]), None);
        assert_eq!(classify(&[("waterway", "dam")]), None);
        assert_eq!(
            classify(&[("waterway", "stream")]),
            one(PolylineDescriptor::Waterway { width: 3.0 })
        );
        assert_eq!(paths(&[("aeroway", "runway")])[0].width, 45.0);
        assert_eq!(paths(&[("aeroway", "taxiway")])[0].width, 20.0);
        assert_eq!(
            classify(&[("barrier", "hedge")]),
            one(PolylineDescriptor::Wall {
                wall_type: crate::WallType::Hedge,
                height: 1.0
            })
        );
        assert!(matches!(
            classify(&[("natural", "tree_row")]).unwrap()[0],
            Qualifier::Modifier(Modifier::NodeRow { spacing, .. }) if spacing == 10.0
        ));
    }
}
