use abstutil::Tags;

use super::buildings::building_params;
use super::helpers::is_underground;
use crate::{AreaDescriptor, FeatureClassifier, PitchType, Qualifier};

pub struct OsmAreaClassifier;

const HIGHWAY_AREAS: [&str; 10] = [
    "yes",
    "primary",
    "secondary",
    "tertiary",
    "motorway",
    "trunk",
    "unclassified",
    "residential",
    "service",
    "emergency",
];

fn one(descriptor: AreaDescriptor) -> Option<Vec<Qualifier<AreaDescriptor>>> {
    Some(vec![Qualifier::Descriptor(descriptor)])
}

fn pitch_type(tags: &Tags) -> PitchType {
    match tags.get_str("sport") {
        Some("soccer") => PitchType::Football,
        Some("basketball") => PitchType::Basketball,
        Some("tennis") => PitchType::Tennis,
        _ => PitchType::Generic,
    }
}

impl FeatureClassifier<AreaDescriptor, Tags> for OsmAreaClassifier {
    fn from_tags(&self, tags: &Tags) -> Option<Vec<Qualifier<AreaDescriptor>>> {
        if is_underground(tags) {
            return None;
        }

        if let Some(part) = tags.get_str("building:part") {
            if part != "no" {
                return one(AreaDescriptor::BuildingPart(building_params(tags, part)));
            }
        }

        if let Some(building) = tags.get_str("building") {
            if building != "no" && building != "construction" {
                return one(AreaDescriptor::Building(building_params(tags, building)));
            }
        }

        if tags.is_any("natural", &["sand", "beach"]) {
            return one(AreaDescriptor::Sand);
        }

        if tags.is_any("natural", &["rock", "bare_rock"]) {
            return one(AreaDescriptor::Rock);
        }

        if tags.is("leisure", "pitch") {
            return one(AreaDescriptor::Pitch {
                pitch_type: pitch_type(tags),
            });
        }

        if tags.is_any("leisure", &["playground", "dog_park"]) {
            return one(AreaDescriptor::Pitch {
                pitch_type: PitchType::Generic,
            });
        }

        if tags.is("golf", "fairway") {
            return one(AreaDescriptor::ManicuredGrass);
        }

        if tags.is("leisure", "garden") {
            return one(AreaDescriptor::Garden);
        }

        if tags.is("landuse", "grass") {
            return one(AreaDescriptor::Grass);
        }

        if tags.is("leisure", "swimming_pool") && !tags.is_any("location", &["indoor", "roof"]) {
            return one(AreaDescriptor::Water);
        }

        if tags.is_any("landuse", &["construction", "brownfield"]) {
            return one(AreaDescriptor::Construction);
        }

        if tags.is("building", "construction") {
            return one(AreaDescriptor::BuildingConstruction);
        }

        if (tags.is("amenity", "parking")
            && (tags.is("parking", "surface") || !tags.contains_key("parking")))
            || tags.is("amenity", "bicycle_parking")
        {
            return one(AreaDescriptor::Asphalt);
        }

        if tags.is_any("area:highway", &HIGHWAY_AREAS) {
            return one(AreaDescriptor::RoadwayArea);
        }

        if (tags.is("area", "yes") || tags.is("type", "multipolygon"))
            && (tags.is_any("highway", &["pedestrian", "footway"]) || tags.is("man_made", "pier"))
        {
            return one(AreaDescriptor::Pavement);
        }

        if tags.is_any("area:highway", &["footway", "pedestrian"]) {
            return one(AreaDescriptor::Pavement);
        }

        if tags.is("man_made", "bridge") {
            return one(AreaDescriptor::Pavement);
        }

        if tags.is("aeroway", "apron") {
            return one(AreaDescriptor::Pavement);
        }

        if tags.is("aeroway", "helipad") {
            return one(AreaDescriptor::Helipad);
        }

        if tags.is("natural", "water") || tags.is_any("landuse", &["reservoir", "basin"]) {
            return one(AreaDescriptor::Water);
        }

        if tags.is("landuse", "forest") || tags.is("natural", "wood") {
            return one(AreaDescriptor::Forest);
        }

        if tags.is("natural", "scrub") {
            return one(AreaDescriptor::Shrubbery);
        }

        if tags.is("landuse", "farmland") {
            return one(AreaDescriptor::Farmland);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(kv: &[(&str, &str)]) -> Option<Vec<Qualifier<AreaDescriptor>>> {
        let tags: Tags = kv.iter().cloned().collect();
        OsmAreaClassifier.from_tags(&tags)
    }

    fn single(kv: &[(&str, &str)]) -> AreaDescriptor {
        let mut list = classify(kv).unwrap();
        assert_eq!(list.len(), 1);
        match list.pop() {
            Some(Qualifier::Descriptor(d)) => d,
            other => panic!("expected a descriptor, got {:?}", other),
        }
    }

    #[test]
    fn first_match_wins() {
        // A building on a beach is still a building
        assert!(matches!(
            single(&[("building", "yes"), ("natural", "sand")]),
            AreaDescriptor::Building(_)
        ));
        assert!(matches!(
            single(&[("building:part", "yes"), ("building", "yes")]),
            AreaDescriptor::BuildingPart(_)
        ));
        // Rules only reached after the earlier ones fail
        assert_eq!(
            single(&[("building", "construction"), ("landuse", "grass")]),
            AreaDescriptor::Grass
        );
        assert_eq!(
            single(&[("building", "construction")]),
            AreaDescriptor::BuildingConstruction
        );
        assert_eq!(
            single(&[("natural", "water"), ("leisure", "garden")]),
            AreaDescriptor::Garden
        );
    }

    #[test]
    fn misc_rules() {
        assert_eq!(classify(&[("building", "yes"), ("tunnel", "yes")]), None);
        assert_eq!(classify(&[("building", "no")]), None);
        assert_eq!(classify(&[("amenity", "cafe")]), None);

        assert_eq!(
            single(&[("leisure", "pitch"), ("sport", "tennis")]),
            AreaDescriptor::Pitch {
                pitch_type: PitchType::Tennis
            }
        );
        assert_eq!(
            single(&[("leisure", "dog_park")]),
            AreaDescriptor::Pitch {
                pitch_type: PitchType::Generic
            }
        );
        assert_eq!(
            single(&[("leisure", "swimming_pool")]),
            AreaDescriptor::Water
        );
        assert_eq!(
            classify(&[("leisure", "swimming_pool"), ("location", "indoor")]),
            None
        );
        assert_eq!(single(&[("amenity", "parking")]), AreaDescriptor::Asphalt);
        assert_eq!(
            classify(&[("amenity", "parking"), ("parking", "multi-storey")]),
            None
        );
        assert_eq!(
            single(&[("area:highway", "residential")]),
            AreaDescriptor::RoadwayArea
        );
        assert_eq!(
            single(&[("highway", "pedestrian"), ("area", "yes")]),
            AreaDescriptor::Pavement
        );
        assert_eq!(classify(&[("highway", "pedestrian")]), None);
        assert_eq!(single(&[("aeroway", "helipad")]), AreaDescriptor::Helipad);
        assert_eq!(single(&[("natural", "wood")]), AreaDescriptor::Forest);
    }
}
