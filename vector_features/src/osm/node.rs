use abstutil::Tags;

use super::helpers::{parse_meters, tree_height, tree_type};
use crate::{FeatureClassifier, PointDescriptor, Qualifier};

pub struct OsmNodeClassifier;

fn label_priority(place: &str) -> Option<f64> {
    match place {
        "city" => Some(4.0),
        "town" => Some(3.0),
        "village" | "suburb" => Some(2.0),
        "neighbourhood" => Some(1.0),
        _ => None,
    }
}

impl FeatureClassifier<PointDescriptor, Tags> for OsmNodeClassifier {
    fn from_tags(&self, tags: &Tags) -> Option<Vec<Qualifier<PointDescriptor>>> {
        let descriptor = if tags.is("natural", "tree") {
            PointDescriptor::Tree {
                height: tree_height(tags),
                tree_type: tree_type(tags),
            }
        } else if tags.is("emergency", "fire_hydrant") {
            PointDescriptor::Hydrant
        } else if tags.is("highway", "street_lamp") {
            PointDescriptor::StreetLamp
        } else if tags.is("advertising", "column") {
            PointDescriptor::AdColumn
        } else if tags.is("amenity", "bench") {
            PointDescriptor::Bench
        } else if tags.is("leisure", "picnic_table") {
            PointDescriptor::PicnicTable
        } else if tags.is("highway", "bus_stop") {
            PointDescriptor::BusStop
        } else if tags.is("power", "tower") {
            PointDescriptor::TransmissionTower
        } else if tags.is("power", "pole") {
            PointDescriptor::UtilityPole
        } else if tags.is("power", "generator") && tags.is("generator:source", "wind") {
            PointDescriptor::WindTurbine {
                height: parse_meters(tags.get_str("height")),
            }
        } else if tags.is("barrier", "bollard") {
            PointDescriptor::Bollard
        } else {
            let priority = label_priority(tags.get_str("place")?)?;
            let text = tags.get_str("name")?.trim();
            if text.is_empty() {
                return Some(Vec::new());
            }
            PointDescriptor::Label {
                text: text.to_string(),
                priority,
            }
        };
        Some(vec![Qualifier::Descriptor(descriptor)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(kv: &[(&str, &str)]) -> Option<Vec<Qualifier<PointDescriptor>>> {
        let tags: Tags = kv.iter().cloned().collect();
        OsmNodeClassifier.from_tags(&tags)
    }

    #[test]
    fn points() {
        assert_eq!(
            classify(&[("natural", "tree"), ("height", "9"), ("leaf_type", "needleleaved")]),
            Some(vec![Qualifier::Descriptor(PointDescriptor::Tree {
                height: Some(9.0),
                tree_type: crate::TreeType::Pine,
            })])
        );
        assert_eq!(
            classify(&[("power", "generator"), ("generator:source", "wind")]),
            Some(vec![Qualifier::Descriptor(PointDescriptor::WindTurbine {
                height: None
            })])
        );
        assert_eq!(classify(&[("power", "generator")]), None);
        assert_eq!(classify(&[("amenity", "cafe")]), None);
    }

    #[test]
    fn labels() {
        assert_eq!(
            classify(&[("place", "town"), ("name", "Springfield")]),
            Some(vec![Qualifier::Descriptor(PointDescriptor::Label {
                text: "Springfield".to_string(),
                priority: 3.0,
            })])
        );
        assert_eq!(classify(&[("place", "town")]), None);
        assert_eq!(classify(&[("place", "town"), ("name", " ")]), Some(Vec::new()));
        assert_eq!(classify(&[("place", "island"), ("name", "Foo")]), None);
    }
}
