use abstutil::Tags;
use serde::{Deserialize, Serialize};

use crate::osm::{OsmAreaClassifier, OsmNodeClassifier, OsmPolylineClassifier};
use crate::{AreaDescriptor, PointDescriptor, PolylineDescriptor};

/// Asks for extra geometry to be generated from a feature, instead of describing the feature
/// itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Modifier {
    /// Place a point every `spacing` meters along a polyline, each jittered by up to
    /// `randomness` meters.
    NodeRow {
        spacing: f64,
        randomness: f64,
        descriptor: PointDescriptor,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Qualifier<D> {
    Descriptor(D),
    Modifier(Modifier),
}

impl<D> Qualifier<D> {
    pub fn descriptor(&self) -> Option<&D> {
        match self {
            Qualifier::Descriptor(d) => Some(d),
            Qualifier::Modifier(_) => None,
        }
    }
}

/// Maps the tags of one shape of feature to qualifiers.
///
/// `None` means the feature isn't relevant here. `Some(vec![])` means it's relevant, but should
/// produce no geometry, like a fence with no height. Implementations evaluate their rules in a
/// fixed order and return at the first match, so the order of the rules matters.
pub trait FeatureClassifier<D, T: ?Sized> {
    fn from_tags(&self, tags: &T) -> Option<Vec<Qualifier<D>>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureShape {
    Area,
    Polyline,
    Point,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ShapeQualifiers {
    Area(Vec<Qualifier<AreaDescriptor>>),
    Polyline(Vec<Qualifier<PolylineDescriptor>>),
    Point(Vec<Qualifier<PointDescriptor>>),
}

impl ShapeQualifiers {
    pub fn len(&self) -> usize {
        match self {
            ShapeQualifiers::Area(list) => list.len(),
            ShapeQualifiers::Polyline(list) => list.len(),
            ShapeQualifiers::Point(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classifies OSM tags for one shape of feature.
pub fn classify_osm(shape: FeatureShape, tags: &Tags) -> Option<ShapeQualifiers> {
    match shape {
        FeatureShape::Area => OsmAreaClassifier
            .from_tags(tags)
            .map(ShapeQualifiers::Area),
        FeatureShape::Polyline => OsmPolylineClassifier
            .from_tags(tags)
            .map(ShapeQualifiers::Polyline),
        FeatureShape::Point => OsmNodeClassifier
            .from_tags(tags)
            .map(ShapeQualifiers::Point),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(kv: &[(&str, &str)]) -> Tags {
        kv.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn dispatch_by_shape() {
        let building = tags(&[("building", "yes")]);
        assert!(matches!(
            classify_osm(FeatureShape::Area, &building),
            Some(ShapeQualifiers::Area(ref list)) if list.len() == 1
        ));
        // A building isn't a line or a point
        assert_eq!(classify_osm(FeatureShape::Polyline, &building), None);
        assert_eq!(classify_osm(FeatureShape::Point, &building), None);

        let hydrant = tags(&[("emergency", "fire_hydrant")]);
        assert_eq!(
            classify_osm(FeatureShape::Point, &hydrant),
            Some(ShapeQualifiers::Point(vec![Qualifier::Descriptor(
                PointDescriptor::Hydrant
            )]))
        );
    }

    #[test]
    fn relevant_but_empty() {
        let construction = tags(&[("highway", "construction")]);
        let result = classify_osm(FeatureShape::Polyline, &construction);
        assert_eq!(result, Some(ShapeQualifiers::Polyline(Vec::new())));
        assert!(result.unwrap().is_empty());
    }
}
