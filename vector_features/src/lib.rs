//! Vector map features and the rules that classify them.
//!
//! Raw features come either from OSM (string tags) or from vector tiles (typed tags, Mapbox
//! rings). Each shape of feature has its own classifier, mapping tags to a list of `Qualifier`s:
//! descriptors saying what the feature is, or modifiers asking for more geometry to be placed
//! later. `VectorFeatureCollectionBuilder` runs the classifiers over a whole tile.

#[macro_use]
extern crate log;

mod collection;
mod descriptors;
mod features;
mod mapbox;
mod mvt;
pub mod osm;
mod qualifiers;
pub mod vector_tile;

pub use crate::collection::{
    EncodedMapboxPolygon, MapboxPolygon, RawArea, RawNode, RawRing, RawTile, RawVectorTileFeature,
    RawWay, VectorFeatureCollectionBuilder,
};
pub use crate::descriptors::{
    AreaDescriptor, BuildingParams, FacadeMaterial, FenceMaterial, PathDescriptor, PathMaterial,
    PathSide, PathType, PitchType, PointDescriptor, PolylineDescriptor, RoofMaterial,
    RoofOrientation, RoofType, TreeType, WallType,
};
pub use crate::features::{
    OsmReference, OsmReferenceType, RingType, VectorArea, VectorAreaRing, VectorFeatureCollection,
    VectorNode, VectorPolyline,
};
pub use crate::mapbox::{is_ring_clockwise, MapboxAreaHandler};
pub use crate::mvt::decode_polygon;
pub use crate::qualifiers::{
    classify_osm, FeatureClassifier, FeatureShape, Modifier, Qualifier, ShapeQualifiers,
};
