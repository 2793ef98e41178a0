//! Classifiers over OSM tags.

mod area;
pub mod buildings;
pub mod helpers;
mod node;
pub mod paths;
mod polyline;

pub use self::area::OsmAreaClassifier;
pub use self::node::OsmNodeClassifier;
pub use self::polyline::OsmPolylineClassifier;
