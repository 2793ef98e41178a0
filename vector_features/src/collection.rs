use abstutil::Tags;
use anyhow::{bail, Context, Result};
use geom::{tile_size, PolyLine};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use serde::{Deserialize, Serialize};

use crate::osm::{OsmAreaClassifier, OsmNodeClassifier, OsmPolylineClassifier};
use crate::vector_tile::{
    VectorTileAreaClassifier, VectorTileNodeClassifier, VectorTilePolylineClassifier,
    VectorTileTags,
};
use crate::{
    decode_polygon, is_ring_clockwise, AreaDescriptor, FeatureClassifier, FeatureShape,
    MapboxAreaHandler, Modifier, OsmReference, OsmReferenceType, PointDescriptor,
    PolylineDescriptor, Qualifier, RingType, VectorArea, VectorAreaRing, VectorFeatureCollection,
    VectorNode, VectorPolyline,
};

/// An OSM node, in tile-local meters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawNode {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub tags: Tags,
}

/// An OSM way. Closed ways may become areas.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawWay {
    pub id: u64,
    pub points: Vec<[f64; 2]>,
    #[serde(default)]
    pub tags: Tags,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawRing {
    pub role: RingType,
    pub points: Vec<[f64; 2]>,
}

/// An OSM multipolygon relation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawArea {
    pub id: u64,
    pub rings: Vec<RawRing>,
    #[serde(default)]
    pub tags: Tags,
}

/// One polygon from a Mapbox vector tile layer, already mapped to a descriptor. Outer and inner
/// rings are told apart by their winding.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapboxPolygon {
    pub descriptor: AreaDescriptor,
    pub rings: Vec<Vec<[f64; 2]>>,
}

/// A Mapbox polygon still in vector tile encoding: geometry command integers in a layer with some
/// extent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncodedMapboxPolygon {
    pub descriptor: AreaDescriptor,
    pub extent: u32,
    pub geometry: Vec<u32>,
}

/// A feature from a vector tile with normalized, typed tags. Points use the first point of the
/// first ring, polylines the first ring.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawVectorTileFeature {
    pub shape: FeatureShape,
    pub rings: Vec<Vec<[f64; 2]>>,
    pub tags: VectorTileTags,
}

/// Everything known about one tile before classification.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawTile {
    pub x: u32,
    pub y: u32,
    pub zoom: u32,
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub ways: Vec<RawWay>,
    #[serde(default)]
    pub areas: Vec<RawArea>,
    #[serde(default)]
    pub mapbox: Vec<MapboxPolygon>,
    #[serde(default)]
    pub encoded_mapbox: Vec<EncodedMapboxPolygon>,
    #[serde(default)]
    pub vector_tile: Vec<RawVectorTileFeature>,
}

/// Classifies raw features and collects the results. Modifiers are expanded here, into more
/// features.
pub struct VectorFeatureCollectionBuilder {
    seed: u64,
    collection: VectorFeatureCollection,
}

impl VectorFeatureCollectionBuilder {
    /// Randomness in modifiers is seeded from `seed` and the OSM ID of the feature, so the same
    /// input always produces the same output.
    pub fn new(seed: u64) -> VectorFeatureCollectionBuilder {
        VectorFeatureCollectionBuilder {
            seed,
            collection: VectorFeatureCollection::default(),
        }
    }

    /// Fails on the first malformed ring.
    pub fn from_raw_tile(raw: &RawTile, seed: u64) -> Result<VectorFeatureCollection> {
        let mut builder = VectorFeatureCollectionBuilder::new(seed);
        for node in &raw.nodes {
            builder.add_osm_node(node);
        }
        for way in &raw.ways {
            builder.add_osm_way(way);
        }
        for area in &raw.areas {
            builder
                .add_osm_area(area)
                .with_context(|| format!("relation {}", area.id))?;
        }
        for (idx, polygon) in raw.mapbox.iter().enumerate() {
            builder
                .add_mapbox_polygon(polygon)
                .with_context(|| format!("Mapbox polygon #{}", idx))?;
        }
        for (idx, polygon) in raw.encoded_mapbox.iter().enumerate() {
            let rings = decode_polygon(&polygon.geometry, polygon.extent, tile_size(raw.zoom))
                .and_then(|rings| {
                    builder.add_mapbox_polygon(&MapboxPolygon {
                        descriptor: polygon.descriptor.clone(),
                        rings,
                    })
                });
            rings.with_context(|| format!("encoded Mapbox polygon #{}", idx))?;
        }
        for (idx, feature) in raw.vector_tile.iter().enumerate() {
            builder
                .add_vector_tile_feature(feature)
                .with_context(|| format!("vector tile feature #{}", idx))?;
        }
        Ok(builder.finish())
    }

    pub fn finish(self) -> VectorFeatureCollection {
        self.collection
    }

    pub fn add_osm_node(&mut self, node: &RawNode) {
        let qualifiers = match OsmNodeClassifier.from_tags(&node.tags) {
            Some(qualifiers) => qualifiers,
            None => return,
        };
        let reference = OsmReference::new(OsmReferenceType::Node, node.id);
        self.add_points(node.x, node.y, reference, qualifiers);
    }

    pub fn add_osm_way(&mut self, way: &RawWay) {
        let reference = OsmReference::new(OsmReferenceType::Way, way.id);
        let is_closed = way.points.len() >= 4 && way.points.first() == way.points.last();
        if is_closed {
            if let Some(qualifiers) = OsmAreaClassifier.from_tags(&way.tags) {
                let ring = VectorAreaRing {
                    ring_type: RingType::Outer,
                    nodes: nodes(&way.points),
                };
                self.add_areas(vec![ring], reference, qualifiers);
                return;
            }
        }
        if let Some(qualifiers) = OsmPolylineClassifier.from_tags(&way.tags) {
            self.add_polylines(&way.points, reference, qualifiers);
        }
    }

    pub fn add_osm_area(&mut self, area: &RawArea) -> Result<()> {
        let qualifiers = match OsmAreaClassifier.from_tags(&area.tags) {
            Some(qualifiers) => qualifiers,
            None => return Ok(()),
        };
        let mut rings = Vec::new();
        for ring in &area.rings {
            check_closed(&ring.points)?;
            rings.push(VectorAreaRing {
                ring_type: ring.role,
                nodes: nodes(&ring.points),
            });
        }
        let reference = OsmReference::new(OsmReferenceType::Relation, area.id);
        self.add_areas(rings, reference, qualifiers);
        Ok(())
    }

    pub fn add_mapbox_polygon(&mut self, polygon: &MapboxPolygon) -> Result<()> {
        let mut handler = MapboxAreaHandler::new(polygon.descriptor.clone());
        for ring in &polygon.rings {
            handler.add_ring(ring)?;
        }
        self.collection.areas.extend(handler.get_features()?);
        Ok(())
    }

    pub fn add_vector_tile_feature(&mut self, feature: &RawVectorTileFeature) -> Result<()> {
        let reference = OsmReference::none();
        match feature.shape {
            FeatureShape::Point => {
                let pt = match feature.rings.first().and_then(|r| r.first()) {
                    Some(pt) => *pt,
                    None => bail!("Point feature has no coordinates"),
                };
                if let Some(qualifiers) = VectorTileNodeClassifier.from_tags(&feature.tags) {
                    self.add_points(pt[0], pt[1], reference, qualifiers);
                }
            }
            FeatureShape::Polyline => {
                let points = match feature.rings.first() {
                    Some(points) => points,
                    None => bail!("Polyline feature has no coordinates"),
                };
                if let Some(qualifiers) = VectorTilePolylineClassifier.from_tags(&feature.tags) {
                    self.add_polylines(points, reference, qualifiers);
                }
            }
            FeatureShape::Area => {
                let qualifiers = match VectorTileAreaClassifier.from_tags(&feature.tags) {
                    Some(qualifiers) => qualifiers,
                    None => return Ok(()),
                };
                for descriptor in qualifiers.into_iter().filter_map(only_descriptor) {
                    self.add_mapbox_polygon(&MapboxPolygon {
                        descriptor,
                        rings: feature.rings.clone(),
                    })?;
                }
            }
        }
        Ok(())
    }

    fn add_points(
        &mut self,
        x: f64,
        y: f64,
        reference: OsmReference,
        qualifiers: Vec<Qualifier<PointDescriptor>>,
    ) {
        for descriptor in qualifiers.into_iter().filter_map(only_descriptor) {
            self.collection.nodes.push(VectorNode {
                x,
                y,
                rotation: 0.0,
                osm_reference: Some(reference),
                descriptor: Some(descriptor),
            });
        }
    }

    fn add_polylines(
        &mut self,
        points: &[[f64; 2]],
        reference: OsmReference,
        qualifiers: Vec<Qualifier<PolylineDescriptor>>,
    ) {
        if points.len() < 2 {
            debug!("Skipping {:?} with {} points", reference, points.len());
            return;
        }
        for qualifier in qualifiers {
            match qualifier {
                Qualifier::Descriptor(descriptor) => {
                    self.collection.polylines.push(VectorPolyline {
                        nodes: nodes(points),
                        osm_reference: reference,
                        descriptor,
                    });
                }
                Qualifier::Modifier(modifier) => self.expand_modifier(points, reference, modifier),
            }
        }
    }

    fn add_areas(
        &mut self,
        mut rings: Vec<VectorAreaRing>,
        reference: OsmReference,
        qualifiers: Vec<Qualifier<AreaDescriptor>>,
    ) {
        normalize_winding(&mut rings);
        for descriptor in qualifiers.into_iter().filter_map(only_descriptor) {
            self.collection.areas.push(VectorArea {
                rings: rings.clone(),
                osm_reference: reference,
                descriptor,
            });
        }
    }

    fn expand_modifier(
        &mut self,
        points: &[[f64; 2]],
        reference: OsmReference,
        modifier: Modifier,
    ) {
        match modifier {
            Modifier::NodeRow {
                spacing,
                randomness,
                descriptor,
            } => {
                let pl = match PolyLine::deduping_new(
                    points.iter().map(|pt| (*pt).into()).collect(),
                ) {
                    Ok(pl) => pl,
                    Err(err) => {
                        debug!("Can't place a row of nodes along {:?}: {}", reference, err);
                        return;
                    }
                };
                let mut rng = XorShiftRng::seed_from_u64(self.seed ^ reference.id);
                for (pt, _) in pl.step_along(spacing, spacing / 2.0) {
                    let (dx, dy) = if randomness > 0.0 {
                        (
                            rng.gen_range(-randomness..=randomness),
                            rng.gen_range(-randomness..=randomness),
                        )
                    } else {
                        (0.0, 0.0)
                    };
                    self.collection.nodes.push(VectorNode {
                        x: pt.x() + dx,
                        y: pt.y() + dy,
                        rotation: rng.gen_range(0.0..std::f64::consts::TAU),
                        osm_reference: Some(reference),
                        descriptor: Some(descriptor.clone()),
                    });
                }
            }
        }
    }
}

fn only_descriptor<D>(qualifier: Qualifier<D>) -> Option<D> {
    match qualifier {
        Qualifier::Descriptor(d) => Some(d),
        Qualifier::Modifier(modifier) => {
            debug!("Ignoring {:?}; it only applies to polylines", modifier);
            None
        }
    }
}

fn nodes(points: &[[f64; 2]]) -> Vec<VectorNode> {
    points.iter().map(|[x, y]| VectorNode::vertex(*x, *y)).collect()
}

fn check_closed(points: &[[f64; 2]]) -> Result<()> {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if first == last => Ok(()),
        _ => bail!("Ring with {} points isn't closed", points.len()),
    }
}

/// Outer rings wind clockwise and holes counter-clockwise, matching Mapbox input.
fn normalize_winding(rings: &mut [VectorAreaRing]) {
    for ring in rings {
        let pts: Vec<[f64; 2]> = ring.nodes.iter().map(|n| [n.x, n.y]).collect();
        let want_clockwise = ring.ring_type == RingType::Outer;
        if is_ring_clockwise(&pts) != want_clockwise {
            ring.nodes.reverse();
        }
    }
}
