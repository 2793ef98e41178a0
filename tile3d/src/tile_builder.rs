use abstutil::Timer;
use road_graph::{RoadGraph, RoadID};
use vector_features::{PolylineDescriptor, RingType, VectorFeatureCollection};

use crate::builders::{SurfaceParams, Tile3DMultipolygon};
use crate::geometry::ProjectedGeometryBuilder;
use crate::handlers::{
    handle_area, handle_node, handle_polyline, path_group, z_index, TileContext, ROADWAY_GROUP,
};
use crate::{
    ProjectedTexture, TerrainGrid, TerrainHeightProvider, Tile3DFeatureCollection, Tile3DOptions,
};

/// Builds the 3D features of one tile from its classified vector features.
///
/// Nothing here is shared between calls except the terrain provider, so one builder can serve
/// many threads, and many builders can share one provider.
pub struct Tile3DFromVectorBuilder<'a> {
    collection: VectorFeatureCollection,
    provider: &'a dyn TerrainHeightProvider,
    options: Tile3DOptions,
}

impl<'a> Tile3DFromVectorBuilder<'a> {
    pub fn new(
        collection: VectorFeatureCollection,
        provider: &'a dyn TerrainHeightProvider,
        options: Tile3DOptions,
    ) -> Tile3DFromVectorBuilder<'a> {
        Tile3DFromVectorBuilder {
            collection,
            provider,
            options,
        }
    }

    /// Missing terrain heights don't stop the build. They're treated as 0 and reported through
    /// the timer.
    pub fn get_features(
        &self,
        x: u32,
        y: u32,
        zoom: u32,
        timer: &mut Timer,
    ) -> Tile3DFeatureCollection {
        let name = format!("build tile {}/{}/{}", zoom, x, y);
        timer.start(name.clone());

        timer.start("sample terrain");
        let grid = TerrainGrid::sample(self.provider, x, y, zoom, self.options.terrain_segments)
            .with_context(timer, format!("tile {}/{}/{}", zoom, x, y));
        timer.stop("sample terrain");

        timer.start("build road graph");
        let (graph, roads) = self.build_road_graph();
        timer.stop("build road graph");

        let ctx = TileContext {
            grid: &grid,
            graph: &graph,
            options: &self.options,
        };
        let mut out = Tile3DFeatureCollection::new(x, y, zoom);

        timer.start_iter("build polylines", self.collection.polylines.len());
        for (polyline, road) in self.collection.polylines.iter().zip(roads) {
            timer.next();
            handle_polyline(&ctx, polyline, road, &mut out);
        }
        add_junctions(&ctx, &mut out);

        timer.start_iter("build areas", self.collection.areas.len());
        for area in &self.collection.areas {
            timer.next();
            handle_area(&ctx, area, &mut out);
        }

        timer.start_iter("build nodes", self.collection.nodes.len());
        for node in &self.collection.nodes {
            timer.next();
            handle_node(&ctx, node, &mut out);
        }

        timer.stop(name);
        out
    }

    /// Registers every path that joins others at junctions. The result has one entry per
    /// polyline.
    fn build_road_graph(&self) -> (RoadGraph, Vec<Option<RoadID>>) {
        let mut graph = RoadGraph::with_epsilon(self.options.intersection_epsilon);
        let mut roads = Vec::with_capacity(self.collection.polylines.len());
        for polyline in &self.collection.polylines {
            let mut road = None;
            if let PolylineDescriptor::Path(path) = &polyline.descriptor {
                if let Some(group) = path_group(path.path_type, path.side) {
                    road = graph.add_road(&polyline.points(), path.width, group);
                }
            }
            roads.push(road);
        }
        graph.init_intersections();
        (graph, roads)
    }
}

/// Covers the middle of roadway junctions, where the ends of the roads meeting there leave
/// gaps.
fn add_junctions(ctx: &TileContext, out: &mut Tile3DFeatureCollection) {
    for junction in ctx.graph.build_intersection_polygons(ROADWAY_GROUP) {
        let mut multipolygon = Tile3DMultipolygon::new();
        multipolygon.add_ring(RingType::Outer, junction.polygon);

        let mut projected = ProjectedGeometryBuilder::new(ctx.grid);
        projected.set_z_index(z_index::JUNCTION);
        projected.add_polygon(
            &multipolygon,
            ProjectedTexture::Asphalt,
            &SurfaceParams::tiled(8.0),
            0.0,
            true,
        );
        match projected.get_geometry() {
            Some(geometry) => out.projected.push(geometry),
            None => debug!("{} has a degenerate polygon", junction.intersection),
        }
        if let Some(mask) = projected.get_terrain_mask_geometry() {
            out.terrain_mask.push(mask);
        }
    }
}
