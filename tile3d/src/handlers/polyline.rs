use road_graph::RoadID;
use vector_features::{PathDescriptor, PathType, PolylineDescriptor, VectorPolyline, WallType};

use super::{z_index, TileContext};
use crate::builders::{RoadParams, RoadSide};
use crate::geometry::{HuggingGeometryBuilder, ProjectedGeometryBuilder};
use crate::{ProjectedTexture, Tile3DFeatureCollection};

/// Meters per repeat of textures tiled in world space
const WORLD_UV_SCALE: f64 = 8.0;
/// Meters per repeat of lane markings along a road
const MARKING_LENGTH: f64 = 12.0;
const FENCE_UV_WIDTH: f64 = 2.0;
const HEDGE_WIDTH: f64 = 1.0;
const WALL_WIDTH: f64 = 0.4;

/// `road` is set for paths registered in the tile's road graph. Their ends are mitered against
/// the paths they continue into.
pub fn handle_polyline(
    ctx: &TileContext,
    polyline: &VectorPolyline,
    road: Option<RoadID>,
    out: &mut Tile3DFeatureCollection,
) {
    let points = polyline.points();
    if points.len() < 2 {
        return;
    }
    let mut projected = ProjectedGeometryBuilder::new(ctx.grid);

    match &polyline.descriptor {
        PolylineDescriptor::Path(path) => {
            let mut params = RoadParams::new(points, path.width);
            params.side = path.side.map(RoadSide::from).unwrap_or(RoadSide::Both);
            if let Some(id) = road {
                let road = ctx.graph.road(id);
                params.start_adjacent = ctx.graph.adjacent_vertex(road.first_vertex());
                params.end_adjacent = ctx.graph.adjacent_vertex(road.last_vertex());
            }
            let (texture, z) = style_path(path, &mut params);
            projected.set_z_index(z);
            projected.add_path(&params, texture, 0.0, path.path_type != PathType::Tramway);
        }
        PolylineDescriptor::Fence {
            material,
            height,
            min_height,
        } => {
            projected.set_z_index(z_index::BARRIER);
            projected.add_fence(
                &points,
                *min_height,
                min_height + height,
                ProjectedTexture::fence(*material),
                FENCE_UV_WIDTH,
                *height,
            );
        }
        PolylineDescriptor::Wall { wall_type, height } => {
            let width = if *wall_type == WallType::Hedge {
                HEDGE_WIDTH
            } else {
                WALL_WIDTH
            };
            let mut params = RoadParams::new(points, width);
            params.uv_follow_road = false;
            projected.set_z_index(z_index::BARRIER);
            projected.add_extruded_path(&params, *height, ProjectedTexture::wall(*wall_type));
        }
        PolylineDescriptor::Waterway { width } => {
            let mut params = RoadParams::new(points, *width);
            params.uv_follow_road = false;
            params.uv_scale = WORLD_UV_SCALE;
            let mut hugging = HuggingGeometryBuilder::new(ctx.grid);
            hugging.add_path(&params, ProjectedTexture::Water);
            if let Some(geometry) = hugging.get_geometry() {
                out.hugging.push(geometry);
            }
            return;
        }
        PolylineDescriptor::PowerLine => {
            debug!("Power lines aren't built yet, skipping {:?}", polyline.osm_reference);
            return;
        }
    }

    if let Some(geometry) = projected.get_geometry() {
        out.projected.push(geometry);
    }
    if let Some(mask) = projected.get_terrain_mask_geometry() {
        out.terrain_mask.push(mask);
    }
}

/// Picks the texture and draw order of a path, and sets up its uvs.
fn style_path(path: &PathDescriptor, params: &mut RoadParams) -> (ProjectedTexture, f64) {
    let world = |params: &mut RoadParams| {
        params.uv_follow_road = false;
        params.uv_scale = WORLD_UV_SCALE;
    };
    let follow = |params: &mut RoadParams, repeat: f64| {
        params.uv_follow_road = true;
        params.uv_scale_y = 1.0 / repeat;
    };

    match (path.path_type, path.side) {
        (PathType::Roadway, None) if path.is_roadway_marked => {
            follow(params, MARKING_LENGTH);
            // One repeat of the marking texture per lane
            params.uv_max_x = path.total_lanes().max(1) as f64;
            (ProjectedTexture::AsphaltMarked, z_index::ROADWAY)
        }
        (PathType::Roadway, _) => {
            world(params);
            let texture = path
                .material
                .map(ProjectedTexture::path_material)
                .unwrap_or(ProjectedTexture::Asphalt);
            (texture, z_index::ROADWAY)
        }
        (PathType::Footway, Some(_)) => {
            world(params);
            (ProjectedTexture::Pavement, z_index::SIDEWALK)
        }
        (PathType::Cycleway, Some(_)) => {
            world(params);
            (ProjectedTexture::Cycleway, z_index::SIDE_CYCLEWAY)
        }
        (PathType::Footway, None) => {
            world(params);
            let texture = path
                .material
                .map(ProjectedTexture::path_material)
                .unwrap_or(ProjectedTexture::Footway);
            (texture, z_index::FOOTWAY)
        }
        (PathType::Cycleway, None) => {
            world(params);
            (ProjectedTexture::Cycleway, z_index::CYCLEWAY)
        }
        (PathType::Runway, _) => {
            follow(params, path.width);
            (ProjectedTexture::Runway, z_index::RUNWAY)
        }
        (PathType::Railway, _) => {
            follow(params, path.width);
            (ProjectedTexture::Railway, z_index::RAILWAY)
        }
        (PathType::Tramway, _) => {
            follow(params, path.width);
            (ProjectedTexture::Tramway, z_index::TRAMWAY)
        }
    }
}

#[cfg(test)]
mod tests {
    use geom::Pt2D;
    use road_graph::RoadGraph;
    use vector_features::{
        FenceMaterial, OsmReference, OsmReferenceType, PathSide, VectorNode,
    };

    use super::*;
    use crate::{TerrainGrid, Tile3DOptions};

    fn polyline(pts: &[(f64, f64)], descriptor: PolylineDescriptor) -> VectorPolyline {
        VectorPolyline {
            nodes: pts.iter().map(|(x, y)| VectorNode::vertex(*x, *y)).collect(),
            osm_reference: OsmReference::new(OsmReferenceType::Way, 1),
            descriptor,
        }
    }

    fn run(polyline: &VectorPolyline) -> Tile3DFeatureCollection {
        let grid = TerrainGrid::flat(200.0, 4);
        let graph = RoadGraph::new();
        let options = Tile3DOptions::default();
        let ctx = TileContext {
            grid: &grid,
            graph: &graph,
            options: &options,
        };
        let mut out = Tile3DFeatureCollection::new(0, 0, 17);
        handle_polyline(&ctx, polyline, None, &mut out);
        out
    }

    #[test]
    fn marked_roadway() {
        let mut path = PathDescriptor::new(PathType::Roadway, 7.0);
        path.lanes_forward = 1;
        path.lanes_backward = 1;
        path.is_roadway_marked = true;
        let out = run(&polyline(&[(10.0, 10.0), (100.0, 10.0)], PolylineDescriptor::Path(path)));
        assert_eq!(out.projected.len(), 1);
        assert_eq!(out.terrain_mask.len(), 1);
        let geometry = &out.projected[0];
        assert_eq!(geometry.z_index, z_index::ROADWAY);
        assert!(geometry
            .texture_id
            .iter()
            .all(|id| *id == ProjectedTexture::AsphaltMarked.id()));
        // u spans the two lanes
        assert!(geometry.uv.chunks(2).any(|uv| uv[0] == 2.0));
    }

    #[test]
    fn sidewalk_goes_under_the_road() {
        let mut path = PathDescriptor::new(PathType::Footway, 11.0);
        path.side = Some(PathSide::Left);
        let out = run(&polyline(&[(10.0, 50.0), (100.0, 50.0)], PolylineDescriptor::Path(path)));
        let geometry = &out.projected[0];
        assert_eq!(geometry.z_index, z_index::SIDEWALK);
        // Left of an eastward line only
        assert!(geometry.position.chunks(3).all(|pt| pt[2] <= 50.0));
    }

    #[test]
    fn flat_fence_builds_nothing() {
        let out = run(&polyline(
            &[(10.0, 10.0), (20.0, 10.0)],
            PolylineDescriptor::Fence {
                material: FenceMaterial::Wood,
                height: 0.0,
                min_height: 0.0,
            },
        ));
        assert!(out.projected.is_empty());
        assert!(out.terrain_mask.is_empty());
    }

    #[test]
    fn fence_stands_on_min_height() {
        let out = run(&polyline(
            &[(10.0, 10.0), (20.0, 10.0)],
            PolylineDescriptor::Fence {
                material: FenceMaterial::Metal,
                height: 1.5,
                min_height: 0.5,
            },
        ));
        let bbox = &out.projected[0].bounding_box;
        assert_eq!(bbox.min_y, 0.5);
        assert_eq!(bbox.max_y, 2.0);
    }

    #[test]
    fn waterway_hugs() {
        let out = run(&polyline(
            &[(10.0, 10.0), (20.0, 30.0)],
            PolylineDescriptor::Waterway { width: 3.0 },
        ));
        assert!(out.projected.is_empty());
        assert_eq!(out.hugging.len(), 1);
    }

    #[test]
    fn adjacency_from_the_graph() {
        let grid = TerrainGrid::flat(200.0, 4);
        let mut graph = RoadGraph::new();
        let a = vec![Pt2D::new(10.0, 10.0), Pt2D::new(50.0, 10.0)];
        let b = vec![Pt2D::new(50.0, 10.0), Pt2D::new(50.0, 60.0)];
        let road_a = graph.add_road(&a, 4.0, 0).unwrap();
        graph.add_road(&b, 4.0, 0);
        graph.init_intersections();

        let options = Tile3DOptions::default();
        let ctx = TileContext {
            grid: &grid,
            graph: &graph,
            options: &options,
        };
        let path = PathDescriptor::new(PathType::Roadway, 4.0);
        let feature = polyline(&[(10.0, 10.0), (50.0, 10.0)], PolylineDescriptor::Path(path));

        let mut joined = Tile3DFeatureCollection::new(0, 0, 17);
        handle_polyline(&ctx, &feature, Some(road_a), &mut joined);
        let mut plain = Tile3DFeatureCollection::new(0, 0, 17);
        handle_polyline(&ctx, &feature, None, &mut plain);

        // The mitered end reaches further out at the corner
        let max_x = |out: &Tile3DFeatureCollection| out.projected[0].bounding_box.max_x;
        assert!(max_x(&joined) > max_x(&plain));
    }
}
