use std::f64::consts::PI;

use geom::{Pt2D, Ring};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use vector_features::{AreaDescriptor, BuildingParams, TreeType, VectorArea};

use super::{z_index, TileContext};
use crate::builders::{ExtrusionParams, SurfaceOrientation, SurfaceParams, Tile3DMultipolygon};
use crate::geometry::{ExtrudedGeometryBuilder, HuggingGeometryBuilder, ProjectedGeometryBuilder};
use crate::{
    ExtrudedTexture, InstanceType, ProjectedTexture, Tile3DFeatureCollection, Tile3DInstance,
};

const WORLD_UV_SCALE: f64 = 8.0;
/// Facade textures repeat once per this many meters horizontally, and once per level
/// vertically.
const FACADE_UV_WIDTH: f64 = 4.0;
/// Average distance between trees in a forest
const TREE_SPACING: f64 = 9.0;
const SHRUB_SPACING: f64 = 5.0;
const MAX_SCATTERED_PER_AREA: usize = 20_000;

pub fn handle_area(ctx: &TileContext, area: &VectorArea, out: &mut Tile3DFeatureCollection) {
    let multipolygon = Tile3DMultipolygon::from_area(area);

    let surface = match &area.descriptor {
        AreaDescriptor::Building(building) | AreaDescriptor::BuildingPart(building) => {
            if !ctx.options.skip_buildings {
                add_building(ctx, area, &multipolygon, building, out);
            }
            return;
        }
        AreaDescriptor::Water => {
            let mut hugging = HuggingGeometryBuilder::new(ctx.grid);
            hugging.add_polygon(
                &multipolygon,
                ProjectedTexture::Water,
                &SurfaceParams::tiled(WORLD_UV_SCALE),
            );
            if let Some(geometry) = hugging.get_geometry() {
                out.hugging.push(geometry);
            }
            return;
        }
        AreaDescriptor::Forest => {
            if !ctx.options.skip_instances {
                scatter(ctx, area, &multipolygon, TREE_SPACING, out, |rng| {
                    let tree_type = match rng.gen_range(0..3) {
                        0 => TreeType::Generic,
                        1 => TreeType::Pine,
                        _ => TreeType::Beech,
                    };
                    InstanceType::tree(tree_type)
                });
            }
            return;
        }
        AreaDescriptor::Shrubbery => {
            if !ctx.options.skip_instances {
                scatter(ctx, area, &multipolygon, SHRUB_SPACING, out, |_| {
                    InstanceType::Shrub
                });
            }
            return;
        }
        AreaDescriptor::BuildingConstruction | AreaDescriptor::Construction => Surface::tiled(
            ProjectedTexture::Construction,
            z_index::CONSTRUCTION,
            true,
        ),
        AreaDescriptor::Sand => Surface::tiled(ProjectedTexture::Sand, z_index::SAND, true),
        AreaDescriptor::Rock => Surface::tiled(ProjectedTexture::Rock, z_index::ROCK, true),
        AreaDescriptor::Pitch { pitch_type } => Surface {
            texture: ProjectedTexture::pitch(*pitch_type),
            z_index: z_index::PITCH,
            params: SurfaceParams::oriented_stretch(SurfaceOrientation::Along),
            is_mask: true,
        },
        AreaDescriptor::ManicuredGrass => Surface::tiled(
            ProjectedTexture::ManicuredGrass,
            z_index::MANICURED_GRASS,
            false,
        ),
        AreaDescriptor::Garden => {
            Surface::tiled(ProjectedTexture::Garden, z_index::GARDEN, false)
        }
        AreaDescriptor::Grass => Surface::tiled(ProjectedTexture::Grass, z_index::GRASS, false),
        AreaDescriptor::Farmland => {
            Surface::tiled(ProjectedTexture::Farmland, z_index::FARMLAND, false)
        }
        AreaDescriptor::Asphalt => {
            Surface::tiled(ProjectedTexture::Asphalt, z_index::ASPHALT, true)
        }
        AreaDescriptor::RoadwayArea => {
            Surface::tiled(ProjectedTexture::Asphalt, z_index::ROADWAY_AREA, true)
        }
        AreaDescriptor::Pavement => {
            Surface::tiled(ProjectedTexture::Pavement, z_index::PAVEMENT, true)
        }
        AreaDescriptor::Helipad => Surface {
            texture: ProjectedTexture::Helipad,
            z_index: z_index::HELIPAD,
            params: SurfaceParams::oriented_stretch(SurfaceOrientation::Along),
            is_mask: true,
        },
    };

    let mut projected = ProjectedGeometryBuilder::new(ctx.grid);
    projected.set_z_index(surface.z_index);
    projected.add_polygon(
        &multipolygon,
        surface.texture,
        &surface.params,
        0.0,
        surface.is_mask,
    );
    if let Some(geometry) = projected.get_geometry() {
        out.projected.push(geometry);
    }
    if let Some(mask) = projected.get_terrain_mask_geometry() {
        out.terrain_mask.push(mask);
    }
}

struct Surface {
    texture: ProjectedTexture,
    z_index: f64,
    params: SurfaceParams,
    is_mask: bool,
}

impl Surface {
    fn tiled(texture: ProjectedTexture, z_index: f64, is_mask: bool) -> Surface {
        Surface {
            texture,
            z_index,
            params: SurfaceParams::tiled(WORLD_UV_SCALE),
            is_mask,
        }
    }
}

fn add_building(
    ctx: &TileContext,
    area: &VectorArea,
    multipolygon: &Tile3DMultipolygon,
    building: &BuildingParams,
    out: &mut Tile3DFeatureCollection,
) {
    let params = ExtrusionParams {
        min_height: building.min_height,
        height: building.height,
        roof_height: building.roof_height,
        roof_type: building.roof_type,
        roof_direction: building.roof_direction,
        has_walls: building.has_walls,
        wall_uv_width: FACADE_UV_WIDTH,
        wall_uv_height: vector_features::osm::buildings::LEVEL_HEIGHT,
        roof_uv_scale: WORLD_UV_SCALE,
    };
    let mut extruded = ExtrudedGeometryBuilder::new(ctx.grid);
    extruded.add_extrusion(
        multipolygon,
        &params,
        ExtrudedTexture::facade(building.facade_material, building.windows),
        building.facade_color,
        ExtrudedTexture::roof(building.roof_material),
        building.roof_color,
    );
    match extruded.get_geometry(area.osm_reference) {
        Some(geometry) => out.extruded.push(geometry),
        None => debug!("Building {:?} has no geometry", area.osm_reference),
    }
}

/// Places instances on a jittered grid over the area, keeping those inside it and inside the
/// tile. The placement only depends on the area and the seed.
fn scatter<F: Fn(&mut XorShiftRng) -> InstanceType>(
    ctx: &TileContext,
    area: &VectorArea,
    multipolygon: &Tile3DMultipolygon,
    spacing: f64,
    out: &mut Tile3DFeatureCollection,
    pick_type: F,
) {
    let polygons = multipolygon.polygons();
    if polygons.is_empty() {
        return;
    }
    let mut rng = XorShiftRng::seed_from_u64(ctx.options.seed ^ area.osm_reference.id);
    let inside = |pt: Pt2D| {
        polygons.iter().any(|(outer, holes): &(Ring, Vec<Ring>)| {
            outer.contains_pt(pt) && !holes.iter().any(|hole| hole.contains_pt(pt))
        })
    };

    let mut bounds = multipolygon.get_bounds();
    bounds.min_x = bounds.min_x.max(0.0);
    bounds.min_y = bounds.min_y.max(0.0);
    bounds.max_x = bounds.max_x.min(ctx.grid.size());
    bounds.max_y = bounds.max_y.min(ctx.grid.size());
    if bounds.is_empty() {
        return;
    }

    let columns = (bounds.width() / spacing).ceil() as usize;
    let rows = (bounds.height() / spacing).ceil() as usize;
    if columns.saturating_mul(rows) > MAX_SCATTERED_PER_AREA {
        warn!(
            "{:?} is too large to fill with instances ({} x {} cells)",
            area.osm_reference, columns, rows
        );
        return;
    }

    for row in 0..rows {
        for col in 0..columns {
            let x = bounds.min_x + (col as f64 + rng.gen_range(0.0..1.0)) * spacing;
            let y = bounds.min_y + (row as f64 + rng.gen_range(0.0..1.0)) * spacing;
            let instance_type = pick_type(&mut rng);
            let scale = rng.gen_range(0.8..1.2);
            let rotation = rng.gen_range(0.0..2.0 * PI);

            let pt = Pt2D::new(x, y);
            if !ctx.grid.contains(pt) || !inside(pt) {
                continue;
            }
            out.instances.push(Tile3DInstance {
                instance_type,
                x,
                y: ctx.grid.height_at(pt),
                z: y,
                scale,
                rotation,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use road_graph::RoadGraph;
    use vector_features::{
        OsmReference, OsmReferenceType, PitchType, RingType, VectorAreaRing, VectorNode,
    };

    use super::*;
    use crate::{TerrainGrid, Tile3DOptions};

    fn square_area(x: f64, y: f64, size: f64, descriptor: AreaDescriptor) -> VectorArea {
        let pts = [(x, y), (x + size, y), (x + size, y + size), (x, y + size), (x, y)];
        VectorArea {
            rings: vec![VectorAreaRing {
                ring_type: RingType::Outer,
                nodes: pts.iter().map(|(x, y)| VectorNode::vertex(*x, *y)).collect(),
            }],
            osm_reference: OsmReference::new(OsmReferenceType::Way, 42),
            descriptor,
        }
    }

    fn run(area: &VectorArea, options: Tile3DOptions) -> Tile3DFeatureCollection {
        let grid = TerrainGrid::flat(300.0, 4);
        let graph = RoadGraph::new();
        let ctx = TileContext {
            grid: &grid,
            graph: &graph,
            options: &options,
        };
        let mut out = Tile3DFeatureCollection::new(0, 0, 17);
        handle_area(&ctx, area, &mut out);
        out
    }

    fn building() -> BuildingParams {
        let tags: abstutil::Tags = vec![("building", "yes"), ("height", "9")]
            .into_iter()
            .collect();
        vector_features::osm::buildings::building_params(&tags, "yes")
    }

    #[test]
    fn buildings_are_extruded() {
        let area = square_area(10.0, 10.0, 20.0, AreaDescriptor::Building(building()));
        let out = run(&area, Tile3DOptions::default());
        assert_eq!(out.extruded.len(), 1);
        assert!(out.projected.is_empty());
        assert_eq!(out.extruded[0].osm_reference.id, 42);
        assert_eq!(out.extruded[0].bounding_box.max_y, 9.0);

        let skipped = run(
            &area,
            Tile3DOptions {
                skip_buildings: true,
                ..Default::default()
            },
        );
        assert!(skipped.extruded.is_empty());
    }

    #[test]
    fn surfaces_are_projected() {
        let out = run(
            &square_area(10.0, 10.0, 20.0, AreaDescriptor::Pitch {
                pitch_type: PitchType::Tennis,
            }),
            Tile3DOptions::default(),
        );
        assert_eq!(out.projected.len(), 1);
        assert_eq!(out.projected[0].z_index, z_index::PITCH);
        assert_eq!(out.terrain_mask.len(), 1);

        let grass = run(
            &square_area(10.0, 10.0, 20.0, AreaDescriptor::Grass),
            Tile3DOptions::default(),
        );
        assert_eq!(grass.projected.len(), 1);
        assert!(grass.terrain_mask.is_empty());
    }

    #[test]
    fn water_hugs_the_terrain() {
        let out = run(
            &square_area(10.0, 10.0, 20.0, AreaDescriptor::Water),
            Tile3DOptions::default(),
        );
        assert_eq!(out.hugging.len(), 1);
        assert!(out.projected.is_empty());
    }

    #[test]
    fn forests_scatter_trees_deterministically() {
        let area = square_area(50.0, 50.0, 100.0, AreaDescriptor::Forest);
        let first = run(&area, Tile3DOptions::default());
        let second = run(&area, Tile3DOptions::default());
        assert!(!first.instances.is_empty());
        assert_eq!(first.instances, second.instances);
        for instance in &first.instances {
            assert!(instance.instance_type.is_reducible());
            assert!(instance.x >= 50.0 && instance.x <= 150.0);
            assert!(instance.z >= 50.0 && instance.z <= 150.0);
        }

        let reseeded = run(
            &area,
            Tile3DOptions {
                seed: 7,
                ..Default::default()
            },
        );
        assert_ne!(first.instances, reseeded.instances);
    }

    #[test]
    fn forests_are_cut_to_the_tile() {
        let area = square_area(-100.0, -100.0, 150.0, AreaDescriptor::Shrubbery);
        let out = run(&area, Tile3DOptions::default());
        assert!(!out.instances.is_empty());
        for instance in &out.instances {
            assert_eq!(instance.instance_type, InstanceType::Shrub);
            assert!(instance.x >= 0.0 && instance.z >= 0.0);
        }
    }
}
