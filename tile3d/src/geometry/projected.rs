use geom::Pt2D;

use super::GeometryArrays;
use crate::builders::{
    project_geometry_on_terrain, project_line_on_terrain, FenceBuilder, FenceParams, Mesh,
    RoadBuilder, RoadParams, SurfaceBuilder, SurfaceParams, Tile3DMultipolygon,
};
use crate::{ProjectedTexture, TerrainGrid, Tile3DProjectedGeometry, Tile3DTerrainMaskGeometry};

/// Collects the ground-level geometry of one feature: surfaces and ribbons draped on the
/// terrain, plus fences and raised edges standing on it.
pub struct ProjectedGeometryBuilder<'a> {
    grid: &'a TerrainGrid,
    arrays: GeometryArrays,
    mask: Vec<f32>,
    z_index: f64,
}

impl<'a> ProjectedGeometryBuilder<'a> {
    pub fn new(grid: &'a TerrainGrid) -> ProjectedGeometryBuilder<'a> {
        ProjectedGeometryBuilder {
            grid,
            arrays: GeometryArrays::default(),
            mask: Vec::new(),
            z_index: 0.0,
        }
    }

    pub fn set_z_index(&mut self, z_index: f64) {
        self.z_index = z_index;
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// A surface draped `height` meters above the terrain. If `is_mask`, its footprint also
    /// hides the terrain texture.
    pub fn add_polygon(
        &mut self,
        multipolygon: &Tile3DMultipolygon,
        texture: ProjectedTexture,
        params: &SurfaceParams,
        height: f64,
        is_mask: bool,
    ) {
        let flat = SurfaceBuilder::build(multipolygon, params);
        self.add_flat(&flat, texture, height, is_mask);
    }

    /// A ribbon along a line. Returns the outline of the ribbon, which is empty if nothing was
    /// built.
    pub fn add_path(
        &mut self,
        params: &RoadParams,
        texture: ProjectedTexture,
        height: f64,
        is_mask: bool,
    ) -> Vec<Pt2D> {
        let road = RoadBuilder::build(params);
        self.add_flat(&road.mesh, texture, height, is_mask);
        road.border
    }

    /// Vertical strips standing on the terrain along a line, between `min_height` and `height`
    /// above it.
    pub fn add_fence(
        &mut self,
        vertices: &[Pt2D],
        min_height: f64,
        height: f64,
        texture: ProjectedTexture,
        uv_width: f64,
        uv_height: f64,
    ) {
        for piece in project_line_on_terrain(self.grid, vertices) {
            let mesh = FenceBuilder::build(&FenceParams {
                vertices: piece.vertices,
                min_height,
                height,
                uv_width,
                uv_height,
                uv_horizontal_offset: piece.start_progress,
            });
            if !mesh.is_empty() {
                self.arrays.add(&mesh, texture.id());
            }
        }
    }

    /// A ribbon raised `height` meters above the terrain, with sides down to the ground, like a
    /// wall or a hedge.
    pub fn add_extruded_path(
        &mut self,
        params: &RoadParams,
        height: f64,
        texture: ProjectedTexture,
    ) {
        if !(height > 0.0) {
            return;
        }
        let border = self.add_path(params, texture, height, false);
        if !border.is_empty() {
            self.add_fence(&border, 0.0, height, texture, 1.0, 1.0);
        }
    }

    fn add_flat(&mut self, flat: &Mesh, texture: ProjectedTexture, height: f64, is_mask: bool) {
        if flat.is_empty() {
            return;
        }
        let draped = project_geometry_on_terrain(self.grid, flat, height);
        if draped.is_empty() {
            return;
        }
        self.arrays.add(&draped, texture.id());
        if is_mask {
            for idx in 0..flat.vertex_count() {
                let pt = flat.vertex(idx);
                self.mask.extend([pt.x as f32, pt.z as f32]);
            }
        }
    }

    pub fn get_geometry(&self) -> Option<Tile3DProjectedGeometry> {
        if self.arrays.is_empty() {
            return None;
        }
        Some(Tile3DProjectedGeometry {
            z_index: self.z_index,
            bounding_box: self.arrays.bounding_box.clone(),
            position: self.arrays.position.clone(),
            normal: self.arrays.normal.clone(),
            uv: self.arrays.uv.clone(),
            texture_id: self.arrays.texture_id.clone(),
        })
    }

    pub fn get_terrain_mask_geometry(&self) -> Option<Tile3DTerrainMaskGeometry> {
        if self.mask.is_empty() {
            return None;
        }
        Some(Tile3DTerrainMaskGeometry {
            position: self.mask.clone(),
        })
    }
}
