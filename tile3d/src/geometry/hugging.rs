use super::GeometryArrays;
use crate::builders::{
    project_geometry_on_terrain, RoadBuilder, RoadParams, SurfaceBuilder, SurfaceParams,
    Tile3DMultipolygon,
};
use crate::{ProjectedTexture, TerrainGrid, Tile3DHuggingGeometry};

/// Collects water for one feature. It lies right on the terrain and is rendered separately from
/// the projected decals.
pub struct HuggingGeometryBuilder<'a> {
    grid: &'a TerrainGrid,
    arrays: GeometryArrays,
}

impl<'a> HuggingGeometryBuilder<'a> {
    pub fn new(grid: &'a TerrainGrid) -> HuggingGeometryBuilder<'a> {
        HuggingGeometryBuilder {
            grid,
            arrays: GeometryArrays::default(),
        }
    }

    pub fn add_polygon(
        &mut self,
        multipolygon: &Tile3DMultipolygon,
        texture: ProjectedTexture,
        params: &SurfaceParams,
    ) {
        let flat = SurfaceBuilder::build(multipolygon, params);
        let draped = project_geometry_on_terrain(self.grid, &flat, 0.0);
        if !draped.is_empty() {
            self.arrays.add(&draped, texture.id());
        }
    }

    pub fn add_path(&mut self, params: &RoadParams, texture: ProjectedTexture) {
        let road = RoadBuilder::build(params);
        let draped = project_geometry_on_terrain(self.grid, &road.mesh, 0.0);
        if !draped.is_empty() {
            self.arrays.add(&draped, texture.id());
        }
    }

    pub fn get_geometry(&self) -> Option<Tile3DHuggingGeometry> {
        if self.arrays.is_empty() {
            return None;
        }
        Some(Tile3DHuggingGeometry {
            bounding_box: self.arrays.bounding_box.clone(),
            position: self.arrays.position.clone(),
            normal: self.arrays.normal.clone(),
            uv: self.arrays.uv.clone(),
            texture_id: self.arrays.texture_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use geom::Pt2D;

    use super::*;
    use crate::FlatTerrain;

    #[test]
    fn water_follows_the_terrain() {
        let grid = TerrainGrid::sample(&FlatTerrain(12.0), 0, 0, 16, 2).unwrap();
        let mut builder = HuggingGeometryBuilder::new(&grid);
        let mut params = RoadParams::new(vec![Pt2D::new(5.0, 5.0), Pt2D::new(50.0, 60.0)], 3.0);
        params.uv_follow_road = false;
        builder.add_path(&params, ProjectedTexture::Water);

        let geometry = builder.get_geometry().unwrap();
        assert!(geometry.position.chunks(3).all(|pt| pt[1] == 12.0));
        assert!(geometry.texture_id.iter().all(|id| *id == ProjectedTexture::Water.id()));
        assert_eq!(geometry.bounding_box.min_y, 12.0);
    }
}
