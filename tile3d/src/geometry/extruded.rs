use vector_features::{OsmReference, RingType};

use super::{rgba, GeometryArrays};
use crate::builders::{ExtrudedBuilder, ExtrusionParams, Mesh, Tile3DMultipolygon};
use crate::{ExtrudedTexture, TerrainGrid, Tile3DExtrudedGeometry};

/// Collects the walls and roofs of one building. Buildings stand on the lowest terrain point
/// under their outline, so no wall floats on a slope.
pub struct ExtrudedGeometryBuilder<'a> {
    grid: &'a TerrainGrid,
    arrays: GeometryArrays,
    color: Vec<u8>,
}

impl<'a> ExtrudedGeometryBuilder<'a> {
    pub fn new(grid: &'a TerrainGrid) -> ExtrudedGeometryBuilder<'a> {
        ExtrudedGeometryBuilder {
            grid,
            arrays: GeometryArrays::default(),
            color: Vec::new(),
        }
    }

    pub fn add_extrusion(
        &mut self,
        multipolygon: &Tile3DMultipolygon,
        params: &ExtrusionParams,
        wall_texture: ExtrudedTexture,
        wall_color: u32,
        roof_texture: ExtrudedTexture,
        roof_color: u32,
    ) {
        let output = ExtrudedBuilder::build(multipolygon, params);
        if output.is_empty() {
            return;
        }
        let base = self.terrain_base(multipolygon);
        self.add_mesh(output.walls, base, wall_texture, wall_color);
        self.add_mesh(output.roof, base, roof_texture, roof_color);
    }

    fn terrain_base(&self, multipolygon: &Tile3DMultipolygon) -> f64 {
        let mut base = f64::MAX;
        for ring in &multipolygon.rings {
            if ring.ring_type == RingType::Outer {
                for pt in &ring.nodes {
                    base = base.min(self.grid.height_at(*pt));
                }
            }
        }
        if base == f64::MAX {
            0.0
        } else {
            base
        }
    }

    fn add_mesh(&mut self, mut mesh: Mesh, base: f64, texture: ExtrudedTexture, color: u32) {
        if mesh.is_empty() {
            return;
        }
        for y in mesh.position.iter_mut().skip(1).step_by(3) {
            *y += base;
        }
        self.arrays.add(&mesh, texture.id());
        let rgba = rgba(color);
        for _ in 0..mesh.vertex_count() {
            self.color.extend(rgba);
        }
    }

    pub fn get_geometry(&self, osm_reference: OsmReference) -> Option<Tile3DExtrudedGeometry> {
        if self.arrays.is_empty() {
            return None;
        }
        Some(Tile3DExtrudedGeometry {
            osm_reference,
            bounding_box: self.arrays.bounding_box.clone(),
            position: self.arrays.position.clone(),
            normal: self.arrays.normal.clone(),
            uv: self.arrays.uv.clone(),
            texture_id: self.arrays.texture_id.clone(),
            color: self.color.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use geom::Pt2D;
    use vector_features::OsmReferenceType;

    use super::*;
    use crate::tile_size;

    #[test]
    fn stands_on_the_lowest_corner() {
        let size = tile_size(16);
        let provider = move |x: f64, _: f64, _: bool| Some((x - 2.0 * size) * 0.1);
        let grid = TerrainGrid::sample(&provider, 2, 0, 16, 4).unwrap();

        let mut mp = Tile3DMultipolygon::new();
        mp.add_ring(
            RingType::Outer,
            vec![
                Pt2D::new(100.0, 100.0),
                Pt2D::new(120.0, 100.0),
                Pt2D::new(120.0, 110.0),
                Pt2D::new(100.0, 110.0),
            ],
        );
        let mut builder = ExtrudedGeometryBuilder::new(&grid);
        builder.add_extrusion(
            &mp,
            &ExtrusionParams::flat(0.0, 6.0),
            ExtrudedTexture::FacadeBrick,
            0xff0000,
            ExtrudedTexture::RoofTiles,
            0x00ff00,
        );
        let geometry = builder
            .get_geometry(OsmReference::new(OsmReferenceType::Way, 7))
            .unwrap();

        let vertices = geometry.position.len() / 3;
        assert_eq!(geometry.color.len(), vertices * 4);
        assert_eq!(geometry.texture_id.len(), vertices);
        assert!((geometry.bounding_box.min_y - 10.0).abs() < 1e-3);
        assert!((geometry.bounding_box.max_y - 16.0).abs() < 1e-3);
        // Walls come first, then the roof
        assert_eq!(&geometry.color[0..4], &[255, 0, 0, 255]);
        assert_eq!(&geometry.color[geometry.color.len() - 4..], &[0, 255, 0, 255]);
        assert_eq!(geometry.osm_reference.id, 7);
    }
}
