//! Per-feature accumulators. Each one runs builders for a single feature, drapes or places the
//! result, and packs it into the `f32`/`u8` arrays of one output category.

mod extruded;
mod hugging;
mod projected;

use geom::Bounds3D;

use crate::builders::Mesh;

pub use self::extruded::ExtrudedGeometryBuilder;
pub use self::hugging::HuggingGeometryBuilder;
pub use self::projected::ProjectedGeometryBuilder;

/// Parallel vertex arrays. Every vertex has exactly one entry (or one group of entries) in
/// each array.
#[derive(Default)]
struct GeometryArrays {
    position: Vec<f32>,
    normal: Vec<f32>,
    uv: Vec<f32>,
    texture_id: Vec<u8>,
    bounding_box: Bounds3D,
}

impl GeometryArrays {
    fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// Meshes without normals face straight up.
    fn add(&mut self, mesh: &Mesh, texture_id: u8) {
        let start = self.position.len();
        self.position.extend(mesh.position.iter().map(|x| *x as f32));
        self.uv.extend(mesh.uv.iter().map(|x| *x as f32));
        if mesh.has_normals() {
            self.normal.extend(mesh.normal.iter().map(|x| *x as f32));
        } else {
            for _ in 0..mesh.vertex_count() {
                self.normal.extend([0.0, 1.0, 0.0]);
            }
        }
        self.texture_id
            .extend(std::iter::repeat(texture_id).take(mesh.vertex_count()));
        self.bounding_box
            .include_positions(&self.position[start..]);
    }
}

/// `0xRRGGBB` to opaque RGBA.
fn rgba(color: u32) -> [u8; 4] {
    [
        ((color >> 16) & 0xff) as u8,
        ((color >> 8) & 0xff) as u8,
        (color & 0xff) as u8,
        255,
    ]
}

#[cfg(test)]
mod tests {
    use geom::Pt3D;

    use super::*;

    #[test]
    fn arrays_stay_parallel() {
        let mut arrays = GeometryArrays::default();
        let mut flat = Mesh::new();
        for idx in 0..3 {
            flat.push(Pt3D::new(idx as f64, 2.0, -(idx as f64)), [0.0, 0.0]);
        }
        arrays.add(&flat, 4);
        arrays.add(&flat, 5);
        assert_eq!(arrays.position.len(), 18);
        assert_eq!(arrays.normal.len(), 18);
        assert_eq!(arrays.uv.len(), 12);
        assert_eq!(arrays.texture_id, vec![4, 4, 4, 5, 5, 5]);
        assert_eq!(arrays.bounding_box.min_z, -2.0);
        assert_eq!(arrays.bounding_box.max_x, 2.0);
    }

    #[test]
    fn colors() {
        assert_eq!(rgba(0xA3CABD), [0xA3, 0xCA, 0xBD, 255]);
    }
}
