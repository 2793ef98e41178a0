//! Stateless geometry builders. Each one turns a shape and some parameters into a `Mesh`, and
//! degenerate input produces an empty mesh instead of an error.

mod extruded;
mod fence;
mod multipolygon;
mod projection;
mod road;
mod surface;

use geom::Pt3D;

pub use self::extruded::{ExtrudedBuilder, ExtrudedOutput, ExtrusionParams};
pub use self::fence::{FenceBuilder, FenceParams};
pub use self::multipolygon::{Tile3DMultipolygon, Tile3DRing};
pub use self::projection::{project_geometry_on_terrain, project_line_on_terrain, ProjectedLine};
pub use self::road::{RoadBuilder, RoadOutput, RoadParams, RoadSide};
pub use self::surface::{SurfaceBuilder, SurfaceOrientation, SurfaceParams};

/// A triangle soup. Positions are `[x, height, z]` triples and uvs are pairs. Normals are
/// either empty, meaning the mesh lies on the ground and faces up, or one triple per vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub position: Vec<f64>,
    pub uv: Vec<f64>,
    pub normal: Vec<f64>,
}

impl Mesh {
    pub fn new() -> Mesh {
        Mesh::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.position.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    pub fn has_normals(&self) -> bool {
        !self.normal.is_empty()
    }

    pub fn push(&mut self, pt: Pt3D, uv: [f64; 2]) {
        self.position.extend([pt.x, pt.y, pt.z]);
        self.uv.extend(uv);
    }

    pub fn push_with_normal(&mut self, pt: Pt3D, uv: [f64; 2], normal: Pt3D) {
        self.push(pt, uv);
        self.normal.extend([normal.x, normal.y, normal.z]);
    }

    pub fn vertex(&self, idx: usize) -> Pt3D {
        Pt3D::new(
            self.position[idx * 3],
            self.position[idx * 3 + 1],
            self.position[idx * 3 + 2],
        )
    }

    pub fn uv_at(&self, idx: usize) -> [f64; 2] {
        [self.uv[idx * 2], self.uv[idx * 2 + 1]]
    }

    /// Appends another mesh. Mixing a mesh with normals and one without leaves the normals
    /// unusable, so callers keep to one kind.
    pub fn append(&mut self, other: &Mesh) {
        self.position.extend_from_slice(&other.position);
        self.uv.extend_from_slice(&other.uv);
        self.normal.extend_from_slice(&other.normal);
    }

    /// The summed area of every triangle, seen from above.
    pub fn footprint_area(&self) -> f64 {
        let mut sum = 0.0;
        for tri in 0..self.vertex_count() / 3 {
            let a = self.vertex(tri * 3).to_2d();
            let b = self.vertex(tri * 3 + 1).to_2d();
            let c = self.vertex(tri * 3 + 2).to_2d();
            sum += ((b - a).cross(c - a) / 2.0).abs();
        }
        sum
    }

    /// True when every triangle seen from above has the winding of an upward-facing triangle.
    pub fn faces_up(&self) -> bool {
        (0..self.vertex_count() / 3).all(|tri| {
            let a = self.vertex(tri * 3).to_2d();
            let b = self.vertex(tri * 3 + 1).to_2d();
            let c = self.vertex(tri * 3 + 2).to_2d();
            (b - a).cross(c - a) <= 0.0
        })
    }
}
