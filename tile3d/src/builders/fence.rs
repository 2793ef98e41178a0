use geom::{Pt3D, EPSILON_DIST};

use super::Mesh;

#[derive(Clone, Debug)]
pub struct FenceParams {
    /// Base points, usually already draped on the terrain
    pub vertices: Vec<Pt3D>,
    /// Both heights are relative to the base points
    pub min_height: f64,
    pub height: f64,
    /// Meters per horizontal texture repeat
    pub uv_width: f64,
    /// Meters per vertical texture repeat
    pub uv_height: f64,
    /// Distance already covered by earlier pieces of the same line, so textures continue
    /// seamlessly across splits.
    pub uv_horizontal_offset: f64,
}

impl FenceParams {
    pub fn new(vertices: Vec<Pt3D>, min_height: f64, height: f64) -> FenceParams {
        FenceParams {
            vertices,
            min_height,
            height,
            uv_width: 1.0,
            uv_height: 1.0,
            uv_horizontal_offset: 0.0,
        }
    }
}

/// Vertical strips along a line.
pub struct FenceBuilder;

impl FenceBuilder {
    pub fn build(params: &FenceParams) -> Mesh {
        let mut mesh = Mesh::new();
        if params.vertices.len() < 2 || !(params.height > params.min_height) {
            return mesh;
        }
        let uv_width = if params.uv_width > 0.0 {
            params.uv_width
        } else {
            1.0
        };
        let uv_height = if params.uv_height > 0.0 {
            params.uv_height
        } else {
            1.0
        };
        let v_top = (params.height - params.min_height) / uv_height;

        let mut dist = params.uv_horizontal_offset;
        for pair in params.vertices.windows(2) {
            let (p1, p2) = (pair[0], pair[1]);
            let dx = p2.x - p1.x;
            let dz = p2.z - p1.z;
            let len = (dx * dx + dz * dz).sqrt();
            if len < EPSILON_DIST {
                continue;
            }
            let normal = Pt3D::new(-dz / len, 0.0, dx / len);
            let u1 = dist / uv_width;
            let u2 = (dist + len) / uv_width;

            let b1 = Pt3D::new(p1.x, p1.y + params.min_height, p1.z);
            let b2 = Pt3D::new(p2.x, p2.y + params.min_height, p2.z);
            let t1 = Pt3D::new(p1.x, p1.y + params.height, p1.z);
            let t2 = Pt3D::new(p2.x, p2.y + params.height, p2.z);

            mesh.push_with_normal(b1, [u1, 0.0], normal);
            mesh.push_with_normal(b2, [u2, 0.0], normal);
            mesh.push_with_normal(t2, [u2, v_top], normal);

            mesh.push_with_normal(b1, [u1, 0.0], normal);
            mesh.push_with_normal(t2, [u2, v_top], normal);
            mesh.push_with_normal(t1, [u1, v_top], normal);

            dist += len;
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quads_per_segment() {
        let mut params = FenceParams::new(
            vec![
                Pt3D::new(0.0, 5.0, 0.0),
                Pt3D::new(3.0, 6.0, 4.0),
                Pt3D::new(3.0, 6.0, 4.0),
                Pt3D::new(3.0, 7.0, 10.0),
            ],
            0.5,
            2.0,
        );
        params.uv_horizontal_offset = 1.0;
        params.uv_height = 3.0;
        let mesh = FenceBuilder::build(&params);
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.normal.len(), mesh.position.len());

        // Heights are relative to each base point
        assert_eq!(mesh.vertex(0).y, 5.5);
        assert_eq!(mesh.vertex(2).y, 8.0);
        // u carries the offset and the running distance
        assert_eq!(mesh.uv_at(0), [1.0, 0.0]);
        assert_eq!(mesh.uv_at(1), [6.0, 0.0]);
        assert_eq!(mesh.uv_at(7), [12.0, 0.0]);
        assert_eq!(mesh.uv_at(2)[1], 0.5);
    }

    #[test]
    fn normals_match_winding() {
        let mesh = FenceBuilder::build(&FenceParams::new(
            vec![Pt3D::new(0.0, 0.0, 0.0), Pt3D::new(1.0, 0.0, 0.0)],
            0.0,
            1.0,
        ));
        let (a, b, c) = (mesh.vertex(0), mesh.vertex(1), mesh.vertex(2));
        let face = b.sub(a).cross(c.sub(a)).normalize();
        let normal = Pt3D::new(mesh.normal[0], mesh.normal[1], mesh.normal[2]);
        assert_eq!(face, normal);
    }

    #[test]
    fn empty_when_not_taller_than_min_height() {
        let vertices = vec![Pt3D::new(0.0, 0.0, 0.0), Pt3D::new(1.0, 0.0, 0.0)];
        assert!(FenceBuilder::build(&FenceParams::new(vertices.clone(), 1.0, 1.0)).is_empty());
        assert!(FenceBuilder::build(&FenceParams::new(vertices.clone(), 0.0, -0.3)).is_empty());
        let single = FenceParams::new(vertices[0..1].to_vec(), 0.0, 2.0);
        assert!(FenceBuilder::build(&single).is_empty());
    }
}
