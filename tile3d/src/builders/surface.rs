use geom::{triangulate, Pt2D, Ring};

use super::{Mesh, Tile3DMultipolygon};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceOrientation {
    /// u follows the longest edge
    Along,
    /// v follows the longest edge
    Across,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceParams {
    /// Meters per texture repeat. Ignored when stretching.
    pub uv_scale: f64,
    /// Rotate the texture to line up with the longest edge of the first outer ring.
    pub is_oriented: bool,
    pub orientation: SurfaceOrientation,
    /// Fit the texture exactly once over the bounding box, in the rotated frame if oriented.
    pub stretch: bool,
}

impl Default for SurfaceParams {
    fn default() -> SurfaceParams {
        SurfaceParams {
            uv_scale: 1.0,
            is_oriented: false,
            orientation: SurfaceOrientation::Along,
            stretch: false,
        }
    }
}

impl SurfaceParams {
    pub fn tiled(uv_scale: f64) -> SurfaceParams {
        SurfaceParams {
            uv_scale,
            ..Default::default()
        }
    }

    pub fn oriented_stretch(orientation: SurfaceOrientation) -> SurfaceParams {
        SurfaceParams {
            uv_scale: 1.0,
            is_oriented: true,
            orientation,
            stretch: true,
        }
    }
}

/// Flat, upward-facing triangles at height 0.
pub struct SurfaceBuilder;

impl SurfaceBuilder {
    pub fn build(multipolygon: &Tile3DMultipolygon, params: &SurfaceParams) -> Mesh {
        let mut mesh = Mesh::new();
        let polygons = multipolygon.polygons();
        if polygons.is_empty() {
            return mesh;
        }
        let frame = UvFrame::new(&polygons, params);

        for (outer, holes) in &polygons {
            for tri in triangulate(outer, holes) {
                if tri.area() < geom::EPSILON_DIST * geom::EPSILON_DIST {
                    continue;
                }
                let tri = if tri.signed_area() > 0.0 {
                    tri.reversed()
                } else {
                    tri
                };
                for pt in tri.points() {
                    mesh.push(pt.to_3d(0.0), frame.uv(pt));
                }
            }
        }
        mesh
    }
}

struct UvFrame {
    sin: f64,
    cos: f64,
    swap: bool,
    scale: f64,
    /// Rotated-frame bounds as (min_u, min_v, width, height), when stretching
    stretch: Option<(f64, f64, f64, f64)>,
}

impl UvFrame {
    fn new(polygons: &[(Ring, Vec<Ring>)], params: &SurfaceParams) -> UvFrame {
        let angle = if params.is_oriented {
            polygons[0].0.longest_edge().angle().radians()
        } else {
            0.0
        };
        let mut frame = UvFrame {
            sin: angle.sin(),
            cos: angle.cos(),
            swap: params.is_oriented && params.orientation == SurfaceOrientation::Across,
            scale: if params.uv_scale > 0.0 {
                params.uv_scale
            } else {
                1.0
            },
            stretch: None,
        };

        if params.stretch {
            let (mut min_u, mut min_v) = (f64::MAX, f64::MAX);
            let (mut max_u, mut max_v) = (f64::MIN, f64::MIN);
            for (outer, _) in polygons {
                for pt in outer.points() {
                    let [u, v] = frame.rotate(*pt);
                    min_u = min_u.min(u);
                    min_v = min_v.min(v);
                    max_u = max_u.max(u);
                    max_v = max_v.max(v);
                }
            }
            frame.stretch = Some((min_u, min_v, max_u - min_u, max_v - min_v));
        }
        frame
    }

    fn rotate(&self, pt: Pt2D) -> [f64; 2] {
        let u = pt.x() * self.cos + pt.y() * self.sin;
        let v = -pt.x() * self.sin + pt.y() * self.cos;
        if self.swap {
            [v, u]
        } else {
            [u, v]
        }
    }

    fn uv(&self, pt: Pt2D) -> [f64; 2] {
        let [u, v] = self.rotate(pt);
        match self.stretch {
            Some((min_u, min_v, width, height)) => [
                if width > 0.0 { (u - min_u) / width } else { 0.0 },
                if height > 0.0 { (v - min_v) / height } else { 0.0 },
            ],
            None => [u / self.scale, v / self.scale],
        }
    }
}

#[cfg(test)]
mod tests {
    use vector_features::RingType;

    use super::*;

    fn rect(w: f64, h: f64) -> Vec<Pt2D> {
        vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(w, 0.0),
            Pt2D::new(w, h),
            Pt2D::new(0.0, h),
        ]
    }

    #[test]
    fn triangles_face_up_either_winding() {
        for pts in [rect(4.0, 2.0), rect(4.0, 2.0).into_iter().rev().collect()] {
            let mut mp = Tile3DMultipolygon::new();
            mp.add_ring(RingType::Outer, pts);
            let mesh = SurfaceBuilder::build(&mp, &SurfaceParams::tiled(2.0));
            assert_eq!(mesh.vertex_count(), 6);
            assert!(mesh.faces_up());
            assert!((mesh.footprint_area() - 8.0).abs() < 1e-9);
            assert_eq!(mesh.uv_at(0)[0], mesh.vertex(0).x / 2.0);
        }
    }

    #[test]
    fn holes_are_cut_out() {
        let mut mp = Tile3DMultipolygon::new();
        mp.add_ring(RingType::Outer, rect(10.0, 10.0));
        mp.add_ring(
            RingType::Inner,
            vec![
                Pt2D::new(4.0, 4.0),
                Pt2D::new(6.0, 4.0),
                Pt2D::new(6.0, 6.0),
                Pt2D::new(4.0, 6.0),
            ],
        );
        let mesh = SurfaceBuilder::build(&mp, &SurfaceParams::default());
        assert!((mesh.footprint_area() - 96.0).abs() < 1e-9);
    }

    #[test]
    fn oriented_stretch_spans_unit_square() {
        // A long thin rectangle, rotated 30 degrees
        let (sin, cos) = 30.0_f64.to_radians().sin_cos();
        let pts = rect(20.0, 5.0)
            .into_iter()
            .map(|pt| Pt2D::new(pt.x() * cos - pt.y() * sin, pt.x() * sin + pt.y() * cos))
            .collect();
        let mut mp = Tile3DMultipolygon::new();
        mp.add_ring(RingType::Outer, pts);

        for orientation in [SurfaceOrientation::Along, SurfaceOrientation::Across] {
            let mesh = SurfaceBuilder::build(&mp, &SurfaceParams::oriented_stretch(orientation));
            for idx in 0..mesh.vertex_count() {
                let [u, v] = mesh.uv_at(idx);
                assert!(u > -1e-9 && u < 1.0 + 1e-9);
                assert!(v > -1e-9 && v < 1.0 + 1e-9);
                // Corners only, so each coordinate is 0 or 1
                assert!(u.abs() < 1e-9 || (u - 1.0).abs() < 1e-9);
                assert!(v.abs() < 1e-9 || (v - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn empty_for_degenerate_rings() {
        let mut mp = Tile3DMultipolygon::new();
        mp.add_ring(
            RingType::Outer,
            vec![Pt2D::new(0.0, 0.0), Pt2D::new(1.0, 1.0), Pt2D::new(2.0, 2.0)],
        );
        assert!(SurfaceBuilder::build(&mp, &SurfaceParams::default()).is_empty());
    }
}
