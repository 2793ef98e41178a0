use serde::{Deserialize, Serialize};

use crate::{Pt2D, Ring};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub pt1: Pt2D,
    pub pt2: Pt2D,
    pub pt3: Pt2D,
}

impl Triangle {
    pub fn new(pt1: Pt2D, pt2: Pt2D, pt3: Pt2D) -> Triangle {
        Triangle { pt1, pt2, pt3 }
    }

    /// Same sign convention as `Ring::signed_area`.
    pub fn signed_area(&self) -> f64 {
        ((self.pt2 - self.pt1).cross(self.pt3 - self.pt1)) / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn reversed(&self) -> Triangle {
        Triangle::new(self.pt1, self.pt3, self.pt2)
    }

    pub fn points(&self) -> [Pt2D; 3] {
        [self.pt1, self.pt2, self.pt3]
    }
}

/// Ear-clips one outer ring minus its holes. A simple ring of N distinct points with no holes
/// yields N-2 triangles. Input earcut can't handle yields no triangles.
pub fn triangulate(outer: &Ring, holes: &[Ring]) -> Vec<Triangle> {
    let mut points: Vec<Pt2D> = outer.distinct_points().to_vec();
    let mut hole_indices = Vec::new();
    for hole in holes {
        hole_indices.push(points.len());
        points.extend(hole.distinct_points().iter().cloned());
    }

    let mut vertices = Vec::with_capacity(points.len() * 2);
    for pt in &points {
        vertices.push(pt.x());
        vertices.push(pt.y());
    }

    let indices = match earcutr::earcut(&vertices, &hole_indices, 2) {
        Ok(indices) => indices,
        Err(_) => return Vec::new(),
    };
    indices
        .chunks_exact(3)
        .map(|tri| Triangle::new(points[tri[0]], points[tri[1]], points[tri[2]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    use super::*;

    fn ring(pts: &[(f64, f64)]) -> Ring {
        Ring::must_close(pts.iter().map(|(x, y)| Pt2D::new(*x, *y)).collect()).unwrap()
    }

    #[test]
    fn n_minus_two_triangles() {
        // An L shape, which isn't convex
        let outer = ring(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 1.0),
            (1.0, 1.0),
            (1.0, 3.0),
            (0.0, 3.0),
        ]);
        let triangles = triangulate(&outer, &[]);
        assert_eq!(triangles.len(), 6 - 2);
        let total: f64 = triangles.iter().map(|t| t.area()).sum();
        assert!((total - outer.area()).abs() < 1e-9);
    }

    #[test]
    fn random_convex_polygons() {
        let mut rng = XorShiftRng::seed_from_u64(42);
        for _ in 0..20 {
            let n = rng.gen_range(3..12);
            let radius = rng.gen_range(1.0..50.0);
            let pts: Vec<(f64, f64)> = (0..n)
                .map(|i| {
                    let theta = (i as f64) / (n as f64) * std::f64::consts::TAU;
                    (radius * theta.cos(), radius * theta.sin())
                })
                .collect();
            let outer = ring(&pts);
            let triangles = triangulate(&outer, &[]);
            assert_eq!(triangles.len(), n - 2);
            let total: f64 = triangles.iter().map(|t| t.area()).sum();
            assert!((total - outer.area()).abs() < 1e-6 * outer.area());
        }
    }

    #[test]
    fn holes_are_subtracted() {
        let outer = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let hole = ring(&[(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0)]);
        let triangles = triangulate(&outer, &[hole]);
        let total: f64 = triangles.iter().map(|t| t.area()).sum();
        assert!((total - 96.0).abs() < 1e-9);
    }
}
