use geom::{triangulate, Pt2D, Pt3D, Ring};
use vector_features::RoofType;

use super::{Mesh, Tile3DMultipolygon};

#[derive(Clone, Debug)]
pub struct ExtrusionParams {
    pub min_height: f64,
    /// The top of the whole shape, roof included
    pub height: f64,
    pub roof_height: f64,
    pub roof_type: RoofType,
    /// Degrees clockwise from north, the way a sloped roof faces
    pub roof_direction: Option<f64>,
    pub has_walls: bool,
    pub wall_uv_width: f64,
    pub wall_uv_height: f64,
    pub roof_uv_scale: f64,
}

impl ExtrusionParams {
    /// A box with a flat roof.
    pub fn flat(min_height: f64, height: f64) -> ExtrusionParams {
        ExtrusionParams {
            min_height,
            height,
            roof_height: 0.0,
            roof_type: RoofType::Flat,
            roof_direction: None,
            has_walls: true,
            wall_uv_width: 1.0,
            wall_uv_height: 1.0,
            roof_uv_scale: 1.0,
        }
    }
}

pub struct ExtrudedOutput {
    pub walls: Mesh,
    pub roof: Mesh,
}

impl ExtrudedOutput {
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty() && self.roof.is_empty()
    }
}

/// Roof shapes that can be built. Everything else turns into a flat roof on top of the full
/// height.
enum RoofShape {
    Flat { height: f64 },
    Skillion { base: f64, rise: f64, dir: Pt2D, min_t: f64, max_t: f64 },
    Pyramidal { base: f64, apex: f64 },
}

impl RoofShape {
    fn height_at(&self, pt: Pt2D) -> f64 {
        match self {
            RoofShape::Flat { height } => *height,
            RoofShape::Skillion {
                base,
                rise,
                dir,
                min_t,
                max_t,
            } => {
                let span = max_t - min_t;
                if span <= 0.0 {
                    return base + rise;
                }
                // Highest on the side opposite to where the roof faces
                base + rise * (max_t - pt.dot(*dir)) / span
            }
            RoofShape::Pyramidal { base, .. } => *base,
        }
    }
}

/// Walls and a roof for an area, like a building.
pub struct ExtrudedBuilder;

impl ExtrudedBuilder {
    pub fn build(multipolygon: &Tile3DMultipolygon, params: &ExtrusionParams) -> ExtrudedOutput {
        let mut output = ExtrudedOutput {
            walls: Mesh::new(),
            roof: Mesh::new(),
        };
        let polygons = multipolygon.polygons();
        if polygons.is_empty() || !(params.height > params.min_height) {
            return output;
        }

        for (outer, holes) in &polygons {
            let shape = roof_shape(outer, holes, params);
            if params.has_walls {
                for ring in std::iter::once(outer).chain(holes.iter()) {
                    add_walls(&mut output.walls, ring, params, &shape);
                }
            }
            match shape {
                RoofShape::Pyramidal { base, apex } => {
                    add_pyramid(&mut output.roof, outer, base, apex, params.roof_uv_scale)
                }
                _ => add_roof_surface(&mut output.roof, outer, holes, &shape, params.roof_uv_scale),
            }
        }
        output
    }
}

fn roof_shape(outer: &Ring, holes: &[Ring], params: &ExtrusionParams) -> RoofShape {
    let roof_height = params.roof_height.max(0.0).min(params.height - params.min_height);
    let base = params.height - roof_height;
    if roof_height <= 0.0 {
        return RoofShape::Flat {
            height: params.height,
        };
    }
    match params.roof_type {
        RoofType::Skillion => {
            let dir = match params.roof_direction {
                Some(degrees) => {
                    let (sin, cos) = degrees.to_radians().sin_cos();
                    // North is -y in tile space
                    Pt2D::new(sin, -cos)
                }
                None => {
                    let edge = outer.longest_edge();
                    match edge.direction() {
                        Some(d) => d.perpendicular(),
                        None => Pt2D::new(0.0, -1.0),
                    }
                }
            };
            let mut min_t = f64::MAX;
            let mut max_t = f64::MIN;
            for pt in outer.points() {
                let t = pt.dot(dir);
                min_t = min_t.min(t);
                max_t = max_t.max(t);
            }
            RoofShape::Skillion {
                base,
                rise: roof_height,
                dir,
                min_t,
                max_t,
            }
        }
        RoofType::Pyramidal if holes.is_empty() => RoofShape::Pyramidal {
            base,
            apex: params.height,
        },
        _ => RoofShape::Flat {
            height: params.height,
        },
    }
}

fn face_normal(a: Pt3D, b: Pt3D, c: Pt3D) -> Pt3D {
    b.sub(a).cross(c.sub(a)).normalize()
}

fn add_walls(mesh: &mut Mesh, ring: &Ring, params: &ExtrusionParams, shape: &RoofShape) {
    let uv_width = if params.wall_uv_width > 0.0 {
        params.wall_uv_width
    } else {
        1.0
    };
    let uv_height = if params.wall_uv_height > 0.0 {
        params.wall_uv_height
    } else {
        1.0
    };
    let mut dist = 0.0;
    for line in ring.lines() {
        let normal = match line.direction() {
            Some(d) => d.perpendicular(),
            None => continue,
        };
        let normal = Pt3D::new(normal.x(), 0.0, normal.y());
        let (p1, p2) = (line.pt1(), line.pt2());
        let (top1, top2) = (shape.height_at(p1), shape.height_at(p2));
        let u1 = dist / uv_width;
        let u2 = (dist + line.length()) / uv_width;
        let v = |h: f64| (h - params.min_height) / uv_height;

        let b1 = p1.to_3d(params.min_height);
        let b2 = p2.to_3d(params.min_height);
        let t1 = p1.to_3d(top1);
        let t2 = p2.to_3d(top2);

        mesh.push_with_normal(b1, [u1, 0.0], normal);
        mesh.push_with_normal(t2, [u2, v(top2)], normal);
        mesh.push_with_normal(b2, [u2, 0.0], normal);

        mesh.push_with_normal(b1, [u1, 0.0], normal);
        mesh.push_with_normal(t1, [u1, v(top1)], normal);
        mesh.push_with_normal(t2, [u2, v(top2)], normal);

        dist += line.length();
    }
}

fn add_roof_surface(
    mesh: &mut Mesh,
    outer: &Ring,
    holes: &[Ring],
    shape: &RoofShape,
    uv_scale: f64,
) {
    let uv_scale = if uv_scale > 0.0 { uv_scale } else { 1.0 };
    for tri in triangulate(outer, holes) {
        if tri.area() < geom::EPSILON_DIST * geom::EPSILON_DIST {
            continue;
        }
        let tri = if tri.signed_area() > 0.0 {
            tri.reversed()
        } else {
            tri
        };
        let [a, b, c] = tri.points().map(|pt| pt.to_3d(shape.height_at(pt)));
        let normal = face_normal(a, b, c);
        for pt in [a, b, c] {
            mesh.push_with_normal(pt, [pt.x / uv_scale, pt.z / uv_scale], normal);
        }
    }
}

fn add_pyramid(mesh: &mut Mesh, outer: &Ring, base: f64, apex_height: f64, uv_scale: f64) {
    let uv_scale = if uv_scale > 0.0 { uv_scale } else { 1.0 };
    let pts = outer.distinct_points();
    let mut center = Pt2D::zero();
    for pt in pts {
        center = center + *pt;
    }
    let center = center.scale(1.0 / pts.len() as f64);
    let apex = center.to_3d(apex_height);

    // Outer rings have positive area, so (p1, apex, p2) faces up
    for line in outer.lines() {
        let p1 = line.pt1().to_3d(base);
        let p2 = line.pt2().to_3d(base);
        let normal = face_normal(p1, apex, p2);
        for pt in [p1, apex, p2] {
            mesh.push_with_normal(pt, [pt.x / uv_scale, pt.z / uv_scale], normal);
        }
    }
}
