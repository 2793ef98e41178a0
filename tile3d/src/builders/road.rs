use geom::{Pt2D, EPSILON_DIST};

use super::Mesh;

/// Sharp turns would push mitered corners arbitrarily far out.
const MAX_MITER_SCALE: f64 = 4.0;

/// Which part of the ribbon to build, relative to the direction of the center-line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoadSide {
    Both,
    Left,
    Right,
}

impl From<vector_features::PathSide> for RoadSide {
    fn from(side: vector_features::PathSide) -> RoadSide {
        match side {
            vector_features::PathSide::Both => RoadSide::Both,
            vector_features::PathSide::Left => RoadSide::Left,
            vector_features::PathSide::Right => RoadSide::Right,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RoadParams {
    pub vertices: Vec<Pt2D>,
    /// The full width of the ribbon, even if only one side is built
    pub width: f64,
    pub side: RoadSide,
    /// The vertex before the first one, on a road continuing through a junction
    pub start_adjacent: Option<Pt2D>,
    /// The vertex after the last one
    pub end_adjacent: Option<Pt2D>,
    /// If true, u spans the width and v grows with distance along the road. Otherwise the
    /// texture is tiled in world space.
    pub uv_follow_road: bool,
    /// Meters per repeat, when tiled in world space
    pub uv_scale: f64,
    pub uv_scale_y: f64,
    pub uv_min_x: f64,
    pub uv_max_x: f64,
}

impl RoadParams {
    pub fn new(vertices: Vec<Pt2D>, width: f64) -> RoadParams {
        RoadParams {
            vertices,
            width,
            side: RoadSide::Both,
            start_adjacent: None,
            end_adjacent: None,
            uv_follow_road: true,
            uv_scale: 1.0,
            uv_scale_y: 1.0,
            uv_min_x: 0.0,
            uv_max_x: 1.0,
        }
    }
}

pub struct RoadOutput {
    pub mesh: Mesh,
    /// The outline of the ribbon, closed. Empty when nothing was built.
    pub border: Vec<Pt2D>,
}

impl RoadOutput {
    fn empty() -> RoadOutput {
        RoadOutput {
            mesh: Mesh::new(),
            border: Vec::new(),
        }
    }
}

/// Builds a flat ribbon along a center-line, with mitered joins.
pub struct RoadBuilder;

impl RoadBuilder {
    pub fn build(params: &RoadParams) -> RoadOutput {
        let mut pts: Vec<Pt2D> = Vec::with_capacity(params.vertices.len());
        for pt in &params.vertices {
            if pts.last().map(|last| last.dist_to(*pt) < EPSILON_DIST) != Some(true) {
                pts.push(*pt);
            }
        }
        if pts.len() < 2 || !(params.width > 0.0) {
            return RoadOutput::empty();
        }

        let half = params.width / 2.0;
        let (left_offset, right_offset) = match params.side {
            RoadSide::Both => (half, -half),
            RoadSide::Left => (half, 0.0),
            RoadSide::Right => (0.0, -half),
        };

        let mut lefts = Vec::with_capacity(pts.len());
        let mut rights = Vec::with_capacity(pts.len());
        for idx in 0..pts.len() {
            let incoming = if idx > 0 {
                Some(pts[idx - 1])
            } else {
                params.start_adjacent
            }
            .and_then(|prev| (pts[idx] - prev).normalize());
            let outgoing = if idx + 1 < pts.len() {
                Some(pts[idx + 1])
            } else {
                params.end_adjacent
            }
            .and_then(|next| (next - pts[idx]).normalize());

            let (miter, scale) = miter(incoming, outgoing);
            lefts.push(pts[idx] + miter.scale(scale * left_offset));
            rights.push(pts[idx] + miter.scale(scale * right_offset));
        }

        let mut mesh = Mesh::new();
        let mut dist = 0.0;
        for idx in 0..pts.len() - 1 {
            let next_dist = dist + pts[idx].dist_to(pts[idx + 1]);
            let uv = |pt: Pt2D, left: bool, d: f64| -> [f64; 2] {
                if params.uv_follow_road {
                    [
                        if left {
                            params.uv_min_x
                        } else {
                            params.uv_max_x
                        },
                        d * params.uv_scale_y,
                    ]
                } else {
                    [pt.x() / params.uv_scale, pt.y() / params.uv_scale]
                }
            };
            let (l0, r0, l1, r1) = (lefts[idx], rights[idx], lefts[idx + 1], rights[idx + 1]);

            mesh.push(l0.to_3d(0.0), uv(l0, true, dist));
            mesh.push(r0.to_3d(0.0), uv(r0, false, dist));
            mesh.push(l1.to_3d(0.0), uv(l1, true, next_dist));

            mesh.push(r0.to_3d(0.0), uv(r0, false, dist));
            mesh.push(r1.to_3d(0.0), uv(r1, false, next_dist));
            mesh.push(l1.to_3d(0.0), uv(l1, true, next_dist));

            dist = next_dist;
        }

        let mut border = lefts;
        border.extend(rights.into_iter().rev());
        border.push(border[0]);
        RoadOutput { mesh, border }
    }
}

/// The direction to offset a vertex towards the left side, and how far to scale the offset so
/// both adjoining segments keep their width.
fn miter(incoming: Option<Pt2D>, outgoing: Option<Pt2D>) -> (Pt2D, f64) {
    match (incoming, outgoing) {
        (Some(d_in), Some(d_out)) => {
            let n_in = d_in.perpendicular();
            let n_out = d_out.perpendicular();
            match (n_in + n_out).normalize() {
                Some(miter) => {
                    let cos = miter.dot(n_in);
                    let scale = if cos > 1.0 / MAX_MITER_SCALE {
                        1.0 / cos
                    } else {
                        MAX_MITER_SCALE
                    };
                    (miter, scale)
                }
                // The line doubles back on itself
                None => (n_out, 1.0),
            }
        }
        (Some(d), None) | (None, Some(d)) => (d.perpendicular(), 1.0),
        // Callers guarantee at least one neighbour
        (None, None) => (Pt2D::new(0.0, -1.0), 1.0),
    }
}
