use geom::{Pt2D, Pt3D, EPSILON_DIST};

use super::Mesh;
use crate::terrain::TerrainGrid;

/// Parallel lines closer than this are treated as never crossing.
const PARALLEL_EPSILON: f64 = 1e-12;

/// One piece of a line draped over the terrain.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedLine {
    pub vertices: Vec<Pt3D>,
    /// How far along the original line this piece starts
    pub start_progress: f64,
}

/// Drapes flat triangles over the terrain. Every triangle is cut along the terrain grid, so each
/// output triangle lies inside one terrain triangle and follows it exactly. Anything outside the
/// tile is cut off. Heights are the terrain plus `height`; uvs are interpolated.
pub fn project_geometry_on_terrain(grid: &TerrainGrid, mesh: &Mesh, height: f64) -> Mesh {
    let mut output = Mesh::new();
    let size = grid.size();
    let cell = grid.cell_size();
    let last_cell = grid.segments() - 1;

    for tri in 0..mesh.vertex_count() / 3 {
        let pts = [
            mesh.vertex(tri * 3).to_2d(),
            mesh.vertex(tri * 3 + 1).to_2d(),
            mesh.vertex(tri * 3 + 2).to_2d(),
        ];
        let uvs = [
            mesh.uv_at(tri * 3),
            mesh.uv_at(tri * 3 + 1),
            mesh.uv_at(tri * 3 + 2),
        ];
        let area2 = (pts[1] - pts[0]).cross(pts[2] - pts[0]);
        if area2.abs() < EPSILON_DIST * EPSILON_DIST {
            continue;
        }

        let min_x = pts.iter().map(|pt| pt.x()).fold(f64::MAX, f64::min);
        let max_x = pts.iter().map(|pt| pt.x()).fold(f64::MIN, f64::max);
        let min_y = pts.iter().map(|pt| pt.y()).fold(f64::MAX, f64::min);
        let max_y = pts.iter().map(|pt| pt.y()).fold(f64::MIN, f64::max);
        if max_x < 0.0 || max_y < 0.0 || min_x > size || min_y > size {
            continue;
        }

        let cell_index = |v: f64| ((v / cell).floor().max(0.0) as usize).min(last_cell);
        for row in cell_index(min_y)..=cell_index(max_y) {
            for col in cell_index(min_x)..=cell_index(max_x) {
                for clip in grid.cell_triangles(col, row) {
                    let piece = clip_polygon(&pts, &clip);
                    if piece.len() < 3 {
                        continue;
                    }
                    for k in 1..piece.len() - 1 {
                        let (a, b, c) = (piece[0], piece[k], piece[k + 1]);
                        if (b - a).cross(c - a).abs() < EPSILON_DIST * EPSILON_DIST {
                            continue;
                        }
                        for pt in [a, b, c] {
                            output.push(
                                pt.to_3d(grid.height_at(pt) + height),
                                interpolate_uv(pt, &pts, &uvs, area2),
                            );
                        }
                    }
                }
            }
        }
    }
    output
}

/// Drapes a line over the terrain. The line is cut to the tile, with a new piece starting each
/// time it comes back in, and vertices are added wherever it crosses a terrain grid line or
/// cell diagonal.
pub fn project_line_on_terrain(grid: &TerrainGrid, vertices: &[Pt2D]) -> Vec<ProjectedLine> {
    let mut result = Vec::new();
    let mut current: Vec<Pt3D> = Vec::new();
    let mut start_progress = 0.0;
    let mut progress = 0.0;

    for pair in vertices.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let len = a.dist_to(b);
        if len < EPSILON_DIST {
            continue;
        }
        match clip_to_square(a, b, grid.size()) {
            Some((t0, t1)) if (t1 - t0) * len >= EPSILON_DIST => {
                if t0 > 0.0 {
                    flush(&mut result, &mut current, start_progress);
                }
                if current.is_empty() {
                    start_progress = progress + t0 * len;
                }
                push_point(grid, &mut current, a.lerp(b, t0));
                for t in grid_crossings(grid, a, b, t0, t1) {
                    push_point(grid, &mut current, a.lerp(b, t));
                }
                push_point(grid, &mut current, a.lerp(b, t1));
                if t1 < 1.0 {
                    flush(&mut result, &mut current, start_progress);
                }
            }
            _ => flush(&mut result, &mut current, start_progress),
        }
        progress += len;
    }
    flush(&mut result, &mut current, start_progress);
    result
}

fn push_point(grid: &TerrainGrid, line: &mut Vec<Pt3D>, pt: Pt2D) {
    if let Some(last) = line.last() {
        if last.to_2d().dist_to(pt) < EPSILON_DIST {
            return;
        }
    }
    line.push(pt.to_3d(grid.height_at(pt)));
}

fn flush(result: &mut Vec<ProjectedLine>, current: &mut Vec<Pt3D>, start_progress: f64) {
    if current.len() >= 2 {
        result.push(ProjectedLine {
            vertices: std::mem::take(current),
            start_progress,
        });
    } else {
        current.clear();
    }
}

/// Liang-Barsky. The parameter range of the segment inside `[0, size]` squared.
fn clip_to_square(a: Pt2D, b: Pt2D, size: f64) -> Option<(f64, f64)> {
    let d = b - a;
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (p, q) in [
        (-d.x(), a.x()),
        (d.x(), size - a.x()),
        (-d.y(), a.y()),
        (d.y(), size - a.y()),
    ] {
        if p.abs() < PARALLEL_EPSILON {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((t0, t1))
}

/// Sorted parameters strictly between `t0` and `t1` where the segment crosses a grid line or a
/// cell diagonal.
fn grid_crossings(grid: &TerrainGrid, a: Pt2D, b: Pt2D, t0: f64, t1: f64) -> Vec<f64> {
    let cell = grid.cell_size();
    let n = grid.segments() as i64;
    let d = b - a;
    let mut result = Vec::new();
    let mut add = |t: f64| {
        if t > t0 && t < t1 {
            result.push(t);
        }
    };

    if d.x().abs() > PARALLEL_EPSILON {
        for k in 1..n {
            add((k as f64 * cell - a.x()) / d.x());
        }
    }
    if d.y().abs() > PARALLEL_EPSILON {
        for k in 1..n {
            add((k as f64 * cell - a.y()) / d.y());
        }
    }
    // Diagonals are the lines x - y = k * cell
    let f0 = a.x() - a.y();
    let df = d.x() - d.y();
    if df.abs() > PARALLEL_EPSILON {
        for k in -(n - 1)..n {
            add((k as f64 * cell - f0) / df);
        }
    }

    result.sort_by(|x, y| x.total_cmp(y));
    result
}

/// Sutherland-Hodgman against one convex triangle.
fn clip_polygon(subject: &[Pt2D], clip: &[Pt2D; 3]) -> Vec<Pt2D> {
    let orientation = (clip[1] - clip[0]).cross(clip[2] - clip[0]).signum();
    let mut output = subject.to_vec();
    for idx in 0..3 {
        if output.is_empty() {
            break;
        }
        let (a, b) = (clip[idx], clip[(idx + 1) % 3]);
        let inside = |pt: Pt2D| (b - a).cross(pt - a) * orientation >= -PARALLEL_EPSILON;
        let input = std::mem::take(&mut output);
        for j in 0..input.len() {
            let current = input[j];
            let prev = input[(j + input.len() - 1) % input.len()];
            match (inside(prev), inside(current)) {
                (true, true) => output.push(current),
                (true, false) => output.push(intersect(prev, current, a, b)),
                (false, true) => {
                    output.push(intersect(prev, current, a, b));
                    output.push(current);
                }
                (false, false) => {}
            }
        }
    }
    output
}

/// Where the segment from `p` to `q` meets the infinite line through `a` and `b`.
fn intersect(p: Pt2D, q: Pt2D, a: Pt2D, b: Pt2D) -> Pt2D {
    let d = q - p;
    let e = b - a;
    let denom = d.cross(e);
    if denom.abs() < PARALLEL_EPSILON {
        return p;
    }
    let t = (a - p).cross(e) / denom;
    p.lerp(q, t)
}

fn interpolate_uv(pt: Pt2D, tri: &[Pt2D; 3], uvs: &[[f64; 2]; 3], area2: f64) -> [f64; 2] {
    let wb = (pt - tri[0]).cross(tri[2] - tri[0]) / area2;
    let wc = (tri[1] - tri[0]).cross(pt - tri[0]) / area2;
    let wa = 1.0 - wb - wc;
    [
        wa * uvs[0][0] + wb * uvs[1][0] + wc * uvs[2][0],
        wa * uvs[0][1] + wb * uvs[1][1] + wc * uvs[2][1],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::tile_size;

    fn sloped_grid(segments: usize) -> TerrainGrid {
        // Heights rise 1m per meter east and 0.5m per meter south, plus a bump to make cells
        // non-planar.
        let size = tile_size(17);
        let provider = move |x: f64, z: f64, _: bool| {
            let (x, z) = (x - 100.0 * size, z - 200.0 * size);
            let bump = if (x / size * 4.0).round() as i64 % 2 == 0 { 3.0 } else { 0.0 };
            Some(x + 0.5 * z + bump)
        };
        TerrainGrid::sample(&provider, 100, 200, 17, segments).unwrap()
    }

    fn flat_square(x: f64, y: f64, w: f64) -> Mesh {
        let mut mesh = Mesh::new();
        let (a, b, c, d) = (
            Pt2D::new(x, y),
            Pt2D::new(x + w, y),
            Pt2D::new(x + w, y + w),
            Pt2D::new(x, y + w),
        );
        // Both triangles face up
        for pt in [a, c, b, a, d, c] {
            mesh.push(pt.to_3d(0.0), [pt.x(), pt.y()]);
        }
        mesh
    }

    #[test]
    fn draping_keeps_area_and_follows_terrain() {
        let grid = sloped_grid(4);
        let mesh = flat_square(10.0, 20.0, 150.0);
        assert!(mesh.faces_up());
        let draped = project_geometry_on_terrain(&grid, &mesh, 0.5);

        assert!(draped.vertex_count() > mesh.vertex_count());
        assert!((draped.footprint_area() - mesh.footprint_area()).abs() < 1e-6);
        assert!(draped.faces_up());
        for idx in 0..draped.vertex_count() {
            let pt = draped.vertex(idx);
            assert!((pt.y - grid.height_at(pt.to_2d()) - 0.5).abs() < 1e-6);
            // The uvs were the flat coordinates, and stay that way
            let [u, v] = draped.uv_at(idx);
            assert!((u - pt.x).abs() < 1e-6 && (v - pt.z).abs() < 1e-6);
        }
    }

    #[test]
    fn draping_cuts_at_the_tile_edge() {
        let grid = TerrainGrid::flat(100.0, 4);
        let draped = project_geometry_on_terrain(&grid, &flat_square(-50.0, 50.0, 100.0), 0.0);
        assert!((draped.footprint_area() - 50.0 * 50.0).abs() < 1e-6);

        let outside = project_geometry_on_terrain(&grid, &flat_square(200.0, 200.0, 10.0), 0.0);
        assert!(outside.is_empty());
    }

    #[test]
    fn lines_gain_vertices_at_grid_crossings() {
        let grid = TerrainGrid::flat(100.0, 4);
        let pieces =
            project_line_on_terrain(&grid, &[Pt2D::new(10.0, 10.0), Pt2D::new(90.0, 10.0)]);
        assert_eq!(pieces.len(), 1);
        // 3 vertical lines, and the diagonals of 3 cells past the first
        assert_eq!(pieces[0].vertices.len(), 2 + 3 + 3);
        assert_eq!(pieces[0].start_progress, 0.0);
        for pair in pieces[0].vertices.windows(2) {
            assert!(pair[0].x < pair[1].x);
        }
    }

    #[test]
    fn lines_split_where_they_leave_the_tile() {
        let grid = TerrainGrid::flat(100.0, 1);
        let pieces = project_line_on_terrain(
            &grid,
            &[
                Pt2D::new(-10.0, 50.0),
                Pt2D::new(50.0, 50.0),
                Pt2D::new(50.0, 150.0),
                Pt2D::new(60.0, 150.0),
                Pt2D::new(60.0, 90.0),
            ],
        );
        assert_eq!(pieces.len(), 2);
        assert!((pieces[0].start_progress - 10.0).abs() < 1e-9);
        let first = pieces[0].vertices[0];
        assert!(first.x.abs() < 1e-9 && first.z == 50.0);
        assert_eq!(pieces[0].vertices.last().unwrap().z, 100.0);
        // 60 + 100 + 10 + 50 meters along, the line comes back in at y = 100
        assert!((pieces[1].start_progress - 220.0).abs() < 1e-9);
        assert_eq!(pieces[1].vertices.last().unwrap().z, 90.0);
    }

    #[test]
    fn line_heights_follow_terrain() {
        let grid = sloped_grid(8);
        let pieces = project_line_on_terrain(
            &grid,
            &[Pt2D::new(5.0, 5.0), Pt2D::new(200.0, 150.0), Pt2D::new(30.0, 250.0)],
        );
        assert_eq!(pieces.len(), 1);
        for pt in &pieces[0].vertices {
            assert_eq!(pt.y, grid.height_at(pt.to_2d()));
        }
    }
}
