use abstutil::Warn;
pub use geom::tile_size;
use geom::Pt2D;

/// Answers height queries in global coordinates. Tile builds on different threads share one
/// provider, so queries must not mutate anything.
pub trait TerrainHeightProvider: Send + Sync {
    /// None means there's no data for that spot.
    fn get_height_global_interpolated(
        &self,
        x: f64,
        z: f64,
        allow_extrapolation: bool,
    ) -> Option<f64>;
}

impl<F> TerrainHeightProvider for F
where
    F: Fn(f64, f64, bool) -> Option<f64> + Send + Sync,
{
    fn get_height_global_interpolated(
        &self,
        x: f64,
        z: f64,
        allow_extrapolation: bool,
    ) -> Option<f64> {
        self(x, z, allow_extrapolation)
    }
}

/// The same height everywhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatTerrain(pub f64);

impl TerrainHeightProvider for FlatTerrain {
    fn get_height_global_interpolated(&self, _: f64, _: f64, _: bool) -> Option<f64> {
        Some(self.0)
    }
}

/// Heights of one tile, sampled once on a regular grid. Each cell is split into two triangles
/// along the diagonal from its top-left to its bottom-right corner, and height varies linearly
/// inside each triangle, so draped geometry cut along cell edges and diagonals stays planar
/// piece by piece.
#[derive(Clone, Debug)]
pub struct TerrainGrid {
    size: f64,
    segments: usize,
    /// Row-major, (segments + 1) squared
    heights: Vec<f64>,
}

impl TerrainGrid {
    /// Queries the provider at every grid corner. Failed queries become 0 and are reported in
    /// one warning.
    pub fn sample(
        provider: &dyn TerrainHeightProvider,
        tile_x: u32,
        tile_y: u32,
        zoom: u32,
        segments: usize,
    ) -> Warn<TerrainGrid> {
        let segments = segments.max(1);
        let size = tile_size(zoom);
        let cell = size / segments as f64;
        let origin_x = tile_x as f64 * size;
        let origin_z = tile_y as f64 * size;

        let mut heights = Vec::with_capacity((segments + 1) * (segments + 1));
        let mut failures = 0;
        for row in 0..=segments {
            for col in 0..=segments {
                let x = origin_x + col as f64 * cell;
                let z = origin_z + row as f64 * cell;
                match provider.get_height_global_interpolated(x, z, true) {
                    Some(h) if h.is_finite() => heights.push(h),
                    _ => {
                        failures += 1;
                        heights.push(0.0);
                    }
                }
            }
        }

        let grid = TerrainGrid {
            size,
            segments,
            heights,
        };
        if failures == 0 {
            Warn::ok(grid)
        } else {
            Warn::warn(
                grid,
                format!(
                    "{} of {} height queries for tile {}/{}/{} failed, using 0 there",
                    failures,
                    (segments + 1) * (segments + 1),
                    zoom,
                    tile_x,
                    tile_y
                ),
            )
        }
    }

    /// A grid at height 0 covering a square of some size.
    pub fn flat(size: f64, segments: usize) -> TerrainGrid {
        let segments = segments.max(1);
        TerrainGrid {
            size,
            segments,
            heights: vec![0.0; (segments + 1) * (segments + 1)],
        }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn cell_size(&self) -> f64 {
        self.size / self.segments as f64
    }

    pub fn contains(&self, pt: Pt2D) -> bool {
        pt.x() >= 0.0 && pt.y() >= 0.0 && pt.x() <= self.size && pt.y() <= self.size
    }

    fn corner(&self, col: usize, row: usize) -> f64 {
        self.heights[row * (self.segments + 1) + col]
    }

    /// Interpolated height at a tile-local point. Points outside the tile are clamped to its
    /// edge.
    pub fn height_at(&self, pt: Pt2D) -> f64 {
        let cell = self.cell_size();
        let x = pt.x().max(0.0).min(self.size) / cell;
        let y = pt.y().max(0.0).min(self.size) / cell;
        let col = (x.floor() as usize).min(self.segments - 1);
        let row = (y.floor() as usize).min(self.segments - 1);
        let u = x - col as f64;
        let v = y - row as f64;

        let a = self.corner(col, row);
        let b = self.corner(col + 1, row);
        let c = self.corner(col, row + 1);
        let d = self.corner(col + 1, row + 1);
        if u >= v {
            a + (b - a) * u + (d - b) * v
        } else {
            a + (c - a) * v + (d - c) * u
        }
    }

    /// The two triangles of a cell, in the same order `height_at` picks them.
    pub fn cell_triangles(&self, col: usize, row: usize) -> [[Pt2D; 3]; 2] {
        let cell = self.cell_size();
        let x0 = col as f64 * cell;
        let y0 = row as f64 * cell;
        let a = Pt2D::new(x0, y0);
        let b = Pt2D::new(x0 + cell, y0);
        let c = Pt2D::new(x0, y0 + cell);
        let d = Pt2D::new(x0 + cell, y0 + cell);
        [[a, b, d], [a, d, c]]
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn samples_global_coordinates() {
        let size = tile_size(16);
        let provider =
            move |x: f64, z: f64, _: bool| Some((x - 3.0 * size) + 2.0 * (z - 5.0 * size));
        let grid = TerrainGrid::sample(&provider, 3, 5, 16, 4).unwrap();
        // Planar terrain is reproduced exactly
        for (x, y) in [(0.0, 0.0), (10.0, 20.0), (size, size), (size * 0.3, size * 0.9)] {
            let expected = x + 2.0 * y;
            assert!((grid.height_at(Pt2D::new(x, y)) - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn failures_become_zero_with_one_warning() {
        let calls = AtomicUsize::new(0);
        let provider = |_: f64, _: f64, _: bool| {
            if calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                None
            } else {
                Some(10.0)
            }
        };
        let warn = TerrainGrid::sample(&provider, 0, 0, 15, 2);
        assert_eq!(warn.warning_lines().len(), 1);
        let grid = warn.unwrap();
        assert_eq!(grid.height_at(Pt2D::new(0.0, 0.0)), 0.0);
        assert_eq!(grid.height_at(Pt2D::new(grid.cell_size(), 0.0)), 10.0);
    }

    #[test]
    fn clamps_outside_points() {
        let grid = TerrainGrid::sample(&FlatTerrain(7.0), 0, 0, 16, 8).unwrap();
        assert_eq!(grid.height_at(Pt2D::new(-50.0, 1e9)), 7.0);
        assert!(!grid.contains(Pt2D::new(-1.0, 0.0)));
    }
}
