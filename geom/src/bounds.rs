use serde::{Deserialize, Serialize};

use crate::{Pt2D, Pt3D};

/// A 2D axis-aligned bounding box.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Bounds {
        Bounds::new()
    }
}

impl Bounds {
    /// An empty box; it becomes valid after the first `update`.
    pub fn new() -> Bounds {
        Bounds {
            min_x: f64::MAX,
            min_y: f64::MAX,
            max_x: f64::MIN,
            max_y: f64::MIN,
        }
    }

    pub fn from(pts: &[Pt2D]) -> Bounds {
        let mut b = Bounds::new();
        for pt in pts {
            b.update(*pt);
        }
        b
    }

    pub fn update(&mut self, pt: Pt2D) {
        self.min_x = self.min_x.min(pt.x());
        self.max_x = self.max_x.max(pt.x());
        self.min_y = self.min_y.min(pt.y());
        self.max_y = self.max_y.max(pt.y());
    }

    pub fn union(&mut self, other: &Bounds) {
        if other.is_empty() {
            return;
        }
        self.update(Pt2D::new(other.min_x, other.min_y));
        self.update(Pt2D::new(other.max_x, other.max_y));
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn contains(&self, pt: Pt2D) -> bool {
        pt.x() >= self.min_x && pt.x() <= self.max_x && pt.y() >= self.min_y && pt.y() <= self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Pt2D {
        Pt2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// A 3D axis-aligned bounding box. It only ever grows.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Bounds3D {
    pub min_x: f64,
    pub min_y: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub max_z: f64,
}

impl Default for Bounds3D {
    fn default() -> Bounds3D {
        Bounds3D::new()
    }
}

impl Bounds3D {
    pub fn new() -> Bounds3D {
        Bounds3D {
            min_x: f64::MAX,
            min_y: f64::MAX,
            min_z: f64::MAX,
            max_x: f64::MIN,
            max_y: f64::MIN,
            max_z: f64::MIN,
        }
    }

    pub fn include_point(&mut self, pt: Pt3D) {
        self.min_x = self.min_x.min(pt.x);
        self.min_y = self.min_y.min(pt.y);
        self.min_z = self.min_z.min(pt.z);
        self.max_x = self.max_x.max(pt.x);
        self.max_y = self.max_y.max(pt.y);
        self.max_z = self.max_z.max(pt.z);
    }

    /// Expands to cover every vertex in a flat `[x, y, z, x, y, z, ...]` buffer.
    pub fn include_positions(&mut self, positions: &[f32]) {
        for chunk in positions.chunks_exact(3) {
            self.include_point(Pt3D::new(
                chunk[0] as f64,
                chunk[1] as f64,
                chunk[2] as f64,
            ));
        }
    }

    pub fn union(&mut self, other: &Bounds3D) {
        if other.is_empty() {
            return;
        }
        self.include_point(Pt3D::new(other.min_x, other.min_y, other.min_z));
        self.include_point(Pt3D::new(other.max_x, other.max_y, other.max_z));
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y || self.min_z > self.max_z
    }

    pub fn contains(&self, other: &Bounds3D) -> bool {
        other.is_empty()
            || (self.min_x <= other.min_x
                && self.min_y <= other.min_y
                && self.min_z <= other.min_z
                && self.max_x >= other.max_x
                && self.max_y >= other.max_y
                && self.max_z >= other.max_z)
    }
}
