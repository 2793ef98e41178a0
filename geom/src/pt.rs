use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Angle, EPSILON_DIST};

/// A point in tile-local space, in meters. Also doubles as a 2D vector for the builders.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pt2D {
    x: f64,
    y: f64,
}

impl Pt2D {
    pub fn new(x: f64, y: f64) -> Pt2D {
        if !x.is_finite() || !y.is_finite() {
            panic!("Bad Pt2D {}, {}", x, y);
        }
        Pt2D { x, y }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    pub fn zero() -> Pt2D {
        Pt2D::new(0.0, 0.0)
    }

    pub fn approx_eq(self, other: Pt2D, threshold: f64) -> bool {
        self.dist_to(other) <= threshold
    }

    pub fn dist_to(self, to: Pt2D) -> f64 {
        ((self.x - to.x).powi(2) + (self.y - to.y).powi(2)).sqrt()
    }

    pub fn angle_to(self, to: Pt2D) -> Angle {
        Angle::new_rads((to.y - self.y).atan2(to.x - self.x))
    }

    pub fn offset(self, dx: f64, dy: f64) -> Pt2D {
        Pt2D::new(self.x + dx, self.y + dy)
    }

    // Vector-ish helpers. The builders treat points as 2D vectors quite a lot.

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn scale(self, factor: f64) -> Pt2D {
        Pt2D::new(self.x * factor, self.y * factor)
    }

    pub fn dot(self, other: Pt2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// The z component of the 3D cross product.
    pub fn cross(self, other: Pt2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// None for vectors too short to have a direction.
    pub fn normalize(self) -> Option<Pt2D> {
        let len = self.length();
        if len < EPSILON_DIST {
            return None;
        }
        Some(Pt2D::new(self.x / len, self.y / len))
    }

    /// Rotated by 90 degrees, towards the left side when walking along the vector in a y-down
    /// frame.
    pub fn perpendicular(self) -> Pt2D {
        Pt2D::new(self.y, -self.x)
    }

    pub fn lerp(self, other: Pt2D, t: f64) -> Pt2D {
        Pt2D::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn to_3d(self, height: f64) -> Pt3D {
        Pt3D::new(self.x, height, self.y)
    }
}

impl std::ops::Add for Pt2D {
    type Output = Pt2D;

    fn add(self, other: Pt2D) -> Pt2D {
        Pt2D::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Pt2D {
    type Output = Pt2D;

    fn sub(self, other: Pt2D) -> Pt2D {
        Pt2D::new(self.x - other.x, self.y - other.y)
    }
}

impl fmt::Display for Pt2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pt2D({0}, {1})", self.x, self.y)
    }
}

impl From<[f64; 2]> for Pt2D {
    fn from(pair: [f64; 2]) -> Pt2D {
        Pt2D::new(pair[0], pair[1])
    }
}

impl From<Pt2D> for [f64; 2] {
    fn from(pt: Pt2D) -> [f64; 2] {
        [pt.x, pt.y]
    }
}

impl From<Pt2D> for geo::Coordinate<f64> {
    fn from(pt: Pt2D) -> Self {
        geo::Coordinate { x: pt.x, y: pt.y }
    }
}

impl From<Pt2D> for geo::Point<f64> {
    fn from(pt: Pt2D) -> Self {
        geo::Point::new(pt.x, pt.y)
    }
}

/// A point with height. `y` is up; `z` is the tile-local 2D `y`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pt3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Pt3D {
    pub fn new(x: f64, y: f64, z: f64) -> Pt3D {
        Pt3D { x, y, z }
    }

    /// Drop the height.
    pub fn to_2d(self) -> Pt2D {
        Pt2D::new(self.x, self.z)
    }

    pub fn sub(self, other: Pt3D) -> Pt3D {
        Pt3D::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn cross(self, other: Pt3D) -> Pt3D {
        Pt3D::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn normalize(self) -> Pt3D {
        let len = (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        if len == 0.0 {
            return self;
        }
        Pt3D::new(self.x / len, self.y / len, self.z / len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_helpers() {
        let v = Pt2D::new(3.0, 4.0);
        assert_eq!(v.length(), 5.0);
        let n = v.normalize().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-12);
        assert!(Pt2D::new(0.0, 0.0).normalize().is_none());
        assert_eq!(v.perpendicular().dot(v), 0.0);
        assert_eq!(Pt2D::new(1.0, 0.0).cross(Pt2D::new(0.0, 1.0)), 1.0);
    }
}
