use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An angle, stored in radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub fn new_rads(rads: f64) -> Angle {
        Angle(rads)
    }

    pub fn degrees(degs: f64) -> Angle {
        Angle(degs.to_radians())
    }

    /// In [0, 2pi)
    pub fn normalized_radians(self) -> f64 {
        self.0.rem_euclid(2.0 * PI)
    }

    /// In [0, 360)
    pub fn normalized_degrees(self) -> f64 {
        self.normalized_radians().to_degrees()
    }

    /// The raw value, in (-pi, pi] when constructed through `Pt2D::angle_to`.
    pub fn radians(self) -> f64 {
        self.0
    }

    /// How much to rotate `self` to reach `other`, in (-180, 180] degrees.
    pub fn shortest_rotation_towards(self, other: Angle) -> Angle {
        let mut delta = (other.normalized_radians() - self.normalized_radians()) % (2.0 * PI);
        if delta > PI {
            delta -= 2.0 * PI;
        } else if delta <= -PI {
            delta += 2.0 * PI;
        }
        Angle(delta)
    }

    pub fn approx_eq(self, other: Angle, within_degrees: f64) -> bool {
        self.shortest_rotation_towards(other).0.to_degrees().abs() < within_degrees
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Angle({} degrees)", self.normalized_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization() {
        assert!((Angle::degrees(-90.0).normalized_degrees() - 270.0).abs() < 1e-9);
        assert!((Angle::degrees(450.0).normalized_degrees() - 90.0).abs() < 1e-9);
        assert!(Angle::degrees(10.0).approx_eq(Angle::degrees(370.0), 0.01));
        let rot = Angle::degrees(350.0).shortest_rotation_towards(Angle::degrees(10.0));
        assert!((rot.radians().to_degrees() - 20.0).abs() < 1e-9);
    }
}
