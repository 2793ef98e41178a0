use std::fmt;

use anyhow::{bail, Result};
use geo::Contains;
use serde::{Deserialize, Serialize};

use crate::polyline::dedupe_adjacent;
use crate::{Bounds, Line, Pt2D, EPSILON_DIST};

/// Like a PolyLine, but closed. The first point equals the last.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pts: Vec<Pt2D>,
}

impl Ring {
    /// Fails if the input isn't closed or has fewer than 3 distinct points. Adjacent duplicate
    /// points are squished together first.
    pub fn new(pts: Vec<Pt2D>) -> Result<Ring> {
        if pts.len() < 2 || !pts[0].approx_eq(pts[pts.len() - 1], EPSILON_DIST) {
            bail!("Ring isn't closed");
        }
        let mut pts = dedupe_adjacent(pts);
        // Deduping may have eaten the closing point
        if pts.len() > 1 && pts[0] != pts[pts.len() - 1] {
            let last = pts.len() - 1;
            if pts[0].approx_eq(pts[last], EPSILON_DIST) {
                pts[last] = pts[0];
            } else {
                pts.push(pts[0]);
            }
        }
        if pts.len() < 4 {
            bail!("Ring has only {} distinct points", pts.len().saturating_sub(1));
        }
        Ok(Ring { pts })
    }

    /// Closes the points first, if needed.
    pub fn must_close(mut pts: Vec<Pt2D>) -> Result<Ring> {
        if let (Some(first), Some(last)) = (pts.first().cloned(), pts.last().cloned()) {
            if !first.approx_eq(last, EPSILON_DIST) {
                pts.push(first);
            }
        }
        Ring::new(pts)
    }

    /// Includes the repeated closing point.
    pub fn points(&self) -> &Vec<Pt2D> {
        &self.pts
    }

    /// Excludes the repeated closing point.
    pub fn distinct_points(&self) -> &[Pt2D] {
        &self.pts[0..self.pts.len() - 1]
    }

    /// The shoelace formula. Positive when the ring is counter-clockwise with y pointing up,
    /// which is clockwise in tile space, where y points down.
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.pts)
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Clockwise as seen in tile space (y pointing down).
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    pub fn reversed(&self) -> Ring {
        let mut pts = self.pts.clone();
        pts.reverse();
        Ring { pts }
    }

    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.pts.windows(2).map(|pair| Line::new(pair[0], pair[1]))
    }

    pub fn longest_edge(&self) -> Line {
        let mut best = Line::new(self.pts[0], self.pts[1]);
        for l in self.lines() {
            if l.length() > best.length() {
                best = l;
            }
        }
        best
    }

    pub fn contains_pt(&self, pt: Pt2D) -> bool {
        self.to_geo().contains(&geo::Point::from(pt))
    }

    pub fn get_bounds(&self) -> Bounds {
        Bounds::from(&self.pts)
    }

    fn to_geo(&self) -> geo::Polygon<f64> {
        let exterior: Vec<geo::Coordinate<f64>> = self.pts.iter().map(|pt| (*pt).into()).collect();
        geo::Polygon::new(exterior.into(), Vec::new())
    }
}

/// The shoelace formula over a sequence of points. The ring may be open or closed.
pub(crate) fn signed_area(pts: &[Pt2D]) -> f64 {
    if pts.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for idx in 0..pts.len() {
        let pt1 = pts[idx];
        let pt2 = pts[(idx + 1) % pts.len()];
        sum += pt1.x() * pt2.y() - pt2.x() * pt1.y();
    }
    sum / 2.0
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Ring::new(vec![")?;
        for pt in &self.pts {
            writeln!(f, "  Pt2D::new({}, {}),", pt.x(), pt.y())?;
        }
        write!(f, "])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Pt2D> {
        vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(0.0, 1.0),
            Pt2D::new(1.0, 1.0),
            Pt2D::new(1.0, 0.0),
            Pt2D::new(0.0, 0.0),
        ]
    }

    #[test]
    fn rejects_open_rings() {
        assert!(Ring::new(square()[0..4].to_vec()).is_err());
        assert!(Ring::must_close(square()[0..4].to_vec()).is_ok());
        assert!(Ring::new(vec![Pt2D::new(0.0, 0.0), Pt2D::new(1.0, 0.0), Pt2D::new(0.0, 0.0)])
            .is_err());
    }

    #[test]
    fn winding_flips_under_reversal() {
        let ring = Ring::new(square()).unwrap();
        assert_eq!(ring.signed_area(), -1.0);
        assert!(!ring.is_clockwise());
        assert!(ring.reversed().is_clockwise());
        assert_eq!(ring.area(), 1.0);
    }

    #[test]
    fn winding_is_stable_under_rotation() {
        let mut pts = square();
        pts.pop();
        for shift in 0..pts.len() {
            let mut rotated = pts.clone();
            rotated.rotate_left(shift);
            let ring = Ring::must_close(rotated).unwrap();
            assert!(!ring.is_clockwise());
            assert_eq!(ring.signed_area(), -1.0);
        }
    }

    #[test]
    fn containment() {
        let ring = Ring::new(square()).unwrap();
        assert!(ring.contains_pt(Pt2D::new(0.5, 0.5)));
        assert!(!ring.contains_pt(Pt2D::new(1.5, 0.5)));
        assert_eq!(ring.longest_edge().length(), 1.0);
    }
}
