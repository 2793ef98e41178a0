use serde::{Deserialize, Serialize};

use crate::{Angle, Pt2D, EPSILON_DIST};

/// A line segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line(Pt2D, Pt2D);

impl Line {
    pub fn new(pt1: Pt2D, pt2: Pt2D) -> Line {
        Line(pt1, pt2)
    }

    /// None if the endpoints are too close together.
    pub fn maybe_new(pt1: Pt2D, pt2: Pt2D) -> Option<Line> {
        if pt1.dist_to(pt2) < EPSILON_DIST {
            return None;
        }
        Some(Line(pt1, pt2))
    }

    pub fn pt1(&self) -> Pt2D {
        self.0
    }

    pub fn pt2(&self) -> Pt2D {
        self.1
    }

    pub fn length(&self) -> f64 {
        self.0.dist_to(self.1)
    }

    pub fn angle(&self) -> Angle {
        self.0.angle_to(self.1)
    }

    /// Unit vector from pt1 to pt2, or None for a degenerate segment.
    pub fn direction(&self) -> Option<Pt2D> {
        (self.1 - self.0).normalize()
    }

    pub fn reversed(&self) -> Line {
        Line(self.1, self.0)
    }

    pub fn percent_along(&self, percent: f64) -> Pt2D {
        self.0.lerp(self.1, percent)
    }

    /// Clamps to the segment.
    pub fn dist_along(&self, dist: f64) -> Pt2D {
        let len = self.length();
        if len < EPSILON_DIST {
            return self.0;
        }
        self.percent_along((dist / len).max(0.0).min(1.0))
    }

    /// The point on this segment closest to `pt`.
    pub fn project_pt(&self, pt: Pt2D) -> Pt2D {
        let d = self.1 - self.0;
        let len_sq = d.dot(d);
        if len_sq < EPSILON_DIST * EPSILON_DIST {
            return self.0;
        }
        let t = ((pt - self.0).dot(d) / len_sq).max(0.0).min(1.0);
        self.percent_along(t)
    }

    /// Where this segment crosses `other`, if it does.
    pub fn intersection(&self, other: &Line) -> Option<Pt2D> {
        let (t, u) = self.infinite_params(other)?;
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some(self.percent_along(t))
        } else {
            None
        }
    }

    /// Treat both segments as infinite lines. None when they're parallel.
    pub fn infinite_intersection(&self, other: &Line) -> Option<Pt2D> {
        let (t, _) = self.infinite_params(other)?;
        Some(self.percent_along(t))
    }

    fn infinite_params(&self, other: &Line) -> Option<(f64, f64)> {
        let r = self.1 - self.0;
        let s = other.1 - other.0;
        let denom = r.cross(s);
        if denom.abs() < 1e-12 {
            return None;
        }
        let qp = other.0 - self.0;
        Some((qp.cross(s) / denom, qp.cross(r) / denom))
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_clamps() {
        let l = Line::new(Pt2D::new(0.0, 0.0), Pt2D::new(10.0, 0.0));
        assert_eq!(l.project_pt(Pt2D::new(3.0, 5.0)), Pt2D::new(3.0, 0.0));
        assert_eq!(l.project_pt(Pt2D::new(-3.0, 5.0)), Pt2D::new(0.0, 0.0));
        assert_eq!(l.project_pt(Pt2D::new(13.0, -1.0)), Pt2D::new(10.0, 0.0));
    }

    #[test]
    fn crossing_segments() {
        let l1 = Line::new(Pt2D::new(0.0, 0.0), Pt2D::new(10.0, 10.0));
        let l2 = Line::new(Pt2D::new(0.0, 10.0), Pt2D::new(10.0, 0.0));
        assert_eq!(l1.intersection(&l2), Some(Pt2D::new(5.0, 5.0)));
        let l3 = Line::new(Pt2D::new(20.0, 0.0), Pt2D::new(30.0, 0.0));
        assert_eq!(l1.intersection(&l3), None);
        assert!(l1.infinite_intersection(&l3).is_some());
        assert!(Line::maybe_new(Pt2D::new(1.0, 1.0), Pt2D::new(1.0, 1.0)).is_none());
    }
}
