use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::{Angle, Bounds, Line, Pt2D, EPSILON_DIST};

/// An open sequence of points with no degenerate segments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolyLine {
    pts: Vec<Pt2D>,
    length: f64,
}

impl PolyLine {
    pub fn new(pts: Vec<Pt2D>) -> Result<PolyLine> {
        if pts.len() < 2 {
            bail!("Need at least two points for a PolyLine");
        }
        if pts
            .windows(2)
            .any(|pair| pair[0].dist_to(pair[1]) < EPSILON_DIST)
        {
            bail!("PolyLine has ~dupe adjacent pts");
        }
        let length = pts.windows(2).map(|pair| pair[0].dist_to(pair[1])).sum();
        Ok(PolyLine { pts, length })
    }

    /// Squishes adjacent points closer than `EPSILON_DIST` together first. Fails if fewer than
    /// two points survive.
    pub fn deduping_new(pts: Vec<Pt2D>) -> Result<PolyLine> {
        PolyLine::new(dedupe_adjacent(pts))
    }

    pub fn points(&self) -> &Vec<Pt2D> {
        &self.pts
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.pts.windows(2).map(|pair| Line::new(pair[0], pair[1]))
    }

    pub fn reversed(&self) -> PolyLine {
        let mut pts = self.pts.clone();
        pts.reverse();
        PolyLine {
            pts,
            length: self.length,
        }
    }

    /// The point and heading at some distance along the line. Distances past either end clamp.
    pub fn dist_along(&self, dist: f64) -> (Pt2D, Angle) {
        let mut dist_left = dist.max(0.0);
        let mut last = None;
        for l in self.lines() {
            let len = l.length();
            if dist_left <= len {
                return (l.dist_along(dist_left), l.angle());
            }
            dist_left -= len;
            last = Some(l);
        }
        match last {
            Some(l) => (l.pt2(), l.angle()),
            None => unreachable!(),
        }
    }

    /// Points every `spacing` meters, starting `start` meters in.
    pub fn step_along(&self, spacing: f64, start: f64) -> Vec<(Pt2D, Angle)> {
        let mut result = Vec::new();
        if spacing <= 0.0 {
            return result;
        }
        let mut dist = start.max(0.0);
        while dist <= self.length {
            result.push(self.dist_along(dist));
            dist += spacing;
        }
        result
    }

    pub fn middle(&self) -> Pt2D {
        self.dist_along(self.length / 2.0).0
    }

    pub fn get_bounds(&self) -> Bounds {
        Bounds::from(&self.pts)
    }
}

impl fmt::Display for PolyLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "PolyLine::new(vec![")?;
        for pt in &self.pts {
            writeln!(f, "  Pt2D::new({}, {}),", pt.x(), pt.y())?;
        }
        write!(f, "])")
    }
}

/// Drops points that are within `EPSILON_DIST` of their predecessor.
pub(crate) fn dedupe_adjacent(pts: Vec<Pt2D>) -> Vec<Pt2D> {
    let mut result: Vec<Pt2D> = Vec::with_capacity(pts.len());
    for pt in pts {
        if let Some(last) = result.last() {
            if last.dist_to(pt) < EPSILON_DIST {
                continue;
            }
        }
        result.push(pt);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupes_and_measures() {
        let pl = PolyLine::deduping_new(vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(0.0, 0.0),
            Pt2D::new(3.0, 0.0),
            Pt2D::new(3.0, 4.0),
        ])
        .unwrap();
        assert_eq!(pl.points().len(), 3);
        assert_eq!(pl.length(), 7.0);
        assert_eq!(pl.dist_along(5.0).0, Pt2D::new(3.0, 2.0));
        assert_eq!(pl.dist_along(100.0).0, Pt2D::new(3.0, 4.0));
        assert!(PolyLine::new(vec![Pt2D::new(1.0, 1.0), Pt2D::new(1.0, 1.0)]).is_err());
    }

    #[test]
    fn stepping() {
        let pl = PolyLine::new(vec![Pt2D::new(0.0, 0.0), Pt2D::new(25.0, 0.0)]).unwrap();
        let pts: Vec<f64> = pl.step_along(10.0, 0.0).into_iter().map(|(pt, _)| pt.x()).collect();
        assert_eq!(pts, vec![0.0, 10.0, 20.0]);
        assert!(pl.step_along(0.0, 0.0).is_empty());
    }
}
