use rstar::primitives::Line as RLine;
use rstar::RTree;

use geom::{Line, Pt2D};

/// An R-tree over every road segment of one group, for nearest-point queries.
#[derive(Default)]
pub struct SegmentGroup {
    tree: RTree<RLine<[f64; 2]>>,
}

impl SegmentGroup {
    pub fn new() -> SegmentGroup {
        SegmentGroup { tree: RTree::new() }
    }

    /// Each consecutive pair of vertices becomes a segment. Degenerate segments are skipped.
    pub fn add_segments_from_vertices(&mut self, vertices: &[Pt2D]) {
        for pair in vertices.windows(2) {
            if let Some(line) = Line::maybe_new(pair[0], pair[1]) {
                self.tree
                    .insert(RLine::new(line.pt1().into(), line.pt2().into()));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// The closest point lying on any segment, or None if there are no segments.
    pub fn get_closest_projection(&self, pt: Pt2D) -> Option<Pt2D> {
        let query: [f64; 2] = pt.into();
        let segment = self.tree.nearest_neighbor(&query)?;
        let projected = Line::new(segment.from.into(), segment.to.into()).project_pt(pt);
        Some(projected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_onto_nearest_segment() {
        let mut group = SegmentGroup::new();
        assert_eq!(group.get_closest_projection(Pt2D::new(0.0, 0.0)), None);

        group.add_segments_from_vertices(&[
            Pt2D::new(0.0, 0.0),
            Pt2D::new(10.0, 0.0),
            Pt2D::new(10.0, 10.0),
        ]);
        group.add_segments_from_vertices(&[Pt2D::new(50.0, 50.0), Pt2D::new(50.0, 50.0)]);
        assert_eq!(group.len(), 2);

        assert_eq!(
            group.get_closest_projection(Pt2D::new(4.0, 3.0)),
            Some(Pt2D::new(4.0, 0.0))
        );
        assert_eq!(
            group.get_closest_projection(Pt2D::new(14.0, 6.0)),
            Some(Pt2D::new(10.0, 6.0))
        );
    }
}
