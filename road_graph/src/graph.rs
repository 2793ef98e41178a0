use std::collections::BTreeMap;

use rstar::primitives::GeomWithData;
use rstar::{RTree, AABB};

use geom::Pt2D;

use crate::{
    GroupID, Intersection, IntersectionID, LinkedVertex, Road, RoadID, SegmentGroup, VertexID,
};

/// Vertices closer than this are merged into one intersection.
pub const INTERSECTION_EPSILON: f64 = 0.01;

#[derive(Default)]
struct Group {
    roads: Vec<RoadID>,
    /// Only the real junctions, with more than one direction
    intersections: Vec<IntersectionID>,
}

/// A junction with more than two directions, and the polygon covering it.
#[derive(Clone, Debug)]
pub struct IntersectionPolygon {
    pub intersection: IntersectionID,
    /// Closed
    pub polygon: Vec<Pt2D>,
}

pub struct RoadGraph {
    epsilon: f64,
    roads: Vec<Road>,
    vertices: Vec<LinkedVertex>,
    intersections: Vec<Intersection>,
    /// Indexed by VertexID
    vertex_to_intersection: Vec<Option<IntersectionID>>,
    groups: BTreeMap<GroupID, Group>,
    segment_groups: BTreeMap<GroupID, SegmentGroup>,
}

impl Default for RoadGraph {
    fn default() -> RoadGraph {
        RoadGraph::new()
    }
}

impl RoadGraph {
    pub fn new() -> RoadGraph {
        RoadGraph::with_epsilon(INTERSECTION_EPSILON)
    }

    pub fn with_epsilon(epsilon: f64) -> RoadGraph {
        RoadGraph {
            epsilon,
            roads: Vec::new(),
            vertices: Vec::new(),
            intersections: Vec::new(),
            vertex_to_intersection: Vec::new(),
            groups: BTreeMap::new(),
            segment_groups: BTreeMap::new(),
        }
    }

    /// Registers a center-line into its group and the group's segment index. Consecutive
    /// vertices within epsilon of each other are merged first, so a road never meets itself in
    /// a zero-length step. Returns `None` if fewer than two vertices remain.
    pub fn add_road(
        &mut self,
        vertices: &[Pt2D],
        width: f64,
        group_id: GroupID,
    ) -> Option<RoadID> {
        let mut points: Vec<Pt2D> = Vec::with_capacity(vertices.len());
        for pt in vertices {
            if points
                .last()
                .map(|last| last.dist_to(*pt) > self.epsilon)
                .unwrap_or(true)
            {
                points.push(*pt);
            }
        }
        if points.len() < 2 {
            debug!("Skipping a road with {} distinct vertices", points.len());
            return None;
        }

        let id = RoadID(self.roads.len());
        let first_vertex = self.vertices.len();
        let mut ids = Vec::with_capacity(points.len());
        for (idx, pos) in points.iter().enumerate() {
            let vertex_id = VertexID(first_vertex + idx);
            self.vertices.push(LinkedVertex {
                id: vertex_id,
                road: id,
                pos: *pos,
                prev: if idx == 0 {
                    None
                } else {
                    Some(VertexID(vertex_id.0 - 1))
                },
                next: if idx + 1 == points.len() {
                    None
                } else {
                    Some(VertexID(vertex_id.0 + 1))
                },
            });
            self.vertex_to_intersection.push(None);
            ids.push(vertex_id);
        }
        self.roads.push(Road {
            id,
            group: group_id,
            width,
            vertices: ids,
        });

        self.groups.entry(group_id).or_default().roads.push(id);
        self.segment_groups
            .entry(group_id)
            .or_default()
            .add_segments_from_vertices(&points);

        Some(id)
    }

    /// Merges coincident vertices of every group into intersections. Calling this again starts
    /// over.
    pub fn init_intersections(&mut self) {
        self.intersections.clear();
        for slot in &mut self.vertex_to_intersection {
            *slot = None;
        }

        let group_ids: Vec<GroupID> = self.groups.keys().cloned().collect();
        for group_id in group_ids {
            let clusters = self.cluster_vertices(group_id);

            let mut retained = Vec::new();
            for cluster in clusters {
                if cluster.len() < 2 {
                    continue;
                }

                let id = IntersectionID(self.intersections.len());
                let mut intersection = Intersection::new(id, self.vertices[cluster[0].0].pos);
                for vertex_id in &cluster {
                    let vertex = &self.vertices[vertex_id.0];
                    if let Some(next) = vertex.next {
                        intersection.add_direction(vertex.road, next);
                    }
                    if let Some(prev) = vertex.prev {
                        intersection.add_direction(vertex.road, prev);
                    }
                    self.vertex_to_intersection[vertex_id.0] = Some(id);
                }

                if intersection.directions.len() > 1 {
                    retained.push(id);
                }
                self.intersections.push(intersection);
            }

            debug!(
                "Group {} has {} roads and {} intersections",
                group_id,
                self.groups[&group_id].roads.len(),
                retained.len()
            );
            if let Some(group) = self.groups.get_mut(&group_id) {
                group.intersections = retained;
            }
        }
    }

    /// Groups the vertices of every road in the group by position. The first vertex of a cluster
    /// anchors it; later vertices join if they're within epsilon of that anchor. Clusters come
    /// back in the order they were started.
    fn cluster_vertices(&self, group_id: GroupID) -> Vec<Vec<VertexID>> {
        let mut tree: RTree<GeomWithData<[f64; 2], usize>> = RTree::new();
        let mut clusters: Vec<Vec<VertexID>> = Vec::new();

        for road_id in &self.groups[&group_id].roads {
            for vertex_id in &self.roads[road_id.0].vertices {
                let pos = self.vertices[vertex_id.0].pos;
                let envelope = AABB::from_corners(
                    [pos.x() - self.epsilon, pos.y() - self.epsilon],
                    [pos.x() + self.epsilon, pos.y() + self.epsilon],
                );
                let hit = tree.locate_in_envelope(&envelope).next().map(|h| h.data);
                if let Some(cluster) = hit {
                    clusters[cluster].push(*vertex_id);
                } else {
                    tree.insert(GeomWithData::new([pos.x(), pos.y()], clusters.len()));
                    clusters.push(vec![*vertex_id]);
                }
            }
        }

        clusters
    }

    /// Polygons for the junctions of one group that have more than two directions.
    pub fn build_intersection_polygons(&self, group_id: GroupID) -> Vec<IntersectionPolygon> {
        let mut polygons = Vec::new();
        if let Some(group) = self.groups.get(&group_id) {
            for id in &group.intersections {
                let intersection = &self.intersections[id.0];
                if intersection.directions.len() > 2 {
                    polygons.push(IntersectionPolygon {
                        intersection: *id,
                        polygon: intersection.polygon(self),
                    });
                }
            }
        }
        polygons
    }

    /// The closest point on any registered segment, either in one group or across all of them.
    pub fn get_closest_projection(&self, pt: Pt2D, group_id: Option<GroupID>) -> Option<Pt2D> {
        if let Some(group_id) = group_id {
            return self.segment_groups.get(&group_id)?.get_closest_projection(pt);
        }

        let mut closest: Option<(Pt2D, f64)> = None;
        for group in self.segment_groups.values() {
            if let Some(projection) = group.get_closest_projection(pt) {
                let dist = pt.dist_to(projection);
                if closest.map(|(_, best)| dist < best).unwrap_or(true) {
                    closest = Some((projection, dist));
                }
            }
        }
        closest.map(|(pt, _)| pt)
    }

    /// If this vertex ends its road at an intersection shared with exactly one other direction,
    /// returns the position of that other direction's vertex. Road builders use this to join
    /// consecutive roads smoothly.
    pub fn adjacent_vertex(&self, vertex_id: VertexID) -> Option<Pt2D> {
        let intersection = self.intersections_of(vertex_id)?;
        if intersection.directions.len() != 2 {
            return None;
        }
        let vertex = &self.vertices[vertex_id.0];
        intersection
            .directions
            .iter()
            .find(|d| {
                !(d.road == vertex.road
                    && (Some(d.vertex) == vertex.next || Some(d.vertex) == vertex.prev))
            })
            .map(|d| self.vertices[d.vertex.0].pos)
    }

    fn intersections_of(&self, vertex_id: VertexID) -> Option<&Intersection> {
        let id = (*self.vertex_to_intersection.get(vertex_id.0)?)?;
        Some(&self.intersections[id.0])
    }

    pub fn road(&self, id: RoadID) -> &Road {
        &self.roads[id.0]
    }

    pub fn vertex(&self, id: VertexID) -> &LinkedVertex {
        &self.vertices[id.0]
    }

    pub fn intersection(&self, id: IntersectionID) -> &Intersection {
        &self.intersections[id.0]
    }

    /// The real junctions of a group, with more than one direction.
    pub fn intersections(&self, group_id: GroupID) -> Vec<&Intersection> {
        match self.groups.get(&group_id) {
            Some(group) => group
                .intersections
                .iter()
                .map(|id| &self.intersections[id.0])
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn group_ids(&self) -> Vec<GroupID> {
        self.groups.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Pt2D> {
        raw.iter().map(|(x, y)| Pt2D::new(*x, *y)).collect()
    }

    #[test]
    fn two_roads_sharing_an_endpoint() {
        let mut graph = RoadGraph::new();
        graph.add_road(&pts(&[(0.0, 0.0), (10.0, 0.0)]), 4.0, 0);
        graph.add_road(&pts(&[(10.0, 0.0), (10.0, 10.0)]), 4.0, 0);
        graph.init_intersections();

        let intersections = graph.intersections(0);
        assert_eq!(intersections.len(), 1);
        assert_eq!(intersections[0].directions.len(), 2);
        assert_eq!(intersections[0].center, Pt2D::new(10.0, 0.0));
        assert!(graph.build_intersection_polygons(0).is_empty());
    }

    #[test]
    fn three_roads_within_epsilon() {
        let mut graph = RoadGraph::new();
        graph.add_road(&pts(&[(0.0, 0.0), (10.0, 0.0)]), 4.0, 0);
        graph.add_road(&pts(&[(10.005, 0.0), (20.0, 0.0)]), 4.0, 0);
        graph.add_road(&pts(&[(10.0, 20.0), (10.0, 0.004)]), 6.0, 0);
        graph.init_intersections();

        let intersections = graph.intersections(0);
        assert_eq!(intersections.len(), 1);
        assert_eq!(intersections[0].directions.len(), 3);

        let polygons = graph.build_intersection_polygons(0);
        assert_eq!(polygons.len(), 1);
        let polygon = &polygons[0].polygon;
        assert_eq!(polygon.first(), polygon.last());
        // Two corners per direction, plus the closing point
        assert_eq!(polygon.len(), 7);
    }

    #[test]
    fn groups_dont_mix() {
        let mut graph = RoadGraph::new();
        graph.add_road(&pts(&[(0.0, 0.0), (10.0, 0.0)]), 4.0, 0);
        graph.add_road(&pts(&[(10.0, 0.0), (20.0, 0.0)]), 2.0, 1);
        graph.init_intersections();
        assert!(graph.intersections(0).is_empty());
        assert!(graph.intersections(1).is_empty());
        assert!(graph.intersections(7).is_empty());
    }

    #[test]
    fn empty_graph() {
        let mut graph = RoadGraph::new();
        graph.init_intersections();
        assert!(graph.build_intersection_polygons(0).is_empty());
        assert_eq!(graph.get_closest_projection(Pt2D::new(1.0, 1.0), None), None);
        assert_eq!(graph.get_closest_projection(Pt2D::new(1.0, 1.0), Some(3)), None);
    }

    #[test]
    fn closest_projection_across_groups() {
        let mut graph = RoadGraph::new();
        graph.add_road(&pts(&[(0.0, 0.0), (10.0, 0.0)]), 4.0, 0);
        graph.add_road(&pts(&[(0.0, 5.0), (10.0, 5.0)]), 2.0, 1);

        let query = Pt2D::new(3.0, 4.0);
        assert_eq!(
            graph.get_closest_projection(query, None),
            Some(Pt2D::new(3.0, 5.0))
        );
        assert_eq!(
            graph.get_closest_projection(query, Some(0)),
            Some(Pt2D::new(3.0, 0.0))
        );
    }

    #[test]
    fn continuation_across_two_way_junction() {
        let mut graph = RoadGraph::new();
        let r1 = graph.add_road(&pts(&[(0.0, 0.0), (10.0, 0.0)]), 4.0, 0).unwrap();
        let r2 = graph.add_road(&pts(&[(10.0, 0.0), (20.0, 5.0)]), 4.0, 0).unwrap();
        graph.init_intersections();

        let end_of_r1 = graph.road(r1).last_vertex();
        assert_eq!(graph.adjacent_vertex(end_of_r1), Some(Pt2D::new(20.0, 5.0)));
        let start_of_r2 = graph.road(r2).first_vertex();
        assert_eq!(graph.adjacent_vertex(start_of_r2), Some(Pt2D::new(0.0, 0.0)));
        assert_eq!(graph.adjacent_vertex(graph.road(r1).first_vertex()), None);
    }

    #[test]
    fn repeated_vertices_dont_make_a_junction() {
        let mut graph = RoadGraph::new();
        let road = graph
            .add_road(
                &pts(&[(0.0, 0.0), (50.0, 0.0), (50.0, 0.0), (50.005, 0.0), (100.0, 0.0)]),
                6.0,
                0,
            )
            .unwrap();
        graph.init_intersections();

        assert_eq!(graph.road(road).vertices.len(), 3);
        assert!(graph.intersections(0).is_empty());
        assert!(graph.build_intersection_polygons(0).is_empty());
    }

    #[test]
    fn degenerate_roads_are_skipped() {
        let mut graph = RoadGraph::new();
        assert_eq!(graph.add_road(&[], 4.0, 0), None);
        assert_eq!(graph.add_road(&pts(&[(5.0, 5.0)]), 4.0, 0), None);
        assert_eq!(graph.add_road(&pts(&[(5.0, 5.0), (5.0, 5.001)]), 4.0, 0), None);
        graph.init_intersections();
        assert!(graph.group_ids().is_empty());
        assert_eq!(graph.get_closest_projection(Pt2D::new(5.0, 5.0), None), None);
    }
}
