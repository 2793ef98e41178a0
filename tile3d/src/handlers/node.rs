use vector_features::{PointDescriptor, VectorNode};

use super::TileContext;
use crate::{InstanceType, Tile3DFeatureCollection, Tile3DInstance, Tile3DLabel};

/// Instance models are built at these heights; taller or shorter ones are scaled.
const TREE_MODEL_HEIGHT: f64 = 10.0;
const WIND_TURBINE_MODEL_HEIGHT: f64 = 100.0;
/// Labels float a bit above the ground
const LABEL_HEIGHT: f64 = 10.0;

pub fn handle_node(ctx: &TileContext, node: &VectorNode, out: &mut Tile3DFeatureCollection) {
    let descriptor = match &node.descriptor {
        Some(d) => d,
        None => return,
    };
    let pt = node.pt();
    if !ctx.grid.contains(pt) {
        return;
    }
    let height = ctx.grid.height_at(pt);

    if let PointDescriptor::Label { text, priority } = descriptor {
        if !ctx.options.skip_labels {
            out.labels.push(Tile3DLabel {
                text: text.clone(),
                priority: *priority,
                x: pt.x(),
                y: height + LABEL_HEIGHT,
                z: pt.y(),
            });
        }
        return;
    }
    if ctx.options.skip_instances {
        return;
    }
    let instance_type = match InstanceType::from_descriptor(descriptor) {
        Some(t) => t,
        None => return,
    };

    let scale = match descriptor {
        PointDescriptor::Tree {
            height: Some(h), ..
        } if *h > 0.0 => h / TREE_MODEL_HEIGHT,
        PointDescriptor::WindTurbine { height: Some(h) } if *h > 0.0 => {
            h / WIND_TURBINE_MODEL_HEIGHT
        }
        _ => 1.0,
    };

    let mut rotation = node.rotation;
    if descriptor.faces_road() {
        if let Some(road) = ctx.graph.get_closest_projection(pt, None) {
            if road.dist_to(pt) > geom::EPSILON_DIST {
                rotation = pt.angle_to(road).normalized_radians();
            }
        }
    }

    out.instances.push(Tile3DInstance {
        instance_type,
        x: pt.x(),
        y: height,
        z: pt.y(),
        scale,
        rotation,
    });
}

#[cfg(test)]
mod tests {
    use geom::Pt2D;
    use road_graph::RoadGraph;
    use vector_features::TreeType;

    use super::*;
    use crate::{FlatTerrain, TerrainGrid, Tile3DOptions};

    fn node(x: f64, y: f64, descriptor: PointDescriptor) -> VectorNode {
        let mut node = VectorNode::vertex(x, y);
        node.descriptor = Some(descriptor);
        node
    }

    fn run(nodes: &[VectorNode], graph: &RoadGraph) -> Tile3DFeatureCollection {
        let grid = TerrainGrid::sample(&FlatTerrain(3.0), 0, 0, 17, 2).unwrap();
        let options = Tile3DOptions::default();
        let ctx = TileContext {
            grid: &grid,
            graph,
            options: &options,
        };
        let mut out = Tile3DFeatureCollection::new(0, 0, 17);
        for node in nodes {
            handle_node(&ctx, node, &mut out);
        }
        out
    }

    #[test]
    fn trees_scale_with_height() {
        let out = run(
            &[
                node(10.0, 10.0, PointDescriptor::Tree {
                    height: Some(15.0),
                    tree_type: TreeType::Oak,
                }),
                node(20.0, 10.0, PointDescriptor::Tree {
                    height: None,
                    tree_type: TreeType::Pine,
                }),
                // Outside the tile
                node(-5.0, 10.0, PointDescriptor::Bollard),
            ],
            &RoadGraph::new(),
        );
        assert_eq!(out.instances.len(), 2);
        assert_eq!(out.instances[0].instance_type, InstanceType::OakTree);
        assert_eq!(out.instances[0].scale, 1.5);
        assert_eq!(out.instances[0].y, 3.0);
        assert_eq!(out.instances[1].scale, 1.0);
    }

    #[test]
    fn street_furniture_faces_the_road() {
        let mut graph = RoadGraph::new();
        graph.add_road(&[Pt2D::new(0.0, 50.0), Pt2D::new(100.0, 50.0)], 6.0, 0);
        graph.init_intersections();
        let out = run(&[node(40.0, 40.0, PointDescriptor::Bench)], &graph);
        // The road is to the south, which is +y
        let rotation = out.instances[0].rotation;
        assert!((rotation - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn labels() {
        let out = run(
            &[node(30.0, 30.0, PointDescriptor::Label {
                text: "Springfield".to_string(),
                priority: 3.0,
            })],
            &RoadGraph::new(),
        );
        assert!(out.instances.is_empty());
        assert_eq!(out.labels.len(), 1);
        assert_eq!(out.labels[0].y, 13.0);
        assert_eq!(out.labels[0].text, "Springfield");
    }
}
