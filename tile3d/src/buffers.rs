use std::collections::BTreeMap;

use geom::{Bounds3D, Pt3D};
use serde::{Deserialize, Serialize};

use crate::{InstanceType, Tile3DFeatureCollection};

/// Floats per instance: x, y, z, scale, rotation.
pub const INSTANCE_STRIDE: usize = 5;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tile3DBuffersExtruded {
    pub position: Vec<f32>,
    pub normal: Vec<f32>,
    pub uv: Vec<f32>,
    pub texture_id: Vec<u8>,
    pub color: Vec<u8>,
    /// The OSM id of each feature
    pub id: Vec<u32>,
    /// The first vertex of each feature
    pub offset: Vec<u32>,
    /// The feature index of each vertex
    pub local_id: Vec<u32>,
    pub bounding_box: Bounds3D,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tile3DBuffersProjected {
    pub position: Vec<f32>,
    pub normal: Vec<f32>,
    pub uv: Vec<f32>,
    pub texture_id: Vec<u8>,
    pub bounding_box: Bounds3D,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tile3DBuffersHugging {
    pub position: Vec<f32>,
    pub normal: Vec<f32>,
    pub uv: Vec<f32>,
    pub texture_id: Vec<u8>,
    pub bounding_box: Bounds3D,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tile3DTerrainMask {
    /// `[x, z]` pairs
    pub position: Vec<f32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tile3DBuffersLabels {
    pub position: Vec<f32>,
    pub priority: Vec<f32>,
    pub text: Vec<String>,
    pub bounding_box: Bounds3D,
}

/// Instances of one type, `INSTANCE_STRIDE` floats each.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tile3DBuffersInstance {
    /// Everything
    pub lod0: Vec<f32>,
    /// Every second tree or shrub, and everything else
    pub lod1: Vec<f32>,
}

/// The flat arrays handed to the renderer for one tile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tile3DBuffers {
    pub x: u32,
    pub y: u32,
    pub zoom: u32,
    pub extruded: Tile3DBuffersExtruded,
    pub projected: Tile3DBuffersProjected,
    pub hugging: Tile3DBuffersHugging,
    pub terrain_mask: Tile3DTerrainMask,
    pub labels: Tile3DBuffersLabels,
    pub instances: BTreeMap<InstanceType, Tile3DBuffersInstance>,
}

impl Tile3DBuffers {
    pub fn from_collection(collection: &Tile3DFeatureCollection) -> Tile3DBuffers {
        let mut buffers = Tile3DBuffers {
            x: collection.x,
            y: collection.y,
            zoom: collection.zoom,
            ..Default::default()
        };

        let extruded = &mut buffers.extruded;
        for (idx, feature) in collection.extruded.iter().enumerate() {
            extruded.id.push(feature.osm_reference.id as u32);
            extruded.offset.push((extruded.position.len() / 3) as u32);
            let vertices = feature.position.len() / 3;
            extruded
                .local_id
                .extend(std::iter::repeat(idx as u32).take(vertices));
            extruded.position.extend_from_slice(&feature.position);
            extruded.normal.extend_from_slice(&feature.normal);
            extruded.uv.extend_from_slice(&feature.uv);
            extruded.texture_id.extend_from_slice(&feature.texture_id);
            extruded.color.extend_from_slice(&feature.color);
            extruded.bounding_box.union(&feature.bounding_box);
        }

        // Later features are drawn over earlier ones. The sort is stable, so ties keep their
        // input order.
        let mut projected: Vec<_> = collection.projected.iter().collect();
        projected.sort_by(|a, b| a.z_index.total_cmp(&b.z_index));
        for feature in projected {
            let out = &mut buffers.projected;
            out.position.extend_from_slice(&feature.position);
            out.normal.extend_from_slice(&feature.normal);
            out.uv.extend_from_slice(&feature.uv);
            out.texture_id.extend_from_slice(&feature.texture_id);
            out.bounding_box.union(&feature.bounding_box);
        }

        for feature in &collection.hugging {
            let out = &mut buffers.hugging;
            out.position.extend_from_slice(&feature.position);
            out.normal.extend_from_slice(&feature.normal);
            out.uv.extend_from_slice(&feature.uv);
            out.texture_id.extend_from_slice(&feature.texture_id);
            out.bounding_box.union(&feature.bounding_box);
        }

        for mask in &collection.terrain_mask {
            buffers
                .terrain_mask
                .position
                .extend_from_slice(&mask.position);
        }

        for label in &collection.labels {
            let out = &mut buffers.labels;
            out.position
                .extend([label.x as f32, label.y as f32, label.z as f32]);
            out.priority.push(label.priority as f32);
            out.text.push(label.text.clone());
            out.bounding_box
                .include_point(Pt3D::new(label.x, label.y, label.z));
        }

        let mut reducible_seen: BTreeMap<InstanceType, usize> = BTreeMap::new();
        for instance in &collection.instances {
            let values = [
                instance.x as f32,
                instance.y as f32,
                instance.z as f32,
                instance.scale as f32,
                instance.rotation as f32,
            ];
            let out = buffers.instances.entry(instance.instance_type).or_default();
            out.lod0.extend(values);
            let keep = if instance.instance_type.is_reducible() {
                let seen = reducible_seen.entry(instance.instance_type).or_insert(0);
                *seen += 1;
                *seen % 2 == 1
            } else {
                true
            };
            if keep {
                out.lod1.extend(values);
            }
        }

        buffers
    }

    pub fn extruded_vertex_count(&self) -> usize {
        self.extruded.position.len() / 3
    }

    pub fn projected_vertex_count(&self) -> usize {
        self.projected.position.len() / 3
    }

    pub fn hugging_vertex_count(&self) -> usize {
        self.hugging.position.len() / 3
    }
}
