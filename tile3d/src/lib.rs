//! Turns the classified vector features of one map tile into render-ready 3D buffers.
//!
//! `Tile3DFromVectorBuilder` drives everything for one tile: it links road center-lines into a
//! `RoadGraph`, runs a handler per feature, and collects the output of the geometry builders
//! into a `Tile3DFeatureCollection`. `Tile3DBuffers::from_collection` then packs that into the
//! flat typed arrays a renderer consumes.
//!
//! Coordinates are tile-local meters. In 2D, x points east and y points south. In 3D, x is the
//! same, y is the height, and z is the 2D y.

#[macro_use]
extern crate log;

mod buffers;
pub mod builders;
mod features;
pub mod geometry;
mod handlers;
mod options;
mod terrain;
mod textures;
mod tile_builder;

pub use crate::buffers::{
    Tile3DBuffers, Tile3DBuffersExtruded, Tile3DBuffersHugging, Tile3DBuffersInstance,
    Tile3DBuffersLabels, Tile3DBuffersProjected, Tile3DTerrainMask, INSTANCE_STRIDE,
};
pub use crate::features::{
    InstanceType, Tile3DExtrudedGeometry, Tile3DFeatureCollection, Tile3DHuggingGeometry,
    Tile3DInstance, Tile3DLabel, Tile3DProjectedGeometry, Tile3DTerrainMaskGeometry,
};
pub use crate::options::Tile3DOptions;
pub use crate::terrain::{tile_size, FlatTerrain, TerrainGrid, TerrainHeightProvider};
pub use crate::textures::{ExtrudedTexture, ProjectedTexture};
pub use crate::tile_builder::Tile3DFromVectorBuilder;
