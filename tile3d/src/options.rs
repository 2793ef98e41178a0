use serde::{Deserialize, Serialize};
use structopt::StructOpt;

/// Tunes how tiles are built. Every field has a default, so callers and the command line only
/// need to mention what they change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, StructOpt)]
pub struct Tile3DOptions {
    /// Road vertices closer than this many meters are merged into one intersection. Tiles at
    /// very high zoom levels may want a smaller value.
    #[structopt(long, default_value = "0.01")]
    pub intersection_epsilon: f64,
    /// The terrain of a tile is sampled on a grid with this many cells per side. Draped geometry
    /// is split along the cells.
    #[structopt(long, default_value = "16")]
    pub terrain_segments: usize,
    /// Seeds every random placement: rows of generated points along ways, and trees and
    /// shrubs scattered over areas.
    #[structopt(long, default_value = "0")]
    pub seed: u64,
    /// Don't produce extruded buildings
    #[structopt(long)]
    pub skip_buildings: bool,
    /// Don't produce trees, street furniture and other instances
    #[structopt(long)]
    pub skip_instances: bool,
    /// Don't produce labels
    #[structopt(long)]
    pub skip_labels: bool,
}

impl Default for Tile3DOptions {
    fn default() -> Tile3DOptions {
        Tile3DOptions {
            intersection_epsilon: road_graph::INTERSECTION_EPSILON,
            terrain_segments: 16,
            seed: 0,
            skip_buildings: false,
            skip_instances: false,
            skip_labels: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_defaults_match() {
        let parsed = Tile3DOptions::from_iter(vec!["tile3d"]);
        assert_eq!(parsed, Tile3DOptions::default());

        let tuned = Tile3DOptions::from_iter(vec![
            "tile3d",
            "--intersection-epsilon",
            "0.5",
            "--skip-labels",
            "--seed",
            "3",
        ]);
        assert_eq!(tuned.intersection_epsilon, 0.5);
        assert!(tuned.skip_labels);
        assert_eq!(tuned.seed, 3);
        assert!(!tuned.skip_buildings);
    }
}
