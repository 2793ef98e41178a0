//! Tools for classifying map features and building 3D tiles from them, bundled as a single
//! executable.

#[macro_use]
extern crate log;

mod build_tiles;

use anyhow::{bail, Result};
use structopt::StructOpt;

use abstutil::Tags;
use tile3d::Tile3DOptions;
use vector_features::FeatureShape;

#[derive(StructOpt)]
#[structopt(name = "tilecli", about = "Builds 3D tile geometry from vector features")]
enum Command {
    /// Prints what a set of OSM tags classifies as, for one shape of feature
    Classify {
        /// One of area, polyline, point
        #[structopt(long, parse(try_from_str = parse_shape))]
        shape: FeatureShape,
        /// Tags, each written as key=value
        #[structopt(parse(try_from_str = parse_tag))]
        tags: Vec<(String, String)>,
    },
    /// Classifies the features of one raw tile and prints them as JSON
    DumpFeatures {
        /// The path to a raw tile, in JSON
        #[structopt()]
        input: String,
        /// Seeds the randomness in rows of generated points
        #[structopt(long, default_value = "0")]
        seed: u64,
    },
    /// Builds the 3D buffers of one raw tile
    BuildTile {
        /// The path to a raw tile, in JSON
        #[structopt(long)]
        input: String,
        /// The path to write the buffers to, in JSON
        #[structopt(long)]
        output: String,
        /// Height of the ground everywhere, in meters. There's no elevation data here yet.
        #[structopt(long, default_value = "0")]
        ground_height: f64,
        #[structopt(flatten)]
        opts: Tile3DOptions,
    },
    /// Builds every raw tile in a directory, in parallel
    BuildTiles {
        /// A directory of raw tiles. Every file ending in .json is read.
        #[structopt(long)]
        input_dir: String,
        /// Buffers are written here, one file per tile, named zoom_x_y.json
        #[structopt(long)]
        output_dir: String,
        #[structopt(long, default_value = "0")]
        ground_height: f64,
        #[structopt(flatten)]
        opts: Tile3DOptions,
    },
}

fn main() -> Result<()> {
    let cmd = Command::from_args();

    // Classify output goes to STDOUT and is meant to be piped
    if !matches!(cmd, Command::Classify { .. }) {
        abstutil::logger::setup();
    }

    match cmd {
        Command::Classify { shape, tags } => classify(shape, tags),
        Command::DumpFeatures { input, seed } => build_tiles::dump_features(input, seed)?,
        Command::BuildTile {
            input,
            output,
            ground_height,
            opts,
        } => build_tiles::build_one(input, output, ground_height, opts)?,
        Command::BuildTiles {
            input_dir,
            output_dir,
            ground_height,
            opts,
        } => build_tiles::build_all(input_dir, output_dir, ground_height, opts)?,
    }
    Ok(())
}

fn classify(shape: FeatureShape, tags: Vec<(String, String)>) {
    let tags: Tags = tags.into_iter().collect();
    match vector_features::classify_osm(shape, &tags) {
        Some(qualifiers) => println!("{}", abstutil::to_json(&qualifiers)),
        None => println!("{:?} isn't a relevant {:?}", tags, shape),
    }
}

fn parse_shape(x: &str) -> Result<FeatureShape> {
    match x {
        "area" => Ok(FeatureShape::Area),
        "polyline" => Ok(FeatureShape::Polyline),
        "point" => Ok(FeatureShape::Point),
        _ => bail!("Unknown shape {}; use area, polyline, or point", x),
    }
}

fn parse_tag(x: &str) -> Result<(String, String)> {
    match x.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => bail!("{} isn't of the form key=value", x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_args() {
        assert_eq!(
            parse_tag("barrier=fence").unwrap(),
            ("barrier".to_string(), "fence".to_string())
        );
        assert_eq!(
            parse_tag("name=a=b").unwrap(),
            ("name".to_string(), "a=b".to_string())
        );
        assert!(parse_tag("=fence").is_err());
        assert!(parse_tag("fence").is_err());
        assert_eq!(parse_shape("polyline").unwrap(), FeatureShape::Polyline);
        assert!(parse_shape("line").is_err());
    }

    #[test]
    fn build_tile_flags() {
        let cmd = Command::from_iter(vec![
            "tilecli",
            "build-tile",
            "--input",
            "raw.json",
            "--output",
            "out.json",
            "--skip-labels",
            "--seed",
            "9",
        ]);
        match cmd {
            Command::BuildTile { opts, .. } => {
                assert!(opts.skip_labels);
                assert!(!opts.skip_buildings);
                assert_eq!(opts.seed, 9);
            }
            _ => panic!("wrong command"),
        }
    }
}
