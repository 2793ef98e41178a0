use anyhow::{Context, Result};

use abstutil::Timer;
use tile3d::{FlatTerrain, Tile3DBuffers, Tile3DFromVectorBuilder, Tile3DOptions};
use vector_features::{RawTile, VectorFeatureCollectionBuilder};

pub fn dump_features(input: String, seed: u64) -> Result<()> {
    let raw: RawTile = abstutil::read_json(&input)?;
    let collection = VectorFeatureCollectionBuilder::from_raw_tile(&raw, seed)
        .with_context(|| format!("classifying {}", input))?;
    println!("{}", abstutil::to_json(&collection));
    Ok(())
}

pub fn build_one(
    input: String,
    output: String,
    ground_height: f64,
    opts: Tile3DOptions,
) -> Result<()> {
    let mut timer = Timer::new(format!("build {}", input));
    let raw: RawTile = abstutil::read_json(&input)?;
    let buffers = build(&raw, &FlatTerrain(ground_height), &opts, &mut timer)
        .with_context(|| format!("building {}", input))?;
    abstutil::write_json(&output, &buffers)?;
    info!(
        "Wrote {} with {} extruded, {} projected, {} hugging vertices",
        output,
        buffers.extruded_vertex_count(),
        buffers.projected_vertex_count(),
        buffers.hugging_vertex_count()
    );
    Ok(())
}

/// A tile that fails doesn't stop the others. Failures are reported at the end.
pub fn build_all(
    input_dir: String,
    output_dir: String,
    ground_height: f64,
    opts: Tile3DOptions,
) -> Result<()> {
    let mut timer = Timer::new(format!("build every tile in {}", input_dir));
    let mut inputs = Vec::new();
    for entry in fs_err::read_dir(&input_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|x| x.to_str()) == Some("json") {
            inputs.push(path.display().to_string());
        }
    }
    inputs.sort();

    let terrain = FlatTerrain(ground_height);
    let results = timer.parallelize("build tiles", inputs, |input| {
        let result = build_to_dir(&input, &output_dir, &terrain, &opts);
        (input, result)
    });

    let mut failures = 0;
    for (input, result) in results {
        match result {
            Ok(warnings) => {
                for line in warnings {
                    timer.warn(format!("{}: {}", input, line));
                }
            }
            Err(err) => {
                error!("{} failed: {:#}", input, err);
                failures += 1;
            }
        }
    }
    if failures > 0 {
        anyhow::bail!("{} tiles failed", failures);
    }
    Ok(())
}

/// Returns the warnings of the build, since the timer can't be shared between threads.
fn build_to_dir(
    input: &str,
    output_dir: &str,
    terrain: &FlatTerrain,
    opts: &Tile3DOptions,
) -> Result<Vec<String>> {
    let raw: RawTile = abstutil::read_json(input)?;
    let mut timer = Timer::throwaway();
    let buffers = build(&raw, terrain, opts, &mut timer)?;
    let output = format!("{}/{}_{}_{}.json", output_dir, raw.zoom, raw.x, raw.y);
    abstutil::write_json(&output, &buffers)?;
    Ok(timer.warnings().to_vec())
}

fn build(
    raw: &RawTile,
    terrain: &FlatTerrain,
    opts: &Tile3DOptions,
    timer: &mut Timer,
) -> Result<Tile3DBuffers> {
    timer.start("classify features");
    let collection = VectorFeatureCollectionBuilder::from_raw_tile(raw, opts.seed);
    timer.stop("classify features");
    let collection = collection?;

    let builder = Tile3DFromVectorBuilder::new(collection, terrain, opts.clone());
    let features = builder.get_features(raw.x, raw.y, raw.zoom, timer);
    Ok(Tile3DBuffers::from_collection(&features))
}
