use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;
use lumen_core::CameraDescription;
use lumen_renderer::{Camera, Color, ImageWriter, Scene, WhittedTracer};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let description = lumen_core::load_scene_json(&args.scene)
        .with_context(|| format!("failed to load scene {}", args.scene.display()))?;
    let scene = Scene::from_description(&description)
        .with_context(|| format!("failed to build scene '{}'", description.name))?;

    let view = description.camera.unwrap_or_else(|| {
        info!("Scene has no camera, using the default view");
        CameraDescription::default()
    });
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.png", scene.name)));

    let mut builder = Camera::builder()
        .with_description(&view)
        .with_image_sink(ImageWriter::new(&output, args.width, args.height))
        .with_ray_tracer(WhittedTracer::new(Arc::new(scene)))
        .with_antialiasing(args.aa)
        .with_threads(args.threads)
        .with_bucket_size(args.bucket_size)
        .with_print_interval(args.progress)
        .with_seed(args.seed);
    if let Some(aperture) = args.aperture {
        let focal_distance = args.focal_distance.unwrap_or(view.distance);
        builder = builder.with_depth_of_field(args.dof, aperture, focal_distance);
    }
    let mut camera = builder.build().context("invalid camera settings")?;

    camera.render_image();
    if let Some(interval) = args.grid {
        camera.print_grid(interval, Color::splat(255.0));
    }
    camera
        .write_to_image()
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!("Done: {}", output.display());
    Ok(())
}
