use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_core::{save_image, write_ppm};
use lumen_renderer::{render, ThreadPool};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod cli;
mod scenes;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = args.log_level {
        logger.filter_level(level.into());
    }
    logger.init();

    log::info!("Starting Lumen: {:?}", args.scene);

    let mut scene_rng = StdRng::seed_from_u64(args.seed);
    let mut scene = scenes::build(args.scene, &mut scene_rng);

    // Command line overrides the scene's own settings
    if let Some(width) = args.width {
        let aspect_ratio = scene.camera.aspect_ratio();
        scene.camera = scene.camera.with_image(width, aspect_ratio);
    }
    if let Some(spp) = args.spp {
        scene.config.samples_per_pixel = spp;
    }
    if let Some(max_depth) = args.max_depth {
        scene.config.max_depth = max_depth;
    }
    scene.config.seed = args.seed;
    scene.camera.initialize();

    let pool = match args.threads {
        Some(threads) => ThreadPool::new(threads),
        None => ThreadPool::with_available_parallelism(),
    };

    let image = render(&pool, &scene.camera, scene.world, scene.lights, &scene.config);
    let rgb = image.to_rgb8();

    match &args.output {
        Some(path) => save_image(path, image.width, image.height, &rgb)
            .with_context(|| format!("Failed to write image to {}", path.display()))?,
        None => write_ppm(io::stdout().lock(), image.width, image.height, &rgb)
            .context("Failed to write image to stdout")?,
    }

    Ok(())
}
