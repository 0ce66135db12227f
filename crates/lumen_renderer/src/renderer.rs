//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - An iterative bounce loop bounded by a configurable depth
//! - Light importance sampling when the scene names its lights
//! - Stratified anti-aliasing and gamma correction

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Instant;

use crate::parallel::{parallel_for_2d, tile_edge, ThreadPool};
use crate::tile::{pixel_seed, render_tile, TileContext};
use crate::{Camera, Color, HitRecord, Hittable, Pdf, Ray};
use lumen_math::{Aabb, Bounds2i, Interval};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Closest distance accepted for a hit, to avoid self-intersection acne.
const RAY_EPSILON: f64 = 0.001;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel; rounded down to a square number of strata
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Radiance of rays that escape the scene
    pub background: Color,
    /// Base seed for the per-pixel random streams
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 10,
            max_depth: 10,
            background: Color::ZERO,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Edge of the stratification grid: `floor(sqrt(spp))`, at least 1.
    pub fn sqrt_spp(&self) -> u32 {
        ((self.samples_per_pixel as f64).sqrt() as u32).max(1)
    }
}

/// Lights with nothing in them cannot be sampled.
fn usable_lights(lights: Option<&dyn Hittable>) -> Option<&dyn Hittable> {
    lights.filter(|lights| lights.bounding_box() != Aabb::EMPTY)
}

/// Compute the radiance arriving along a ray.
///
/// Walks the path one bounce at a time, keeping the product of the bounce
/// weights so far (`throughput`) and the radiance gathered so far. The path
/// ends on a miss, on a surface that does not scatter, or after `max_depth`
/// bounces.
///
/// With `lights`, every bounce is importance-sampled toward the lights and
/// reweighted by the material's own scattering density. Without, the
/// material's own sample is followed.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let lights = usable_lights(lights);
    let mut ray = *ray;
    let mut radiance = Color::ZERO;
    let mut throughput = Color::ONE;

    for _ in 0..config.max_depth {
        let mut rec = HitRecord::default();

        // Ray didn't hit anything - return background
        if !world.hit(&ray, Interval::new(RAY_EPSILON, f64::INFINITY), &mut rec, rng) {
            return radiance + throughput * config.background;
        }

        radiance += throughput * rec.material.emitted(&ray, &rec, rec.u, rec.v, rec.p);

        let Some(scatter) = rec.material.scatter(&ray, &rec, rng) else {
            return radiance;
        };

        let (scattered, weight) = match lights {
            Some(lights) => {
                let light_pdf = Pdf::toward(lights, rec.p);
                let scattered = Ray::new(rec.p, light_pdf.generate(rng), ray.time());
                let pdf_value = light_pdf.value(scattered.direction());

                // Sampled direction the lights cannot produce
                if !(pdf_value > 0.0 && pdf_value.is_finite()) {
                    return radiance;
                }

                let scattering_pdf = rec.material.scattering_pdf(&ray, &rec, &scattered);
                (scattered, scatter.attenuation * scattering_pdf / pdf_value)
            }
            None if scatter.pdf > 0.0 => {
                let scattering_pdf = rec.material.scattering_pdf(&ray, &rec, &scatter.scattered);
                (
                    scatter.scattered,
                    scatter.attenuation * scattering_pdf / scatter.pdf,
                )
            }
            // Specular lobe: the sample carries the whole attenuation
            None => (scatter.scattered, scatter.attenuation),
        };

        throughput *= weight;
        if throughput == Color::ZERO {
            return radiance;
        }
        ray = scattered;
    }

    radiance
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGB.
///
/// NaN components (from degenerate samples) become 0 before gamma.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.000, 0.999);
    let channel = |c: f64| {
        let c = if c.is_nan() { 0.0 } else { c };
        (256.0 * intensity.clamp(linear_to_gamma(c))) as u8
    };
    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Render a single pixel with stratified multi-sampling.
///
/// The pixel draws from its own random stream seeded by its coordinates.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    x: u32,
    y: u32,
    config: &RenderConfig,
) -> Color {
    let mut rng = StdRng::seed_from_u64(pixel_seed(config.seed, x, y));
    let sqrt_spp = config.sqrt_spp();
    let mut pixel_color = Color::ZERO;

    for s_j in 0..sqrt_spp {
        for s_i in 0..sqrt_spp {
            let ray = camera.get_ray(x, y, s_i, s_j, sqrt_spp, &mut rng);
            pixel_color += ray_color(&ray, world, lights, config, &mut rng);
        }
    }

    // Average the samples
    pixel_color / (sqrt_spp * sqrt_spp) as f64
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone, Default)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[y as usize * self.width as usize + x as usize] = color;
    }

    /// Copy a rendered tile (row-major pixels) into place.
    pub fn write_tile(&mut self, tile: Bounds2i, pixels: &[Color]) {
        for (p, color) in tile.iter().zip(pixels) {
            self.set(p.x as u32, p.y as u32, *color);
        }
    }

    /// Convert to gamma-corrected RGB bytes, top row first.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| color_to_rgb8(*color))
            .collect()
    }
}

/// Render the scene through `camera` on `pool`.
///
/// `world` and `lights` are shared read-only by all threads. Tiles partition
/// the image, so each one is rendered into its own pixel vector and sent back
/// to the calling thread, which assembles the image once the job is done.
pub fn render(
    pool: &ThreadPool,
    camera: &Camera,
    world: Arc<dyn Hittable>,
    lights: Option<Arc<dyn Hittable>>,
    config: &RenderConfig,
) -> ImageBuffer {
    let width = camera.image_width();
    let height = camera.image_height();
    let extent = Bounds2i::from_size(width, height);

    log::info!(
        "Rendering {}x{} at {} spp ({}x{} strata), max depth {}, {} threads",
        width,
        height,
        config.sqrt_spp() * config.sqrt_spp(),
        config.sqrt_spp(),
        config.sqrt_spp(),
        config.max_depth,
        pool.running_threads()
    );
    let start = Instant::now();

    let edge = tile_edge(extent.area(), pool.running_threads()) as u32;
    let total_tiles = width.div_ceil(edge) as usize * height.div_ceil(edge) as usize;
    let report_every = (total_tiles / 10).max(1);
    let finished = AtomicUsize::new(0);

    let ctx = TileContext {
        camera: camera.clone(),
        world,
        lights,
        config: config.clone(),
    };

    let (sender, tiles) = mpsc::channel::<(Bounds2i, Vec<Color>)>();
    parallel_for_2d(pool, extent, move |tile| {
        let pixels = render_tile(tile, &ctx);
        // The receiver outlives the job
        let _ = sender.send((tile, pixels));

        let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
        if done % report_every == 0 {
            log::debug!("Rendered {done}/{total_tiles} tiles");
        }
    });

    let mut image = ImageBuffer::new(width, height);
    for (tile, pixels) in tiles.try_iter() {
        image.write_tile(tile, &pixels);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}
