//! Tile rendering.
//!
//! The scheduler hands out rectangular tiles of the image; each tile is
//! rendered independently into its own pixel vector and copied into the
//! framebuffer afterwards, so no two threads ever write the same pixel.

use std::sync::Arc;

use crate::renderer::render_pixel;
use crate::{Camera, Color, Hittable, RenderConfig};
use lumen_math::Bounds2i;

/// Read-only state shared by every tile of a render.
pub struct TileContext {
    pub camera: Camera,
    pub world: Arc<dyn Hittable>,
    pub lights: Option<Arc<dyn Hittable>>,
    pub config: RenderConfig,
}

/// Render a single tile to a vector of colors.
///
/// Returns pixels in row-major order within the tile.
pub fn render_tile(tile: Bounds2i, ctx: &TileContext) -> Vec<Color> {
    tile.iter()
        .map(|p| {
            render_pixel(
                &ctx.camera,
                ctx.world.as_ref(),
                ctx.lights.as_deref(),
                p.x as u32,
                p.y as u32,
                &ctx.config,
            )
        })
        .collect()
}

/// Seed for the random stream of pixel (x, y).
///
/// Mixing the coordinates through splitmix64 gives every pixel an
/// independent stream, so the image does not depend on which thread
/// rendered which tile.
pub fn pixel_seed(seed: u64, x: u32, y: u32) -> u64 {
    let coords = ((y as u64) << 32) | x as u64;
    let mut z = seed ^ coords.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
