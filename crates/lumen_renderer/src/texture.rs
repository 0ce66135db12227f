//! Textures: colour as a function of surface coordinates and position.

use std::sync::Arc;

use crate::{perlin::Perlin, Color};
use lumen_core::ImageData;
use lumen_math::{Interval, Point3};
use rand::RngCore;

/// Trait for anything that can be looked up at a hit point.
pub trait Texture: Send + Sync {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color;
}

/// A single constant colour.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::new(Color::new(red, green, blue))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        self.albedo
    }
}

/// Solid 3D checker pattern alternating between two textures.
pub struct CheckerTexture {
    inv_scale: f64,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    /// `scale` is the edge length of one checker cell in world units.
    pub fn new(scale: f64, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f64, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let parity = cell.x as i64 + cell.y as i64 + cell.z as i64;

        if parity.rem_euclid(2) == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Texture backed by an image, addressed by surface UV.
pub struct ImageTexture {
    image: ImageData,
}

impl ImageTexture {
    /// Load `filename` through the image search path. A missing file gives
    /// an empty image, which renders as the loader's sentinel colour.
    pub fn new(filename: &str) -> Self {
        Self::from_image(ImageData::load(filename))
    }

    pub fn from_image(image: ImageData) -> Self {
        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Point3) -> Color {
        // Debugging aid: no image data at all
        if self.image.height() == 0 {
            return Color::new(0.0, 1.0, 1.0);
        }

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        let v = 1.0 - unit.clamp(v);

        let i = (u * self.image.width() as f64) as i64;
        let j = (v * self.image.height() as f64) as i64;
        let [r, g, b] = self.image.pixel_data(i, j);

        let color_scale = 1.0 / 255.0;
        Color::new(
            color_scale * r as f64,
            color_scale * g as f64,
            color_scale * b as f64,
        )
    }
}

/// Marble-like Perlin noise texture.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f64,
}

impl NoiseTexture {
    pub fn new(scale: f64, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f64, _v: f64, p: Point3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.noise.turb(p, 7);
        Color::ONE * 0.5 * (1.0 + phase.sin())
    }
}
