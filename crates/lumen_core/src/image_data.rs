//! Image loading for image textures.
//!
//! Images are located by searching a directory named by the `LUMEN_IMAGES`
//! environment variable first, then the working directory, then `images/`
//! subdirectories of the working directory and up to six of its ancestors.
//! A file that cannot be found or decoded yields an empty image whose every
//! pixel reads as magenta; loading never aborts a render.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable naming the first directory searched for images.
pub const IMAGE_DIR_ENV: &str = "LUMEN_IMAGES";

/// Number of parent directories searched for an `images/` folder.
const MAX_PARENT_LEVELS: usize = 6;

const BYTES_PER_PIXEL: usize = 3;

/// Returned for every lookup into an empty image.
const MAGENTA: [u8; 3] = [255, 0, 255];

/// Errors that can occur while loading a single image file.
#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("Image decoding error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image not found: {0}")]
    NotFound(String),
}

pub type ImageResult<T> = Result<T, ImageLoadError>;

/// Linear 8-bit RGB pixel data, row-major, top row first.
#[derive(Clone, Debug, Default)]
pub struct ImageData {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl ImageData {
    /// Build an image from raw linear RGB bytes.
    ///
    /// Returns `None` if `bytes` does not hold exactly `width * height` pixels.
    pub fn from_rgb_bytes(width: u32, height: u32, bytes: Vec<u8>) -> Option<Self> {
        if bytes.len() != width as usize * height as usize * BYTES_PER_PIXEL {
            return None;
        }
        Some(Self {
            width,
            height,
            bytes,
        })
    }

    /// Load `filename` using the search path described in the module docs.
    ///
    /// On failure an error is logged and an empty image is returned.
    pub fn load(filename: &str) -> Self {
        let env_dir = std::env::var_os(IMAGE_DIR_ENV).map(PathBuf::from);

        for candidate in candidate_paths(filename, env_dir.as_deref()) {
            match Self::open(&candidate) {
                Ok(image) => {
                    log::debug!(
                        "Loaded image: {} ({}x{})",
                        candidate.display(),
                        image.width,
                        image.height
                    );
                    return image;
                }
                Err(ImageLoadError::NotFound(_)) => continue,
                Err(e) => log::warn!("Skipping {}: {}", candidate.display(), e),
            }
        }

        log::error!("Could not load image file '{}'", filename);
        Self::default()
    }

    /// Load exactly one file, converting sRGB values to linear bytes.
    pub fn open(path: &Path) -> ImageResult<Self> {
        if !path.is_file() {
            return Err(ImageLoadError::NotFound(path.display().to_string()));
        }

        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        let bytes = rgb
            .into_raw()
            .into_iter()
            .map(|b| float_to_byte(srgb_to_linear(b)))
            .collect();

        Ok(Self {
            width,
            height,
            bytes,
        })
    }

    /// Width in pixels, 0 when the image failed to load.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels, 0 when the image failed to load.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// RGB bytes of the pixel at (x, y), with coordinates clamped to the image.
    ///
    /// Empty images answer magenta for every coordinate.
    pub fn pixel_data(&self, x: i64, y: i64) -> [u8; 3] {
        if self.is_empty() {
            return MAGENTA;
        }

        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let idx = (y * self.width as usize + x) * BYTES_PER_PIXEL;

        [self.bytes[idx], self.bytes[idx + 1], self.bytes[idx + 2]]
    }
}

/// The ordered list of locations tried for `filename`.
pub fn candidate_paths(filename: &str, env_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(MAX_PARENT_LEVELS + 3);

    if let Some(dir) = env_dir {
        paths.push(dir.join(filename));
    }
    paths.push(PathBuf::from(filename));

    let mut prefix = PathBuf::new();
    for _ in 0..=MAX_PARENT_LEVELS {
        paths.push(prefix.join("images").join(filename));
        prefix.push("..");
    }

    paths
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Map [0, 1] to [0, 255] so that 0.999 still lands on 255.
fn float_to_byte(value: f32) -> u8 {
    if value <= 0.0 {
        0
    } else if value >= 1.0 {
        255
    } else {
        (256.0 * value) as u8
    }
}
