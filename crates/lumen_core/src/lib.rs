//! Lumen Core - the file-facing collaborators of the renderer.
//!
//! This crate provides:
//!
//! - **Image loading**: `ImageData`, 8-bit linear RGB pixels for image
//!   textures, found through a search path and never failing hard
//! - **Image output**: PPM (`P3`) text encoding and any format the `image`
//!   crate can write
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{ImageData, write_ppm};
//!
//! let earth = ImageData::load("earthmap.jpg");
//! println!("{}x{}", earth.width(), earth.height());
//!
//! write_ppm(std::io::stdout().lock(), 2, 1, &[255, 0, 0, 0, 0, 255])?;
//! ```

pub mod image_data;
pub mod output;

pub use image_data::{ImageData, ImageLoadError, ImageResult, IMAGE_DIR_ENV};
pub use output::{save_image, write_ppm, OutputError, OutputResult};
