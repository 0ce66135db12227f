//! Image output encoding.
//!
//! The renderer hands over finished 8-bit RGB bytes; this module only knows
//! how to put them on disk or on a stream.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Pixel buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type OutputResult<T> = Result<T, OutputError>;

fn check_len(width: u32, height: u32, rgb: &[u8]) -> OutputResult<()> {
    let expected = width as usize * height as usize * 3;
    if rgb.len() != expected {
        return Err(OutputError::BufferSize {
            width,
            height,
            expected,
            actual: rgb.len(),
        });
    }
    Ok(())
}

/// Write plain-text PPM: `P3`, `<width> <height>`, `255`, then one
/// `<r> <g> <b>` line per pixel in row-major order.
pub fn write_ppm<W: Write>(writer: W, width: u32, height: u32, rgb: &[u8]) -> OutputResult<()> {
    check_len(width, height, rgb)?;

    let mut writer = BufWriter::new(writer);
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", width, height)?;
    writeln!(writer, "255")?;

    for pixel in rgb.chunks_exact(3) {
        writeln!(writer, "{} {} {}", pixel[0], pixel[1], pixel[2])?;
    }

    writer.flush()?;
    Ok(())
}

/// Save to `path`. A `.ppm` extension writes `P3` text; anything else is
/// encoded by the `image` crate according to the extension.
pub fn save_image(path: &Path, width: u32, height: u32, rgb: &[u8]) -> OutputResult<()> {
    check_len(width, height, rgb)?;

    let is_ppm = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("ppm"))
        .unwrap_or(false);

    if is_ppm {
        write_ppm(File::create(path)?, width, height, rgb)?;
    } else {
        image::save_buffer(path, rgb, width, height, image::ColorType::Rgb8)?;
    }

    log::info!("Saved {}x{} image to {}", width, height, path.display());
    Ok(())
}
