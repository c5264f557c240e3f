//! PNG import and export for the synthesis core
//!
//! The codec boundary: everything is normalized to 8-bit RGBA on the way in
//! (palette, grayscale, 16-bit, and tRNS inputs included), and the core's
//! buffer is handed back to the `image` crate on the way out.

use crate::io::error::QuiltError;
use crate::raster::{Image, Rgba};
use image::{ImageBuffer, Rgba as CodecRgba};
use std::path::Path;

/// Load an image file and normalize it to 8-bit RGBA
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn import_rgba<P: AsRef<Path>>(path: P) -> crate::Result<Image> {
    let path_buf = path.as_ref().to_path_buf();
    let decoded = image::open(&path_buf).map_err(|e| QuiltError::ImageLoad {
        path: path_buf,
        source: e,
    })?;
    let rgba = decoded.to_rgba8();

    let (width, height) = (rgba.width() as usize, rgba.height() as usize);
    let pixels = rgba
        .pixels()
        .map(|px| Rgba::new(px.0[0], px.0[1], px.0[2], px.0[3]))
        .collect();

    Image::from_pixels(width, height, pixels)
}

/// Save an image buffer as a PNG file
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written to the given path
pub fn export_png(image: &Image, path: &Path) -> crate::Result<()> {
    let mut out = ImageBuffer::new(image.width() as u32, image.height() as u32);

    for (x, y, slot) in out.enumerate_pixels_mut() {
        let px = image
            .get(x as usize, y as usize)
            .unwrap_or(Rgba::default());
        *slot = CodecRgba([px.r, px.g, px.b, px.a]);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| QuiltError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }
    }

    out.save(path).map_err(|e| QuiltError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })
}
