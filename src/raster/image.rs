//! Flat row-major RGBA image buffer with bounds-checked access

use crate::io::error::QuiltError;
use crate::raster::{Coord, Rgba};

/// An RGBA image stored as a flat row-major pixel buffer, origin top-left
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl Image {
    /// Create a transparent black image of the given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::default(); width * height],
        }
    }

    /// Create an image from an existing pixel buffer
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer length does not equal `width * height`
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgba>) -> crate::Result<Self> {
        if pixels.len() != width * height {
            return Err(crate::io::error::invalid_parameter(
                "pixels",
                &pixels.len(),
                &format!("buffer must hold exactly {} pixels", width * height),
            ));
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Image width in pixels
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Read the pixel at `(x, y)`
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` when `(x, y)` lies outside `[0, W) x [0, H)`
    pub fn get(&self, x: usize, y: usize) -> crate::Result<Rgba> {
        self.index(x, y)
            .and_then(|idx| self.pixels.get(idx).copied())
            .ok_or(QuiltError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
    }

    /// Write the pixel at `(x, y)`
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` when `(x, y)` lies outside `[0, W) x [0, H)`
    pub fn set(&mut self, x: usize, y: usize, pixel: Rgba) -> crate::Result<()> {
        let (width, height) = (self.width, self.height);
        self.index(x, y)
            .and_then(|idx| self.pixels.get_mut(idx))
            .map(|slot| *slot = pixel)
            .ok_or(QuiltError::OutOfBounds {
                x,
                y,
                width,
                height,
            })
    }

    /// Read-only view of the pixel buffer in row-major order
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Mutable view of the pixel buffer in row-major order
    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    // Unchecked-by-contract read for the hot loops; callers clip their
    // rectangles to the image bounds first
    pub(crate) fn pixel(&self, coord: Coord) -> Rgba {
        self.coord_index(coord)
            .and_then(|idx| self.pixels.get(idx).copied())
            .unwrap_or_default()
    }

    // Write counterpart of `pixel`; silently drops out-of-bounds writes
    pub(crate) fn put_pixel(&mut self, coord: Coord, pixel: Rgba) {
        if let Some(slot) = self
            .coord_index(coord)
            .and_then(|idx| self.pixels.get_mut(idx))
        {
            *slot = pixel;
        }
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| x + y * self.width)
    }

    fn coord_index(&self, coord: Coord) -> Option<usize> {
        if coord.x < 0 || coord.y < 0 {
            return None;
        }

        self.index(coord.x as usize, coord.y as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_round_trip() {
        let mut img = Image::new(4, 3);
        let px = Rgba::opaque(1, 2, 3);

        img.set(3, 2, px).unwrap();
        assert_eq!(img.get(3, 2).unwrap(), px);
    }

    #[test]
    fn test_out_of_bounds_access_fails() {
        let mut img = Image::new(4, 3);

        assert!(matches!(
            img.get(4, 0),
            Err(QuiltError::OutOfBounds { x: 4, y: 0, .. })
        ));
        assert!(matches!(
            img.set(0, 3, Rgba::default()),
            Err(QuiltError::OutOfBounds { x: 0, y: 3, .. })
        ));
    }

    #[test]
    fn test_from_pixels_rejects_wrong_length() {
        let result = Image::from_pixels(2, 2, vec![Rgba::default(); 3]);
        assert!(result.is_err());
    }

    #[test]
    fn test_new_image_is_transparent_black() {
        let img = Image::new(2, 2);
        assert!(img.pixels().iter().all(|&px| px == Rgba::default()));
    }
}
