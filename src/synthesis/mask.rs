//! Copy-mask construction from overlap seams
//!
//! Turns the vertical and horizontal seams of a placed patch into a `P x P`
//! bitmap: 1 keeps the texture pixel, 0 preserves what the output already
//! holds. Pixels on the near side of each seam are erased so the patch blends
//! into its neighbors along the minimum-error cut.

use crate::raster::{Coord, Image};
use crate::synthesis::seam::{find_seam, Orientation};
use ndarray::Array2;

/// Build the copy mask for a patch placed at `quxel` from texture anchor
/// `texel`
///
/// `boundary` is the clipped far corner of the tile in the output image. When
/// the tile has a left neighbor, everything left of (and on) the vertical seam
/// is erased; when it has a top neighbor, everything above (and on) the
/// horizontal seam is erased. The two erasures overlap naturally in the
/// corner.
pub fn build_mask(
    quilt: &Image,
    texture: &Image,
    quxel: Coord,
    texel: Coord,
    boundary: Coord,
    patch: usize,
    overlap: usize,
    chunk: usize,
) -> Array2<u8> {
    let mut mask = Array2::<u8>::from_elem((patch, patch), 1);
    let delta = boundary - quxel;

    if quxel.x >= chunk as i32 {
        let strip = Coord::new(overlap as i32, delta.y);
        for point in find_seam(quilt, texture, quxel, texel, strip, Orientation::Vertical) {
            for i in 0..=point.x {
                if let Some(cell) = mask.get_mut([i as usize, point.y as usize]) {
                    *cell = 0;
                }
            }
        }
    }

    if quxel.y >= chunk as i32 {
        let strip = Coord::new(delta.x, overlap as i32);
        for point in find_seam(quilt, texture, quxel, texel, strip, Orientation::Horizontal) {
            for j in 0..=point.y {
                if let Some(cell) = mask.get_mut([point.x as usize, j as usize]) {
                    *cell = 0;
                }
            }
        }
    }

    mask
}
