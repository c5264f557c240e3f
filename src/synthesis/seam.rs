//! Minimum-energy seam search along overlap strips
//!
//! A dynamic program over the squared-difference energy of the overlap
//! rectangle between the output and a candidate texture patch. The path moves
//! one row at a time and may shift at most one column per step; horizontal
//! seams run the same program on the transposed rectangle.

use crate::raster::{squared_difference, Coord, Image};
use ndarray::Array2;

/// Direction of the overlap strip a seam cuts through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Seam runs top to bottom through a left-edge overlap
    Vertical,
    /// Seam runs left to right through a top-edge overlap
    Horizontal,
}

/// Find the minimum-energy seam through an overlap rectangle
///
/// `quxel` anchors the rectangle in the output image, `texel` anchors it in
/// the texture, and `overlap` is its size. The rectangle is clamped to the
/// output bounds before sizing. Returns one coordinate per row of the strip's
/// long axis, ordered along that axis; horizontal seams return transposed
/// coordinates. Degenerate rectangles yield an empty seam.
///
/// A predecessor one column to the left is only admissible from column 2
/// onward, so column 0 can never feed the seam from the left branch; it can
/// only be entered from column 1 and never left again.
pub fn find_seam(
    quilt: &Image,
    texture: &Image,
    quxel: Coord,
    texel: Coord,
    overlap: Coord,
    orientation: Orientation,
) -> Vec<Coord> {
    let mut max_quxel = quxel + overlap;
    max_quxel.x = max_quxel.x.min(quilt.width() as i32);
    max_quxel.y = max_quxel.y.min(quilt.height() as i32);

    let (seam_height, seam_width) = match orientation {
        Orientation::Vertical => (max_quxel.y - quxel.y, max_quxel.x - quxel.x),
        Orientation::Horizontal => (max_quxel.x - quxel.x, max_quxel.y - quxel.y),
    };

    if seam_height <= 0 || seam_width <= 0 {
        return Vec::new();
    }

    let (seam_height, seam_width) = (seam_height as usize, seam_width as usize);

    let mut energy = Array2::<u64>::zeros((seam_height, seam_width));
    for i in 0..seam_height {
        for j in 0..seam_width {
            let offset = strip_coord(orientation, i, j);
            energy[[i, j]] =
                squared_difference(quilt.pixel(quxel + offset), texture.pixel(texel + offset));
        }
    }

    let mut cost = Array2::<u64>::zeros((seam_height, seam_width));
    let mut parent = Array2::<usize>::zeros((seam_height, seam_width));

    for j in 0..seam_width {
        cost[[0, j]] = energy[[0, j]];
    }

    for i in 1..seam_height {
        for j in 0..seam_width {
            let mut best = cost[[i - 1, j]];
            let mut from = j;

            // Left predecessor admissible only beyond column 1
            if j > 1 && cost[[i - 1, j - 1]] < best {
                best = cost[[i - 1, j - 1]];
                from = j - 1;
            }

            if j + 1 < seam_width && cost[[i - 1, j + 1]] < best {
                best = cost[[i - 1, j + 1]];
                from = j + 1;
            }

            cost[[i, j]] = best + energy[[i, j]];
            parent[[i, j]] = from;
        }
    }

    let last = seam_height - 1;
    // First minimum wins on ties
    let mut column = 0;
    for j in 1..seam_width {
        if cost[[last, j]] < cost[[last, column]] {
            column = j;
        }
    }

    let mut seam = vec![Coord::default(); seam_height];
    seam[last] = strip_coord(orientation, last, column);

    for i in (0..last).rev() {
        column = parent[[i + 1, column]];
        seam[i] = strip_coord(orientation, i, column);
    }

    seam
}

// Maps (row-along-long-axis, column-across-strip) back into patch offsets
const fn strip_coord(orientation: Orientation, i: usize, j: usize) -> Coord {
    match orientation {
        Orientation::Vertical => Coord::new(j as i32, i as i32),
        Orientation::Horizontal => Coord::new(i as i32, j as i32),
    }
}
