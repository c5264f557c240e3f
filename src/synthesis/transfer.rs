//! Transfer driver: constraint-biased multi-pass synthesis
//!
//! Re-renders a constraint image out of texture patches. Each pass runs a
//! full seam-cut quilt whose candidate cost blends boundary agreement with
//! closeness to the constraint; later passes raise the constraint weight and
//! shrink the patch size so detail tightens progressively.

use crate::io::configuration::{
    OVERLAP_DIVISOR, TRANSFER_ALPHA_BASE, TRANSFER_ALPHA_RANGE, TRANSFER_MIN_OVERLAP,
    TRANSFER_MIN_PATCH,
};
use crate::io::error::{invalid_parameter, QuiltError};
use crate::io::progress::TileProgress;
use crate::raster::{squared_difference, Coord, Image};
use crate::synthesis::quilt::{copy_patch, QuiltParams, Quilter};
use rand::rngs::StdRng;

/// Multi-pass texture transfer onto a constraint image
///
/// Composes the quilting core with a blended cost and its own seeding
/// strategy; the constraint sets the output dimensions.
pub struct Transfer<'a> {
    texture: &'a Image,
    constraint: &'a Image,
    samples: usize,
    workers: usize,
}

impl<'a> Transfer<'a> {
    /// Create a transfer driver for the given texture and constraint
    pub const fn new(
        texture: &'a Image,
        constraint: &'a Image,
        samples: usize,
        workers: usize,
    ) -> Self {
        Self {
            texture,
            constraint,
            samples,
            workers,
        }
    }

    /// Run up to `passes` transfer passes starting from `initial_patch`
    ///
    /// The patch size shrinks by a third each pass after the first; passes
    /// stop early once it falls to the minimum. The output's alpha channel is
    /// taken from the constraint pixel-for-pixel on the final write.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are inconsistent, the texture is
    /// smaller than the patch, or a pass fails
    pub fn synthesize(
        &self,
        initial_patch: usize,
        passes: usize,
        rng: StdRng,
        progress: Option<&TileProgress>,
    ) -> crate::Result<Image> {
        if passes == 0 {
            return Err(invalid_parameter(
                "depth",
                &passes,
                &"at least one transfer pass is required",
            ));
        }

        if initial_patch <= TRANSFER_MIN_OVERLAP {
            return Err(invalid_parameter(
                "patch-size",
                &initial_patch,
                &format!("transfer requires a patch larger than {TRANSFER_MIN_OVERLAP}"),
            ));
        }

        if self.constraint.width() == 0 || self.constraint.height() == 0 {
            return Err(invalid_parameter(
                "constraint",
                &format!("{}x{}", self.constraint.width(), self.constraint.height()),
                &"constraint dimensions must be positive",
            ));
        }

        let mut patch = initial_patch;
        let mut overlap = transfer_overlap(patch);
        let mut rng = rng;

        let mut output = Image::new(self.constraint.width(), self.constraint.height());
        let seed = self.seed_anchor(patch)?;
        copy_patch(&mut output, self.texture, Coord::new(0, 0), seed, patch);

        for pass in 0..passes {
            if pass > 0 {
                patch = patch * 2 / 3;
                if patch <= TRANSFER_MIN_PATCH {
                    break;
                }
                overlap = transfer_overlap(patch);
            }

            let alpha = if pass == 0 {
                TRANSFER_ALPHA_BASE
            } else {
                TRANSFER_ALPHA_RANGE * pass as f64 / (passes - 1) as f64 + TRANSFER_ALPHA_BASE
            };

            let params = QuiltParams {
                patch,
                overlap,
                samples: self.samples,
                workers: self.workers,
            };

            let mut quilter = Quilter::with_output(self.texture, output, params, rng)?;
            if let Some(progress) = progress {
                progress.start_pass(
                    quilter.tile_count() as u64,
                    &format!("transfer pass {}/{passes}", pass + 1),
                );
                quilter.set_progress(progress);
            }

            quilter.transfer_pass(self.constraint, alpha)?;
            (output, rng) = quilter.into_parts();
        }

        for (pixel, reference) in output.pixels_mut().iter_mut().zip(self.constraint.pixels()) {
            pixel.a = reference.a;
        }

        Ok(output)
    }

    /// Texture anchor seeding the top-left tile
    ///
    /// Scans for the patch minimizing total squared difference against the
    /// constraint's top-left pixel broadcast across the whole rectangle; the
    /// comparison deliberately uses that single pixel rather than the
    /// constraint's top-left patch. First minimum wins.
    ///
    /// # Errors
    ///
    /// Returns `TextureTooSmall` when the texture is smaller than the patch
    pub fn seed_anchor(&self, patch: usize) -> crate::Result<Coord> {
        if self.texture.width() < patch || self.texture.height() < patch {
            return Err(QuiltError::TextureTooSmall {
                width: self.texture.width(),
                height: self.texture.height(),
                patch,
            });
        }

        let reference = self.constraint.pixel(Coord::new(0, 0));
        let scan_width = (self.texture.width() - patch).max(1);
        let scan_height = (self.texture.height() - patch).max(1);

        let mut best_score = u64::MAX;
        let mut best = Coord::default();

        for x in 0..scan_width {
            for y in 0..scan_height {
                let anchor = Coord::new(x as i32, y as i32);
                let mut score = 0;

                for u in 0..patch {
                    for v in 0..patch {
                        let offset = Coord::new(u as i32, v as i32);
                        score += squared_difference(reference, self.texture.pixel(anchor + offset));
                    }
                }

                if score < best_score {
                    best_score = score;
                    best = anchor;
                }
            }
        }

        Ok(best)
    }
}

fn transfer_overlap(patch: usize) -> usize {
    (patch / OVERLAP_DIVISOR).max(TRANSFER_MIN_OVERLAP)
}
