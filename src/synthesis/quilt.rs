//! Quilting driver: parameterizes and runs the raster of tile placements

use crate::io::error::{invalid_parameter, QuiltError};
use crate::io::progress::TileProgress;
use crate::raster::{squared_difference, Coord, Image};
use crate::scheduler::{TileGrid, TileScheduler};
use crate::synthesis::mask::build_mask;
use crate::synthesis::matcher;
use ndarray::Array2;
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::Rng;

/// Patch placement strategy for tiles past the seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Uniformly random patches; boundary cost is ignored
    Random,
    /// Boundary-matched patches copied without a seam cut
    Simple,
    /// Boundary-matched patches blended along minimum-error seams
    Cut,
}

/// Geometry and sampling parameters of a synthesis run
#[derive(Debug, Clone, Copy)]
pub struct QuiltParams {
    /// Patch edge length in pixels
    pub patch: usize,
    /// Width of the overlap strip between adjacent patches
    pub overlap: usize,
    /// Number of candidate patches the sampler draws from
    pub samples: usize,
    /// Worker threads placing tiles
    pub workers: usize,
}

/// Synthesizes an output image by tiling overlapping texture patches
///
/// Owns the output buffer and the random stream; the texture (and, for
/// transfer, the constraint) are shared read-only. Matching reads the output
/// under a shared lock while the per-tile copy holds it exclusively, and the
/// scheduler's dependency ordering keeps concurrently processed tiles from
/// ever touching the same pixels.
pub struct Quilter<'a> {
    texture: &'a Image,
    output: RwLock<Image>,
    rng: Mutex<StdRng>,
    params: QuiltParams,
    width: usize,
    height: usize,
    chunk: usize,
    progress: Option<&'a TileProgress>,
}

impl<'a> Quilter<'a> {
    /// Create a quilter synthesizing a fresh `width x height` output
    ///
    /// # Errors
    ///
    /// Returns an error if the patch size does not exceed the overlap, the
    /// output dimensions are zero, or the texture is smaller than the patch
    pub fn new(
        texture: &'a Image,
        width: usize,
        height: usize,
        params: QuiltParams,
        rng: StdRng,
    ) -> crate::Result<Self> {
        Self::with_output(texture, Image::new(width, height), params, rng)
    }

    /// Create a quilter continuing onto an existing output buffer
    ///
    /// Used by the transfer driver, whose passes refine the same image with
    /// shrinking patch sizes.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`Quilter::new`]
    pub fn with_output(
        texture: &'a Image,
        output: Image,
        params: QuiltParams,
        rng: StdRng,
    ) -> crate::Result<Self> {
        let (width, height) = (output.width(), output.height());
        validate(texture, width, height, &params)?;

        Ok(Self {
            texture,
            output: RwLock::new(output),
            rng: Mutex::new(rng),
            params,
            width,
            height,
            chunk: params.patch - params.overlap,
            progress: None,
        })
    }

    /// Report per-tile progress to the given sink
    pub fn set_progress(&mut self, progress: &'a TileProgress) {
        self.progress = Some(progress);
    }

    /// Number of tiles a synthesis run will place
    pub fn tile_count(&self) -> usize {
        self.width.div_ceil(self.chunk) * self.height.div_ceil(self.chunk)
    }

    /// Run a full synthesis pass over the output
    ///
    /// The seed tile at the origin always receives a uniformly random patch;
    /// every other tile is placed according to `mode`.
    ///
    /// # Errors
    ///
    /// Returns the first tile placement error
    pub fn synthesize(&self, mode: Mode) -> crate::Result<()> {
        let grid = TileGrid::new(self.width, self.height, self.chunk)?;
        let scheduler = TileScheduler::new(grid);

        scheduler.run(self.params.workers, |tile| {
            let quxel = grid.anchor(tile);

            if tile.is_origin() || mode == Mode::Random {
                self.copy_unmasked(quxel, self.random_anchor());
            } else {
                let texel = self.match_boundary(quxel)?;

                match mode {
                    Mode::Simple => self.copy_unmasked(quxel, texel),
                    _ => {
                        let mask = self.cut_mask(quxel, texel);
                        self.copy_masked(quxel, texel, &mask);
                    }
                }
            }

            if let Some(progress) = self.progress {
                progress.tick();
            }

            Ok(())
        })
    }

    /// Consume the quilter and return the synthesized image
    pub fn into_output(self) -> Image {
        self.output.into_inner()
    }

    pub(crate) fn into_parts(self) -> (Image, StdRng) {
        (self.output.into_inner(), self.rng.into_inner())
    }

    // Transfer pass: every non-seed tile is matched with the blended
    // constraint cost and copied along its seams; the seed tile placed by the
    // transfer driver persists across passes
    pub(crate) fn transfer_pass(&self, constraint: &Image, alpha: f64) -> crate::Result<()> {
        let grid = TileGrid::new(self.width, self.height, self.chunk)?;
        let scheduler = TileScheduler::new(grid);

        scheduler.run(self.params.workers, |tile| {
            if !tile.is_origin() {
                let quxel = grid.anchor(tile);
                let texel = self.match_transfer(quxel, constraint, alpha)?;
                let mask = self.cut_mask(quxel, texel);
                self.copy_masked(quxel, texel, &mask);
            }

            if let Some(progress) = self.progress {
                progress.tick();
            }

            Ok(())
        })
    }

    fn match_boundary(&self, quxel: Coord) -> crate::Result<Coord> {
        let heap = {
            let output = self.output.read();
            matcher::k_best(
                self.texture.width(),
                self.texture.height(),
                self.params.patch,
                self.params.samples,
                |texel| self.overlap_cost(&output, quxel, texel),
            )?
        };

        let mut rng = self.rng.lock();
        matcher::sample(heap, &mut *rng)
    }

    fn match_transfer(
        &self,
        quxel: Coord,
        constraint: &Image,
        alpha: f64,
    ) -> crate::Result<Coord> {
        let heap = {
            let output = self.output.read();
            matcher::k_best(
                self.texture.width(),
                self.texture.height(),
                self.params.patch,
                self.params.samples,
                |texel| {
                    let overlap = self.overlap_cost(&output, quxel, texel);
                    let constraint_cost = matcher::tile_cost(
                        self.width,
                        self.height,
                        quxel,
                        self.params.patch,
                        |offset| {
                            squared_difference(
                                self.texture.pixel(texel + offset),
                                constraint.pixel(quxel + offset),
                            )
                        },
                    );

                    blend_cost(alpha, overlap, constraint_cost)
                },
            )?
        };

        let mut rng = self.rng.lock();
        matcher::sample(heap, &mut *rng)
    }

    fn overlap_cost(&self, output: &Image, quxel: Coord, texel: Coord) -> u64 {
        matcher::boundary_cost(
            self.width,
            self.height,
            quxel,
            self.params.patch,
            self.params.overlap,
            self.chunk,
            |offset| {
                squared_difference(
                    output.pixel(quxel + offset),
                    self.texture.pixel(texel + offset),
                )
            },
        )
    }

    fn cut_mask(&self, quxel: Coord, texel: Coord) -> Array2<u8> {
        let output = self.output.read();
        build_mask(
            &output,
            self.texture,
            quxel,
            texel,
            self.tile_boundary(quxel),
            self.params.patch,
            self.params.overlap,
            self.chunk,
        )
    }

    fn copy_unmasked(&self, quxel: Coord, texel: Coord) {
        let mut output = self.output.write();
        copy_patch(&mut output, self.texture, quxel, texel, self.params.patch);
    }

    fn copy_masked(&self, quxel: Coord, texel: Coord, mask: &Array2<u8>) {
        let mut output = self.output.write();
        copy_patch_masked(
            &mut output,
            self.texture,
            quxel,
            texel,
            self.params.patch,
            mask,
        );
    }

    fn random_anchor(&self) -> Coord {
        let span_x = (self.texture.width() - self.params.patch).max(1);
        let span_y = (self.texture.height() - self.params.patch).max(1);

        let mut rng = self.rng.lock();
        Coord::new(
            rng.random_range(0..span_x) as i32,
            rng.random_range(0..span_y) as i32,
        )
    }

    // Far corner of the tile, clipped one short of the image edge
    fn tile_boundary(&self, quxel: Coord) -> Coord {
        Coord::new(
            (self.width as i32 - 1).min(quxel.x + self.params.patch as i32),
            (self.height as i32 - 1).min(quxel.y + self.params.patch as i32),
        )
    }
}

fn validate(texture: &Image, width: usize, height: usize, params: &QuiltParams) -> crate::Result<()> {
    if params.patch <= params.overlap {
        return Err(invalid_parameter(
            "patch-size",
            &params.patch,
            &format!("must exceed the overlap width {}", params.overlap),
        ));
    }

    if width == 0 || height == 0 {
        return Err(invalid_parameter(
            "dimensions",
            &format!("{width}x{height}"),
            &"output dimensions must be positive",
        ));
    }

    if texture.width() < params.patch || texture.height() < params.patch {
        return Err(QuiltError::TextureTooSmall {
            width: texture.width(),
            height: texture.height(),
            patch: params.patch,
        });
    }

    Ok(())
}

// Weighted sum of the boundary and constraint terms, each rounded separately
fn blend_cost(alpha: f64, overlap: u64, constraint: u64) -> u64 {
    let weighted_overlap = (alpha * overlap as f64).round() as u64;
    let weighted_constraint = ((1.0 - alpha) * constraint as f64).round() as u64;

    weighted_overlap + weighted_constraint
}

// Copies the clipped patch rectangle from the texture into the output
pub(crate) fn copy_patch(
    output: &mut Image,
    texture: &Image,
    quxel: Coord,
    texel: Coord,
    patch: usize,
) {
    let max_x = (output.width() as i32).min(quxel.x + patch as i32);
    let max_y = (output.height() as i32).min(quxel.y + patch as i32);

    for i in 0..max_x - quxel.x {
        for j in 0..max_y - quxel.y {
            let offset = Coord::new(i, j);
            output.put_pixel(quxel + offset, texture.pixel(texel + offset));
        }
    }
}

// Masked variant: cells where the mask is zero keep the existing output pixel
pub(crate) fn copy_patch_masked(
    output: &mut Image,
    texture: &Image,
    quxel: Coord,
    texel: Coord,
    patch: usize,
    mask: &Array2<u8>,
) {
    let max_x = (output.width() as i32).min(quxel.x + patch as i32);
    let max_y = (output.height() as i32).min(quxel.y + patch as i32);

    for i in 0..max_x - quxel.x {
        for j in 0..max_y - quxel.y {
            if mask
                .get([i as usize, j as usize])
                .is_none_or(|&keep| keep == 0)
            {
                continue;
            }

            let offset = Coord::new(i, j);
            output.put_pixel(quxel + offset, texture.pixel(texel + offset));
        }
    }
}
