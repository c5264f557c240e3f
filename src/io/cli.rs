//! Command-line interface for the quilting synthesizer

use crate::io::configuration::{
    DEFAULT_METHOD, DEFAULT_OUTPUT_HEIGHT, DEFAULT_OUTPUT_WIDTH, DEFAULT_PATCH_SIZE,
    DEFAULT_SAMPLES, DEFAULT_TRANSFER_PASSES, OVERLAP_DIVISOR,
};
use crate::io::image::{export_png, import_rgba};
use crate::io::progress::TileProgress;
use crate::synthesis::{Mode, QuiltParams, Quilter, Transfer};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "seamquilt")]
#[command(
    author,
    version,
    about = "Synthesize textures by quilting overlapping patches along minimum-error seams"
)]
/// Command-line arguments for the synthesizer
pub struct Cli {
    /// Source texture image
    #[arg(short, long)]
    pub texture: PathBuf,

    /// Constraint image; enables texture transfer and sets the output size
    #[arg(short, long)]
    pub constraint: Option<PathBuf>,

    /// Output image path
    #[arg(short, long, default_value = "output.png")]
    pub outfile: PathBuf,

    /// Synthesis method: 1 = random, 2 = simple, 3 = cut
    #[arg(short, long, default_value_t = DEFAULT_METHOD, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub method: u8,

    /// Patch edge length in pixels
    #[arg(short, long, default_value_t = DEFAULT_PATCH_SIZE)]
    pub patch_size: usize,

    /// Overlap width in pixels; defaults to a sixth of the patch size
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Number of candidate patches sampled per tile
    #[arg(short, long, default_value_t = DEFAULT_SAMPLES)]
    pub samples: usize,

    /// Output width in pixels; ignored in transfer mode
    #[arg(short, long, default_value_t = DEFAULT_OUTPUT_WIDTH)]
    pub width: usize,

    /// Output height in pixels; ignored in transfer mode
    #[arg(short = 'H', long, default_value_t = DEFAULT_OUTPUT_HEIGHT)]
    pub height: usize,

    /// Number of transfer refinement passes
    #[arg(short, long, default_value_t = DEFAULT_TRANSFER_PASSES)]
    pub depth: usize,

    /// Random seed for reproducible synthesis
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads; defaults to the available hardware parallelism
    #[arg(long)]
    pub threads: Option<usize>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Placement mode selected by `--method`
    pub const fn mode(&self) -> Mode {
        match self.method {
            1 => Mode::Random,
            2 => Mode::Simple,
            _ => Mode::Cut,
        }
    }

    /// Overlap width, defaulting to a sixth of the patch size
    pub fn effective_overlap(&self) -> usize {
        self.overlap
            .unwrap_or(self.patch_size / OVERLAP_DIVISOR)
    }

    /// Worker thread count, defaulting to the available parallelism
    pub fn worker_count(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1)
        })
    }

    /// Random generator, seeded from `--seed` or OS entropy
    pub fn build_rng(&self) -> StdRng {
        self.seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
    }
}

/// Orchestrates a synthesis run: load inputs, synthesize, export
pub struct SynthesisRunner {
    cli: Cli,
}

impl SynthesisRunner {
    /// Create a runner from parsed CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Load the inputs, run the selected synthesis, and write the output
    ///
    /// # Errors
    ///
    /// Returns an error if an input image cannot be loaded, the parameters
    /// are inconsistent, synthesis fails, or the output cannot be written
    pub fn run(&self) -> crate::Result<()> {
        let texture = import_rgba(&self.cli.texture)?;
        let progress = TileProgress::new(!self.cli.quiet);
        let rng = self.cli.build_rng();
        let workers = self.cli.worker_count();

        let output = if let Some(constraint_path) = &self.cli.constraint {
            let constraint = import_rgba(constraint_path)?;
            let transfer = Transfer::new(&texture, &constraint, self.cli.samples, workers);
            transfer.synthesize(self.cli.patch_size, self.cli.depth, rng, Some(&progress))?
        } else {
            let params = QuiltParams {
                patch: self.cli.patch_size,
                overlap: self.cli.effective_overlap(),
                samples: self.cli.samples,
                workers,
            };

            let mut quilter = Quilter::new(&texture, self.cli.width, self.cli.height, params, rng)?;
            progress.start_pass(quilter.tile_count() as u64, "synthesizing");
            quilter.set_progress(&progress);
            quilter.synthesize(self.cli.mode())?;
            quilter.into_output()
        };

        progress.finish();
        export_png(&output, &self.cli.outfile)
    }
}
