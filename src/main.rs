//! CLI entry point for the image quilting synthesizer

use clap::Parser;
use seamquilt::io::cli::{Cli, SynthesisRunner};

fn main() -> seamquilt::Result<()> {
    let cli = Cli::parse();
    let runner = SynthesisRunner::new(cli);
    runner.run()
}
