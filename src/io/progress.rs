//! Tile-level progress reporting

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static TILE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {msg}: [{bar:40.cyan/blue}] {pos}/{len} tiles")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Progress display for tile placement, shared across worker threads
///
/// Transfer runs relabel the bar once per pass since the tile count changes
/// with the shrinking patch size. Disabled entirely in quiet mode.
pub struct TileProgress {
    bar: Option<ProgressBar>,
}

impl TileProgress {
    /// Create a progress sink; pass `false` to suppress all output
    pub fn new(enabled: bool) -> Self {
        let bar = enabled.then(|| {
            let bar = ProgressBar::new(0);
            bar.set_style(TILE_STYLE.clone());
            bar
        });

        Self { bar }
    }

    /// Begin a pass of `total` tiles under the given label
    pub fn start_pass(&self, total: u64, label: &str) {
        if let Some(bar) = &self.bar {
            bar.set_length(total);
            bar.set_position(0);
            bar.set_message(label.to_string());
        }
    }

    /// Record one completed tile
    pub fn tick(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    /// Clear the display
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
