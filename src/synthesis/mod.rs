//! Patch matching, seam carving, and the synthesis drivers
//!
//! The quilting driver places texture patches on a tile grid, the matcher
//! scores candidate anchors against the already-placed boundary, the seam
//! carver finds the minimum-energy cut through each overlap strip, and the
//! mask builder turns those cuts into a per-patch copy mask. The transfer
//! driver composes the same core with a constraint-biased cost.

/// Mask construction from overlap seams
pub mod mask;
/// K-best candidate scan over the texture
pub mod matcher;
/// Minimum-energy seam search along overlap strips
pub mod seam;
/// Transfer driver: constraint-biased multi-pass synthesis
pub mod transfer;

mod quilt;

pub use quilt::{Mode, QuiltParams, Quilter};
pub use transfer::Transfer;
