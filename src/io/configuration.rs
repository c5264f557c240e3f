//! Defaults and tuning constants for the synthesizer

/// Default patch edge length in pixels
pub const DEFAULT_PATCH_SIZE: usize = 18;

/// Default number of candidate patches the sampler draws from
pub const DEFAULT_SAMPLES: usize = 3;

/// Default synthesized output width in pixels
pub const DEFAULT_OUTPUT_WIDTH: usize = 384;

/// Default synthesized output height in pixels
pub const DEFAULT_OUTPUT_HEIGHT: usize = 384;

/// Default number of texture-transfer refinement passes
pub const DEFAULT_TRANSFER_PASSES: usize = 1;

/// Default synthesis method (3 = minimum-error boundary cut)
pub const DEFAULT_METHOD: u8 = 3;

/// Overlap width is the patch size divided by this when not given explicitly
pub const OVERLAP_DIVISOR: usize = 6;

/// Lower bound on the overlap width during texture transfer
pub const TRANSFER_MIN_OVERLAP: usize = 3;

/// Transfer passes stop once the shrinking patch size reaches this
pub const TRANSFER_MIN_PATCH: usize = 3;

/// Constraint-versus-overlap blend weight of the first transfer pass
pub const TRANSFER_ALPHA_BASE: f64 = 0.1;

/// Span of the blend weight across the remaining transfer passes
pub const TRANSFER_ALPHA_RANGE: f64 = 0.8;
