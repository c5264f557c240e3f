//! Input/output operations, command-line interface, and error handling

/// Command-line interface and run orchestration
pub mod cli;
/// Defaults and tuning constants
pub mod configuration;
/// Error types for synthesis operations
pub mod error;
/// PNG import and export
pub mod image;
/// Tile-level progress reporting
pub mod progress;
