//! Error types for synthesis operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all synthesis operations
#[derive(Debug)]
pub enum QuiltError {
    /// Failed to load an input image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// Failed to save the synthesized image to disk
    ImageExport {
        /// Path where the export was attempted
        path: PathBuf,
        /// Underlying image encoding error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Texture smaller than the patch size in at least one dimension
    TextureTooSmall {
        /// Texture width in pixels
        width: usize,
        /// Texture height in pixels
        height: usize,
        /// Requested patch size
        patch: usize,
    },

    /// Pixel access outside the image bounds
    OutOfBounds {
        /// Requested column
        x: usize,
        /// Requested row
        y: usize,
        /// Image width
        width: usize,
        /// Image height
        height: usize,
    },

    /// Invariant violation inside the synthesis pipeline; fatal
    Internal {
        /// Description of the violated invariant
        reason: String,
    },
}

impl fmt::Display for QuiltError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::TextureTooSmall {
                width,
                height,
                patch,
            } => {
                write!(
                    f,
                    "Texture {width}x{height} is smaller than the {patch}x{patch} patch size"
                )
            }
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => {
                write!(
                    f,
                    "Pixel access ({x}, {y}) is outside the {width}x{height} image"
                )
            }
            Self::Internal { reason } => {
                write!(f, "Internal invariant violation: {reason}")
            }
        }
    }
}

impl std::error::Error for QuiltError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for synthesis results
pub type Result<T> = std::result::Result<T, QuiltError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> QuiltError {
    QuiltError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an internal invariant-violation error
pub fn internal(reason: impl Into<String>) -> QuiltError {
    QuiltError::Internal {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_parameter_context() {
        let err = invalid_parameter("patch-size", &4, &"must exceed the overlap width");

        assert_eq!(
            err.to_string(),
            "Invalid parameter 'patch-size' = '4': must exceed the overlap width"
        );
    }

    #[test]
    fn test_display_formats_texture_dimensions() {
        let err = QuiltError::TextureTooSmall {
            width: 10,
            height: 20,
            patch: 16,
        };

        assert_eq!(
            err.to_string(),
            "Texture 10x20 is smaller than the 16x16 patch size"
        );
    }
}
