//! Error types for the watermark-autoplace crate.

use std::path::PathBuf;

/// Errors that can occur while placing a watermark.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to load the base or overlay image from disk.
    #[error("failed to load image {}: {source}", path.display())]
    Load {
        /// Path that could not be loaded.
        path: PathBuf,
        /// Underlying decode error.
        source: image::ImageError,
    },

    /// The overlay image carries no alpha channel, so it cannot be blended.
    #[error("overlay {} has no alpha channel", path.display())]
    MissingAlpha {
        /// Path of the offending overlay.
        path: PathBuf,
    },

    /// An image (or the watermark derived from it) has a zero dimension.
    #[error("image is empty ({width}x{height})")]
    EmptyImage {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// The clamped placement rectangle lies entirely outside the base image.
    #[error("placement ({top},{left})..({bottom},{right}) lies outside the {width}x{height} image")]
    PlacementOutsideImage {
        /// Top row of the rejected rectangle.
        top: i64,
        /// Left column of the rejected rectangle.
        left: i64,
        /// Bottom row (exclusive) of the rejected rectangle.
        bottom: i64,
        /// Right column (exclusive) of the rejected rectangle.
        right: i64,
        /// Base image width in pixels.
        width: u32,
        /// Base image height in pixels.
        height: u32,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unsupported = Error::UnsupportedFormat("tiff".to_string());
        assert!(unsupported.to_string().contains("tiff"));

        let no_alpha = Error::MissingAlpha {
            path: Path::new("mark.jpg").to_path_buf(),
        };
        assert!(no_alpha.to_string().contains("mark.jpg"));
        assert!(no_alpha.to_string().contains("alpha"));

        let empty = Error::EmptyImage {
            width: 0,
            height: 40,
        };
        assert!(empty.to_string().contains("0x40"));
    }

    #[test]
    fn placement_error_reports_geometry() {
        let err = Error::PlacementOutsideImage {
            top: 700,
            left: 900,
            bottom: 760,
            right: 960,
            width: 640,
            height: 480,
        };
        let msg = err.to_string();
        assert!(msg.contains("(700,900)"));
        assert!(msg.contains("640x480"));
    }
}
