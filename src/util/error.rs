//! Error types for pixelgrid.

use crate::pixel::{ColorSpace, PixelFormat};
use std::fmt;
use thiserror::Error;

/// Result alias for pixelgrid operations.
pub type PixelGridResult<T> = std::result::Result<T, PixelGridError>;

/// Format and extent of an image or view, as reported in mismatch errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub format: PixelFormat,
    pub width: usize,
    pub height: usize,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "color {}, depth {}, width {}, height {}",
            self.format.color_space(),
            self.format.channel_depth(),
            self.width,
            self.height
        )
    }
}

/// Errors that can occur when building, traversing or transforming images.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PixelGridError {
    /// Width or height is zero or too large to address.
    #[error("invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row step is smaller than the bytes needed for one row of pixels.
    #[error("invalid row step: row needs {row_bytes} bytes, row step is {row_step}")]
    InvalidRowStep { row_bytes: usize, row_step: usize },
    /// The supplied buffer is smaller than the declared layout.
    #[error("buffer too small: needed {needed} bytes, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A view rectangle does not fit inside its image.
    #[error(
        "view out of bounds: x={x}, y={y}, width={width}, height={height} in {img_width}x{img_height} image"
    )]
    ViewOutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// A single-pixel access fell outside the image.
    #[error("pixel ({x}, {y}) outside {width}x{height} image")]
    PixelOutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },
    /// The pixel type or value does not match the image format.
    #[error("{op}: expected format {expected}, got {got}")]
    FormatMismatch {
        op: &'static str,
        expected: PixelFormat,
        got: PixelFormat,
    },
    /// Source and destination layouts are incompatible for the operation.
    #[error("{op}: source format differs from destination format\nsource: {src}\ndestination: {dst}")]
    LayoutMismatch {
        op: &'static str,
        src: Layout,
        dst: Layout,
    },
    /// The operation is not implemented for this pixel format.
    #[error("{op}: unsupported format {format}")]
    UnsupportedFormat { op: &'static str, format: PixelFormat },
    /// The color space conversion is not implemented.
    #[error("{op}: unsupported color space conversion {from} -> {to}")]
    UnsupportedConversion {
        op: &'static str,
        from: ColorSpace,
        to: ColorSpace,
    },
    /// The input parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Decoding, encoding or file access failed.
    #[error("image I/O error: {reason}")]
    ImageIo { reason: String },
}
