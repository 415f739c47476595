//! Error types for pixel_image.

use std::path::PathBuf;

use thiserror::Error;

use crate::core_modules::layout::ImageFormat;

/// Main error type for the pixel_image library.
#[derive(Error, Debug)]
pub enum Error {
    /// Negative dimensions, a stride below the width, or a buffer too large to address.
    #[error("invalid image dimensions {width}x{height} (stride {stride})")]
    InvalidDimensions {
        width: isize,
        height: isize,
        stride: isize,
    },

    /// Two images (or an image and a pixel vector) disagree on size.
    #[error("dimension mismatch: expected (width, height) {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Strict access outside the image.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: isize,
        y: isize,
        width: usize,
        height: usize,
    },

    /// A decoded image cannot populate the target layout.
    #[error("{channels} channel(s) are not compatible with the {format} image format")]
    IncompatibleChannelLayout { format: ImageFormat, channels: usize },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Failures reported by a codec while reading.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to load image from {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("decoded {path} has {channels} channel(s); expected 1 to 4")]
    UnsupportedChannels { path: PathBuf, channels: usize },

    #[error("decoded buffer holds {actual} samples; expected {expected}")]
    SampleCount { expected: usize, actual: usize },
}

/// Failures reported by a codec while writing.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("failed to save image to {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension for {path}")]
    UnsupportedExtension { path: PathBuf },

    #[error("{format} output cannot hold {channels} channel(s)")]
    UnsupportedChannels {
        format: &'static str,
        channels: usize,
    },

    #[error("cannot encode an empty image")]
    EmptyImage,

    #[error("{width}x{height} image does not fit u32 codec dimensions")]
    DimensionsTooLarge {
        width: usize,
        height: usize,
    },

    #[error("sample buffer does not match {width}x{height}x{channels}")]
    BufferSize {
        width: u32,
        height: u32,
        channels: usize,
    },
}

/// Result type alias for pixel_image operations.
pub type Result<T> = std::result::Result<T, Error>;
