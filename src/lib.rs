// THEORY:
// This file is the entry point for the `pixel_image` library crate. It exposes a
// small, strongly typed model of raster data:
//
//   • `Pixel<L, T>`: one sample point, generic over its channel layout and its
//     sample representation, with overflow-safe arithmetic.
//   • `Image<L, T>`: an owned, strided grid of pixels with silent-default and
//     border-aware addressing.
//   • `ImageCodec`: the narrow boundary through which files are read and written.
//
// The internal modules live under `core_modules`; the types most callers need are
// re-exported here so downstream code does not have to spell out the module tree.

pub mod core_modules;
pub mod error;

pub use core_modules::border::{BorderMode, BorderType};
pub use core_modules::chunk::chunk::Chunk;
pub use core_modules::codec::{CodecSample, ImageCodec, RawImage, SampleDepth, SaveOptions};
pub use core_modules::image::Image;
pub use core_modules::layout::{Gray, Hls, Hsv, ImageFormat, Layout, Rgb, YCrCb};
pub use core_modules::numeric::{Arithmetic, Sample};
pub use core_modules::pixel::pixel::Pixel;
pub use core_modules::smart_pixel::smart_pixel::{abs_diff, blend_colors, l2_norm};
pub use core_modules::utils::image_helper::image_helper::{FileCodec, OutputFormat};
pub use error::{DecodeError, EncodeError, Error, Result};
