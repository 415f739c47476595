// THEORY:
// File formats are not the core's business. The core only knows how to turn its
// pixel grid into a flat, interleaved run of samples (`RawImage`) and back; reading
// and writing those samples is delegated to an `ImageCodec`.
//
// The adapter methods on `Image` (`load_with`, `save_with` and their `FileCodec`
// shorthands) follow one rule: validate everything before touching the target.
// A decode that fails, or that produces a channel count the layout cannot hold,
// leaves the image exactly as it was.

use std::path::Path;

use tracing::{debug, warn};

use crate::core_modules::image::Image;
use crate::core_modules::layout::Layout;
use crate::core_modules::numeric::Sample;
use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::utils::image_helper::image_helper::FileCodec;
use crate::error::{DecodeError, EncodeError, Error, Result};

/// Interleaved samples as exchanged with a codec.
#[derive(Clone, Debug, PartialEq)]
pub struct RawImage<T> {
    pub width: u32,
    pub height: u32,
    pub channel_count: usize,
    pub samples: Vec<T>,
}

/// Bit depth a sample representation is read from and written to files with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleDepth {
    Eight,
    Sixteen,
    /// Normalised to `[0, 1]`.
    Float,
}

/// Sample representations a codec can move between files and images.
pub trait CodecSample: Sample {
    const DEPTH: SampleDepth;

    /// Rescales into the full 8-bit range.
    fn to_u8(self) -> u8;

    /// Rescales into the 16-bit range; only meaningful for `SampleDepth::Sixteen`.
    fn to_u16(self) -> u16;
}

impl CodecSample for u8 {
    const DEPTH: SampleDepth = SampleDepth::Eight;

    fn to_u8(self) -> u8 {
        self
    }

    fn to_u16(self) -> u16 {
        u16::from(self) * 257
    }
}

impl CodecSample for u16 {
    const DEPTH: SampleDepth = SampleDepth::Sixteen;

    fn to_u8(self) -> u8 {
        (self >> 8) as u8
    }

    fn to_u16(self) -> u16 {
        self
    }
}

impl CodecSample for i16 {
    const DEPTH: SampleDepth = SampleDepth::Sixteen;

    fn to_u8(self) -> u8 {
        (self.max(0) >> 7) as u8
    }

    fn to_u16(self) -> u16 {
        self.max(0) as u16
    }
}

impl CodecSample for f32 {
    const DEPTH: SampleDepth = SampleDepth::Float;

    fn to_u8(self) -> u8 {
        // `as` saturates and maps NaN to zero.
        (self * 255.0) as u8
    }

    fn to_u16(self) -> u16 {
        (self * 65535.0) as u16
    }
}

/// Encoder tunables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaveOptions {
    /// Write the alpha channel when the layout and the output format carry one.
    pub alpha: bool,
    /// JPEG quality in `1..=100`; other formats ignore it.
    pub quality: u8,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            alpha: true,
            quality: 100,
        }
    }
}

/// Reads and writes interleaved samples.
pub trait ImageCodec {
    fn decode<T: CodecSample>(&self, path: &Path) -> std::result::Result<RawImage<T>, DecodeError>;

    fn encode<T: CodecSample>(
        &self,
        path: &Path,
        raw: &RawImage<T>,
        options: &SaveOptions,
    ) -> std::result::Result<(), EncodeError>;
}

impl<L: Layout, T: Sample> Image<L, T> {
    /// Builds a compact image from interleaved samples.
    pub fn from_raw(raw: RawImage<T>) -> Result<Self> {
        let mut image = Self::new();
        image.assign_raw(raw)?;
        Ok(image)
    }

    /// Replaces the contents with `raw` once its shape has been validated.
    ///
    /// Accepts the layout's colour channels with or without a trailing alpha.
    pub fn assign_raw(&mut self, raw: RawImage<T>) -> Result<()> {
        let RawImage {
            width,
            height,
            channel_count,
            samples,
        } = raw;

        if channel_count < L::COLOR_CHANNELS || channel_count > L::COLOR_CHANNELS + 1 {
            warn!(format = %L::FORMAT, channel_count, "decoded channel layout rejected");
            return Err(Error::IncompatibleChannelLayout {
                format: L::FORMAT,
                channels: channel_count,
            });
        }

        let (width, height) = (width as usize, height as usize);
        let expected = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(channel_count));
        if expected != Some(samples.len()) {
            return Err(DecodeError::SampleCount {
                expected: expected.unwrap_or(usize::MAX),
                actual: samples.len(),
            }
            .into());
        }

        self.data = samples
            .chunks_exact(channel_count)
            .map(Pixel::from_interleaved)
            .collect();
        self.width = width;
        self.height = height;
        self.stride = width;
        self.channel_count = channel_count;
        Ok(())
    }

    /// Packs the visible pixels into interleaved samples.
    ///
    /// Alpha is included only when requested and the layout exchanges it. Fails
    /// with `DimensionsTooLarge` when a side does not fit the codec's `u32`.
    pub fn to_raw(&self, alpha: bool) -> Result<RawImage<T>> {
        let too_large = || EncodeError::DimensionsTooLarge {
            width: self.width,
            height: self.height,
        };
        let width = u32::try_from(self.width).map_err(|_| too_large())?;
        let height = u32::try_from(self.height).map_err(|_| too_large())?;
        let alpha = alpha && L::CODEC_ALPHA;
        let channel_count = L::COLOR_CHANNELS + usize::from(alpha);
        let mut samples = Vec::with_capacity(self.width * self.height * channel_count);
        for pixel in self.pixels() {
            pixel.write_interleaved(&mut samples, alpha);
        }
        Ok(RawImage {
            width,
            height,
            channel_count,
            samples,
        })
    }
}

impl<L: Layout, T: CodecSample> Image<L, T> {
    /// Decodes `path` with `codec` into this image.
    pub fn load_with<C: ImageCodec>(&mut self, codec: &C, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let raw = codec.decode::<T>(path)?;
        debug!(
            path = %path.display(),
            width = raw.width,
            height = raw.height,
            channels = raw.channel_count,
            "decoded image"
        );
        self.assign_raw(raw)
    }

    /// Decodes `path` with the built-in file codec.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.load_with(&FileCodec, path)
    }

    /// A new image decoded from `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut image = Self::new();
        image.load_from_file(path)?;
        Ok(image)
    }

    /// Encodes this image to `path` with `codec`.
    pub fn save_with<C: ImageCodec>(
        &self,
        codec: &C,
        path: impl AsRef<Path>,
        options: &SaveOptions,
    ) -> Result<()> {
        if self.is_empty() {
            return Err(EncodeError::EmptyImage.into());
        }
        let path = path.as_ref();
        let raw = self.to_raw(options.alpha)?;
        debug!(
            path = %path.display(),
            width = raw.width,
            height = raw.height,
            channels = raw.channel_count,
            "encoding image"
        );
        codec.encode(path, &raw, options)?;
        Ok(())
    }

    /// Encodes this image with the built-in file codec; the extension picks the format.
    pub fn save_to_file(&self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<()> {
        self.save_with(&FileCodec, path, options)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;

    use super::*;
    use crate::core_modules::layout::{Gray, Hsv, Rgb, YCrCb};
    use crate::core_modules::numeric;

    /// Serves a fixed 8-bit buffer and records what it is asked to write.
    struct MockCodec {
        source: Option<RawImage<u8>>,
        written: RefCell<Option<(PathBuf, RawImage<u8>, SaveOptions)>>,
    }

    impl MockCodec {
        fn serving(width: u32, height: u32, channel_count: usize, samples: Vec<u8>) -> Self {
            Self {
                source: Some(RawImage {
                    width,
                    height,
                    channel_count,
                    samples,
                }),
                written: RefCell::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                source: None,
                written: RefCell::new(None),
            }
        }
    }

    impl ImageCodec for MockCodec {
        fn decode<T: CodecSample>(&self, path: &Path) -> std::result::Result<RawImage<T>, DecodeError> {
            let source = self.source.as_ref().ok_or_else(|| DecodeError::UnsupportedChannels {
                path: path.to_path_buf(),
                channels: 0,
            })?;
            Ok(RawImage {
                width: source.width,
                height: source.height,
                channel_count: source.channel_count,
                samples: source.samples.iter().map(|&s| numeric::cast(s)).collect(),
            })
        }

        fn encode<T: CodecSample>(
            &self,
            path: &Path,
            raw: &RawImage<T>,
            options: &SaveOptions,
        ) -> std::result::Result<(), EncodeError> {
            let bytes = RawImage {
                width: raw.width,
                height: raw.height,
                channel_count: raw.channel_count,
                samples: raw.samples.iter().map(|s| s.to_u8()).collect(),
            };
            *self.written.borrow_mut() = Some((path.to_path_buf(), bytes, *options));
            Ok(())
        }
    }

    #[test]
    fn load_rgb_with_and_without_alpha() {
        let codec = MockCodec::serving(2, 1, 3, vec![1, 2, 3, 4, 5, 6]);
        let mut image = Image::<Rgb, u8>::new();
        image.load_with(&codec, "in.png").unwrap();
        assert_eq!((image.width(), image.height(), image.stride()), (2, 1, 2));
        assert_eq!(image.channel_count(), 3);
        assert_eq!(image.get_pixel(1, 0), Pixel::<Rgb, u8>::with_alpha(4, 5, 6, 255));

        let codec = MockCodec::serving(1, 1, 4, vec![9, 8, 7, 6]);
        image.load_with(&codec, "in.png").unwrap();
        assert_eq!(image.get_pixel(0, 0), Pixel::<Rgb, u8>::with_alpha(9, 8, 7, 6));
        assert_eq!(image.channel_count(), 4);
    }

    #[test]
    fn incompatible_channels_leave_the_image_untouched() {
        let mut image = Image::<Rgb, u8>::filled(1, 1, Pixel::<Rgb, u8>::new(1, 1, 1)).unwrap();
        let before = image.clone();
        for channels in [1, 2] {
            let codec = MockCodec::serving(1, 1, channels, vec![0; channels]);
            let err = image.load_with(&codec, "gray.png").unwrap_err();
            assert!(matches!(
                err,
                Error::IncompatibleChannelLayout { format: crate::core_modules::layout::ImageFormat::Rgb, .. }
            ));
        }
        let mut gray = Image::<Gray, u8>::new();
        let codec = MockCodec::serving(1, 1, 3, vec![0; 3]);
        assert!(gray.load_with(&codec, "rgb.png").is_err());
        assert!(gray.is_empty());
        assert_eq!(image, before);
    }

    #[test]
    fn decode_failure_is_surfaced() {
        let mut image = Image::<Gray, u8>::with_size(2, 2).unwrap();
        let err = image.load_with(&MockCodec::failing(), "missing.png").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert_eq!(image.width(), 2);
    }

    #[test]
    fn short_sample_buffer_is_rejected() {
        let raw = RawImage {
            width: 2,
            height: 2,
            channel_count: 1,
            samples: vec![0u8; 3],
        };
        let err = Image::<Gray, u8>::from_raw(raw).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::SampleCount { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn save_packs_only_visible_pixels() {
        let mut image = Image::<Gray, u8>::with_stride(2, 1, 5).unwrap();
        image.set_pixel(0, 0, Pixel::<Gray, u8>::with_alpha(10, 20));
        image.set_pixel(1, 0, Pixel::<Gray, u8>::with_alpha(30, 40));

        let codec = MockCodec::failing();
        image.save_with(&codec, "out.png", &SaveOptions::default()).unwrap();
        let (path, raw, _) = codec.written.borrow_mut().take().unwrap();
        assert_eq!(path, PathBuf::from("out.png"));
        assert_eq!((raw.channel_count, raw.samples), (2, vec![10, 20, 30, 40]));

        let options = SaveOptions {
            alpha: false,
            quality: 80,
        };
        image.save_with(&codec, "out.jpg", &options).unwrap();
        let (_, raw, seen) = codec.written.borrow_mut().take().unwrap();
        assert_eq!((raw.channel_count, raw.samples), (1, vec![10, 30]));
        assert_eq!(seen.quality, 80);
    }

    #[test]
    fn ycrcb_alpha_is_never_exchanged() {
        let codec = MockCodec::serving(1, 1, 4, vec![1, 2, 3, 4]);
        let mut image = Image::<YCrCb, u8>::new();
        image.load_with(&codec, "in.png").unwrap();
        assert_eq!(image.get_pixel(0, 0).alpha(), 255);
        assert_eq!(image.to_raw(true).unwrap().channel_count, 3);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn oversized_width_is_not_truncated() {
        let wide = Image::<Gray, u8>::with_size(u32::MAX as isize + 2, 0).unwrap();
        assert!(matches!(
            wide.to_raw(false),
            Err(Error::Encode(EncodeError::DimensionsTooLarge { height: 0, .. }))
        ));

        let small = Image::<Gray, u8>::with_size(2, 1).unwrap();
        let raw = small.to_raw(false).unwrap();
        assert_eq!((raw.width, raw.height, raw.samples.len()), (2, 1, 2));
    }

    #[test]
    fn hue_is_wrapped_on_load() {
        let raw = RawImage {
            width: 1,
            height: 1,
            channel_count: 3,
            samples: vec![400i16, 1, 2],
        };
        let image = Image::<Hsv, i16>::from_raw(raw).unwrap();
        assert_eq!(image.get_pixel(0, 0).h(), 40);
    }

    #[test]
    fn empty_image_is_not_encoded() {
        let image = Image::<Rgb, u8>::new();
        let err = image
            .save_with(&MockCodec::failing(), "out.png", &SaveOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Encode(EncodeError::EmptyImage)));
    }

    #[test]
    fn sixteen_bit_samples_rescale_to_eight_bits() {
        assert_eq!(u16::MAX.to_u8(), 255);
        assert_eq!(0x1234u16.to_u8(), 0x12);
        assert_eq!(i16::MAX.to_u8(), 255);
        assert_eq!((-5i16).to_u8(), 0);
        assert_eq!((-5i16).to_u16(), 0);
        assert_eq!(0.5f32.to_u8(), 127);
        assert_eq!(2.0f32.to_u8(), 255);
        assert_eq!(200u8.to_u16(), 200 * 257);
    }
}
