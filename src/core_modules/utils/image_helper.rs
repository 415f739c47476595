pub mod image_helper {
    use std::fs::File;
    use std::io::{BufWriter, Write};
    use std::path::Path;

    use image::codecs::jpeg::JpegEncoder;
    use image::{DynamicImage, ImageBuffer, ImageFormat as FileFormat};
    use tracing::debug;

    use crate::core_modules::codec::{CodecSample, ImageCodec, RawImage, SampleDepth, SaveOptions};
    use crate::core_modules::numeric;
    use crate::error::{DecodeError, EncodeError};

    /// Codec backed by the `image` crate, routed by file extension on write.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct FileCodec;

    /// Output container picked from the file extension.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum OutputFormat {
        Bmp,
        Png,
        Jpeg,
        Pgm,
    }

    impl OutputFormat {
        /// Case-insensitive extension lookup.
        pub fn from_path(path: &Path) -> Option<Self> {
            let ext = path.extension()?.to_str()?.to_ascii_lowercase();
            match ext.as_str() {
                "bmp" => Some(Self::Bmp),
                "png" => Some(Self::Png),
                "jpg" | "jpeg" => Some(Self::Jpeg),
                "pgm" => Some(Self::Pgm),
                _ => None,
            }
        }

        pub fn name(self) -> &'static str {
            match self {
                Self::Bmp => "BMP",
                Self::Png => "PNG",
                Self::Jpeg => "JPEG",
                Self::Pgm => "PGM",
            }
        }
    }

    impl ImageCodec for FileCodec {
        fn decode<T: CodecSample>(&self, path: &Path) -> Result<RawImage<T>, DecodeError> {
            let image = image::open(path).map_err(|source| DecodeError::Image {
                path: path.to_path_buf(),
                source,
            })?;
            let channel_count = usize::from(image.color().channel_count());
            let (width, height) = (image.width(), image.height());
            debug!(path = %path.display(), width, height, channel_count, color = ?image.color(), "decoding file");

            let unsupported = || DecodeError::UnsupportedChannels {
                path: path.to_path_buf(),
                channels: channel_count,
            };
            let samples: Vec<T> = match T::DEPTH {
                SampleDepth::Eight => cast_all(samples_u8(&image, channel_count).ok_or_else(unsupported)?),
                SampleDepth::Sixteen => cast_all(samples_u16(&image, channel_count).ok_or_else(unsupported)?),
                SampleDepth::Float => cast_all(samples_f32(&image, channel_count).ok_or_else(unsupported)?),
            };

            Ok(RawImage {
                width,
                height,
                channel_count,
                samples,
            })
        }

        fn encode<T: CodecSample>(
            &self,
            path: &Path,
            raw: &RawImage<T>,
            options: &SaveOptions,
        ) -> Result<(), EncodeError> {
            if raw.width == 0 || raw.height == 0 {
                return Err(EncodeError::EmptyImage);
            }
            let format = OutputFormat::from_path(path).ok_or_else(|| EncodeError::UnsupportedExtension {
                path: path.to_path_buf(),
            })?;
            debug!(path = %path.display(), format = format.name(), channels = raw.channel_count, "routing encoder");

            match format {
                OutputFormat::Pgm => write_pgm(path, raw),
                OutputFormat::Png if T::DEPTH == SampleDepth::Sixteen => {
                    let samples = raw.samples.iter().map(|s| s.to_u16()).collect();
                    let image = dynamic_u16(raw.width, raw.height, raw.channel_count, samples, format)?;
                    save(&image, path, FileFormat::Png)
                }
                OutputFormat::Png | OutputFormat::Bmp => {
                    let samples = raw.samples.iter().map(|s| s.to_u8()).collect();
                    let image = dynamic_u8(raw.width, raw.height, raw.channel_count, samples, format)?;
                    let file_format = if format == OutputFormat::Png {
                        FileFormat::Png
                    } else {
                        FileFormat::Bmp
                    };
                    save(&image, path, file_format)
                }
                OutputFormat::Jpeg => write_jpeg(path, raw, options.quality),
            }
        }
    }

    fn cast_all<S: CodecSample, T: CodecSample>(samples: Vec<S>) -> Vec<T> {
        samples.into_iter().map(numeric::cast::<S, T>).collect()
    }

    fn samples_u8(image: &DynamicImage, channels: usize) -> Option<Vec<u8>> {
        Some(match channels {
            1 => image.to_luma8().into_raw(),
            2 => image.to_luma_alpha8().into_raw(),
            3 => image.to_rgb8().into_raw(),
            4 => image.to_rgba8().into_raw(),
            _ => return None,
        })
    }

    fn samples_u16(image: &DynamicImage, channels: usize) -> Option<Vec<u16>> {
        Some(match channels {
            1 => image.to_luma16().into_raw(),
            2 => image.to_luma_alpha16().into_raw(),
            3 => image.to_rgb16().into_raw(),
            4 => image.to_rgba16().into_raw(),
            _ => return None,
        })
    }

    fn samples_f32(image: &DynamicImage, channels: usize) -> Option<Vec<f32>> {
        Some(match channels {
            1 => image.to_luma32f().into_raw(),
            2 => image.to_luma_alpha32f().into_raw(),
            3 => image.to_rgb32f().into_raw(),
            4 => image.to_rgba32f().into_raw(),
            _ => return None,
        })
    }

    fn dynamic_u8(
        width: u32,
        height: u32,
        channels: usize,
        samples: Vec<u8>,
        format: OutputFormat,
    ) -> Result<DynamicImage, EncodeError> {
        let size = || EncodeError::BufferSize {
            width,
            height,
            channels,
        };
        Ok(match channels {
            1 => DynamicImage::ImageLuma8(ImageBuffer::from_raw(width, height, samples).ok_or_else(size)?),
            2 => DynamicImage::ImageLumaA8(ImageBuffer::from_raw(width, height, samples).ok_or_else(size)?),
            3 => DynamicImage::ImageRgb8(ImageBuffer::from_raw(width, height, samples).ok_or_else(size)?),
            4 => DynamicImage::ImageRgba8(ImageBuffer::from_raw(width, height, samples).ok_or_else(size)?),
            _ => {
                return Err(EncodeError::UnsupportedChannels {
                    format: format.name(),
                    channels,
                });
            }
        })
    }

    fn dynamic_u16(
        width: u32,
        height: u32,
        channels: usize,
        samples: Vec<u16>,
        format: OutputFormat,
    ) -> Result<DynamicImage, EncodeError> {
        let size = || EncodeError::BufferSize {
            width,
            height,
            channels,
        };
        Ok(match channels {
            1 => DynamicImage::ImageLuma16(ImageBuffer::from_raw(width, height, samples).ok_or_else(size)?),
            2 => DynamicImage::ImageLumaA16(ImageBuffer::from_raw(width, height, samples).ok_or_else(size)?),
            3 => DynamicImage::ImageRgb16(ImageBuffer::from_raw(width, height, samples).ok_or_else(size)?),
            4 => DynamicImage::ImageRgba16(ImageBuffer::from_raw(width, height, samples).ok_or_else(size)?),
            _ => {
                return Err(EncodeError::UnsupportedChannels {
                    format: format.name(),
                    channels,
                });
            }
        })
    }

    fn save(image: &DynamicImage, path: &Path, format: FileFormat) -> Result<(), EncodeError> {
        image
            .save_with_format(path, format)
            .map_err(|source| EncodeError::Image {
                path: path.to_path_buf(),
                source,
            })
    }

    /// JPEG carries no alpha: 2 channels become luma, 4 become RGB.
    fn write_jpeg<T: CodecSample>(path: &Path, raw: &RawImage<T>, quality: u8) -> Result<(), EncodeError> {
        let color = match raw.channel_count {
            1 | 2 => 1,
            3 | 4 => 3,
            channels => {
                return Err(EncodeError::UnsupportedChannels {
                    format: OutputFormat::Jpeg.name(),
                    channels,
                });
            }
        };
        let samples = raw
            .samples
            .chunks_exact(raw.channel_count)
            .flat_map(|pixel| pixel[..color].iter().map(|s| s.to_u8()))
            .collect();
        let image = dynamic_u8(raw.width, raw.height, color, samples, OutputFormat::Jpeg)?;

        let io_error = |source| EncodeError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
        let encoder = JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100));
        image
            .write_with_encoder(encoder)
            .map_err(|source| EncodeError::Image {
                path: path.to_path_buf(),
                source,
            })?;
        writer.flush().map_err(io_error)
    }

    /// Binary PGM: `P5\n<w> <h>\n<max>\n`, then 8-bit samples or 16-bit big-endian ones.
    fn write_pgm<T: CodecSample>(path: &Path, raw: &RawImage<T>) -> Result<(), EncodeError> {
        if raw.channel_count != 1 {
            return Err(EncodeError::UnsupportedChannels {
                format: OutputFormat::Pgm.name(),
                channels: raw.channel_count,
            });
        }
        let mut bytes = Vec::new();
        if T::DEPTH == SampleDepth::Sixteen {
            bytes.extend(format!("P5\n{} {}\n{}\n", raw.width, raw.height, T::MAX.to_u16()).bytes());
            bytes.extend(raw.samples.iter().flat_map(|s| s.to_u16().to_be_bytes()));
        } else {
            bytes.extend(format!("P5\n{} {}\n255\n", raw.width, raw.height).bytes());
            bytes.extend(raw.samples.iter().map(|s| s.to_u8()));
        }
        std::fs::write(path, bytes).map_err(|source| EncodeError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

}
