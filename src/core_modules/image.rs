// THEORY:
// The `Image` is the owner and operator of a rectangular grid of `Pixel`s. It holds
// one flat, exclusively owned buffer of `stride * height` pixels; `stride` may be
// larger than `width`, in which case the tail of every row is padding that is never
// read, copied or compared.
//
// Key architectural principles:
// 1.  **Two States**: An image is either empty (zero dimensions, no pixels) or
//     allocated. `create` is the only transition and it always replaces the whole
//     buffer; shape validation happens before anything is released, so a failed
//     `create` leaves the previous image untouched.
// 2.  **Silent Defaults**: Routine addressing never fails. Out-of-range reads
//     return the default pixel and out-of-range writes are dropped. Callers who want
//     to catch mistakes use the `try_*` accessors instead.
// 3.  **Border Policy Is a Value**: Extrapolated reads take a `BorderMode` by
//     reference and resolve coordinates through `border::{reflect_index,
//     replicate_index}` before falling back to the silent-default read.
// 4.  **Ownership**: `Clone` deep-copies the buffer; `take` moves it out and leaves
//     an empty image behind.

use std::fmt;
use std::mem;

use tracing::debug;

use crate::core_modules::border::{reflect_index, replicate_index, BorderMode, BorderType};
use crate::core_modules::chunk::chunk::Chunk;
use crate::core_modules::layout::{ImageFormat, Layout};
use crate::core_modules::numeric::{Arithmetic, Sample};
use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::smart_pixel::smart_pixel;
use crate::error::{Error, Result};

/// Owned, strided 2-D buffer of `Pixel<L, T>`.
#[derive(Clone)]
pub struct Image<L: Layout, T: Sample> {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) stride: usize,
    pub(crate) channel_count: usize,
    pub(crate) data: Vec<Pixel<L, T>>,
}

/// Checks a requested shape and resolves `stride == 0` to `width`.
fn validate_shape<L: Layout, T: Sample>(
    width: isize,
    height: isize,
    stride: isize,
) -> Result<(usize, usize, usize)> {
    let invalid = || Error::InvalidDimensions {
        width,
        height,
        stride,
    };
    if width < 0 || height < 0 || stride < 0 {
        return Err(invalid());
    }
    let resolved = if stride == 0 { width } else { stride };
    if resolved < width {
        return Err(invalid());
    }
    let (width, height, stride) = (width as usize, height as usize, resolved as usize);
    let bytes = stride
        .checked_mul(height)
        .and_then(|len| len.checked_mul(mem::size_of::<Pixel<L, T>>()))
        .ok_or_else(invalid)?;
    if bytes > isize::MAX as usize {
        return Err(invalid());
    }
    Ok((width, height, stride))
}

impl<L: Layout, T: Sample> Default for Image<L, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Layout, T: Sample> Image<L, T> {
    /// An empty image with no buffer.
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            stride: 0,
            channel_count: L::FORMAT.channel_count(),
            data: Vec::new(),
        }
    }

    /// A `width x height` image of default pixels.
    pub fn with_size(width: isize, height: isize) -> Result<Self> {
        Self::with_stride(width, height, 0)
    }

    /// Like `with_size`, with an explicit row pitch (0 means `width`).
    pub fn with_stride(width: isize, height: isize, stride: isize) -> Result<Self> {
        let mut image = Self::new();
        image.create(width, height, stride)?;
        Ok(image)
    }

    /// A `width x height` image with every cell set to `fill`.
    pub fn filled(width: isize, height: isize, fill: Pixel<L, T>) -> Result<Self> {
        let mut image = Self::new();
        image.create_filled(width, height, 0, fill)?;
        Ok(image)
    }

    /// Wraps row-major pixels with `stride == width`.
    ///
    /// A vector of the wrong length is reported as `DimensionMismatch` with
    /// `actual = (pixels.len(), 1)`.
    pub fn from_pixels(width: isize, height: isize, pixels: Vec<Pixel<L, T>>) -> Result<Self> {
        let (width, height, stride) = validate_shape::<L, T>(width, height, 0)?;
        if pixels.len() != width * height {
            return Err(Error::DimensionMismatch {
                expected: (width, height),
                actual: (pixels.len(), 1),
            });
        }
        Ok(Self {
            width,
            height,
            stride,
            channel_count: L::FORMAT.channel_count(),
            data: pixels,
        })
    }

    /// Reallocates to `stride * height` default pixels, discarding the old buffer.
    pub fn create(&mut self, width: isize, height: isize, stride: isize) -> Result<()> {
        self.create_filled(width, height, stride, Pixel::default())
    }

    /// Reallocates to `stride * height` copies of `fill`, discarding the old buffer.
    pub fn create_filled(
        &mut self,
        width: isize,
        height: isize,
        stride: isize,
        fill: Pixel<L, T>,
    ) -> Result<()> {
        let (width, height, stride) = validate_shape::<L, T>(width, height, stride)?;
        debug!(%width, %height, %stride, format = %L::FORMAT, "allocating image buffer");
        self.data = vec![fill; stride * height];
        self.width = width;
        self.height = height;
        self.stride = stride;
        self.channel_count = L::FORMAT.channel_count();
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row pitch in pixels.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Interleaved component count used at the codec boundary.
    ///
    /// The layout's constant, or the source file's channel count after a load.
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    #[inline]
    pub fn format(&self) -> ImageFormat {
        L::FORMAT
    }

    /// True when the image holds no addressable pixel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The whole strided buffer, padding included.
    #[inline]
    pub fn as_raw(&self) -> &[Pixel<L, T>] {
        &self.data
    }

    /// Moves the buffer out, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    #[inline]
    fn index_of(&self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| y * self.stride + x)
    }

    /// Logical row-major index to buffer offset; never lands in padding.
    #[inline]
    fn linear_index_of(&self, index: isize) -> Option<usize> {
        if index < 0 || (index as usize) >= self.width * self.height {
            return None;
        }
        let index = index as usize;
        Some((index / self.width) * self.stride + index % self.width)
    }

    /// Writes `pixel` at `(x, y)`; out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: isize, y: isize, pixel: Pixel<L, T>) {
        if let Some(i) = self.index_of(x, y) {
            self.data[i] = pixel;
        }
    }

    /// Writes `pixel` at logical row-major `index`; out-of-range writes are ignored.
    pub fn set_pixel_at(&mut self, index: isize, pixel: Pixel<L, T>) {
        if let Some(i) = self.linear_index_of(index) {
            self.data[i] = pixel;
        }
    }

    /// Reads `(x, y)`, or the default pixel when out of range.
    pub fn get_pixel(&self, x: isize, y: isize) -> Pixel<L, T> {
        self.index_of(x, y)
            .map(|i| self.data[i])
            .unwrap_or_default()
    }

    /// Reads logical row-major `index`, or the default pixel when out of range.
    pub fn get_pixel_at(&self, index: isize) -> Pixel<L, T> {
        self.linear_index_of(index)
            .map(|i| self.data[i])
            .unwrap_or_default()
    }

    /// Reads `(x, y)`, or reports `OutOfBounds`.
    pub fn try_get_pixel(&self, x: isize, y: isize) -> Result<Pixel<L, T>> {
        self.index_of(x, y)
            .map(|i| self.data[i])
            .ok_or_else(|| self.out_of_bounds(x, y))
    }

    /// Writes `(x, y)`, or reports `OutOfBounds` without touching the buffer.
    pub fn try_set_pixel(&mut self, x: isize, y: isize, pixel: Pixel<L, T>) -> Result<()> {
        let i = self.index_of(x, y).ok_or_else(|| self.out_of_bounds(x, y))?;
        self.data[i] = pixel;
        Ok(())
    }

    fn out_of_bounds(&self, x: isize, y: isize) -> Error {
        Error::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// Reads `(x, y)`, extrapolating out-of-range coordinates with `border_mode`.
    ///
    /// Reflection is applied once per axis; coordinates it cannot bring back into
    /// range, and any read from an empty image, yield the default pixel.
    pub fn get_pixel_with_border(
        &self,
        x: isize,
        y: isize,
        border_mode: &BorderMode<L, T>,
    ) -> Pixel<L, T> {
        if let Some(i) = self.index_of(x, y) {
            return self.data[i];
        }
        let (width, height) = (self.width as isize, self.height as isize);
        match border_mode.border_type {
            BorderType::Constant => border_mode.border_pixel,
            BorderType::Replicate => {
                self.get_pixel(replicate_index(x, width), replicate_index(y, height))
            }
            BorderType::Reflect => self.get_pixel(reflect_index(x, width), reflect_index(y, height)),
        }
    }

    /// Copies every pixel of `source`, which must have the same width and height.
    ///
    /// Matching strides copy the buffer in one go; otherwise only the `width`
    /// visible pixels of each row are copied and padding is left as it was.
    pub fn copy_from(&mut self, source: &Image<L, T>) -> Result<()> {
        self.check_same_size(source)?;
        if self.stride == source.stride {
            self.data.copy_from_slice(&source.data);
        } else {
            for (dst, src) in self.rows_mut().zip(source.rows()) {
                dst.copy_from_slice(src);
            }
        }
        Ok(())
    }

    fn check_same_size(&self, other: &Image<L, T>) -> Result<()> {
        if (self.width, self.height) != (other.width, other.height) {
            return Err(Error::DimensionMismatch {
                expected: (self.width, self.height),
                actual: (other.width, other.height),
            });
        }
        Ok(())
    }

    /// Visible part of row `y`, or `None` past the last row.
    #[inline]
    pub fn row(&self, y: usize) -> Option<&[Pixel<L, T>]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        Some(&self.data[start..start + self.width])
    }

    /// Mutable visible part of row `y`, or `None` past the last row.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [Pixel<L, T>]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        Some(&mut self.data[start..start + self.width])
    }

    /// Visible rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Pixel<L, T>]> + '_ {
        let width = self.width;
        self.data
            .chunks(self.stride.max(1))
            .map(move |row| &row[..width])
    }

    /// Mutable visible rows, top to bottom.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [Pixel<L, T>]> + '_ {
        let width = self.width;
        self.data
            .chunks_mut(self.stride.max(1))
            .map(move |row| &mut row[..width])
    }

    /// Every visible pixel in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel<L, T>> + '_ {
        self.rows().flat_map(|row| row.iter().copied())
    }

    /// Borrows the `width x height` rectangle at `(x, y)` without copying.
    pub fn chunk(&self, x: usize, y: usize, width: usize, height: usize) -> Option<Chunk<'_, L, T>> {
        let fits_x = x.checked_add(width).is_some_and(|end| end <= self.width);
        let fits_y = y.checked_add(height).is_some_and(|end| end <= self.height);
        if !fits_x || !fits_y {
            return None;
        }
        let pixels = if width == 0 || height == 0 {
            &self.data[..0]
        } else {
            let start = y * self.stride + x;
            &self.data[start..start + (height - 1) * self.stride + width]
        };
        Some(Chunk::new(width, height, self.stride, pixels))
    }

    // ===========================Pixel-wise arithmetic============================

    /// Builds a compact image (`stride == width`) from `func` applied to every pixel.
    pub fn map<U, F>(&self, func: F) -> Image<L, U>
    where
        U: Sample,
        F: FnMut(Pixel<L, T>) -> Pixel<L, U>,
    {
        Image {
            width: self.width,
            height: self.height,
            stride: self.width,
            channel_count: self.channel_count,
            data: self.pixels().map(func).collect(),
        }
    }

    /// Same layout, different representation; every channel is clamp-cast.
    pub fn cast<U: Sample>(&self) -> Image<L, U> {
        self.map(|pixel| pixel.cast())
    }

    /// `self += other * coeff` pixel by pixel.
    pub fn mac<C: Arithmetic>(&mut self, other: &Image<L, T>, coeff: C) -> Result<()> {
        self.check_same_size(other)?;
        for (dst, src) in self.rows_mut().zip(other.rows()) {
            for (d, s) in dst.iter_mut().zip(src) {
                d.mac(s, coeff);
            }
        }
        Ok(())
    }

    /// Multiplies every visible pixel by `coeff`.
    pub fn scale<C: Arithmetic>(&mut self, coeff: C) {
        for row in self.rows_mut() {
            for pixel in row {
                *pixel = *pixel * coeff;
            }
        }
    }

    /// Per-pixel absolute difference.
    pub fn abs_diff(&self, other: &Image<L, T>) -> Result<Image<L, T>> {
        self.zip_map(other, |a, b| smart_pixel::abs_diff(&a, &b))
    }

    /// Per-pixel `self * weight + other * (1 - weight)`.
    pub fn blend(&self, other: &Image<L, T>, weight: f32) -> Result<Image<L, T>> {
        self.zip_map(other, |a, b| smart_pixel::blend_colors(&a, &b, weight))
    }

    fn zip_map<F>(&self, other: &Image<L, T>, mut func: F) -> Result<Image<L, T>>
    where
        F: FnMut(Pixel<L, T>, Pixel<L, T>) -> Pixel<L, T>,
    {
        self.check_same_size(other)?;
        Ok(Image {
            width: self.width,
            height: self.height,
            stride: self.width,
            channel_count: self.channel_count,
            data: self
                .pixels()
                .zip(other.pixels())
                .map(|(a, b)| func(a, b))
                .collect(),
        })
    }
}

impl<L: Layout, T: Sample> PartialEq for Image<L, T> {
    /// Same size and same visible pixels; stride and padding are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.rows().zip(other.rows()).all(|(a, b)| a == b)
    }
}

impl<L: Layout, T: Sample> fmt::Debug for Image<L, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("format", &L::FORMAT)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("channel_count", &self.channel_count)
            .finish_non_exhaustive()
    }
}
