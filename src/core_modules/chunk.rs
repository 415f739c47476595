// THEORY:
// A `Chunk` is a rectangular window into an `Image`. It owns nothing: it borrows the
// parent's strided buffer starting at the window's top-left pixel and walks it with
// the parent's stride. The borrow checker guarantees the image cannot be reallocated
// or mutated while a chunk is alive.

pub mod chunk {
    use crate::core_modules::image::Image;
    use crate::core_modules::layout::{Layout, SLOTS};
    use crate::core_modules::numeric::{self, Sample};
    use crate::core_modules::pixel::pixel::Pixel;

    pub struct Chunk<'a, L: Layout, T: Sample> {
        width: usize,
        height: usize,
        stride: usize,
        pixels: &'a [Pixel<L, T>],
    }

    impl<'a, L: Layout, T: Sample> Chunk<'a, L, T> {
        /// `pixels` starts at the window's first pixel and ends at its last one.
        pub(crate) fn new(width: usize, height: usize, stride: usize, pixels: &'a [Pixel<L, T>]) -> Self {
            Self {
                width,
                height,
                stride,
                pixels,
            }
        }

        #[inline]
        pub fn width(&self) -> usize {
            self.width
        }

        #[inline]
        pub fn height(&self) -> usize {
            self.height
        }

        /// Reads window-relative `(x, y)`, or the default pixel outside the window.
        pub fn get_pixel(&self, x: usize, y: usize) -> Pixel<L, T> {
            if x >= self.width || y >= self.height {
                return Pixel::default();
            }
            self.pixels[y * self.stride + x]
        }

        pub fn rows(&self) -> impl Iterator<Item = &'a [Pixel<L, T>]> {
            let width = self.width;
            let pixels: &'a [Pixel<L, T>] = self.pixels;
            let pixels = if width == 0 { &pixels[..0] } else { pixels };
            pixels
                .chunks(self.stride.max(1))
                .map(move |row| &row[..width])
        }

        pub fn pixels(&self) -> impl Iterator<Item = Pixel<L, T>> {
            self.rows().flat_map(|row| row.iter().copied())
        }

        /// Arithmetic mean of every channel, alpha included.
        ///
        /// Sums are kept in `f64` and the mean is clamp-cast back into `T`, so integer
        /// samples truncate. Hue is averaged linearly, not on the circle.
        pub fn average_pixel(&self) -> Pixel<L, T> {
            let count = self.width * self.height;
            if count == 0 {
                return Pixel::default();
            }

            let mut sums = [0f64; SLOTS];
            for pixel in self.pixels() {
                for (sum, (_, value)) in sums.iter_mut().zip(pixel.channels()) {
                    *sum += numeric::cast::<T, f64>(value);
                }
            }

            let mut means = [T::ZERO; SLOTS];
            for (mean, sum) in means.iter_mut().zip(&sums).take(L::CHANNELS.len()) {
                *mean = numeric::cast::<f64, T>(sum / count as f64);
            }
            Pixel::from_color(&means[..L::COLOR_CHANNELS], means[L::COLOR_CHANNELS])
        }

        /// Copies the window into a new compact image.
        pub fn to_image(&self) -> Image<L, T> {
            Image {
                width: self.width,
                height: self.height,
                stride: self.width,
                channel_count: L::FORMAT.channel_count(),
                data: self.pixels().collect(),
            }
        }
    }

}
