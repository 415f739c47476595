// THEORY:
// The `Pixel` module is the fundamental unit of the library. A pixel is a "dumb",
// fixed-size record of samples: no heap, no indirection, copied by value. It is
// generic over two things:
//   • the channel layout `L` (Gray, RGB, YCrCb, HSV, HLS), a zero-sized marker that
//     publishes the channel table, and
//   • the sample representation `T` (u8, i16, u16, i32, f32, f64).
//
// Storage is always four slots. Colour channels occupy the slots named by the layout
// table and alpha always lives in slot 3; a Gray pixel simply leaves slots 1 and 2 at
// zero. This keeps one record type for every layout instead of five hand-written ones.
//
// The channel dispatcher (`apply_to_channels`, `apply_to_channel`, `fold_color_channels`)
// is the only code that walks the layout table. Every elementwise operation, from
// multiply-accumulate to representation casts, is written once on top of it, and the
// hue special case (reduce modulo 360) is applied in exactly one place: `store`.
//
// Key principles:
// 1) Arithmetic never wraps: all per-channel math goes through `numeric`, which
//    promotes, computes exactly, then clamps.
// 2) Alpha defaults to the representation's maximum (fully opaque).
// 3) Per-layout constructors and named accessors are generated from a single macro
//    that indexes the same channel table.

pub mod pixel {
    use std::fmt;
    use std::marker::PhantomData;
    use std::ops::Mul;

    use crate::core_modules::layout::{
        ALPHA_SLOT, ChannelRole, ChannelSpec, Gray, Hls, Hsv, Layout, Rgb, SLOTS, YCrCb,
    };
    use crate::core_modules::numeric::{self, Arithmetic, Sample};

    /// One sample point of layout `L` stored as `T`.
    #[derive(Clone, Copy)]
    pub struct Pixel<L: Layout, T: Sample> {
        values: [T; SLOTS],
        layout: PhantomData<L>,
    }

    impl<L: Layout, T: Sample> Default for Pixel<L, T> {
        /// Zero colour, opaque alpha.
        fn default() -> Self {
            let mut values = [T::ZERO; SLOTS];
            values[ALPHA_SLOT] = T::MAX;
            Self {
                values,
                layout: PhantomData,
            }
        }
    }

    impl<L: Layout, T: Sample> PartialEq for Pixel<L, T> {
        fn eq(&self, other: &Self) -> bool {
            L::CHANNELS
                .iter()
                .all(|spec| self.values[spec.slot] == other.values[spec.slot])
        }
    }

    impl<L: Layout, T: Sample> fmt::Debug for Pixel<L, T> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let mut out = f.debug_struct(&format!("Pixel<{}>", L::FORMAT));
            for spec in L::CHANNELS {
                out.field(spec.name, &self.values[spec.slot]);
            }
            out.finish()
        }
    }

    // =================================Dispatcher==================================

    /// Applies `func` pairwise to every channel of `in1` and `in2`, in layout order.
    ///
    /// Hue channels are reduced modulo 360 after `func` runs.
    #[inline]
    pub fn apply_to_channels<L, T, F>(
        result: &mut Pixel<L, T>,
        in1: &Pixel<L, T>,
        in2: &Pixel<L, T>,
        mut func: F,
    ) where
        L: Layout,
        T: Sample,
        F: FnMut(T, T) -> T,
    {
        for spec in L::CHANNELS {
            let value = func(in1.values[spec.slot], in2.values[spec.slot]);
            result.store(spec, value);
        }
    }

    /// Applies `func` to every channel of `input`, possibly changing representation.
    #[inline]
    pub fn apply_to_channel<L, T, U, F>(result: &mut Pixel<L, U>, input: &Pixel<L, T>, mut func: F)
    where
        L: Layout,
        T: Sample,
        U: Sample,
        F: FnMut(T) -> U,
    {
        for spec in L::CHANNELS {
            let value = func(input.values[spec.slot]);
            result.store(spec, value);
        }
    }

    /// Folds over the colour channels (alpha excluded) of two pixels.
    #[inline]
    pub fn fold_color_channels<L, T, A, F>(in1: &Pixel<L, T>, in2: &Pixel<L, T>, init: A, mut func: F) -> A
    where
        L: Layout,
        T: Sample,
        F: FnMut(A, T, T) -> A,
    {
        L::color_channels().iter().fold(init, |acc, spec| {
            func(acc, in1.values[spec.slot], in2.values[spec.slot])
        })
    }

    impl<L: Layout, T: Sample> Pixel<L, T> {
        #[inline]
        fn store(&mut self, spec: &ChannelSpec, value: T) {
            self.values[spec.slot] = match spec.role {
                ChannelRole::Hue => value.wrap_hue(),
                ChannelRole::Color | ChannelRole::Alpha => value,
            };
        }

        /// Builds a pixel from colour values in layout order and an explicit alpha.
        ///
        /// Missing colour values stay zero; extra values are ignored.
        pub fn from_color(color: &[T], alpha: T) -> Self {
            let mut pixel = Self::default();
            for (spec, &value) in L::color_channels().iter().zip(color) {
                pixel.store(spec, value);
            }
            pixel.set_alpha(alpha);
            pixel
        }

        /// Every colour channel set to `value`, opaque alpha.
        pub fn splat(value: T) -> Self {
            let mut pixel = Self::default();
            pixel.set_splat(value, T::MAX);
            pixel
        }

        /// Overwrites every colour channel with `value` and alpha with `alpha`.
        pub fn set_splat(&mut self, value: T, alpha: T) {
            for spec in L::color_channels() {
                self.store(spec, value);
            }
            self.set_alpha(alpha);
        }

        #[inline]
        pub fn alpha(&self) -> T {
            self.values[ALPHA_SLOT]
        }

        #[inline]
        pub fn set_alpha(&mut self, alpha: T) {
            self.values[ALPHA_SLOT] = alpha;
        }

        /// Looks a channel up by its table name (`"r"`, `"cr"`, `"a"`, ...).
        pub fn channel(&self, name: &str) -> Option<T> {
            L::CHANNELS
                .iter()
                .find(|spec| spec.name == name)
                .map(|spec| self.values[spec.slot])
        }

        /// `(name, value)` for every channel in layout order, alpha last.
        pub fn channels(&self) -> impl Iterator<Item = (&'static str, T)> + '_ {
            L::CHANNELS
                .iter()
                .map(move |spec| (spec.name, self.values[spec.slot]))
        }

        /// Multiply-accumulate: `self = clamp(self + other * coeff)` on every channel.
        ///
        /// The sum is formed in the promoted type of `T` and `C`, so it cannot wrap.
        pub fn mac<C: Arithmetic>(&mut self, other: &Self, coeff: C) {
            let acc = *self;
            apply_to_channels(self, &acc, other, |a, b| numeric::mul_add(a, b, coeff));
        }

        /// Sum of squared colour differences, computed through `i64`.
        pub fn squared_euclidean_distance(&self, other: &Self) -> u64 {
            fold_color_channels(self, other, 0u64, |acc, a, b| {
                let diff = a.to_i64().saturating_sub(b.to_i64()).unsigned_abs();
                acc.saturating_add(diff.saturating_mul(diff))
            })
        }

        /// Same layout, different representation; each channel is clamp-cast.
        pub fn cast<U: Sample>(&self) -> Pixel<L, U> {
            let mut result = Pixel::<L, U>::default();
            apply_to_channel(&mut result, self, numeric::cast::<T, U>);
            result
        }

        /// Every channel strictly below `other`'s.
        pub fn all_lt(&self, other: &Self) -> bool {
            L::CHANNELS
                .iter()
                .all(|spec| self.values[spec.slot] < other.values[spec.slot])
        }

        /// Every channel at most `other`'s.
        pub fn all_le(&self, other: &Self) -> bool {
            L::CHANNELS
                .iter()
                .all(|spec| self.values[spec.slot] <= other.values[spec.slot])
        }

        /// Reads one pixel from interleaved codec samples.
        ///
        /// `samples` holds the colour channels and optionally alpha; alpha is taken only
        /// when the layout exchanges it with codecs.
        pub(crate) fn from_interleaved(samples: &[T]) -> Self {
            let alpha = if L::CODEC_ALPHA && samples.len() > L::COLOR_CHANNELS {
                samples[L::COLOR_CHANNELS]
            } else {
                T::MAX
            };
            Self::from_color(&samples[..L::COLOR_CHANNELS.min(samples.len())], alpha)
        }

        /// Appends the colour channels, plus alpha when requested and supported.
        pub(crate) fn write_interleaved(&self, out: &mut Vec<T>, alpha: bool) {
            out.extend(L::color_channels().iter().map(|spec| self.values[spec.slot]));
            if alpha && L::CODEC_ALPHA {
                out.push(self.alpha());
            }
        }
    }

    /// Per-channel multiply by a scalar, clamped into `T`.
    impl<L: Layout, T: Sample, C: Arithmetic> Mul<C> for Pixel<L, T> {
        type Output = Pixel<L, T>;

        fn mul(self, num: C) -> Pixel<L, T> {
            let mut result = Pixel::default();
            apply_to_channel(&mut result, &self, |a| numeric::scale(a, num));
            result
        }
    }

    macro_rules! pixel_api {
        ($layout:ty { $($get:ident / $set:ident => $idx:expr),+ $(,)? }) => {
            impl<T: Sample> Pixel<$layout, T> {
                /// Builds an opaque pixel from its colour channels.
                pub fn new($($get: T),+) -> Self {
                    Self::from_color(&[$($get),+], T::MAX)
                }

                pub fn with_alpha($($get: T,)+ alpha: T) -> Self {
                    Self::from_color(&[$($get),+], alpha)
                }

                /// Overwrites the colour channels and resets alpha to opaque.
                pub fn set(&mut self, $($get: T),+) {
                    self.set_with_alpha($($get,)+ T::MAX);
                }

                pub fn set_with_alpha(&mut self, $($get: T,)+ alpha: T) {
                    *self = Self::with_alpha($($get,)+ alpha);
                }

                $(
                    #[inline]
                    pub fn $get(&self) -> T {
                        self.values[<$layout as Layout>::CHANNELS[$idx].slot]
                    }

                    #[inline]
                    pub fn $set(&mut self, value: T) {
                        self.store(&<$layout as Layout>::CHANNELS[$idx], value);
                    }
                )+
            }
        };
    }

    pixel_api!(Gray { v / set_v => 0 });
    pixel_api!(Rgb { r / set_r => 0, g / set_g => 1, b / set_b => 2 });
    pixel_api!(YCrCb { y / set_y => 0, cr / set_cr => 1, cb / set_cb => 2 });
    pixel_api!(Hsv { h / set_h => 0, s / set_s => 1, v / set_v => 2 });
    pixel_api!(Hls { h / set_h => 0, l / set_l => 1, s / set_s => 2 });

}
