// THEORY:
// The `SmartPixel` module provides the comparative side of the pixel model. A
// `Pixel` knows how to describe and accumulate itself; everything here takes two
// pixels and relates them: how far apart they are, their per-channel difference,
// and a weighted mix of the two.
//
// None of these functions touch channel fields directly. Each one is a thin
// expression over the `Pixel` dispatcher and the `numeric` clamp-cast helpers, so
// a new layout automatically gets all of them.

pub mod smart_pixel {
    use crate::core_modules::layout::Layout;
    use crate::core_modules::numeric::{self, Sample, Wide};
    use crate::core_modules::pixel::pixel::{apply_to_channels, fold_color_channels, Pixel};

    /// Per-channel `|in1 - in2|`, computed signed and clamped back into `T`.
    pub fn abs_diff<L: Layout, T: Sample>(in1: &Pixel<L, T>, in2: &Pixel<L, T>) -> Pixel<L, T> {
        let mut result = Pixel::default();
        apply_to_channels(&mut result, in1, in2, numeric::abs_diff);
        result
    }

    /// `color1 * weight + color2 * (1 - weight)` with `weight` clamped to `[0, 1]`.
    ///
    /// Both products are truncated into `T` before they are summed, so for 8-bit
    /// samples blending black and white at 0.5 gives 127 on every colour channel.
    /// Alpha is blended the same way: two opaque 8-bit pixels mixed at 0.5 come
    /// back with alpha 254. A NaN weight selects `color2`.
    pub fn blend_colors<L: Layout, T: Sample>(
        color1: &Pixel<L, T>,
        color2: &Pixel<L, T>,
        weight: f32,
    ) -> Pixel<L, T> {
        let weight = if weight.is_nan() {
            0.0
        } else {
            weight.clamp(0.0, 1.0)
        };
        let mut blended = *color2 * (1.0 - weight);
        blended.mac(&(*color1 * weight), 1u8);
        blended
    }

    /// Euclidean distance over the colour channels.
    pub fn l2_norm<L: Layout, T: Sample>(in1: &Pixel<L, T>, in2: &Pixel<L, T>) -> f64 {
        fold_color_channels(in1, in2, Wide::Int(0), |acc, a, b| {
            acc + numeric::squared_diff(a, b)
        })
        .as_f64()
        .sqrt()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::core_modules::layout::{Gray, Hsv, Rgb};

        type Rgb8 = Pixel<Rgb, u8>;

        #[test]
        fn abs_diff_is_symmetric() {
            let pairs = [
                (Rgb8::with_alpha(0, 255, 17, 3), Rgb8::with_alpha(255, 0, 200, 250)),
                (Rgb8::splat(9), Rgb8::splat(9)),
            ];
            for (a, b) in pairs {
                assert_eq!(abs_diff(&a, &b), abs_diff(&b, &a));
            }
            let d = abs_diff(&pairs[0].0, &pairs[0].1);
            assert_eq!(d, Rgb8::with_alpha(255, 255, 183, 247));

            let s = Pixel::<Gray, i16>::new(i16::MIN);
            let t = Pixel::<Gray, i16>::new(i16::MAX);
            assert_eq!(abs_diff(&s, &t).v(), i16::MAX);
        }

        #[test]
        fn blend_boundaries_return_endpoints() {
            let a = Rgb8::with_alpha(10, 20, 30, 40);
            let b = Rgb8::with_alpha(200, 150, 100, 250);
            assert_eq!(blend_colors(&a, &b, 0.0), b);
            assert_eq!(blend_colors(&a, &b, 1.0), a);
            assert_eq!(blend_colors(&a, &b, -2.0), b);
            assert_eq!(blend_colors(&a, &b, 7.5), a);
            assert_eq!(blend_colors(&a, &b, f32::NAN), b);
        }

        #[test]
        fn blend_midpoint_truncates_each_product() {
            let black = Rgb8::new(0, 0, 0);
            let white = Rgb8::new(255, 255, 255);
            let mid = blend_colors(&black, &white, 0.5);
            assert_eq!(mid, Rgb8::with_alpha(127, 127, 127, 254));
            assert_eq!(blend_colors(&white, &white, 0.5).alpha(), 254);

            let fa = Pixel::<Rgb, f32>::with_alpha(0.0, 0.0, 0.0, 1.0);
            let fb = Pixel::<Rgb, f32>::with_alpha(1.0, 1.0, 1.0, 1.0);
            let fm = blend_colors(&fa, &fb, 0.25);
            assert_eq!(fm, Pixel::<Rgb, f32>::with_alpha(0.75, 0.75, 0.75, 1.0));
        }

        #[test]
        fn blend_keeps_hue_in_range() {
            let a = Pixel::<Hsv, i16>::new(350, 0, 0);
            let b = Pixel::<Hsv, i16>::new(350, 0, 0);
            assert_eq!(blend_colors(&a, &b, 0.5).h(), 350);
        }

        #[test]
        fn l2_norm_matches_squared_distance() {
            let a = Rgb8::new(3, 4, 0);
            let b = Rgb8::with_alpha(0, 0, 0, 0);
            assert_eq!(l2_norm(&a, &b), 5.0);
            let red = Rgb8::new(255, 0, 0);
            assert_eq!(
                l2_norm(&red, &b).powi(2) as u64,
                red.squared_euclidean_distance(&b)
            );
            let g = Pixel::<Gray, f64>::new(-1.5);
            assert_eq!(l2_norm(&g, &Pixel::<Gray, f64>::new(1.5)), 3.0);
        }
    }
}
