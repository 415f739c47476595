mod common;

use common::synthetic_image::{checkerboard_rgb, gradient_gray};
use pixel_image::{
    BorderMode, Error, Gray, Hsv, Image, Pixel, Rgb, YCrCb, abs_diff, blend_colors, l2_norm,
};

type Rgb8 = Pixel<Rgb, u8>;

#[test]
fn red_corner_distance_on_black_image() {
    let mut image = Image::<Rgb, u8>::filled(2, 2, Rgb8::new(0, 0, 0)).unwrap();
    image.set_pixel(0, 0, Rgb8::with_alpha(255, 0, 0, 255));

    let corner = image.get_pixel(0, 0);
    let other = image.get_pixel(1, 1);
    assert_eq!(corner.squared_euclidean_distance(&other), 65_025);
    assert_eq!(l2_norm(&corner, &other), 255.0);
}

#[test]
fn half_blend_of_black_and_white_truncates_to_127() {
    let black = Rgb8::new(0, 0, 0);
    let white = Rgb8::new(255, 255, 255);
    let mid = blend_colors(&black, &white, 0.5);
    assert_eq!((mid.r(), mid.g(), mid.b()), (127, 127, 127));
}

#[test]
fn outside_reads_are_default_and_writes_are_ignored() {
    let mut image = checkerboard_rgb(8, 6, 2);
    let snapshot = image.clone();
    for (x, y) in [(-1, 0), (8, 0), (0, 6), (-100, -100), (8, 6)] {
        assert_eq!(image.get_pixel(x, y), Rgb8::default());
        image.set_pixel(x, y, Rgb8::new(1, 2, 3));
    }
    image.set_pixel_at(48, Rgb8::new(1, 2, 3));
    assert_eq!(image, snapshot);
}

#[test]
fn border_properties_hold_on_every_row() {
    let image = gradient_gray(5, 4, 7);
    let (w, h) = (image.width() as isize, image.height() as isize);
    let reflect = BorderMode::reflect();
    let replicate = BorderMode::replicate();
    for y in 0..h {
        assert_eq!(image.get_pixel_with_border(-1, y, &reflect), image.get_pixel(0, y));
        assert_eq!(image.get_pixel_with_border(w, y, &reflect), image.get_pixel(w - 1, y));
        for offset in [1, 5, 1000] {
            assert_eq!(
                image.get_pixel_with_border(-offset, y, &replicate),
                image.get_pixel(0, y)
            );
        }
    }
    let fallback = Pixel::<Gray, u8>::with_alpha(7, 7);
    assert_eq!(
        image.get_pixel_with_border(2, -3, &BorderMode::constant(fallback)),
        fallback
    );
}

#[test]
fn copy_between_strides_keeps_coordinates() {
    let source = gradient_gray(6, 3, 10);
    let mut target = Image::<Gray, u8>::with_stride(6, 3, 6).unwrap();
    target.copy_from(&source).unwrap();
    for y in 0..3 {
        for x in 0..6 {
            assert_eq!(target.get_pixel(x, y), source.get_pixel(x, y));
        }
    }

    let mut smaller = Image::<Gray, u8>::with_size(5, 3).unwrap();
    assert!(matches!(
        smaller.copy_from(&source),
        Err(Error::DimensionMismatch { .. })
    ));
}

#[test]
fn moving_out_leaves_an_empty_image() {
    let mut original = checkerboard_rgb(4, 4, 1);
    let expected = original.clone();
    let moved = original.take();
    assert_eq!(moved, expected);
    assert!(original.is_empty());
    assert_eq!(original.as_raw().len(), 0);
    assert_eq!(original.get_pixel(0, 0), Rgb8::default());

    original.create(2, 2, 0).unwrap();
    assert_eq!(original.width(), 2);
}

#[test]
fn negative_dimensions_are_rejected() {
    assert!(matches!(
        Image::<Rgb, u8>::with_size(-1, 4),
        Err(Error::InvalidDimensions { width: -1, height: 4, stride: 0 })
    ));
    assert!(Image::<Rgb, u8>::with_stride(4, 4, -2).is_err());
    assert!(Image::<Rgb, u8>::with_stride(4, 4, 2).is_err());
    let empty = Image::<Rgb, u8>::with_size(0, 0).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn strict_accessors_report_mistakes() {
    let mut image = Image::<YCrCb, i16>::with_size(3, 3).unwrap();
    assert!(image.try_set_pixel(3, 0, Pixel::<YCrCb, i16>::new(1, 2, 3)).is_err());
    assert!(matches!(
        image.try_get_pixel(0, 3),
        Err(Error::OutOfBounds { x: 0, y: 3, .. })
    ));
    image.try_set_pixel(2, 2, Pixel::<YCrCb, i16>::new(-1, -2, -3)).unwrap();
    assert_eq!(image.try_get_pixel(2, 2).unwrap().cb(), -3);
}

#[test]
fn pixelwise_operations_agree_with_pixel_primitives() {
    let a = checkerboard_rgb(4, 4, 2);
    let b = checkerboard_rgb(4, 4, 1);
    let diff = a.abs_diff(&b).unwrap();
    let mixed = a.blend(&b, 0.25).unwrap();
    for y in 0..4 {
        for x in 0..4 {
            let (pa, pb) = (a.get_pixel(x, y), b.get_pixel(x, y));
            assert_eq!(diff.get_pixel(x, y), abs_diff(&pa, &pb));
            assert_eq!(mixed.get_pixel(x, y), blend_colors(&pa, &pb, 0.25));
        }
    }
}

#[test]
fn hue_stays_in_range_through_image_arithmetic() {
    let mut hues = Image::<Hsv, i16>::filled(2, 2, Pixel::<Hsv, i16>::new(300, 10, 10)).unwrap();
    let step = Image::<Hsv, i16>::filled(2, 2, Pixel::<Hsv, i16>::with_alpha(100, 0, 0, 0)).unwrap();
    hues.mac(&step, 1u8).unwrap();
    assert!(hues.pixels().all(|p| p.h() == 40));
}

#[test]
fn chunk_average_of_checkerboard() {
    let image = checkerboard_rgb(4, 4, 1);
    let average = image.chunk(0, 0, 2, 2).unwrap().average_pixel();
    assert_eq!(average, Rgb8::with_alpha(126, 122, 118, 255));
}

#[test]
fn cast_to_wider_and_back_is_lossless() {
    let image = gradient_gray(16, 2, 0);
    let wide = image.cast::<i32>();
    assert_eq!(wide.cast::<u8>(), image);
    let float = image.cast::<f64>();
    assert_eq!(float.cast::<u8>(), image);
}
