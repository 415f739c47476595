use std::path::PathBuf;

use pixel_image::{Gray, Image, Pixel, Rgb};

/// Generates a high-contrast RGB checkerboard with opaque alpha.
pub fn checkerboard_rgb(width: isize, height: isize, cell: isize) -> Image<Rgb, u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = Image::with_size(width, height).expect("valid dimensions");
    for y in 0..height {
        for x in 0..width {
            let pixel = if ((x / cell) + (y / cell)) & 1 == 0 {
                Pixel::<Rgb, u8>::new(32, 64, 96)
            } else {
                Pixel::<Rgb, u8>::new(220, 180, 140)
            };
            img.set_pixel(x, y, pixel);
        }
    }
    img
}

/// Horizontal gray ramp whose alpha runs the other way.
pub fn gradient_gray(width: isize, height: isize, stride: isize) -> Image<Gray, u8> {
    let mut img = Image::with_stride(width, height, stride).expect("valid dimensions");
    for y in 0..height {
        for x in 0..width {
            let v = (x * 255 / width.max(2).saturating_sub(1)).min(255) as u8;
            img.set_pixel(x, y, Pixel::<Gray, u8>::with_alpha(v, 255 - v));
        }
    }
    img
}

/// Unique scratch path under the system temp directory.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("pixel_image_test_{}_{name}", std::process::id()))
}
