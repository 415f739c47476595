// THEORY:
// Border extrapolation answers "what does the image look like just outside its
// edges?" It is a plain value policy: the mode holds a copy of its fallback pixel
// and never borrows the image it is used with.

use crate::core_modules::layout::Layout;
use crate::core_modules::numeric::Sample;
use crate::core_modules::pixel::pixel::Pixel;

/// How out-of-bounds coordinates are resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BorderType {
    /// Return the mode's `border_pixel`.
    #[default]
    Constant,
    /// Clamp each coordinate to the nearest edge.
    Replicate,
    /// Mirror about the edge without repeating the edge pixel.
    Reflect,
}

/// Border policy plus the fallback pixel used by `BorderType::Constant`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BorderMode<L: Layout, T: Sample> {
    pub border_type: BorderType,
    pub border_pixel: Pixel<L, T>,
}

impl<L: Layout, T: Sample> BorderMode<L, T> {
    pub fn constant(border_pixel: Pixel<L, T>) -> Self {
        Self {
            border_type: BorderType::Constant,
            border_pixel,
        }
    }

    pub fn replicate() -> Self {
        Self {
            border_type: BorderType::Replicate,
            border_pixel: Pixel::default(),
        }
    }

    pub fn reflect() -> Self {
        Self {
            border_type: BorderType::Reflect,
            border_pixel: Pixel::default(),
        }
    }
}

/// Mirrors `idx` into `[0, max_idx)` once: `-1 -> 0`, `max_idx -> max_idx - 1`.
///
/// Coordinates more than one image length away stay out of range.
#[inline]
pub fn reflect_index(idx: isize, max_idx: isize) -> isize {
    if idx < 0 {
        -(idx + 1)
    } else if idx >= max_idx {
        max_idx - (idx - max_idx) - 1
    } else {
        idx
    }
}

/// Clamps `idx` into `[0, max_idx - 1]`.
#[inline]
pub fn replicate_index(idx: isize, max_idx: isize) -> isize {
    idx.clamp(0, (max_idx - 1).max(0))
}
