// THEORY:
// A channel layout is the fixed, ordered list of named components that make up one
// pixel. Instead of writing one pixel record per layout, every layout is a zero-sized
// marker type whose only job is to publish a channel table. The table says which
// storage slot each named channel lives in and what role it plays (plain colour,
// hue, or alpha). `Pixel` and its dispatcher read this table; nothing else in the
// crate branches on the layout.

use std::fmt;

/// Slot that holds alpha in every layout.
pub const ALPHA_SLOT: usize = 3;

/// Number of storage slots in a pixel record.
pub const SLOTS: usize = 4;

/// Runtime tag for a channel layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Gray,
    Rgb,
    YCrCb,
    Hsv,
    Hls,
}

impl ImageFormat {
    /// Number of interleaved components exchanged with codecs.
    ///
    /// YCrCb reports 3: its in-memory alpha is synthetic and never reaches a file.
    pub const fn channel_count(self) -> usize {
        match self {
            ImageFormat::Gray => 2,
            ImageFormat::Rgb | ImageFormat::Hsv | ImageFormat::Hls => 4,
            ImageFormat::YCrCb => 3,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormat::Gray => "GRAY",
            ImageFormat::Rgb => "RGB",
            ImageFormat::YCrCb => "YCrCb",
            ImageFormat::Hsv => "HSV",
            ImageFormat::Hls => "HLS",
        };
        f.write_str(name)
    }
}

/// What a channel means to the arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelRole {
    Color,
    /// Angle in degrees, kept in `[0, 360)`.
    Hue,
    Alpha,
}

/// One entry of a layout's channel table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelSpec {
    pub name: &'static str,
    pub slot: usize,
    pub role: ChannelRole,
}

impl ChannelSpec {
    pub const fn color(name: &'static str, slot: usize) -> Self {
        Self {
            name,
            slot,
            role: ChannelRole::Color,
        }
    }

    pub const fn hue(name: &'static str, slot: usize) -> Self {
        Self {
            name,
            slot,
            role: ChannelRole::Hue,
        }
    }

    pub const fn alpha() -> Self {
        Self {
            name: "a",
            slot: ALPHA_SLOT,
            role: ChannelRole::Alpha,
        }
    }

    #[inline]
    pub const fn is_alpha(&self) -> bool {
        matches!(self.role, ChannelRole::Alpha)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Compile-time channel layout descriptor.
pub trait Layout: Copy + Default + fmt::Debug + PartialEq + Send + Sync + sealed::Sealed + 'static {
    const FORMAT: ImageFormat;

    /// Every channel in dispatch order; alpha is always last.
    const CHANNELS: &'static [ChannelSpec];

    /// Channels before alpha.
    const COLOR_CHANNELS: usize = Self::CHANNELS.len() - 1;

    /// Whether alpha is exchanged with codecs.
    const CODEC_ALPHA: bool = Self::FORMAT.channel_count() > Self::COLOR_CHANNELS;

    /// Colour channels only, in layout order.
    #[inline]
    fn color_channels() -> &'static [ChannelSpec] {
        &Self::CHANNELS[..Self::COLOR_CHANNELS]
    }
}

macro_rules! layouts {
    ($($(#[$doc:meta])* $name:ident => $format:ident [$($spec:expr),+ $(,)?];)+) => {
        $(
            $(#[$doc])*
            #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
            pub struct $name;

            impl sealed::Sealed for $name {}

            impl Layout for $name {
                const FORMAT: ImageFormat = ImageFormat::$format;
                const CHANNELS: &'static [ChannelSpec] = &[$($spec),+, ChannelSpec::alpha()];
            }
        )+
    };
}

layouts! {
    /// Single value plus alpha.
    Gray => Gray [ChannelSpec::color("v", 0)];
    /// Red, green, blue plus alpha.
    Rgb => Rgb [
        ChannelSpec::color("r", 0),
        ChannelSpec::color("g", 1),
        ChannelSpec::color("b", 2),
    ];
    /// Luma and two chroma differences; alpha is carried but always opaque on disk.
    YCrCb => YCrCb [
        ChannelSpec::color("y", 0),
        ChannelSpec::color("cr", 1),
        ChannelSpec::color("cb", 2),
    ];
    /// Hue, saturation, value plus alpha.
    Hsv => Hsv [
        ChannelSpec::hue("h", 0),
        ChannelSpec::color("s", 1),
        ChannelSpec::color("v", 2),
    ];
    /// Hue, lightness, saturation plus alpha.
    Hls => Hls [
        ChannelSpec::hue("h", 0),
        ChannelSpec::color("l", 1),
        ChannelSpec::color("s", 2),
    ];
}
