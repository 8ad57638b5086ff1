//! Color spaces, channel depths and the closed set of pixel formats.

use std::fmt;

/// Channel layout of a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Gray,
    Rgb,
    Argb,
}

impl ColorSpace {
    /// Number of channels stored per pixel.
    pub const fn channels(self) -> usize {
        match self {
            ColorSpace::Gray => 1,
            ColorSpace::Rgb => 3,
            ColorSpace::Argb => 4,
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorSpace::Gray => "GRAY",
            ColorSpace::Rgb => "RGB",
            ColorSpace::Argb => "ARGB",
        };
        f.write_str(name)
    }
}

/// Numeric representation of a single channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelDepth {
    U8,
    U16,
    S16,
    S32,
    F32,
}

impl ChannelDepth {
    /// Size in bytes of one channel.
    pub const fn bytes(self) -> usize {
        match self {
            ChannelDepth::U8 => 1,
            ChannelDepth::U16 | ChannelDepth::S16 => 2,
            ChannelDepth::S32 | ChannelDepth::F32 => 4,
        }
    }
}

impl fmt::Display for ChannelDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelDepth::U8 => "U8",
            ChannelDepth::U16 => "U16",
            ChannelDepth::S16 => "S16",
            ChannelDepth::S32 => "S32",
            ChannelDepth::F32 => "F32",
        };
        f.write_str(name)
    }
}

/// One of the fifteen concrete (color space, channel depth) combinations.
///
/// Multi-channel pixels are stored in memory as `B, G, R[, A]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    GrayU8,
    RgbU8,
    ArgbU8,
    GrayU16,
    RgbU16,
    ArgbU16,
    GrayS16,
    RgbS16,
    ArgbS16,
    GrayS32,
    RgbS32,
    ArgbS32,
    GrayF32,
    RgbF32,
    ArgbF32,
}

impl PixelFormat {
    /// Every format, in declaration order.
    pub const ALL: [PixelFormat; 15] = [
        PixelFormat::GrayU8,
        PixelFormat::RgbU8,
        PixelFormat::ArgbU8,
        PixelFormat::GrayU16,
        PixelFormat::RgbU16,
        PixelFormat::ArgbU16,
        PixelFormat::GrayS16,
        PixelFormat::RgbS16,
        PixelFormat::ArgbS16,
        PixelFormat::GrayS32,
        PixelFormat::RgbS32,
        PixelFormat::ArgbS32,
        PixelFormat::GrayF32,
        PixelFormat::RgbF32,
        PixelFormat::ArgbF32,
    ];

    /// Builds the format for a color space and channel depth.
    pub const fn from_parts(space: ColorSpace, depth: ChannelDepth) -> Self {
        match (space, depth) {
            (ColorSpace::Gray, ChannelDepth::U8) => PixelFormat::GrayU8,
            (ColorSpace::Rgb, ChannelDepth::U8) => PixelFormat::RgbU8,
            (ColorSpace::Argb, ChannelDepth::U8) => PixelFormat::ArgbU8,
            (ColorSpace::Gray, ChannelDepth::U16) => PixelFormat::GrayU16,
            (ColorSpace::Rgb, ChannelDepth::U16) => PixelFormat::RgbU16,
            (ColorSpace::Argb, ChannelDepth::U16) => PixelFormat::ArgbU16,
            (ColorSpace::Gray, ChannelDepth::S16) => PixelFormat::GrayS16,
            (ColorSpace::Rgb, ChannelDepth::S16) => PixelFormat::RgbS16,
            (ColorSpace::Argb, ChannelDepth::S16) => PixelFormat::ArgbS16,
            (ColorSpace::Gray, ChannelDepth::S32) => PixelFormat::GrayS32,
            (ColorSpace::Rgb, ChannelDepth::S32) => PixelFormat::RgbS32,
            (ColorSpace::Argb, ChannelDepth::S32) => PixelFormat::ArgbS32,
            (ColorSpace::Gray, ChannelDepth::F32) => PixelFormat::GrayF32,
            (ColorSpace::Rgb, ChannelDepth::F32) => PixelFormat::RgbF32,
            (ColorSpace::Argb, ChannelDepth::F32) => PixelFormat::ArgbF32,
        }
    }

    /// Splits the format into its color space and channel depth.
    pub const fn parts(self) -> (ColorSpace, ChannelDepth) {
        (self.color_space(), self.channel_depth())
    }

    /// Returns the channel layout.
    pub const fn color_space(self) -> ColorSpace {
        match self {
            PixelFormat::GrayU8
            | PixelFormat::GrayU16
            | PixelFormat::GrayS16
            | PixelFormat::GrayS32
            | PixelFormat::GrayF32 => ColorSpace::Gray,
            PixelFormat::RgbU8
            | PixelFormat::RgbU16
            | PixelFormat::RgbS16
            | PixelFormat::RgbS32
            | PixelFormat::RgbF32 => ColorSpace::Rgb,
            PixelFormat::ArgbU8
            | PixelFormat::ArgbU16
            | PixelFormat::ArgbS16
            | PixelFormat::ArgbS32
            | PixelFormat::ArgbF32 => ColorSpace::Argb,
        }
    }

    /// Returns the per-channel representation.
    pub const fn channel_depth(self) -> ChannelDepth {
        match self {
            PixelFormat::GrayU8 | PixelFormat::RgbU8 | PixelFormat::ArgbU8 => ChannelDepth::U8,
            PixelFormat::GrayU16 | PixelFormat::RgbU16 | PixelFormat::ArgbU16 => {
                ChannelDepth::U16
            }
            PixelFormat::GrayS16 | PixelFormat::RgbS16 | PixelFormat::ArgbS16 => {
                ChannelDepth::S16
            }
            PixelFormat::GrayS32 | PixelFormat::RgbS32 | PixelFormat::ArgbS32 => {
                ChannelDepth::S32
            }
            PixelFormat::GrayF32 | PixelFormat::RgbF32 | PixelFormat::ArgbF32 => {
                ChannelDepth::F32
            }
        }
    }

    /// Number of channels per pixel.
    pub const fn channels(self) -> usize {
        self.color_space().channels()
    }

    /// Size in bytes of one pixel.
    pub const fn bytes_per_pixel(self) -> usize {
        self.channels() * self.channel_depth().bytes()
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.color_space(), self.channel_depth())
    }
}

#[cfg(test)]
mod tests {
    use super::{ChannelDepth, ColorSpace, PixelFormat};

    #[test]
    fn parts_round_trip_for_every_format() {
        for format in PixelFormat::ALL {
            let (space, depth) = format.parts();
            assert_eq!(PixelFormat::from_parts(space, depth), format);
        }
    }

    #[test]
    fn bytes_per_pixel_matches_layout() {
        assert_eq!(PixelFormat::GrayU8.bytes_per_pixel(), 1);
        assert_eq!(PixelFormat::RgbU8.bytes_per_pixel(), 3);
        assert_eq!(PixelFormat::ArgbU8.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::RgbS16.bytes_per_pixel(), 6);
        assert_eq!(PixelFormat::ArgbU16.bytes_per_pixel(), 8);
        assert_eq!(PixelFormat::GrayS32.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::RgbF32.bytes_per_pixel(), 12);
        assert_eq!(PixelFormat::ArgbF32.bytes_per_pixel(), 16);
    }

    #[test]
    fn display_names_space_and_depth() {
        assert_eq!(PixelFormat::ArgbF32.to_string(), "ARGB_F32");
        assert_eq!(ColorSpace::Gray.to_string(), "GRAY");
        assert_eq!(ChannelDepth::S16.to_string(), "S16");
    }
}
