//! The `PixelType` trait, the runtime `PixelValue` sum type and format dispatch.

use crate::pixel::types::{
    Argb, ArgbF32, ArgbS16, ArgbS32, ArgbU16, ArgbU8, Gray, GrayF32, GrayS16, GrayS32, GrayU16,
    GrayU8, Rgb, RgbF32, RgbS16, RgbS32, RgbU16, RgbU8,
};
use crate::pixel::{Channel, PixelFormat};
use crate::util::{PixelGridError, PixelGridResult};
use std::fmt;

/// A concrete pixel layout tied to exactly one `PixelFormat`.
///
/// Pixels are decoded from and encoded into byte slices at a given offset,
/// so buffers never need to be aligned for the channel type.
pub trait PixelType:
    Copy + PartialEq + PartialOrd + Default + fmt::Debug + Send + Sync + 'static
{
    /// Scalar type of every channel.
    type Channel: Channel;
    /// Format tag of this layout.
    const FORMAT: PixelFormat;
    /// Size of one pixel in bytes.
    const BYTES: usize = Self::FORMAT.bytes_per_pixel();
    /// Lower sentinel used to seed maximum scans.
    const MIN_VALUE: Self;
    /// Upper sentinel used to seed minimum scans.
    const MAX_VALUE: Self;

    /// Decodes a pixel from the first `BYTES` bytes.
    fn read(bytes: &[u8]) -> Self;

    /// Encodes the pixel into the first `BYTES` bytes.
    fn write(self, bytes: &mut [u8]);

    /// Channels in memory order, widened; unused trailing slots are zero.
    fn to_f64s(self) -> [f64; 4];

    /// Builds a pixel from widened channels in memory order.
    fn from_f64s(values: [f64; 4]) -> Self;

    /// Wraps the pixel in the matching `PixelValue` variant.
    fn into_value(self) -> PixelValue;

    /// Extracts the pixel if `value` holds this layout.
    fn from_value(value: &PixelValue) -> Option<Self>;
}

fn read_channels<C: Channel, const N: usize>(bytes: &[u8]) -> [C; N] {
    let size = C::DEPTH.bytes();
    std::array::from_fn(|k| C::read_ne(&bytes[k * size..]))
}

fn write_channels<C: Channel, const N: usize>(channels: [C; N], bytes: &mut [u8]) {
    let size = C::DEPTH.bytes();
    for (k, channel) in channels.into_iter().enumerate() {
        channel.write_ne(&mut bytes[k * size..]);
    }
}

fn widen<C: Channel, const N: usize>(channels: [C; N]) -> [f64; 4] {
    let mut out = [0.0; 4];
    for (dst, channel) in out.iter_mut().zip(channels) {
        *dst = channel.to_f64();
    }
    out
}

fn narrow<C: Channel, const N: usize>(values: [f64; 4]) -> [C; N] {
    std::array::from_fn(|k| C::from_f64(values[k]))
}

/// One pixel of any supported format.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PixelValue {
    GrayU8(GrayU8),
    RgbU8(RgbU8),
    ArgbU8(ArgbU8),
    GrayU16(GrayU16),
    RgbU16(RgbU16),
    ArgbU16(ArgbU16),
    GrayS16(GrayS16),
    RgbS16(RgbS16),
    ArgbS16(ArgbS16),
    GrayS32(GrayS32),
    RgbS32(RgbS32),
    ArgbS32(ArgbS32),
    GrayF32(GrayF32),
    RgbF32(RgbF32),
    ArgbF32(ArgbF32),
}

macro_rules! impl_pixel_type {
    ($alias:ident, $pixel:ident, $channel:ty, $n:literal) => {
        impl PixelType for $alias {
            type Channel = $channel;
            const FORMAT: PixelFormat = PixelFormat::$alias;
            const MIN_VALUE: Self = $pixel::<$channel>::MIN_VALUE;
            const MAX_VALUE: Self = $pixel::<$channel>::MAX_VALUE;

            #[inline]
            fn read(bytes: &[u8]) -> Self {
                $pixel::from_channels(read_channels::<$channel, $n>(bytes))
            }

            #[inline]
            fn write(self, bytes: &mut [u8]) {
                write_channels(self.channels(), bytes)
            }

            #[inline]
            fn to_f64s(self) -> [f64; 4] {
                widen(self.channels())
            }

            #[inline]
            fn from_f64s(values: [f64; 4]) -> Self {
                $pixel::from_channels(narrow::<$channel, $n>(values))
            }

            fn into_value(self) -> PixelValue {
                PixelValue::$alias(self)
            }

            fn from_value(value: &PixelValue) -> Option<Self> {
                match value {
                    PixelValue::$alias(pixel) => Some(*pixel),
                    _ => None,
                }
            }
        }

        impl From<$alias> for PixelValue {
            fn from(pixel: $alias) -> Self {
                PixelValue::$alias(pixel)
            }
        }
    };
}

impl_pixel_type!(GrayU8, Gray, u8, 1);
impl_pixel_type!(RgbU8, Rgb, u8, 3);
impl_pixel_type!(ArgbU8, Argb, u8, 4);
impl_pixel_type!(GrayU16, Gray, u16, 1);
impl_pixel_type!(RgbU16, Rgb, u16, 3);
impl_pixel_type!(ArgbU16, Argb, u16, 4);
impl_pixel_type!(GrayS16, Gray, i16, 1);
impl_pixel_type!(RgbS16, Rgb, i16, 3);
impl_pixel_type!(ArgbS16, Argb, i16, 4);
impl_pixel_type!(GrayS32, Gray, i32, 1);
impl_pixel_type!(RgbS32, Rgb, i32, 3);
impl_pixel_type!(ArgbS32, Argb, i32, 4);
impl_pixel_type!(GrayF32, Gray, f32, 1);
impl_pixel_type!(RgbF32, Rgb, f32, 3);
impl_pixel_type!(ArgbF32, Argb, f32, 4);

/// Runs `$body` with `$P` bound to the pixel type of a runtime format.
///
/// This is the single place where a `PixelFormat` is turned into a concrete
/// type; everything after the match is monomorphized per format.
macro_rules! dispatch_format {
    ($format:expr, $P:ident => $body:expr) => {{
        use $crate::pixel::PixelFormat as __Format;
        match $format {
            __Format::GrayU8 => { type $P = $crate::pixel::GrayU8; $body }
            __Format::RgbU8 => { type $P = $crate::pixel::RgbU8; $body }
            __Format::ArgbU8 => { type $P = $crate::pixel::ArgbU8; $body }
            __Format::GrayU16 => { type $P = $crate::pixel::GrayU16; $body }
            __Format::RgbU16 => { type $P = $crate::pixel::RgbU16; $body }
            __Format::ArgbU16 => { type $P = $crate::pixel::ArgbU16; $body }
            __Format::GrayS16 => { type $P = $crate::pixel::GrayS16; $body }
            __Format::RgbS16 => { type $P = $crate::pixel::RgbS16; $body }
            __Format::ArgbS16 => { type $P = $crate::pixel::ArgbS16; $body }
            __Format::GrayS32 => { type $P = $crate::pixel::GrayS32; $body }
            __Format::RgbS32 => { type $P = $crate::pixel::RgbS32; $body }
            __Format::ArgbS32 => { type $P = $crate::pixel::ArgbS32; $body }
            __Format::GrayF32 => { type $P = $crate::pixel::GrayF32; $body }
            __Format::RgbF32 => { type $P = $crate::pixel::RgbF32; $body }
            __Format::ArgbF32 => { type $P = $crate::pixel::ArgbF32; $body }
        }
    }};
}

pub(crate) use dispatch_format;

impl PixelValue {
    /// Returns the format tag of the held pixel.
    pub fn format(&self) -> PixelFormat {
        match self {
            PixelValue::GrayU8(_) => PixelFormat::GrayU8,
            PixelValue::RgbU8(_) => PixelFormat::RgbU8,
            PixelValue::ArgbU8(_) => PixelFormat::ArgbU8,
            PixelValue::GrayU16(_) => PixelFormat::GrayU16,
            PixelValue::RgbU16(_) => PixelFormat::RgbU16,
            PixelValue::ArgbU16(_) => PixelFormat::ArgbU16,
            PixelValue::GrayS16(_) => PixelFormat::GrayS16,
            PixelValue::RgbS16(_) => PixelFormat::RgbS16,
            PixelValue::ArgbS16(_) => PixelFormat::ArgbS16,
            PixelValue::GrayS32(_) => PixelFormat::GrayS32,
            PixelValue::RgbS32(_) => PixelFormat::RgbS32,
            PixelValue::ArgbS32(_) => PixelFormat::ArgbS32,
            PixelValue::GrayF32(_) => PixelFormat::GrayF32,
            PixelValue::RgbF32(_) => PixelFormat::RgbF32,
            PixelValue::ArgbF32(_) => PixelFormat::ArgbF32,
        }
    }

    /// The all-zero pixel of `format`.
    pub fn zero(format: PixelFormat) -> Self {
        dispatch_format!(format, P => P::default().into_value())
    }

    /// The lower sentinel of `format`.
    pub fn min_value(format: PixelFormat) -> Self {
        dispatch_format!(format, P => P::MIN_VALUE.into_value())
    }

    /// The upper sentinel of `format`.
    pub fn max_value(format: PixelFormat) -> Self {
        dispatch_format!(format, P => P::MAX_VALUE.into_value())
    }

    /// Builds a pixel of `format` from channels in memory order (`B, G, R, A`).
    ///
    /// Missing channels are zero; integer channels are rounded and saturated.
    pub fn from_channels(format: PixelFormat, channels: &[f64]) -> Self {
        let mut values = [0.0; 4];
        for (dst, src) in values.iter_mut().zip(channels) {
            *dst = *src;
        }
        dispatch_format!(format, P => P::from_f64s(values).into_value())
    }

    /// Channels in memory order, widened to `f64`.
    pub fn channels(&self) -> Vec<f64> {
        let format = self.format();
        let values = dispatch_format!(format, P => match P::from_value(self) {
            Some(pixel) => pixel.to_f64s(),
            None => [0.0; 4],
        });
        values[..format.channels()].to_vec()
    }

    /// Returns the held pixel if it has layout `P`.
    pub fn get<P: PixelType>(&self) -> Option<P> {
        P::from_value(self)
    }

    /// Like [`PixelValue::get`], reporting a format mismatch for `op`.
    pub fn expect_format<P: PixelType>(&self, op: &'static str) -> PixelGridResult<P> {
        P::from_value(self).ok_or(PixelGridError::FormatMismatch {
            op,
            expected: P::FORMAT,
            got: self.format(),
        })
    }
}
