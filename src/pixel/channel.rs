//! Scalar channel types backing every pixel format.

use crate::pixel::ChannelDepth;
use std::fmt;

/// A single channel value stored in native byte order.
pub trait Channel:
    Copy + PartialEq + PartialOrd + Default + fmt::Debug + Send + Sync + 'static
{
    /// Depth tag of this channel type.
    const DEPTH: ChannelDepth;
    /// Smallest representable value.
    const MIN: Self;
    /// Largest representable value.
    const MAX: Self;

    /// Decodes a channel from the first `DEPTH.bytes()` bytes.
    fn read_ne(bytes: &[u8]) -> Self;

    /// Encodes the channel into the first `DEPTH.bytes()` bytes.
    fn write_ne(self, bytes: &mut [u8]);

    /// Widens the channel losslessly.
    fn to_f64(self) -> f64;

    /// Narrows a value, rounding and saturating for integer channels.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_int_channel {
    ($t:ty, $depth:ident) => {
        impl Channel for $t {
            const DEPTH: ChannelDepth = ChannelDepth::$depth;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;

            #[inline]
            fn read_ne(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$t>()];
                raw.copy_from_slice(&bytes[..std::mem::size_of::<$t>()]);
                <$t>::from_ne_bytes(raw)
            }

            #[inline]
            fn write_ne(self, bytes: &mut [u8]) {
                let raw = self.to_ne_bytes();
                bytes[..raw.len()].copy_from_slice(&raw);
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(value: f64) -> Self {
                // `as` saturates and maps NaN to zero.
                value.round() as $t
            }
        }
    };
}

impl_int_channel!(u8, U8);
impl_int_channel!(u16, U16);
impl_int_channel!(i16, S16);
impl_int_channel!(i32, S32);

impl Channel for f32 {
    const DEPTH: ChannelDepth = ChannelDepth::F32;
    const MIN: Self = f32::MIN;
    const MAX: Self = f32::MAX;

    #[inline]
    fn read_ne(bytes: &[u8]) -> Self {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&bytes[..4]);
        f32::from_ne_bytes(raw)
    }

    #[inline]
    fn write_ne(self, bytes: &mut [u8]) {
        bytes[..4].copy_from_slice(&self.to_ne_bytes());
    }

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}
