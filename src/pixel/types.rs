//! Concrete pixel layouts.
//!
//! `Gray`, `Rgb` and `Argb` are generic over their channel type; the fifteen
//! aliases (`GrayU8` .. `ArgbF32`) name the supported combinations. Fields are
//! declared in memory order, so multi-channel pixels read `B, G, R[, A]`.
//!
//! Ordering compares the channel sum first and breaks ties channel by channel,
//! which keeps `MIN_VALUE <= p <= MAX_VALUE` for every pixel `p`.

use crate::pixel::Channel;
use std::cmp::Ordering;

/// Single-channel intensity pixel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Gray<C> {
    pub i: C,
}

/// Three-channel pixel stored as `B, G, R`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb<C> {
    pub b: C,
    pub g: C,
    pub r: C,
}

/// Four-channel pixel stored as `B, G, R, A`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Argb<C> {
    pub b: C,
    pub g: C,
    pub r: C,
    pub a: C,
}

pub type GrayU8 = Gray<u8>;
pub type RgbU8 = Rgb<u8>;
pub type ArgbU8 = Argb<u8>;
pub type GrayU16 = Gray<u16>;
pub type RgbU16 = Rgb<u16>;
pub type ArgbU16 = Argb<u16>;
pub type GrayS16 = Gray<i16>;
pub type RgbS16 = Rgb<i16>;
pub type ArgbS16 = Argb<i16>;
pub type GrayS32 = Gray<i32>;
pub type RgbS32 = Rgb<i32>;
pub type ArgbS32 = Argb<i32>;
pub type GrayF32 = Gray<f32>;
pub type RgbF32 = Rgb<f32>;
pub type ArgbF32 = Argb<f32>;

impl<C: Channel> Gray<C> {
    pub const MIN_VALUE: Self = Self { i: C::MIN };
    pub const MAX_VALUE: Self = Self { i: C::MAX };

    pub const fn new(i: C) -> Self {
        Self { i }
    }

    pub(crate) fn channels(self) -> [C; 1] {
        [self.i]
    }

    pub(crate) fn from_channels([i]: [C; 1]) -> Self {
        Self { i }
    }
}

impl<C: Channel> Rgb<C> {
    pub const MIN_VALUE: Self = Self {
        b: C::MIN,
        g: C::MIN,
        r: C::MIN,
    };
    pub const MAX_VALUE: Self = Self {
        b: C::MAX,
        g: C::MAX,
        r: C::MAX,
    };

    /// Builds a pixel from channels given in `r, g, b` reading order.
    pub const fn new(r: C, g: C, b: C) -> Self {
        Self { b, g, r }
    }

    pub(crate) fn channels(self) -> [C; 3] {
        [self.b, self.g, self.r]
    }

    pub(crate) fn from_channels([b, g, r]: [C; 3]) -> Self {
        Self { b, g, r }
    }
}

impl<C: Channel> Argb<C> {
    pub const MIN_VALUE: Self = Self {
        b: C::MIN,
        g: C::MIN,
        r: C::MIN,
        a: C::MIN,
    };
    pub const MAX_VALUE: Self = Self {
        b: C::MAX,
        g: C::MAX,
        r: C::MAX,
        a: C::MAX,
    };

    /// Builds a pixel from channels given in `a, r, g, b` reading order.
    pub const fn new(a: C, r: C, g: C, b: C) -> Self {
        Self { b, g, r, a }
    }

    pub(crate) fn channels(self) -> [C; 4] {
        [self.b, self.g, self.r, self.a]
    }

    pub(crate) fn from_channels([b, g, r, a]: [C; 4]) -> Self {
        Self { b, g, r, a }
    }
}

fn channel_sum<C: Channel>(channels: &[C]) -> f64 {
    channels.iter().map(|c| c.to_f64()).sum()
}

fn compare_channels<C: Channel>(lhs: &[C], rhs: &[C]) -> Option<Ordering> {
    match channel_sum(lhs).partial_cmp(&channel_sum(rhs))? {
        Ordering::Equal => lhs.partial_cmp(rhs),
        other => Some(other),
    }
}

macro_rules! impl_pixel_ops {
    ($pixel:ident) => {
        impl<C: Channel> PartialOrd for $pixel<C> {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                compare_channels(&self.channels(), &other.channels())
            }
        }
    };
}

impl_pixel_ops!(Gray);
impl_pixel_ops!(Rgb);
impl_pixel_ops!(Argb);
