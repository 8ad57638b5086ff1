//! Pixel type catalog.
//!
//! A `PixelFormat` pairs a `ColorSpace` with a `ChannelDepth`. Each of the
//! fifteen formats has a fixed-size layout implementing `PixelType`, and
//! `PixelValue` holds one pixel of any format behind its format tag.

mod channel;
mod format;
mod types;
mod value;

pub use channel::Channel;
pub use format::{ChannelDepth, ColorSpace, PixelFormat};
pub use types::{
    Argb, ArgbF32, ArgbS16, ArgbS32, ArgbU16, ArgbU8, Gray, GrayF32, GrayS16, GrayS32, GrayU16,
    GrayU8, Rgb, RgbF32, RgbS16, RgbS32, RgbU16, RgbU8,
};
pub use value::{PixelType, PixelValue};

pub(crate) use value::dispatch_format;
