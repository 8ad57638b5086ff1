//! pixelgrid is a multi-format pixel buffer library.
//!
//! An [`Image`] owns a row-major buffer in one of fifteen pixel formats
//! (gray, RGB or ARGB at U8, U16, S16, S32 or F32 channel depth). [`View`]
//! and [`ViewMut`] borrow rectangles of it, the cursors in [`iter`] walk
//! either one scanline by scanline, and [`ops`] provides resize, fill,
//! min/max, copy, conversion and blur over both. Decoding and encoding go
//! through the `image` crate when the `image-io` feature is enabled.

pub mod image;
pub mod iter;
pub mod ops;
pub mod pixel;
mod trace;
pub mod util;

pub use crate::image::{Bitmap, ChannelMasks, Coord, Image, ImageSource, ImageTarget, Rect, View, ViewMut};
#[cfg(feature = "image-io")]
pub use crate::image::io::ImageFileFormat;
pub use iter::{AnyIter2d, AnyIter2dMut, Iter2d, Iter2dMut};
pub use ops::{BlurType, Interpolation};
pub use pixel::{ChannelDepth, ColorSpace, PixelFormat, PixelType, PixelValue};
pub use util::{PixelGridError, PixelGridResult};
