//! Owned pixel buffers and borrowed windows into them.
//!
//! An `Image` owns a row-major byte buffer of `height * row_step` bytes.
//! Row 0 is the topmost scanline and every row starts on a 16-byte boundary
//! relative to the buffer start; the padding after `width * bytes_per_pixel`
//! bytes is never read by traversal or equality.
//!
//! `View` and `ViewMut` borrow a rectangle of an image without copying. Their
//! row stride is the image's `row_step` and their first pixel sits at
//! `y * row_step + x * bytes_per_pixel`.

mod bitmap;
#[cfg(feature = "image-io")]
pub mod io;
mod view;

pub use bitmap::{Bitmap, ChannelMasks};
pub use view::{ImageSource, ImageTarget, Rect, View, ViewMut};

use crate::iter::{AnyIter2d, AnyIter2dMut, Iter2d, Iter2dMut};
use crate::ops::{self, Interpolation};
use crate::pixel::{ChannelDepth, ColorSpace, PixelFormat, PixelType, PixelValue};
use crate::util::math::align_up;
use crate::util::{Layout, PixelGridError, PixelGridResult};
use std::fmt;

const ROW_ALIGN: usize = 16;

/// How `sub_pixel` and `set_pixel` interpret their coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Coord {
    /// Pixel units relative to the image or view origin.
    #[default]
    Pixel,
    /// Fractions of the width and height in `[0, 1]`, clamped.
    Normalized,
}

/// Owned 2D pixel buffer of a single format.
///
/// `Image` is deliberately not `Clone`; use [`Image::deep_clone`] or
/// [`Image::clone_to`] for an explicit copy.
#[derive(Debug)]
pub struct Image {
    data: Vec<u8>,
    width: usize,
    height: usize,
    row_step: usize,
    format: PixelFormat,
}

/// Row step and total byte length for a freshly allocated image.
fn packed_layout(format: PixelFormat, width: usize, height: usize) -> PixelGridResult<(usize, usize)> {
    if width == 0 || height == 0 {
        return Err(PixelGridError::InvalidDimensions { width, height });
    }
    let too_large = PixelGridError::InvalidDimensions { width, height };
    // Coordinates travel as i64 in errors and views.
    if width > i64::MAX as usize || height > i64::MAX as usize {
        return Err(too_large);
    }
    let row_step = width
        .checked_mul(format.bytes_per_pixel())
        .and_then(|bytes| align_up(bytes, ROW_ALIGN))
        .ok_or(too_large.clone())?;
    let len = row_step.checked_mul(height).ok_or(too_large)?;
    Ok((row_step, len))
}

impl Image {
    /// Allocates a zero-filled image.
    pub fn new(format: PixelFormat, width: usize, height: usize) -> PixelGridResult<Self> {
        let (row_step, len) = packed_layout(format, width, height)?;
        Ok(Self {
            data: vec![0; len],
            width,
            height,
            row_step,
            format,
        })
    }

    /// Copies an external buffer whose rows are `row_step` bytes apart.
    ///
    /// The last row only needs `width * bytes_per_pixel` bytes.
    pub fn from_bytes(
        format: PixelFormat,
        width: usize,
        height: usize,
        row_step: usize,
        data: &[u8],
    ) -> PixelGridResult<Self> {
        let mut image = Self::new(format, width, height)?;
        let row_bytes = image.row_bytes();
        if row_step < row_bytes {
            return Err(PixelGridError::InvalidRowStep {
                row_bytes,
                row_step,
            });
        }
        let needed = (height - 1)
            .checked_mul(row_step)
            .and_then(|v| v.checked_add(row_bytes))
            .ok_or(PixelGridError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(PixelGridError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        let dst_step = image.row_step;
        for (y, dst) in image.data.chunks_exact_mut(dst_step).enumerate() {
            let start = y * row_step;
            dst[..row_bytes].copy_from_slice(&data[start..start + row_bytes]);
        }
        Ok(image)
    }

    /// Releases the buffer and leaves an empty 0x0 image.
    pub fn erase(&mut self) {
        self.data = Vec::new();
        self.width = 0;
        self.height = 0;
        self.row_step = 0;
        self.format = PixelFormat::GrayU8;
    }

    /// Returns true after [`Image::erase`].
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns a deep copy.
    pub fn deep_clone(&self) -> Image {
        Image {
            data: self.data.clone(),
            width: self.width,
            height: self.height,
            row_step: self.row_step,
            format: self.format,
        }
    }

    /// Overwrites `dst` with a deep copy of this image, reusing its allocation.
    pub fn clone_to(&self, dst: &mut Image) {
        dst.data.clear();
        dst.data.extend_from_slice(&self.data);
        dst.width = self.width;
        dst.height = self.height;
        dst.row_step = self.row_step;
        dst.format = self.format;
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of bytes between row starts.
    pub fn row_step(&self) -> usize {
        self.row_step
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn color_space(&self) -> ColorSpace {
        self.format.color_space()
    }

    pub fn channel_depth(&self) -> ChannelDepth {
        self.format.channel_depth()
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Bytes of pixel data per row, excluding padding.
    pub fn row_bytes(&self) -> usize {
        self.width * self.format.bytes_per_pixel()
    }

    pub fn layout(&self) -> Layout {
        Layout {
            format: self.format,
            width: self.width,
            height: self.height,
        }
    }

    /// Returns the whole buffer including row padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the whole mutable buffer including row padding.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Returns the pixel bytes of row `y`.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.row_step;
        self.data.get(start..start + self.row_bytes())
    }

    /// Returns the mutable pixel bytes of row `y`.
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.row_step;
        let end = start + self.row_bytes();
        self.data.get_mut(start..end)
    }

    /// Borrows the whole image.
    pub fn view(&self) -> View<'_> {
        View::new(self)
    }

    /// Mutably borrows the whole image.
    pub fn view_mut(&mut self) -> ViewMut<'_> {
        ViewMut::new(self)
    }

    /// Borrows a pixel rectangle.
    pub fn sub_view(&self, x: usize, y: usize, width: usize, height: usize) -> PixelGridResult<View<'_>> {
        View::with_rect(self, x, y, width, height)
    }

    /// Mutably borrows a pixel rectangle.
    pub fn sub_view_mut(
        &mut self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> PixelGridResult<ViewMut<'_>> {
        ViewMut::with_rect(self, x, y, width, height)
    }

    /// Typed cursor over every pixel; `P` must match the format.
    pub fn iter2d<P: PixelType>(&self) -> PixelGridResult<Iter2d<'_, P>> {
        self.view().iter2d()
    }

    /// Typed mutable cursor over every pixel; `P` must match the format.
    pub fn iter2d_mut<P: PixelType>(&mut self) -> PixelGridResult<Iter2dMut<'_, P>> {
        let (width, height, row_step) = (self.width, self.height, self.row_step);
        check_pixel_type::<P>(self.format, "iter2d_mut")?;
        Ok(Iter2dMut::new(&mut self.data, 0, width, height, row_step))
    }

    /// Cursor of whichever pixel type matches the format.
    pub fn any_iter(&self) -> AnyIter2d<'_> {
        self.view().any_iter()
    }

    /// Mutable cursor of whichever pixel type matches the format.
    pub fn any_iter_mut(&mut self) -> AnyIter2dMut<'_> {
        let (width, height, row_step) = (self.width, self.height, self.row_step);
        any_iter_mut(self.format, &mut self.data, 0, width, height, row_step)
    }

    /// Reads the pixel at `(x, y)`.
    ///
    /// Returns `None` when out of bounds or when `P` is not this image's layout.
    pub fn pixel<P: PixelType>(&self, x: usize, y: usize) -> Option<P> {
        self.view().pixel(x, y)
    }

    /// Writes the pixel at `(x, y)`.
    pub fn put_pixel<P: PixelType>(&mut self, x: usize, y: usize, pixel: P) -> PixelGridResult<()> {
        self.view_mut().put_pixel(x, y, pixel)
    }

    /// Bilinearly samples the image at a fractional coordinate.
    ///
    /// Intended for prototyping; supports GRAY_U8, GRAY_F32, RGB_U8, RGB_F32
    /// and ARGB_U8.
    pub fn sub_pixel(&self, coord: Coord, x: f32, y: f32) -> PixelGridResult<PixelValue> {
        self.view().sub_pixel(coord, x, y)
    }

    /// Writes one pixel at a rounded coordinate. Supports GRAY_U8 only.
    pub fn set_pixel(&mut self, coord: Coord, x: f32, y: f32, value: PixelValue) -> PixelGridResult<()> {
        self.view_mut().set_pixel(coord, x, y, value)
    }

    /// Resamples the image in place to `width x height`.
    ///
    /// The image is left untouched if the resize fails.
    pub fn resize(&mut self, width: usize, height: usize, interpolation: Interpolation) -> PixelGridResult<()> {
        let mut resized = Image::new(self.format, width, height)?;
        ops::resize(&*self, &mut resized, interpolation)?;
        std::mem::swap(self, &mut resized);
        Ok(())
    }
}

pub(crate) fn check_pixel_type<P: PixelType>(format: PixelFormat, op: &'static str) -> PixelGridResult<()> {
    if P::FORMAT == format {
        Ok(())
    } else {
        Err(PixelGridError::FormatMismatch {
            op,
            expected: format,
            got: P::FORMAT,
        })
    }
}

pub(crate) fn any_iter(
    format: PixelFormat,
    data: &[u8],
    origin: usize,
    width: usize,
    height: usize,
    row_step: usize,
) -> AnyIter2d<'_> {
    crate::pixel::dispatch_format!(format, P => {
        AnyIter2d::from(Iter2d::<P>::new(data, origin, width, height, row_step))
    })
}

pub(crate) fn any_iter_mut(
    format: PixelFormat,
    data: &mut [u8],
    origin: usize,
    width: usize,
    height: usize,
    row_step: usize,
) -> AnyIter2dMut<'_> {
    crate::pixel::dispatch_format!(format, P => {
        AnyIter2dMut::from(Iter2dMut::<P>::new(data, origin, width, height, row_step))
    })
}

/// A 1x1 ARGB_U8 image.
impl Default for Image {
    fn default() -> Self {
        let format = PixelFormat::ArgbU8;
        let row_step = ROW_ALIGN;
        Self {
            data: vec![0; row_step],
            width: 1,
            height: 1,
            row_step,
            format,
        }
    }
}

/// Images compare equal when format, dimensions and pixel bytes match.
/// Row padding is ignored.
impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        if self.format != other.format || self.width != other.width || self.height != other.height {
            return false;
        }
        (0..self.height).all(|y| self.row(y) == other.row(y))
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "width : {} height : {}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::{Coord, Image};
    use crate::pixel::{GrayU8, PixelFormat, PixelValue, RgbF32};
    use crate::util::PixelGridError;

    #[test]
    fn new_rejects_zero_dimensions() {
        let err = Image::new(PixelFormat::GrayU8, 0, 3).err().unwrap();
        assert_eq!(err, PixelGridError::InvalidDimensions { width: 0, height: 3 });
    }

    #[test]
    fn rows_are_sixteen_byte_aligned() {
        let img = Image::new(PixelFormat::RgbU8, 5, 2).unwrap();
        assert_eq!(img.row_step(), 16);
        let img = Image::new(PixelFormat::ArgbF32, 3, 2).unwrap();
        assert_eq!(img.row_step(), 48);
        assert_eq!(img.as_bytes().len(), 96);
    }

    #[test]
    fn from_bytes_checks_the_buffer() {
        let err = Image::from_bytes(PixelFormat::GrayU8, 4, 2, 3, &[0; 8]).err().unwrap();
        assert_eq!(err, PixelGridError::InvalidRowStep { row_bytes: 4, row_step: 3 });

        let err = Image::from_bytes(PixelFormat::GrayU8, 4, 2, 6, &[0; 9]).err().unwrap();
        assert_eq!(err, PixelGridError::BufferTooSmall { needed: 10, got: 9 });

        let img = Image::from_bytes(PixelFormat::GrayU8, 2, 2, 3, &[1, 2, 0, 3, 4]).unwrap();
        assert_eq!(img.row(1), Some(&[3u8, 4][..]));
    }

    #[test]
    fn equality_ignores_row_padding() {
        let mut a = Image::new(PixelFormat::GrayU8, 3, 2).unwrap();
        let b = a.deep_clone();
        a.as_bytes_mut()[5] = 99;
        assert_eq!(a, b);
        a.as_bytes_mut()[1] = 7;
        assert_ne!(a, b);
    }

    #[test]
    fn erase_leaves_an_empty_image() {
        let mut img = Image::new(PixelFormat::RgbU16, 4, 4).unwrap();
        img.erase();
        assert!(img.is_empty());
        assert!(img.as_bytes().is_empty());
        assert_eq!(img.any_iter().visit(CountPixels), 0);
    }

    #[test]
    fn clone_to_replaces_destination() {
        let mut src = Image::new(PixelFormat::GrayU8, 2, 2).unwrap();
        src.put_pixel(1, 1, GrayU8::new(9)).unwrap();
        let mut dst = Image::default();
        src.clone_to(&mut dst);
        assert_eq!(dst, src);
    }

    #[test]
    fn sub_pixel_interpolates_between_neighbours() {
        let mut img = Image::new(PixelFormat::RgbF32, 2, 1).unwrap();
        img.put_pixel(1, 0, RgbF32::new(2.0, 4.0, 8.0)).unwrap();
        let value = img.sub_pixel(Coord::Pixel, 0.25, 0.0).unwrap();
        assert_eq!(value, PixelValue::from(RgbF32::new(0.5, 1.0, 2.0)));
        let value = img.sub_pixel(Coord::Normalized, 1.0, 1.0).unwrap();
        assert_eq!(value, PixelValue::from(RgbF32::new(2.0, 4.0, 8.0)));
    }

    #[test]
    fn display_reports_dimensions() {
        let img = Image::new(PixelFormat::GrayU8, 4, 3).unwrap();
        assert_eq!(img.to_string(), "width : 4 height : 3");
    }

    struct CountPixels;

    impl<'a> crate::iter::CursorVisitor<'a> for CountPixels {
        type Output = usize;

        fn visit<P: crate::pixel::PixelType>(self, cursor: crate::iter::Iter2d<'a, P>) -> usize {
            cursor.pixels().count()
        }
    }
}
