//! Borrowed rectangular windows into an `Image`.

use crate::image::{any_iter, any_iter_mut, check_pixel_type, Coord, Image};
use crate::iter::{AnyIter2d, AnyIter2dMut, Iter2d, Iter2dMut};
use crate::pixel::{
    ArgbU8, ChannelDepth, ColorSpace, GrayF32, GrayU8, PixelFormat, PixelType, PixelValue, RgbF32,
    RgbU8,
};
use crate::util::math::round_half_up;
use crate::util::{Layout, PixelGridError, PixelGridResult};
use std::fmt;

/// Pixel rectangle inside an image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Validates a rectangle with a signed origin against image dimensions.
    fn fit(
        x: i64,
        y: i64,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    ) -> PixelGridResult<Self> {
        let out_of_bounds = PixelGridError::ViewOutOfBounds {
            x,
            y,
            width,
            height,
            img_width,
            img_height,
        };
        if x < 0 || y < 0 {
            return Err(out_of_bounds);
        }
        let (ux, uy) = (x as usize, y as usize);
        let end_x = ux.checked_add(width).ok_or(out_of_bounds.clone())?;
        let end_y = uy.checked_add(height).ok_or(out_of_bounds.clone())?;
        if end_x > img_width || end_y > img_height {
            return Err(out_of_bounds);
        }
        Ok(Self::new(ux, uy, width, height))
    }

    fn from_unsigned(
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        image: &Image,
    ) -> PixelGridResult<Self> {
        let to_signed = |v: usize| i64::try_from(v).unwrap_or(i64::MAX);
        Self::fit(to_signed(x), to_signed(y), width, height, image.width, image.height)
    }

    /// Converts float coordinates with one rounding rule for every component.
    fn from_coords(coord: Coord, bounds: [f32; 4], image: &Image) -> PixelGridResult<Self> {
        let [x, y, width, height] = bounds;
        let (x, y, width, height) = match coord {
            Coord::Pixel => (x, y, width, height),
            Coord::Normalized => {
                let (w, h) = (image.width as f32, image.height as f32);
                (x * w, y * h, width * w, height * h)
            }
        };
        let (width, height) = (round_half_up(width), round_half_up(height));
        if width < 0 || height < 0 {
            return Err(PixelGridError::InvalidInput("view size must not be negative"));
        }
        Self::fit(
            round_half_up(x),
            round_half_up(y),
            width as usize,
            height as usize,
            image.width,
            image.height,
        )
    }

    fn moved_to(&self, x: i64, y: i64, image: &Image) -> PixelGridResult<Self> {
        Self::fit(x, y, self.width, self.height, image.width, image.height)
    }

    fn moved_by(&self, dx: i64, dy: i64, image: &Image) -> PixelGridResult<Self> {
        let x = (self.x as i64).saturating_add(dx);
        let y = (self.y as i64).saturating_add(dy);
        self.moved_to(x, y, image)
    }

    fn origin(&self, image: &Image) -> usize {
        self.y * image.row_step + self.x * image.bytes_per_pixel()
    }

    fn offset(&self, image: &Image, x: usize, y: usize) -> usize {
        (self.y + y) * image.row_step + (self.x + x) * image.bytes_per_pixel()
    }
}

/// Shared window into an image.
#[derive(Clone, Copy, Debug)]
pub struct View<'a> {
    image: &'a Image,
    rect: Rect,
}

/// Exclusive window into an image.
#[derive(Debug)]
pub struct ViewMut<'a> {
    image: &'a mut Image,
    rect: Rect,
}

impl<'a> View<'a> {
    /// Views the whole image.
    pub fn new(image: &'a Image) -> Self {
        let rect = Rect::new(0, 0, image.width, image.height);
        Self { image, rect }
    }

    /// Views a pixel rectangle; it must lie inside the image.
    pub fn with_rect(
        image: &'a Image,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> PixelGridResult<Self> {
        let rect = Rect::from_unsigned(x, y, width, height, image)?;
        Ok(Self { image, rect })
    }

    /// Views a rectangle given in pixel or normalized coordinates.
    ///
    /// Every component is rounded to the nearest pixel.
    pub fn from_coords(
        image: &'a Image,
        coord: Coord,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> PixelGridResult<Self> {
        let rect = Rect::from_coords(coord, [x, y, width, height], image)?;
        Ok(Self { image, rect })
    }

    pub fn image(&self) -> &'a Image {
        self.image
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn x(&self) -> usize {
        self.rect.x
    }

    pub fn y(&self) -> usize {
        self.rect.y
    }

    pub fn width(&self) -> usize {
        self.rect.width
    }

    pub fn height(&self) -> usize {
        self.rect.height
    }

    pub fn format(&self) -> PixelFormat {
        self.image.format
    }

    pub fn color_space(&self) -> ColorSpace {
        self.image.format.color_space()
    }

    pub fn channel_depth(&self) -> ChannelDepth {
        self.image.format.channel_depth()
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.image.bytes_per_pixel()
    }

    /// Row stride, shared with the parent image.
    pub fn row_step(&self) -> usize {
        self.image.row_step
    }

    pub fn layout(&self) -> Layout {
        Layout {
            format: self.image.format,
            width: self.rect.width,
            height: self.rect.height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rect.width == 0 || self.rect.height == 0
    }

    /// Shifts the window; on error the view is unchanged.
    pub fn move_by(&mut self, dx: i64, dy: i64) -> PixelGridResult<()> {
        self.rect = self.rect.moved_by(dx, dy, self.image)?;
        Ok(())
    }

    /// Places the window origin at `(x, y)`; on error the view is unchanged.
    pub fn move_to(&mut self, x: i64, y: i64) -> PixelGridResult<()> {
        self.rect = self.rect.moved_to(x, y, self.image)?;
        Ok(())
    }

    /// Returns the pixel bytes of view row `y`.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.rect.height {
            return None;
        }
        let start = self.rect.offset(self.image, 0, y);
        self.image
            .data
            .get(start..start + self.rect.width * self.bytes_per_pixel())
    }

    /// Reads the pixel at view coordinates `(x, y)`.
    pub fn pixel<P: PixelType>(&self, x: usize, y: usize) -> Option<P> {
        if P::FORMAT != self.format() || x >= self.rect.width || y >= self.rect.height {
            return None;
        }
        Some(self.read(x, y))
    }

    fn read<P: PixelType>(&self, x: usize, y: usize) -> P {
        let start = self.rect.offset(self.image, x, y);
        P::read(&self.image.data[start..start + P::BYTES])
    }

    /// Typed cursor over the window; `P` must match the format.
    pub fn iter2d<P: PixelType>(&self) -> PixelGridResult<Iter2d<'a, P>> {
        check_pixel_type::<P>(self.format(), "iter2d")?;
        Ok(Iter2d::new(
            &self.image.data,
            self.rect.origin(self.image),
            self.rect.width,
            self.rect.height,
            self.image.row_step,
        ))
    }

    /// Cursor of whichever pixel type matches the format.
    pub fn any_iter(&self) -> AnyIter2d<'a> {
        any_iter(
            self.format(),
            &self.image.data,
            self.rect.origin(self.image),
            self.rect.width,
            self.rect.height,
            self.image.row_step,
        )
    }

    /// Bilinearly samples the window.
    ///
    /// Pixel coordinates are relative to the view origin; normalized
    /// coordinates are fractions of the view size.
    pub fn sub_pixel(&self, coord: Coord, x: f32, y: f32) -> PixelGridResult<PixelValue> {
        if self.is_empty() {
            return Err(PixelGridError::InvalidDimensions {
                width: self.rect.width,
                height: self.rect.height,
            });
        }
        let (x, y) = match coord {
            Coord::Pixel => (x, y),
            Coord::Normalized => (
                x.clamp(0.0, 1.0) * self.rect.width as f32,
                y.clamp(0.0, 1.0) * self.rect.height as f32,
            ),
        };
        match self.format() {
            PixelFormat::GrayU8 => Ok(self.bilinear::<GrayU8>(x, y).into_value()),
            PixelFormat::GrayF32 => Ok(self.bilinear::<GrayF32>(x, y).into_value()),
            PixelFormat::RgbU8 => Ok(self.bilinear::<RgbU8>(x, y).into_value()),
            PixelFormat::RgbF32 => Ok(self.bilinear::<RgbF32>(x, y).into_value()),
            PixelFormat::ArgbU8 => Ok(self.bilinear::<ArgbU8>(x, y).into_value()),
            format => Err(PixelGridError::UnsupportedFormat {
                op: "sub_pixel",
                format,
            }),
        }
    }

    fn bilinear<P: PixelType>(&self, x: f32, y: f32) -> P {
        let max_x = self.rect.width - 1;
        let max_y = self.rect.height - 1;
        // NaN collapses to the origin through `max`.
        let x = x.max(0.0).min(max_x as f32);
        let y = y.max(0.0).min(max_y as f32);
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = ((x0 + 1).min(max_x), (y0 + 1).min(max_y));
        let tx = f64::from(x - x0 as f32);
        let ty = f64::from(y - y0 as f32);

        let taps = [
            (x0, y0, (1.0 - tx) * (1.0 - ty)),
            (x1, y0, tx * (1.0 - ty)),
            (x0, y1, (1.0 - tx) * ty),
            (x1, y1, tx * ty),
        ];
        let mut acc = [0.0f64; 4];
        for (px, py, w) in taps {
            if w == 0.0 {
                continue;
            }
            for (a, s) in acc.iter_mut().zip(self.read::<P>(px, py).to_f64s()) {
                *a += w * s;
            }
        }
        P::from_f64s(acc)
    }

    /// Copies the window into a new tightly sized image.
    pub fn to_image(&self) -> PixelGridResult<Image> {
        let mut out = Image::new(self.format(), self.rect.width, self.rect.height)?;
        for y in 0..self.rect.height {
            if let (Some(src), Some(dst)) = (self.row(y), out.row_mut(y)) {
                dst.copy_from_slice(src);
            }
        }
        Ok(out)
    }
}

impl<'a> ViewMut<'a> {
    /// Views the whole image.
    pub fn new(image: &'a mut Image) -> Self {
        let rect = Rect::new(0, 0, image.width, image.height);
        Self { image, rect }
    }

    /// Views a pixel rectangle; it must lie inside the image.
    pub fn with_rect(
        image: &'a mut Image,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> PixelGridResult<Self> {
        let rect = Rect::from_unsigned(x, y, width, height, image)?;
        Ok(Self { image, rect })
    }

    /// Views a rectangle given in pixel or normalized coordinates.
    pub fn from_coords(
        image: &'a mut Image,
        coord: Coord,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> PixelGridResult<Self> {
        let rect = Rect::from_coords(coord, [x, y, width, height], image)?;
        Ok(Self { image, rect })
    }

    /// Shared view of the same window.
    pub fn view(&self) -> View<'_> {
        View {
            image: &*self.image,
            rect: self.rect,
        }
    }

    /// Converts into a shared view with the full borrow lifetime.
    pub fn into_view(self) -> View<'a> {
        View {
            image: self.image,
            rect: self.rect,
        }
    }

    /// Shorter-lived exclusive view of the same window.
    pub fn reborrow(&mut self) -> ViewMut<'_> {
        ViewMut {
            image: &mut *self.image,
            rect: self.rect,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn width(&self) -> usize {
        self.rect.width
    }

    pub fn height(&self) -> usize {
        self.rect.height
    }

    pub fn format(&self) -> PixelFormat {
        self.image.format
    }

    pub fn layout(&self) -> Layout {
        self.view().layout()
    }

    /// Shifts the window; on error the view is unchanged.
    pub fn move_by(&mut self, dx: i64, dy: i64) -> PixelGridResult<()> {
        self.rect = self.rect.moved_by(dx, dy, &*self.image)?;
        Ok(())
    }

    /// Places the window origin at `(x, y)`; on error the view is unchanged.
    pub fn move_to(&mut self, x: i64, y: i64) -> PixelGridResult<()> {
        self.rect = self.rect.moved_to(x, y, &*self.image)?;
        Ok(())
    }

    /// Returns the mutable pixel bytes of view row `y`.
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        if y >= self.rect.height {
            return None;
        }
        let start = self.rect.offset(&*self.image, 0, y);
        let end = start + self.rect.width * self.image.bytes_per_pixel();
        self.image.data.get_mut(start..end)
    }

    /// Typed mutable cursor over the window; `P` must match the format.
    pub fn iter2d_mut<P: PixelType>(&mut self) -> PixelGridResult<Iter2dMut<'_, P>> {
        check_pixel_type::<P>(self.format(), "iter2d_mut")?;
        let origin = self.rect.origin(&*self.image);
        let row_step = self.image.row_step;
        Ok(Iter2dMut::new(
            &mut self.image.data,
            origin,
            self.rect.width,
            self.rect.height,
            row_step,
        ))
    }

    /// Mutable cursor of whichever pixel type matches the format.
    pub fn any_iter_mut(&mut self) -> AnyIter2dMut<'_> {
        let origin = self.rect.origin(&*self.image);
        let (format, row_step) = (self.image.format, self.image.row_step);
        any_iter_mut(
            format,
            &mut self.image.data,
            origin,
            self.rect.width,
            self.rect.height,
            row_step,
        )
    }

    /// Writes the pixel at view coordinates `(x, y)`.
    pub fn put_pixel<P: PixelType>(&mut self, x: usize, y: usize, pixel: P) -> PixelGridResult<()> {
        check_pixel_type::<P>(self.format(), "put_pixel")?;
        if x >= self.rect.width || y >= self.rect.height {
            return Err(PixelGridError::PixelOutOfBounds {
                x: x as i64,
                y: y as i64,
                width: self.rect.width,
                height: self.rect.height,
            });
        }
        let start = self.rect.offset(&*self.image, x, y);
        pixel.write(&mut self.image.data[start..start + P::BYTES]);
        Ok(())
    }

    /// Writes one pixel at a rounded coordinate. Supports GRAY_U8 only.
    ///
    /// Normalized coordinates map `[0, 1]` onto `[0, width - 1]`.
    pub fn set_pixel(&mut self, coord: Coord, x: f32, y: f32, value: PixelValue) -> PixelGridResult<()> {
        let format = self.format();
        if format != PixelFormat::GrayU8 {
            return Err(PixelGridError::UnsupportedFormat {
                op: "set_pixel",
                format,
            });
        }
        let pixel = value.expect_format::<GrayU8>("set_pixel")?;
        let (px, py) = match coord {
            Coord::Pixel => (round_half_up(x), round_half_up(y)),
            Coord::Normalized => (
                round_half_up(x.clamp(0.0, 1.0) * self.rect.width.saturating_sub(1) as f32),
                round_half_up(y.clamp(0.0, 1.0) * self.rect.height.saturating_sub(1) as f32),
            ),
        };
        let (width, height) = (self.rect.width, self.rect.height);
        if px < 0 || py < 0 || px as usize >= width || py as usize >= height {
            return Err(PixelGridError::PixelOutOfBounds {
                x: px,
                y: py,
                width,
                height,
            });
        }
        self.put_pixel(px as usize, py as usize, pixel)
    }
}

impl fmt::Display for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x : {} y : {} width : {} height : {}",
            self.rect.x, self.rect.y, self.rect.width, self.rect.height
        )
    }
}

/// Anything an operator can read pixels from.
pub trait ImageSource {
    fn source_view(&self) -> View<'_>;
}

/// Anything an operator can write pixels into.
pub trait ImageTarget: ImageSource {
    fn target_view(&mut self) -> ViewMut<'_>;
}

impl ImageSource for Image {
    fn source_view(&self) -> View<'_> {
        View::new(self)
    }
}

impl ImageSource for View<'_> {
    fn source_view(&self) -> View<'_> {
        *self
    }
}

impl ImageSource for ViewMut<'_> {
    fn source_view(&self) -> View<'_> {
        self.view()
    }
}

impl ImageTarget for Image {
    fn target_view(&mut self) -> ViewMut<'_> {
        ViewMut::new(self)
    }
}

impl ImageTarget for ViewMut<'_> {
    fn target_view(&mut self) -> ViewMut<'_> {
        self.reborrow()
    }
}

#[cfg(test)]
mod tests {
    use super::View;
    use crate::image::{Coord, Image};
    use crate::pixel::{ArgbU8, GrayS16, GrayU8, PixelFormat, PixelValue, RgbU8};
    use crate::util::PixelGridError;

    #[test]
    fn with_rect_rejects_overflowing_windows() {
        let img = Image::new(PixelFormat::GrayU8, 4, 3).unwrap();
        let err = View::with_rect(&img, 2, 1, 3, 1).err().unwrap();
        assert_eq!(
            err,
            PixelGridError::ViewOutOfBounds {
                x: 2,
                y: 1,
                width: 3,
                height: 1,
                img_width: 4,
                img_height: 3,
            }
        );
        assert!(View::with_rect(&img, 2, 1, 2, 2).is_ok());
    }

    #[test]
    fn normalized_coords_round_every_component() {
        let img = Image::new(PixelFormat::GrayU8, 10, 7).unwrap();
        let view = View::from_coords(&img, Coord::Normalized, 0.25, 0.5, 0.5, 0.25).unwrap();
        // 2.5 -> 3, 3.5 -> 4, 5.0 -> 5, 1.75 -> 2
        assert_eq!((view.x(), view.y(), view.width(), view.height()), (3, 4, 5, 2));
    }

    #[test]
    fn failed_move_leaves_view_unchanged() {
        let img = Image::new(PixelFormat::GrayU8, 4, 4).unwrap();
        let mut view = View::with_rect(&img, 1, 1, 2, 2).unwrap();
        assert!(view.move_by(2, 0).is_err());
        assert_eq!((view.x(), view.y()), (1, 1));
        view.move_by(1, -1).unwrap();
        assert_eq!((view.x(), view.y()), (2, 0));
        assert!(view.move_to(-1, 0).is_err());
        view.move_to(0, 2).unwrap();
        assert_eq!((view.x(), view.y()), (0, 2));
    }

    #[test]
    fn view_sub_pixel_is_view_relative() {
        let mut img = Image::new(PixelFormat::GrayU8, 4, 4).unwrap();
        img.put_pixel(3, 2, GrayU8::new(80)).unwrap();
        let view = View::with_rect(&img, 2, 2, 2, 2).unwrap();
        let value = view.sub_pixel(Coord::Pixel, 1.0, 0.0).unwrap();
        assert_eq!(value, PixelValue::from(GrayU8::new(80)));
        let value = view.sub_pixel(Coord::Pixel, 0.5, 0.0).unwrap();
        assert_eq!(value, PixelValue::from(GrayU8::new(40)));
    }

    #[test]
    fn sub_pixel_of_constant_u8_images_is_the_constant() {
        let mut gray = Image::new(PixelFormat::GrayU8, 4, 4).unwrap();
        crate::ops::fill(&mut gray, GrayU8::new(3).into()).unwrap();
        for (x, y) in [(0.5, 0.0), (1.5, 2.5), (0.3, 0.7), (2.75, 1.25)] {
            let value = gray.sub_pixel(Coord::Pixel, x, y).unwrap();
            assert_eq!(value, PixelValue::from(GrayU8::new(3)), "({x}, {y})");
        }

        let mut rgb = Image::new(PixelFormat::RgbU8, 4, 4).unwrap();
        crate::ops::fill(&mut rgb, RgbU8::new(1, 101, 201).into()).unwrap();
        let value = rgb.sub_pixel(Coord::Pixel, 1.5, 2.5).unwrap();
        assert_eq!(value, PixelValue::from(RgbU8::new(1, 101, 201)));

        let mut argb = Image::new(PixelFormat::ArgbU8, 3, 3).unwrap();
        crate::ops::fill(&mut argb, ArgbU8::new(255, 7, 9, 11).into()).unwrap();
        let value = argb.sub_pixel(Coord::Normalized, 0.4, 0.6).unwrap();
        assert_eq!(value, PixelValue::from(ArgbU8::new(255, 7, 9, 11)));
    }

    #[test]
    fn sub_pixel_blends_four_neighbours_once() {
        let mut img = Image::new(PixelFormat::GrayU8, 2, 2).unwrap();
        img.put_pixel(0, 0, GrayU8::new(10)).unwrap();
        img.put_pixel(1, 0, GrayU8::new(11)).unwrap();
        img.put_pixel(0, 1, GrayU8::new(11)).unwrap();
        img.put_pixel(1, 1, GrayU8::new(12)).unwrap();
        // 0.25 * (10 + 11 + 11 + 12) = 11 exactly.
        let value = img.sub_pixel(Coord::Pixel, 0.5, 0.5).unwrap();
        assert_eq!(value, PixelValue::from(GrayU8::new(11)));
    }

    #[test]
    fn sub_pixel_reports_unsupported_formats() {
        let img = Image::new(PixelFormat::GrayS16, 2, 2).unwrap();
        let err = img.sub_pixel(Coord::Pixel, 0.0, 0.0).err().unwrap();
        assert_eq!(
            err,
            PixelGridError::UnsupportedFormat {
                op: "sub_pixel",
                format: PixelFormat::GrayS16,
            }
        );
    }

    #[test]
    fn set_pixel_validates_format_and_bounds() {
        let mut img = Image::new(PixelFormat::GrayU8, 4, 3).unwrap();
        let err = img
            .set_pixel(Coord::Pixel, 4.0, 0.0, GrayU8::new(1).into())
            .err()
            .unwrap();
        assert_eq!(
            err,
            PixelGridError::PixelOutOfBounds {
                x: 4,
                y: 0,
                width: 4,
                height: 3,
            }
        );
        let err = img
            .set_pixel(Coord::Pixel, 0.0, 0.0, GrayS16::new(1).into())
            .err()
            .unwrap();
        assert_eq!(
            err,
            PixelGridError::FormatMismatch {
                op: "set_pixel",
                expected: PixelFormat::GrayU8,
                got: PixelFormat::GrayS16,
            }
        );
        img.set_pixel(Coord::Normalized, 1.0, 1.0, GrayU8::new(5).into())
            .unwrap();
        assert_eq!(img.pixel::<GrayU8>(3, 2), Some(GrayU8::new(5)));
    }

    #[test]
    fn to_image_copies_the_window() {
        let mut img = Image::new(PixelFormat::GrayU8, 3, 3).unwrap();
        img.put_pixel(2, 2, GrayU8::new(7)).unwrap();
        let crop = img.sub_view(1, 1, 2, 2).unwrap().to_image().unwrap();
        assert_eq!(crop.width(), 2);
        assert_eq!(crop.pixel::<GrayU8>(1, 1), Some(GrayU8::new(7)));
    }
}
