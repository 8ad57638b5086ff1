//! Row/column cursor over a strided byte buffer.
//!
//! The cursor tracks byte offsets rather than pointers:
//! `offset(x, y) = origin + y * row_step + x * P::BYTES`. It walks scanlines
//! top to bottom and pixels left to right. Stepping past the end of a row
//! without calling `next_row` is a caller error; reads then panic on the slice
//! bounds instead of touching foreign memory.

use crate::pixel::PixelType;
use crate::util::{Layout, PixelGridError, PixelGridResult};
use std::marker::PhantomData;

/// Cursor over `P` pixels stored in buffer `B`.
pub struct Cursor2d<B, P> {
    buf: B,
    first_row: usize,
    last_row: usize,
    row_step: usize,
    row_begin: usize,
    row_end: usize,
    pos: usize,
    width: usize,
    height: usize,
    _pixel: PhantomData<fn() -> P>,
}

/// Read-only cursor.
pub type Iter2d<'a, P> = Cursor2d<&'a [u8], P>;

/// Read-write cursor.
pub type Iter2dMut<'a, P> = Cursor2d<&'a mut [u8], P>;

impl<B: AsRef<[u8]>, P: PixelType> Cursor2d<B, P> {
    /// Creates a cursor whose first pixel starts at byte `origin`.
    ///
    /// Callers guarantee that every row `origin + y * row_step` holds at
    /// least `width * P::BYTES` bytes for `y < height`.
    pub(crate) fn new(buf: B, origin: usize, width: usize, height: usize, row_step: usize) -> Self {
        let row_bytes = width * P::BYTES;
        debug_assert!(height == 0 || row_step >= row_bytes);
        debug_assert!(height == 0 || origin + (height - 1) * row_step + row_bytes <= buf.as_ref().len());
        Self {
            buf,
            first_row: origin,
            last_row: origin + height * row_step,
            row_step,
            row_begin: origin,
            row_end: origin + row_bytes,
            pos: origin,
            width,
            height,
            _pixel: PhantomData,
        }
    }

    /// Advances to the next pixel of the current row.
    #[inline]
    pub fn next_x(&mut self) {
        self.pos += P::BYTES;
    }

    /// Steps back to the previous pixel of the current row.
    #[inline]
    pub fn prev_x(&mut self) {
        self.pos = self.pos.saturating_sub(P::BYTES);
    }

    /// Moves to the beginning of the next row.
    #[inline]
    pub fn next_row(&mut self) {
        self.row_begin += self.row_step;
        self.row_end += self.row_step;
        self.pos = self.row_begin;
    }

    /// Returns true once every row has been visited.
    #[inline]
    pub fn is_ended(&self) -> bool {
        self.row_begin >= self.last_row
    }

    /// Returns true once the current row has been visited.
    #[inline]
    pub fn is_row_ended(&self) -> bool {
        self.pos >= self.row_end
    }

    /// Reads the pixel under the cursor.
    #[inline]
    pub fn get(&self) -> P {
        P::read(&self.buf.as_ref()[self.pos..self.pos + P::BYTES])
    }

    /// Restarts the walk at the first pixel.
    pub fn rewind(&mut self) {
        self.row_begin = self.first_row;
        self.row_end = self.first_row + self.width * P::BYTES;
        self.pos = self.first_row;
    }

    /// Pixel bytes of the current row, without row padding.
    pub fn row_bytes(&self) -> &[u8] {
        &self.buf.as_ref()[self.row_begin..self.row_end]
    }

    /// Column and row of the pixel under the cursor.
    pub fn position(&self) -> (usize, usize) {
        let x = (self.pos - self.row_begin) / P::BYTES;
        let y = if self.row_step == 0 {
            0
        } else {
            (self.row_begin - self.first_row) / self.row_step
        };
        (x, y)
    }

    /// Byte offset of the first pixel.
    pub fn first_row(&self) -> usize {
        self.first_row
    }

    /// Byte offset one row past the last row.
    pub fn last_row(&self) -> usize {
        self.last_row
    }

    /// Byte offset of the current row's first pixel.
    pub fn row_begin(&self) -> usize {
        self.row_begin
    }

    /// Byte offset one past the current row's last pixel.
    pub fn row_end(&self) -> usize {
        self.row_end
    }

    /// Bytes between consecutive rows.
    pub fn row_step(&self) -> usize {
        self.row_step
    }

    /// Pixels per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    pub(crate) fn layout(&self) -> Layout {
        Layout {
            format: P::FORMAT,
            width: self.width,
            height: self.height,
        }
    }

    /// Visits every remaining pixel in row-major order.
    pub fn for_each_pixel<F: FnMut(P)>(&mut self, mut f: F) {
        while !self.is_ended() {
            while !self.is_row_ended() {
                f(self.get());
                self.next_x();
            }
            self.next_row();
        }
    }

    /// Visits every remaining pixel together with its `(x, y)` position.
    pub fn for_each_indexed<F: FnMut(usize, usize, P)>(&mut self, mut f: F) {
        while !self.is_ended() {
            while !self.is_row_ended() {
                let (x, y) = self.position();
                f(x, y, self.get());
                self.next_x();
            }
            self.next_row();
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>, P: PixelType> Cursor2d<B, P> {
    /// Writes the pixel under the cursor.
    #[inline]
    pub fn set(&mut self, pixel: P) {
        let pos = self.pos;
        pixel.write(&mut self.buf.as_mut()[pos..pos + P::BYTES]);
    }

    /// Mutable pixel bytes of the current row, without row padding.
    pub fn row_bytes_mut(&mut self) -> &mut [u8] {
        let (begin, end) = (self.row_begin, self.row_end);
        &mut self.buf.as_mut()[begin..end]
    }

    /// Replaces every remaining pixel with `f(pixel)`.
    pub fn update_each<F: FnMut(P) -> P>(&mut self, mut f: F) {
        while !self.is_ended() {
            while !self.is_row_ended() {
                let pixel = f(self.get());
                self.set(pixel);
                self.next_x();
            }
            self.next_row();
        }
    }

    /// Replaces every remaining pixel with `f(x, y, pixel)`.
    pub fn update_each_indexed<F: FnMut(usize, usize, P) -> P>(&mut self, mut f: F) {
        while !self.is_ended() {
            while !self.is_row_ended() {
                let (x, y) = self.position();
                let pixel = f(x, y, self.get());
                self.set(pixel);
                self.next_x();
            }
            self.next_row();
        }
    }
}

impl<'a, P: PixelType> Iter2d<'a, P> {
    /// Converts the cursor into a standard iterator over remaining pixels.
    pub fn pixels(self) -> Pixels<'a, P> {
        Pixels { cursor: self }
    }
}

/// Row-major iterator over pixel values.
pub struct Pixels<'a, P> {
    cursor: Iter2d<'a, P>,
}

impl<P: PixelType> Iterator for Pixels<'_, P> {
    type Item = P;

    fn next(&mut self) -> Option<P> {
        loop {
            if self.cursor.is_ended() {
                return None;
            }
            if self.cursor.is_row_ended() {
                self.cursor.next_row();
                continue;
            }
            let pixel = self.cursor.get();
            self.cursor.next_x();
            return Some(pixel);
        }
    }
}

/// Copies pixels from `src` to `dst`, walking both cursors in lockstep.
///
/// Both cursors must span the same number of rows and columns.
pub fn copy_pixels<P: PixelType>(
    dst: &mut Iter2dMut<'_, P>,
    src: &mut Iter2d<'_, P>,
) -> PixelGridResult<()> {
    if dst.width() != src.width() || dst.height() != src.height() {
        return Err(PixelGridError::LayoutMismatch {
            op: "copy_pixels",
            src: src.layout(),
            dst: dst.layout(),
        });
    }
    while !dst.is_ended() {
        while !dst.is_row_ended() {
            dst.set(src.get());
            dst.next_x();
            src.next_x();
        }
        src.next_row();
        dst.next_row();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{copy_pixels, Iter2d, Iter2dMut};
    use crate::pixel::{GrayU8, RgbU8};

    #[test]
    fn cursor_honours_origin_and_stride() {
        // 3x2 window at (1, 1) inside a 5-byte-stride buffer.
        let data: Vec<u8> = (0u8..20).collect();
        let mut it = Iter2d::<GrayU8>::new(&data, 6, 3, 2, 5);
        let mut seen = Vec::new();
        it.for_each_pixel(|p| seen.push(p.i));
        assert_eq!(seen, vec![6, 7, 8, 11, 12, 13]);
        assert!(it.is_ended());
    }

    #[test]
    fn prev_x_steps_back_one_pixel() {
        let data = [1u8, 2, 3, 4, 5, 6];
        let mut it = Iter2d::<RgbU8>::new(&data[..], 0, 2, 1, 6);
        it.next_x();
        assert_eq!(it.get(), RgbU8::new(6, 5, 4));
        it.prev_x();
        assert_eq!(it.get(), RgbU8::new(3, 2, 1));
        assert_eq!(it.position(), (0, 0));
    }

    #[test]
    fn copy_pixels_rejects_mismatched_extents() {
        let src = [0u8; 4];
        let mut dst = [0u8; 6];
        let mut it_src = Iter2d::<GrayU8>::new(&src[..], 0, 2, 2, 2);
        let mut it_dst = Iter2dMut::<GrayU8>::new(&mut dst[..], 0, 3, 2, 3);
        assert!(copy_pixels(&mut it_dst, &mut it_src).is_err());
    }

    #[test]
    fn copy_pixels_skips_row_padding() {
        let src = [1u8, 2, 99, 3, 4, 99];
        let mut dst = [0u8; 4];
        let mut it_src = Iter2d::<GrayU8>::new(&src[..], 0, 2, 2, 3);
        let mut it_dst = Iter2dMut::<GrayU8>::new(&mut dst[..], 0, 2, 2, 2);
        copy_pixels(&mut it_dst, &mut it_src).unwrap();
        assert_eq!(dst, [1, 2, 3, 4]);
    }
}
