use crate::image::{ImageSource, ImageTarget};
use crate::iter::{CursorVisitor, CursorVisitorMut, Iter2d, Iter2dMut};
use crate::pixel::{PixelType, PixelValue};
use crate::util::PixelGridResult;

struct Fill(PixelValue);

impl<'a> CursorVisitorMut<'a> for Fill {
    type Output = PixelGridResult<()>;

    fn visit<P: PixelType>(self, mut cursor: Iter2dMut<'a, P>) -> Self::Output {
        let pixel = self.0.expect_format::<P>("fill")?;
        cursor.update_each(|_| pixel);
        Ok(())
    }
}

struct MinMax;

impl<'a> CursorVisitor<'a> for MinMax {
    type Output = (PixelValue, PixelValue);

    fn visit<P: PixelType>(self, mut cursor: Iter2d<'a, P>) -> Self::Output {
        let mut min = P::MAX_VALUE;
        let mut max = P::MIN_VALUE;
        cursor.for_each_pixel(|pixel| {
            if pixel < min {
                min = pixel;
            }
            if pixel > max {
                max = pixel;
            }
        });
        (min.into_value(), max.into_value())
    }
}

/// Sets every pixel of `target` to `value`.
///
/// `value` must have the target's format.
pub fn fill<T: ImageTarget + ?Sized>(target: &mut T, value: PixelValue) -> PixelGridResult<()> {
    target.target_view().any_iter_mut().visit(Fill(value))
}

/// Sets every pixel of `target` to zero.
pub fn set_to_zero<T: ImageTarget + ?Sized>(target: &mut T) {
    let mut view = target.target_view();
    for y in 0..view.height() {
        if let Some(row) = view.row_mut(y) {
            row.fill(0);
        }
    }
}

/// Returns the smallest and largest pixel in `src`.
///
/// An empty source reports the format's `(MAX_VALUE, MIN_VALUE)` sentinels.
pub fn min_max<S: ImageSource + ?Sized>(src: &S) -> (PixelValue, PixelValue) {
    src.source_view().any_iter().visit(MinMax)
}
