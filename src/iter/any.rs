//! Format-tagged cursors.
//!
//! `AnyIter2d` and `AnyIter2dMut` hold a cursor of whichever pixel type
//! matches a runtime format. Operators hand a visitor to `visit`, which is
//! monomorphized per layout.

use crate::iter::{Iter2d, Iter2dMut};
use crate::pixel::{
    ArgbF32, ArgbS16, ArgbS32, ArgbU16, ArgbU8, GrayF32, GrayS16, GrayS32, GrayU16, GrayU8,
    PixelFormat, PixelType, RgbF32, RgbS16, RgbS32, RgbU16, RgbU8,
};

/// Work run against a read-only cursor of any layout.
pub trait CursorVisitor<'a> {
    type Output;

    fn visit<P: PixelType>(self, cursor: Iter2d<'a, P>) -> Self::Output;
}

/// Work run against a read-write cursor of any layout.
pub trait CursorVisitorMut<'a> {
    type Output;

    fn visit<P: PixelType>(self, cursor: Iter2dMut<'a, P>) -> Self::Output;
}

macro_rules! any_cursor {
    ($name:ident, $cursor:ident, $visitor:ident, [$($alias:ident),* $(,)?]) => {
        /// Cursor over whichever pixel type matches the image format.
        pub enum $name<'a> {
            $($alias($cursor<'a, $alias>),)*
        }

        impl<'a> $name<'a> {
            /// Format of the wrapped cursor.
            pub fn format(&self) -> PixelFormat {
                match self {
                    $($name::$alias(_) => PixelFormat::$alias,)*
                }
            }

            /// Runs `visitor` against the wrapped cursor.
            pub fn visit<V: $visitor<'a>>(self, visitor: V) -> V::Output {
                match self {
                    $($name::$alias(cursor) => visitor.visit(cursor),)*
                }
            }
        }

        $(
            impl<'a> From<$cursor<'a, $alias>> for $name<'a> {
                fn from(cursor: $cursor<'a, $alias>) -> Self {
                    $name::$alias(cursor)
                }
            }
        )*
    };
}

any_cursor!(
    AnyIter2d,
    Iter2d,
    CursorVisitor,
    [
        GrayU8, RgbU8, ArgbU8, GrayU16, RgbU16, ArgbU16, GrayS16, RgbS16, ArgbS16, GrayS32,
        RgbS32, ArgbS32, GrayF32, RgbF32, ArgbF32,
    ]
);

any_cursor!(
    AnyIter2dMut,
    Iter2dMut,
    CursorVisitorMut,
    [
        GrayU8, RgbU8, ArgbU8, GrayU16, RgbU16, ArgbU16, GrayS16, RgbS16, ArgbS16, GrayS32,
        RgbS32, ArgbS32, GrayF32, RgbF32, ArgbF32,
    ]
);

#[cfg(test)]
mod tests {
    use super::{AnyIter2d, CursorVisitor};
    use crate::iter::Iter2d;
    use crate::pixel::{GrayU16, PixelFormat, PixelType};

    struct CountPixels;

    impl<'a> CursorVisitor<'a> for CountPixels {
        type Output = usize;

        fn visit<P: PixelType>(self, cursor: Iter2d<'a, P>) -> usize {
            cursor.pixels().count()
        }
    }

    #[test]
    fn visit_reaches_the_typed_cursor() {
        let data = [0u8; 12];
        let any = AnyIter2d::from(Iter2d::<GrayU16>::new(&data[..], 0, 3, 2, 6));
        assert_eq!(any.format(), PixelFormat::GrayU16);
        assert_eq!(any.visit(CountPixels), 6);
    }
}
