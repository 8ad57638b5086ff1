//! Row/column cursors and format-tagged cursor unions.

mod any;
mod cursor;

pub use any::{AnyIter2d, AnyIter2dMut, CursorVisitor, CursorVisitorMut};
pub use cursor::{copy_pixels, Cursor2d, Iter2d, Iter2dMut, Pixels};
