//! Pixel operators over images and views.
//!
//! Each operator takes its source as any [`ImageSource`] and its destination
//! as any [`ImageTarget`], so the same call works on whole images and on
//! views. Formats are resolved once per call; the per-pixel loops are
//! monomorphized for the concrete pixel type.
//!
//! [`ImageSource`]: crate::image::ImageSource
//! [`ImageTarget`]: crate::image::ImageTarget

mod blur;
mod convert;
mod copy;
mod fill;
mod resize;

pub use blur::{blur, blur_kernel_size};
pub use convert::{convert, convert_channel_depth, convert_color_space};
pub use copy::copy;
pub use fill::{fill, min_max, set_to_zero};
pub use resize::{resize, resize_by_step};

use crate::image::{View, ViewMut};
use crate::util::{PixelGridError, PixelGridResult};

/// Resampling kernel used by [`resize`] and [`resize_by_step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    Nearest,
    Bilinear,
    #[default]
    Bicubic,
}

/// Smoothing kernel used by [`blur`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlurType {
    #[default]
    Gaussian,
}

/// Fails unless both sides share format, width and height.
fn same_layout(op: &'static str, src: &View<'_>, dst: &ViewMut<'_>) -> PixelGridResult<()> {
    if src.layout() != dst.layout() {
        return Err(PixelGridError::LayoutMismatch {
            op,
            src: src.layout(),
            dst: dst.layout(),
        });
    }
    Ok(())
}

/// Fails unless both sides share width and height.
fn same_size(op: &'static str, src: &View<'_>, dst: &ViewMut<'_>) -> PixelGridResult<()> {
    if src.width() != dst.width() || src.height() != dst.height() {
        return Err(PixelGridError::LayoutMismatch {
            op,
            src: src.layout(),
            dst: dst.layout(),
        });
    }
    Ok(())
}

/// Pixel rows of a view, without padding.
fn rows<'a>(view: &View<'a>) -> Vec<&'a [u8]> {
    (0..view.height()).filter_map(|y| view.row(y)).collect()
}
