//! Channel depth and color space conversion.

use crate::image::{Image, ImageSource, ImageTarget, View, ViewMut};
use crate::ops::{copy, min_max, rows, same_size};
use crate::pixel::{dispatch_format, ColorSpace, PixelFormat, PixelType};
use crate::trace::{trace_span, trace_warn};
use crate::util::{PixelGridError, PixelGridResult};

/// Per-pixel mapping applied while converting between layouts.
#[derive(Clone, Copy, Debug)]
enum Transform {
    Cast,
    Scale(f64),
    /// BGR(A) to gray with `0.299 R + 0.587 G + 0.114 B`.
    Luma,
}

impl Transform {
    #[inline]
    fn apply(self, [b, g, r, a]: [f64; 4]) -> [f64; 4] {
        match self {
            Transform::Cast => [b, g, r, a],
            Transform::Scale(k) => [b * k, g * k, r * k, a * k],
            Transform::Luma => [0.114 * b + 0.587 * g + 0.299 * r, 0.0, 0.0, 0.0],
        }
    }
}

fn map_pixels<S: PixelType, D: PixelType>(
    src: &View<'_>,
    dst: &mut ViewMut<'_>,
    transform: Transform,
) -> PixelGridResult<()> {
    let src_rows = rows(src);
    let mut cursor = dst.iter2d_mut::<D>()?;
    cursor.update_each_indexed(|x, y, _| {
        let pixel = S::read(&src_rows[y][x * S::BYTES..]);
        D::from_f64s(transform.apply(pixel.to_f64s()))
    });
    Ok(())
}

fn map_formats(src: &View<'_>, dst: &mut ViewMut<'_>, transform: Transform) -> PixelGridResult<()> {
    dispatch_format!(src.format(), S => {
        dispatch_format!(dst.format(), D => map_pixels::<S, D>(src, dst, transform))
    })
}

fn luma_supported(from: ColorSpace, to: ColorSpace) -> bool {
    matches!((from, to), (ColorSpace::Rgb | ColorSpace::Argb, ColorSpace::Gray))
}

fn channel_depth_into(src: &View<'_>, dst: &mut ViewMut<'_>) -> PixelGridResult<()> {
    same_size("convert_channel_depth", src, dst)?;
    if src.color_space() != dst.view().color_space() {
        return Err(PixelGridError::LayoutMismatch {
            op: "convert_channel_depth",
            src: src.layout(),
            dst: dst.layout(),
        });
    }
    if src.format() == dst.format() {
        return copy(src, dst);
    }
    let transform = match src.color_space() {
        ColorSpace::Gray => {
            let (_, max) = min_max(src);
            let max = max.channels()[0];
            if max == 0.0 {
                trace_warn!("gray depth conversion found a zero maximum, scaling by 255");
                Transform::Scale(255.0)
            } else {
                Transform::Scale(255.0 / max)
            }
        }
        ColorSpace::Rgb | ColorSpace::Argb => Transform::Cast,
    };
    map_formats(src, dst, transform)
}

fn color_space_into(src: &View<'_>, dst: &mut ViewMut<'_>) -> PixelGridResult<()> {
    same_size("convert_color_space", src, dst)?;
    if src.channel_depth() != dst.view().channel_depth() {
        return Err(PixelGridError::LayoutMismatch {
            op: "convert_color_space",
            src: src.layout(),
            dst: dst.layout(),
        });
    }
    let (from, to) = (src.color_space(), dst.view().color_space());
    if from == to {
        return copy(src, dst);
    }
    if !luma_supported(from, to) {
        return Err(PixelGridError::UnsupportedConversion {
            op: "convert_color_space",
            from,
            to,
        });
    }
    map_formats(src, dst, Transform::Luma)
}

/// Converts between channel depths of the same color space.
///
/// Gray sources are rescaled so their maximum maps to 255 (a zero maximum
/// scales by 255). RGB and ARGB channels are cast with rounding and
/// saturation.
pub fn convert_channel_depth<S, T>(src: &S, dst: &mut T) -> PixelGridResult<()>
where
    S: ImageSource + ?Sized,
    T: ImageTarget + ?Sized,
{
    channel_depth_into(&src.source_view(), &mut dst.target_view())
}

/// Converts between color spaces of the same channel depth.
///
/// Only RGB to GRAY and ARGB to GRAY are supported.
pub fn convert_color_space<S, T>(src: &S, dst: &mut T) -> PixelGridResult<()>
where
    S: ImageSource + ?Sized,
    T: ImageTarget + ?Sized,
{
    color_space_into(&src.source_view(), &mut dst.target_view())
}

/// Converts `src` into the format of `dst`.
///
/// When both color space and depth differ, the depth is converted first into
/// an intermediate image.
pub fn convert<S, T>(src: &S, dst: &mut T) -> PixelGridResult<()>
where
    S: ImageSource + ?Sized,
    T: ImageTarget + ?Sized,
{
    let src = src.source_view();
    let mut dst = dst.target_view();
    let _span = trace_span!(
        "convert",
        from = %src.format(),
        to = %dst.format(),
        width = src.width(),
        height = src.height()
    )
    .entered();
    same_size("convert", &src, &dst)?;
    let (from_space, from_depth) = src.format().parts();
    let (to_space, to_depth) = dst.format().parts();
    if from_space == to_space {
        return channel_depth_into(&src, &mut dst);
    }
    if from_depth == to_depth {
        return color_space_into(&src, &mut dst);
    }
    if !luma_supported(from_space, to_space) {
        return Err(PixelGridError::UnsupportedConversion {
            op: "convert",
            from: from_space,
            to: to_space,
        });
    }
    let mut stage = Image::new(
        PixelFormat::from_parts(from_space, to_depth),
        src.width(),
        src.height(),
    )?;
    channel_depth_into(&src, &mut stage.view_mut())?;
    color_space_into(&stage.view(), &mut dst)
}
