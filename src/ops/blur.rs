//! Separable Gaussian blur with replicated borders.

use crate::image::{ImageSource, ImageTarget, View, ViewMut};
use crate::ops::{rows, same_layout, BlurType};
use crate::pixel::{GrayF32, GrayU8, PixelFormat, PixelType, RgbU8};
use crate::trace::trace_span;
use crate::util::math::{clamp_index, gaussian_taps};
use crate::util::{PixelGridError, PixelGridResult};

const MAX_SCALE: u32 = 16;

/// Kernel width for a blur `scale`: `2 * 2^(scale - 1) + 1`, or 1 for scale 0.
pub fn blur_kernel_size(scale: u32) -> PixelGridResult<usize> {
    if scale > MAX_SCALE {
        return Err(PixelGridError::InvalidInput("blur scale too large"));
    }
    Ok(match scale {
        0 => 1,
        s => (1usize << s) + 1,
    })
}

fn gaussian<P: PixelType>(src: &View<'_>, dst: &mut ViewMut<'_>, size: usize) -> PixelGridResult<()> {
    let (width, height) = (src.width(), src.height());
    let taps = gaussian_taps(size);
    let radius = (size / 2) as i64;
    let src_rows = rows(src);

    // Horizontal pass into a widened buffer.
    let mut horizontal = vec![[0.0f64; 4]; width * height];
    for (y, row) in src_rows.iter().enumerate() {
        for x in 0..width {
            let mut acc = [0.0f64; 4];
            for (k, tap) in taps.iter().enumerate() {
                let sx = clamp_index(x as i64 + k as i64 - radius, width);
                let sample = P::read(&row[sx * P::BYTES..]).to_f64s();
                for (a, s) in acc.iter_mut().zip(sample) {
                    *a += tap * s;
                }
            }
            horizontal[y * width + x] = acc;
        }
    }

    let mut cursor = dst.iter2d_mut::<P>()?;
    cursor.update_each_indexed(|x, y, _| {
        let mut acc = [0.0f64; 4];
        for (k, tap) in taps.iter().enumerate() {
            let sy = clamp_index(y as i64 + k as i64 - radius, height);
            for (a, s) in acc.iter_mut().zip(horizontal[sy * width + x]) {
                *a += tap * s;
            }
        }
        P::from_f64s(acc)
    });
    Ok(())
}

/// Blurs `src` into `dst` with a kernel of [`blur_kernel_size`]`(scale)`.
///
/// Supports GRAY_U8, GRAY_F32 and RGB_U8; `dst` must match `src`. Nothing is
/// written when the call fails.
pub fn blur<S, T>(src: &S, dst: &mut T, scale: u32, blur_type: BlurType) -> PixelGridResult<()>
where
    S: ImageSource + ?Sized,
    T: ImageTarget + ?Sized,
{
    let src = src.source_view();
    let mut dst = dst.target_view();
    let _span = trace_span!(
        "blur",
        scale = scale,
        width = src.width(),
        height = src.height()
    )
    .entered();
    let format = src.format();
    if !matches!(
        format,
        PixelFormat::GrayU8 | PixelFormat::GrayF32 | PixelFormat::RgbU8
    ) {
        return Err(PixelGridError::UnsupportedFormat { op: "blur", format });
    }
    same_layout("blur", &src, &dst)?;
    let size = blur_kernel_size(scale)?;
    if src.is_empty() {
        return Ok(());
    }
    match (blur_type, format) {
        (BlurType::Gaussian, PixelFormat::GrayU8) => gaussian::<GrayU8>(&src, &mut dst, size),
        (BlurType::Gaussian, PixelFormat::GrayF32) => gaussian::<GrayF32>(&src, &mut dst, size),
        (BlurType::Gaussian, _) => gaussian::<RgbU8>(&src, &mut dst, size),
    }
}
