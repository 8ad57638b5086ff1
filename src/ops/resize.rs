//! Resampling with nearest, bilinear and bicubic kernels.
//!
//! Destination pixel centres map back onto the source with
//! `sx = (dx + 0.5) * src_w / dst_w - 0.5`; nearest uses
//! `floor(dx * src_w / dst_w)`. Taps outside the source are clamped to the
//! border. Integer channels are rounded and saturated.

use crate::image::{Image, ImageSource, ImageTarget, View, ViewMut};
use crate::ops::{rows, Interpolation};
use crate::pixel::{dispatch_format, PixelType};
use crate::trace::{trace_event, trace_span};
use crate::util::math::{clamp_index, cubic_weights};
use crate::util::{PixelGridError, PixelGridResult};

/// Source taps contributing to one destination column or row.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Taps {
    index: [usize; 4],
    weight: [f64; 4],
    len: usize,
}

impl Taps {
    fn single(index: usize) -> Self {
        Self {
            index: [index, 0, 0, 0],
            weight: [1.0, 0.0, 0.0, 0.0],
            len: 1,
        }
    }
}

fn axis_taps(src_len: usize, dst_len: usize, interpolation: Interpolation) -> Vec<Taps> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| match interpolation {
            Interpolation::Nearest => {
                let s = (d as f64 * scale).floor() as usize;
                Taps::single(s.min(src_len - 1))
            }
            Interpolation::Bilinear => {
                let s = (d as f64 + 0.5) * scale - 0.5;
                let mut s0 = s.floor() as i64;
                let mut t = s - s0 as f64;
                if s0 < 0 {
                    s0 = 0;
                    t = 0.0;
                }
                if s0 >= src_len as i64 - 1 {
                    s0 = src_len as i64 - 1;
                    t = 0.0;
                }
                let s1 = clamp_index(s0 + 1, src_len);
                Taps {
                    index: [s0 as usize, s1, 0, 0],
                    weight: [1.0 - t, t, 0.0, 0.0],
                    len: 2,
                }
            }
            Interpolation::Bicubic => {
                let s = (d as f64 + 0.5) * scale - 0.5;
                let s0 = s.floor() as i64;
                let t = s - s0 as f64;
                Taps {
                    index: std::array::from_fn(|k| clamp_index(s0 - 1 + k as i64, src_len)),
                    weight: cubic_weights(t),
                    len: 4,
                }
            }
        })
        .collect()
}

fn resample<P: PixelType>(
    src: &View<'_>,
    dst: &mut ViewMut<'_>,
    interpolation: Interpolation,
) -> PixelGridResult<()> {
    let src_rows = rows(src);
    let taps_x = axis_taps(src.width(), dst.width(), interpolation);
    let taps_y = axis_taps(src.height(), dst.height(), interpolation);
    let read = |x: usize, y: usize| P::read(&src_rows[y][x * P::BYTES..]).to_f64s();

    let mut cursor = dst.iter2d_mut::<P>()?;
    cursor.update_each_indexed(|dx, dy, _| {
        let (tx, ty) = (&taps_x[dx], &taps_y[dy]);
        let mut acc = [0.0f64; 4];
        for j in 0..ty.len {
            for i in 0..tx.len {
                let w = ty.weight[j] * tx.weight[i];
                if w == 0.0 {
                    continue;
                }
                let sample = read(tx.index[i], ty.index[j]);
                for (a, s) in acc.iter_mut().zip(sample) {
                    *a += w * s;
                }
            }
        }
        P::from_f64s(acc)
    });
    Ok(())
}

/// Resamples `src` into `dst`; both must share color space and depth.
pub fn resize<S, T>(src: &S, dst: &mut T, interpolation: Interpolation) -> PixelGridResult<()>
where
    S: ImageSource + ?Sized,
    T: ImageTarget + ?Sized,
{
    let src = src.source_view();
    let mut dst = dst.target_view();
    let _span = trace_span!(
        "resize",
        src_width = src.width(),
        src_height = src.height(),
        dst_width = dst.width(),
        dst_height = dst.height()
    )
    .entered();
    if src.format() != dst.format() {
        return Err(PixelGridError::LayoutMismatch {
            op: "resize",
            src: src.layout(),
            dst: dst.layout(),
        });
    }
    if dst.width() == 0 || dst.height() == 0 {
        return Ok(());
    }
    if src.is_empty() {
        return Err(PixelGridError::InvalidDimensions {
            width: src.width(),
            height: src.height(),
        });
    }
    dispatch_format!(src.format(), P => resample::<P>(&src, &mut dst, interpolation))
}

/// Resizes through successive halvings while the source is more than twice
/// the destination along an axis, then resizes directly.
pub fn resize_by_step<S, T>(src: &S, dst: &mut T, interpolation: Interpolation) -> PixelGridResult<()>
where
    S: ImageSource + ?Sized,
    T: ImageTarget + ?Sized,
{
    let src = src.source_view();
    let mut dst = dst.target_view();
    let _span = trace_span!(
        "resize_by_step",
        src_width = src.width(),
        src_height = src.height(),
        dst_width = dst.width(),
        dst_height = dst.height()
    )
    .entered();
    if src.format() != dst.format() {
        return Err(PixelGridError::LayoutMismatch {
            op: "resize_by_step",
            src: src.layout(),
            dst: dst.layout(),
        });
    }
    let (dst_width, dst_height) = (dst.width(), dst.height());
    if dst_width == 0 || dst_height == 0 {
        return Ok(());
    }
    let mut stage: Option<Image> = None;
    loop {
        let current = stage.as_ref().map_or(src, |img| img.view());
        let shrink_x = current.width() > 2 * dst_width;
        let shrink_y = current.height() > 2 * dst_height;
        if !shrink_x && !shrink_y {
            return resize(&current, &mut dst, interpolation);
        }
        let width = if shrink_x { (current.width() / 2).max(1) } else { current.width() };
        let height = if shrink_y { (current.height() / 2).max(1) } else { current.height() };
        trace_event!("resize_stage", width = width, height = height);
        let mut half = Image::new(current.format(), width, height)?;
        resize(&current, &mut half, interpolation)?;
        stage = Some(half);
    }
}

#[cfg(test)]
mod tests {
    use super::{axis_taps, resize, resize_by_step, Taps};
    use crate::image::Image;
    use crate::ops::Interpolation;
    use crate::pixel::{GrayU8, PixelFormat};

    #[test]
    fn nearest_taps_follow_floor_mapping() {
        let taps = axis_taps(4, 2, Interpolation::Nearest);
        assert_eq!(taps, vec![Taps::single(0), Taps::single(2)]);
    }

    #[test]
    fn bilinear_downscale_by_two_averages_pairs() {
        let taps = axis_taps(4, 2, Interpolation::Bilinear);
        assert_eq!(taps[0].index[..2], [0, 1]);
        assert!((taps[0].weight[0] - 0.5).abs() < 1e-12);
        assert_eq!(taps[1].index[..2], [2, 3]);
    }

    #[test]
    fn upscale_nearest_replicates_pixels() {
        let mut src = Image::new(PixelFormat::GrayU8, 2, 1).unwrap();
        src.put_pixel(1, 0, GrayU8::new(9)).unwrap();
        let mut dst = Image::new(PixelFormat::GrayU8, 4, 2).unwrap();
        resize(&src, &mut dst, Interpolation::Nearest).unwrap();
        let row: Vec<u8> = dst.row(1).unwrap().to_vec();
        assert_eq!(row, vec![0, 0, 9, 9]);
    }

    #[test]
    fn resize_by_step_reaches_target_size() {
        let mut src = Image::new(PixelFormat::GrayU8, 64, 8).unwrap();
        crate::ops::fill(&mut src, GrayU8::new(120).into()).unwrap();
        let mut dst = Image::new(PixelFormat::GrayU8, 5, 5).unwrap();
        resize_by_step(&src, &mut dst, Interpolation::Bilinear).unwrap();
        let (min, max) = crate::ops::min_max(&dst);
        assert_eq!(min, GrayU8::new(120).into());
        assert_eq!(max, GrayU8::new(120).into());
    }
}
