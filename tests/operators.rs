use pixelgrid::ops::{
    blur, convert, convert_channel_depth, convert_color_space, copy, fill, min_max, resize,
    set_to_zero,
};
use pixelgrid::pixel::{ArgbF32, ArgbU8, GrayF32, GrayU8, RgbU8};
use pixelgrid::{BlurType, ColorSpace, Image, Interpolation, PixelFormat, PixelGridError, PixelValue};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_rgb(width: usize, height: usize, seed: u64) -> Image {
    let mut img = Image::new(PixelFormat::RgbU8, width, height).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cursor = img.iter2d_mut::<RgbU8>().unwrap();
    cursor.update_each(|_| {
        RgbU8::new(
            rng.random_range(0..=255),
            rng.random_range(0..=255),
            rng.random_range(0..=255),
        )
    });
    img
}

#[test]
fn fill_then_min_max_returns_the_fill_value() {
    for format in PixelFormat::ALL {
        let mut img = Image::new(format, 6, 5).unwrap();
        let channels = [3.0, 1.0, 4.0, 1.0];
        let value = PixelValue::from_channels(format, &channels);
        let mut view = img.sub_view_mut(1, 2, 4, 3).unwrap();
        fill(&mut view, value).unwrap();
        let (min, max) = min_max(&view);
        assert_eq!(min, value, "{format}");
        assert_eq!(max, value, "{format}");
    }
}

#[test]
fn min_max_of_empty_view_reports_sentinels() {
    let img = Image::new(PixelFormat::GrayF32, 3, 3).unwrap();
    let empty = img.sub_view(1, 1, 0, 0).unwrap();
    let (min, max) = min_max(&empty);
    assert_eq!(min, PixelValue::max_value(PixelFormat::GrayF32));
    assert_eq!(max, PixelValue::min_value(PixelFormat::GrayF32));
}

#[test]
fn set_to_zero_matches_fill_with_zero() {
    let mut a = random_rgb(5, 3, 1);
    let mut b = a.deep_clone();
    set_to_zero(&mut a);
    fill(&mut b, PixelValue::zero(PixelFormat::RgbU8)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn same_size_resize_is_content_preserving() {
    let src = random_rgb(9, 7, 2);
    for interpolation in [
        Interpolation::Nearest,
        Interpolation::Bilinear,
        Interpolation::Bicubic,
    ] {
        let mut dst = Image::new(PixelFormat::RgbU8, 9, 7).unwrap();
        resize(&src, &mut dst, interpolation).unwrap();
        assert_eq!(dst, src, "{interpolation:?}");
    }
}

#[test]
fn resize_requires_matching_formats() {
    let src = Image::new(PixelFormat::RgbU8, 4, 4).unwrap();
    let mut dst = Image::new(PixelFormat::GrayU8, 2, 2).unwrap();
    let err = resize(&src, &mut dst, Interpolation::default()).err().unwrap();
    assert!(matches!(err, PixelGridError::LayoutMismatch { op: "resize", .. }));
}

#[test]
fn copy_into_a_view_of_a_larger_image() {
    let src = random_rgb(3, 2, 3);
    let mut big = Image::new(PixelFormat::RgbU8, 8, 8).unwrap();
    let mut window = big.sub_view_mut(5, 6, 3, 2).unwrap();
    copy(&src, &mut window).unwrap();
    assert_eq!(big.sub_view(5, 6, 3, 2).unwrap().to_image().unwrap(), src);
    assert_eq!(big.pixel::<RgbU8>(4, 6), Some(RgbU8::default()));
}

#[test]
fn convert_to_the_same_format_is_a_copy() {
    let src = random_rgb(6, 4, 4);
    let mut dst = Image::new(PixelFormat::RgbU8, 6, 4).unwrap();
    convert(&src, &mut dst).unwrap();
    assert_eq!(dst, src);

    let mut gray = Image::new(PixelFormat::GrayU8, 6, 4).unwrap();
    convert(&src, &mut gray).unwrap();
    let mut gray_again = Image::new(PixelFormat::GrayU8, 6, 4).unwrap();
    convert(&gray, &mut gray_again).unwrap();
    assert_eq!(gray_again, gray);
}

#[test]
fn magenta_argb_to_gray_is_midrange() {
    let mut src = Image::new(PixelFormat::ArgbU8, 4, 4).unwrap();
    fill(&mut src, ArgbU8::new(255, 255, 0, 255).into()).unwrap();
    let mut dst = Image::new(PixelFormat::GrayU8, 4, 4).unwrap();
    convert_color_space(&src, &mut dst).unwrap();
    let (min, max) = min_max(&dst);
    assert_eq!(min, max);
    let luma = dst.pixel::<GrayU8>(2, 3).unwrap().i;
    assert!((90..=120).contains(&luma), "luma {luma}");
    assert_eq!(luma, 105);
}

#[test]
fn rgb_to_argb_is_rejected_without_writing() {
    let src = random_rgb(2, 2, 5);
    let mut dst = Image::new(PixelFormat::ArgbU8, 2, 2).unwrap();
    let before = dst.deep_clone();
    let err = convert(&src, &mut dst).err().unwrap();
    assert_eq!(
        err,
        PixelGridError::UnsupportedConversion {
            op: "convert_color_space",
            from: ColorSpace::Rgb,
            to: ColorSpace::Argb,
        }
    );
    assert_eq!(dst, before);
}

#[test]
fn depth_conversion_rejects_color_changes() {
    let src = Image::new(PixelFormat::RgbU8, 2, 2).unwrap();
    let mut dst = Image::new(PixelFormat::GrayF32, 2, 2).unwrap();
    let err = convert_channel_depth(&src, &mut dst).err().unwrap();
    assert!(matches!(
        err,
        PixelGridError::LayoutMismatch {
            op: "convert_channel_depth",
            ..
        }
    ));
}

#[test]
fn zero_gray_image_converts_without_error() {
    let src = Image::new(PixelFormat::GrayU8, 3, 3).unwrap();
    let mut dst = Image::new(PixelFormat::GrayF32, 3, 3).unwrap();
    convert_channel_depth(&src, &mut dst).unwrap();
    let (_, max) = min_max(&dst);
    assert_eq!(max, GrayF32::new(0.0).into());
}

#[test]
fn blur_rejects_unsupported_formats_without_writing() {
    let src = Image::new(PixelFormat::ArgbF32, 4, 4).unwrap();
    let mut dst = Image::new(PixelFormat::ArgbF32, 4, 4).unwrap();
    fill(&mut dst, ArgbF32::new(1.0, 2.0, 3.0, 4.0).into()).unwrap();
    let before = dst.deep_clone();
    let err = blur(&src, &mut dst, 2, BlurType::Gaussian).err().unwrap();
    assert_eq!(
        err,
        PixelGridError::UnsupportedFormat {
            op: "blur",
            format: PixelFormat::ArgbF32,
        }
    );
    assert_eq!(dst, before);
}

#[test]
fn blur_smooths_a_step_edge() {
    let mut src = Image::new(PixelFormat::GrayU8, 8, 1).unwrap();
    let mut right = src.sub_view_mut(4, 0, 4, 1).unwrap();
    fill(&mut right, GrayU8::new(200).into()).unwrap();
    let mut dst = Image::new(PixelFormat::GrayU8, 8, 1).unwrap();
    blur(&src, &mut dst, 2, BlurType::Gaussian).unwrap();
    let row = dst.row(0).unwrap();
    assert_eq!(row[0], 0);
    assert_eq!(row[7], 200);
    assert!(row[3] > 0 && row[3] < 100);
    assert!(row[4] > 100 && row[4] < 200);
    assert!(row.windows(2).all(|w| w[0] <= w[1]));
}
