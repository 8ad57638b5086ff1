use criterion::{criterion_group, criterion_main, Criterion};
use pixelgrid::ops::{self, BlurType, Interpolation};
use pixelgrid::pixel::RgbU8;
use pixelgrid::{Image, PixelFormat};
use std::hint::black_box;

fn make_image(width: usize, height: usize) -> Image {
    let mut img = Image::new(PixelFormat::RgbU8, width, height).unwrap();
    img.iter2d_mut::<RgbU8>().unwrap().update_each_indexed(|x, y, _| {
        let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
        RgbU8::new(value as u8, (x & 0xFF) as u8, (y & 0xFF) as u8)
    });
    img
}

fn bench_resize(c: &mut Criterion) {
    let src = make_image(1024, 768);
    let mut dst = Image::new(PixelFormat::RgbU8, 300, 200).unwrap();

    for (name, interpolation) in [
        ("resize_nearest", Interpolation::Nearest),
        ("resize_bilinear", Interpolation::Bilinear),
        ("resize_bicubic", Interpolation::Bicubic),
    ] {
        c.bench_function(name, |b| {
            b.iter(|| ops::resize(black_box(&src), &mut dst, interpolation).unwrap());
        });
    }

    c.bench_function("resize_by_step_bicubic", |b| {
        b.iter(|| ops::resize_by_step(black_box(&src), &mut dst, Interpolation::Bicubic).unwrap());
    });
}

fn bench_filters(c: &mut Criterion) {
    let src = make_image(512, 512);
    let mut blurred = Image::new(PixelFormat::RgbU8, 512, 512).unwrap();
    c.bench_function("blur_gaussian_scale3", |b| {
        b.iter(|| ops::blur(black_box(&src), &mut blurred, 3, BlurType::Gaussian).unwrap());
    });

    let mut gray = Image::new(PixelFormat::GrayU8, 512, 512).unwrap();
    c.bench_function("convert_rgb_to_gray", |b| {
        b.iter(|| ops::convert(black_box(&src), &mut gray).unwrap());
    });

    let mut gray_f32 = Image::new(PixelFormat::GrayF32, 512, 512).unwrap();
    c.bench_function("convert_gray_u8_to_f32", |b| {
        b.iter(|| ops::convert(black_box(&gray), &mut gray_f32).unwrap());
    });

    c.bench_function("min_max_rgb", |b| {
        b.iter(|| black_box(ops::min_max(black_box(&src))));
    });
}

criterion_group!(benches, bench_resize, bench_filters);
criterion_main!(benches);
