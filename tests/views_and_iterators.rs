use pixelgrid::iter::{copy_pixels, CursorVisitor, Iter2d};
use pixelgrid::pixel::{GrayU16, GrayU8, PixelType, RgbF32};
use pixelgrid::{Coord, Image, PixelFormat, PixelGridError, View};

fn ramp(width: usize, height: usize) -> Image {
    let mut img = Image::new(PixelFormat::GrayU8, width, height).unwrap();
    let mut cursor = img.iter2d_mut::<GrayU8>().unwrap();
    cursor.update_each_indexed(|x, y, _| GrayU8::new((y * width + x) as u8));
    img
}

#[test]
fn full_walk_is_row_major() {
    let img = ramp(5, 4);
    let values: Vec<u8> = img.iter2d::<GrayU8>().unwrap().pixels().map(|p| p.i).collect();
    assert_eq!(values, (0u8..20).collect::<Vec<_>>());
}

#[test]
fn for_each_indexed_reports_positions() {
    let img = ramp(3, 2);
    let mut seen = Vec::new();
    img.iter2d::<GrayU8>()
        .unwrap()
        .for_each_indexed(|x, y, p| seen.push((x, y, p.i)));
    assert_eq!(seen.len(), 6);
    assert_eq!(seen[4], (1, 1, 4));
}

#[test]
fn bottom_right_view_exposes_the_sub_rectangle() {
    let img = ramp(6, 5);
    let view = View::with_rect(&img, 4, 2, 2, 3).unwrap();
    let values: Vec<u8> = view.iter2d::<GrayU8>().unwrap().pixels().map(|p| p.i).collect();
    assert_eq!(values, vec![16, 17, 22, 23, 28, 29]);
    assert_eq!(view.row_step(), img.row_step());
}

#[test]
fn manual_cursor_navigation() {
    let img = ramp(3, 2);
    let mut it = img.sub_view(1, 0, 2, 2).unwrap().iter2d::<GrayU8>().unwrap();
    assert_eq!(it.get().i, 1);
    it.next_x();
    assert_eq!(it.get().i, 2);
    it.next_x();
    assert!(it.is_row_ended());
    it.next_row();
    assert!(!it.is_ended());
    assert_eq!(it.get().i, 4);
    it.next_row();
    assert!(it.is_ended());
}

#[test]
fn typed_cursor_checks_the_format() {
    let img = Image::new(PixelFormat::GrayU8, 2, 2).unwrap();
    let err = img.iter2d::<GrayU16>().err().unwrap();
    assert_eq!(
        err,
        PixelGridError::FormatMismatch {
            op: "iter2d",
            expected: PixelFormat::GrayU8,
            got: PixelFormat::GrayU16,
        }
    );
}

struct Sum;

impl<'a> CursorVisitor<'a> for Sum {
    type Output = f64;

    fn visit<P: PixelType>(self, cursor: Iter2d<'a, P>) -> f64 {
        cursor.pixels().map(|p| p.to_f64s().iter().sum::<f64>()).sum()
    }
}

#[test]
fn union_cursor_matches_the_runtime_format() {
    let mut img = Image::new(PixelFormat::RgbF32, 2, 1).unwrap();
    img.put_pixel(1, 0, RgbF32::new(1.0, 2.0, 3.0)).unwrap();
    let any = img.any_iter();
    assert_eq!(any.format(), PixelFormat::RgbF32);
    assert_eq!(any.visit(Sum), 6.0);
    assert_eq!(img.sub_view(0, 0, 1, 1).unwrap().any_iter().visit(Sum), 0.0);
}

#[test]
fn copy_pixels_between_views() {
    let src = ramp(4, 4);
    let mut dst = Image::new(PixelFormat::GrayU8, 2, 2).unwrap();
    let mut from = src.sub_view(1, 1, 2, 2).unwrap().iter2d::<GrayU8>().unwrap();
    let mut to = dst.iter2d_mut::<GrayU8>().unwrap();
    copy_pixels(&mut to, &mut from).unwrap();
    assert_eq!(dst.row(0), Some(&[5u8, 6][..]));
    assert_eq!(dst.row(1), Some(&[9u8, 10][..]));
}

#[test]
fn mutable_view_writes_stay_inside_the_window() {
    let mut img = Image::new(PixelFormat::GrayU8, 4, 4).unwrap();
    {
        let mut view = img.sub_view_mut(1, 1, 2, 2).unwrap();
        view.iter2d_mut::<GrayU8>()
            .unwrap()
            .update_each(|_| GrayU8::new(9));
        view.move_to(2, 2).unwrap();
        view.put_pixel(1, 1, GrayU8::new(1)).unwrap();
    }
    let total: u32 = img
        .iter2d::<GrayU8>()
        .unwrap()
        .pixels()
        .map(|p| u32::from(p.i))
        .sum();
    assert_eq!(total, 9 * 4 + 1);
    assert_eq!(img.pixel::<GrayU8>(3, 3), Some(GrayU8::new(1)));
}

#[test]
fn normalized_view_sub_pixel_uses_view_extent() {
    let img = ramp(4, 4);
    let view = View::from_coords(&img, Coord::Normalized, 0.5, 0.5, 0.5, 0.5).unwrap();
    assert_eq!((view.x(), view.y(), view.width(), view.height()), (2, 2, 2, 2));
    let corner = view.sub_pixel(Coord::Normalized, 1.0, 1.0).unwrap();
    assert_eq!(corner.get::<GrayU8>(), Some(GrayU8::new(15)));
    assert_eq!(view.to_string(), "x : 2 y : 2 width : 2 height : 2");
}
