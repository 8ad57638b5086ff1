//! Loading and saving images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. The codec works in
//! `R, G, B[, A]` order; the swap to and from the in-memory `B, G, R[, A]`
//! layout happens here only.

use crate::image::Image;
use crate::pixel::{Channel, ColorSpace, PixelFormat};
use crate::trace::trace_span;
use crate::util::{PixelGridError, PixelGridResult};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageBuffer, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufRead, BufWriter, Seek, Write};
use std::path::Path;

/// Memory channel index for each codec channel.
const GRAY_ORDER: [usize; 1] = [0];
const RGB_ORDER: [usize; 3] = [2, 1, 0];
const RGBA_ORDER: [usize; 4] = [2, 1, 0, 3];

/// File formats accepted by [`Image::save`] and [`Image::save_file`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageFileFormat {
    Jpg,
    Png,
    Bmp,
    /// Used when a stream's header does not identify its format.
    #[default]
    Tga,
    Ppm,
}

impl ImageFileFormat {
    /// Picks a format from a file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpg),
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            "tga" => Some(Self::Tga),
            "ppm" | "pgm" | "pnm" => Some(Self::Ppm),
            _ => None,
        }
    }

    fn codec(self) -> ImageFormat {
        match self {
            Self::Jpg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Bmp => ImageFormat::Bmp,
            Self::Tga => ImageFormat::Tga,
            Self::Ppm => ImageFormat::Pnm,
        }
    }
}

fn io_error(context: impl std::fmt::Display, err: impl std::fmt::Display) -> PixelGridError {
    PixelGridError::ImageIo {
        reason: format!("{context}: {err}"),
    }
}

/// Gathers channels row by row in codec order.
fn interleave<C: Channel>(image: &Image, order: &[usize]) -> Vec<C> {
    let size = C::DEPTH.bytes();
    let bpp = image.bytes_per_pixel();
    let mut out = Vec::with_capacity(image.width() * image.height() * order.len());
    for y in 0..image.height() {
        if let Some(row) = image.row(y) {
            for pixel in row.chunks_exact(bpp) {
                out.extend(order.iter().map(|&k| C::read_ne(&pixel[k * size..])));
            }
        }
    }
    out
}

/// Scatters tightly packed codec samples into a new image.
fn deinterleave<C: Channel>(
    samples: &[C],
    width: usize,
    height: usize,
    format: PixelFormat,
    order: &[usize],
) -> PixelGridResult<Image> {
    let mut image = Image::new(format, width, height)?;
    let size = C::DEPTH.bytes();
    let bpp = format.bytes_per_pixel();
    let per_row = width * order.len();
    if samples.len() < per_row * height {
        return Err(PixelGridError::BufferTooSmall {
            needed: per_row * height,
            got: samples.len(),
        });
    }
    for (y, src) in samples.chunks_exact(per_row).take(height).enumerate() {
        if let Some(row) = image.row_mut(y) {
            for (pixel, values) in row.chunks_exact_mut(bpp).zip(src.chunks_exact(order.len())) {
                for (&k, value) in order.iter().zip(values) {
                    value.write_ne(&mut pixel[k * size..]);
                }
            }
        }
    }
    Ok(image)
}

impl Image {
    /// Builds an image in the decoded image's native layout.
    ///
    /// Gray+alpha layouts widen to ARGB.
    pub fn from_dynamic(img: &DynamicImage) -> PixelGridResult<Image> {
        let (w, h) = (img.width() as usize, img.height() as usize);
        match img {
            DynamicImage::ImageLuma8(buf) => deinterleave(buf.as_raw(), w, h, PixelFormat::GrayU8, &GRAY_ORDER),
            DynamicImage::ImageRgb8(buf) => deinterleave(buf.as_raw(), w, h, PixelFormat::RgbU8, &RGB_ORDER),
            DynamicImage::ImageRgba8(buf) => deinterleave(buf.as_raw(), w, h, PixelFormat::ArgbU8, &RGBA_ORDER),
            DynamicImage::ImageLumaA8(_) => {
                deinterleave(img.to_rgba8().as_raw(), w, h, PixelFormat::ArgbU8, &RGBA_ORDER)
            }
            DynamicImage::ImageLuma16(buf) => deinterleave(buf.as_raw(), w, h, PixelFormat::GrayU16, &GRAY_ORDER),
            DynamicImage::ImageRgb16(buf) => deinterleave(buf.as_raw(), w, h, PixelFormat::RgbU16, &RGB_ORDER),
            DynamicImage::ImageRgba16(buf) => deinterleave(buf.as_raw(), w, h, PixelFormat::ArgbU16, &RGBA_ORDER),
            DynamicImage::ImageLumaA16(_) => {
                deinterleave(img.to_rgba16().as_raw(), w, h, PixelFormat::ArgbU16, &RGBA_ORDER)
            }
            DynamicImage::ImageRgb32F(buf) => deinterleave(buf.as_raw(), w, h, PixelFormat::RgbF32, &RGB_ORDER),
            DynamicImage::ImageRgba32F(buf) => {
                deinterleave(buf.as_raw(), w, h, PixelFormat::ArgbF32, &RGBA_ORDER)
            }
            other => Err(io_error("decode", format!("unsupported pixel format {:?}", other.color()))),
        }
    }

    /// Converts into a codec image. Supports GRAY, RGB and ARGB at U8 and U16.
    pub fn to_dynamic(&self) -> PixelGridResult<DynamicImage> {
        let w = u32::try_from(self.width()).map_err(|err| io_error("encode", err))?;
        let h = u32::try_from(self.height()).map_err(|err| io_error("encode", err))?;
        let dynamic = match self.format() {
            PixelFormat::GrayU8 => {
                ImageBuffer::from_raw(w, h, interleave::<u8>(self, &GRAY_ORDER)).map(DynamicImage::ImageLuma8)
            }
            PixelFormat::RgbU8 => {
                ImageBuffer::from_raw(w, h, interleave::<u8>(self, &RGB_ORDER)).map(DynamicImage::ImageRgb8)
            }
            PixelFormat::ArgbU8 => {
                ImageBuffer::from_raw(w, h, interleave::<u8>(self, &RGBA_ORDER)).map(DynamicImage::ImageRgba8)
            }
            PixelFormat::GrayU16 => {
                ImageBuffer::from_raw(w, h, interleave::<u16>(self, &GRAY_ORDER)).map(DynamicImage::ImageLuma16)
            }
            PixelFormat::RgbU16 => {
                ImageBuffer::from_raw(w, h, interleave::<u16>(self, &RGB_ORDER)).map(DynamicImage::ImageRgb16)
            }
            PixelFormat::ArgbU16 => {
                ImageBuffer::from_raw(w, h, interleave::<u16>(self, &RGBA_ORDER)).map(DynamicImage::ImageRgba16)
            }
            format => return Err(io_error("encode", format!("unsupported image type {format}"))),
        };
        dynamic.ok_or_else(|| io_error("encode", "pixel buffer does not match its dimensions"))
    }

    /// Loads a file and normalizes it to ARGB_U8.
    pub fn load_file<P: AsRef<Path>>(path: P) -> PixelGridResult<Image> {
        let decoded = decode_file(path.as_ref())?;
        normalized(&decoded)
    }

    /// Loads a file keeping its native layout.
    pub fn load_file_native<P: AsRef<Path>>(path: P) -> PixelGridResult<Image> {
        let decoded = decode_file(path.as_ref())?;
        Image::from_dynamic(&decoded)
    }

    /// Decodes a stream and normalizes it to ARGB_U8.
    ///
    /// Streams whose header names no known format are read as TGA.
    pub fn load<R: BufRead + Seek>(reader: R) -> PixelGridResult<Image> {
        let decoded = decode_stream(reader)?;
        normalized(&decoded)
    }

    /// Decodes a stream keeping its native layout.
    pub fn load_native<R: BufRead + Seek>(reader: R) -> PixelGridResult<Image> {
        let decoded = decode_stream(reader)?;
        Image::from_dynamic(&decoded)
    }

    /// Saves to a file, picking the format from the extension.
    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> PixelGridResult<()> {
        let path = path.as_ref();
        let format = ImageFileFormat::from_path(path)
            .ok_or_else(|| io_error(path.display(), "unknown image file extension"))?;
        let file = File::create(path).map_err(|err| io_error(path.display(), err))?;
        let mut writer = BufWriter::new(file);
        self.save(&mut writer, format)
            .map_err(|err| io_error(path.display(), err))?;
        writer.flush().map_err(|err| io_error(path.display(), err))
    }

    /// Encodes into a stream.
    ///
    /// JPEG is written at quality 100 without alpha.
    pub fn save<W: Write + Seek>(&self, writer: &mut W, format: ImageFileFormat) -> PixelGridResult<()> {
        let _span = trace_span!("save", format = ?format, width = self.width(), height = self.height()).entered();
        let dynamic = self.to_dynamic()?;
        let context = format!("save {format:?}");
        match format {
            ImageFileFormat::Jpg => {
                let flat = match self.color_space() {
                    ColorSpace::Gray => DynamicImage::ImageLuma8(dynamic.to_luma8()),
                    ColorSpace::Rgb | ColorSpace::Argb => DynamicImage::ImageRgb8(dynamic.to_rgb8()),
                };
                flat.write_with_encoder(JpegEncoder::new_with_quality(&mut *writer, 100))
                    .map_err(|err| io_error(&context, err))
            }
            other => dynamic
                .write_to(writer, other.codec())
                .map_err(|err| io_error(&context, err)),
        }
    }
}

fn normalized(decoded: &DynamicImage) -> PixelGridResult<Image> {
    let (w, h) = (decoded.width() as usize, decoded.height() as usize);
    deinterleave(decoded.to_rgba8().as_raw(), w, h, PixelFormat::ArgbU8, &RGBA_ORDER)
}

fn decode_file(path: &Path) -> PixelGridResult<DynamicImage> {
    let _span = trace_span!("load", path = %path.display()).entered();
    let reader = ImageReader::open(path).map_err(|err| io_error(path.display(), err))?;
    let reader = if reader.format().is_some() {
        reader
    } else {
        reader
            .with_guessed_format()
            .map_err(|err| io_error(path.display(), err))?
    };
    reader.decode().map_err(|err| io_error(path.display(), err))
}

fn decode_stream<R: BufRead + Seek>(reader: R) -> PixelGridResult<DynamicImage> {
    let _span = trace_span!("load").entered();
    let mut reader = ImageReader::new(reader)
        .with_guessed_format()
        .map_err(|err| io_error("load", err))?;
    if reader.format().is_none() {
        reader.set_format(ImageFormat::Tga);
    }
    reader.decode().map_err(|err| io_error("load", err))
}
