//! Exchange with externally owned pixel buffers.
//!
//! `Bitmap` is the flat-buffer handle other libraries hand over;
//! `Image::from_raw_bits` normalizes packed 8/16/24/32-bit layouts described by
//! channel bit masks into ARGB_U8.

use crate::image::Image;
use crate::pixel::{ArgbU8, PixelFormat, PixelType};
use crate::util::{PixelGridError, PixelGridResult};

/// Owned flat pixel buffer with explicit layout metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub row_step: usize,
    pub format: PixelFormat,
}

/// Bit masks locating each channel inside a packed pixel.
///
/// All-zero masks select the conventional layout for the bit depth:
/// X1R5G5B5 for 16 bits and (X/A)R8G8B8 for 24 and 32 bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelMasks {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
}

impl ChannelMasks {
    pub const RGB555: ChannelMasks = ChannelMasks {
        red: 0x7C00,
        green: 0x03E0,
        blue: 0x001F,
    };
    pub const RGB565: ChannelMasks = ChannelMasks {
        red: 0xF800,
        green: 0x07E0,
        blue: 0x001F,
    };
    pub const RGB888: ChannelMasks = ChannelMasks {
        red: 0x00FF_0000,
        green: 0x0000_FF00,
        blue: 0x0000_00FF,
    };

    fn or_default_for(self, bits_per_pixel: u32) -> Self {
        if self != ChannelMasks::default() {
            return self;
        }
        if bits_per_pixel == 16 {
            Self::RGB555
        } else {
            Self::RGB888
        }
    }
}

/// Scales the masked field of `value` to the 0..=255 range.
fn extract_channel(value: u32, mask: u32) -> u8 {
    if mask == 0 {
        return 0;
    }
    let shift = mask.trailing_zeros();
    let max = u64::from(mask >> shift);
    let raw = u64::from((value & mask) >> shift);
    ((raw * 255 + max / 2) / max) as u8
}

impl Image {
    /// Deep-copies an external bitmap, keeping its `row_step`.
    ///
    /// The last row only needs `width * bytes_per_pixel` bytes; missing
    /// padding after it is zero-filled.
    pub fn from_bitmap(bitmap: &Bitmap) -> PixelGridResult<Self> {
        let Bitmap {
            width,
            height,
            row_step,
            format,
            ..
        } = *bitmap;
        if width == 0 || height == 0 {
            return Err(PixelGridError::InvalidDimensions { width, height });
        }
        let row_bytes = width
            .checked_mul(format.bytes_per_pixel())
            .ok_or(PixelGridError::InvalidDimensions { width, height })?;
        if row_step < row_bytes {
            return Err(PixelGridError::InvalidRowStep {
                row_bytes,
                row_step,
            });
        }
        let len = row_step
            .checked_mul(height)
            .ok_or(PixelGridError::InvalidDimensions { width, height })?;
        let needed = len - (row_step - row_bytes);
        if bitmap.data.len() < needed {
            return Err(PixelGridError::BufferTooSmall {
                needed,
                got: bitmap.data.len(),
            });
        }
        let mut data = vec![0; len];
        let copied = len.min(bitmap.data.len());
        data[..copied].copy_from_slice(&bitmap.data[..copied]);
        Ok(Image {
            data,
            width,
            height,
            row_step,
            format,
        })
    }

    /// Returns a deep copy as an external bitmap.
    pub fn to_bitmap(&self) -> Bitmap {
        Bitmap {
            data: self.data.clone(),
            width: self.width,
            height: self.height,
            row_step: self.row_step,
            format: self.format,
        }
    }

    /// Decodes packed raw bits into an ARGB_U8 image.
    ///
    /// 8-bit input is treated as gray. 16, 24 and 32-bit pixels are read
    /// little-endian and split with `masks`; for 32 bits the bits outside the
    /// color masks carry alpha. Rows are bottom-up unless `top_down` is set.
    pub fn from_raw_bits(
        data: &[u8],
        width: usize,
        height: usize,
        row_step: usize,
        bits_per_pixel: u32,
        masks: ChannelMasks,
        top_down: bool,
    ) -> PixelGridResult<Self> {
        if !matches!(bits_per_pixel, 8 | 16 | 24 | 32) {
            return Err(PixelGridError::ImageIo {
                reason: format!("raw bits: unsupported bit depth {bits_per_pixel}"),
            });
        }
        let mut image = Image::new(PixelFormat::ArgbU8, width, height)?;
        let src_bpp = bits_per_pixel as usize / 8;
        let row_bytes = width * src_bpp;
        if row_step < row_bytes {
            return Err(PixelGridError::InvalidRowStep {
                row_bytes,
                row_step,
            });
        }
        let needed = (height - 1)
            .checked_mul(row_step)
            .and_then(|v| v.checked_add(row_bytes))
            .ok_or(PixelGridError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(PixelGridError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }

        let masks = masks.or_default_for(bits_per_pixel);
        let alpha_mask = match bits_per_pixel {
            32 => !(masks.red | masks.green | masks.blue),
            _ => 0,
        };
        let dst_step = image.row_step;
        for (y, dst_row) in image.data.chunks_exact_mut(dst_step).enumerate() {
            let src_y = if top_down { y } else { height - 1 - y };
            let src_row = &data[src_y * row_step..src_y * row_step + row_bytes];
            for (src, dst) in src_row
                .chunks_exact(src_bpp)
                .zip(dst_row.chunks_exact_mut(ArgbU8::BYTES))
            {
                let pixel = if bits_per_pixel == 8 {
                    ArgbU8::new(255, src[0], src[0], src[0])
                } else {
                    let value = src
                        .iter()
                        .rev()
                        .fold(0u32, |acc, byte| (acc << 8) | u32::from(*byte));
                    let alpha = if alpha_mask == 0 {
                        255
                    } else {
                        extract_channel(value, alpha_mask)
                    };
                    ArgbU8::new(
                        alpha,
                        extract_channel(value, masks.red),
                        extract_channel(value, masks.green),
                        extract_channel(value, masks.blue),
                    )
                };
                pixel.write(dst);
            }
        }
        Ok(image)
    }
}
