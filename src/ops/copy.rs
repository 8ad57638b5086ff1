use crate::image::{ImageSource, ImageTarget};
use crate::ops::{rows, same_layout};
use crate::util::PixelGridResult;

/// Copies pixels row by row; format, width and height must match.
pub fn copy<S, T>(src: &S, dst: &mut T) -> PixelGridResult<()>
where
    S: ImageSource + ?Sized,
    T: ImageTarget + ?Sized,
{
    let src = src.source_view();
    let mut dst = dst.target_view();
    same_layout("copy", &src, &dst)?;
    for (y, src_row) in rows(&src).into_iter().enumerate() {
        if let Some(dst_row) = dst.row_mut(y) {
            dst_row.copy_from_slice(src_row);
        }
    }
    Ok(())
}
