use anyhow::Result;
use fast_image_resize as fr;
use fr::images::Image;

use crate::decoder::FrameData;

/// Resizes `frame` to fit inside `box_w` x `box_h` keeping its aspect ratio,
/// then centres it on a black canvas of exactly that size.
pub fn letterbox(frame: &FrameData, box_w: u32, box_h: u32) -> Result<FrameData> {
    let box_w = box_w.max(1);
    let box_h = box_h.max(1);
    let (new_w, new_h) = fitted_size(frame.width, frame.height, box_w, box_h);

    let src_image = Image::from_vec_u8(
        frame.width,
        frame.height,
        frame.buffer.clone(),
        fr::PixelType::U8x3,
    )?;
    let mut dst_image = Image::new(new_w, new_h, fr::PixelType::U8x3);

    // Uses SIMD when available
    let mut resizer = fr::Resizer::new();
    resizer.resize(&src_image, &mut dst_image, None)?;

    let mut canvas = vec![0u8; (box_w * box_h * 3) as usize];
    let x_off = ((box_w - new_w) / 2) as usize;
    let y_off = ((box_h - new_h) / 2) as usize;
    let row_len = new_w as usize * 3;
    let resized = dst_image.buffer();

    for y in 0..new_h as usize {
        let src_offset = y * row_len;
        let dst_offset = ((y_off + y) * box_w as usize + x_off) * 3;
        canvas[dst_offset..dst_offset + row_len]
            .copy_from_slice(&resized[src_offset..src_offset + row_len]);
    }

    Ok(FrameData::new(canvas, box_w, box_h))
}

/// Largest size with the source aspect ratio that fits in the box.
fn fitted_size(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> (u32, u32) {
    let scale_w = box_w as f64 / src_w.max(1) as f64;
    let scale_h = box_h as f64 / src_h.max(1) as f64;
    let scale = scale_w.min(scale_h);
    let new_w = ((src_w as f64 * scale).round() as u32).clamp(1, box_w);
    let new_h = ((src_h as f64 * scale).round() as u32).clamp(1, box_h);
    (new_w, new_h)
}
