//! Fixtures shared by the unit tests.

use opencv::{core, prelude::*, videoio};
use std::path::Path;

use crate::decoder::image_io;

pub fn solid_frame(value: u8) -> Mat {
    Mat::new_rows_cols_with_default(16, 16, core::CV_8UC3, core::Scalar::all(value as f64)).unwrap()
}

pub fn write_solid_png(path: &Path, value: u8) {
    image_io::write_image(path, &solid_frame(value)).unwrap();
}

pub fn first_pixel(frame: &Mat) -> u8 {
    frame.at_2d::<core::Vec3b>(0, 0).unwrap()[0]
}

/// Motion-JPEG AVI through OpenCV's built-in writer, so no codec library
/// is needed.
pub fn write_test_video(path: &Path, frames: usize) {
    let fourcc = videoio::VideoWriter::fourcc('M', 'J', 'P', 'G').unwrap();
    let mut writer = videoio::VideoWriter::new_with_backend(
        path.to_str().unwrap(),
        videoio::CAP_OPENCV_MJPEG,
        fourcc,
        10.0,
        core::Size::new(16, 16),
        true,
    )
    .unwrap();
    assert!(writer.is_opened().unwrap());

    for index in 0..frames {
        writer.write(&solid_frame((index * 40) as u8)).unwrap();
    }
    writer.release().unwrap();
}
