use anyhow::{anyhow, Result};
use opencv::{core, imgproc, prelude::*};

/// Packed RGB24 pixels of one frame, ready for scaling and display
#[derive(Clone)]
pub struct FrameData {
    pub buffer: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl FrameData {
    pub fn new(buffer: Vec<u8>, width: u32, height: u32) -> Self {
        Self { buffer, width, height }
    }

    /// Converts an OpenCV BGR (or grayscale) frame to packed RGB.
    pub fn from_mat(frame: &Mat) -> Result<Self> {
        if frame.empty() {
            return Err(anyhow!("cannot convert an empty frame"));
        }

        let code = match frame.channels() {
            1 => imgproc::COLOR_GRAY2RGB,
            3 => imgproc::COLOR_BGR2RGB,
            4 => imgproc::COLOR_BGRA2RGB,
            n => return Err(anyhow!("unsupported channel count: {}", n)),
        };

        let mut rgb = Mat::default();
        imgproc::cvt_color_def(frame, &mut rgb, code)?;

        if rgb.depth() != core::CV_8U {
            return Err(anyhow!("unsupported frame depth: {}", rgb.depth()));
        }
        if !rgb.is_continuous() {
            return Err(anyhow!("frame is not continuous"));
        }

        Ok(Self {
            buffer: rgb.data_bytes()?.to_vec(),
            width: rgb.cols() as u32,
            height: rgb.rows() as u32,
        })
    }
}
