use anyhow::{anyhow, Result};
use opencv::{prelude::*, videoio};
use std::path::{Path, PathBuf};

use crate::utils::file_utils;

/// Thin wrapper over an OpenCV capture that hands out BGR frames.
pub struct VideoDecoder {
    capture: videoio::VideoCapture,
    path: PathBuf,
    frame_count: usize,
}

impl VideoDecoder {
    pub fn open(path: &Path) -> Result<Self> {
        // CAP_ANY lets OpenCV pick the platform backend
        let capture = videoio::VideoCapture::from_file(file_utils::path_str(path)?, videoio::CAP_ANY)?;

        if !capture.is_opened()? {
            return Err(anyhow!("failed to open video file: {}", path.display()));
        }

        let fps = capture.get(videoio::CAP_PROP_FPS)?;
        let reported = capture.get(videoio::CAP_PROP_FRAME_COUNT)?;
        let frame_count = if reported.is_finite() && reported > 0.0 {
            reported as usize
        } else {
            0
        };

        crate::utils::logger::debug(&format!(
            "opened {}: {} frames @ {:.2} fps",
            path.display(),
            frame_count,
            fps
        ));

        Ok(Self {
            capture,
            path: path.to_path_buf(),
            frame_count,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Frame count as reported by the container; may be approximate.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Next frame in decode order, `None` at end of stream.
    pub fn read_frame(&mut self) -> Result<Option<Mat>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }
        Ok(Some(frame))
    }

    /// Seeks to `index` and decodes that single frame.
    pub fn read_frame_at(&mut self, index: usize) -> Result<Option<Mat>> {
        self.capture.set(videoio::CAP_PROP_POS_FRAMES, index as f64)?;
        self.read_frame()
    }
}

impl Drop for VideoDecoder {
    fn drop(&mut self) {
        let _ = self.capture.release();
    }
}
