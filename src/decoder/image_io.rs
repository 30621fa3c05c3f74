use anyhow::{anyhow, Result};
use opencv::{core, imgcodecs, prelude::*};
use std::path::Path;

use crate::utils::file_utils;

pub fn read_image(path: &Path) -> Result<Mat> {
    let image = imgcodecs::imread(file_utils::path_str(path)?, imgcodecs::IMREAD_COLOR)?;
    if image.empty() {
        return Err(anyhow!("failed to read image: {}", path.display()));
    }
    Ok(image)
}

/// Encodes `image` using the format implied by the extension of `path`.
pub fn write_image(path: &Path, image: &Mat) -> Result<()> {
    let params = core::Vector::<i32>::new();
    if !imgcodecs::imwrite(file_utils::path_str(path)?, image, &params)? {
        return Err(anyhow!("failed to write image: {}", path.display()));
    }
    Ok(())
}
