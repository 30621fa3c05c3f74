use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::decoder::{image_io, VideoDecoder};
use crate::utils::{file_utils, logger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// The directory already had content; nothing was decoded.
    Reused,
    /// Frames were decoded and written.
    Populated(usize),
}

/// Extracts every frame of `video` into `cache_dir`, unless the directory
/// already holds anything. Existing content is trusted as-is.
pub fn ensure_cache(video: &Path, cache_dir: &Path) -> Result<CacheStatus> {
    fs::create_dir_all(cache_dir)
        .with_context(|| format!("failed to create cache directory {}", cache_dir.display()))?;

    if file_utils::dir_has_entries(cache_dir)? {
        logger::info(&format!(
            "cache detected in {}, skipping extraction",
            cache_dir.display()
        ));
        return Ok(CacheStatus::Reused);
    }

    let mut decoder = VideoDecoder::open(video)?;
    let written = populate(&mut decoder, cache_dir)?;

    logger::info(&format!(
        "cached {} frames of {} into {}",
        written,
        video.display(),
        cache_dir.display()
    ));
    Ok(CacheStatus::Populated(written))
}

fn populate(decoder: &mut VideoDecoder, cache_dir: &Path) -> Result<usize> {
    let mut index = 0;
    while let Some(frame) = decoder.read_frame()? {
        let path = cache_dir.join(file_utils::cache_frame_name(index));
        image_io::write_image(&path, &frame)
            .with_context(|| format!("failed to cache frame {} of {}", index, decoder.path().display()))?;
        index += 1;
    }
    Ok(index)
}

/// Removes the cache directory and everything in it. Missing is fine.
pub fn clear_cache(cache_dir: &Path) -> Result<()> {
    if !cache_dir.exists() {
        return Ok(());
    }
    fs::remove_dir_all(cache_dir)
        .with_context(|| format!("failed to delete cache directory {}", cache_dir.display()))?;
    logger::info(&format!("cache directory {} deleted", cache_dir.display()));
    Ok(())
}
