use anyhow::Result;
use opencv::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::cache;
use crate::decoder::{image_io, VideoDecoder};
use crate::utils::{file_utils, logger};

/// How frames of a video are obtained during a session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Extract every frame to the cache directory first, then read images.
    Cached,
    /// Seek the decoder for every frame shown.
    Direct,
}

/// Random access to the frames of one video.
pub trait FrameSource {
    fn frame_count(&self) -> usize;

    /// Frame at `index`, or `None` when the source has nothing there.
    fn frame(&mut self, index: usize) -> Result<Option<Mat>>;

    /// Releases whatever the source holds on to. Called once per video.
    fn close(self: Box<Self>) -> Result<()>;
}

/// Opens the source for `video` according to `strategy`.
pub fn open(strategy: Strategy, video: &Path, cache_dir: &Path) -> Result<Box<dyn FrameSource>> {
    Ok(match strategy {
        Strategy::Cached => {
            match cache::ensure_cache(video, cache_dir) {
                Ok(cache::CacheStatus::Populated(0)) => logger::error(&format!(
                    "no frames could be decoded from {}",
                    video.display()
                )),
                Ok(_) => {}
                Err(err) => {
                    // A half-written cache would be reused as-is by the next video
                    let _ = cache::clear_cache(cache_dir);
                    return Err(err);
                }
            }
            Box::new(CachedFrames::load(cache_dir)?)
        }
        Strategy::Direct => Box::new(DirectFrames::open(video)?),
    })
}

/// Frames read back from extracted images.
pub struct CachedFrames {
    dir: PathBuf,
    files: Vec<PathBuf>,
}

impl CachedFrames {
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            dir: dir.to_path_buf(),
            files: file_utils::list_cached_frames(dir)?,
        })
    }
}

impl FrameSource for CachedFrames {
    fn frame_count(&self) -> usize {
        self.files.len()
    }

    fn frame(&mut self, index: usize) -> Result<Option<Mat>> {
        match self.files.get(index) {
            Some(path) => Ok(Some(image_io::read_image(path)?)),
            None => Ok(None),
        }
    }

    fn close(self: Box<Self>) -> Result<()> {
        cache::clear_cache(&self.dir)
    }
}

/// Frames decoded on demand.
pub struct DirectFrames {
    decoder: VideoDecoder,
}

impl DirectFrames {
    pub fn open(video: &Path) -> Result<Self> {
        Ok(Self {
            decoder: VideoDecoder::open(video)?,
        })
    }
}

impl FrameSource for DirectFrames {
    fn frame_count(&self) -> usize {
        self.decoder.frame_count()
    }

    fn frame(&mut self, index: usize) -> Result<Option<Mat>> {
        self.decoder.read_frame_at(index)
    }

    fn close(self: Box<Self>) -> Result<()> {
        // Dropping the decoder releases the capture.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support;
    use tempfile::TempDir;

    #[test]
    fn test_cached_source_reads_in_numeric_order() {
        let tmp = TempDir::new().unwrap();
        let cache_dir = tmp.path().join("cache");
        std::fs::create_dir(&cache_dir).unwrap();
        for index in 0..12 {
            test_support::write_solid_png(&cache_dir.join(format!("frame_{}.png", index)), index as u8);
        }

        let mut source = CachedFrames::load(&cache_dir).unwrap();
        assert_eq!(source.frame_count(), 12);

        let frame = source.frame(10).unwrap().unwrap();
        assert_eq!(test_support::first_pixel(&frame), 10);
        assert!(source.frame(12).unwrap().is_none());

        Box::new(source).close().unwrap();
        assert!(!cache_dir.exists());
    }

    #[test]
    fn test_cached_strategy_extracts_one_image_per_frame() {
        let tmp = TempDir::new().unwrap();
        let video = tmp.path().join("clip.avi");
        let cache_dir = tmp.path().join("cache");
        test_support::write_test_video(&video, 3);

        let source = open(Strategy::Cached, &video, &cache_dir).unwrap();
        assert_eq!(source.frame_count(), 3);
        assert_eq!(std::fs::read_dir(&cache_dir).unwrap().count(), 3);

        // A populated cache is reused untouched.
        assert_eq!(
            cache::ensure_cache(&video, &cache_dir).unwrap(),
            cache::CacheStatus::Reused
        );
        source.close().unwrap();
        assert!(!cache_dir.exists());
    }

    #[test]
    fn test_direct_strategy_seeks_frames() {
        let tmp = TempDir::new().unwrap();
        let video = tmp.path().join("clip.avi");
        let cache_dir = tmp.path().join("cache");
        test_support::write_test_video(&video, 3);

        let mut source = open(Strategy::Direct, &video, &cache_dir).unwrap();
        assert_eq!(source.frame_count(), 3);
        assert!(source.frame(2).unwrap().is_some());
        assert!(source.frame(0).unwrap().is_some());
        source.close().unwrap();
        assert!(!cache_dir.exists());
    }

    #[test]
    fn test_open_missing_video_fails_for_both_strategies() {
        let tmp = TempDir::new().unwrap();
        let video = tmp.path().join("missing.mp4");
        let cache_dir = tmp.path().join("cache");

        assert!(open(Strategy::Direct, &video, &cache_dir).is_err());
        assert!(open(Strategy::Cached, &video, &cache_dir).is_err());
    }
}
