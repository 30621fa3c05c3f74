use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local};
use opencv::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::decoder::image_io;
use crate::shared::constants;

/// Writes saved frames as `<video-stem>-<timestamp>.jpg`.
///
/// Timestamps handed out by one writer strictly increase, so two saves in
/// the same microsecond still get distinct names.
pub struct FrameWriter {
    dir: PathBuf,
    last_stamp: Option<DateTime<Local>>,
    saved: usize,
}

impl FrameWriter {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            last_stamp: None,
            saved: 0,
        }
    }

    pub fn saved(&self) -> usize {
        self.saved
    }

    pub fn save(&mut self, frame: &Mat, video: &Path) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create output directory {}", self.dir.display()))?;

        let stamp = self.next_stamp(Local::now());
        let path = self.dir.join(file_name(video, &stamp));
        image_io::write_image(&path, frame)?;

        self.saved += 1;
        crate::utils::logger::info(&format!("frame saved as {}", path.display()));
        Ok(path)
    }

    fn next_stamp(&mut self, now: DateTime<Local>) -> DateTime<Local> {
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

fn file_name(video: &Path, stamp: &DateTime<Local>) -> String {
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "frame".to_string());
    format!(
        "{}-{}.{}",
        stem,
        stamp.format(constants::SAVE_TIMESTAMP_FORMAT),
        constants::SAVED_FRAME_EXT
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support;
    use chrono::TimeZone;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn test_file_name_uses_stem_and_microseconds() {
        let stamp = Local
            .with_ymd_and_hms(2024, 3, 5, 14, 7, 9)
            .unwrap()
            + Duration::microseconds(42);
        assert_eq!(
            file_name(Path::new("/videos/bottle run.mp4"), &stamp),
            "bottle run-20240305140709000042.jpg"
        );
    }

    #[test]
    fn test_stamps_strictly_increase() {
        let tmp = TempDir::new().unwrap();
        let mut writer = FrameWriter::new(tmp.path());
        let now = Local::now();

        let a = writer.next_stamp(now);
        let b = writer.next_stamp(now);
        let c = writer.next_stamp(now - Duration::seconds(1));
        assert!(a < b && b < c);
    }

    #[test]
    fn test_repeated_saves_produce_distinct_files() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let mut writer = FrameWriter::new(&out);
        let frame = test_support::solid_frame(90);
        let video = Path::new("clip.mp4");

        let names: HashSet<_> = (0..25)
            .map(|_| writer.save(&frame, video).unwrap())
            .collect();

        assert_eq!(names.len(), 25);
        assert_eq!(writer.saved(), 25);
        assert_eq!(fs::read_dir(&out).unwrap().count(), 25);
    }
}
