use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::constants;

/// Files directly under `dir` whose extension is one of `allowed`
/// (case-insensitive), sorted by path.
pub fn list_files(dir: &Path, allowed: &[&str]) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_allowed_extension(path, allowed))
        .collect();

    files.sort();
    Ok(files)
}

/// Videos in `dir`, in session order. A missing directory yields no videos.
pub fn list_videos(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    list_files(dir, constants::VIDEO_EXTENSIONS)
}

/// Cached frame images ordered by the frame number in their names, so that
/// `frame_10` follows `frame_9`. Unnumbered files go last, by name.
pub fn list_cached_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut frames = list_files(dir, constants::IMAGE_EXTENSIONS)?;
    frames.sort_by(|a, b| {
        let key = |p: &PathBuf| (frame_number(p).unwrap_or(u64::MAX), p.clone());
        key(a).cmp(&key(b))
    });
    Ok(frames)
}

/// Trailing run of digits in the file stem, e.g. `frame_42.jpg` -> 42.
pub fn frame_number(path: &Path) -> Option<u64> {
    let stem = path.file_stem()?.to_str()?;
    let digits_start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    stem[digits_start..].parse().ok()
}

pub fn cache_frame_name(index: usize) -> String {
    format!(
        "{}{}.{}",
        constants::CACHE_FRAME_PREFIX,
        index,
        constants::CACHE_FRAME_EXT
    )
}

/// True when `dir` exists and holds at least one entry of any kind.
pub fn dir_has_entries(dir: &Path) -> Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }
    let mut entries =
        fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?;
    Ok(entries.next().is_some())
}

pub fn has_allowed_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    let ext = ext.to_ascii_lowercase();
    allowed
        .iter()
        .any(|allowed_ext| *allowed_ext == ext.as_str())
}

/// Path as a `&str`, which the OpenCV bindings require.
pub fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .with_context(|| format!("path is not valid UTF-8: {}", path.display()))
}
