use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::frame_source::Strategy;
use crate::renderer::DisplayMode;
use crate::shared::constants;

/// What to do when a video cannot be opened.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OpenFailure {
    /// Stop the whole run.
    Abort,
    /// Report it and continue with the next video.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub input_video_directory: PathBuf,
    pub output_image_directory: PathBuf,
    pub cache_directory: PathBuf,
    pub strategy: Strategy,
    pub open_failure: OpenFailure,
    pub display_mode: DisplayMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_video_directory: PathBuf::from(constants::DEFAULT_INPUT_DIR),
            output_image_directory: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
            cache_directory: PathBuf::from(constants::DEFAULT_CACHE_DIR),
            strategy: Strategy::Cached,
            open_failure: OpenFailure::Abort,
            display_mode: DisplayMode::Rgb,
        }
    }
}

/// Command-line overrides; anything left unset keeps the file/default value.
#[derive(Debug, Default, clap::Args)]
pub struct ConfigArgs {
    /// JSON config file (defaults to ./framepick.json when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory scanned for videos
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Directory receiving saved frames
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Scratch directory for extracted frames
    #[arg(long)]
    pub cache: Option<PathBuf>,
    #[arg(short, long, value_enum)]
    pub strategy: Option<Strategy>,
    #[arg(long, value_enum)]
    pub open_failure: Option<OpenFailure>,
    #[arg(short, long, value_enum)]
    pub mode: Option<DisplayMode>,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config.normalized())
    }

    /// Defaults, then the config file, then command-line flags.
    pub fn load(args: &ConfigArgs) -> Result<Self> {
        let base = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => {
                let implicit = Path::new(constants::CONFIG_FILE);
                if implicit.exists() {
                    Self::from_file(implicit)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(base.with_overrides(args))
    }

    pub fn with_overrides(mut self, args: &ConfigArgs) -> Self {
        if let Some(input) = &args.input {
            self.input_video_directory = input.clone();
        }
        if let Some(output) = &args.output {
            self.output_image_directory = output.clone();
        }
        if let Some(cache) = &args.cache {
            self.cache_directory = cache.clone();
        }
        if let Some(strategy) = args.strategy {
            self.strategy = strategy;
        }
        if let Some(open_failure) = args.open_failure {
            self.open_failure = open_failure;
        }
        if let Some(mode) = args.mode {
            self.display_mode = mode;
        }
        self.normalized()
    }

    fn normalized(mut self) -> Self {
        self.input_video_directory = trim_path(&self.input_video_directory);
        self.output_image_directory = trim_path(&self.output_image_directory);
        self.cache_directory = trim_path(&self.cache_directory);
        self
    }
}

/// Strips surrounding whitespace, which tends to sneak into pasted paths.
fn trim_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(s.trim()),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("framepick.json");
        fs::write(
            &path,
            r#"{ "input_video_directory": "  /data/videos ", "strategy": "direct" }"#,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.input_video_directory, PathBuf::from("/data/videos"));
        assert_eq!(config.strategy, Strategy::Direct);
        assert_eq!(config.cache_directory, PathBuf::from(constants::DEFAULT_CACHE_DIR));
        assert_eq!(config.open_failure, OpenFailure::Abort);
    }

    #[test]
    fn test_flags_override_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.json");
        fs::write(&path, r#"{ "output_image_directory": "from_file" }"#).unwrap();

        let args = ConfigArgs {
            config: Some(path),
            output: Some(PathBuf::from("from_flag ")),
            open_failure: Some(OpenFailure::Skip),
            mode: Some(DisplayMode::Ascii),
            ..Default::default()
        };
        let config = AppConfig::load(&args).unwrap();
        assert_eq!(config.output_image_directory, PathBuf::from("from_flag"));
        assert_eq!(config.open_failure, OpenFailure::Skip);
        assert_eq!(config.display_mode, DisplayMode::Ascii);
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(AppConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"strategy\":\"cached\""));
        assert!(json.contains("\"display_mode\":\"rgb\""));
    }
}
