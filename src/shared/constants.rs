pub const APP_NAME: &str = "framepick";

pub const CONFIG_FILE: &str = "framepick.json";
pub const ERROR_LOG_FILE: &str = "framepick-error.log";
pub const DEBUG_LOG_FILE: &str = "framepick-debug.log";

// Default locations, relative to the working directory.
pub const DEFAULT_INPUT_DIR: &str = "videos";
pub const DEFAULT_OUTPUT_DIR: &str = "saved_frames";
pub const DEFAULT_CACHE_DIR: &str = "cache";

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4"];
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png"];

pub const CACHE_FRAME_PREFIX: &str = "frame_";
pub const CACHE_FRAME_EXT: &str = "jpg";
pub const SAVED_FRAME_EXT: &str = "jpg";

/// `%Y%m%d%H%M%S` followed by six digits of microseconds.
pub const SAVE_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%6f";

pub const KEY_SAVE_AND_NEXT: char = 'n';
pub const KEY_SKIP: char = 's';
pub const KEY_SKIP_10: char = '1';
pub const KEY_SKIP_100: char = '2';
pub const KEY_SKIP_1000: char = '3';
pub const KEY_PREVIOUS: char = 'p';
pub const KEY_QUIT_VIDEO: char = 'q';

pub const KEY_HELP: &str =
    "[n] save+next  [s] next  [1/2/3] +10/+100/+1000  [p] prev  [q] next video  [Esc] quit";
