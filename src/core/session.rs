use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::core::config::{AppConfig, OpenFailure};
use crate::core::frame_source::{self, FrameSource};
use crate::core::keymap::{self, NavKey};
use crate::core::output::FrameWriter;
use crate::ui::viewer::Viewer;
use crate::utils::{file_utils, logger};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub videos_found: usize,
    pub videos_browsed: usize,
    pub videos_failed: usize,
    pub frames_saved: usize,
    /// The user ended the run before the last video.
    pub aborted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VideoOutcome {
    Finished,
    Exit,
}

/// Browses every video of the configured input directory.
pub fn run(config: &AppConfig, viewer: &mut dyn Viewer) -> Result<SessionSummary> {
    let videos = file_utils::list_videos(&config.input_video_directory)?;
    logger::info(&format!(
        "found {} videos in {}",
        videos.len(),
        config.input_video_directory.display()
    ));

    let mut session = Session::new(config, viewer);
    session.run_videos(&videos, |video| {
        frame_source::open(config.strategy, video, &config.cache_directory)
    })
}

struct Session<'a> {
    config: &'a AppConfig,
    viewer: &'a mut dyn Viewer,
    writer: FrameWriter,
    summary: SessionSummary,
}

impl<'a> Session<'a> {
    fn new(config: &'a AppConfig, viewer: &'a mut dyn Viewer) -> Self {
        Self {
            config,
            viewer,
            writer: FrameWriter::new(&config.output_image_directory),
            summary: SessionSummary::default(),
        }
    }

    fn run_videos<F>(&mut self, videos: &[PathBuf], mut open: F) -> Result<SessionSummary>
    where
        F: FnMut(&Path) -> Result<Box<dyn FrameSource>>,
    {
        self.summary.videos_found = videos.len();

        for (position, video) in videos.iter().enumerate() {
            let source = match open(video) {
                Ok(source) => source,
                Err(err) => {
                    logger::error(&format!("error opening video {}: {:#}", video.display(), err));
                    match self.config.open_failure {
                        OpenFailure::Abort => {
                            return Err(err.context(format!(
                                "error opening video file {}",
                                video.display()
                            )));
                        }
                        OpenFailure::Skip => {
                            self.summary.videos_failed += 1;
                            self.viewer
                                .notify(&format!("skipped {}: could not open", display_name(video)));
                            continue;
                        }
                    }
                }
            };

            let outcome = self.browse(position, video, source)?;
            self.summary.videos_browsed += 1;

            if outcome == VideoOutcome::Exit {
                logger::info("run ended by user");
                self.summary.aborted = true;
                break;
            }
        }

        self.summary.frames_saved = self.writer.saved();
        Ok(self.summary.clone())
    }

    /// Runs the key loop for one video and always closes its source.
    fn browse(
        &mut self,
        position: usize,
        video: &Path,
        mut source: Box<dyn FrameSource>,
    ) -> Result<VideoOutcome> {
        let result = self.browse_frames(position, video, source.as_mut());
        let closed = source.close();
        let outcome = result?;
        closed?;
        Ok(outcome)
    }

    fn browse_frames(
        &mut self,
        position: usize,
        video: &Path,
        source: &mut dyn FrameSource,
    ) -> Result<VideoOutcome> {
        let total = source.frame_count();
        if total == 0 {
            logger::error(&format!("{} has no frames", video.display()));
            self.viewer
                .notify(&format!("skipped {}: no frames", display_name(video)));
            return Ok(VideoOutcome::Finished);
        }

        let mut index = 0;
        loop {
            let Some(frame) = source.frame(index)? else {
                logger::debug(&format!(
                    "no frame at {} of {}, leaving video",
                    index,
                    video.display()
                ));
                return Ok(VideoOutcome::Finished);
            };

            let title = format!(
                "Video [{}/{}] | Video Frame [{}/{}]",
                position + 1,
                self.summary.videos_found,
                index,
                total
            );
            self.viewer.show(&frame, &title)?;

            let key = self.viewer.wait_key()?;
            if key == NavKey::Exit {
                return Ok(VideoOutcome::Exit);
            }

            let nav = keymap::resolve(key, index, total);
            if nav.save_frame {
                let path = self.writer.save(&frame, video)?;
                self.viewer
                    .notify(&format!("Frame saved as: {}", display_name(&path)));
            }
            if nav.next_video {
                return Ok(VideoOutcome::Finished);
            }
            index = nav.index;
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
