use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use opencv::prelude::*;

use crate::core::keymap::NavKey;
use crate::decoder::FrameData;
use crate::renderer::{scaler, DisplayManager, DisplayMode, FrameProcessor};
use crate::shared::constants;

/// Where the session shows frames and gets keys from.
pub trait Viewer {
    fn show(&mut self, frame: &Mat, title: &str) -> Result<()>;

    /// One-line notice, shown with the next frame.
    fn notify(&mut self, message: &str);

    /// Blocks until the next keypress.
    fn wait_key(&mut self) -> Result<NavKey>;
}

/// Half-block rendering into the terminal's alternate screen.
pub struct TerminalViewer {
    display: DisplayManager,
    notice: Option<String>,
}

impl TerminalViewer {
    pub fn new(mode: DisplayMode) -> Result<Self> {
        Ok(Self {
            display: DisplayManager::new(mode).context("failed to set up the terminal")?,
            notice: None,
        })
    }

    fn footer(&self) -> String {
        match &self.notice {
            Some(notice) => format!("{}  |  {}", constants::KEY_HELP, notice),
            None => constants::KEY_HELP.to_string(),
        }
    }
}

impl Viewer for TerminalViewer {
    fn show(&mut self, frame: &Mat, title: &str) -> Result<()> {
        let (cols, rows) = self.display.picture_area()?;
        let pixel_w = cols as u32;
        let pixel_h = rows as u32 * 2;

        let rgb = FrameData::from_mat(frame)?;
        let fitted = scaler::letterbox(&rgb, pixel_w, pixel_h)?;

        let processor = FrameProcessor::new(fitted.width as usize, fitted.height as usize);
        let cells = processor.process_frame(&fitted.buffer);

        let footer = self.footer();
        self.display.render(&cells, processor.width, title, &footer)
    }

    fn notify(&mut self, message: &str) {
        self.notice = Some(message.to_string());
    }

    fn wait_key(&mut self) -> Result<NavKey> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    return Ok(NavKey::from_event(&key));
                }
                // Redraw at the new size
                Event::Resize(_, _) => return Ok(NavKey::Other),
                _ => {}
            }
        }
    }
}
