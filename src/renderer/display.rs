use anyhow::Result;
use crossterm::{
    cursor,
    style::Print,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Stdout, Write};

use super::cell::CellData;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Ascii,
    Rgb,
}

/// Rows reserved above and below the picture for the title and key help.
pub const TITLE_ROWS: u16 = 1;
pub const FOOTER_ROWS: u16 = 1;

// Darkest to brightest
const ASCII_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

pub struct DisplayManager {
    stdout: BufWriter<Stdout>,
    mode: DisplayMode,
    last_cells: Option<Vec<CellData>>,
    render_buffer: Vec<u8>,
}

impl DisplayManager {
    pub fn new(mode: DisplayMode) -> Result<Self> {
        let stdout = BufWriter::with_capacity(1024 * 1024, std::io::stdout());
        let mut dm = Self {
            stdout,
            mode,
            last_cells: None,
            render_buffer: Vec::with_capacity(1024 * 1024),
        };

        dm.initialize_terminal()?;

        Ok(dm)
    }

    fn initialize_terminal(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.execute(EnterAlternateScreen)?;
        self.stdout.execute(cursor::Hide)?;

        // Disable line wrapping (DECRAWM) so the last column never scrolls
        self.stdout.execute(Print("\x1b[?7l"))?;

        Ok(())
    }

    /// Return terminal size in character columns and rows, converting from pixels when needed.
    pub fn terminal_size_chars(&self) -> Result<(u16, u16)> {
        let (mut term_cols, mut term_rows) = terminal::size()?;
        if let (Ok(cw_str), Ok(ch_str)) =
            (std::env::var("CHAR_WIDTH"), std::env::var("CHAR_HEIGHT"))
        {
            if let (Ok(cw), Ok(ch)) = (cw_str.parse::<u16>(), ch_str.parse::<u16>()) {
                if term_cols > cw * 16 {
                    term_cols = (term_cols / cw).max(1);
                }
                if term_rows > ch * 8 {
                    term_rows = (term_rows / ch).max(1);
                }
            }
        }
        Ok((term_cols, term_rows))
    }

    /// Area left for the picture once title and footer rows are taken.
    pub fn picture_area(&self) -> Result<(u16, u16)> {
        let (cols, rows) = self.terminal_size_chars()?;
        Ok((cols.max(1), rows.saturating_sub(TITLE_ROWS + FOOTER_ROWS).max(1)))
    }

    /// Draws `cells` (row-major, `width` wide) centred below the title and
    /// above the footer. Only cells that changed since the last call are sent.
    pub fn render(&mut self, cells: &[CellData], width: usize, title: &str, footer: &str) -> Result<()> {
        let (term_cols, term_rows) = self.terminal_size_chars()?;

        self.render_buffer.clear();
        // Synchronized update begin
        self.render_buffer.extend_from_slice(b"\x1b[?2026h");

        let force_redraw = self.last_cells.as_ref().map(|v| v.len()) != Some(cells.len());
        if force_redraw {
            self.render_buffer.extend_from_slice(b"\x1b[2J");
            self.last_cells = Some(vec![CellData::default(); cells.len()]);
        }

        write_text_line(&mut self.render_buffer, 0, title, term_cols);
        write_text_line(&mut self.render_buffer, term_rows.saturating_sub(1), footer, term_cols);

        if width > 0 {
            let picture_rows = term_rows.saturating_sub(TITLE_ROWS + FOOTER_ROWS);
            let content_width = width as u16;
            let content_height = (cells.len() / width) as u16;
            let offset_x = term_cols.saturating_sub(content_width) / 2;
            let offset_y = TITLE_ROWS + picture_rows.saturating_sub(content_height) / 2;
            let bottom = term_rows.saturating_sub(FOOTER_ROWS);

            let last_cells = self.last_cells.get_or_insert_with(Vec::new);
            let buffer = &mut self.render_buffer;
            let mut last_fg: Option<(u8, u8, u8)> = None;
            let mut last_bg: Option<(u8, u8, u8)> = None;
            // Virtual cursor; None means the next write needs an explicit move
            let mut cursor_at: Option<(u16, u16)> = None;

            for (i, cell) in cells.iter().enumerate() {
                if !force_redraw && last_cells[i] == *cell {
                    cursor_at = None;
                    continue;
                }

                let target_x = (i % width) as u16 + offset_x;
                let target_y = (i / width) as u16 + offset_y;
                if target_x >= term_cols || target_y >= bottom {
                    cursor_at = None;
                    continue;
                }

                if cursor_at != Some((target_x, target_y)) {
                    move_to(buffer, target_x, target_y);
                }

                match self.mode {
                    DisplayMode::Rgb => {
                        if Some(cell.fg) != last_fg {
                            push_color(buffer, b"\x1b[38;2;", cell.fg);
                            last_fg = Some(cell.fg);
                        }
                        if Some(cell.bg) != last_bg {
                            push_color(buffer, b"\x1b[48;2;", cell.bg);
                            last_bg = Some(cell.bg);
                        }
                        push_char(buffer, cell.char);
                    }
                    DisplayMode::Ascii => push_char(buffer, ascii_for(cell)),
                }

                last_cells[i] = *cell;
                cursor_at = Some((target_x + 1, target_y));
            }
        }

        self.render_buffer.extend_from_slice(b"\x1b[0m");
        // Synchronized update end
        self.render_buffer.extend_from_slice(b"\x1b[?2026l");

        self.stdout.write_all(&self.render_buffer)?;
        self.stdout.flush()?;
        Ok(())
    }
}

fn move_to(buffer: &mut Vec<u8>, x: u16, y: u16) {
    buffer.extend_from_slice(format!("\x1b[{};{}H", y + 1, x + 1).as_bytes());
}

fn push_color(buffer: &mut Vec<u8>, prefix: &[u8], (r, g, b): (u8, u8, u8)) {
    buffer.extend_from_slice(prefix);
    buffer.extend_from_slice(format!("{};{};{}m", r, g, b).as_bytes());
}

fn push_char(buffer: &mut Vec<u8>, c: char) {
    let mut b_dst = [0u8; 4];
    buffer.extend_from_slice(c.encode_utf8(&mut b_dst).as_bytes());
}

/// Grayscale character for a half-block cell, averaging both halves.
fn ascii_for(cell: &CellData) -> char {
    let luma = |(r, g, b): (u8, u8, u8)| (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000;
    let brightness = (luma(cell.fg) + luma(cell.bg)) / 2;
    let idx = (brightness * (ASCII_RAMP.len() as u32 - 1) / 255) as usize;
    ASCII_RAMP[idx]
}

/// Writes `text` on row `y`, truncated to `cols` and padded to clear leftovers.
fn write_text_line(buffer: &mut Vec<u8>, y: u16, text: &str, cols: u16) {
    move_to(buffer, 0, y);
    buffer.extend_from_slice(b"\x1b[0m");
    let line: String = text.chars().take(cols as usize).collect();
    buffer.extend_from_slice(line.as_bytes());
    // Erase to end of line
    buffer.extend_from_slice(b"\x1b[K");
}

impl Drop for DisplayManager {
    fn drop(&mut self) {
        let _ = self.stdout.execute(Print("\x1b[?7h"));
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_ramp_extremes() {
        let black = CellData::default();
        let white = CellData { char: '▀', fg: (255, 255, 255), bg: (255, 255, 255) };
        assert_eq!(ascii_for(&black), ' ');
        assert_eq!(ascii_for(&white), '@');
    }

    #[test]
    fn test_text_line_is_truncated_and_cleared() {
        let mut buffer = Vec::new();
        write_text_line(&mut buffer, 2, "Video [1/3]", 5);
        let out = String::from_utf8(buffer).unwrap();
        assert!(out.starts_with("\x1b[3;1H"));
        assert!(out.contains("Video\x1b[K"));
        assert!(!out.contains("[1/3]"));
    }
}
