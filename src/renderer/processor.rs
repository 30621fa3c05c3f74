use rayon::prelude::*;
use super::cell::CellData;

/// Turns an RGB pixel grid into half-block terminal cells: each cell shows
/// two vertically stacked pixels, top as foreground and bottom as background.
pub struct FrameProcessor {
    pub width: usize,
    pub height: usize,
}

impl FrameProcessor {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn rows(&self) -> usize {
        self.height.div_ceil(2)
    }

    pub fn process_frame(&self, pixel_data: &[u8]) -> Vec<CellData> {
        let w = self.width;
        let h = self.height;
        let mut cells = vec![CellData::default(); w * self.rows()];
        if w == 0 {
            return cells;
        }

        let get_pixel = |x: usize, y: usize| -> (u8, u8, u8) {
            let offset = (y * w + x) * 3;
            if y < h && offset + 2 < pixel_data.len() {
                (pixel_data[offset], pixel_data[offset + 1], pixel_data[offset + 2])
            } else {
                (0, 0, 0)
            }
        };

        cells
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(cy, row)| {
                for (cx, cell) in row.iter_mut().enumerate() {
                    *cell = CellData {
                        char: '▀',
                        fg: get_pixel(cx, cy * 2),
                        bg: get_pixel(cx, cy * 2 + 1),
                    };
                }
            });

        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_frame_half_block() {
        let proc = FrameProcessor::new(2, 4);
        let mut frame = vec![0u8; 2 * 4 * 3];
        // row 0 red, row 1 green, row 2 blue, row 3 yellow
        for x in 0..2 {
            frame[x * 3] = 255;
            frame[6 + x * 3 + 1] = 255;
            frame[12 + x * 3 + 2] = 255;
            frame[18 + x * 3] = 255;
            frame[18 + x * 3 + 1] = 255;
        }

        let cells = proc.process_frame(&frame);
        assert_eq!(cells.len(), 2 * 2);
        assert_eq!(cells[0].fg, (255, 0, 0));
        assert_eq!(cells[0].bg, (0, 255, 0));
        assert_eq!(cells[3].fg, (0, 0, 255));
        assert_eq!(cells[3].bg, (255, 255, 0));
    }

    #[test]
    fn test_odd_height_pads_last_row_black() {
        let proc = FrameProcessor::new(1, 3);
        let frame = vec![200u8; 3 * 3];
        let cells = proc.process_frame(&frame);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].fg, (200, 200, 200));
        assert_eq!(cells[1].bg, (0, 0, 0));
    }
}
