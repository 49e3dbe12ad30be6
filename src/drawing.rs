//! Pixel, rectangle and bitmap text primitives
//!
//! Everything is built on [`Draw::set_pixel`], so whatever clipping a target
//! applies there holds for every primitive.

use crate::color::Color;
use crate::font::Font;
use crate::framebuffer::Framebuffer;
use crate::rect::Rect;

/// A surface the primitives can draw on
pub trait Draw {
    /// Sets one pixel, coordinates outside the drawable area are ignored
    fn set_pixel(&mut self, x: i32, y: i32, color: Color);

    /// The region `set_pixel` can change, used to bound the loops
    fn draw_area(&self) -> Rect;

    /// Fills a `w` x `h` rectangle with its top left corner at `(x, y)`
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        let area = self.draw_area();
        let (x0, x1) = span(x, w, area.x, area.right());
        let (y0, y1) = span(y, h, area.y, area.bottom());
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Draws the one pixel wide border of a rectangle
    fn draw_rect_outline(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        if w == 0 || h == 0 {
            return;
        }
        let right = x.saturating_add(i32::try_from(w - 1).unwrap_or(i32::MAX));
        let bottom = y.saturating_add(i32::try_from(h - 1).unwrap_or(i32::MAX));
        self.fill_rect(x, y, w, 1, color);
        self.fill_rect(x, bottom, w, 1, color);
        self.fill_rect(x, y, 1, h, color);
        self.fill_rect(right, y, 1, h, color);
    }

    /// Draws the lit pixels of `ch`, the background stays as it is.
    ///
    /// Characters the font does not cover draw nothing.
    fn draw_char(&mut self, x: i32, y: i32, ch: char, font: &Font, color: Color) {
        let Some(rows) = font.glyph(ch) else {
            return;
        };
        for row in 0..font.height() {
            for col in 0..font.width() {
                if font.is_lit(rows, col, row) {
                    self.set_pixel(x.saturating_add(col as i32), y.saturating_add(row as i32), color);
                }
            }
        }
    }

    /// Draws `text` on one line and returns the x position after it.
    ///
    /// The pen moves by the font width per character, uncovered ones included.
    /// There is no wrapping.
    fn draw_string(&mut self, x: i32, y: i32, text: &str, font: &Font, color: Color) -> i32 {
        let advance = font.width() as i32;
        let mut pen = x;
        for ch in text.chars() {
            self.draw_char(pen, y, ch, font, color);
            pen = pen.saturating_add(advance);
        }
        pen
    }
}

impl Draw for Framebuffer<'_> {
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        Framebuffer::set_pixel(self, x, y, color);
    }

    fn draw_area(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }
}

/// Part of `start..start + len` that lies in `min..max`
fn span(start: i32, len: u32, min: u32, max: u32) -> (i32, i32) {
    let from = i64::from(start).max(i64::from(min));
    let to = (i64::from(start) + i64::from(len)).min(i64::from(max));
    if from >= to {
        return (0, 0);
    }
    (from as i32, to as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FONT16, FONT8};

    extern crate std;
    use std::vec;

    fn frame_with(buffer: &mut [u8], width: u32, height: u32) -> Framebuffer<'_> {
        let mut frame = Framebuffer::new(width, height, buffer).unwrap();
        frame.clear(Color::White);
        frame
    }

    #[test]
    fn fill_rect_is_clipped_at_the_edges() {
        let mut buffer = [0u8; 8];
        let mut frame = frame_with(&mut buffer, 8, 8);
        frame.fill_rect(6, -2, 10, 4, Color::Black);
        for y in 0..8 {
            for x in 0..8 {
                let expected = if x >= 6 && y < 2 {
                    Color::Black
                } else {
                    Color::White
                };
                assert_eq!(frame.pixel(x, y), Some(expected), "({x}, {y})");
            }
        }
    }

    #[test]
    fn outline_differs_from_fill_only_on_the_border() {
        let mut buffer = [0u8; 32];
        let mut frame = frame_with(&mut buffer, 16, 16);
        frame.fill_rect(2, 3, 10, 6, Color::Black);
        frame.draw_rect_outline(2, 3, 10, 6, Color::White);

        for y in 0..16 {
            for x in 0..16 {
                let inside = (2..12).contains(&x) && (3..9).contains(&y);
                let border = inside && (x == 2 || x == 11 || y == 3 || y == 8);
                let expected = if inside && !border {
                    Color::Black
                } else {
                    Color::White
                };
                assert_eq!(frame.pixel(x, y), Some(expected), "({x}, {y})");
            }
        }
    }

    #[test]
    fn three_by_three_pattern_lands_on_the_expected_bits() {
        // 16 px wide, so row y starts at byte 2 * y
        let mut buffer = [0u8; 32];
        let mut frame = frame_with(&mut buffer, 16, 16);
        // checkerboard at (5, 2)
        for dy in 0..3 {
            for dx in 0..3 {
                if (dx + dy) % 2 == 0 {
                    frame.set_pixel(5 + dx, 2 + dy, Color::Black);
                }
            }
        }

        let mut expected = vec![0u8; 32];
        // x = 5 and 7 in row 2, bits 2 and 0
        expected[4] = 0b0000_0101;
        // x = 6 in row 3
        expected[6] = 0b0000_0010;
        expected[8] = 0b0000_0101;
        assert_eq!(frame.buffer(), &expected[..]);
    }

    #[test]
    fn zero_sized_rectangles_draw_nothing() {
        let mut buffer = [0u8; 8];
        let mut frame = frame_with(&mut buffer, 8, 8);
        frame.fill_rect(1, 1, 0, 5, Color::Black);
        frame.draw_rect_outline(1, 1, 5, 0, Color::Black);
        assert!(frame.buffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn outline_wider_than_i32_keeps_its_near_edges() {
        let mut buffer = [0u8; 8];
        let mut frame = frame_with(&mut buffer, 8, 8);
        frame.draw_rect_outline(0, 0, u32::MAX, u32::MAX, Color::Black);
        // right and bottom edges lie far outside the frame
        assert_eq!(frame.buffer()[0], 0xFF);
        assert!(frame.buffer()[1..].iter().all(|&b| b == 0x80));
    }

    #[test]
    fn draw_char_copies_the_glyph_rows() {
        let mut buffer = [0u8; 8];
        let mut frame = frame_with(&mut buffer, 8, 8);
        frame.draw_char(0, 0, 'A', &FONT8, Color::Black);
        // 8 px wide frame, so each byte is one glyph row
        assert_eq!(frame.buffer(), FONT8.glyph('A').unwrap());
    }

    #[test]
    fn draw_char_keeps_the_background() {
        let mut buffer = [0u8; 8];
        let mut frame = frame_with(&mut buffer, 8, 8);
        frame.clear(Color::Black);
        frame.draw_char(0, 0, ' ', &FONT8, Color::White);
        assert!(frame.buffer().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn draw_string_advances_by_the_font_width() {
        let mut buffer = [0u8; 64];
        let mut frame = frame_with(&mut buffer, 32, 16);
        let end = frame.draw_string(0, 0, "A\u{1}A", &FONT16, Color::Black);
        assert_eq!(end, 24);

        let glyph = FONT16.glyph('A').unwrap();
        for (row, bits) in glyph.iter().enumerate() {
            // bytes 0 and 2 of each 4 byte row, byte 1 stays empty
            assert_eq!(frame.buffer()[row * 4], *bits);
            assert_eq!(frame.buffer()[row * 4 + 1], 0);
            assert_eq!(frame.buffer()[row * 4 + 2], *bits);
        }
    }

    #[test]
    fn text_past_the_edge_is_clipped() {
        let mut buffer = [0u8; 2];
        let mut frame = frame_with(&mut buffer, 4, 4);
        frame.draw_string(-100, 2, "WWWWWWWWWWWWWWWWWWWWWWWWWWWWWW", &FONT16, Color::Black);
        frame.draw_string(i32::MAX - 4, 0, "WW", &FONT16, Color::Black);
        // nothing above the text line
        assert_eq!(frame.buffer()[0], 0);
    }
}
