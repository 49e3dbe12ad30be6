//! Display context: the framebuffer plus pen state
//!
//! A [`Canvas`] is what the compositor draws through. It carries the cursor,
//! text color and text size between calls and an optional clip rectangle.
//! When no framebuffer could be set up every drawing call is a no-op.

use crate::color::Color;
use crate::drawing::Draw;
use crate::font::{font_for_size, Font};
use crate::framebuffer::Framebuffer;
use crate::rect::Rect;

/// Text size used until [`Canvas::set_text_size`] is called
pub const DEFAULT_TEXT_SIZE: u8 = 2;

/// Owned drawing context
pub struct Canvas<'a> {
    frame: Option<Framebuffer<'a>>,
    cursor_x: i32,
    cursor_y: i32,
    line_start: i32,
    text_color: Color,
    text_size: u8,
    clip: Option<Rect>,
}

impl<'a> Canvas<'a> {
    /// `None` stands for a framebuffer that could not be allocated
    pub fn new(frame: Option<Framebuffer<'a>>) -> Self {
        Canvas {
            frame,
            cursor_x: 0,
            cursor_y: 0,
            line_start: 0,
            text_color: Color::Black,
            text_size: DEFAULT_TEXT_SIZE,
            clip: None,
        }
    }

    /// Whether drawing reaches a framebuffer
    pub fn has_frame(&self) -> bool {
        self.frame.is_some()
    }

    pub fn frame(&self) -> Option<&Framebuffer<'a>> {
        self.frame.as_ref()
    }

    pub fn frame_mut(&mut self) -> Option<&mut Framebuffer<'a>> {
        self.frame.as_mut()
    }

    /// Bytes to push to the panel
    pub fn buffer(&self) -> Option<&[u8]> {
        self.frame.as_ref().map(Framebuffer::buffer)
    }

    /// Fills the whole frame, the clip rectangle does not apply
    pub fn clear(&mut self, color: Color) {
        if let Some(frame) = self.frame.as_mut() {
            frame.clear(color);
        }
    }

    /// Moves the pen, `print` continues from here
    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor_x = x;
        self.cursor_y = y;
        self.line_start = x;
    }

    pub fn cursor(&self) -> (i32, i32) {
        (self.cursor_x, self.cursor_y)
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    /// Selects one of the five text sizes, see [`font_for_size`]
    pub fn set_text_size(&mut self, size: u8) {
        self.text_size = size;
    }

    pub fn text_size(&self) -> u8 {
        self.text_size
    }

    /// Font of the current text size
    pub fn font(&self) -> &'static Font {
        font_for_size(self.text_size)
    }

    /// Draws `text` at the cursor and moves the cursor behind it.
    ///
    /// A `'\n'` returns to the x of the last [`set_cursor`](Self::set_cursor)
    /// one line further down.
    pub fn print(&mut self, text: &str) {
        let font = self.font();
        let color = self.text_color;
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.cursor_x = self.line_start;
                self.cursor_y = self.cursor_y.saturating_add(font.height() as i32);
            }
            self.cursor_x = self.draw_string(self.cursor_x, self.cursor_y, line, font, color);
        }
    }

    /// Restricts drawing to `clip`, `None` lifts the restriction
    pub fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }

    pub fn clip(&self) -> Option<Rect> {
        self.clip
    }
}

impl Draw for Canvas<'_> {
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(clip) = self.clip {
            if !clip.contains(x, y) {
                return;
            }
        }
        if let Some(frame) = self.frame.as_mut() {
            frame.set_pixel(x, y, color);
        }
    }

    fn draw_area(&self) -> Rect {
        let Some(frame) = self.frame.as_ref() else {
            return Rect::default();
        };
        let area = frame.draw_area();
        match self.clip {
            Some(clip) => area.intersect(clip),
            None => area,
        }
    }
}
