//! Packed 1 bit per pixel frame storage
//!
//! Pixel `(x, y)` of the unrotated panel lives at bit `7 - (x + y * width) % 8`
//! of byte `(x + y * width) / 8`, so rows are packed back to back without
//! padding. A set bit is [`Color::Black`].

use bit_field::BitField;

use crate::buffer_len;
use crate::color::Color;

/// Display rotation, only 90° increments supported
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate by 90 degrees clockwise
    Rotate90,
    /// Rotate by 180 degrees clockwise
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

/// Error found while setting up a [`Framebuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferError {
    /// The provided buffer was too small
    BufferTooSmall {
        /// Bytes the resolution needs
        needed: usize,
        /// Bytes that were handed in
        provided: usize,
    },
}

impl core::fmt::Display for FramebufferError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferTooSmall { needed, provided } => write!(
                f,
                "frame buffer of {provided} bytes is too small, {needed} bytes needed"
            ),
        }
    }
}

/// A frame drawn in RAM and pushed to the panel as a whole.
///
/// The storage is borrowed so the host decides where the 48kB of a full
/// 800x480 frame live (static, heap, PSRAM). It is never resized.
pub struct Framebuffer<'a> {
    width: u32,
    height: u32,
    rotation: DisplayRotation,
    buffer: &'a mut [u8],
}

impl<'a> Framebuffer<'a> {
    /// Wraps `buffer` for a panel of `width` x `height` pixels.
    ///
    /// The buffer must hold at least [`buffer_len`]`(width, height)` bytes;
    /// anything beyond that is left alone. The content is not touched, call
    /// [`init`](Self::init) or [`clear`](Self::clear) to start from a known state.
    pub fn new(width: u32, height: u32, buffer: &'a mut [u8]) -> Result<Self, FramebufferError> {
        let needed = buffer_len(width as usize, height as usize);
        if buffer.len() < needed {
            return Err(FramebufferError::BufferTooSmall {
                needed,
                provided: buffer.len(),
            });
        }
        Ok(Framebuffer {
            width,
            height,
            rotation: DisplayRotation::default(),
            buffer,
        })
    }

    /// Records the orientation and fills the frame with `background`
    pub fn init(&mut self, rotation: DisplayRotation, background: Color) {
        self.rotation = rotation;
        self.clear(background);
    }

    /// Sets every pixel to `color`
    pub fn clear(&mut self, color: Color) {
        let len = self.len();
        self.buffer[..len].fill(color.get_byte_value());
    }

    /// get internal buffer to use it (to draw in epd)
    pub fn buffer(&self) -> &[u8] {
        &self.buffer[..self.len()]
    }

    /// Set the display rotation.
    ///
    /// This only concerns future drawing made to it. Anything aready drawn
    /// stays as it is in the buffer.
    pub fn set_rotation(&mut self, rotation: DisplayRotation) {
        self.rotation = rotation;
    }

    /// Get current rotation
    pub fn rotation(&self) -> DisplayRotation {
        self.rotation
    }

    /// Width as seen through the current rotation
    pub fn width(&self) -> u32 {
        match self.rotation {
            DisplayRotation::Rotate0 | DisplayRotation::Rotate180 => self.width,
            DisplayRotation::Rotate90 | DisplayRotation::Rotate270 => self.height,
        }
    }

    /// Height as seen through the current rotation
    pub fn height(&self) -> u32 {
        match self.rotation {
            DisplayRotation::Rotate0 | DisplayRotation::Rotate180 => self.height,
            DisplayRotation::Rotate90 | DisplayRotation::Rotate270 => self.width,
        }
    }

    /// Set a specific pixel color, pixels outside the frame are ignored
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(index) = self.bit_index(x, y) {
            self.buffer[index / 8].set_bit(7 - index % 8, color.is_set());
        }
    }

    /// Reads a pixel back, `None` outside the frame
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.bit_index(x, y)
            .map(|index| Color::from_bit(self.buffer[index / 8].get_bit(7 - index % 8)))
    }

    fn len(&self) -> usize {
        buffer_len(self.width as usize, self.height as usize)
    }

    /// Linear bit index of a logical coordinate
    fn bit_index(&self, x: i32, y: i32) -> Option<usize> {
        let width = i64::from(self.width);
        let height = i64::from(self.height);
        let (x, y) = (i64::from(x), i64::from(y));

        // final coordinates
        let (x, y) = match self.rotation {
            DisplayRotation::Rotate0 => (x, y),
            DisplayRotation::Rotate90 => (width - 1 - y, x),
            DisplayRotation::Rotate180 => (width - 1 - x, height - 1 - y),
            DisplayRotation::Rotate270 => (y, height - 1 - x),
        };

        if x < 0 || x >= width || y < 0 || y >= height {
            return None;
        }
        Some(x as usize + y as usize * self.width as usize)
    }
}

#[cfg(feature = "graphics")]
mod graphics {
    use super::Framebuffer;
    use crate::color::Color;
    use embedded_graphics_core::prelude::*;

    /// For use with embedded_grahics
    impl DrawTarget for Framebuffer<'_> {
        type Color = Color;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                self.set_pixel(point.x, point.y, color);
            }
            Ok(())
        }
    }

    /// For use with embedded_grahics
    impl OriginDimensions for Framebuffer<'_> {
        fn size(&self) -> Size {
            Size::new(self.width(), self.height())
        }
    }
}
