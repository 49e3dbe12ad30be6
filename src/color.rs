//! B/W Color for EPDs

#[cfg(feature = "graphics")]
use embedded_graphics_core::pixelcolor::BinaryColor;
#[cfg(feature = "graphics")]
use embedded_graphics_core::prelude::PixelColor;

/// The two colors of a bi-level panel.
///
/// In the framebuffer a set bit is black and a cleared bit is white. The
/// buffer is sent to the panel's new-image plane unmodified, so the same
/// convention holds on the wire (`0xFF` is a black byte).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Color {
    /// Black color
    Black,
    /// White color
    #[default]
    White,
}

impl Color {
    /// Get the color encoding of the color for one bit
    pub fn get_bit_value(self) -> u8 {
        match self {
            Color::White => 0u8,
            Color::Black => 1u8,
        }
    }

    /// Gets a full byte of black or white pixels
    pub fn get_byte_value(self) -> u8 {
        match self {
            Color::White => 0x00,
            Color::Black => 0xff,
        }
    }

    /// Whether this color sets the bit of its pixel
    pub fn is_set(self) -> bool {
        self == Color::Black
    }

    /// Returns the inverse of the given color.
    ///
    /// Black returns white and white returns black.
    pub fn inverse(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Color of a stored bit
    pub fn from_bit(bit: bool) -> Color {
        if bit {
            Color::Black
        } else {
            Color::White
        }
    }
}

#[cfg(feature = "graphics")]
impl PixelColor for Color {
    type Raw = ();
}

#[cfg(feature = "graphics")]
impl From<BinaryColor> for Color {
    fn from(b: BinaryColor) -> Color {
        match b {
            BinaryColor::On => Color::Black,
            BinaryColor::Off => Color::White,
        }
    }
}

#[cfg(feature = "graphics")]
impl From<Color> for BinaryColor {
    fn from(c: Color) -> BinaryColor {
        match c {
            Color::Black => BinaryColor::On,
            Color::White => BinaryColor::Off,
        }
    }
}
