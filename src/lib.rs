//! A simple Driver and widget compositor for a 7.5" black/white E-Ink dashboard
//!
//! This driver was built using [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1.0.0
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is not connected/available
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - 10MHz is what the panel is run at, see [`SPI_FREQUENCY_HZ`]
//!
//! ### Other....
//!
//! - Buffersize: Wherever a buffer is used it always needs to be of the size
//!   [`buffer_len`]`(width, height)`, one bit per pixel, rows packed without padding
//! - The busy line is polled every 10ms by default and given up on after 10s.
//!   Hosts with a task watchdog hand a keepalive to the driver.
//!
//! # Examples
//!
//! ```rust, no_run
//! # use embedded_hal_mock::eh1::*;
//! use epd_dashboard::{epd7in5_v2::*, prelude::*};
//! #
//! # let mut spi = spi::Mock::new(&[]);
//! # let busy = digital::Mock::new(&[]);
//! # let dc = digital::Mock::new(&[]);
//! # let rst = digital::Mock::new(&[]);
//! # let mut delay = delay::NoopDelay::new();
//! # let config = DashboardConfig::default();
//!
//! let mut epd = Epd7in5::new(busy, dc, rst, None);
//! epd.begin(&mut spi, &mut delay).ok();
//!
//! let mut buffer = [0u8; BUFFER_LEN];
//! let frame = Framebuffer::new(WIDTH, HEIGHT, &mut buffer).ok();
//! let mut dashboard = Dashboard::new(frame, Grid::for_panel(WIDTH, HEIGHT));
//! dashboard.load(&config);
//!
//! let mut session = epd.session(&mut spi, &mut delay);
//! dashboard.render_all(&mut session).ok();
//! ```
//!
//!
#![no_std]

pub mod color;
pub mod error;
pub mod rect;

mod traits;

/// Interface for the physical connection between display and the controlling device
mod interface;

pub mod epd7in5_v2;

#[cfg(feature = "serde")]
mod de;

pub mod canvas;
pub mod config;
pub mod dashboard;
pub mod drawing;
pub mod font;
pub mod framebuffer;
pub mod layout;
pub mod widget;

/// Includes everything important besides the chosen display
pub mod prelude {
    pub use crate::canvas::Canvas;
    pub use crate::color::Color;
    pub use crate::config::{ButtonAction, ButtonConfig, ConfigError, DashboardConfig, MqttConfig};
    pub use crate::dashboard::Dashboard;
    pub use crate::drawing::Draw;
    pub use crate::error::ErrorKind;
    pub use crate::font::{font_for_size, Font};
    pub use crate::framebuffer::{DisplayRotation, Framebuffer, FramebufferError};
    pub use crate::interface::DEFAULT_BUSY_TIMEOUT_MS;
    pub use crate::layout::Grid;
    pub use crate::rect::Rect;
    pub use crate::traits::{
        BusyStatus, ErrorType, FrameSink, KeepAlive, NoKeepAlive, PanelDisplay, PanelState, RefreshMode,
    };
    pub use crate::widget::{WidgetData, WidgetDescriptor, WidgetKind, WidgetPayload};
    pub use crate::{buffer_len, SPI_FREQUENCY_HZ, SPI_MODE};
}

/// Computes the necessary buffer length for a 1 bit per pixel frame
///
/// Pixels are packed row after row without padding, so this is
/// `ceil(width * height / 8)`.
pub const fn buffer_len(width: usize, height: usize) -> usize {
    (width * height + 7) / 8
}

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};

/// Bus clock the panel is driven with
pub const SPI_FREQUENCY_HZ: u32 = 10_000_000;
