use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use crate::error::ErrorKind;

pub trait Error<SPI, BUSY, DC, RST>: core::fmt::Debug
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn kind(&self) -> &ErrorKind<SPI, BUSY, DC, RST>;
}

pub trait ErrorType<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    type Error: Error<SPI, BUSY, DC, RST>;
}

/// All commands need to have this trait which gives the address of the command
/// which needs to be send via SPI with activated CommandsPin (Data/Command Pin in CommandMode)
pub(crate) trait Command: Copy {
    fn address(self) -> u8;
}

/// Seperates the different init sequences of the panel
///
/// Each mode programs the controller with its own register table, see
/// [`crate::epd7in5_v2`] for the exact bytes.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default)]
pub enum RefreshMode {
    /// The "normal" full refresh with the OTP waveform
    #[default]
    Full,
    /// Shortened waveform, faster but with some ghosting
    Fast,
    /// Waveform for partial updates
    Partial,
}

/// Lifecycle of the panel as seen by the driver
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum PanelState {
    /// Pins taken over, nothing sent yet
    Uninitialized,
    /// DC and RST are at their idle levels
    BusInitialized,
    /// Powered on and initialised for a refresh mode
    PoweredOn(RefreshMode),
    /// A refresh is running
    Updating(RefreshMode),
    /// Deep sleep, only a hardware reset wakes the controller
    Sleeping,
}

/// Result of waiting on the busy line
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum BusyStatus {
    /// The panel reported ready
    Idle,
    /// The timeout elapsed while the panel still reported busy
    TimedOut,
}

/// Hook called while the driver blocks on the busy line.
///
/// Hosts with a task watchdog feed it here. Every closure `FnMut()` is a
/// keepalive.
pub trait KeepAlive {
    /// Called once per poll interval
    fn feed(&mut self);
}

/// Keepalive for hosts without a watchdog
#[derive(Debug, Default, Clone, Copy)]
pub struct NoKeepAlive;

impl KeepAlive for NoKeepAlive {
    fn feed(&mut self) {}
}

impl<F: FnMut()> KeepAlive for F {
    fn feed(&mut self) {
        self()
    }
}

/// Something a finished frame can be pushed to.
///
/// The compositor only knows this trait, so it can be tested without a panel.
pub trait FrameSink {
    /// Error returned by the underlying transport
    type Error;

    /// Transfer the whole frame and refresh the panel once
    fn show_frame(&mut self, buffer: &[u8]) -> Result<(), Self::Error>;
}

pub(crate) trait InternalWiAdditions<SPI, BUSY, DC, RST, DELAY>:
    ErrorType<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// This initialises the EPD and powers it up
    ///
    /// This function is already called from
    ///  - [begin()](PanelDisplay::begin())
    ///  - [`wake_up`](PanelDisplay::wake_up())
    ///
    /// This function calls the reset sequence first,
    /// so you don't need to call reset your self when trying to wake your device up
    /// after setting it to sleep.
    fn init(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), Self::Error>;
}

/// All the functions to interact with the panel
///
/// # Example
///
///```rust, no_run
///# use embedded_hal_mock::eh1::*;
///# fn main() -> Result<(), embedded_hal::spi::ErrorKind> {
///use epd_dashboard::{epd7in5_v2::*, prelude::*};
///#
///# let expectations = [];
///# let mut spi = spi::Mock::new(&expectations);
///# let expectations = [];
///# let busy_in = digital::Mock::new(&expectations);
///# let dc = digital::Mock::new(&expectations);
///# let rst = digital::Mock::new(&expectations);
///# let mut delay = delay::NoopDelay::new();
///
///// Setup EPD
///let mut epd = Epd7in5::new(busy_in, dc, rst, None);
///epd.begin(&mut spi, &mut delay).ok();
///
///let mut buffer = [0u8; buffer_len(WIDTH as usize, HEIGHT as usize)];
///let mut frame = Framebuffer::new(WIDTH, HEIGHT, &mut buffer).unwrap();
///frame.fill_rect(10, 10, 200, 100, Color::Black);
///
///// Display updated frame
///epd.write_full(&mut spi, frame.buffer(), &mut delay).ok();
///
///// Set the EPD to sleep
///epd.sleep(&mut spi, &mut delay).ok();
///# Ok(())
///# }
///```
pub trait PanelDisplay<SPI, BUSY, DC, RST, DELAY>: ErrorType<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// The Color Type used by the Display
    type DisplayColor;

    /// Puts the control lines at their idle levels.
    ///
    /// Calling it again is harmless.
    fn bus_init(&mut self) -> Result<(), Self::Error>;

    /// [bus_init](PanelDisplay::bus_init) followed by a full init
    fn begin(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), Self::Error>;

    /// Let the device enter deep-sleep mode to save power.
    ///
    /// The deep sleep mode returns to standby with a hardware reset.
    fn sleep(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), Self::Error>;

    /// Wakes the device up from sleep
    ///
    /// Reinitialises the device in the last used refresh mode.
    fn wake_up(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), Self::Error>;

    /// Resets the panel and initialises it for `mode`
    fn set_refresh_mode(
        &mut self,
        spi: &mut SPI,
        mode: RefreshMode,
        delay: &mut DELAY,
    ) -> Result<(), Self::Error>;

    /// Sets the backgroundcolor for various commands like [clear_frame](PanelDisplay::clear_frame)
    fn set_background_color(&mut self, color: Self::DisplayColor);

    /// Get current background color
    fn background_color(&self) -> &Self::DisplayColor;

    /// Get the width of the display
    fn width(&self) -> u32;

    /// Get the height of the display
    fn height(&self) -> u32;

    /// Where the panel is in its lifecycle
    fn state(&self) -> PanelState;

    /// Transmit a full frame to the SRAM of the EPD without refreshing
    fn update_frame(
        &mut self,
        spi: &mut SPI,
        buffer: &[u8],
        delay: &mut DELAY,
    ) -> Result<(), Self::Error>;

    /// Refreshes the panel from SRAM
    ///
    /// This function waits until the device isn`t busy anymore
    fn display_frame(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), Self::Error>;

    /// [update_frame](PanelDisplay::update_frame) followed by [display_frame](PanelDisplay::display_frame)
    fn write_full(
        &mut self,
        spi: &mut SPI,
        buffer: &[u8],
        delay: &mut DELAY,
    ) -> Result<(), Self::Error>;

    /// Fills the panel with the declared background color and refreshes
    ///
    /// The background color can be changed with [`PanelDisplay::set_background_color`]
    fn clear_frame(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), Self::Error>;

    /// Fills the panel with white and refreshes
    fn clear_white(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), Self::Error>;

    /// Fills the panel with black and refreshes
    fn clear_black(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), Self::Error>;

    /// Wait until the display has stopped processing data
    ///
    /// Gives up after the busy timeout; that is logged, not returned as an error.
    fn wait_until_idle(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<BusyStatus, Self::Error>;
}
