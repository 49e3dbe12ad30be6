//! A simple Driver for the 7.5" 800x480 B/W E-Ink Display (UC8179 controller) via SPI
//!
//! Fits the Waveshare 7.5" V2 and the GoodDisplay GDEY075T7 panels.
//!
//! # References
//!
//! - [Datasheet](https://www.waveshare.com/wiki/7.5inch_e-Paper_HAT)
//! - [Waveshare C driver](https://github.com/waveshare/e-Paper/blob/702def0/RaspberryPi%26JetsonNano/c/lib/e-Paper/EPD_7in5_V2.c)
//!
//! The controller knows three init sequences ([`RefreshMode`]). Every one of
//! them starts with a hardware reset, so switching modes and waking up from
//! deep sleep are the same operation.

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use crate::buffer_len;
use crate::color::Color;
use crate::error::ErrorKind;
use crate::interface::DisplayInterface;
use crate::traits::{
    BusyStatus, ErrorType, FrameSink, InternalWiAdditions, KeepAlive, NoKeepAlive, PanelDisplay,
    PanelState, RefreshMode,
};

pub(crate) mod command;
use self::command::Command;

pub(crate) mod constants;
use self::constants::{
    init_sequence, InitStep, DEEP_SLEEP_CHECK_CODE, POWER_ON_SETTLE_MS, REFRESH_SETTLE_MS,
    RESET_HOLD_US, VCOM_SLEEP,
};

/// Width of the display
pub const WIDTH: u32 = 800;
/// Height of the display
pub const HEIGHT: u32 = 480;
/// Bytes of one full frame
pub const BUFFER_LEN: usize = buffer_len(WIDTH as usize, HEIGHT as usize);
/// Default Background Color
pub const DEFAULT_BACKGROUND_COLOR: Color = Color::White;
const IS_BUSY_LOW: bool = true;
const SINGLE_BYTE_WRITE: bool = true;

/// Epd7in5 (V2) driver
///
pub struct Epd7in5<SPI, BUSY, DC, RST, DELAY, KA = NoKeepAlive> {
    /// Connection Interface
    interface: DisplayInterface<SPI, BUSY, DC, RST, DELAY, KA, SINGLE_BYTE_WRITE>,
    /// Background Color
    color: Color,
    /// Mode used by the next (re)initialisation
    mode: RefreshMode,
    /// Lifecycle state
    state: PanelState,
}

impl<SPI, BUSY, DC, RST, DELAY, KA> ErrorType<SPI, BUSY, DC, RST>
    for Epd7in5<SPI, BUSY, DC, RST, DELAY, KA>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
    KA: KeepAlive,
{
    type Error = ErrorKind<SPI, BUSY, DC, RST>;
}

impl<SPI, BUSY, DC, RST, DELAY, KA> InternalWiAdditions<SPI, BUSY, DC, RST, DELAY>
    for Epd7in5<SPI, BUSY, DC, RST, DELAY, KA>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
    KA: KeepAlive,
{
    fn init(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), Self::Error> {
        log::info!("starting display initialisation ({:?} refresh)", self.mode);

        self.interface.reset(delay, RESET_HOLD_US, RESET_HOLD_US)?;
        self.interface.feed();

        for step in init_sequence(self.mode) {
            match *step {
                InitStep::Write(command, data) => self.cmd_with_data(spi, command, data)?,
                InitStep::PowerOn => {
                    self.command(spi, Command::PowerOn)?;
                    delay.delay_ms(POWER_ON_SETTLE_MS);
                    self.wait_until_idle(spi, delay)?;
                }
            }
        }

        self.interface.feed();
        self.state = PanelState::PoweredOn(self.mode);
        log::info!("display initialisation completed");
        Ok(())
    }
}

impl<SPI, BUSY, DC, RST, DELAY, KA> PanelDisplay<SPI, BUSY, DC, RST, DELAY>
    for Epd7in5<SPI, BUSY, DC, RST, DELAY, KA>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
    KA: KeepAlive,
{
    type DisplayColor = Color;

    fn bus_init(&mut self) -> Result<(), Self::Error> {
        self.interface.idle_lines()?;
        if self.state == PanelState::Uninitialized {
            self.state = PanelState::BusInitialized;
        } else {
            log::debug!("display bus already initialised");
        }
        Ok(())
    }

    fn begin(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), Self::Error> {
        self.bus_init()?;
        self.mode = RefreshMode::Full;
        self.init(spi, delay)
    }

    fn wake_up(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), Self::Error> {
        self.init(spi, delay)
    }

    fn sleep(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), Self::Error> {
        self.cmd_with_data(spi, Command::VcomAndDataIntervalSetting, &VCOM_SLEEP)?;
        self.command(spi, Command::PowerOff)?;
        self.wait_until_idle(spi, delay)?;
        self.cmd_with_data(spi, Command::DeepSleep, &[DEEP_SLEEP_CHECK_CODE])?;
        self.state = PanelState::Sleeping;
        log::info!("display in deep sleep");
        Ok(())
    }

    fn set_refresh_mode(
        &mut self,
        spi: &mut SPI,
        mode: RefreshMode,
        delay: &mut DELAY,
    ) -> Result<(), Self::Error> {
        log::debug!("switching display to {:?} refresh", mode);
        self.mode = mode;
        self.init(spi, delay)
    }

    fn set_background_color(&mut self, color: Color) {
        self.color = color;
    }

    fn background_color(&self) -> &Color {
        &self.color
    }

    fn width(&self) -> u32 {
        WIDTH
    }

    fn height(&self) -> u32 {
        HEIGHT
    }

    fn state(&self) -> PanelState {
        self.state
    }

    fn update_frame(
        &mut self,
        spi: &mut SPI,
        buffer: &[u8],
        delay: &mut DELAY,
    ) -> Result<(), Self::Error> {
        if buffer.len() != BUFFER_LEN {
            return Err(ErrorKind::BufferSize {
                expected: BUFFER_LEN,
                actual: buffer.len(),
            });
        }
        self.ensure_awake(spi, delay)?;

        // old image plane, the B/W waveform ignores it
        self.command(spi, Command::DataStartTransmission1)?;
        self.interface.data_x_times(spi, 0x00, BUFFER_LEN as u32)?;

        self.command(spi, Command::DataStartTransmission2)?;
        self.interface.data(spi, buffer)
    }

    fn display_frame(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), Self::Error> {
        self.command(spi, Command::DisplayRefresh)?;
        self.state = PanelState::Updating(self.mode);
        delay.delay_ms(REFRESH_SETTLE_MS);
        let status = self.wait_until_idle(spi, delay);
        self.state = PanelState::PoweredOn(self.mode);
        if status? == BusyStatus::TimedOut {
            log::warn!("display refresh did not finish, the image may be incomplete");
        }
        Ok(())
    }

    fn write_full(
        &mut self,
        spi: &mut SPI,
        buffer: &[u8],
        delay: &mut DELAY,
    ) -> Result<(), Self::Error> {
        self.update_frame(spi, buffer, delay)?;
        self.display_frame(spi, delay)
    }

    fn clear_frame(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), Self::Error> {
        let fill = self.color.get_byte_value();
        self.fill_and_refresh(spi, fill, delay)
    }

    fn clear_white(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), Self::Error> {
        self.fill_and_refresh(spi, Color::White.get_byte_value(), delay)
    }

    fn clear_black(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), Self::Error> {
        self.fill_and_refresh(spi, Color::Black.get_byte_value(), delay)
    }

    fn wait_until_idle(
        &mut self,
        _spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<BusyStatus, Self::Error> {
        self.interface.wait_until_idle(delay, IS_BUSY_LOW)
    }
}

impl<SPI, BUSY, DC, RST, DELAY> Epd7in5<SPI, BUSY, DC, RST, DELAY, NoKeepAlive>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Takes over the control lines without talking to the panel yet.
    ///
    /// `delay_us` is the poll interval of the busy line, 10ms when `None`.
    /// Call [begin](PanelDisplay::begin) before drawing.
    pub fn new(busy: BUSY, dc: DC, rst: RST, delay_us: Option<u32>) -> Self {
        Epd7in5 {
            interface: DisplayInterface::new(busy, dc, rst, delay_us),
            color: DEFAULT_BACKGROUND_COLOR,
            mode: RefreshMode::Full,
            state: PanelState::Uninitialized,
        }
    }
}

impl<SPI, BUSY, DC, RST, DELAY, KA> Epd7in5<SPI, BUSY, DC, RST, DELAY, KA>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
    KA: KeepAlive,
{
    /// Feeds `keepalive` while blocking on the busy line, e.g. a task watchdog
    pub fn with_keepalive<K: KeepAlive>(self, keepalive: K) -> Epd7in5<SPI, BUSY, DC, RST, DELAY, K> {
        Epd7in5 {
            interface: self.interface.with_keepalive(keepalive),
            color: self.color,
            mode: self.mode,
            state: self.state,
        }
    }

    /// Overrides the 10s limit of every busy wait
    pub fn with_busy_timeout(mut self, timeout_ms: u32) -> Self {
        self.interface.set_busy_timeout(timeout_ms);
        self
    }

    /// Limit of every busy wait in ms
    pub fn busy_timeout(&self) -> u32 {
        self.interface.busy_timeout()
    }

    /// Refresh mode used by the next (re)initialisation
    pub fn refresh_mode(&self) -> RefreshMode {
        self.mode
    }

    /// Bundles the driver with its bus so frames can be pushed through [`FrameSink`]
    pub fn session<'a>(
        &'a mut self,
        spi: &'a mut SPI,
        delay: &'a mut DELAY,
    ) -> Session<'a, SPI, BUSY, DC, RST, DELAY, KA> {
        Session {
            epd: self,
            spi,
            delay,
        }
    }

    fn ensure_awake(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        match self.state {
            PanelState::PoweredOn(_) | PanelState::Updating(_) => Ok(()),
            state => {
                log::warn!("display is {:?}, initialising before the transfer", state);
                if state == PanelState::Uninitialized {
                    self.bus_init()?;
                }
                self.init(spi, delay)
            }
        }
    }

    fn fill_and_refresh(
        &mut self,
        spi: &mut SPI,
        fill: u8,
        delay: &mut DELAY,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.ensure_awake(spi, delay)?;

        self.command(spi, Command::DataStartTransmission1)?;
        self.interface.data_x_times(spi, 0x00, BUFFER_LEN as u32)?;

        self.command(spi, Command::DataStartTransmission2)?;
        self.interface.data_x_times(spi, fill, BUFFER_LEN as u32)?;

        self.display_frame(spi, delay)
    }

    fn command(&mut self, spi: &mut SPI, command: Command) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.interface.cmd(spi, command)
    }

    fn cmd_with_data(
        &mut self,
        spi: &mut SPI,
        command: Command,
        data: &[u8],
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.interface.cmd_with_data(spi, command, data)
    }
}

/// A driver borrowed together with its bus and delay
pub struct Session<'a, SPI, BUSY, DC, RST, DELAY, KA> {
    epd: &'a mut Epd7in5<SPI, BUSY, DC, RST, DELAY, KA>,
    spi: &'a mut SPI,
    delay: &'a mut DELAY,
}

impl<'a, SPI, BUSY, DC, RST, DELAY, KA> FrameSink for Session<'a, SPI, BUSY, DC, RST, DELAY, KA>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
    KA: KeepAlive,
{
    type Error = ErrorKind<SPI, BUSY, DC, RST>;

    fn show_frame(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
        self.epd.write_full(&mut *self.spi, buffer, &mut *self.delay)
    }
}
