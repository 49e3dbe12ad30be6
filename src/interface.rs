use crate::error::ErrorKind;
use crate::traits::{BusyStatus, Command, KeepAlive, NoKeepAlive};
use core::marker::PhantomData;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

/// Default time to wait for the busy line before giving up
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 10_000;

/// The Connection Interface of the EPD
///
/// SINGLE_BYTE_WRITE defines if a data block is written bytewise
/// or blockwise to the spi device
pub(crate) struct DisplayInterface<SPI, BUSY, DC, RST, DELAY, KA, const SINGLE_BYTE_WRITE: bool> {
    /// SPI
    _spi: PhantomData<SPI>,
    /// DELAY
    _delay: PhantomData<DELAY>,
    /// Low for busy, Wait until display is ready!
    busy: BUSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Resetting
    rst: RST,
    /// number of us the idle loop should sleep on
    delay_us: u32,
    /// give up on the busy line after this many ms
    busy_timeout_ms: u32,
    /// fed on every poll of the busy line
    keepalive: KA,
}

impl<SPI, BUSY, DC, RST, DELAY, const SINGLE_BYTE_WRITE: bool>
    DisplayInterface<SPI, BUSY, DC, RST, DELAY, NoKeepAlive, SINGLE_BYTE_WRITE>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Creates a new `DisplayInterface` struct
    ///
    /// If no delay is given, a default delay of 10ms is used.
    pub fn new(busy: BUSY, dc: DC, rst: RST, delay_us: Option<u32>) -> Self {
        // default delay of 10ms
        let delay_us = delay_us.unwrap_or(10_000);
        DisplayInterface {
            _spi: PhantomData,
            _delay: PhantomData,
            busy,
            dc,
            rst,
            delay_us,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            keepalive: NoKeepAlive,
        }
    }
}

impl<SPI, BUSY, DC, RST, DELAY, KA, const SINGLE_BYTE_WRITE: bool>
    DisplayInterface<SPI, BUSY, DC, RST, DELAY, KA, SINGLE_BYTE_WRITE>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
    KA: KeepAlive,
{
    /// Swaps the keepalive hook
    pub fn with_keepalive<K: KeepAlive>(
        self,
        keepalive: K,
    ) -> DisplayInterface<SPI, BUSY, DC, RST, DELAY, K, SINGLE_BYTE_WRITE> {
        DisplayInterface {
            _spi: PhantomData,
            _delay: PhantomData,
            busy: self.busy,
            dc: self.dc,
            rst: self.rst,
            delay_us: self.delay_us,
            busy_timeout_ms: self.busy_timeout_ms,
            keepalive,
        }
    }

    pub fn set_busy_timeout(&mut self, timeout_ms: u32) {
        self.busy_timeout_ms = timeout_ms;
    }

    pub fn busy_timeout(&self) -> u32 {
        self.busy_timeout_ms
    }

    /// Calls the keepalive hook once
    pub fn feed(&mut self) {
        self.keepalive.feed();
    }

    /// Puts DC and RST at their idle levels (data, not in reset)
    pub(crate) fn idle_lines(&mut self) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.dc.set_high().map_err(ErrorKind::DcError)?;
        self.rst.set_high().map_err(ErrorKind::RstError)
    }

    /// Basic function for sending [Commands](Command).
    ///
    /// Enables direct interaction with the device with the help of [data()](DisplayInterface::data())
    pub(crate) fn cmd<T: Command>(
        &mut self,
        spi: &mut SPI,
        command: T,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        // low for commands
        self.dc.set_low().map_err(ErrorKind::DcError)?;

        // Transfer the command over spi
        self.write(spi, &[command.address()])
    }

    /// Basic function for sending an array of u8-values of data over spi
    ///
    /// Enables direct interaction with the device with the help of [cmd()](DisplayInterface::cmd())
    pub(crate) fn data(
        &mut self,
        spi: &mut SPI,
        data: &[u8],
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        // high for data
        self.dc.set_high().map_err(ErrorKind::DcError)?;

        if SINGLE_BYTE_WRITE {
            for val in data.iter().copied() {
                // Transfer data one u8 at a time over spi
                self.write(spi, &[val])?;
            }
        } else {
            self.write(spi, data)?;
        }

        Ok(())
    }

    /// Basic function for sending [Commands](Command) and the data belonging to it.
    pub(crate) fn cmd_with_data<T: Command>(
        &mut self,
        spi: &mut SPI,
        command: T,
        data: &[u8],
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.cmd(spi, command)?;
        self.data(spi, data)
    }

    /// Basic function for sending the same byte of data (one u8) multiple times over spi
    ///
    /// Enables direct interaction with the device with the help of [cmd()](DisplayInterface::cmd())
    pub(crate) fn data_x_times(
        &mut self,
        spi: &mut SPI,
        val: u8,
        repetitions: u32,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        // high for data
        self.dc.set_high().map_err(ErrorKind::DcError)?;
        // Transfer data (u8) over spi
        for _ in 0..repetitions {
            self.write(spi, &[val])?;
        }
        Ok(())
    }

    // spi write helper/abstraction function
    fn write(&mut self, spi: &mut SPI, data: &[u8]) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        // transfer spi data
        // Be careful!! Linux has a default limit of 4096 bytes per spi transfer
        // see https://raspberrypi.stackexchange.com/questions/65595/spi-transfer-fails-with-buffer-size-greater-than-4096
        if cfg!(target_os = "linux") {
            for data_chunk in data.chunks(4096) {
                spi.write(data_chunk).map_err(ErrorKind::SpiError)?;
            }
            Ok(())
        } else {
            spi.write(data).map_err(ErrorKind::SpiError)
        }
    }

    /// Waits until device isn't busy anymore or the busy timeout elapsed
    ///
    /// The line is polled every `delay_us` and the keepalive is fed after each
    /// poll, so a panel that never reports ready costs at most the timeout plus
    /// one poll interval. A timeout is logged and reported as
    /// [`BusyStatus::TimedOut`]; it is not an error.
    ///
    /// is_busy_low
    ///
    ///  - TRUE for the UC8179 based panels (busy line low while working)
    ///  - FALSE for the SSD16xx based ones
    pub(crate) fn wait_until_idle(
        &mut self,
        delay: &mut DELAY,
        is_busy_low: bool,
    ) -> Result<BusyStatus, ErrorKind<SPI, BUSY, DC, RST>> {
        let timeout_us = u64::from(self.busy_timeout_ms) * 1000;
        // never spin without sleeping, a zero delay would starve the host
        let step_us = self.delay_us.max(1);
        let mut waited_us: u64 = 0;

        while self.is_busy(is_busy_low)? {
            delay.delay_us(step_us);
            self.keepalive.feed();
            waited_us += u64::from(step_us);

            if waited_us > timeout_us {
                log::error!(
                    "display busy wait timeout after {} ms",
                    self.busy_timeout_ms
                );
                return Ok(BusyStatus::TimedOut);
            }
        }
        Ok(BusyStatus::Idle)
    }

    /// Checks if device is still busy
    ///
    /// This is normally handled by the more complicated commands themselves,
    /// but in the case you send data and commands directly you might need to check
    /// if the device is still busy
    pub(crate) fn is_busy(&mut self, is_busy_low: bool) -> Result<bool, ErrorKind<SPI, BUSY, DC, RST>> {
        if is_busy_low {
            self.busy.is_low().map_err(ErrorKind::BusyError)
        } else {
            self.busy.is_high().map_err(ErrorKind::BusyError)
        }
    }

    /// Resets the device.
    ///
    /// Needed before every init sequence and to wake the controller from deep sleep.
    /// The line is held low for `duration` us and the controller gets
    /// `settle` us after release.
    pub(crate) fn reset(
        &mut self,
        delay: &mut DELAY,
        duration: u32,
        settle: u32,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.rst.set_low().map_err(ErrorKind::RstError)?;
        delay.delay_us(duration);
        self.rst.set_high().map_err(ErrorKind::RstError)?;
        delay.delay_us(settle);
        Ok(())
    }
}
