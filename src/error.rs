use core::fmt::{Debug, Display, Formatter};

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::traits::Error;

/// Epd error type
pub enum ErrorKind<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Encountered an SPI error
    SpiError(SPI::Error),

    /// Encountered an error on Busy GPIO
    BusyError(BUSY::Error),

    /// Encountered an error on DC GPIO
    DcError(DC::Error),

    /// Encountered an error on RST GPIO
    RstError(RST::Error),

    /// A frame buffer did not match the panel size
    BufferSize {
        /// Bytes the panel needs
        expected: usize,
        /// Bytes that were handed in
        actual: usize,
    },

    /// Anything else
    Other,
}

impl<SPI, BUSY, DC, RST> Display for ErrorKind<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => write!(f, "spi error: {err:?}"),
            Self::BusyError(err) => write!(f, "busy pin error: {err:?}"),
            Self::DcError(err) => write!(f, "dc pin error: {err:?}"),
            Self::RstError(err) => write!(f, "reset pin error: {err:?}"),
            Self::BufferSize { expected, actual } => write!(
                f,
                "frame buffer has {actual} bytes, the panel needs {expected}"
            ),
            Self::Other => write!(
                f,
                "A different error occurred. The original error may contain more information"
            ),
        }
    }
}

impl<SPI, BUSY, DC, RST> Debug for ErrorKind<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => Debug::fmt(&err, f),
            Self::BusyError(err) => Debug::fmt(&err, f),
            Self::DcError(err) => Debug::fmt(&err, f),
            Self::RstError(err) => Debug::fmt(&err, f),
            Self::BufferSize { expected, actual } => f
                .debug_struct("BufferSize")
                .field("expected", expected)
                .field("actual", actual)
                .finish(),
            Self::Other => write!(
                f,
                "A different error occurred. The original error may contain more information"
            ),
        }
    }
}

impl<SPI, BUSY, DC, RST> Error<SPI, BUSY, DC, RST> for ErrorKind<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn kind(&self) -> &ErrorKind<SPI, BUSY, DC, RST> {
        self
    }
}
