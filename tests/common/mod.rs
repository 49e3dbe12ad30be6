//! Fake hardware that records what the driver puts on the wire
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::spi::{self, Operation, SpiDevice};

/// One byte on the bus and the level of DC while it was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Command(u8),
    Data(u8),
    ResetLow,
    ResetHigh,
}

/// Shared log of everything the fakes saw
#[derive(Clone, Default)]
pub struct Bus {
    events: Rc<RefCell<Vec<Event>>>,
    dc_high: Rc<Cell<bool>>,
}

impl Bus {
    pub fn spi(&self) -> RecordingSpi {
        RecordingSpi { bus: self.clone() }
    }

    pub fn dc(&self) -> DcPin {
        DcPin { bus: self.clone() }
    }

    pub fn rst(&self) -> RstPin {
        RstPin { bus: self.clone() }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Command bytes in the order they were sent
    pub fn commands(&self) -> Vec<u8> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Command(byte) => Some(*byte),
                _ => None,
            })
            .collect()
    }

    /// Data bytes following the `nth` occurrence of `command`
    pub fn data_after(&self, command: u8, nth: usize) -> Vec<u8> {
        let events = self.events.borrow();
        let start = events
            .iter()
            .enumerate()
            .filter(|(_, event)| **event == Event::Command(command))
            .nth(nth)
            .map(|(index, _)| index + 1)
            .unwrap_or(events.len());
        events[start..]
            .iter()
            .map_while(|event| match event {
                Event::Data(byte) => Some(*byte),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

pub struct RecordingSpi {
    bus: Bus,
}

impl spi::ErrorType for RecordingSpi {
    type Error = Infallible;
}

impl SpiDevice for RecordingSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let dc_high = self.bus.dc_high.get();
        let mut events = self.bus.events.borrow_mut();
        for operation in operations.iter() {
            if let Operation::Write(bytes) = operation {
                events.extend(bytes.iter().map(|&byte| {
                    if dc_high {
                        Event::Data(byte)
                    } else {
                        Event::Command(byte)
                    }
                }));
            }
        }
        Ok(())
    }
}

pub struct DcPin {
    bus: Bus,
}

impl digital::ErrorType for DcPin {
    type Error = Infallible;
}

impl OutputPin for DcPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.bus.dc_high.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.bus.dc_high.set(true);
        Ok(())
    }
}

pub struct RstPin {
    bus: Bus,
}

impl digital::ErrorType for RstPin {
    type Error = Infallible;
}

impl OutputPin for RstPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.bus.events.borrow_mut().push(Event::ResetLow);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.bus.events.borrow_mut().push(Event::ResetHigh);
        Ok(())
    }
}

/// Busy line of the panel, low while it is working
#[derive(Clone, Default)]
pub struct BusyPin {
    stuck: Rc<Cell<bool>>,
}

impl BusyPin {
    /// A panel that never finishes
    pub fn stuck() -> Self {
        let pin = BusyPin::default();
        pin.stuck.set(true);
        pin
    }
}

impl digital::ErrorType for BusyPin {
    type Error = Infallible;
}

impl InputPin for BusyPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.stuck.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.stuck.get())
    }
}

/// Delay that only adds up the requested time
#[derive(Default)]
pub struct ClockDelay {
    pub elapsed_ns: u64,
}

impl ClockDelay {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }
}

impl DelayNs for ClockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}
