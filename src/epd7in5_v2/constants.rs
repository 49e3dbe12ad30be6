//! Register tables of the three init sequences
//!
//! These bytes are what the panel was characterised with and have to go out
//! exactly like this; they are not derived from anything.

use super::command::Command;
use crate::traits::RefreshMode;

/// One step of an init sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InitStep {
    /// A command followed by its data bytes
    Write(Command, &'static [u8]),
    /// POWER ON, the settle delay and a wait on the busy line
    PowerOn,
}

use InitStep::{PowerOn, Write};

pub(crate) const INIT_FULL: &[InitStep] = &[
    Write(Command::PowerSetting, &[0x07, 0x07, 0x3F, 0x3F]),
    Write(Command::BoosterSoftStart, &[0x17, 0x17, 0x28, 0x17]),
    PowerOn,
    Write(Command::PanelSetting, &[0x1F]),
    // 800 x 480
    Write(Command::TconResolution, &[0x03, 0x20, 0x01, 0xE0]),
    Write(Command::DualSpi, &[0x00]),
    Write(Command::VcomAndDataIntervalSetting, &[0x10, 0x07]),
    Write(Command::TconSetting, &[0x22]),
];

pub(crate) const INIT_FAST: &[InitStep] = &[
    Write(Command::PanelSetting, &[0x1F]),
    Write(Command::VcomAndDataIntervalSetting, &[0x10, 0x07]),
    PowerOn,
    Write(Command::BoosterSoftStart, &[0x27, 0x27, 0x18, 0x17]),
    Write(Command::CascadeSetting, &[0x02]),
    Write(Command::ForceTemperature, &[0x5A]),
];

pub(crate) const INIT_PARTIAL: &[InitStep] = &[
    Write(Command::PanelSetting, &[0x1F]),
    PowerOn,
    Write(Command::CascadeSetting, &[0x02]),
    Write(Command::ForceTemperature, &[0x6E]),
];

/// VCOM and data interval for deep sleep (border floating)
pub(crate) const VCOM_SLEEP: [u8; 1] = [0xF7];

/// Check code of the deep sleep command
pub(crate) const DEEP_SLEEP_CHECK_CODE: u8 = 0xA5;

/// Time the charge pump gets after POWER ON before the busy line is read, in ms
pub(crate) const POWER_ON_SETTLE_MS: u32 = 100;

/// Pause between DISPLAY REFRESH and the first read of the busy line, in ms
pub(crate) const REFRESH_SETTLE_MS: u32 = 1;

/// Reset pulse and recovery time, in us
pub(crate) const RESET_HOLD_US: u32 = 10_000;

/// Register table for a refresh mode
pub(crate) fn init_sequence(mode: RefreshMode) -> &'static [InitStep] {
    match mode {
        RefreshMode::Full => INIT_FULL,
        RefreshMode::Fast => INIT_FAST,
        RefreshMode::Partial => INIT_PARTIAL,
    }
}
