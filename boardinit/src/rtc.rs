//! RTC power-loss recovery.
//!
//! When the PMC reports the RTC well lost power, the clock contents are
//! garbage: rearm the divider, force binary 24-hour mode, clear the alarms
//! and write a fixed fallback date/time so later stages read something
//! self-consistent.

use ember_hwio::{IoPortAccess, MmioAccess};
use log::info;

use crate::power::{B_GEN_PMCON_B_RTC_PWR_STS, PWRM_BASE, R_GEN_PMCON_B};

const RTC_INDEX: u16 = 0x70;
const RTC_TARGET: u16 = 0x71;
/// NMI-disable bit in the index port; preserved on every access.
const RTC_INDEX_NMI: u8 = 0x80;

pub const RTC_SECONDS: u8 = 0x00;
pub const RTC_SECONDS_ALARM: u8 = 0x01;
pub const RTC_MINUTES: u8 = 0x02;
pub const RTC_MINUTES_ALARM: u8 = 0x03;
pub const RTC_HOURS: u8 = 0x04;
pub const RTC_HOURS_ALARM: u8 = 0x05;
pub const RTC_DAY_OF_MONTH: u8 = 0x07;
pub const RTC_MONTH: u8 = 0x08;
pub const RTC_YEAR: u8 = 0x09;
pub const RTC_REG_A: u8 = 0x0A;
pub const RTC_REG_B: u8 = 0x0B;
pub const RTC_REG_D: u8 = 0x0D;
pub const RTC_SHUTDOWN_STATUS: u8 = 0x0F;
pub const RTC_CENTURY: u8 = 0x32;

/// Register A: divider reset, periodic rate 976.5 us.
const REG_A_DIVIDER_RESET: u8 = 0x66;
/// Register A: divider running, periodic rate 976.5 us.
const REG_A_DIVIDER_NORMAL: u8 = 0x26;

const REG_B_SET: u8 = 1 << 7;
const REG_B_HOUR_FORMAT_24: u8 = 1 << 1;
const REG_B_DATA_MODE_BINARY: u8 = 1 << 2;

/// Read one RTC register.
pub fn rtc_read(io: &mut dyn IoPortAccess, address: u8) -> u8 {
    let nmi = io.read8(RTC_INDEX) & RTC_INDEX_NMI;
    io.write8(RTC_INDEX, address | nmi);
    io.read8(RTC_TARGET)
}

/// Write one RTC register.
pub fn rtc_write(io: &mut dyn IoPortAccess, address: u8, data: u8) {
    let nmi = io.read8(RTC_INDEX) & RTC_INDEX_NMI;
    io.write8(RTC_INDEX, address | nmi);
    io.write8(RTC_TARGET, data);
}

/// Re-initialize the RTC if it lost power; a no-op otherwise.
pub fn rtc_init(io: &mut dyn IoPortAccess, mmio: &mut dyn MmioAccess) {
    let pmcon_b = mmio.read8(PWRM_BASE + R_GEN_PMCON_B);
    if pmcon_b & B_GEN_PMCON_B_RTC_PWR_STS == 0 {
        return;
    }

    info!("RTC lost power, writing default date/time");

    rtc_write(io, RTC_REG_A, REG_A_DIVIDER_RESET);

    let mut reg_b = rtc_read(io, RTC_REG_B);
    reg_b &= !REG_B_DATA_MODE_BINARY;
    reg_b |= REG_B_SET | REG_B_HOUR_FORMAT_24;
    rtc_write(io, RTC_REG_B, reg_b);

    rtc_write(io, RTC_REG_A, REG_A_DIVIDER_NORMAL);

    let mut reg_b = rtc_read(io, RTC_REG_B);
    reg_b &= !REG_B_SET;
    rtc_write(io, RTC_REG_B, reg_b);

    rtc_write(io, RTC_SHUTDOWN_STATUS, 0x00);

    rtc_write(io, RTC_REG_D, 0x00);
    rtc_read(io, RTC_REG_D);

    rtc_write(io, RTC_HOURS_ALARM, 0x00);
    rtc_write(io, RTC_MINUTES_ALARM, 0x00);
    rtc_write(io, RTC_SECONDS_ALARM, 0x00);

    // 11/11/2011 11:11:11
    rtc_write(io, RTC_SECONDS, 0x11);
    rtc_write(io, RTC_MINUTES, 0x11);
    rtc_write(io, RTC_HOURS, 0x11);
    rtc_write(io, RTC_DAY_OF_MONTH, 0x11);
    rtc_write(io, RTC_MONTH, 0x11);
    rtc_write(io, RTC_YEAR, 0x11);
    rtc_write(io, RTC_CENTURY, 0x20);

    mmio.write8(
        PWRM_BASE + R_GEN_PMCON_B,
        pmcon_b & !B_GEN_PMCON_B_RTC_PWR_STS,
    );
}
