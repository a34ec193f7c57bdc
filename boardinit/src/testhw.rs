//! Recording fakes for the hardware access traits and service contracts.
//!
//! RAM-backed register maps plus a small index/target model for the RTC
//! ports, so read-modify-write sequences behave.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use ember_hwio::pci::{PciAddr, PciConfigAccess};
use ember_hwio::{IoPortAccess, MmioAccess};

use crate::error::{BusError, LoadError, SpiError, TpmError};
use crate::gpio::GpioPadConfig;
use crate::power::BootMode;
use crate::services::{
    BootGuard, BootGuardInfo, ComponentLoader, FlashStateMachine, GpioPads, SidebandBus,
    Signature, SpiFlash, TpmService, TpmType,
};

const RTC_INDEX_PORT: u16 = 0x70;
const RTC_TARGET_PORT: u16 = 0x71;

/// Build-feature set with everything on (except the pre-OS checker).
pub fn build_all() -> crate::features::BuildFeatures {
    crate::features::BuildFeatures {
        acpi: true,
        verified_boot: true,
        measured_boot: true,
        vtd: true,
        tcc: true,
        pre_os_checker: false,
    }
}

/// One recorded I/O port write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoWrite {
    pub port: u16,
    pub value: u32,
    pub width: u8,
}

/// RAM-backed I/O port space with an RTC index/target model.
#[derive(Default)]
pub struct MockIo {
    bytes: BTreeMap<u16, u8>,
    rtc_regs: BTreeMap<u8, u8>,
    rtc_index: u8,
    pub writes: Vec<IoWrite>,
}

impl MockIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset a port without recording a write.
    pub fn seed8(&mut self, port: u16, value: u8) {
        self.bytes.insert(port, value);
    }

    pub fn seed16(&mut self, port: u16, value: u16) {
        self.seed8(port, value as u8);
        self.seed8(port + 1, (value >> 8) as u8);
    }

    pub fn seed32(&mut self, port: u16, value: u32) {
        self.seed16(port, value as u16);
        self.seed16(port + 2, (value >> 16) as u16);
    }

    /// Read a port without recording.
    pub fn get8(&self, port: u16) -> u8 {
        self.bytes.get(&port).copied().unwrap_or(0)
    }

    pub fn get16(&self, port: u16) -> u16 {
        self.get8(port) as u16 | (self.get8(port + 1) as u16) << 8
    }

    pub fn get32(&self, port: u16) -> u32 {
        self.get16(port) as u32 | (self.get16(port + 2) as u32) << 16
    }

    /// Current value of an RTC register behind the index/target pair.
    pub fn rtc_shadow(&self, reg: u8) -> Option<u8> {
        self.rtc_regs.get(&reg).copied()
    }

    /// Preset an RTC register.
    pub fn seed_rtc(&mut self, reg: u8, value: u8) {
        self.rtc_regs.insert(reg, value);
    }
}

impl IoPortAccess for MockIo {
    fn read8(&mut self, port: u16) -> u8 {
        if port == RTC_TARGET_PORT {
            return self.rtc_regs.get(&(self.rtc_index & 0x7F)).copied().unwrap_or(0);
        }
        self.get8(port)
    }

    fn read16(&mut self, port: u16) -> u16 {
        self.get16(port)
    }

    fn read32(&mut self, port: u16) -> u32 {
        self.get32(port)
    }

    fn write8(&mut self, port: u16, value: u8) {
        self.writes.push(IoWrite {
            port,
            value: value as u32,
            width: 8,
        });
        match port {
            RTC_INDEX_PORT => {
                self.rtc_index = value;
                self.bytes.insert(port, value);
            }
            RTC_TARGET_PORT => {
                self.rtc_regs.insert(self.rtc_index & 0x7F, value);
            }
            _ => {
                self.bytes.insert(port, value);
            }
        }
    }

    fn write16(&mut self, port: u16, value: u16) {
        self.writes.push(IoWrite {
            port,
            value: value as u32,
            width: 16,
        });
        self.seed16(port, value);
    }

    fn write32(&mut self, port: u16, value: u32) {
        self.writes.push(IoWrite {
            port,
            value,
            width: 32,
        });
        self.seed32(port, value);
    }
}

/// One recorded MMIO write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmioWrite {
    pub addr: usize,
    pub value: u32,
    pub width: u8,
}

/// RAM-backed MMIO space.
#[derive(Default)]
pub struct MockMmio {
    bytes: BTreeMap<usize, u8>,
    pub writes: Vec<MmioWrite>,
}

impl MockMmio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed8(&mut self, addr: usize, value: u8) {
        self.bytes.insert(addr, value);
    }

    pub fn seed32(&mut self, addr: usize, value: u32) {
        for (i, b) in value.to_le_bytes().iter().enumerate() {
            self.bytes.insert(addr + i, *b);
        }
    }

    pub fn get8(&self, addr: usize) -> u8 {
        self.bytes.get(&addr).copied().unwrap_or(0)
    }

    pub fn get32(&self, addr: usize) -> u32 {
        u32::from_le_bytes([
            self.get8(addr),
            self.get8(addr + 1),
            self.get8(addr + 2),
            self.get8(addr + 3),
        ])
    }
}

impl MmioAccess for MockMmio {
    fn read8(&mut self, addr: usize) -> u8 {
        self.get8(addr)
    }

    fn read32(&mut self, addr: usize) -> u32 {
        self.get32(addr)
    }

    fn write8(&mut self, addr: usize, value: u8) {
        self.writes.push(MmioWrite {
            addr,
            value: value as u32,
            width: 8,
        });
        self.bytes.insert(addr, value);
    }

    fn write32(&mut self, addr: usize, value: u32) {
        self.writes.push(MmioWrite {
            addr,
            value,
            width: 32,
        });
        self.seed32(addr, value);
    }
}

/// One recorded PCI config write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PciWrite {
    pub addr: PciAddr,
    pub offset: u8,
    pub value: u32,
    pub width: u8,
}

/// RAM-backed PCI config space.
#[derive(Default)]
pub struct MockPci {
    regs: BTreeMap<(u8, u8, u8, u8), u32>,
    pub writes: Vec<PciWrite>,
}

impl MockPci {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(addr: PciAddr, offset: u8) -> (u8, u8, u8, u8) {
        (addr.bus, addr.device, addr.function, offset & !0x3)
    }

    pub fn get32(&self, addr: PciAddr, offset: u8) -> u32 {
        self.regs.get(&Self::key(addr, offset)).copied().unwrap_or(0)
    }
}

impl PciConfigAccess for MockPci {
    fn read32(&mut self, addr: PciAddr, offset: u8) -> u32 {
        self.get32(addr, offset)
    }

    fn write32(&mut self, addr: PciAddr, offset: u8, value: u32) {
        self.writes.push(PciWrite {
            addr,
            offset: offset & !0x3,
            value,
            width: 32,
        });
        self.regs.insert(Self::key(addr, offset), value);
    }
}

/// Fixed two-register side-band expander.
pub struct MockSideband {
    pub port0: Result<u8, BusError>,
    pub port1: Result<u8, BusError>,
}

impl MockSideband {
    pub fn new(port0: u8, port1: u8) -> Self {
        Self {
            port0: Ok(port0),
            port1: Ok(port1),
        }
    }

    pub fn dead() -> Self {
        Self {
            port0: Err(BusError::NoAck),
            port1: Err(BusError::NoAck),
        }
    }
}

impl SidebandBus for MockSideband {
    fn read_byte(&mut self, _slave: u8, command: u8) -> Result<u8, BusError> {
        match command {
            0 => self.port0,
            _ => self.port1,
        }
    }
}

/// Component table keyed by (container, component) signature.
#[derive(Default)]
pub struct MockLoader {
    pub components: Vec<(Signature, Signature, &'static [u8])>,
    pub infos: Vec<(Signature, &'static [u8])>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ComponentLoader for MockLoader {
    fn load(
        &mut self,
        container: Signature,
        component: Signature,
    ) -> Result<&'static [u8], LoadError> {
        self.components
            .iter()
            .find(|(c, s, _)| *c == container && *s == component)
            .map(|(_, _, data)| *data)
            .ok_or(LoadError::NotFound)
    }

    fn component_info(&mut self, component: Signature) -> Result<&'static [u8], LoadError> {
        self.infos
            .iter()
            .find(|(s, _)| *s == component)
            .map(|(_, data)| *data)
            .ok_or(LoadError::NotFound)
    }
}

#[derive(Default)]
pub struct MockSpi {
    pub constructed: usize,
    pub loads: Vec<(u32, u32, u32)>,
    pub fail_constructor: bool,
}

impl SpiFlash for MockSpi {
    fn constructor(&mut self) -> Result<(), SpiError> {
        self.constructed += 1;
        if self.fail_constructor {
            Err(SpiError::NotDetected)
        } else {
            Ok(())
        }
    }

    fn load_external_config(&mut self, dst: u32, src: u32, len: u32) -> Result<(), SpiError> {
        self.loads.push((dst, src, len));
        Ok(())
    }
}

#[derive(Default)]
pub struct MockGpio {
    pub applied: Vec<GpioPadConfig>,
}

impl GpioPads for MockGpio {
    fn configure(&mut self, pads: &[GpioPadConfig]) {
        self.applied.extend_from_slice(pads);
    }
}

pub struct MockTpm {
    pub init_result: Result<(), TpmError>,
    pub init_calls: Vec<(bool, BootMode)>,
    pub event_logs: Vec<TpmType>,
    pub disabled: bool,
}

impl Default for MockTpm {
    fn default() -> Self {
        Self {
            init_result: Ok(()),
            init_calls: Vec::new(),
            event_logs: Vec::new(),
            disabled: false,
        }
    }
}

impl TpmService for MockTpm {
    fn init(&mut self, bypass_init: bool, boot_mode: BootMode) -> Result<(), TpmError> {
        self.init_calls.push((bypass_init, boot_mode));
        self.init_result
    }

    fn create_event_log(&mut self, tpm_type: TpmType) {
        self.event_logs.push(tpm_type);
    }

    fn disable(&mut self) {
        self.disabled = true;
    }
}

#[derive(Default)]
pub struct MockBootGuard {
    pub report: BootGuardInfo,
    pub queried: Vec<PciAddr>,
}

impl BootGuard for MockBootGuard {
    fn info(&mut self, heci: PciAddr) -> BootGuardInfo {
        self.queried.push(heci);
        self.report
    }
}

#[derive(Default)]
pub struct MockFsm {
    pub update: bool,
}

impl FlashStateMachine for MockFsm {
    fn in_update_mode(&mut self) -> bool {
        self.update
    }
}
