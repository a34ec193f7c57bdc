//! Static platform device table.
//!
//! Registered with the boot core at pre-config so later stages can map a
//! boot device choice onto a controller.

use ember_hwio::pci::PciAddr;

/// Boot device classes the boot core understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootDevice {
    Sata,
    Ufs,
    Emmc,
    Nvme,
    Spi,
    Usb,
    Memory,
    Smbus,
}

/// Where a platform device lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAddress {
    /// PCI device/function.
    Pci(PciAddr),
    /// Memory-mapped pseudo device.
    Mmio(u32),
}

/// One platform device the boot core may boot from or use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformDevice {
    pub address: DeviceAddress,
    pub kind: BootDevice,
    pub instance: u8,
}

const fn pci_dev(device: u8, function: u8, kind: BootDevice, instance: u8) -> PlatformDevice {
    PlatformDevice {
        address: DeviceAddress::Pci(PciAddr::new(0, device, function)),
        kind,
        instance,
    }
}

/// The board's device table.
pub static PLATFORM_DEVICES: &[PlatformDevice] = &[
    pci_dev(0x17, 0, BootDevice::Sata, 0),
    pci_dev(0x12, 5, BootDevice::Ufs, 0),
    pci_dev(0x12, 7, BootDevice::Ufs, 1),
    pci_dev(0x1A, 0, BootDevice::Emmc, 0),
    PlatformDevice {
        address: DeviceAddress::Pci(PciAddr::new(1, 0, 0)),
        kind: BootDevice::Nvme,
        instance: 0,
    },
    pci_dev(0x1F, 5, BootDevice::Spi, 0),
    pci_dev(0x14, 0, BootDevice::Usb, 0),
    PlatformDevice {
        address: DeviceAddress::Mmio(0),
        kind: BootDevice::Memory,
        instance: 0,
    },
    pci_dev(0x1F, 4, BootDevice::Smbus, 0),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_spi_and_smbus() {
        assert!(PLATFORM_DEVICES
            .iter()
            .any(|d| d.kind == BootDevice::Spi));
        assert!(PLATFORM_DEVICES
            .iter()
            .any(|d| d.kind == BootDevice::Smbus));
    }

    #[test]
    fn test_ufs_instances_distinct() {
        let instances: alloc::vec::Vec<u8> = PLATFORM_DEVICES
            .iter()
            .filter(|d| d.kind == BootDevice::Ufs)
            .map(|d| d.instance)
            .collect();
        assert_eq!(instances, [0, 1]);
    }
}
