//! Configuration projection engine.
//!
//! Projects the board's config records onto the memory-init parameter
//! block. Every domain is independent: an absent record, a disabled build
//! feature or an unrecognized selector degrades to the defaults already in
//! the block, never to an error. There is deliberately no failure return.
//!
//! Domain order matters only for TCC, which runs last so tuning data may
//! override the memory domain's SA-GV and RAPL settings.

pub mod graphics;
pub mod memory;
pub mod tcc;

use ember_cfgdata::{ConfigStore, SecurityCfg};
use log::info;

use crate::features::{BuildFeatures, PlatformFeatures};
use crate::params::{debug_flags, MemInitParams};
use crate::phases::PlatformCaps;
use crate::services::ComponentLoader;

/// Serial-IO UART controllers on the PCH; anything at or past this index is
/// routed to the legacy ISA UART.
pub const PCH_UART_CONTROLLERS: u8 = 7;

/// Temporary stack for the silicon-init binary, in cache-as-RAM.
const SILICON_INIT_STACK_BASE: u32 = 0xFEF3_FF00;
const SILICON_INIT_STACK_SIZE: u32 = 0x4_0000;

/// Project all config domains onto the parameter block.
pub fn update_mem_params(
    params: &mut MemInitParams,
    store: &ConfigStore,
    build: &BuildFeatures,
    caps: &PlatformCaps,
    features: &mut PlatformFeatures,
    loader: &mut dyn ComponentLoader,
) {
    debug_preamble(params, caps.debug_port);

    params.arch.stack_base = SILICON_INIT_STACK_BASE;
    params.arch.stack_size = SILICON_INIT_STACK_SIZE;

    if let Some(security) = store.find::<SecurityCfg>() {
        info!("loading security cfg");
        params.cfg.enable_sgx = security.enable_sgx;
    } else {
        info!("no security cfg record");
    }

    memory::project(params, store, build);
    graphics::project(params, store, build, caps);

    if build.tcc {
        tcc::project(params, loader, features);
    }
}

/// Route the silicon-init binary's debug output the same way ours goes.
fn debug_preamble(params: &mut MemInitParams, debug_port: Option<u8>) {
    let cfg = &mut params.cfg;
    match debug_port {
        Some(n) if n < PCH_UART_CONTROLLERS => {
            cfg.debug_interface_flags = debug_flags::SERIAL_IO_UART;
            cfg.serial_io_uart_debug_controller_number = n;
        }
        Some(_) => {
            cfg.debug_interface_flags = debug_flags::LEGACY_UART;
            cfg.isa_serial_uart_base = 1;
        }
        None => {
            cfg.debug_interface_flags = debug_flags::LEGACY_UART;
            cfg.isa_serial_uart_base = 0;
        }
    }
    cfg.serial_debug_level = 0x3;
}
