//! Board identity from the side-band I/O expander.
//!
//! Two 8-bit input port registers on a PCA9555-class expander carry the
//! board straps:
//!
//! ```text
//! port 0: [0]    BOM_ID[4]
//!         [2:1]  FAB_ID
//!         [3]    SPD_PRESENT
//!         [4]    VIRTUAL_BATTERY
//!         [5]    VIRTUAL_DOCK
//!         [7:6]  MEM_ID
//! port 1: [3:0]  BOARD_ID
//!         [7:4]  BOM_ID[3:0]
//! ```
//!
//! A missing or unreadable expander must never stop bring-up; every failure
//! path lands on [`BoardIdentity::DEFAULT`].

use log::{error, info};

use crate::services::SidebandBus;

/// Expander slave address on the side-band bus.
pub const IO_EXPANDER_SLAVE_ADDRESS: u8 = 0x22;
/// Command byte selecting input port 0.
pub const INPUT_PORT0_CMD: u8 = 0x00;
/// Command byte selecting input port 1.
pub const INPUT_PORT1_CMD: u8 = 0x01;

/// Accepted board id range (inclusive).
pub const BOARD_ID_MIN: u8 = 3;
/// Accepted board id range (inclusive).
pub const BOARD_ID_MAX: u8 = 5;

/// Decoded board straps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardIdentity {
    /// Board variant, within [`BOARD_ID_MIN`]..=[`BOARD_ID_MAX`].
    pub board_id: u8,
    /// Bill-of-materials id (5 bits).
    pub bom_id: u8,
    /// Fab revision (2 bits).
    pub fab_id: u8,
    /// Memory down variant (2 bits).
    pub mem_id: u8,
    /// DIMM SPD EEPROMs present.
    pub spd_present: bool,
}

impl BoardIdentity {
    /// Fail-safe identity: the reference board with no memory variant.
    pub const DEFAULT: BoardIdentity = BoardIdentity {
        board_id: 3,
        bom_id: 0,
        fab_id: 0,
        mem_id: 0,
        spd_present: false,
    };
}

/// Fields of expander input port 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InputPort0 {
    bom_id_bit4: u8,
    fab_id: u8,
    spd_present: bool,
    virtual_battery: bool,
    virtual_dock: bool,
    mem_id: u8,
}

fn decode_port0(raw: u8) -> InputPort0 {
    InputPort0 {
        bom_id_bit4: raw & 0x1,
        fab_id: (raw >> 1) & 0x3,
        spd_present: raw & (1 << 3) != 0,
        virtual_battery: raw & (1 << 4) != 0,
        virtual_dock: raw & (1 << 5) != 0,
        mem_id: (raw >> 6) & 0x3,
    }
}

/// Fields of expander input port 1: (board id, low BOM id bits).
fn decode_port1(raw: u8) -> (u8, u8) {
    (raw & 0xF, (raw >> 4) & 0xF)
}

/// Read the board straps off the side-band expander.
///
/// Single attempt per port; any bus failure or an out-of-range board id
/// falls back to [`BoardIdentity::DEFAULT`].
pub fn resolve_board_identity(bus: &mut dyn SidebandBus) -> BoardIdentity {
    let port0 = bus.read_byte(IO_EXPANDER_SLAVE_ADDRESS, INPUT_PORT0_CMD);
    let port1 = bus.read_byte(IO_EXPANDER_SLAVE_ADDRESS, INPUT_PORT1_CMD);

    let (raw0, raw1) = match (port0, port1) {
        (Ok(raw0), Ok(raw1)) => (raw0, raw1),
        (e0, e1) => {
            error!(
                "board id expander unreadable (port0 {:?}, port1 {:?}), using defaults",
                e0.err(),
                e1.err()
            );
            return BoardIdentity::DEFAULT;
        }
    };

    info!("expander raw: port0 0x{:02x} port1 0x{:02x}", raw0, raw1);

    let p0 = decode_port0(raw0);
    let (board_id, bom_low) = decode_port1(raw1);

    if !(BOARD_ID_MIN..=BOARD_ID_MAX).contains(&board_id) {
        error!("board id {} out of range, using defaults", board_id);
        return BoardIdentity::DEFAULT;
    }

    let identity = BoardIdentity {
        board_id,
        bom_id: ((p0.bom_id_bit4 << 4) | bom_low) & 0x1F,
        fab_id: p0.fab_id,
        mem_id: p0.mem_id,
        spd_present: p0.spd_present,
    };

    info!(
        "board id {} bom {} fab {} mem {} spd {}",
        identity.board_id, identity.bom_id, identity.fab_id, identity.mem_id, identity.spd_present
    );

    identity
}

/// Marketing name for a board variant.
pub fn platform_name(board_id: u8) -> &'static str {
    match board_id {
        3 => "CRB-T3",
        4 => "RVP-T4",
        5 => "RVP-T5",
        _ => "UNKNOWN",
    }
}
