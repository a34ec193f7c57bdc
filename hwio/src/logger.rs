//! `log` facade backend over the serial port.
//!
//! Install once, early, before any board phase runs. Records are emitted as
//! `[LEVEL] target: message` lines on COM1.

use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record};
use spin::Mutex;

use crate::serial::{SerialPort, COM1};

struct SerialLogger {
    port: Mutex<SerialPort>,
}

impl Log for SerialLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        let mut port = self.port.lock();
        let _ = writeln!(
            port,
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

static LOGGER: SerialLogger = SerialLogger {
    port: Mutex::new(SerialPort::new(COM1)),
};

/// Install the serial logger at the given level.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
