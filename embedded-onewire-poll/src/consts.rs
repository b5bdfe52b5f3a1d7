//! ROM command bytes.
//!
//! The driver moves these over the bus like any other byte; it does not implement the
//! addressing or search algorithms behind them.

/// Command to search for devices on the 1-Wire bus
pub const ONEWIRE_SEARCH_CMD: u8 = 0xf0;

/// Read the 64-bit ROM code of the only device on the bus.
/// Data collisions occur if more than one device answers.
pub const ONEWIRE_READ_ROM_CMD: u8 = 0x33;

/// Command to match a specific ROM address in 1-Wire communication (non-overdrive mode)
pub const ONEWIRE_MATCH_ROM_CMD: u8 = 0x55;

/// Command to skip ROM address in 1-Wire communication (non-overdrive mode)
pub const ONEWIRE_SKIP_ROM_CMD: u8 = 0xcc;

/// Command to search for devices in alarm state on the 1-Wire bus
pub const ONEWIRE_CONDITIONAL_SEARCH_CMD: u8 = 0xec;

/// Overdrive-Match ROM. Sent at standard speed, followed by the 64-bit ROM
/// at overdrive speed; the matching device switches to overdrive.
pub const ONEWIRE_MATCH_ROM_CMD_OD: u8 = 0x69;

/// Overdrive-Skip ROM. Puts every overdrive-capable device into overdrive
/// until the next standard-speed reset pulse (at least 480μs).
pub const ONEWIRE_SKIP_ROM_CMD_OD: u8 = 0x3c;
