#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
//! # embedded-onewire-poll
//! A no-std, non-blocking 1-Wire bus master.
//!
//! The [OneWireDriver] bit-bangs the 1-Wire protocol on a single open-drain line without
//! ever busy-waiting. Every time slot (reset/presence, write 1, write 0, read) is a sequence
//! of drive/release/sample phases, and each phase is held until a delay threshold measured
//! against a monotonic [ClockSource] has elapsed. The application calls
//! [OneWireDriver::process] from its main loop or a periodic task; each call advances the
//! state machine by at most one phase and returns immediately.
//!
//! Hardware access goes through the [BusControl] trait. [OpenDrainPin] implements it for any
//! [embedded-hal](embedded_hal) pin that is both an input and an output.
//!
//! ```ignore
//! let mut bus = OneWireDriver::new(OpenDrainPin::new(pin), clock, Mode::Master)?;
//! bus.write_byte(ONEWIRE_SKIP_ROM_CMD)?;
//! while bus.is_busy() {
//!     bus.process()?;
//!     // other cooperative work
//! }
//! assert!(bus.byte_sent());
//! ```

mod logging;

mod consts;
mod driver;
mod error;
mod flags;
mod framer;
mod pin;
mod state;
mod timing;
mod traits;
mod utils;

#[cfg(test)]
mod sim;

pub use consts::*;
pub use driver::{Mode, OneWireDriver, OneWireDriverBuilder};
pub use error::OneWireError;
pub use flags::{Flag, Flags};
pub use pin::OpenDrainPin;
pub use state::State;
pub use timing::{Micros, Speed, Timings};
pub use traits::{BusControl, ClockSource};
pub use utils::OneWireCrc;

/// Error type for 1-Wire operations.
pub type OneWireResult<T, E> = Result<T, OneWireError<E>>;
