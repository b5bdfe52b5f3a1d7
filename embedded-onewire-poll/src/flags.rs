use bitfield_struct::bitfield;

/// Status register of a [`OneWireDriver`](crate::OneWireDriver).
///
/// The state machine sets these bits, the application polls and clears them.
/// Each bit is independent of the others.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct Flags {
    /// A reset found no device, the state machine faulted, or the pin reported an error.
    /// Stays set until [`OneWireDriver::clear_error`](crate::OneWireDriver::clear_error).
    pub error: bool,
    /// A device pulled the line low during the presence window of the last reset.
    pub presence_detected: bool,
    /// All 8 bits of a read have been sampled and the byte is waiting in the receive register.
    pub byte_received: bool,
    /// All 8 bits of the transmit register have been sent.
    pub byte_sent: bool,
    /// The driver was created in [`Mode::Slave`](crate::Mode::Slave).
    pub is_slave: bool,
    #[bits(3)]
    __: u8,
}

/// A single bit of the [`Flags`] register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Flag {
    /// See [`Flags::error`].
    Error,
    /// See [`Flags::presence_detected`].
    PresenceDetected,
    /// See [`Flags::byte_received`].
    ByteReceived,
    /// See [`Flags::byte_sent`].
    ByteSent,
    /// See [`Flags::is_slave`].
    IsSlave,
}

impl Flags {
    /// Check whether `flag` is set.
    pub fn is_set(&self, flag: Flag) -> bool {
        match flag {
            Flag::Error => self.error(),
            Flag::PresenceDetected => self.presence_detected(),
            Flag::ByteReceived => self.byte_received(),
            Flag::ByteSent => self.byte_sent(),
            Flag::IsSlave => self.is_slave(),
        }
    }

    /// Set `flag`, leaving the others untouched.
    pub fn set(&mut self, flag: Flag) {
        self.assign(flag, true);
    }

    /// Clear `flag`, leaving the others untouched.
    pub fn clear(&mut self, flag: Flag) {
        self.assign(flag, false);
    }

    fn assign(&mut self, flag: Flag, value: bool) {
        match flag {
            Flag::Error => self.set_error(value),
            Flag::PresenceDetected => self.set_presence_detected(value),
            Flag::ByteReceived => self.set_byte_received(value),
            Flag::ByteSent => self.set_byte_sent(value),
            Flag::IsSlave => self.set_is_slave(value),
        }
    }
}
