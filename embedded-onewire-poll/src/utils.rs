use crate::OneWireError;

/// Calculate CRC-8 used in 1-Wire communications.
///
/// Dallas/Maxim polynomial x⁸ + x⁵ + x⁴ + 1, processed LSB first (`0x8c` reflected).
/// With the `crc-table` feature the per-byte step is a 256 entry lookup instead of
/// eight shift rounds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OneWireCrc(u8);

#[cfg(feature = "crc-table")]
static CRC_TABLE: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = shift_byte(i as u8);
        i += 1;
    }
    table
};

const fn shift_byte(mut crc: u8) -> u8 {
    let mut round = 0;
    while round < 8 {
        crc = if crc & 0x1 == 0x1 {
            (crc >> 1) ^ 0x8c
        } else {
            crc >> 1
        };
        round += 1;
    }
    crc
}

#[cfg(feature = "crc-table")]
#[inline]
fn step(crc: u8) -> u8 {
    CRC_TABLE[crc as usize]
}

#[cfg(not(feature = "crc-table"))]
#[inline]
fn step(crc: u8) -> u8 {
    shift_byte(crc)
}

impl OneWireCrc {
    /// Start a new CRC computation.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Get the current CRC value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Update the CRC with the incoming byte.
    pub fn update(&mut self, byte: u8) {
        self.0 = step(self.0 ^ byte);
    }

    /// Update the CRC with every byte of `bytes`, in order.
    pub fn update_slice(&mut self, bytes: &[u8]) {
        bytes.iter().for_each(|&b| self.update(b));
    }

    /// Validate a sequence of bytes where the last byte is the 1-Wire CRC of
    /// the previous bytes, such as a ROM code as received on the bus.
    pub fn validate(sequence: &[u8]) -> bool {
        let mut crc = OneWireCrc::new();
        crc.update_slice(sequence);
        !sequence.is_empty() && crc.0 == 0x0
    }

    /// Like [`validate`](Self::validate), as a result for `?` in bus transactions.
    ///
    /// # Errors
    /// [`OneWireError::InvalidCrc`] if the check fails.
    pub fn check<E>(sequence: &[u8]) -> Result<(), OneWireError<E>> {
        if Self::validate(sequence) {
            Ok(())
        } else {
            Err(OneWireError::InvalidCrc)
        }
    }
}
