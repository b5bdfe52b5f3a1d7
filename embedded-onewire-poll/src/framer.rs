/// Bit-order bookkeeping for byte transfers.
///
/// Bytes travel least significant bit first. `index` names the bit of the slot
/// in flight and stays within `0..=7`; it is zero only at the start of a byte.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ByteFramer {
    tx: u8,
    rx: u8,
    index: u8,
}

impl ByteFramer {
    /// Queue `byte` for transmission, starting from bit 0.
    pub(crate) fn load(&mut self, byte: u8) {
        self.tx = byte;
        self.index = 0;
    }

    /// Start assembling a received byte from bit 0.
    pub(crate) fn start_read(&mut self) {
        self.index = 0;
    }

    /// The bit of the transmit register to send in the current slot.
    pub(crate) fn next_bit(&self) -> bool {
        (self.tx >> self.index) & 0x01 == 0x01
    }

    /// Store a sampled bit at the current position of the receive register.
    pub(crate) fn store(&mut self, bit: bool) {
        if bit {
            self.rx |= 1 << self.index;
        } else {
            self.rx &= !(1 << self.index);
        }
    }

    /// Move on to the next slot. Returns `true` once the eighth slot is done,
    /// at which point the position is back at bit 0.
    pub(crate) fn advance(&mut self) -> bool {
        if self.index >= 7 {
            self.index = 0;
            true
        } else {
            self.index += 1;
            false
        }
    }

    pub(crate) fn clear_rx(&mut self) {
        self.rx = 0;
    }

    pub(crate) fn rx(&self) -> u8 {
        self.rx
    }

    pub(crate) fn index(&self) -> u8 {
        self.index
    }
}
