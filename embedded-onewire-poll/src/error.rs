/// One wire communication error type.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OneWireError<E> {
    /// Encapsulates the error type from the underlying pin.
    Other(E),
    /// No device answered the reset pulse with a presence pulse. Returned by
    /// [`OneWireDriver::check_presence`](crate::OneWireDriver::check_presence).
    NoDevicePresent,
    /// An operation was requested while another one is still in flight.
    BusInUse,
    /// The state machine halted in [`State::Error`](crate::State::Error).
    /// Call [`OneWireDriver::recover`](crate::OneWireDriver::recover) before the next operation.
    ProtocolFault,
    /// The operation is not implemented, e.g. any bus operation on a driver created in slave mode.
    Unimplemented,
    /// Computed CRC of the received data is invalid. Returned by
    /// [`OneWireCrc::check`](crate::OneWireCrc::check).
    InvalidCrc,
}

impl<E> From<E> for OneWireError<E> {
    fn from(other: E) -> Self {
        Self::Other(other)
    }
}
