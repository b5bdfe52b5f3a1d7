/// Phase of the driver's time slot state machine.
///
/// Only one phase is active at a time. Every phase of a slot is entered through
/// [`OneWireDriver::process`](crate::OneWireDriver::process) except the first one, which
/// is entered by [`begin_reset`](crate::OneWireDriver::begin_reset),
/// [`write_byte`](crate::OneWireDriver::write_byte) or
/// [`begin_read`](crate::OneWireDriver::begin_read).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No operation in progress, the line is released.
    #[default]
    Idle,
    /// Halted after a fault. Left only through [`OneWireDriver::recover`](crate::OneWireDriver::recover).
    Error,

    /// Waiting before the reset pulse.
    ResetInit,
    /// Reset pulse, line held low.
    ResetDriveLow,
    /// Line released, waiting for devices to answer.
    ResetReleaseBus,
    /// Presence window, line sampled on every poll.
    ResetSampleBus,
    /// Reset finished, returns to [`State::Idle`] on the next poll.
    ResetDone,

    /// Start of a write 1 slot.
    WriteHighInit,
    /// Write 1 slot, short low pulse.
    WriteHighDriveLow,
    /// Write 1 slot, line released for the rest of the slot.
    WriteHighReleaseBus,
    /// Write 1 slot finished.
    WriteHighDone,

    /// Start of a write 0 slot.
    WriteLowInit,
    /// Write 0 slot, long low pulse.
    WriteLowDriveLow,
    /// Write 0 slot, recovery.
    WriteLowReleaseBus,
    /// Write 0 slot finished.
    WriteLowDone,

    /// Start of a read slot.
    ReadInit,
    /// Read slot, short low pulse.
    ReadDriveLow,
    /// Read slot, line released before the sample window.
    ReadReleaseBus,
    /// Read slot sample window, line sampled on every poll.
    ReadSampleBus,
    /// Read slot finished.
    ReadDone,

    /// Slave receive, not implemented.
    SlaveReadInit,
    /// Slave receive, not implemented.
    SlaveReadMonitorBus,
    /// Slave receive, not implemented.
    SlaveReadReleaseBus,
    /// Slave receive, not implemented.
    SlaveReadSampleBus,
    /// Slave receive, not implemented.
    SlaveReadDone,
}

impl State {
    /// The first phase of a write slot for `bit`.
    pub(crate) fn write_init(bit: bool) -> Self {
        if bit {
            State::WriteHighInit
        } else {
            State::WriteLowInit
        }
    }

    /// `true` in [`State::Idle`].
    pub fn is_idle(&self) -> bool {
        matches!(self, State::Idle)
    }

    /// `true` while a reset sequence is in progress.
    pub fn is_reset(&self) -> bool {
        use State::*;
        matches!(
            self,
            ResetInit | ResetDriveLow | ResetReleaseBus | ResetSampleBus | ResetDone
        )
    }

    /// `true` while a write slot is in progress.
    pub fn is_write(&self) -> bool {
        use State::*;
        matches!(
            self,
            WriteHighInit
                | WriteHighDriveLow
                | WriteHighReleaseBus
                | WriteHighDone
                | WriteLowInit
                | WriteLowDriveLow
                | WriteLowReleaseBus
                | WriteLowDone
        )
    }

    /// `true` while a read slot is in progress.
    pub fn is_read(&self) -> bool {
        use State::*;
        matches!(
            self,
            ReadInit | ReadDriveLow | ReadReleaseBus | ReadSampleBus | ReadDone
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_groups() {
        assert!(State::Idle.is_idle());
        assert!(!State::Error.is_idle());
        assert!(State::ResetSampleBus.is_reset());
        assert!(!State::ResetSampleBus.is_read());
        assert!(State::write_init(true).is_write());
        assert!(State::write_init(false).is_write());
        assert!(State::WriteLowDone.is_write());
        assert!(State::ReadSampleBus.is_read());
        assert!(!State::ReadSampleBus.is_write());
        for state in [State::Error, State::SlaveReadInit, State::SlaveReadDone] {
            assert!(!state.is_idle() && !state.is_reset());
            assert!(!state.is_write() && !state.is_read());
        }
    }
}
