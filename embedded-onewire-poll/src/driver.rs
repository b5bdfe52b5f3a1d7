use crate::{
    BusControl, ClockSource, Flag, Flags, OneWireError, OneWireResult, Speed, State, Timings,
    framer::ByteFramer,
    logging::{debug, trace, warn},
    timing::Thresholds,
};

/// Role of the driver on the bus.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Bus master: generates the reset pulse and every time slot.
    #[default]
    Master,
    /// Bus slave. Reserved; a slave driver rejects every operation with
    /// [`OneWireError::Unimplemented`].
    Slave,
}

/// Builder for creating a [`OneWireDriver`] instance with custom configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct OneWireDriverBuilder {
    mode: Mode,
    speed: Speed,
    timings: Option<Timings>,
}

impl OneWireDriverBuilder {
    /// Sets the role of the driver. Defaults to [`Mode::Master`].
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the bus speed. Defaults to [`Speed::Standard`].
    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    /// Overrides the slot timings of the selected speed, e.g. to compensate for
    /// a slow poll loop or a long bus.
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = Some(timings);
        self
    }

    /// Builds a new [`OneWireDriver`] on `bus`, timed by `clock`.
    ///
    /// The line is released, the driver starts in [`State::Idle`] with every flag cleared
    /// except [`Flag::IsSlave`] in [`Mode::Slave`].
    ///
    /// # Errors
    /// Returns [`OneWireError::Other`] if the line cannot be released.
    pub fn build<B: BusControl, C: ClockSource>(
        self,
        mut bus: B,
        clock: C,
    ) -> OneWireResult<OneWireDriver<B, C>, B::Error> {
        bus.release()?;
        let timings = self.timings.unwrap_or(self.speed.timings());
        let thresholds = timings.to_ticks(clock.tick_hz());
        let mut flags = Flags::new();
        if self.mode == Mode::Slave {
            flags.set(Flag::IsSlave);
        }
        Ok(OneWireDriver {
            bus,
            clock,
            state: State::Idle,
            entered_at: 0,
            framer: ByteFramer::default(),
            sampled_low: false,
            flags,
            speed: self.speed,
            timings,
            thresholds,
        })
    }
}

/// A polled 1-Wire bus master on one open-drain line.
///
/// Takes ownership of a [`BusControl`] line and a [`ClockSource`]. Operations are started
/// with [`begin_reset`](Self::begin_reset), [`write_byte`](Self::write_byte) and
/// [`begin_read`](Self::begin_read), and carried out by calling [`process`](Self::process)
/// until [`is_busy`](Self::is_busy) returns `false`. Completion is reported through the
/// [`Flags`] register.
///
/// `process` must be called often enough to resolve the shortest slot phase (a few
/// microseconds at standard speed). Polling too slowly stretches phases and corrupts
/// slots; it never blocks or panics.
pub struct OneWireDriver<B, C> {
    bus: B,
    clock: C,
    state: State,
    entered_at: u64,
    framer: ByteFramer,
    sampled_low: bool,
    flags: Flags,
    speed: Speed,
    timings: Timings,
    thresholds: Thresholds,
}

impl<B: BusControl, C: ClockSource> OneWireDriver<B, C> {
    /// Creates a driver with the standard speed timings.
    ///
    /// # Errors
    /// Returns [`OneWireError::Other`] if the line cannot be released.
    pub fn new(bus: B, clock: C, mode: Mode) -> OneWireResult<Self, B::Error> {
        OneWireDriverBuilder::default().with_mode(mode).build(bus, clock)
    }

    /// Starts a reset pulse followed by presence detection.
    ///
    /// Clears [`Flag::Error`]. When the driver is back in [`State::Idle`],
    /// [`Flag::PresenceDetected`] tells whether a device answered. If none did,
    /// [`Flag::Error`] is set again.
    ///
    /// # Errors
    /// [`OneWireError::BusInUse`] if an operation is in progress,
    /// [`OneWireError::ProtocolFault`] if the driver is halted,
    /// [`OneWireError::Unimplemented`] in slave mode.
    pub fn begin_reset(&mut self) -> OneWireResult<(), B::Error> {
        self.ensure_idle()?;
        self.flags.clear(Flag::Error);
        self.enter(State::ResetInit);
        Ok(())
    }

    /// Checks the outcome of the last reset.
    ///
    /// # Errors
    /// [`OneWireError::NoDevicePresent`] if no device answered it.
    pub fn check_presence(&self) -> OneWireResult<(), B::Error> {
        if self.flags.presence_detected() {
            Ok(())
        } else {
            Err(OneWireError::NoDevicePresent)
        }
    }

    /// Starts sending `data`, least significant bit first.
    ///
    /// [`Flag::ByteSent`] is cleared now and set once all 8 slots are done.
    ///
    /// # Errors
    /// Same as [`begin_reset`](Self::begin_reset). A rejected call leaves the transfer in
    /// progress untouched.
    pub fn write_byte(&mut self, data: u8) -> OneWireResult<(), B::Error> {
        self.ensure_idle()?;
        self.framer.load(data);
        self.flags.clear(Flag::ByteSent);
        self.enter(State::write_init(self.framer.next_bit()));
        Ok(())
    }

    /// Starts reading one byte, least significant bit first.
    ///
    /// [`Flag::ByteReceived`] is cleared now and set once all 8 slots are done; fetch the
    /// byte with [`get_byte`](Self::get_byte).
    ///
    /// # Errors
    /// Same as [`begin_reset`](Self::begin_reset).
    pub fn begin_read(&mut self) -> OneWireResult<(), B::Error> {
        self.ensure_idle()?;
        self.framer.start_read();
        self.flags.clear(Flag::ByteReceived);
        self.enter(State::ReadInit);
        Ok(())
    }

    /// Advances the state machine by at most one phase.
    ///
    /// Never blocks. Takes at most one sample of the line. In [`State::Idle`] and
    /// [`State::Error`] it does nothing.
    ///
    /// # Errors
    /// [`OneWireError::Other`] if a pin operation failed. The driver then releases the line
    /// (best effort), sets [`Flag::Error`] and halts in [`State::Error`].
    pub fn process(&mut self) -> OneWireResult<(), B::Error> {
        self.step().map_err(|e| {
            warn!("1-Wire pin failure in {:?}", self.state);
            self.halt();
            OneWireError::Other(e)
        })
    }

    /// Forces the driver back to [`State::Idle`] and releases the line.
    ///
    /// Aborts any operation in progress; a byte being sent or read is lost. Clears
    /// [`Flag::Error`]. This is the only way out of [`State::Error`].
    ///
    /// # Errors
    /// [`OneWireError::Other`] if the line cannot be released; the driver state is then
    /// left as it was.
    pub fn recover(&mut self) -> OneWireResult<(), B::Error> {
        self.bus.release()?;
        debug!("1-Wire recovering from {:?}", self.state);
        self.framer = ByteFramer::default();
        self.sampled_low = false;
        self.flags.clear(Flag::Error);
        self.enter(State::Idle);
        Ok(())
    }

    /// Selects the stock standard or overdrive timings.
    ///
    /// Devices have to be switched first with
    /// [`ONEWIRE_SKIP_ROM_CMD_OD`](crate::ONEWIRE_SKIP_ROM_CMD_OD) or
    /// [`ONEWIRE_MATCH_ROM_CMD_OD`](crate::ONEWIRE_MATCH_ROM_CMD_OD) at standard speed;
    /// a standard speed reset returns them to standard speed. Replaces timings set
    /// with [`OneWireDriverBuilder::with_timings`].
    ///
    /// # Errors
    /// Same as [`begin_reset`](Self::begin_reset).
    pub fn set_overdrive_mode(&mut self, enable: bool) -> OneWireResult<(), B::Error> {
        self.ensure_idle()?;
        self.speed = if enable {
            Speed::Overdrive
        } else {
            Speed::Standard
        };
        self.timings = self.speed.timings();
        self.thresholds = self.timings.to_ticks(self.clock.tick_hz());
        Ok(())
    }

    fn ensure_idle(&self) -> OneWireResult<(), B::Error> {
        if self.flags.is_slave() {
            return Err(OneWireError::Unimplemented);
        }
        match self.state {
            state if state.is_idle() => Ok(()),
            State::Error => Err(OneWireError::ProtocolFault),
            state => {
                warn!("1-Wire bus in use ({:?}), request rejected", state);
                Err(OneWireError::BusInUse)
            }
        }
    }

    fn enter(&mut self, state: State) {
        self.state = state;
        self.entered_at = self.clock.now();
    }

    fn elapsed(&mut self, threshold: u64) -> bool {
        self.clock.now().wrapping_sub(self.entered_at) >= threshold
    }

    fn halt(&mut self) {
        let _ = self.bus.release();
        self.flags.set(Flag::Error);
        self.enter(State::Error);
    }

    fn step(&mut self) -> Result<(), B::Error> {
        let t = self.thresholds;
        match self.state {
            State::Idle | State::Error => {}

            State::ResetInit => {
                if self.elapsed(t.reset_init) {
                    self.bus.drive_low()?;
                    self.enter(State::ResetDriveLow);
                }
            }
            State::ResetDriveLow => {
                if self.elapsed(t.reset_low) {
                    self.bus.release()?;
                    self.enter(State::ResetReleaseBus);
                }
            }
            State::ResetReleaseBus => {
                if self.elapsed(t.reset_release) {
                    self.flags.clear(Flag::PresenceDetected);
                    self.enter(State::ResetSampleBus);
                }
            }
            State::ResetSampleBus => {
                if !self.elapsed(t.reset_sample) {
                    if !self.bus.sample()? {
                        self.flags.set(Flag::PresenceDetected);
                    }
                } else {
                    if !self.flags.presence_detected() {
                        debug!("1-Wire reset: no presence pulse");
                        self.flags.set(Flag::Error);
                    }
                    self.enter(State::ResetDone);
                }
            }
            State::ResetDone => self.enter(State::Idle),

            State::WriteHighInit => {
                self.bus.drive_low()?;
                self.enter(State::WriteHighDriveLow);
            }
            State::WriteHighDriveLow => {
                if self.elapsed(t.write_one_low) {
                    self.bus.release()?;
                    self.enter(State::WriteHighReleaseBus);
                }
            }
            State::WriteHighReleaseBus => {
                if self.elapsed(t.write_one_release) {
                    self.enter(State::WriteHighDone);
                }
            }

            State::WriteLowInit => {
                self.bus.drive_low()?;
                self.enter(State::WriteLowDriveLow);
            }
            State::WriteLowDriveLow => {
                if self.elapsed(t.write_zero_low) {
                    self.bus.release()?;
                    self.enter(State::WriteLowReleaseBus);
                }
            }
            State::WriteLowReleaseBus => {
                if self.elapsed(t.write_zero_release) {
                    self.enter(State::WriteLowDone);
                }
            }
            State::WriteHighDone | State::WriteLowDone => self.finish_write_bit(),

            State::ReadInit => {
                self.bus.drive_low()?;
                self.enter(State::ReadDriveLow);
            }
            State::ReadDriveLow => {
                if self.elapsed(t.write_one_low) {
                    self.bus.release()?;
                    self.enter(State::ReadReleaseBus);
                }
            }
            State::ReadReleaseBus => {
                if self.elapsed(t.read_release) {
                    self.sampled_low = false;
                    self.enter(State::ReadSampleBus);
                }
            }
            State::ReadSampleBus => {
                if !self.elapsed(t.read_sample) {
                    if !self.bus.sample()? {
                        self.sampled_low = true;
                    }
                } else {
                    self.framer.store(!self.sampled_low);
                    self.enter(State::ReadDone);
                }
            }
            State::ReadDone => self.finish_read_bit(),

            State::SlaveReadInit
            | State::SlaveReadMonitorBus
            | State::SlaveReadReleaseBus
            | State::SlaveReadSampleBus
            | State::SlaveReadDone => {
                warn!("1-Wire state {:?} is not defined for a master", self.state);
                self.halt();
            }
        }
        Ok(())
    }

    fn finish_write_bit(&mut self) {
        if self.framer.advance() {
            self.framer.clear_rx();
            self.flags.set(Flag::ByteSent);
            trace!("1-Wire byte sent");
            self.enter(State::Idle);
        } else {
            self.enter(State::write_init(self.framer.next_bit()));
        }
    }

    fn finish_read_bit(&mut self) {
        if self.framer.advance() {
            self.flags.set(Flag::ByteReceived);
            trace!("1-Wire byte received: {:#x}", self.framer.rx());
            self.enter(State::Idle);
        } else {
            self.enter(State::ReadInit);
        }
    }
}

impl<B, C> OneWireDriver<B, C> {
    /// `true` once a byte has been read and not yet fetched with [`get_byte`](Self::get_byte).
    pub fn data_available(&self) -> bool {
        self.flags.byte_received()
    }

    /// Returns the received byte and clears [`Flag::ByteReceived`].
    ///
    /// The value is stale unless [`data_available`](Self::data_available) returned `true`.
    pub fn get_byte(&mut self) -> u8 {
        self.flags.clear(Flag::ByteReceived);
        self.framer.rx()
    }

    /// `true` if [`Flag::Error`] is set.
    pub fn is_error(&self) -> bool {
        self.flags.error()
    }

    /// Clears [`Flag::Error`]. Does not leave [`State::Error`]; see
    /// [`recover`](OneWireDriver::recover).
    pub fn clear_error(&mut self) {
        self.flags.clear(Flag::Error);
    }

    /// `true` if a device answered the last reset.
    pub fn presence_detected(&self) -> bool {
        self.flags.presence_detected()
    }

    /// `true` once the last [`write_byte`](OneWireDriver::write_byte) has completed.
    pub fn byte_sent(&self) -> bool {
        self.flags.byte_sent()
    }

    /// `true` while an operation is in progress and [`process`](OneWireDriver::process)
    /// has to be called.
    pub fn is_busy(&self) -> bool {
        !self.state.is_idle() && self.state != State::Error
    }

    /// Current phase of the state machine.
    pub fn state(&self) -> State {
        self.state
    }

    /// Position of the bit slot in flight, `0..=7`.
    pub fn bit_index(&self) -> u8 {
        self.framer.index()
    }

    /// Snapshot of the status register.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Check if the driver uses the overdrive timings.
    pub fn get_overdrive_mode(&self) -> bool {
        self.speed == Speed::Overdrive
    }

    /// The slot timings in use.
    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Gives back the line and the clock.
    pub fn into_inner(self) -> (B, C) {
        (self.bus, self.clock)
    }
}
