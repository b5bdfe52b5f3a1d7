/// Access to the 1-Wire data line.
///
/// The line is open drain with an external pull-up: the master can only pull it low
/// or let go of it. Implementations must never actively drive the line high.
pub trait BusControl {
    /// The error type returned by the pin operations.
    type Error;

    /// Pull the line to ground.
    fn drive_low(&mut self) -> Result<(), Self::Error>;

    /// Stop driving the line and let the pull-up (or a device) set its level.
    fn release(&mut self) -> Result<(), Self::Error>;

    /// Read the current line level.
    ///
    /// # Returns
    /// `true` if the line is high.
    fn sample(&mut self) -> Result<bool, Self::Error>;
}

/// A free-running monotonic tick counter.
///
/// The counter is expected to wrap at most at `u64::MAX`; elapsed time is computed with
/// wrapping arithmetic, so a counter that wraps earlier must be extended by the implementation.
pub trait ClockSource {
    /// The current tick count.
    fn now(&mut self) -> u64;

    /// Resolution of [`ClockSource::now`] in ticks per second.
    ///
    /// A microsecond or finer resolution is recommended; every slot phase lasts
    /// at least one tick.
    fn tick_hz(&self) -> u32;
}

impl<T: BusControl + ?Sized> BusControl for &mut T {
    type Error = T::Error;

    fn drive_low(&mut self) -> Result<(), Self::Error> {
        T::drive_low(self)
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        T::release(self)
    }

    fn sample(&mut self) -> Result<bool, Self::Error> {
        T::sample(self)
    }
}

impl<T: ClockSource + ?Sized> ClockSource for &mut T {
    fn now(&mut self) -> u64 {
        T::now(self)
    }

    fn tick_hz(&self) -> u32 {
        T::tick_hz(self)
    }
}
