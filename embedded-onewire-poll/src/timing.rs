//! Time slot durations.
//!
//! | Phase                      | Standard (μs) | Overdrive (μs) |
//! |----------------------------|---------------|----------------|
//! | A: write 1 / read, low     | 6             | 1.0            |
//! | B: write 1, release        | 64            | 7.5            |
//! | C: write 0, low            | 60            | 7.5            |
//! | D: write 0, release        | 10            | 2.5            |
//! | E: read, release           | 9             | 1.0            |
//! | F: read, sample window     | 55            | 7              |
//! | G: reset, initial wait     | 0             | 2.5            |
//! | H: reset, low              | 480           | 70             |
//! | I: reset, release          | 70            | 8.5            |
//! | J: reset, presence window  | 410           | 40             |
//!
//! Values follow Analog Devices application note 126, *1-Wire Communication
//! Through Software*.

use fixed::types::U16F16;

/// A duration in microseconds. Fixed point, so that the half microsecond
/// overdrive values are exact.
pub type Micros = U16F16;

const fn tenths(t: u32) -> Micros {
    Micros::from_bits(t * (1 << 16) / 10)
}

/// Selectable bus speed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    /// Standard speed, roughly 15 kbit/s.
    #[default]
    Standard,
    /// Overdrive speed, roughly 110 kbit/s.
    Overdrive,
}

impl Speed {
    /// The recommended slot timings for this speed.
    pub const fn timings(self) -> Timings {
        match self {
            Speed::Standard => Timings::STANDARD,
            Speed::Overdrive => Timings::OVERDRIVE,
        }
    }
}

/// Durations of every phase of the reset, write and read time slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// (A) Low pulse of a write 1 slot, also the low pulse of a read slot.
    pub write_one_low: Micros,
    /// (B) Release time of a write 1 slot.
    pub write_one_release: Micros,
    /// (C) Low pulse of a write 0 slot.
    pub write_zero_low: Micros,
    /// (D) Recovery time of a write 0 slot.
    pub write_zero_release: Micros,
    /// (E) Time between releasing the line and opening the read sample window.
    pub read_release: Micros,
    /// (F) Read sample window.
    pub read_sample: Micros,
    /// (G) Wait before the reset pulse.
    pub reset_init: Micros,
    /// (H) Reset pulse.
    pub reset_low: Micros,
    /// (I) Time between the end of the reset pulse and the presence window.
    pub reset_release: Micros,
    /// (J) Presence window.
    pub reset_sample: Micros,
}

impl Timings {
    /// Standard speed.
    pub const STANDARD: Timings = Timings {
        write_one_low: tenths(60),
        write_one_release: tenths(640),
        write_zero_low: tenths(600),
        write_zero_release: tenths(100),
        read_release: tenths(90),
        read_sample: tenths(550),
        reset_init: tenths(0),
        reset_low: tenths(4800),
        reset_release: tenths(700),
        reset_sample: tenths(4100),
    };

    /// Overdrive speed.
    pub const OVERDRIVE: Timings = Timings {
        write_one_low: tenths(10),
        write_one_release: tenths(75),
        write_zero_low: tenths(75),
        write_zero_release: tenths(25),
        read_release: tenths(10),
        read_sample: tenths(70),
        reset_init: tenths(25),
        reset_low: tenths(700),
        reset_release: tenths(85),
        reset_sample: tenths(400),
    };

    pub(crate) fn to_ticks(&self, tick_hz: u32) -> Thresholds {
        Thresholds {
            write_one_low: ticks(self.write_one_low, tick_hz),
            write_one_release: ticks(self.write_one_release, tick_hz),
            write_zero_low: ticks(self.write_zero_low, tick_hz),
            write_zero_release: ticks(self.write_zero_release, tick_hz),
            read_release: ticks(self.read_release, tick_hz),
            read_sample: ticks(self.read_sample, tick_hz),
            reset_init: ticks(self.reset_init, tick_hz),
            reset_low: ticks(self.reset_low, tick_hz),
            reset_release: ticks(self.reset_release, tick_hz),
            reset_sample: ticks(self.reset_sample, tick_hz),
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// [`Timings`] converted to clock ticks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Thresholds {
    pub(crate) write_one_low: u64,
    pub(crate) write_one_release: u64,
    pub(crate) write_zero_low: u64,
    pub(crate) write_zero_release: u64,
    pub(crate) read_release: u64,
    pub(crate) read_sample: u64,
    pub(crate) reset_init: u64,
    pub(crate) reset_low: u64,
    pub(crate) reset_release: u64,
    pub(crate) reset_sample: u64,
}

/// Round up, so a phase never ends early on a coarse clock.
fn ticks(us: Micros, tick_hz: u32) -> u64 {
    // us.to_bits() is us * 2^16
    let scaled = us.to_bits() as u64 * tick_hz as u64;
    scaled.div_ceil(1_000_000 << 16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_profile() {
        let t = Speed::Standard.timings();
        let expected = [6, 64, 60, 10, 9, 55, 0, 480, 70, 410];
        let actual = [
            t.write_one_low,
            t.write_one_release,
            t.write_zero_low,
            t.write_zero_release,
            t.read_release,
            t.read_sample,
            t.reset_init,
            t.reset_low,
            t.reset_release,
            t.reset_sample,
        ];
        for (us, want) in actual.iter().zip(expected) {
            assert_eq!(*us, Micros::from_num(want));
        }
    }

    #[test]
    fn overdrive_profile() {
        let t = Speed::Overdrive.timings();
        assert_eq!(t.write_one_low, Micros::from_num(1));
        assert_eq!(t.write_one_release, Micros::from_num(7.5));
        assert_eq!(t.write_zero_low, Micros::from_num(7.5));
        assert_eq!(t.write_zero_release, Micros::from_num(2.5));
        assert_eq!(t.read_release, Micros::from_num(1));
        assert_eq!(t.read_sample, Micros::from_num(7));
        assert_eq!(t.reset_init, Micros::from_num(2.5));
        assert_eq!(t.reset_low, Micros::from_num(70));
        assert_eq!(t.reset_release, Micros::from_num(8.5));
        assert_eq!(t.reset_sample, Micros::from_num(40));
    }

    #[test]
    fn microsecond_clock() {
        let th = Timings::STANDARD.to_ticks(1_000_000);
        assert_eq!(th.write_one_low, 6);
        assert_eq!(th.reset_low, 480);
        assert_eq!(th.reset_init, 0);
    }

    #[test]
    fn fractional_delays_round_up() {
        let th = Timings::OVERDRIVE.to_ticks(1_000_000);
        assert_eq!(th.write_one_release, 8);
        assert_eq!(th.reset_release, 9);
        let th = Timings::OVERDRIVE.to_ticks(10_000_000);
        assert_eq!(th.write_one_release, 75);
        assert_eq!(th.write_zero_release, 25);
        // a millisecond tick still holds every non-zero phase for at least one tick
        let th = Timings::STANDARD.to_ticks(1_000);
        assert_eq!(th.write_one_low, 1);
        assert_eq!(th.reset_low, 1);
        assert_eq!(th.reset_init, 0);
    }

    #[test]
    fn nanosecond_clock() {
        let th = Timings::OVERDRIVE.to_ticks(1_000_000_000);
        assert_eq!(th.reset_release, 8_500);
        assert_eq!(th.reset_low, 70_000);
    }
}
