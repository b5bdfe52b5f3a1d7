//! Simulated 1-Wire line for the unit tests.

use crate::{BusControl, ClockSource};
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

/// Clock advanced by hand. Clones share the same counter.
#[derive(Clone)]
pub(crate) struct SimClock {
    now: Rc<Cell<u64>>,
    hz: u32,
}

impl SimClock {
    pub(crate) fn new(hz: u32) -> Self {
        Self {
            now: Rc::new(Cell::new(0)),
            hz,
        }
    }

    pub(crate) fn advance(&self, ticks: u64) {
        self.now.set(self.now.get().wrapping_add(ticks));
    }

    pub(crate) fn set(&self, tick: u64) {
        self.now.set(tick);
    }

    pub(crate) fn get(&self) -> u64 {
        self.now.get()
    }
}

impl ClockSource for SimClock {
    fn now(&mut self) -> u64 {
        self.now.get()
    }

    fn tick_hz(&self) -> u32 {
        self.hz
    }
}

/// A device on the simulated line.
pub(crate) trait Responder {
    /// The master pulled the line low at `t`.
    fn on_fall(&mut self, _t: u64) {}
    /// The master released the line at `t` after holding it low for `low_for` ticks.
    fn on_release(&mut self, _t: u64, _low_for: u64) {}
    /// Whether the device holds the line low at `t`.
    fn holds_low(&mut self, t: u64) -> bool;
}

/// No device on the bus.
pub(crate) struct Silent;

impl Responder for Silent {
    fn holds_low(&mut self, _t: u64) -> bool {
        false
    }
}

/// Answers reset pulses of at least `min_reset` ticks with a presence pulse that starts
/// `offset` ticks after the master releases the line and lasts `width` ticks.
pub(crate) struct Presence {
    pub(crate) min_reset: u64,
    pub(crate) offset: u64,
    pub(crate) width: u64,
    window: Option<(u64, u64)>,
}

impl Presence {
    pub(crate) fn new(min_reset: u64, offset: u64, width: u64) -> Self {
        Self {
            min_reset,
            offset,
            width,
            window: None,
        }
    }
}

impl Responder for Presence {
    fn on_release(&mut self, t: u64, low_for: u64) {
        if low_for >= self.min_reset {
            let start = t + self.offset;
            self.window = Some((start, start + self.width));
        }
    }

    fn holds_low(&mut self, t: u64) -> bool {
        self.window.is_some_and(|(start, end)| (start..end).contains(&t))
    }
}

/// Records the bit of the first `record` slots (low pulse shorter than `split` ticks is a 1),
/// then answers every following slot with the recorded bits. Zeros are sent by holding the
/// line low for `hold` ticks from the falling edge; once the recording is exhausted the
/// device stays silent.
pub(crate) struct Echo {
    record: usize,
    split: u64,
    hold: u64,
    bits: VecDeque<bool>,
    hold_until: Option<u64>,
}

impl Echo {
    pub(crate) fn new(record: usize, split: u64, hold: u64) -> Self {
        Self {
            record,
            split,
            hold,
            bits: VecDeque::new(),
            hold_until: None,
        }
    }

    /// Standard speed on a 1 MHz clock.
    pub(crate) fn standard(record: usize) -> Self {
        Self::new(record, 15, 30)
    }
}

impl Responder for Echo {
    fn on_fall(&mut self, t: u64) {
        if self.record > 0 {
            return;
        }
        if let Some(false) = self.bits.pop_front() {
            self.hold_until = Some(t + self.hold);
        }
    }

    fn on_release(&mut self, _t: u64, low_for: u64) {
        if self.record > 0 {
            self.bits.push_back(low_for < self.split);
            self.record -= 1;
        }
    }

    fn holds_low(&mut self, t: u64) -> bool {
        self.hold_until.is_some_and(|until| t < until)
    }
}

/// Level driven by the master, with the tick it was set at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edge {
    Low(u64),
    Released(u64),
}

/// Pin failure injected by [`SimBus::fail_next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PinFault;

struct Line {
    clock: SimClock,
    master_low: bool,
    low_since: u64,
    edges: Vec<Edge>,
    samples: Vec<(u64, bool)>,
    ops: usize,
    fail_next: bool,
    responder: Box<dyn Responder>,
}

/// Open-drain line shared by the master and a [`Responder`]. Clones share the line.
#[derive(Clone)]
pub(crate) struct SimBus {
    line: Rc<RefCell<Line>>,
}

impl SimBus {
    pub(crate) fn new(clock: &SimClock, responder: impl Responder + 'static) -> Self {
        Self {
            line: Rc::new(RefCell::new(Line {
                clock: clock.clone(),
                master_low: false,
                low_since: 0,
                edges: Vec::new(),
                samples: Vec::new(),
                ops: 0,
                fail_next: false,
                responder: Box::new(responder),
            })),
        }
    }

    /// Every level change requested by the master.
    pub(crate) fn edges(&self) -> Vec<Edge> {
        self.line.borrow().edges.clone()
    }

    /// Every sample taken by the master as `(tick, high)`.
    pub(crate) fn samples(&self) -> Vec<(u64, bool)> {
        self.line.borrow().samples.clone()
    }

    /// Number of pin operations performed so far.
    pub(crate) fn ops(&self) -> usize {
        self.line.borrow().ops
    }

    pub(crate) fn master_low(&self) -> bool {
        self.line.borrow().master_low
    }

    /// Make the next pin operation fail.
    pub(crate) fn fail_next(&self) {
        self.line.borrow_mut().fail_next = true;
    }

    /// Durations of the master's low pulses, in ticks, in order.
    pub(crate) fn low_pulses(&self) -> Vec<u64> {
        let mut pulses = Vec::new();
        let mut start = None;
        for edge in self.line.borrow().edges.iter() {
            match *edge {
                Edge::Low(t) => start = Some(t),
                Edge::Released(t) => {
                    if let Some(s) = start.take() {
                        pulses.push(t.wrapping_sub(s));
                    }
                }
            }
        }
        pulses
    }

    /// Decode the master's low pulses as write slots: shorter than `split` ticks is a 1.
    pub(crate) fn written_bits(&self, split: u64) -> Vec<bool> {
        self.low_pulses().into_iter().map(|p| p < split).collect()
    }
}

impl Line {
    fn begin_op(&mut self) -> Result<u64, PinFault> {
        self.ops += 1;
        if self.fail_next {
            self.fail_next = false;
            return Err(PinFault);
        }
        Ok(self.clock.get())
    }
}

impl BusControl for SimBus {
    type Error = PinFault;

    fn drive_low(&mut self) -> Result<(), PinFault> {
        let mut line = self.line.borrow_mut();
        let t = line.begin_op()?;
        if !line.master_low {
            line.master_low = true;
            line.low_since = t;
            line.edges.push(Edge::Low(t));
            line.responder.on_fall(t);
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), PinFault> {
        let mut line = self.line.borrow_mut();
        let t = line.begin_op()?;
        if line.master_low {
            line.master_low = false;
            let low_for = t.wrapping_sub(line.low_since);
            line.edges.push(Edge::Released(t));
            line.responder.on_release(t, low_for);
        }
        Ok(())
    }

    fn sample(&mut self) -> Result<bool, PinFault> {
        let mut line = self.line.borrow_mut();
        let t = line.begin_op()?;
        let high = !line.master_low && !line.responder.holds_low(t);
        line.samples.push((t, high));
        Ok(high)
    }
}
