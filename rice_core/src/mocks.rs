//! Test doubles for driving a `Controller` without hardware.
//!
//! All handles are `Clone` and share state, so a test keeps one copy while
//! the controller owns the other.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use rice_traits::{BoxError, Display, InputPin, Level, OutputPin, Scale};

use crate::calibration::Calibration;

pub use rice_traits::TestClock;

/// Scale that replays queued raw readings, then repeats the last one.
#[derive(Clone, Default)]
pub struct ScriptedScale {
    queue: Rc<RefCell<VecDeque<Result<i32, String>>>>,
    last: Rc<Cell<i32>>,
}

impl ScriptedScale {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_raw(&self, raw: i32) {
        self.queue.borrow_mut().push_back(Ok(raw));
    }

    pub fn push_kg(&self, kg: f32, calibration: &Calibration) {
        let raw = calibration.zero_counts + (kg * calibration.counts_per_kg()).round() as i32;
        self.push_raw(raw);
    }

    /// Queue one failed read.
    pub fn push_error(&self, msg: &str) {
        self.queue.borrow_mut().push_back(Err(msg.to_string()));
    }
}

impl Scale for ScriptedScale {
    fn read(&mut self, _timeout: Duration) -> Result<i32, BoxError> {
        match self.queue.borrow_mut().pop_front() {
            Some(Ok(raw)) => {
                self.last.set(raw);
                Ok(raw)
            }
            Some(Err(msg)) => Err(msg.into()),
            None => Ok(self.last.get()),
        }
    }
}

/// Output pin that records its level and every write.
#[derive(Clone, Default)]
pub struct SpyPin {
    high: Rc<Cell<bool>>,
    writes: Rc<Cell<u32>>,
}

impl SpyPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.high.get()
    }

    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl OutputPin for SpyPin {
    fn set_high(&mut self) -> Result<(), BoxError> {
        self.high.set(true);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), BoxError> {
        self.high.set(false);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Pull-up switch input: HIGH until `press`.
#[derive(Clone)]
pub struct FakeSwitch {
    level: Rc<Cell<Level>>,
    failing: Rc<Cell<bool>>,
}

impl Default for FakeSwitch {
    fn default() -> Self {
        Self {
            level: Rc::new(Cell::new(Level::High)),
            failing: Rc::new(Cell::new(false)),
        }
    }
}

impl FakeSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self) {
        self.level.set(Level::Low);
    }

    pub fn release(&self) {
        self.level.set(Level::High);
    }

    /// While set, every read fails as a disconnected line would.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }
}

impl InputPin for FakeSwitch {
    fn read(&mut self) -> Result<Level, BoxError> {
        if self.failing.get() {
            return Err("gpio read failed".into());
        }
        Ok(self.level.get())
    }
}

/// Display that records every frame it is asked to draw.
#[derive(Clone, Default)]
pub struct RecordingDisplay {
    frames: Rc<RefCell<Vec<(String, String)>>>,
    failing: Rc<Cell<bool>>,
    failed_draws: Rc<Cell<u32>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<(String, String)> {
        self.frames.borrow().clone()
    }

    pub fn last(&self) -> Option<(String, String)> {
        self.frames.borrow().last().cloned()
    }

    /// While set, draws fail and are not recorded.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn failed_draws(&self) -> u32 {
        self.failed_draws.get()
    }
}

impl Display for RecordingDisplay {
    fn show(&mut self, line1: &str, line2: &str) -> Result<(), BoxError> {
        if self.failing.get() {
            self.failed_draws.set(self.failed_draws.get() + 1);
            return Err("i2c write failed".into());
        }
        self.frames
            .borrow_mut()
            .push((line1.to_string(), line2.to_string()));
        Ok(())
    }
}
