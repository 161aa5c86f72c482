//! Hardware backends for the rice valve controller.
//!
//! The simulated devices are always available and share state through
//! `Rc<Cell<_>>` handles so a simulation (or a test) can watch the valve and
//! flip switches while the controller owns the device objects. Real GPIO,
//! HX711 and I2C LCD drivers live behind the `hardware` feature.
pub mod error;
pub mod util;

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod gpio;
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod hx711;
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod lcd;

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use rice_traits::{BoxError, InputPin, Level, OutputPin, Scale};

use crate::error::HwError;

/// Simulated load cell sitting under the valve.
///
/// Every read while the valve is open adds `fill_rate_kg` to the container.
/// With `exchange_after_reads` set, a simulated operator swaps the full
/// container for an empty one once the valve has been closed that many reads.
pub struct SimulatedScale {
    weight_kg: f32,
    valve_open: Rc<Cell<bool>>,
    counts_per_kg: f32,
    zero_counts: i32,
    fill_rate_kg: f32,
    exchange_after_reads: Option<u32>,
    closed_reads: u32,
    timing_out: bool,
}

impl SimulatedScale {
    pub fn new(counts_per_kg: f32, valve_open: Rc<Cell<bool>>) -> Self {
        Self {
            weight_kg: 0.0,
            valve_open,
            counts_per_kg,
            zero_counts: 0,
            fill_rate_kg: 0.05,
            exchange_after_reads: None,
            closed_reads: 0,
            timing_out: false,
        }
    }

    pub fn with_fill_rate(mut self, kg_per_read: f32) -> Self {
        self.fill_rate_kg = kg_per_read;
        self
    }

    pub fn with_exchange_after(mut self, reads: Option<u32>) -> Self {
        self.exchange_after_reads = reads;
        self
    }

    /// Offset reported with an empty platform, as an uncalibrated cell would.
    pub fn with_zero_counts(mut self, zero_counts: i32) -> Self {
        self.zero_counts = zero_counts;
        self
    }

    /// Every read fails with a timeout, as an unwired HX711 would.
    pub fn timing_out(mut self) -> Self {
        self.timing_out = true;
        self
    }
}

impl Scale for SimulatedScale {
    fn read(&mut self, _timeout: Duration) -> Result<i32, BoxError> {
        if self.timing_out {
            return Err(Box::new(HwError::Timeout));
        }
        let mut kg = self.weight_kg;
        if self.valve_open.get() {
            self.closed_reads = 0;
            kg += self.fill_rate_kg;
        } else {
            self.closed_reads = self.closed_reads.saturating_add(1);
            if self.exchange_after_reads == Some(self.closed_reads) && kg > 0.0 {
                tracing::debug!(full_kg = kg, "simulated container exchanged");
                kg = 0.0;
            }
        }
        self.weight_kg = kg;
        Ok(self.zero_counts + (kg * self.counts_per_kg).round() as i32)
    }
}

/// Simulated valve output; records the line level and the number of writes.
#[derive(Clone, Default)]
pub struct SimulatedValve {
    open: Rc<Cell<bool>>,
    writes: Rc<Cell<u32>>,
}

impl SimulatedValve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_handle(&self) -> Rc<Cell<bool>> {
        self.open.clone()
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl OutputPin for SimulatedValve {
    fn set_high(&mut self) -> Result<(), BoxError> {
        self.open.set(true);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), BoxError> {
        self.open.set(false);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Simulated pull-up switch input; idle HIGH until pressed.
#[derive(Clone)]
pub struct SimulatedSwitch {
    level: Rc<Cell<Level>>,
}

impl Default for SimulatedSwitch {
    fn default() -> Self {
        Self {
            level: Rc::new(Cell::new(Level::High)),
        }
    }
}

impl SimulatedSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch already held low at power-up.
    pub fn held() -> Self {
        let s = Self::default();
        s.press();
        s
    }

    pub fn press(&self) {
        self.level.set(Level::Low);
    }

    pub fn release(&self) {
        self.level.set(Level::High);
    }

    pub fn level(&self) -> Level {
        self.level.get()
    }
}

impl InputPin for SimulatedSwitch {
    fn read(&mut self) -> Result<Level, BoxError> {
        Ok(self.level.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_scale_fills_only_while_valve_open() {
        let valve = SimulatedValve::new();
        let mut scale = SimulatedScale::new(1000.0, valve.open_handle()).with_fill_rate(0.5);
        let timeout = Duration::from_millis(10);

        assert_eq!(scale.read(timeout).unwrap(), 0);
        valve.open_handle().set(true);
        assert_eq!(scale.read(timeout).unwrap(), 500);
        assert_eq!(scale.read(timeout).unwrap(), 1000);
        valve.open_handle().set(false);
        assert_eq!(scale.read(timeout).unwrap(), 1000);
    }

    #[test]
    fn simulated_operator_swaps_container() {
        let valve = SimulatedValve::new();
        valve.open_handle().set(true);
        let mut scale = SimulatedScale::new(100.0, valve.open_handle())
            .with_fill_rate(1.0)
            .with_exchange_after(Some(2));
        let timeout = Duration::from_millis(10);

        assert_eq!(scale.read(timeout).unwrap(), 100);
        valve.open_handle().set(false);
        assert_eq!(scale.read(timeout).unwrap(), 100);
        assert_eq!(scale.read(timeout).unwrap(), 0);
        assert_eq!(scale.read(timeout).unwrap(), 0);
    }

    #[test]
    fn timing_out_scale_reports_timeout() {
        let valve = SimulatedValve::new();
        let mut scale = SimulatedScale::new(1.0, valve.open_handle()).timing_out();
        let err = scale.read(Duration::from_millis(1)).unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn simulated_valve_counts_writes() {
        let mut valve = SimulatedValve::new();
        valve.set_high().unwrap();
        valve.set_low().unwrap();
        assert!(!valve.is_open());
        assert_eq!(valve.writes(), 2);
    }

    #[test]
    fn simulated_switch_idles_high() {
        let mut sw = SimulatedSwitch::new();
        assert_eq!(sw.read().unwrap(), Level::High);
        sw.press();
        assert_eq!(sw.read().unwrap(), Level::Low);
        assert!(SimulatedSwitch::held().level().is_low());
    }
}
