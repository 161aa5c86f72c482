//! Idempotent solenoid valve driver.

use rice_traits::OutputPin;

use crate::hw_error::map_hw_error;

/// Tracked valve position. Starts `Unknown` because construction does not
/// drive the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValveState {
    Unknown,
    Open,
    Closed,
}

/// Open = line HIGH, closed = line LOW.
///
/// Writes only when the requested position differs from the tracked one, so
/// repeated commands never touch the pin. The driver must be the only writer
/// of its pin; there is no position feedback.
pub struct Valve<P: OutputPin> {
    pin: P,
    state: ValveState,
}

impl<P: OutputPin> Valve<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            state: ValveState::Unknown,
        }
    }

    pub fn open(&mut self) {
        if self.state == ValveState::Open {
            return;
        }
        match self.pin.set_high() {
            Ok(()) => {
                self.state = ValveState::Open;
                tracing::info!("valve opened");
            }
            Err(e) => tracing::warn!(error = %map_hw_error(&*e), "valve open failed"),
        }
    }

    pub fn close(&mut self) {
        if self.state == ValveState::Closed {
            return;
        }
        match self.pin.set_low() {
            Ok(()) => {
                self.state = ValveState::Closed;
                tracing::info!("valve closed");
            }
            Err(e) => tracing::warn!(error = %map_hw_error(&*e), "valve close failed"),
        }
    }

    pub fn state(&self) -> ValveState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ValveState::Open
    }
}
